//! Aggregates the ABI arguments of one procedure into a single signature.

use std::collections::HashSet;

use fw_core::{Dtype, Procedure, TypeCatalog, RETURN_ARG_NAME};

use crate::abi::arg::AbiArg;
use crate::error::{CodegenError, Result};

pub const ERR_FLAG_NAME: &str = "fw_iserr__";
pub const ERR_STR_NAME: &str = "fw_errstr__";

const RESERVED_NAMES: [&str; 3] = [RETURN_ARG_NAME, ERR_FLAG_NAME, ERR_STR_NAME];

#[derive(Debug, Clone)]
pub struct AbiManager {
    pub name: String,
    /// Synthesized result slot of a function.
    pub ret: Option<AbiArg>,
    pub args: Vec<AbiArg>,
    /// Resolved type of the error flag.
    pub flag_type: String,
    /// Resolved type of the error message buffer.
    pub errstr_type: String,
}

impl AbiManager {
    pub fn new(proc: &Procedure, catalog: &TypeCatalog) -> Result<Self> {
        proc.validate()?;
        let mut seen = HashSet::new();
        for arg in &proc.args {
            if RESERVED_NAMES.contains(&arg.name.as_str()) {
                return Err(CodegenError::ReservedName(arg.name.clone()));
            }
            if !seen.insert(arg.name.to_ascii_lowercase()) {
                return Err(CodegenError::DuplicateArgument {
                    procedure: proc.name.clone(),
                    arg: arg.name.clone(),
                });
            }
        }

        let ret = proc
            .return_arg()
            .map(|arg| AbiArg::new(&arg, catalog))
            .transpose()?;
        let args = proc
            .args
            .iter()
            .map(|arg| AbiArg::new(arg, catalog))
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            name: proc.name.clone(),
            ret,
            args,
            flag_type: catalog.lookup(&Dtype::default_integer())?.name.clone(),
            errstr_type: catalog.lookup(&Dtype::default_character("*"))?.name.clone(),
        })
    }

    /// Name of the `bind(c)` trampoline.
    pub fn c_name(&self) -> String {
        format!("{}_c", self.name)
    }

    /// Return slot first, then declared arguments.
    pub fn all_args(&self) -> impl Iterator<Item = &AbiArg> {
        self.ret.iter().chain(&self.args)
    }

    /// Full C parameter list: return slot, declared arguments, then the
    /// error flag and message buffer.
    pub fn c_params(&self) -> Vec<String> {
        self.all_args()
            .flat_map(AbiArg::c_params)
            .chain([
                format!("{} *{ERR_FLAG_NAME}", self.flag_type),
                format!("{} *{ERR_STR_NAME}", self.errstr_type),
            ])
            .collect()
    }

    pub fn dummy_names(&self) -> Vec<String> {
        self.all_args()
            .flat_map(AbiArg::dummy_names)
            .chain([ERR_FLAG_NAME.to_string(), ERR_STR_NAME.to_string()])
            .collect()
    }

    /// Names the caller supplies, in declared order.
    pub fn external_names(&self) -> Vec<&str> {
        self.args
            .iter()
            .filter(|arg| arg.is_external())
            .map(|arg| arg.name.as_str())
            .collect()
    }

    /// Function result first, then every `out`/`inout` argument.
    pub fn return_names(&self) -> Vec<&str> {
        self.all_args()
            .filter(|arg| arg.in_return_tuple())
            .map(|arg| arg.name.as_str())
            .collect()
    }

    /// C prototype of the trampoline.
    pub fn prototype(&self) -> String {
        format!("void {}({})", self.c_name(), self.c_params().join(", "))
    }
}
