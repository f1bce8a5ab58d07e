//! Aggregates the host arguments of one procedure.

use crate::abi::{AbiManager, ERR_FLAG_NAME, ERR_STR_NAME};
use crate::host::arg::{ByteView, HostArg};

#[derive(Debug, Clone)]
pub struct HostManager {
    pub name: String,
    pub c_name: String,
    pub ret: Option<HostArg>,
    pub args: Vec<HostArg>,
    flag_type: String,
    errstr_type: String,
}

impl HostManager {
    pub fn new(abi: AbiManager) -> Self {
        let c_name = abi.c_name();
        Self {
            name: abi.name,
            c_name,
            ret: abi.ret.map(HostArg::new),
            args: abi.args.into_iter().map(HostArg::new).collect(),
            flag_type: abi.flag_type,
            errstr_type: abi.errstr_type,
        }
    }

    fn all_args(&self) -> impl Iterator<Item = &HostArg> {
        self.ret.iter().chain(&self.args)
    }

    /// Parameters of the host-callable signature, declared order.
    pub fn arg_declarations(&self) -> Vec<String> {
        self.args
            .iter()
            .flat_map(|arg| arg.caps.extern_decls.iter().cloned())
            .collect()
    }

    /// Temporaries of the result slot and the declared arguments.
    pub fn intern_declarations(&self) -> Vec<String> {
        self.all_args()
            .flat_map(|arg| arg.caps.intern_decls.iter().cloned())
            .collect()
    }

    /// Every local of the wrapper: [`Self::intern_declarations`] followed by
    /// the error flag and message buffer.
    pub fn temp_declarations(&self) -> Vec<String> {
        let mut decls = self.intern_declarations();
        decls.push(format!("cdef {} {ERR_FLAG_NAME}", self.flag_type));
        decls.push(format!(
            "cdef {} {ERR_STR_NAME}[fw_errstr_len]",
            self.errstr_type
        ));
        decls
    }

    pub fn call_arg_list(&self) -> Vec<String> {
        self.all_args()
            .flat_map(|arg| arg.caps.call_args.iter().cloned())
            .chain([format!("&{ERR_FLAG_NAME}"), ERR_STR_NAME.to_string()])
            .collect()
    }

    pub fn pre_call(&self) -> Vec<String> {
        self.all_args()
            .flat_map(|arg| arg.caps.pre_call.iter().cloned())
            .collect()
    }

    pub fn post_call(&self) -> Vec<String> {
        self.all_args()
            .flat_map(|arg| arg.caps.post_call.iter().cloned())
            .collect()
    }

    pub fn byte_views(&self) -> Vec<&ByteView> {
        self.all_args()
            .filter_map(|arg| arg.caps.byte_view.as_ref())
            .collect()
    }

    pub fn return_tuple(&self) -> Vec<String> {
        self.all_args()
            .flat_map(|arg| arg.caps.return_names.iter().cloned())
            .collect()
    }

    /// Documentation lines of caller-supplied arguments.
    pub fn in_doc(&self) -> Vec<String> {
        self.args
            .iter()
            .flat_map(|arg| arg.caps.in_doc.iter().cloned())
            .collect()
    }

    /// Documentation lines of results, function result first.
    pub fn out_doc(&self) -> Vec<String> {
        self.all_args()
            .flat_map(|arg| arg.caps.out_doc.iter().cloned())
            .collect()
    }

    pub(crate) fn in_names(&self) -> Vec<&str> {
        self.args
            .iter()
            .filter(|arg| !arg.caps.in_doc.is_empty())
            .map(HostArg::name)
            .collect()
    }

    pub(crate) fn out_names(&self) -> Vec<&str> {
        self.all_args()
            .filter(|arg| !arg.caps.out_doc.is_empty())
            .map(HostArg::name)
            .collect()
    }
}
