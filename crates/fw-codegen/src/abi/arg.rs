//! Per-argument view of the C-ABI trampoline.
//!
//! Every argument is passed by reference. Character values travel as a
//! length plus a buffer of single characters, arrays as one extent per
//! dimension plus the data pointer.

use fw_core::{Argument, Bound, CoreError, Dtype, Intent, TypeCatalog};
use itertools::Itertools;

use crate::error::Result;

/// Element category of a scalar argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Numeric,
    Logical,
    Complex,
}

/// Shape of an argument at the ABI boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgKind {
    Scalar(ScalarKind),
    /// Character scalar with a declared length expression.
    FixedChar { len: String },
    /// Character scalar declared `len=*`.
    AssumedChar,
    Array { rank: usize },
    /// Character array; `len` is `None` for `len=*`.
    CharArray { rank: usize, len: Option<String> },
}

impl ArgKind {
    pub fn of(arg: &Argument) -> Result<Self> {
        let len = match arg.dtype.char_len() {
            Some("*") => None,
            Some(len) => {
                fw_expr::parse(len).map_err(CoreError::from)?;
                Some(len.to_string())
            }
            None => None,
        };
        Ok(match (&arg.dtype, arg.rank()) {
            (Dtype::Character(_), 0) => match len {
                Some(len) => ArgKind::FixedChar { len },
                None => ArgKind::AssumedChar,
            },
            (Dtype::Character(_), rank) => ArgKind::CharArray { rank, len },
            (_, 0) => ArgKind::Scalar(match arg.dtype {
                Dtype::Logical(_) => ScalarKind::Logical,
                Dtype::Complex(_) => ScalarKind::Complex,
                _ => ScalarKind::Numeric,
            }),
            (_, rank) => ArgKind::Array { rank },
        })
    }

    pub fn rank(&self) -> usize {
        match self {
            ArgKind::Array { rank } | ArgKind::CharArray { rank, .. } => *rank,
            _ => 0,
        }
    }

    pub fn is_array(&self) -> bool {
        self.rank() > 0
    }

    pub fn is_character(&self) -> bool {
        matches!(
            self,
            ArgKind::FixedChar { .. } | ArgKind::AssumedChar | ArgKind::CharArray { .. }
        )
    }

    /// Declared length expression of a character argument.
    pub fn fixed_len(&self) -> Option<&str> {
        match self {
            ArgKind::FixedChar { len } | ArgKind::CharArray { len: Some(len), .. } => Some(len),
            _ => None,
        }
    }
}

/// An argument with its resolved ABI type names.
#[derive(Debug, Clone, PartialEq)]
pub struct AbiArg {
    pub name: String,
    pub intent: Intent,
    pub dtype: Dtype,
    pub dimension: Vec<String>,
    pub kind: ArgKind,
    /// Resolved ABI type of the value, e.g. `fwi_integer_t`.
    pub type_name: String,
    /// Numeric-library enum tag of the value type.
    pub npy_enum: String,
    /// Resolved ABI type of extents and lengths.
    pub extent_type: String,
    bounds: Vec<Bound>,
}

impl AbiArg {
    /// Fails with [`CoreError::Unresolved`] when the catalog does not cover
    /// the argument's type.
    pub fn new(arg: &Argument, catalog: &TypeCatalog) -> Result<Self> {
        let ctp = catalog.lookup(&arg.dtype)?;
        let extent = catalog.lookup(&Dtype::npy_intp())?;
        Ok(Self {
            name: arg.name.clone(),
            intent: arg.intent,
            dtype: arg.dtype.clone(),
            dimension: arg.dimension.iter().map(|dim| dim.trim().to_string()).collect(),
            kind: ArgKind::of(arg)?,
            type_name: ctp.name.clone(),
            npy_enum: ctp.npy_enum.clone(),
            extent_type: extent.name.clone(),
            bounds: arg.bounds()?,
        })
    }

    pub fn rank(&self) -> usize {
        self.kind.rank()
    }

    /// Whether the host caller supplies a value for this argument.
    ///
    /// Arrays are always supplied, since the caller owns their storage.
    /// An assumed-length character is always supplied, since its current
    /// value determines the buffer length.
    pub fn is_external(&self) -> bool {
        match self.kind {
            ArgKind::Array { .. } | ArgKind::CharArray { .. } | ArgKind::AssumedChar => true,
            _ => self.intent != Intent::Out,
        }
    }

    pub fn in_return_tuple(&self) -> bool {
        matches!(self.intent, Intent::Out | Intent::InOut)
    }

    fn copies_in(&self) -> bool {
        self.intent != Intent::Out
    }

    fn copies_out(&self) -> bool {
        self.intent != Intent::In
    }

    fn len_name(&self) -> String {
        format!("{}_len", self.name)
    }

    fn extent_names(&self) -> Vec<String> {
        (1..=self.rank())
            .map(|dim| format!("{}_d{dim}", self.name))
            .collect()
    }

    /// Name of the trampoline's character temporary.
    fn local_name(&self) -> String {
        format!("fw_{}", self.name)
    }

    /// Trampoline dummy names, in ABI order.
    pub fn dummy_names(&self) -> Vec<String> {
        let mut names = Vec::new();
        if self.kind.is_character() {
            names.push(self.len_name());
        }
        names.extend(self.extent_names());
        names.push(self.name.clone());
        names
    }

    /// C parameter declarations, in ABI order.
    pub fn c_params(&self) -> Vec<String> {
        let mut names = self.dummy_names();
        let value = names.pop().unwrap_or_default();
        names
            .into_iter()
            .map(|name| format!("{} *{name}", self.extent_type))
            .chain(std::iter::once(format!("{} *{value}", self.type_name)))
            .collect()
    }

    fn intent_attr(&self) -> String {
        self.intent
            .as_str()
            .map(|intent| format!(", intent({intent})"))
            .unwrap_or_default()
    }

    fn value_type(&self) -> String {
        format!("{}({})", self.dtype.basetype(), self.type_name)
    }

    /// Declarations of the trampoline's dummy arguments.
    pub fn dummy_decls(&self) -> Vec<String> {
        let mut decls = Vec::new();
        let extents = self
            .kind
            .is_character()
            .then(|| self.len_name())
            .into_iter()
            .chain(self.extent_names())
            .collect::<Vec<_>>();
        if !extents.is_empty() {
            decls.push(format!(
                "integer({}), intent(in) :: {}",
                self.extent_type,
                extents.iter().join(", ")
            ));
        }
        let ty = if self.kind.is_character() {
            format!("character(kind={}, len=1)", self.type_name)
        } else {
            self.value_type()
        };
        let dimension = if extents.is_empty() {
            String::new()
        } else {
            format!(", dimension({})", extents.iter().join(", "))
        };
        decls.push(format!("{ty}{dimension}{} :: {}", self.intent_attr(), self.name));
        decls
    }

    /// Local temporaries the trampoline copies character data through.
    pub fn local_decls(&self) -> Vec<String> {
        match &self.kind {
            ArgKind::FixedChar { .. } | ArgKind::AssumedChar => vec![format!(
                "character(kind={}, len={}) :: {}",
                self.type_name,
                self.len_name(),
                self.local_name()
            )],
            ArgKind::CharArray { .. } => vec![format!(
                "character(kind={}, len={}), dimension({}) :: {}",
                self.type_name,
                self.len_name(),
                self.extent_names().join(", "),
                self.local_name()
            )],
            _ => Vec::new(),
        }
    }

    /// Checks run before the call; each sets `fw_iserr__` and returns on
    /// failure.
    pub fn checks(&self) -> Vec<String> {
        let mut lines = Vec::new();
        if let Some(len) = self.kind.fixed_len() {
            lines.extend(error_guard(
                format!("{} < ({len})", self.len_name()),
                "FW_CHAR_SIZE__",
            ));
        }
        if self.kind.is_array() {
            for (extent_name, bound) in self.extent_names().iter().zip(&self.bounds) {
                if let Some(extent) = bound.extent() {
                    lines.extend(error_guard(
                        format!("{extent_name} .ne. ({extent})"),
                        "FW_ARR_DIM__",
                    ));
                }
            }
        }
        lines
    }

    pub fn copy_in(&self) -> Vec<String> {
        if !self.copies_in() {
            return Vec::new();
        }
        let (name, local) = (&self.name, self.local_name());
        match self.kind {
            ArgKind::FixedChar { .. } | ArgKind::AssumedChar => {
                vec![format!("{local} = transfer({name}, {local})")]
            }
            ArgKind::CharArray { .. } => vec![format!(
                "{local} = reshape(transfer({name}, {local}), shape({local}))"
            )],
            _ => Vec::new(),
        }
    }

    pub fn copy_out(&self) -> Vec<String> {
        if !self.copies_out() {
            return Vec::new();
        }
        let (name, local) = (&self.name, self.local_name());
        match self.kind {
            ArgKind::FixedChar { .. } | ArgKind::AssumedChar => {
                vec![format!("{name} = transfer({local}, {name})")]
            }
            ArgKind::CharArray { .. } => vec![format!(
                "{name} = reshape(transfer({local}, {name}), shape({name}))"
            )],
            _ => Vec::new(),
        }
    }

    /// The actual argument handed to the wrapped procedure.
    pub fn actual_arg(&self) -> String {
        if self.kind.is_character() {
            self.local_name()
        } else {
            self.name.clone()
        }
    }

    /// Declaration of the argument as the wrapped procedure sees it.
    pub fn interface_decl(&self) -> String {
        let ty = match &self.kind {
            ArgKind::FixedChar { len } | ArgKind::CharArray { len: Some(len), .. } => {
                format!("character(kind={}, len={len})", self.type_name)
            }
            ArgKind::AssumedChar | ArgKind::CharArray { len: None, .. } => {
                format!("character(kind={}, len=*)", self.type_name)
            }
            _ => self.value_type(),
        };
        let dimension = if self.dimension.is_empty() {
            String::new()
        } else {
            format!(", dimension({})", self.dimension.join(", "))
        };
        format!("{ty}{dimension}{} :: {}", self.intent_attr(), self.name)
    }
}

fn error_guard(condition: String, code: &str) -> Vec<String> {
    vec![
        format!("if ({condition}) then"),
        format!("    fw_iserr__ = {code}"),
        "    return".to_string(),
        "end if".to_string(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use fw_core::{ConfigTypeParam, FcType};
    use pretty_assertions::assert_eq;

    fn catalog() -> TypeCatalog {
        TypeCatalog::new([
            ConfigTypeParam::new(&Dtype::default_integer(), FcType::CInt),
            ConfigTypeParam::new(&Dtype::default_real(), FcType::CFloat),
            ConfigTypeParam::new(&Dtype::default_character("*"), FcType::CChar),
            ConfigTypeParam::new(&Dtype::npy_intp(), FcType::CIntptrT),
        ])
    }

    fn abi(arg: Argument) -> AbiArg {
        AbiArg::new(&arg, &catalog()).unwrap()
    }

    #[test]
    fn dispatch_by_type_and_shape() {
        let kind = |arg: Argument| ArgKind::of(&arg).unwrap();
        assert_eq!(
            kind(Argument::new("x", Dtype::default_real(), Intent::In)),
            ArgKind::Scalar(ScalarKind::Numeric)
        );
        assert_eq!(
            kind(Argument::new("l", Dtype::default_logical(), Intent::In)),
            ArgKind::Scalar(ScalarKind::Logical)
        );
        assert_eq!(
            kind(Argument::new("s", Dtype::default_character("20"), Intent::In)),
            ArgKind::FixedChar { len: "20".to_string() }
        );
        assert_eq!(
            kind(Argument::new("s", Dtype::default_character("*"), Intent::In)),
            ArgKind::AssumedChar
        );
        assert_eq!(
            kind(Argument::new("a", Dtype::default_complex(), Intent::In).with_dimension([":", ":"])),
            ArgKind::Array { rank: 2 }
        );
        assert_eq!(
            kind(Argument::new("c", Dtype::default_character("*"), Intent::In).with_dimension(["n"])),
            ArgKind::CharArray { rank: 1, len: None }
        );
    }

    #[test]
    fn scalar_out_is_internal_but_returned() {
        let arg = abi(Argument::new("x", Dtype::default_real(), Intent::Out));
        assert!(!arg.is_external());
        assert!(arg.in_return_tuple());
        assert_eq!(arg.c_params(), vec!["fwr_real_t *x"]);
        assert_eq!(arg.dummy_decls(), vec!["real(fwr_real_t), intent(out) :: x"]);
    }

    #[test]
    fn array_passes_extents_then_data() {
        let arg = abi(
            Argument::new("a", Dtype::default_real(), Intent::InOut).with_dimension(["n", "0:m", ":"]),
        );
        assert_eq!(
            arg.c_params(),
            vec![
                "fwi_npy_intp_t *a_d1",
                "fwi_npy_intp_t *a_d2",
                "fwi_npy_intp_t *a_d3",
                "fwr_real_t *a",
            ]
        );
        assert_eq!(
            arg.dummy_decls(),
            vec![
                "integer(fwi_npy_intp_t), intent(in) :: a_d1, a_d2, a_d3",
                "real(fwr_real_t), dimension(a_d1, a_d2, a_d3), intent(inout) :: a",
            ]
        );
        assert_eq!(
            arg.checks(),
            vec![
                "if (a_d1 .ne. (n)) then",
                "    fw_iserr__ = FW_ARR_DIM__",
                "    return",
                "end if",
                "if (a_d2 .ne. ((m) - (0) + 1)) then",
                "    fw_iserr__ = FW_ARR_DIM__",
                "    return",
                "end if",
            ]
        );
        assert_eq!(
            arg.interface_decl(),
            "real(fwr_real_t), dimension(n, 0:m, :), intent(inout) :: a"
        );
    }

    #[test]
    fn fixed_char_copies_through_a_temporary() {
        let arg = abi(Argument::new("s", Dtype::default_character("20"), Intent::InOut));
        assert_eq!(
            arg.dummy_decls(),
            vec![
                "integer(fwi_npy_intp_t), intent(in) :: s_len",
                "character(kind=fw_character_t, len=1), dimension(s_len), intent(inout) :: s",
            ]
        );
        assert_eq!(
            arg.local_decls(),
            vec!["character(kind=fw_character_t, len=s_len) :: fw_s"]
        );
        assert_eq!(arg.checks()[0], "if (s_len < (20)) then");
        assert_eq!(arg.copy_in(), vec!["fw_s = transfer(s, fw_s)"]);
        assert_eq!(arg.copy_out(), vec!["s = transfer(fw_s, s)"]);
        assert_eq!(arg.actual_arg(), "fw_s");
        assert_eq!(
            arg.interface_decl(),
            "character(kind=fw_character_t, len=20), intent(inout) :: s"
        );
    }

    #[test]
    fn assumed_char_out_stays_external() {
        let arg = abi(Argument::new("s", Dtype::default_character("*"), Intent::Out));
        assert!(arg.is_external());
        assert!(arg.checks().is_empty());
        assert!(arg.copy_in().is_empty());
        assert_eq!(arg.copy_out(), vec!["s = transfer(fw_s, s)"]);
    }

    #[test]
    fn unresolved_type_is_a_usage_error() {
        let arg = Argument::new("z", Dtype::default_complex(), Intent::In);
        let err = AbiArg::new(&arg, &catalog()).unwrap_err();
        assert!(err.to_string().contains("fwc_complex_t"));
    }
}
