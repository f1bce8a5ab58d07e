//! Procedure interface model consumed by the generators.
//!
//! Values are produced by an external front end (as JSON) and are
//! read-only from here on.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};

/// Declared type of every `character` kind type parameter; character
/// always maps to `c_char`, so the identity ignores the source spelling.
pub const CHAR_ODECL: &str = "character(kind=c_char)";

/// Name of the synthesized argument holding a function's result.
pub const RETURN_ARG_NAME: &str = "fw_ret_arg";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Basetype {
    Integer,
    Real,
    Complex,
    Logical,
    Character,
}

impl Basetype {
    pub fn as_str(&self) -> &'static str {
        match self {
            Basetype::Integer => "integer",
            Basetype::Real => "real",
            Basetype::Complex => "complex",
            Basetype::Logical => "logical",
            Basetype::Character => "character",
        }
    }
}

impl fmt::Display for Basetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Language the kind declaration is written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Lang {
    #[default]
    Fortran,
    C,
}

impl FromStr for Lang {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "fortran" => Ok(Lang::Fortran),
            "c" => Ok(Lang::C),
            other => Err(CoreError::UnknownLanguage(other.to_string())),
        }
    }
}

impl TryFrom<String> for Lang {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Lang> for String {
    fn from(lang: Lang) -> Self {
        match lang {
            Lang::Fortran => "fortran".to_string(),
            Lang::C => "c".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Kind {
    /// Abstract kind type parameter name, e.g. `fwi_integer`.
    pub ktp: String,
    /// Declared type spec, e.g. `integer(kind=kind(0))`.
    pub odecl: String,
    #[serde(default)]
    pub lang: Lang,
}

impl Kind {
    pub fn new(ktp: impl Into<String>, odecl: impl Into<String>) -> Self {
        Self {
            ktp: ktp.into(),
            odecl: odecl.into(),
            lang: Lang::Fortran,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CharKind {
    pub ktp: String,
    /// Length expression, or `*` for assumed length.
    pub len: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Dtype {
    Integer(Kind),
    Real(Kind),
    Complex(Kind),
    Logical(Kind),
    Character(CharKind),
}

/// Structural identity of a type parameter: `(basetype, odecl, type name)`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DtypeKey {
    pub basetype: Basetype,
    pub odecl: String,
    pub name: String,
}

impl Dtype {
    pub fn default_integer() -> Self {
        Dtype::Integer(Kind::new("fwi_integer", "integer(kind=kind(0))"))
    }

    pub fn default_real() -> Self {
        Dtype::Real(Kind::new("fwr_real", "real(kind=kind(0.0))"))
    }

    pub fn default_logical() -> Self {
        Dtype::Logical(Kind::new("fwl_logical", "logical(kind=kind(.true.))"))
    }

    pub fn default_complex() -> Self {
        Dtype::Complex(Kind::new("fwc_complex", "complex(kind=kind((0.0,0.0)))"))
    }

    pub fn default_character(len: impl Into<String>) -> Self {
        Dtype::Character(CharKind {
            ktp: "fw_character".to_string(),
            len: len.into(),
        })
    }

    /// Integer type used for array extents and string lengths.
    pub fn npy_intp() -> Self {
        Dtype::Integer(Kind::new("fwi_npy_intp", "integer(kind=c_intptr_t)"))
    }

    pub fn basetype(&self) -> Basetype {
        match self {
            Dtype::Integer(_) => Basetype::Integer,
            Dtype::Real(_) => Basetype::Real,
            Dtype::Complex(_) => Basetype::Complex,
            Dtype::Logical(_) => Basetype::Logical,
            Dtype::Character(_) => Basetype::Character,
        }
    }

    pub fn ktp(&self) -> &str {
        match self {
            Dtype::Integer(kind) | Dtype::Real(kind) | Dtype::Complex(kind) | Dtype::Logical(kind) => {
                &kind.ktp
            }
            Dtype::Character(kind) => &kind.ktp,
        }
    }

    pub fn odecl(&self) -> &str {
        match self {
            Dtype::Integer(kind) | Dtype::Real(kind) | Dtype::Complex(kind) | Dtype::Logical(kind) => {
                &kind.odecl
            }
            Dtype::Character(_) => CHAR_ODECL,
        }
    }

    pub fn lang(&self) -> Lang {
        match self {
            Dtype::Integer(kind) | Dtype::Real(kind) | Dtype::Complex(kind) | Dtype::Logical(kind) => {
                kind.lang
            }
            Dtype::Character(_) => Lang::Fortran,
        }
    }

    /// Concrete ABI type name, `<ktp>_t`.
    pub fn type_name(&self) -> String {
        format!("{}_t", self.ktp())
    }

    /// Numeric-library enum tag, `<ktp>_t_enum`.
    pub fn enum_name(&self) -> String {
        format!("{}_t_enum", self.ktp())
    }

    /// Coarse label used in docstrings.
    pub fn label(&self) -> &str {
        self.ktp()
    }

    pub fn key(&self) -> DtypeKey {
        DtypeKey {
            basetype: self.basetype(),
            odecl: self.odecl().to_string(),
            name: self.type_name(),
        }
    }

    /// Length expression of a character type.
    pub fn char_len(&self) -> Option<&str> {
        match self {
            Dtype::Character(kind) => Some(kind.len.trim()),
            _ => None,
        }
    }

    pub fn is_character(&self) -> bool {
        matches!(self, Dtype::Character(_))
    }

    pub fn is_assumed_len(&self) -> bool {
        self.char_len() == Some("*")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Intent {
    In,
    Out,
    InOut,
    #[default]
    None,
}

impl Intent {
    pub fn as_str(&self) -> Option<&'static str> {
        match self {
            Intent::In => Some("in"),
            Intent::Out => Some("out"),
            Intent::InOut => Some("inout"),
            Intent::None => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    pub name: String,
    pub dtype: Dtype,
    #[serde(default)]
    pub intent: Intent,
    /// Bound texts, one per dimension; empty for scalars.
    #[serde(default)]
    pub dimension: Vec<String>,
}

impl Argument {
    pub fn new(name: impl Into<String>, dtype: Dtype, intent: Intent) -> Self {
        Self {
            name: name.into(),
            dtype,
            intent,
            dimension: Vec::new(),
        }
    }

    pub fn with_dimension<I, S>(mut self, dimension: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dimension = dimension.into_iter().map(Into::into).collect();
        self
    }

    pub fn rank(&self) -> usize {
        self.dimension.len()
    }

    pub fn is_array(&self) -> bool {
        !self.dimension.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum ProcedureKind {
    Subroutine,
    Function { return_type: Dtype },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Procedure {
    pub name: String,
    #[serde(default)]
    pub args: Vec<Argument>,
    #[serde(flatten)]
    pub kind: ProcedureKind,
}

impl Procedure {
    pub fn subroutine(name: impl Into<String>, args: Vec<Argument>) -> Self {
        Self {
            name: name.into(),
            args,
            kind: ProcedureKind::Subroutine,
        }
    }

    pub fn function(name: impl Into<String>, args: Vec<Argument>, return_type: Dtype) -> Self {
        Self {
            name: name.into(),
            args,
            kind: ProcedureKind::Function { return_type },
        }
    }

    pub fn is_function(&self) -> bool {
        matches!(self.kind, ProcedureKind::Function { .. })
    }

    /// The synthesized intent(out) argument carrying a function's result.
    pub fn return_arg(&self) -> Option<Argument> {
        match &self.kind {
            ProcedureKind::Function { return_type } => Some(Argument::new(
                RETURN_ARG_NAME,
                return_type.clone(),
                Intent::Out,
            )),
            ProcedureKind::Subroutine => None,
        }
    }

    /// Every dtype the procedure references, return type first.
    pub fn all_dtypes(&self) -> Vec<&Dtype> {
        let ret = match &self.kind {
            ProcedureKind::Function { return_type } => Some(return_type),
            ProcedureKind::Subroutine => None,
        };
        ret.into_iter()
            .chain(self.args.iter().map(|arg| &arg.dtype))
            .collect()
    }

    /// Rejects function results the ABI layer cannot pass back by reference.
    pub fn validate(&self) -> Result<()> {
        if let ProcedureKind::Function { return_type } = &self.kind {
            if return_type.is_character() {
                return Err(CoreError::InvalidReturn {
                    procedure: self.name.clone(),
                    reason: "a character value".to_string(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn procedure_json_layout() {
        let json = r#"{
            "name": "fort_fun",
            "kind": "function",
            "return_type": {"type": "real", "ktp": "fwr_dbl", "odecl": "real(kind=8)"},
            "args": [
                {"name": "n", "dtype": {"type": "integer", "ktp": "fwi_integer", "odecl": "integer(kind=kind(0))"}, "intent": "in"},
                {"name": "s", "dtype": {"type": "character", "ktp": "fw_character", "len": "*"}, "intent": "inout"},
                {"name": "a", "dtype": {"type": "complex", "ktp": "fwc_complex", "odecl": "complex(kind=kind((0.0,0.0)))"}, "dimension": ["n", ":"]}
            ]
        }"#;
        let proc: Procedure = serde_json::from_str(json).unwrap();
        assert_eq!(proc.name, "fort_fun");
        assert!(proc.is_function());
        assert_eq!(proc.args[1].dtype.char_len(), Some("*"));
        assert_eq!(proc.args[2].intent, Intent::None);
        assert_eq!(proc.args[2].rank(), 2);
        assert_eq!(proc.all_dtypes().len(), 4);

        let back: Procedure = serde_json::from_str(&serde_json::to_string(&proc).unwrap()).unwrap();
        assert_eq!(back, proc);
    }

    #[test]
    fn unknown_language_is_rejected() {
        let json = r#"{"type": "integer", "ktp": "k", "odecl": "int", "lang": "pascal"}"#;
        let err = serde_json::from_str::<Dtype>(json).unwrap_err();
        assert!(err.to_string().contains("unknown language 'pascal'"));
        assert!("pascal".parse::<Lang>().is_err());
    }

    #[test]
    fn character_identity_ignores_length() {
        let short = Dtype::default_character("10");
        let long = Dtype::default_character("*");
        assert_eq!(short.key(), long.key());
        assert_eq!(short.odecl(), CHAR_ODECL);
        assert_eq!(short.type_name(), "fw_character_t");
    }

    #[test]
    fn return_arg_is_synthesized_for_functions() {
        let func = Procedure::function("f", vec![], Dtype::default_real());
        let ret = func.return_arg().unwrap();
        assert_eq!(ret.name, RETURN_ARG_NAME);
        assert_eq!(ret.intent, Intent::Out);
        assert!(Procedure::subroutine("s", vec![]).return_arg().is_none());
    }

    #[test]
    fn character_function_is_a_usage_error() {
        let func = Procedure::function("f", vec![], Dtype::default_character("10"));
        assert!(matches!(func.validate(), Err(CoreError::InvalidReturn { .. })));
    }
}
