//! The catalog of C-interoperable arithmetic types and the static tables
//! that map them to C spellings and numpy types.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::ast::Basetype;
use crate::error::CoreError;

/// An `iso_c_binding` kind constant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FcType {
    CSignedChar,
    CShort,
    CInt,
    CLong,
    CLongLong,
    CIntptrT,
    CFloat,
    CDouble,
    CLongDouble,
    CFloatComplex,
    CDoubleComplex,
    CLongDoubleComplex,
    CBool,
    CChar,
}

impl FcType {
    pub const ALL: [FcType; 14] = [
        FcType::CSignedChar,
        FcType::CShort,
        FcType::CInt,
        FcType::CLong,
        FcType::CLongLong,
        FcType::CIntptrT,
        FcType::CFloat,
        FcType::CDouble,
        FcType::CLongDouble,
        FcType::CFloatComplex,
        FcType::CDoubleComplex,
        FcType::CLongDoubleComplex,
        FcType::CBool,
        FcType::CChar,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FcType::CSignedChar => "c_signed_char",
            FcType::CShort => "c_short",
            FcType::CInt => "c_int",
            FcType::CLong => "c_long",
            FcType::CLongLong => "c_long_long",
            FcType::CIntptrT => "c_intptr_t",
            FcType::CFloat => "c_float",
            FcType::CDouble => "c_double",
            FcType::CLongDouble => "c_long_double",
            FcType::CFloatComplex => "c_float_complex",
            FcType::CDoubleComplex => "c_double_complex",
            FcType::CLongDoubleComplex => "c_long_double_complex",
            FcType::CBool => "c_bool",
            FcType::CChar => "c_char",
        }
    }
}

impl fmt::Display for FcType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FcType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FcType::ALL
            .into_iter()
            .find(|fc| fc.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| CoreError::UnknownFcType(s.to_string()))
    }
}

/// How one interoperable type is spelled on the C and numpy sides.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TypeInfo {
    pub c_name: &'static str,
    pub npy_type: &'static str,
    pub npy_enum: &'static str,
}

/// Extra mapping for the complex types, whose host layout is declared
/// separately from the C `_Complex` typedef.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComplexInfo {
    pub real: FcType,
    pub host_name: &'static str,
    pub creal: &'static str,
    pub cimag: &'static str,
}

#[derive(Debug)]
pub struct TypeTables {
    info: HashMap<FcType, TypeInfo>,
    complex: HashMap<FcType, ComplexInfo>,
    candidates: HashMap<Basetype, Vec<FcType>>,
}

static STANDARD: OnceLock<TypeTables> = OnceLock::new();

const INTEGER_CANDIDATES: [FcType; 5] = [
    FcType::CSignedChar,
    FcType::CShort,
    FcType::CInt,
    FcType::CLong,
    FcType::CLongLong,
];

impl TypeTables {
    /// The tables for the standard `iso_c_binding` catalog, built on first use.
    pub fn standard() -> &'static TypeTables {
        STANDARD.get_or_init(Self::build)
    }

    fn build() -> TypeTables {
        let info = [
            (FcType::CSignedChar, "signed char", "byte", "NPY_BYTE"),
            (FcType::CShort, "short int", "short", "NPY_SHORT"),
            (FcType::CInt, "int", "intc", "NPY_INT"),
            (FcType::CLong, "long int", "int_", "NPY_LONG"),
            (FcType::CLongLong, "long long int", "longlong", "NPY_LONGLONG"),
            (FcType::CIntptrT, "intptr_t", "intp", "NPY_INTP"),
            (FcType::CFloat, "float", "single", "NPY_FLOAT"),
            (FcType::CDouble, "double", "double", "NPY_DOUBLE"),
            (FcType::CLongDouble, "long double", "longdouble", "NPY_LONGDOUBLE"),
            (FcType::CFloatComplex, "float _Complex", "csingle", "NPY_CFLOAT"),
            (FcType::CDoubleComplex, "double _Complex", "cdouble", "NPY_CDOUBLE"),
            (
                FcType::CLongDoubleComplex,
                "long double _Complex",
                "clongdouble",
                "NPY_CLONGDOUBLE",
            ),
            (FcType::CBool, "_Bool", "bool_", "NPY_BOOL"),
            (FcType::CChar, "char", "byte", "NPY_BYTE"),
        ]
        .into_iter()
        .map(|(fc, c_name, npy_type, npy_enum)| {
            (
                fc,
                TypeInfo {
                    c_name,
                    npy_type,
                    npy_enum,
                },
            )
        })
        .collect();

        let complex = [
            (FcType::CFloatComplex, FcType::CFloat, "float complex", "crealf", "cimagf"),
            (FcType::CDoubleComplex, FcType::CDouble, "double complex", "creal", "cimag"),
            (
                FcType::CLongDoubleComplex,
                FcType::CLongDouble,
                "long double complex",
                "creall",
                "cimagl",
            ),
        ]
        .into_iter()
        .map(|(fc, real, host_name, creal, cimag)| {
            (
                fc,
                ComplexInfo {
                    real,
                    host_name,
                    creal,
                    cimag,
                },
            )
        })
        .collect();

        let candidates = HashMap::from([
            (Basetype::Integer, INTEGER_CANDIDATES.to_vec()),
            // logical kinds are probed through their storage size
            (Basetype::Logical, INTEGER_CANDIDATES.to_vec()),
            (
                Basetype::Real,
                vec![FcType::CFloat, FcType::CDouble, FcType::CLongDouble],
            ),
            (
                Basetype::Complex,
                vec![
                    FcType::CFloatComplex,
                    FcType::CDoubleComplex,
                    FcType::CLongDoubleComplex,
                ],
            ),
            (Basetype::Character, vec![FcType::CChar]),
        ]);

        TypeTables {
            info,
            complex,
            candidates,
        }
    }

    pub fn info(&self, fc: FcType) -> TypeInfo {
        // every FcType variant is present in the table built above
        self.info[&fc]
    }

    pub fn c_name(&self, fc: FcType) -> &'static str {
        self.info(fc).c_name
    }

    pub fn complex(&self, fc: FcType) -> Option<&ComplexInfo> {
        self.complex.get(&fc)
    }

    pub fn candidates(&self, basetype: Basetype) -> &[FcType] {
        self.candidates
            .get(&basetype)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Reverse lookup from a C spelling, used for `lang = "c"` declarations.
    pub fn from_c_name(&self, c_name: &str) -> Option<FcType> {
        let wanted = c_name.split_whitespace().collect::<Vec<_>>().join(" ");
        FcType::ALL
            .into_iter()
            .find(|fc| self.info[fc].c_name == wanted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_type_has_info() {
        let tables = TypeTables::standard();
        for fc in FcType::ALL {
            assert!(!tables.c_name(fc).is_empty(), "{fc}");
        }
    }

    #[test]
    fn fc_type_names_round_trip() {
        for fc in FcType::ALL {
            assert_eq!(fc.as_str().parse::<FcType>().unwrap(), fc);
        }
        assert!("c_size_t".parse::<FcType>().is_err());
    }

    #[test]
    fn serde_uses_iso_c_binding_names() {
        let json = serde_json::to_string(&FcType::CLongDoubleComplex).unwrap();
        assert_eq!(json, "\"c_long_double_complex\"");
        let json = serde_json::to_string(&FcType::CIntptrT).unwrap();
        assert_eq!(json, "\"c_intptr_t\"");
    }

    #[test]
    fn reverse_c_lookup_normalises_spaces() {
        let tables = TypeTables::standard();
        assert_eq!(tables.from_c_name("long  long int"), Some(FcType::CLongLong));
        assert_eq!(tables.from_c_name("size_t"), None);
    }

    #[test]
    fn logical_probes_integer_storage() {
        let tables = TypeTables::standard();
        assert_eq!(
            tables.candidates(Basetype::Logical),
            tables.candidates(Basetype::Integer)
        );
        assert_eq!(
            tables.complex(FcType::CDoubleComplex).map(|c| c.real),
            Some(FcType::CDouble)
        );
    }
}
