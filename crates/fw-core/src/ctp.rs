//! Resolved kind type parameters and the source lines each one contributes
//! to the kind module, the C header and the host binding files.

use serde::{Deserialize, Serialize};

use crate::ast::{Basetype, Dtype, DtypeKey, Lang};
use crate::types::{FcType, TypeTables};

/// Error codes shared by the trampolines and the host wrappers, sorted by name.
pub const ERR_CODES: [(&str, i32); 4] = [
    ("FW_ARR_DIM__", 2),
    ("FW_CHAR_SIZE__", 1),
    ("FW_INIT_ERR__", -1),
    ("FW_NO_ERR__", 0),
];

pub const ERRSTR_LEN_NAME: &str = "fw_errstr_len";
pub const ERRSTR_LEN: usize = 63;

/// Emission behaviour shared by all parameters of one flavour; includes and
/// cimports are written once per class, not once per parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CtpClass {
    Plain,
    Logical,
    Complex,
    Character,
}

impl CtpClass {
    pub fn c_includes(&self) -> &'static [&'static str] {
        match self {
            CtpClass::Complex => &["#include <complex.h>"],
            _ => &[],
        }
    }

    pub fn pxd_cimports(&self) -> &'static [&'static str] {
        match self {
            CtpClass::Character => &[
                "from cpython.bytes cimport PyBytes_FromStringAndSize",
                "ctypedef bytes fw_bytes",
            ],
            _ => &[],
        }
    }
}

/// A kind type parameter bound to its concrete `iso_c_binding` type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigTypeParam {
    pub basetype: Basetype,
    pub odecl: String,
    /// ABI type name, `<ktp>_t`.
    pub name: String,
    pub npy_enum: String,
    #[serde(default)]
    pub lang: Lang,
    pub fc_type: FcType,
}

impl PartialEq for ConfigTypeParam {
    fn eq(&self, other: &Self) -> bool {
        self.basetype == other.basetype && self.odecl == other.odecl && self.name == other.name
    }
}

impl Eq for ConfigTypeParam {}

impl ConfigTypeParam {
    pub fn new(dtype: &Dtype, fc_type: FcType) -> Self {
        Self {
            basetype: dtype.basetype(),
            odecl: dtype.odecl().to_string(),
            name: dtype.type_name(),
            npy_enum: dtype.enum_name(),
            lang: dtype.lang(),
            fc_type,
        }
    }

    pub fn key(&self) -> DtypeKey {
        DtypeKey {
            basetype: self.basetype,
            odecl: self.odecl.clone(),
            name: self.name.clone(),
        }
    }

    pub fn class(&self) -> CtpClass {
        match (self.lang, self.basetype) {
            (Lang::C, _) => CtpClass::Plain,
            (Lang::Fortran, Basetype::Complex) => CtpClass::Complex,
            (Lang::Fortran, Basetype::Logical) => CtpClass::Logical,
            (Lang::Fortran, Basetype::Character) => CtpClass::Character,
            (Lang::Fortran, Basetype::Integer | Basetype::Real) => CtpClass::Plain,
        }
    }

    /// Name of the numpy type object, the ABI name without its `_t` suffix.
    pub fn py_type_name(&self) -> String {
        match self.name.strip_suffix("_t") {
            Some(stem) => stem.to_string(),
            None => format!("{}_", self.name),
        }
    }

    pub fn gen_f_mod(&self) -> Vec<String> {
        match self.class() {
            CtpClass::Logical => {
                let tmp = format!("{}_tmp_var", self.name);
                vec![
                    format!("{} :: {tmp}", self.odecl),
                    format!("integer, parameter :: {} = kind({tmp})", self.name),
                ]
            }
            _ => vec![format!("integer, parameter :: {} = {}", self.name, self.fc_type)],
        }
    }

    pub fn gen_c_typedef(&self, tables: &TypeTables) -> Vec<String> {
        let mut lines = vec![format!("typedef {} {};", tables.c_name(self.fc_type), self.name)];
        if let (CtpClass::Complex, Some(cx)) = (self.class(), tables.complex(self.fc_type)) {
            let name = &self.name;
            lines.push(format!("#define {name}_creal(z) ({}(z))", cx.creal));
            lines.push(format!("#define {name}_cimag(z) ({}(z))", cx.cimag));
            lines.push(format!(
                "#define {name}_from_parts(r, i, z) ((z) = (r) + (i) * _Complex_I)"
            ));
        }
        lines
    }

    /// Typedef inside the `cdef extern` block; complex types are declared
    /// outside it with the host's own complex spelling.
    pub fn gen_pxd_extern_typedef(&self, tables: &TypeTables) -> Vec<String> {
        match self.class() {
            CtpClass::Complex => vec![],
            _ => vec![format!("ctypedef {} {}", tables.c_name(self.fc_type), self.name)],
        }
    }

    pub fn gen_pxd_intern_typedef(&self, tables: &TypeTables) -> Vec<String> {
        match (self.class(), tables.complex(self.fc_type)) {
            (CtpClass::Complex, Some(cx)) => vec![format!("ctypedef {} {}", cx.host_name, self.name)],
            _ => vec![],
        }
    }

    pub fn gen_pxd_extern_extra(&self, tables: &TypeTables) -> Vec<String> {
        match (self.class(), tables.complex(self.fc_type)) {
            (CtpClass::Complex, Some(cx)) => {
                let name = &self.name;
                let real = tables.c_name(cx.real);
                vec![
                    format!("{real} {name}_creal({name} z)"),
                    format!("{real} {name}_cimag({name} z)"),
                    format!("void {name}_from_parts({real} r, {real} i, {name} z)"),
                ]
            }
            _ => vec![],
        }
    }

    pub fn gen_pyx_type_obj(&self, tables: &TypeTables) -> Vec<String> {
        let info = tables.info(self.fc_type);
        vec![
            format!("{} = np.{}", self.npy_enum, info.npy_enum),
            format!("{} = np.{}", self.py_type_name(), info.npy_type),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Kind;
    use pretty_assertions::assert_eq;

    fn ctp(dtype: Dtype, fc: FcType) -> ConfigTypeParam {
        ConfigTypeParam::new(&dtype, fc)
    }

    #[test]
    fn kind_module_lines() {
        let int = ctp(Dtype::default_integer(), FcType::CInt);
        assert_eq!(int.gen_f_mod(), vec!["integer, parameter :: fwi_integer_t = c_int"]);

        let log = ctp(Dtype::default_logical(), FcType::CInt);
        assert_eq!(
            log.gen_f_mod(),
            vec![
                "logical(kind=kind(.true.)) :: fwl_logical_t_tmp_var",
                "integer, parameter :: fwl_logical_t = kind(fwl_logical_t_tmp_var)",
            ]
        );
    }

    #[test]
    fn complex_header_and_binding_lines() {
        let tables = TypeTables::standard();
        let cmplx = ctp(Dtype::default_complex(), FcType::CFloatComplex);
        assert_eq!(
            cmplx.gen_c_typedef(tables),
            vec![
                "typedef float _Complex fwc_complex_t;",
                "#define fwc_complex_t_creal(z) (crealf(z))",
                "#define fwc_complex_t_cimag(z) (cimagf(z))",
                "#define fwc_complex_t_from_parts(r, i, z) ((z) = (r) + (i) * _Complex_I)",
            ]
        );
        assert!(cmplx.gen_pxd_extern_typedef(tables).is_empty());
        assert_eq!(
            cmplx.gen_pxd_intern_typedef(tables),
            vec!["ctypedef float complex fwc_complex_t"]
        );
        assert_eq!(
            cmplx.gen_pxd_extern_extra(tables)[2],
            "void fwc_complex_t_from_parts(float r, float i, fwc_complex_t z)"
        );
    }

    #[test]
    fn plain_binding_lines() {
        let tables = TypeTables::standard();
        let int = ctp(Dtype::default_integer(), FcType::CInt);
        assert_eq!(int.gen_c_typedef(tables), vec!["typedef int fwi_integer_t;"]);
        assert_eq!(int.gen_pxd_extern_typedef(tables), vec!["ctypedef int fwi_integer_t"]);
        assert!(int.gen_pxd_intern_typedef(tables).is_empty());
        assert!(int.gen_pxd_extern_extra(tables).is_empty());
        assert_eq!(
            int.gen_pyx_type_obj(tables),
            vec!["fwi_integer_t_enum = np.NPY_INT", "fwi_integer = np.intc"]
        );
    }

    #[test]
    fn equality_ignores_resolved_type() {
        let a = ctp(Dtype::default_real(), FcType::CFloat);
        let b = ctp(Dtype::default_real(), FcType::CDouble);
        assert_eq!(a, b);
        let other = ctp(
            Dtype::Real(Kind::new("fwr_real", "real(kind=8)")),
            FcType::CDouble,
        );
        assert_ne!(a, other);
    }

    #[test]
    fn c_declared_types_emit_as_plain() {
        let mut kind = Kind::new("fwi_c_long", "long int");
        kind.lang = Lang::C;
        let c_long = ctp(Dtype::Integer(kind), FcType::CLong);
        assert_eq!(c_long.class(), CtpClass::Plain);
        assert_eq!(c_long.gen_f_mod(), vec!["integer, parameter :: fwi_c_long_t = c_long"]);
    }
}
