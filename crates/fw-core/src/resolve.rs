//! Kind type-parameter resolution.
//!
//! Resolution runs in two phases over a whole translation unit: every
//! distinct dtype is collected first, then all of them are probed in one
//! batch. Nothing is returned unless every dtype resolved.

use std::collections::{HashMap, HashSet};

use fw_expr::Expr;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::ast::{Basetype, Dtype, DtypeKey, Lang, Procedure};
use crate::ctp::ConfigTypeParam;
use crate::error::{CoreError, ProbeFailure, Result};
use crate::types::{FcType, TypeTables};

/// What the probe program has to declare to learn a kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KindDecl {
    /// An integer parameter equal to this kind expression.
    Parameter(String),
    /// A variable of this declared type whose `kind()` is probed.
    Variable(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProbeRequest {
    pub type_name: String,
    pub basetype: Basetype,
    pub decl: KindDecl,
    /// Candidates tried in order; the first whose kind matches wins.
    pub candidates: Vec<FcType>,
}

/// Source of concrete kinds; one call per resolution pass.
pub trait KindProbe {
    /// Returns one type per request, in request order.
    fn probe(&self, requests: &[ProbeRequest]) -> std::result::Result<Vec<FcType>, ProbeFailure>;
}

/// Every resolved type parameter of a translation unit, in collection order.
#[derive(Debug, Clone, Default)]
pub struct TypeCatalog {
    entries: Vec<ConfigTypeParam>,
    index: HashMap<DtypeKey, usize>,
}

impl PartialEq for TypeCatalog {
    fn eq(&self, other: &Self) -> bool {
        self.entries == other.entries
    }
}

impl TypeCatalog {
    /// Builds a catalog; later duplicates of a key are dropped.
    pub fn new(entries: impl IntoIterator<Item = ConfigTypeParam>) -> Self {
        let mut catalog = TypeCatalog::default();
        for entry in entries {
            let key = entry.key();
            if !catalog.index.contains_key(&key) {
                catalog.index.insert(key, catalog.entries.len());
                catalog.entries.push(entry);
            }
        }
        catalog
    }

    pub fn entries(&self) -> &[ConfigTypeParam] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn lookup(&self, dtype: &Dtype) -> Result<&ConfigTypeParam> {
        self.index
            .get(&dtype.key())
            .map(|&idx| &self.entries[idx])
            .ok_or_else(|| CoreError::Unresolved(dtype.type_name()))
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(&self.entries)?)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let entries: Vec<ConfigTypeParam> = serde_json::from_str(text)?;
        Ok(Self::new(entries))
    }
}

/// Types every generated unit needs regardless of its procedures: the error
/// flag, the error message buffer and array extents.
pub fn intrinsic_dtypes() -> Vec<Dtype> {
    vec![
        Dtype::default_integer(),
        Dtype::default_character("*"),
        Dtype::npy_intp(),
    ]
}

pub struct Resolver<'t> {
    tables: &'t TypeTables,
}

enum Plan {
    Known(FcType),
    Probe(usize),
}

impl<'t> Resolver<'t> {
    pub fn new(tables: &'t TypeTables) -> Self {
        Self { tables }
    }

    /// Distinct dtypes of all procedures, intrinsic types first.
    pub fn collect(&self, procs: &[Procedure]) -> Vec<Dtype> {
        let mut seen = HashSet::new();
        let mut dtypes = Vec::new();
        let used = procs.iter().flat_map(|proc| proc.all_dtypes()).cloned();
        for dtype in intrinsic_dtypes().into_iter().chain(used) {
            if seen.insert(dtype.key()) {
                dtypes.push(dtype);
            }
        }
        dtypes
    }

    pub fn resolve(&self, procs: &[Procedure], probe: &dyn KindProbe) -> Result<TypeCatalog> {
        for proc in procs {
            proc.validate()?;
        }
        let dtypes = self.collect(procs);
        debug!("collected {} distinct kind type parameters", dtypes.len());

        let mut requests = Vec::new();
        let mut plans = Vec::with_capacity(dtypes.len());
        for dtype in &dtypes {
            plans.push(match self.plan(dtype)? {
                Ok(fc) => Plan::Known(fc),
                Err(request) => {
                    requests.push(request);
                    Plan::Probe(requests.len() - 1)
                }
            });
        }

        let probed = if requests.is_empty() {
            Vec::new()
        } else {
            info!("probing {} kinds", requests.len());
            probe.probe(&requests).map_err(CoreError::Probe)?
        };
        if probed.len() != requests.len() {
            return Err(CoreError::ProbeIncomplete {
                expected: requests.len(),
                got: probed.len(),
            });
        }
        for (request, fc) in requests.iter().zip(&probed) {
            if !request.candidates.contains(fc) {
                return Err(CoreError::ProbeMismatch {
                    type_name: request.type_name.clone(),
                    basetype: request.basetype,
                    fc_type: *fc,
                });
            }
        }

        let entries = dtypes.iter().zip(plans).map(|(dtype, plan)| {
            let fc = match plan {
                Plan::Known(fc) => fc,
                Plan::Probe(idx) => probed[idx],
            };
            debug!("{} -> {}", dtype.type_name(), fc);
            ConfigTypeParam::new(dtype, fc)
        });
        Ok(TypeCatalog::new(entries))
    }

    /// Either the type is known without probing, or the request that finds it.
    fn plan(&self, dtype: &Dtype) -> Result<std::result::Result<FcType, ProbeRequest>> {
        let basetype = dtype.basetype();
        if basetype == Basetype::Character {
            return Ok(Ok(FcType::CChar));
        }
        if dtype.lang() == Lang::C {
            return self
                .tables
                .from_c_name(dtype.odecl())
                .map(Ok)
                .ok_or_else(|| CoreError::UnknownCType(dtype.odecl().to_string()));
        }
        let decl = match basetype {
            Basetype::Logical => {
                // no interoperable logical kinds; probe a variable's storage
                kind_expression(basetype, dtype.odecl())?;
                KindDecl::Variable(dtype.odecl().to_string())
            }
            _ => KindDecl::Parameter(kind_expression(basetype, dtype.odecl())?),
        };
        Ok(Err(ProbeRequest {
            type_name: dtype.type_name(),
            basetype,
            decl,
            candidates: self.tables.candidates(basetype).to_vec(),
        }))
    }
}

fn default_kind(basetype: Basetype) -> &'static str {
    match basetype {
        Basetype::Integer => "kind(0)",
        Basetype::Real => "kind(0.0)",
        Basetype::Complex => "kind((0.0, 0.0))",
        Basetype::Logical => "kind(.true.)",
        Basetype::Character => "kind('a')",
    }
}

/// Pulls the kind selector out of a declared type spec such as
/// `real(kind=selected_real_kind(10))` or `integer(8)`.
pub fn kind_expression(basetype: Basetype, odecl: &str) -> Result<String> {
    let invalid = |reason: String| CoreError::InvalidTypeDecl {
        odecl: odecl.to_string(),
        reason,
    };
    let expr = fw_expr::parse(odecl)?;
    let target = match &expr {
        Expr::Name(name) => name.as_str(),
        Expr::Call { target, .. } => target.as_str(),
        _ => return Err(invalid("expected a type spec".to_string())),
    };
    if !target.eq_ignore_ascii_case(basetype.as_str()) {
        return Err(invalid(format!("expected a {basetype} declaration")));
    }
    Ok(expr
        .call_arg("kind", 0)
        .map(ToString::to_string)
        .unwrap_or_else(|| default_kind(basetype).to_string()))
}
