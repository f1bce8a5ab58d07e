//! Dimension bound analysis: explicit extents and argument dependencies.

use fw_expr::{Expr, ExtractNames};
use itertools::Itertools;
use tracing::warn;

use crate::ast::Argument;
use crate::error::{CoreError, Result};

/// One parsed dimension specifier.
#[derive(Debug, Clone, PartialEq)]
pub enum Bound {
    /// `:` or `l:`
    AssumedShape { lower: Option<Expr> },
    /// `*` or `l:*`
    AssumedSize { lower: Option<Expr> },
    /// `u` or `l:u`
    Explicit { lower: Option<Expr>, upper: Expr },
}

impl Bound {
    pub fn parse(text: &str) -> Result<Bound> {
        let text = text.trim();
        let (lower, upper) = match text.split_once(':') {
            Some((lower, upper)) => (Some(lower.trim()), upper.trim()),
            None => (None, text),
        };
        if upper.contains(':') {
            return Err(CoreError::InvalidBound(text.to_string()));
        }
        let lower = match lower {
            Some("") | None => None,
            Some(lower) => Some(fw_expr::parse(lower)?),
        };
        Ok(match upper {
            "" if text.contains(':') => Bound::AssumedShape { lower },
            "" => return Err(CoreError::InvalidBound(text.to_string())),
            "*" => Bound::AssumedSize { lower },
            upper => Bound::Explicit {
                lower,
                upper: fw_expr::parse(upper)?,
            },
        })
    }

    /// Number of elements along this dimension when it is known from the
    /// declaration alone.
    pub fn extent(&self) -> Option<String> {
        match self {
            Bound::Explicit { lower: None, upper } => Some(upper.to_string()),
            Bound::Explicit {
                lower: Some(lower),
                upper,
            } => Some(format!("({upper}) - ({lower}) + 1")),
            _ => None,
        }
    }

    pub fn exprs(&self) -> impl Iterator<Item = &Expr> {
        let (lower, upper) = match self {
            Bound::AssumedShape { lower } | Bound::AssumedSize { lower } => (lower.as_ref(), None),
            Bound::Explicit { lower, upper } => (lower.as_ref(), Some(upper)),
        };
        lower.into_iter().chain(upper)
    }
}

impl Argument {
    pub fn bounds(&self) -> Result<Vec<Bound>> {
        self.dimension.iter().map(|text| Bound::parse(text)).collect()
    }

    /// Names referenced by the bounds and the character length, in order.
    pub fn dependencies(&self) -> Result<Vec<String>> {
        let mut visitor = ExtractNames::new();
        for bound in self.bounds()? {
            bound.exprs().for_each(|expr| visitor.visit(expr));
        }
        if let Some(len) = self.dtype.char_len() {
            if len != "*" {
                visitor.visit(&fw_expr::parse(len)?);
            }
        }
        Ok(visitor.names.into_iter().unique().collect())
    }
}

/// Orders arguments so each one follows the arguments its bounds refer to.
///
/// Arguments without dependencies keep their declared position relative to
/// each other. A dependency cycle leaves the remaining arguments in declared
/// order.
pub fn declaration_order(args: &[Argument]) -> Result<Vec<&Argument>> {
    let deps = args
        .iter()
        .map(|arg| {
            let names = arg.dependencies()?;
            Ok(args
                .iter()
                .enumerate()
                .filter(|(_, other)| {
                    other.name != arg.name
                        && names.iter().any(|name| name.eq_ignore_ascii_case(&other.name))
                })
                .map(|(idx, _)| idx)
                .collect::<Vec<_>>())
        })
        .collect::<Result<Vec<_>>>()?;

    let mut placed = vec![false; args.len()];
    let mut order = Vec::with_capacity(args.len());
    while order.len() < args.len() {
        let next = (0..args.len())
            .find(|&idx| !placed[idx] && deps[idx].iter().all(|&dep| placed[dep]));
        match next {
            Some(idx) => {
                placed[idx] = true;
                order.push(&args[idx]);
            }
            None => {
                let rest = (0..args.len()).filter(|&idx| !placed[idx]).collect::<Vec<_>>();
                warn!(
                    "circular dimension dependencies among {}",
                    rest.iter().map(|&idx| &args[idx].name).join(", ")
                );
                order.extend(rest.into_iter().map(|idx| &args[idx]));
            }
        }
    }
    Ok(order)
}
