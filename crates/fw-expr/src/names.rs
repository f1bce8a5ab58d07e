use crate::ast::{Expr, Literal};

/// Collects every identifier an expression refers to.
///
/// `names` gets plain names, keyword argument values and named literal
/// kinds (`1.0_dp` contributes `dp`); `funcnames` gets call targets.
/// Source order is kept and duplicates are not removed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ExtractNames {
    pub names: Vec<String>,
    pub funcnames: Vec<String>,
}

impl ExtractNames {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn extract(expr: &Expr) -> Self {
        let mut visitor = Self::new();
        visitor.visit(expr);
        visitor
    }

    pub fn visit(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(lit) => self.visit_literal(lit),
            Expr::Name(name) => self.names.push(name.clone()),
            Expr::Unary { operand, .. } => self.visit(operand),
            Expr::Binary { lhs, rhs, .. } => {
                self.visit(lhs);
                self.visit(rhs);
            }
            Expr::Paren(inner) => self.visit(inner),
            Expr::Tuple(items) => items.iter().for_each(|item| self.visit(item)),
            Expr::Call { target, args } => {
                self.funcnames.push(target.clone());
                for arg in args {
                    self.visit(arg.value());
                }
            }
        }
    }

    fn visit_literal(&mut self, lit: &Literal) {
        if let Some(name) = lit.kind().and_then(|kind| kind.name()) {
            self.names.push(name.to_string());
        }
    }
}
