//! Expression tree for dimension and kind bound expressions.

use std::fmt;

use itertools::Itertools;

/// Kind type parameter attached to a literal, either `_8` / `8_` or `_dp` / `dp_`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KindParam {
    Digits(String),
    Name(String),
}

impl KindParam {
    pub(crate) fn from_text(text: &str) -> Self {
        if text.chars().all(|c| c.is_ascii_digit()) {
            KindParam::Digits(text.to_string())
        } else {
            KindParam::Name(text.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            KindParam::Digits(s) | KindParam::Name(s) => s,
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            KindParam::Name(name) => Some(name),
            KindParam::Digits(_) => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Integer literal; `digits` never carries a sign.
    Int {
        digits: String,
        kind: Option<KindParam>,
    },
    /// Real literal in its source spelling (mantissa and exponent, no kind).
    Real {
        text: String,
        kind: Option<KindParam>,
    },
    /// Character literal with escapes already collapsed.
    Char {
        value: String,
        delimiter: char,
        kind: Option<KindParam>,
    },
    Logical {
        value: bool,
        kind: Option<KindParam>,
    },
}

impl Literal {
    pub fn kind(&self) -> Option<&KindParam> {
        match self {
            Literal::Int { kind, .. }
            | Literal::Real { kind, .. }
            | Literal::Char { kind, .. }
            | Literal::Logical { kind, .. } => kind.as_ref(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Plus,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Concat,
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

impl BinaryOp {
    pub fn symbol(&self) -> &'static str {
        match self {
            BinaryOp::Concat => "//",
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Pow => "**",
        }
    }

    /// Binding power; higher binds tighter.
    pub(crate) fn precedence(&self) -> u8 {
        match self {
            BinaryOp::Concat => 10,
            BinaryOp::Add | BinaryOp::Sub => 20,
            BinaryOp::Mul | BinaryOp::Div => 30,
            BinaryOp::Pow => 40,
        }
    }

    pub(crate) fn is_right_assoc(&self) -> bool {
        matches!(self, BinaryOp::Pow)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CallArg {
    Positional(Expr),
    Keyword { name: String, value: Expr },
}

impl CallArg {
    pub fn value(&self) -> &Expr {
        match self {
            CallArg::Positional(value) | CallArg::Keyword { value, .. } => value,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Literal(Literal),
    Name(String),
    Unary {
        op: UnaryOp,
        operand: Box<Expr>,
    },
    Binary {
        op: BinaryOp,
        lhs: Box<Expr>,
        rhs: Box<Expr>,
    },
    Paren(Box<Expr>),
    /// Parenthesized list with at least two elements, e.g. a complex constant.
    Tuple(Vec<Expr>),
    Call {
        target: String,
        args: Vec<CallArg>,
    },
}

impl Expr {
    /// Target name when this is a call node.
    pub fn call_target(&self) -> Option<&str> {
        match self {
            Expr::Call { target, .. } => Some(target),
            _ => None,
        }
    }

    /// Looks up a keyword argument of a call, or the positional argument at `position`.
    pub fn call_arg(&self, keyword: &str, position: usize) -> Option<&Expr> {
        let Expr::Call { args, .. } = self else {
            return None;
        };
        args.iter()
            .find_map(|arg| match arg {
                CallArg::Keyword { name, value } if name.eq_ignore_ascii_case(keyword) => {
                    Some(value)
                }
                _ => None,
            })
            .or_else(|| match args.get(position) {
                Some(CallArg::Positional(value)) => Some(value),
                _ => None,
            })
    }
}

fn write_kind_suffix(f: &mut fmt::Formatter<'_>, kind: Option<&KindParam>) -> fmt::Result {
    match kind {
        Some(kind) => write!(f, "_{}", kind.as_str()),
        None => Ok(()),
    }
}

impl fmt::Display for Literal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Literal::Int { digits, kind } => {
                f.write_str(digits)?;
                write_kind_suffix(f, kind.as_ref())
            }
            Literal::Real { text, kind } => {
                f.write_str(text)?;
                write_kind_suffix(f, kind.as_ref())
            }
            Literal::Char {
                value,
                delimiter,
                kind,
            } => {
                if let Some(kind) = kind {
                    write!(f, "{}_", kind.as_str())?;
                }
                let doubled = format!("{delimiter}{delimiter}");
                write!(
                    f,
                    "{delimiter}{}{delimiter}",
                    value.replace(*delimiter, &doubled)
                )
            }
            Literal::Logical { value, kind } => {
                f.write_str(if *value { ".true." } else { ".false." })?;
                write_kind_suffix(f, kind.as_ref())
            }
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Literal(lit) => write!(f, "{lit}"),
            Expr::Name(name) => f.write_str(name),
            Expr::Unary { op, operand } => {
                let sign = match op {
                    UnaryOp::Plus => "+",
                    UnaryOp::Minus => "-",
                };
                match operand.as_ref() {
                    Expr::Binary { .. } | Expr::Unary { .. } => write!(f, "{sign}({operand})"),
                    _ => write!(f, "{sign}{operand}"),
                }
            }
            Expr::Binary { op, lhs, rhs } => {
                write_operand(f, lhs)?;
                write!(f, " {} ", op.symbol())?;
                write_operand(f, rhs)
            }
            Expr::Paren(inner) => write!(f, "({inner})"),
            Expr::Tuple(items) => write!(f, "({})", items.iter().join(", ")),
            Expr::Call { target, args } => {
                let mut rendered = args.iter().map(|arg| match arg {
                    CallArg::Positional(value) => value.to_string(),
                    CallArg::Keyword { name, value } => format!("{name}={value}"),
                });
                write!(f, "{target}({})", rendered.join(", "))
            }
        }
    }
}

fn write_operand(f: &mut fmt::Formatter<'_>, operand: &Expr) -> fmt::Result {
    match operand {
        Expr::Binary { .. } | Expr::Unary { .. } => write!(f, "({operand})"),
        _ => write!(f, "{operand}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse;

    #[test]
    fn renders_calls_with_keywords() {
        let expr = parse("integer(kind=kind(0))").unwrap();
        assert_eq!(expr.to_string(), "integer(kind=kind(0))");
    }

    #[test]
    fn renders_nested_binary_with_parens() {
        let expr = parse("a + b * c").unwrap();
        assert_eq!(expr.to_string(), "a + (b * c)");
    }

    #[test]
    fn renders_char_literal_with_escaped_quote() {
        let expr = parse("k_'it''s'").unwrap();
        assert_eq!(expr.to_string(), "k_'it''s'");
    }

    #[test]
    fn finds_keyword_or_positional_arg() {
        let keyword = parse("real(kind=8)").unwrap();
        let positional = parse("real(8)").unwrap();
        assert_eq!(keyword.call_arg("kind", 0).unwrap().to_string(), "8");
        assert_eq!(positional.call_arg("kind", 0).unwrap().to_string(), "8");
        assert!(keyword.call_arg("len", 1).is_none());
    }
}
