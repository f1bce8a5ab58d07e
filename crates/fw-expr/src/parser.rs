use winnow::error::{ContextError, ErrMode};
use winnow::ModalResult;

use crate::ast::{BinaryOp, CallArg, Expr, UnaryOp};
use crate::error::{ExprError, Result};
use crate::lexer::{self, Symbol, Token, TokenKind};

/// Unary `+`/`-` bind looser than `*` and `**`, so `-a*b` is `-(a*b)`.
const UNARY_OPERAND_PREC: u8 = 30;

pub(crate) fn parse_expression(source: &str) -> Result<Expr> {
    let tokens = lexer::lex(source)?;
    if tokens.is_empty() {
        return Err(ExprError::Empty);
    }
    let mut slice: &[Token] = tokens.as_slice();
    let expr = match parse_expr_prec(&mut slice, 0) {
        Ok(expr) => expr,
        Err(_) => return Err(error_at(source, slice.first(), "expected an operand")),
    };
    if let Some(token) = slice.first() {
        return Err(error_at(
            source,
            Some(token),
            "expected an operator or end of expression",
        ));
    }
    Ok(expr)
}

fn error_at(source: &str, token: Option<&Token>, expected: &str) -> ExprError {
    match token {
        Some(token) => ExprError::Syntax {
            text: source[token.span.start..token.span.end].to_string(),
            src: source.to_string(),
            span: token.span.into(),
            expected: expected.to_string(),
        },
        None => ExprError::UnexpectedEnd {
            src: source.to_string(),
        },
    }
}

fn backtrack_err() -> ErrMode<ContextError> {
    ErrMode::Backtrack(ContextError::new())
}

fn cut_err() -> ErrMode<ContextError> {
    ErrMode::Cut(ContextError::new())
}

fn parse_expr_prec(input: &mut &[Token], min_prec: u8) -> ModalResult<Expr> {
    let mut lhs = parse_unary(input)?;
    loop {
        let Some(op) = peek_binop(input) else {
            break;
        };
        let prec = op.precedence();
        if prec < min_prec {
            break;
        }
        advance(input);
        let next_min = if op.is_right_assoc() { prec } else { prec + 1 };
        let rhs = parse_expr_prec(input, next_min)?;
        lhs = Expr::Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        };
    }
    Ok(lhs)
}

fn parse_unary(input: &mut &[Token]) -> ModalResult<Expr> {
    let op = match peek_symbol(input) {
        Some(Symbol::Plus) => UnaryOp::Plus,
        Some(Symbol::Minus) => UnaryOp::Minus,
        _ => return parse_primary(input),
    };
    advance(input);
    let operand = parse_expr_prec(input, UNARY_OPERAND_PREC)?;
    Ok(Expr::Unary {
        op,
        operand: Box::new(operand),
    })
}

fn parse_primary(input: &mut &[Token]) -> ModalResult<Expr> {
    let Some(token) = input.first() else {
        return Err(backtrack_err());
    };
    match &token.kind {
        TokenKind::Literal(lit) => {
            let expr = Expr::Literal(lit.clone());
            advance(input);
            Ok(expr)
        }
        TokenKind::Name(name) => {
            let name = name.clone();
            advance(input);
            if match_symbol(input, Symbol::LParen) {
                let args = parse_call_args(input)?;
                Ok(Expr::Call { target: name, args })
            } else {
                Ok(Expr::Name(name))
            }
        }
        TokenKind::Symbol(Symbol::LParen) => {
            advance(input);
            let mut items = vec![parse_expr_prec(input, 0)?];
            while match_symbol(input, Symbol::Comma) {
                items.push(parse_expr_prec(input, 0)?);
            }
            expect_symbol(input, Symbol::RParen)?;
            if items.len() == 1 {
                Ok(Expr::Paren(Box::new(items.remove(0))))
            } else {
                Ok(Expr::Tuple(items))
            }
        }
        TokenKind::Symbol(_) => Err(backtrack_err()),
    }
}

/// Arguments after the opening parenthesis, through the closing one.
fn parse_call_args(input: &mut &[Token]) -> ModalResult<Vec<CallArg>> {
    let mut args = Vec::new();
    if match_symbol(input, Symbol::RParen) {
        return Ok(args);
    }
    loop {
        args.push(parse_call_arg(input)?);
        if match_symbol(input, Symbol::Comma) {
            continue;
        }
        expect_symbol(input, Symbol::RParen)?;
        return Ok(args);
    }
}

fn parse_call_arg(input: &mut &[Token]) -> ModalResult<CallArg> {
    if let [Token {
        kind: TokenKind::Name(name),
        ..
    }, Token {
        kind: TokenKind::Symbol(Symbol::Equals),
        ..
    }, ..] = *input
    {
        let name = name.clone();
        advance(input);
        advance(input);
        let value = parse_expr_prec(input, 0)?;
        return Ok(CallArg::Keyword { name, value });
    }
    Ok(CallArg::Positional(parse_expr_prec(input, 0)?))
}

fn peek_symbol(input: &[Token]) -> Option<Symbol> {
    match input.first()?.kind {
        TokenKind::Symbol(symbol) => Some(symbol),
        _ => None,
    }
}

fn peek_binop(input: &[Token]) -> Option<BinaryOp> {
    match peek_symbol(input)? {
        Symbol::Concat => Some(BinaryOp::Concat),
        Symbol::Plus => Some(BinaryOp::Add),
        Symbol::Minus => Some(BinaryOp::Sub),
        Symbol::Star => Some(BinaryOp::Mul),
        Symbol::Slash => Some(BinaryOp::Div),
        Symbol::Power => Some(BinaryOp::Pow),
        _ => None,
    }
}

fn match_symbol(input: &mut &[Token], symbol: Symbol) -> bool {
    if peek_symbol(input) == Some(symbol) {
        advance(input);
        true
    } else {
        false
    }
}

fn expect_symbol(input: &mut &[Token], symbol: Symbol) -> ModalResult<()> {
    if match_symbol(input, symbol) {
        Ok(())
    } else {
        Err(cut_err())
    }
}

fn advance(input: &mut &[Token]) {
    if !input.is_empty() {
        *input = &input[1..];
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::Literal;

    fn name(text: &str) -> Box<Expr> {
        Box::new(Expr::Name(text.to_string()))
    }

    #[test]
    fn power_is_right_associative() {
        let expr = parse_expression("2**3**2").unwrap();
        assert_eq!(expr.to_string(), "2 ** (3 ** 2)");
    }

    #[test]
    fn subtraction_is_left_associative() {
        let expr = parse_expression("a - b - c").unwrap();
        assert_eq!(expr.to_string(), "(a - b) - c");
    }

    #[test]
    fn concat_binds_loosest() {
        let expr = parse_expression("a // b + c").unwrap();
        assert_eq!(
            expr,
            Expr::Binary {
                op: BinaryOp::Concat,
                lhs: name("a"),
                rhs: Box::new(Expr::Binary {
                    op: BinaryOp::Add,
                    lhs: name("b"),
                    rhs: name("c"),
                }),
            }
        );
    }

    #[test]
    fn unary_minus_covers_product() {
        let expr = parse_expression("-a*b + c").unwrap();
        assert_eq!(expr.to_string(), "(-(a * b)) + c");
    }

    #[test]
    fn repeated_unary_signs() {
        let expr = parse_expression("--9").unwrap();
        let Expr::Unary { operand, .. } = expr else {
            panic!("expected unary");
        };
        assert!(matches!(*operand, Expr::Unary { .. }));
    }

    #[test]
    fn parenthesized_pair_is_a_tuple() {
        let expr = parse_expression("(1.0D+0, 0.0D+0)").unwrap();
        assert_eq!(
            expr,
            Expr::Tuple(vec![
                Expr::Literal(Literal::Real {
                    text: "1.0D+0".into(),
                    kind: None
                }),
                Expr::Literal(Literal::Real {
                    text: "0.0D+0".into(),
                    kind: None
                }),
            ])
        );
    }

    #[test]
    fn empty_call_args() {
        let expr = parse_expression("f()").unwrap();
        assert_eq!(
            expr,
            Expr::Call {
                target: "f".into(),
                args: vec![]
            }
        );
    }

    #[test]
    fn empty_source_is_rejected() {
        assert!(matches!(parse_expression("   "), Err(ExprError::Empty)));
    }

    #[test]
    fn lone_star_is_rejected() {
        let err = parse_expression("*").unwrap_err();
        assert_eq!(err.offending_text(), "*");
    }

    #[test]
    fn trailing_token_is_rejected() {
        let err = parse_expression("a b").unwrap_err();
        assert_eq!(err.offending_text(), "b");
    }

    #[test]
    fn missing_operand_reports_end() {
        assert!(matches!(
            parse_expression("a +"),
            Err(ExprError::UnexpectedEnd { .. })
        ));
    }
}
