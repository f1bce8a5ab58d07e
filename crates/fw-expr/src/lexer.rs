use miette::SourceSpan;
use winnow::ascii::{digit0, digit1, Caseless};
use winnow::combinator::{alt, opt, preceded};
use winnow::error::{ContextError, ErrMode};
use winnow::token::{literal, one_of, take_while};
use winnow::{ModalResult, Parser};

use crate::ast::{KindParam, Literal};
use crate::error::{ExprError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Symbol {
    Power,
    Concat,
    Plus,
    Minus,
    Star,
    Slash,
    LParen,
    RParen,
    Comma,
    Equals,
}

/// Longest spellings first so `**` wins over `*`.
const SYMBOLS: &[(&str, Symbol)] = &[
    ("**", Symbol::Power),
    ("//", Symbol::Concat),
    ("+", Symbol::Plus),
    ("-", Symbol::Minus),
    ("*", Symbol::Star),
    ("/", Symbol::Slash),
    ("(", Symbol::LParen),
    (")", Symbol::RParen),
    (",", Symbol::Comma),
    ("=", Symbol::Equals),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Span {
    pub start: usize,
    pub end: usize,
}

impl From<Span> for SourceSpan {
    fn from(span: Span) -> Self {
        (span.start, span.end - span.start).into()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum TokenKind {
    Name(String),
    Literal(Literal),
    Symbol(Symbol),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

pub(crate) fn lex(source: &str) -> Result<Vec<Token>> {
    let mut input = source;
    let mut tokens = Vec::new();
    loop {
        ws.parse_next(&mut input)
            .map_err(|_| lex_error(source, source.len() - input.len()))?;
        if input.is_empty() {
            break;
        }
        let start = source.len() - input.len();
        let kind = token
            .parse_next(&mut input)
            .map_err(|_| lex_error(source, start))?;
        let end = source.len() - input.len();
        tokens.push(Token {
            kind,
            span: Span { start, end },
        });
    }
    Ok(tokens)
}

fn lex_error(source: &str, start: usize) -> ExprError {
    let rest = &source[start..];
    let len = rest
        .find(char::is_whitespace)
        .unwrap_or(rest.len())
        .max(rest.chars().next().map_or(0, char::len_utf8));
    ExprError::Lex {
        text: rest[..len].to_string(),
        src: source.to_string(),
        span: (start, len).into(),
    }
}

fn ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., char::is_whitespace)
        .map(|_| ())
        .parse_next(input)
}

fn token(input: &mut &str) -> ModalResult<TokenKind> {
    alt((char_literal, logical_literal, number, name, symbol)).parse_next(input)
}

fn is_name_start(ch: char) -> bool {
    ch.is_ascii_alphabetic()
}

fn is_name_continue(ch: char) -> bool {
    ch == '_' || ch.is_ascii_alphanumeric()
}

fn backtrack_err() -> ErrMode<ContextError> {
    ErrMode::Backtrack(ContextError::new())
}

/// `_8` or `_dp` after a numeric or logical literal.
fn kind_suffix(input: &mut &str) -> ModalResult<KindParam> {
    preceded(literal("_"), take_while(1.., is_name_continue))
        .map(KindParam::from_text)
        .parse_next(input)
}

/// `8_` or `dp_` directly in front of a character literal.
fn kind_prefix(input: &mut &str) -> ModalResult<KindParam> {
    let text = take_while(1.., is_name_continue).parse_next(input)?;
    match text.strip_suffix('_') {
        Some(stripped) if !stripped.is_empty() && input.starts_with(['\'', '"']) => {
            Ok(KindParam::from_text(stripped))
        }
        _ => Err(backtrack_err()),
    }
}

fn char_literal(input: &mut &str) -> ModalResult<TokenKind> {
    let mut rest = *input;
    let kind = opt(kind_prefix).parse_next(&mut rest)?;
    let delimiter = one_of(['\'', '"']).parse_next(&mut rest)?;
    let mut value = String::new();
    loop {
        let mut chars = rest.chars();
        match chars.next() {
            None => return Err(ErrMode::Cut(ContextError::new())),
            Some(ch) if ch == delimiter => {
                if chars.next() == Some(delimiter) {
                    value.push(delimiter);
                    rest = &rest[2 * ch.len_utf8()..];
                } else {
                    rest = &rest[ch.len_utf8()..];
                    break;
                }
            }
            Some(ch) => {
                value.push(ch);
                rest = &rest[ch.len_utf8()..];
            }
        }
    }
    *input = rest;
    Ok(TokenKind::Literal(Literal::Char {
        value,
        delimiter,
        kind,
    }))
}

fn logical_literal(input: &mut &str) -> ModalResult<TokenKind> {
    let value = alt((
        literal(Caseless(".true.")).value(true),
        literal(Caseless(".false.")).value(false),
    ))
    .parse_next(input)?;
    let kind = opt(kind_suffix).parse_next(input)?;
    Ok(TokenKind::Literal(Literal::Logical { value, kind }))
}

fn exponent<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (one_of(['e', 'E', 'd', 'D']), opt(one_of(['+', '-'])), digit1)
        .take()
        .parse_next(input)
}

fn number(input: &mut &str) -> ModalResult<TokenKind> {
    let start = *input;
    let int_part = opt(digit1).parse_next(input)?;
    let fraction = if int_part.is_some() {
        opt(preceded(literal("."), digit0)).parse_next(input)?
    } else {
        Some(preceded(literal("."), digit1).parse_next(input)?)
    };
    let exp = opt(exponent).parse_next(input)?;
    let text = start[..start.len() - input.len()].to_string();
    let kind = opt(kind_suffix).parse_next(input)?;
    let lit = if fraction.is_some() || exp.is_some() {
        Literal::Real { text, kind }
    } else {
        Literal::Int { digits: text, kind }
    };
    Ok(TokenKind::Literal(lit))
}

fn name(input: &mut &str) -> ModalResult<TokenKind> {
    (
        take_while(1..=1, is_name_start),
        take_while(0.., is_name_continue),
    )
        .take()
        .map(|text: &str| TokenKind::Name(text.to_string()))
        .parse_next(input)
}

fn symbol(input: &mut &str) -> ModalResult<TokenKind> {
    for (text, symbol) in SYMBOLS {
        if let Some(rest) = input.strip_prefix(text) {
            *input = rest;
            return Ok(TokenKind::Symbol(*symbol));
        }
    }
    Err(backtrack_err())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        lex(source)
            .unwrap()
            .into_iter()
            .map(|token| token.kind)
            .collect()
    }

    #[test]
    fn lexes_signed_int_with_kinds() {
        let tokens = kinds("+310130813080138_8 + 10_abc");
        assert_eq!(
            tokens,
            vec![
                TokenKind::Symbol(Symbol::Plus),
                TokenKind::Literal(Literal::Int {
                    digits: "310130813080138".into(),
                    kind: Some(KindParam::Digits("8".into())),
                }),
                TokenKind::Symbol(Symbol::Plus),
                TokenKind::Literal(Literal::Int {
                    digits: "10".into(),
                    kind: Some(KindParam::Name("abc".into())),
                }),
            ]
        );
    }

    #[test]
    fn lexes_reals_with_dots_and_d_exponent() {
        let tokens = kinds(".5 1. -.9D3_D__3");
        assert_eq!(
            tokens[0],
            TokenKind::Literal(Literal::Real {
                text: ".5".into(),
                kind: None
            })
        );
        assert_eq!(
            tokens[1],
            TokenKind::Literal(Literal::Real {
                text: "1.".into(),
                kind: None
            })
        );
        assert_eq!(
            tokens[3],
            TokenKind::Literal(Literal::Real {
                text: ".9D3".into(),
                kind: Some(KindParam::Name("D__3".into())),
            })
        );
    }

    #[test]
    fn exponent_letter_without_digits_is_a_name() {
        let tokens = kinds("2*E");
        assert_eq!(tokens[2], TokenKind::Name("E".into()));
    }

    #[test]
    fn lexes_prefixed_char_literals() {
        let tokens = kinds("aoeu_'1202\"04''028'");
        assert_eq!(
            tokens,
            vec![TokenKind::Literal(Literal::Char {
                value: "1202\"04'028".into(),
                delimiter: '\'',
                kind: Some(KindParam::Name("aoeu".into())),
            })]
        );

        let tokens = kinds("1_\"as \"\"onthu'sanetu\"");
        assert_eq!(
            tokens,
            vec![TokenKind::Literal(Literal::Char {
                value: "as \"onthu'sanetu".into(),
                delimiter: '"',
                kind: Some(KindParam::Digits("1".into())),
            })]
        );
    }

    #[test]
    fn lexes_logical_literal() {
        let tokens = kinds(".TRUE._lk");
        assert_eq!(
            tokens,
            vec![TokenKind::Literal(Literal::Logical {
                value: true,
                kind: Some(KindParam::Name("lk".into())),
            })]
        );
    }

    #[test]
    fn rejects_unterminated_string() {
        let err = lex("'abc").unwrap_err();
        assert_eq!(err.offending_text(), "'abc");
    }

    #[test]
    fn rejects_unknown_character() {
        let err = lex("a $ b").unwrap_err();
        assert_eq!(err.offending_text(), "$");
    }
}
