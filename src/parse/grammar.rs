use std::num::{ParseFloatError, ParseIntError};

use thiserror::Error;
use winnow::ascii::{digit1, multispace0};
use winnow::combinator::{alt, cut_err, not, opt, preceded, repeat, terminated};
use winnow::error::{ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::{any, one_of, take_while};

use crate::{ComparisonOp, ExpressionNode, Literal};

/// Causes attached to grammar failures that are not plain token mismatches.
#[derive(Debug, Error)]
enum GrammarError {
    #[error("nesting exceeds the limit of {max} levels")]
    TooDeep { max: usize },

    #[error("rule tree exceeds the depth limit of {max} levels")]
    TreeTooDeep { max: usize },

    #[error("integer literal out of range: {0}")]
    IntOutOfRange(#[from] ParseIntError),

    #[error("invalid number: {0}")]
    BadFloat(#[from] ParseFloatError),

    #[error("number literal is not finite")]
    NonFinite,
}

/// Limits checked while parsing: parenthesis and `NOT` nesting in the text,
/// and the depth of the tree being built.
#[derive(Debug, Clone, Copy)]
struct Limits {
    nesting: usize,
    max_nesting: usize,
    max_depth: usize,
}

impl Limits {
    fn descend(self) -> Result<Limits, GrammarError> {
        if self.nesting >= self.max_nesting {
            return Err(GrammarError::TooDeep {
                max: self.max_nesting,
            });
        }
        Ok(Limits {
            nesting: self.nesting + 1,
            ..self
        })
    }

    /// Depth of a new node whose deepest child is `child_depth` levels deep.
    fn parent_depth(self, child_depth: usize) -> Result<usize, GrammarError> {
        let depth = child_depth + 1;
        if depth > self.max_depth {
            return Err(GrammarError::TreeTooDeep {
                max: self.max_depth,
            });
        }
        Ok(depth)
    }
}

fn expected(description: &'static str) -> StrContext {
    StrContext::Expected(StrContextValue::Description(description))
}

// -- Whitespace & keywords --------------------------------------------------

fn ws(input: &mut &str) -> ModalResult<()> {
    multispace0.void().parse_next(input)
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '.'
}

/// A keyword in upper or lower case that is not the prefix of an identifier.
fn keyword(upper: &'static str, lower: &'static str) -> impl FnMut(&mut &str) -> ModalResult<()> {
    move |input: &mut &str| {
        terminated(alt((upper, lower)), not(one_of(is_ident_char)))
            .void()
            .parse_next(input)
    }
}

// -- Identifiers ------------------------------------------------------------

fn ident<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        take_while(1, |c: char| c.is_ascii_alphabetic() || c == '_'),
        take_while(0.., is_ident_char),
    )
        .take()
        .parse_next(input)
}

// -- Literals ---------------------------------------------------------------

fn string_literal(input: &mut &str) -> ModalResult<String> {
    let quote = one_of(['"', '\'']).parse_next(input)?;
    let mut s = String::new();
    loop {
        let ch = cut_err(any)
            .context(expected("closing quote"))
            .parse_next(input)?;
        match ch {
            c if c == quote => return Ok(s),
            '\\' => {
                let esc = cut_err(any)
                    .context(expected("escape sequence"))
                    .parse_next(input)?;
                match esc {
                    'n' => s.push('\n'),
                    't' => s.push('\t'),
                    '"' | '\'' | '\\' => s.push(esc),
                    other => {
                        s.push('\\');
                        s.push(other);
                    }
                }
            }
            c => s.push(c),
        }
    }
}

fn number_token<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    (
        opt('-'),
        digit1,
        opt(('.', digit1)),
        opt((one_of(['e', 'E']), opt(one_of(['+', '-'])), digit1)),
    )
        .take()
        .parse_next(input)
}

fn number_value(text: &str) -> Result<Literal, GrammarError> {
    if text.contains(['.', 'e', 'E']) {
        let f: f64 = text.parse()?;
        if !f.is_finite() {
            return Err(GrammarError::NonFinite);
        }
        Ok(Literal::Float(f))
    } else {
        Ok(Literal::Int(text.parse()?))
    }
}

fn literal(input: &mut &str) -> ModalResult<Literal> {
    alt((
        string_literal.map(Literal::String),
        keyword("true", "TRUE").value(Literal::Bool(true)),
        keyword("false", "FALSE").value(Literal::Bool(false)),
        terminated(number_token, not(one_of(is_ident_char))).try_map(number_value),
    ))
    .parse_next(input)
}

// -- Comparison operators ---------------------------------------------------

fn comparison_op(input: &mut &str) -> ModalResult<ComparisonOp> {
    alt((
        ">=".value(ComparisonOp::Gte),
        ">".value(ComparisonOp::Gt),
        "<=".value(ComparisonOp::Lte),
        "<".value(ComparisonOp::Lt),
        "==".value(ComparisonOp::Eq),
        "!=".value(ComparisonOp::Neq),
    ))
    .parse_next(input)
}

// -- Expressions (precedence: OR < AND < NOT < primary) ---------------------

fn comparison(input: &mut &str) -> ModalResult<ExpressionNode> {
    let attribute = ident
        .context(expected("attribute name or `(`"))
        .parse_next(input)?;
    ws.parse_next(input)?;
    let operator = cut_err(comparison_op)
        .context(expected("comparison operator (==, !=, <, <=, >, >=)"))
        .parse_next(input)?;
    ws.parse_next(input)?;
    let literal = cut_err(literal)
        .context(expected("literal (number, quoted string, true or false)"))
        .parse_next(input)?;
    Ok(ExpressionNode::Operand {
        attribute: attribute.to_owned(),
        operator,
        literal,
    })
}

fn descend(input: &mut &str, limits: Limits) -> ModalResult<Limits> {
    cut_err("".try_map(|_: &str| limits.descend())).parse_next(input)
}

fn primary(input: &mut &str, limits: Limits) -> ModalResult<ExpressionNode> {
    ws.parse_next(input)?;
    if opt('(').parse_next(input)?.is_some() {
        let inner = descend(input, limits)?;
        let node = cut_err(|i: &mut &str| expr(i, inner)).parse_next(input)?;
        ws.parse_next(input)?;
        cut_err(')')
            .context(StrContext::Expected(StrContextValue::CharLiteral(')')))
            .parse_next(input)?;
        return Ok(node);
    }
    comparison(input)
}

fn unary(input: &mut &str, limits: Limits) -> ModalResult<ExpressionNode> {
    ws.parse_next(input)?;
    if opt(keyword("NOT", "not")).parse_next(input)?.is_some() {
        let inner = descend(input, limits)?;
        let node = cut_err(|i: &mut &str| unary(i, inner)).parse_next(input)?;
        let child_depth = node.depth();
        cut_err("".try_map(|_: &str| limits.parent_depth(child_depth))).parse_next(input)?;
        return Ok(!node);
    }
    primary(input, limits)
}

// A chain folds left, so every extra term adds a level above the deepest one
// so far. The running depth is checked per term so that an overlong chain
// fails at the connective that crosses the limit.

fn and_expr(input: &mut &str, limits: Limits) -> ModalResult<ExpressionNode> {
    let first = unary(input, limits)?;
    let mut depth = first.depth();
    let rest: Vec<ExpressionNode> = cut_err(
        repeat(
            0..,
            preceded(
                (ws, keyword("AND", "and")),
                cut_err(|i: &mut &str| unary(i, limits)),
            ),
        )
        .try_fold(
            Vec::new,
            |mut terms: Vec<ExpressionNode>,
             term: ExpressionNode|
             -> Result<Vec<ExpressionNode>, GrammarError> {
                depth = limits.parent_depth(depth.max(term.depth()))?;
                terms.push(term);
                Ok(terms)
            },
        ),
    )
    .parse_next(input)?;
    Ok(rest.into_iter().fold(first, ExpressionNode::and))
}

fn or_expr(input: &mut &str, limits: Limits) -> ModalResult<ExpressionNode> {
    let first = and_expr(input, limits)?;
    let mut depth = first.depth();
    let rest: Vec<ExpressionNode> = cut_err(
        repeat(
            0..,
            preceded(
                (ws, keyword("OR", "or")),
                cut_err(|i: &mut &str| and_expr(i, limits)),
            ),
        )
        .try_fold(
            Vec::new,
            |mut terms: Vec<ExpressionNode>,
             term: ExpressionNode|
             -> Result<Vec<ExpressionNode>, GrammarError> {
                depth = limits.parent_depth(depth.max(term.depth()))?;
                terms.push(term);
                Ok(terms)
            },
        ),
    )
    .parse_next(input)?;
    Ok(rest.into_iter().fold(first, ExpressionNode::or))
}

fn expr(input: &mut &str, limits: Limits) -> ModalResult<ExpressionNode> {
    ws.parse_next(input)?;
    or_expr(input, limits)
}

// -- Top-level parser -------------------------------------------------------

/// A complete rule: one expression with optional surrounding whitespace.
pub(crate) fn rule(
    input: &mut &str,
    max_nesting: usize,
    max_depth: usize,
) -> ModalResult<ExpressionNode> {
    let node = expr(
        input,
        Limits {
            nesting: 0,
            max_nesting,
            max_depth,
        },
    )?;
    ws.parse_next(input)?;
    Ok(node)
}
