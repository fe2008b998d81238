use proptest::prelude::*;
use ruletree::{ComparisonOp, EvalError, Literal, Record, attr, parse};

/// Generate a random `Literal`.
fn arb_literal() -> impl Strategy<Value = Literal> {
    prop_oneof![
        any::<i64>().prop_map(Literal::Int),
        any::<f64>()
            .prop_filter("must be finite", |f| f.is_finite())
            .prop_map(Literal::Float),
        any::<bool>().prop_map(Literal::Bool),
        "[a-zA-Z ]{0,8}".prop_map(Literal::String),
    ]
}

/// Generate an attribute name from a small alphabet to increase collisions.
fn arb_attribute() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("x".to_owned()),
        Just("y".to_owned()),
        Just("user.age".to_owned()),
        Just("user_name".to_owned()),
    ]
}

const TOKENS: &[&str] = &[
    "age", ">", ">=", "==", "!=", "30", "'x'", "true", "AND", "OR", "NOT", "(", ")",
];

fn arb_op() -> impl Strategy<Value = ComparisonOp> {
    prop::sample::select(ComparisonOp::ALL.to_vec())
}

fn same_kind(a: &Literal, b: &Literal) -> bool {
    matches!(
        (a, b),
        (Literal::Int(_) | Literal::Float(_), Literal::Int(_) | Literal::Float(_))
            | (Literal::String(_), Literal::String(_))
            | (Literal::Bool(_), Literal::Bool(_))
    )
}

proptest! {
    /// Evaluation never panics; it either decides or reports a typed error.
    #[test]
    fn eval_never_panics(
        attribute in arb_attribute(),
        op in arb_op(),
        literal in arb_literal(),
        value in arb_literal(),
    ) {
        let tree = attr(&attribute).compare(op, literal.clone());
        let record = Record::new().set(&attribute, value.clone());
        match tree.evaluate(&record) {
            Ok(_) => prop_assert!(same_kind(&value, &literal)),
            Err(EvalError::TypeMismatch { attribute: a, actual, .. }) => {
                prop_assert_eq!(a, attribute);
                prop_assert_eq!(actual, value.type_name());
            }
            Err(other) => prop_assert!(false, "unexpected error {other:?}"),
        }
    }

    /// Incompatible types never compare silently.
    #[test]
    fn mismatched_types_are_errors(
        op in arb_op(),
        literal in arb_literal(),
        value in arb_literal(),
    ) {
        prop_assume!(!same_kind(&value, &literal));
        let tree = attr("x").compare(op, literal);
        let record = Record::new().set("x", value);
        let is_mismatch = matches!(tree.evaluate(&record), Err(EvalError::TypeMismatch { .. }));
        prop_assert!(is_mismatch);
    }

    /// `==` and `!=` are complements wherever they are defined.
    #[test]
    fn eq_neq_complement(literal in arb_literal(), value in arb_literal()) {
        let eq = value.compare(ComparisonOp::Eq, &literal);
        let neq = value.compare(ComparisonOp::Neq, &literal);
        prop_assert_eq!(eq.map(|b| !b), neq);
    }

    /// Integer comparisons agree with Rust's ordering on `i64`.
    #[test]
    fn int_ordering_matches_i64(a in any::<i64>(), b in any::<i64>()) {
        let record = Record::new().set("x", a);
        prop_assert_eq!(attr("x").gt(b).evaluate(&record), Ok(a > b));
        prop_assert_eq!(attr("x").gte(b).evaluate(&record), Ok(a >= b));
        prop_assert_eq!(attr("x").lt(b).evaluate(&record), Ok(a < b));
        prop_assert_eq!(attr("x").lte(b).evaluate(&record), Ok(a <= b));
    }

    /// String ordering is lexicographic.
    #[test]
    fn string_ordering_is_lexicographic(a in "[a-zA-Z]{0,6}", b in "[a-zA-Z]{0,6}") {
        let record = Record::new().set("s", a.as_str());
        prop_assert_eq!(attr("s").lt(b.as_str()).evaluate(&record), Ok(a < b));
        prop_assert_eq!(attr("s").eq(b.as_str()).evaluate(&record), Ok(a == b));
    }

    /// Booleans support equality only.
    #[test]
    fn bool_ordering_is_rejected(a in any::<bool>(), b in any::<bool>(), op in arb_op()) {
        let record = Record::new().set("flag", a);
        let result = attr("flag").compare(op, b).evaluate(&record);
        if op.is_ordering() {
            let is_mismatch = matches!(result, Err(EvalError::TypeMismatch { .. }));
            prop_assert!(is_mismatch);
        } else {
            prop_assert_eq!(result, Ok((op == ComparisonOp::Eq) == (a == b)));
        }
    }

    /// The parser never panics, whatever the input.
    #[test]
    fn parse_never_panics(input in "\\PC{0,40}") {
        let _ = parse(&input);
    }

    /// Inputs built from rule tokens either parse or fail with a position
    /// inside the input.
    #[test]
    fn token_soup_positions_in_range(
        tokens in prop::collection::vec(
            prop::sample::select(TOKENS),
            0..12,
        )
    ) {
        let input = tokens.join(" ");
        if let Err(err) = parse(&input) {
            prop_assert!(err.position() <= input.len());
        }
    }
}
