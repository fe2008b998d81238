
use proptest::prelude::*;
use ruletree::{
    EvalError, ExpressionNode, LogicalOp, attr, combine, combine_with, from_transport, parse,
    to_transport,
};
use strategies::{arb_leaf, arb_record, arb_rule_texts, arb_sparse_record, arb_tree, arb_tree_with_not};

// ---------------------------------------------------------------------------
// Invariant 1: Transport round-trip
//
// Decoding the transport form of any tree yields a structurally equal tree,
// and the decoded tree evaluates identically.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn transport_round_trip(tree in arb_tree_with_not(4)) {
        let value = to_transport(&tree);
        let decoded = from_transport(&value);
        prop_assert_eq!(decoded, Ok(tree));
    }

    #[test]
    fn transport_preserves_evaluation(tree in arb_tree_with_not(4), record in arb_record()) {
        let decoded = from_transport(&to_transport(&tree)).unwrap();
        prop_assert_eq!(decoded.evaluate(&record), tree.evaluate(&record));
    }
}

// ---------------------------------------------------------------------------
// Invariant 2: Rendering re-parses
//
// The parenthesised rendering of a tree parses back to the same tree.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn display_reparses(tree in arb_tree_with_not(4)) {
        let text = tree.to_string();
        let reparsed = parse(&text);
        prop_assert_eq!(reparsed, Ok(tree), "rendered as {}", text);
    }
}

// ---------------------------------------------------------------------------
// Invariant 3: Determinism
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn determinism(tree in arb_tree_with_not(4), record in arb_record()) {
        let first = tree.evaluate(&record);
        for _ in 0..5 {
            prop_assert_eq!(&tree.evaluate(&record), &first);
        }
    }

    #[test]
    fn schema_records_always_evaluate(tree in arb_tree_with_not(4), record in arb_record()) {
        prop_assert!(tree.evaluate(&record).is_ok());
    }
}

// ---------------------------------------------------------------------------
// Invariant 4: Precedence
//
// AND binds tighter than OR, and chains of the same connective group left.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn and_binds_tighter_than_or(a in arb_leaf(), b in arb_leaf(), c in arb_leaf()) {
        let parsed = parse(&format!("{a} OR {b} AND {c}")).unwrap();
        prop_assert_eq!(parsed, a.clone().or(b.clone().and(c.clone())));

        let parsed = parse(&format!("{a} AND {b} OR {c}")).unwrap();
        prop_assert_eq!(parsed, a.and(b).or(c));
    }

    #[test]
    fn chains_group_left(a in arb_leaf(), b in arb_leaf(), c in arb_leaf()) {
        let parsed = parse(&format!("{a} AND {b} AND {c}")).unwrap();
        prop_assert_eq!(parsed, a.clone().and(b.clone()).and(c.clone()));

        let parsed = parse(&format!("{a} or {b} or {c}")).unwrap();
        prop_assert_eq!(parsed, a.or(b).or(c));
    }
}

// ---------------------------------------------------------------------------
// Invariant 5: Combining is a left fold
//
// Combining rules with OR (AND) is true exactly when any (all) of the rules
// are true, and the combined tree is the left fold of the parsed rules.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn combine_is_left_fold(rules in arb_rule_texts()) {
        let combined = combine(&rules).unwrap();
        let folded = rules
            .iter()
            .map(|r| parse(r).unwrap())
            .reduce(ExpressionNode::or)
            .unwrap();
        prop_assert_eq!(combined, folded);
    }

    #[test]
    fn combine_or_is_any(rules in arb_rule_texts(), record in arb_record()) {
        let combined = combine(&rules).unwrap();
        let any = rules
            .iter()
            .map(|r| parse(r).unwrap().evaluate(&record).unwrap())
            .any(|v| v);
        prop_assert_eq!(combined.evaluate(&record), Ok(any));
    }

    #[test]
    fn combine_and_is_all(rules in arb_rule_texts(), record in arb_record()) {
        let combined = combine_with(&rules, LogicalOp::And).unwrap();
        let all = rules
            .iter()
            .map(|r| parse(r).unwrap().evaluate(&record).unwrap())
            .all(|v| v);
        prop_assert_eq!(combined.evaluate(&record), Ok(all));
    }

    #[test]
    fn combine_keeps_every_operand(rules in arb_rule_texts()) {
        let combined = combine(&rules).unwrap();
        let total: usize = rules.iter().map(|r| parse(r).unwrap().operand_count()).sum();
        prop_assert_eq!(combined.operand_count(), total);
    }
}

// ---------------------------------------------------------------------------
// Invariant 6: Short-circuit evaluation
//
// A decided left side hides any error on the right side.
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn decided_left_side_skips_right(tree in arb_tree(3), record in arb_record()) {
        let failing = attr("missing").eq(1);
        let expected_err = Err(EvalError::MissingAttribute { attribute: "missing".into() });
        let left = tree.evaluate(&record).unwrap();

        let or = tree.clone().or(failing.clone()).evaluate(&record);
        let and = tree.and(failing).evaluate(&record);
        if left {
            prop_assert_eq!(or, Ok(true));
            prop_assert_eq!(and, expected_err);
        } else {
            prop_assert_eq!(or, expected_err);
            prop_assert_eq!(and, Ok(false));
        }
    }

    #[test]
    fn errors_name_a_tree_attribute(tree in arb_tree_with_not(3), record in arb_sparse_record()) {
        match tree.evaluate(&record) {
            Ok(_) => {}
            Err(EvalError::MissingAttribute { attribute })
            | Err(EvalError::TypeMismatch { attribute, .. }) => {
                prop_assert!(tree.attributes().contains(attribute.as_str()));
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Invariant 7: Negation laws
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    #[test]
    fn double_negation(tree in arb_tree_with_not(3), record in arb_record()) {
        let doubled = !!tree.clone();
        prop_assert_eq!(doubled.evaluate(&record), tree.evaluate(&record));
    }

    #[test]
    fn de_morgan(a in arb_tree(2), b in arb_tree(2), record in arb_record()) {
        let lhs = !(a.clone().and(b.clone()));
        let rhs = (!a).or(!b);
        prop_assert_eq!(lhs.evaluate(&record), rhs.evaluate(&record));
    }
}
