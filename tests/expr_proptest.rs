//! Property-based tests over generated canonical expressions
//!
//! Generated text is always canonically spaced and every node name classifies, so the
//! parser, the serializer and both transducers must reproduce it exactly.

use pdf_asdl::pdf::expr::parse_line;
use pdf_asdl::pdf::grammar::Grammar;
use pdf_asdl::pdf::transition::{PdfTransitionSystem, TransitionSystem, HEADER_KEYWORDS};
use proptest::prelude::*;

fn render(head: String, children: Vec<String>) -> String {
    let mut text = format!("( {head}");
    for child in children {
        text.push(' ');
        text.push_str(&child);
    }
    text.push_str(" )");
    text
}

/// Leaf tokens that convert to a variable or a reference
///
/// Payloads avoid spelling a header keyword after the prefix (`SubType`, `Range`).
fn leaf_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "S([a-z0-9][A-Za-z0-9]{0,5})?",
        "I-?[0-9]{1,4}",
        "H[A-Za-z]{1,6}",
        "R[0-9]{1,3}",
    ]
}

fn header_strategy() -> impl Strategy<Value = String> {
    prop::sample::select(HEADER_KEYWORDS.to_vec()).prop_map(str::to_string)
}

fn objective_name_strategy() -> impl Strategy<Value = String> {
    "obj[0-9]{1,3}"
}

fn expr_strategy() -> impl Strategy<Value = String> {
    leaf_strategy().prop_recursive(4, 48, 4, |inner| {
        (
            prop_oneof![header_strategy(), objective_name_strategy()],
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(head, children)| render(head, children))
    })
}

/// A corpus record: always an objective at the root
fn record_strategy() -> impl Strategy<Value = String> {
    (
        objective_name_strategy(),
        prop::collection::vec(expr_strategy(), 0..5),
    )
        .prop_map(|(head, children)| render(head, children))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(50))]

    #[test]
    fn parse_then_serialize_is_identity(text in expr_strategy()) {
        let tree = parse_line(&text).unwrap();
        prop_assert_eq!(tree.to_text(), text);
    }

    #[test]
    fn surface_ast_surface_is_identity(text in record_strategy()) {
        let system = PdfTransitionSystem::new(Grammar::pdf());
        let ast = system.surface_code_to_ast(&text).unwrap();
        prop_assert_eq!(system.ast_to_surface_code(&ast).unwrap(), text.clone());

        let again = system.surface_code_to_ast(&text).unwrap();
        prop_assert!(system.compare_ast(&ast, &again));
        prop_assert!(system.compare_ast(&again, &ast));
    }

    #[test]
    fn tokens_rejoin_to_record(text in record_strategy()) {
        let system = PdfTransitionSystem::new(Grammar::pdf());
        prop_assert_eq!(system.tokenize_code(&text).join(" "), text);
    }

    #[test]
    fn equal_text_means_equal_structural_hash(text in expr_strategy()) {
        let a = parse_line(&text).unwrap();
        let b = parse_line(&text).unwrap();
        prop_assert_eq!(a.root().structural_hash(), b.root().structural_hash());
        prop_assert_eq!(a, b);
    }

    #[test]
    fn arbitrary_input_never_panics(text in "\\PC{0,40}") {
        let system = PdfTransitionSystem::new(Grammar::pdf());
        let _ = system.surface_code_to_ast(&text);
    }

    #[test]
    fn parenthesis_soup_never_panics(text in "[() a-zA-Z0-9]{0,40}") {
        let _ = parse_line(&text);
    }
}
