use std::sync::Arc;

use halt_breakpoints::{
    decode_breakpoint, encode_breakpoint, Breakpoint, BreakpointBuilder, Predicate,
    PredicateBuilder, PredicateCatalog,
};
use halt_proto::JsonPredicate;
use proptest::prelude::*;

const FLAT_NAMES: &[&str] = &[
    "EVENT_SELECTED",
    "EVENT_REQUESTED",
    "EVENT_BLOCKED",
    "EVENT_NUMBER",
];
const COMPOUND_NAMES: &[&str] = &["AND", "OR"];

/// Predicate trees whose names agree with the built-in catalog.
fn predicate() -> impl Strategy<Value = Predicate> {
    let leaf = (prop::sample::select(FLAT_NAMES), "[ -~]{0,12}")
        .prop_map(|(name, content)| Predicate::flat(name, content));
    leaf.prop_recursive(4, 48, 5, |inner| {
        (
            prop::sample::select(COMPOUND_NAMES),
            prop::collection::vec(inner, 0..5),
        )
            .prop_map(|(name, children)| Predicate::compound(name, children))
    })
}

fn breakpoint() -> impl Strategy<Value = Breakpoint> {
    (
        "[a-z0-9-]{1,36}",
        prop::collection::vec(predicate(), 0..4),
        any::<bool>(),
    )
        .prop_map(|(id, chain, paused)| Breakpoint::new(id.into(), chain, paused))
}

proptest! {
    #[test]
    fn predicate_survives_wire_encoding(tree in predicate()) {
        let json = serde_json::to_string(&tree.to_wire()).unwrap();
        let decoded: JsonPredicate = serde_json::from_str(&json).unwrap();
        prop_assert_eq!(Predicate::from_wire(&decoded), tree);
    }

    #[test]
    fn breakpoint_survives_wire_encoding(bp in breakpoint()) {
        let decoded = decode_breakpoint(&encode_breakpoint(&bp).unwrap()).unwrap();
        prop_assert_eq!(decoded.id(), bp.id());
        prop_assert_eq!(decoded.is_paused(), bp.is_paused());
        prop_assert_eq!(decoded.chain(), bp.chain());
    }

    #[test]
    fn hydrate_then_compile_is_identity(tree in predicate()) {
        let builder = PredicateBuilder::from_predicate(Arc::new(PredicateCatalog::builtin()), &tree);
        prop_assert_eq!(builder.compile(), tree);
    }

    #[test]
    fn breakpoint_builder_preserves_chain(bp in breakpoint()) {
        let builder = BreakpointBuilder::from_breakpoint(Arc::new(PredicateCatalog::builtin()), &bp);
        let compiled = builder.compile();
        prop_assert_eq!(compiled.chain(), bp.chain());
        prop_assert_ne!(compiled.id(), bp.id());
    }
}
