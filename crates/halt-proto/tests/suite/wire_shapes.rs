use halt_proto::{JsonBreakpoint, JsonPredicate, PredicateKind};
use pretty_assertions::assert_eq;

#[test]
fn breakpoint_json_has_the_documented_layout() {
    let bp = JsonBreakpoint {
        id: "bp-1".into(),
        chain: vec![JsonPredicate::compound(
            "AND",
            vec![
                JsonPredicate::flat("EVENT_SELECTED", "X00"),
                JsonPredicate::flat("EVENT_NUMBER", "4"),
            ],
        )],
        paused: true,
    };

    assert_eq!(
        serde_json::to_string(&bp).unwrap(),
        concat!(
            r#"{"id":"bp-1","chain":[{"name":"AND","value":"","kind":"compound","predicates":["#,
            r#"{"name":"EVENT_SELECTED","value":"X00","kind":"flat","predicates":[]},"#,
            r#"{"name":"EVENT_NUMBER","value":"4","kind":"flat","predicates":[]}]}],"#,
            r#""paused":true}"#,
        )
    );
}

#[test]
fn breakpoint_without_paused_flag_decodes_as_running() {
    let bp: JsonBreakpoint = serde_json::from_str(
        r#"{"id":"x","chain":[{"name":"EVENT_SELECTED","value":"go","kind":"flat"}]}"#,
    )
    .unwrap();
    assert!(!bp.paused);
    assert_eq!(bp.chain[0].kind, PredicateKind::Flat);
}

#[test]
fn nested_unknown_kind_fails_the_whole_breakpoint() {
    let err = serde_json::from_str::<JsonBreakpoint>(
        r#"{"id":"x","paused":false,"chain":[
            {"name":"AND","value":"","kind":"compound","predicates":[
                {"name":"EVENT_SELECTED","value":"go","kind":"FLAT","predicates":[]}
            ]}
        ]}"#,
    )
    .unwrap_err();
    assert!(err.to_string().contains("unknown variant"), "{err}");
}
