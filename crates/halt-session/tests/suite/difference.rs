use halt_proto::{JsonPredicate, DIFFERENCE_BREAKPOINT_ID};
use halt_session::{DebugSession, SessionError};
use pretty_assertions::assert_eq;

fn record(session: &mut DebugSession, id: u64, selected: &str) {
    session
        .apply_json(&format!(
            r#"{{"type":"trace","selected":"{selected}","id":{id},"parameters":{{}}}}"#
        ))
        .unwrap();
}

#[test]
fn exported_traces_become_the_reference_of_the_next_run() {
    let mut first_run = DebugSession::new();
    record(&mut first_run, 0, "X00");
    record(&mut first_run, 1, "O11");
    record(&mut first_run, 2, "X22");
    let export = first_run.export_traces().unwrap();

    let mut second_run = DebugSession::new();
    let imported = second_run.import_traces(&export).unwrap();
    assert_eq!(
        imported.iter().map(|t| t.selected.as_str()).collect::<Vec<_>>(),
        ["X00", "O11", "X22"]
    );

    record(&mut second_run, 0, "X00");
    let bp = second_run.stop_if_different();
    assert_eq!(bp.id, DIFFERENCE_BREAKPOINT_ID);
    assert_eq!(bp.current_position, 1);
    assert_eq!(
        bp.chain,
        vec![
            JsonPredicate::flat("EVENT_SELECTED", "X00"),
            JsonPredicate::flat("EVENT_SELECTED", "O11"),
            JsonPredicate::flat("EVENT_SELECTED", "X22"),
        ]
    );
}

#[test]
fn import_orders_by_numeric_id() {
    let export = r#"{
        "10": {"selected":"late","id":10,"parameters":{}},
        "2": {"selected":"early","id":2,"parameters":{}}
    }"#;
    let mut session = DebugSession::new();
    let imported = session.import_traces(export).unwrap();
    assert_eq!(
        imported.iter().map(|t| t.id).collect::<Vec<_>>(),
        [2, 10]
    );
    assert_eq!(session.reference_traces().len(), 2);
}

#[test]
fn malformed_export_is_rejected() {
    let mut session = DebugSession::new();
    let err = session.import_traces("[1, 2, 3]").unwrap_err();
    assert!(matches!(err, SessionError::TraceExport(_)), "{err}");
    assert!(session.reference_traces().is_empty());
}

#[test]
fn difference_breakpoint_wire_shape() {
    let mut session = DebugSession::new();
    session.import_traces(r#"{"0":{"selected":"A","id":0,"parameters":{}}}"#).unwrap();
    let json = serde_json::to_value(session.stop_if_different()).unwrap();
    assert_eq!(
        json,
        serde_json::json!({
            "id": "0",
            "current_position": 0,
            "chain": [
                {"name": "EVENT_SELECTED", "value": "A", "kind": "flat", "predicates": []}
            ],
        })
    );
}
