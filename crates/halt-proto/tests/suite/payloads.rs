use halt_proto::{
    decode_payload, encode_payload, EnginePayload, InfoPayload, ParameterValue, StateInfo,
};
use pretty_assertions::assert_eq;

#[test]
fn decodes_initial_payload() {
    let payload = decode_payload(
        r#"{"type":"initial","timeout":0.5,"running":false,
            "parameters":{"water_level":{"value":10,"editable":true,"unit":"l"}}}"#,
    )
    .unwrap();

    let EnginePayload::Initial(initial) = payload else {
        panic!("expected initial payload, got {payload:?}");
    };
    assert_eq!(initial.timeout, 0.5);
    assert!(!initial.running);
    let level = &initial.parameters["water_level"];
    assert!(level.editable);
    assert_eq!(level.unit, "l");
    assert!(matches!(level.value, ParameterValue::Number(_)));
}

#[test]
fn decodes_info_payload_with_fired_breakpoints() {
    let payload = decode_payload(
        r#"{"type":"info","paused":true,"ended":false,"breakpoint_ids":["a","b"]}"#,
    )
    .unwrap();
    assert_eq!(
        payload,
        EnginePayload::Info(InfoPayload {
            paused: true,
            ended: false,
            breakpoint_ids: vec!["a".into(), "b".into()],
        })
    );
    assert_eq!(payload.kind(), "info");
}

#[test]
fn trace_payload_keeps_thread_states_and_timestamp() {
    let payload = decode_payload(
        r#"{"type":"trace","selected":"X00","id":7,"datetime":1712.5,
            "parameters":{},
            "b_thread_info":[{"name":"enforce_turns","priority":0,
                              "request":[],"wait_for":["X00","X01"],"block":["O00"]}]}"#,
    )
    .unwrap();

    let EnginePayload::Trace(trace) = payload else {
        panic!("expected trace payload");
    };
    assert_eq!(trace.selected, "X00");
    assert_eq!(trace.id, 7);
    assert_eq!(trace.datetime, Some(1712.5));
    assert_eq!(
        trace.states,
        vec![StateInfo {
            name: "enforce_turns".into(),
            request: Vec::new(),
            wait_for: vec!["X00".into(), "X01".into()],
            block: vec!["O00".into()],
            priority: 0,
        }]
    );
}

#[test]
fn trace_without_thread_states_encodes_the_client_shape() {
    let payload = decode_payload(r#"{"type":"trace","selected":"go","id":0,"parameters":{}}"#)
        .unwrap();
    let encoded: serde_json::Value =
        serde_json::from_str(&encode_payload(&payload).unwrap()).unwrap();
    assert_eq!(
        encoded,
        serde_json::json!({"type": "trace", "selected": "go", "id": 0, "parameters": {}})
    );
}

#[test]
fn rejects_payload_missing_required_fields() {
    assert!(decode_payload(r#"{"type":"info","paused":true}"#).is_err());
    assert!(decode_payload("not json").is_err());
}
