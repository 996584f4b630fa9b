use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::MAX_PAYLOAD_BYTES;

#[derive(Debug, Error)]
pub enum ProtoError {
    #[error("payload of {len} bytes exceeds the {max} byte limit")]
    TooLarge { len: usize, max: usize },
    #[error("malformed payload: {0}")]
    Json(#[from] serde_json::Error),
}

/// Value of a program parameter as reported by the engine.
///
/// Variant order matters for untagged decoding: booleans and numbers must be
/// tried before the string fallback.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum ParameterValue {
    Bool(bool),
    Number(serde_json::Number),
    Text(String),
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct Parameter {
    pub value: ParameterValue,
    pub editable: bool,
    pub unit: String,
}

/// Program parameters keyed by name, in the order the engine reported them.
pub type ParameterInfo = IndexMap<String, Parameter>;

/// Engine-side descriptor of one behavior thread's synchronisation state.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StateInfo {
    pub name: String,
    #[serde(default)]
    pub request: Vec<String>,
    #[serde(default)]
    pub wait_for: Vec<String>,
    #[serde(default)]
    pub block: Vec<String>,
    #[serde(default)]
    pub priority: i64,
}

/// Sent once when the client attaches to a session.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct InitialPayload {
    pub timeout: f64,
    pub parameters: ParameterInfo,
    pub running: bool,
}

/// Running status plus the breakpoints whose condition matched.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct InfoPayload {
    pub paused: bool,
    pub ended: bool,
    pub breakpoint_ids: Vec<String>,
}

/// A single state transition: the event the engine selected at step `id`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct TracePayload {
    pub selected: String,
    pub id: u64,
    pub parameters: ParameterInfo,
    #[serde(
        rename = "b_thread_info",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub states: Vec<StateInfo>,
    /// Engine wall-clock time of the step, in seconds since the Unix epoch.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datetime: Option<f64>,
}

/// Any message streamed from the engine to the client, discriminated by `type`.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EnginePayload {
    Initial(InitialPayload),
    Info(InfoPayload),
    Trace(TracePayload),
}

impl EnginePayload {
    /// The wire discriminant (`initial`, `info` or `trace`).
    pub fn kind(&self) -> &'static str {
        match self {
            EnginePayload::Initial(_) => "initial",
            EnginePayload::Info(_) => "info",
            EnginePayload::Trace(_) => "trace",
        }
    }
}

pub fn decode_payload(text: &str) -> Result<EnginePayload, ProtoError> {
    if text.len() > MAX_PAYLOAD_BYTES {
        return Err(ProtoError::TooLarge {
            len: text.len(),
            max: MAX_PAYLOAD_BYTES,
        });
    }
    Ok(serde_json::from_str(text)?)
}

pub fn encode_payload(payload: &EnginePayload) -> Result<String, ProtoError> {
    Ok(serde_json::to_string(payload)?)
}
