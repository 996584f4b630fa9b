//! Wire shapes shared by the halt debugger client and the execution engine.
//!
//! Everything in this crate is plain data: the JSON encoding of predicates and
//! breakpoints, the predicate catalog published by the engine, and the payloads
//! the engine streams to the client. Conversions to and from the in-memory
//! breakpoint model live in `halt-breakpoints`.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod catalog;
pub mod payload;

pub use catalog::{PredicateCatalog, PredicateMapping};
pub use payload::{
    decode_payload, encode_payload, EnginePayload, InfoPayload, InitialPayload, Parameter,
    ParameterInfo, ParameterValue, ProtoError, StateInfo, TracePayload,
};

/// Maximum size of a single inbound JSON document (payload or breakpoint list).
///
/// Payloads arrive from a process we do not control; refuse to parse anything
/// larger than this instead of letting serde allocate for it.
pub const MAX_PAYLOAD_BYTES: usize = 16 * 1024 * 1024; // 16 MiB

/// Breakpoint id reserved for the engine's "stop if different" breakpoint.
pub const DIFFERENCE_BREAKPOINT_ID: &str = "0";

/// Whether a predicate takes child predicates or a literal value.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PredicateKind {
    Compound,
    Flat,
}

impl PredicateKind {
    pub fn as_str(self) -> &'static str {
        match self {
            PredicateKind::Compound => "compound",
            PredicateKind::Flat => "flat",
        }
    }
}

impl fmt::Display for PredicateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON encoding of a single predicate node.
///
/// Both `value` and `predicates` are always written regardless of `kind`:
/// compound nodes carry an empty `value`, flat nodes an empty `predicates`.
/// They are optional on decode since some engine-side producers omit them.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonPredicate {
    pub name: String,
    #[serde(default)]
    pub value: String,
    pub kind: PredicateKind,
    #[serde(default)]
    pub predicates: Vec<JsonPredicate>,
}

impl JsonPredicate {
    pub fn flat(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            kind: PredicateKind::Flat,
            predicates: Vec::new(),
        }
    }

    pub fn compound(name: impl Into<String>, predicates: Vec<JsonPredicate>) -> Self {
        Self {
            name: name.into(),
            value: String::new(),
            kind: PredicateKind::Compound,
            predicates,
        }
    }
}

/// JSON encoding of a breakpoint: an identified chain of root predicates.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonBreakpoint {
    pub id: String,
    pub chain: Vec<JsonPredicate>,
    #[serde(default)]
    pub paused: bool,
}

/// JSON encoding of the "stop if different" breakpoint.
///
/// The engine treats the chain as a recorded run to compare against, starting
/// at `current_position`, and halts on the first step that diverges.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct JsonDifferenceBreakpoint {
    pub id: String,
    pub current_position: u64,
    pub chain: Vec<JsonPredicate>,
}

impl JsonDifferenceBreakpoint {
    pub fn new(current_position: u64, chain: Vec<JsonPredicate>) -> Self {
        Self {
            id: DIFFERENCE_BREAKPOINT_ID.to_string(),
            current_position,
            chain,
        }
    }
}
