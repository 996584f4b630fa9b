//! Conversions between the breakpoint model and its JSON wire shapes.
//!
//! Encoding is total. Decoding a [`JsonPredicate`] is total as well: the only
//! malformed input the model cannot represent, an unknown `kind`, is already
//! rejected when the JSON text is parsed.

use halt_proto::{JsonBreakpoint, JsonPredicate, PredicateKind, MAX_PAYLOAD_BYTES};

use crate::breakpoint::{Breakpoint, BreakpointId};
use crate::error::{WireError, WireResult};
use crate::predicate::Predicate;

impl Predicate {
    pub fn to_wire(&self) -> JsonPredicate {
        match self {
            Predicate::Flat { name, content } => JsonPredicate::flat(name.clone(), content.clone()),
            Predicate::Compound { name, children } => JsonPredicate::compound(
                name.clone(),
                children.iter().map(Predicate::to_wire).collect(),
            ),
        }
    }

    /// Builds a tree from its wire form. A compound's `value` and a flat's
    /// `predicates` are not part of the model and are ignored.
    pub fn from_wire(json: &JsonPredicate) -> Self {
        match json.kind {
            PredicateKind::Compound => Predicate::compound(
                json.name.clone(),
                json.predicates.iter().map(Predicate::from_wire).collect(),
            ),
            PredicateKind::Flat => Predicate::flat(json.name.clone(), json.value.clone()),
        }
    }
}

impl Breakpoint {
    pub fn to_wire(&self) -> JsonBreakpoint {
        JsonBreakpoint {
            id: self.id().as_str().to_string(),
            chain: self.chain().iter().map(Predicate::to_wire).collect(),
            paused: self.is_paused(),
        }
    }

    /// Rebuilds a breakpoint from its wire form, keeping its id.
    pub fn from_wire(json: &JsonBreakpoint) -> Self {
        Breakpoint::new(
            BreakpointId::new(json.id.clone()),
            json.chain.iter().map(Predicate::from_wire).collect(),
            json.paused,
        )
    }
}

impl From<&Predicate> for JsonPredicate {
    fn from(predicate: &Predicate) -> Self {
        predicate.to_wire()
    }
}

impl From<&JsonPredicate> for Predicate {
    fn from(json: &JsonPredicate) -> Self {
        Predicate::from_wire(json)
    }
}

impl From<&Breakpoint> for JsonBreakpoint {
    fn from(breakpoint: &Breakpoint) -> Self {
        breakpoint.to_wire()
    }
}

impl From<&JsonBreakpoint> for Breakpoint {
    fn from(json: &JsonBreakpoint) -> Self {
        Breakpoint::from_wire(json)
    }
}

fn check_len(text: &str) -> WireResult<()> {
    if text.len() > MAX_PAYLOAD_BYTES {
        return Err(WireError::TooLarge {
            len: text.len(),
            max: MAX_PAYLOAD_BYTES,
        });
    }
    Ok(())
}

pub fn encode_breakpoint(breakpoint: &Breakpoint) -> WireResult<String> {
    Ok(serde_json::to_string(&breakpoint.to_wire())?)
}

pub fn encode_breakpoints(breakpoints: &[Breakpoint]) -> WireResult<String> {
    let wire: Vec<JsonBreakpoint> = breakpoints.iter().map(Breakpoint::to_wire).collect();
    Ok(serde_json::to_string(&wire)?)
}

pub fn decode_breakpoint(text: &str) -> WireResult<Breakpoint> {
    check_len(text)?;
    let json: JsonBreakpoint = serde_json::from_str(text)?;
    Ok(Breakpoint::from_wire(&json))
}

/// Decodes either a single breakpoint object or an array of them.
pub fn decode_breakpoints(text: &str) -> WireResult<Vec<Breakpoint>> {
    check_len(text)?;
    let breakpoints = match serde_json::from_str::<serde_json::Value>(text)? {
        value @ serde_json::Value::Array(_) => {
            serde_json::from_value::<Vec<JsonBreakpoint>>(value)?
        }
        value => vec![serde_json::from_value::<JsonBreakpoint>(value)?],
    };
    Ok(breakpoints.iter().map(Breakpoint::from_wire).collect())
}
