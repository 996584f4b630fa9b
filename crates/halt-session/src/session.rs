use halt_breakpoints::{BreakpointId, BreakpointStore};
use halt_proto::{
    decode_payload, EnginePayload, InfoPayload, InitialPayload, JsonDifferenceBreakpoint,
    JsonPredicate, ParameterInfo, TracePayload,
};

use crate::error::SessionResult;
use crate::trace::TraceLog;

/// Predicate the difference breakpoint uses to compare each recorded step.
const DIFFERENCE_PREDICATE: &str = "EVENT_SELECTED";

/// What applying one payload changed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PayloadEffect {
    Initialized {
        running: bool,
    },
    Status {
        running: bool,
        ended: bool,
        /// Breakpoints now highlighted as fired.
        fired: Vec<BreakpointId>,
        /// Ids the engine reported that the client does not know.
        unknown: Vec<String>,
    },
    Traced {
        id: u64,
        /// A trace with the same id had already been recorded.
        replaced: bool,
    },
}

/// Client-side state of one debugging session.
///
/// Payloads are applied one at a time, in the order the engine sent them;
/// each call runs to completion before the next payload is looked at.
#[derive(Clone, Debug, Default)]
pub struct DebugSession {
    breakpoints: BreakpointStore,
    timeout: f64,
    parameters: ParameterInfo,
    running: bool,
    ended: bool,
    initialized: bool,
    traces: TraceLog,
    reference: TraceLog,
}

impl DebugSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// A session keeping at most `limit` traces (`0` keeps all of them).
    pub fn with_trace_history_limit(limit: usize) -> Self {
        Self {
            traces: TraceLog::new(limit),
            ..Self::default()
        }
    }

    pub fn apply(&mut self, payload: EnginePayload) -> PayloadEffect {
        tracing::trace!(target: "halt.session", kind = payload.kind(), "applying payload");
        match payload {
            EnginePayload::Initial(initial) => self.apply_initial(initial),
            EnginePayload::Info(info) => self.apply_info(info),
            EnginePayload::Trace(trace) => self.apply_trace(trace),
        }
    }

    /// Decodes one JSON payload and applies it.
    pub fn apply_json(&mut self, text: &str) -> SessionResult<PayloadEffect> {
        let payload = decode_payload(text)?;
        Ok(self.apply(payload))
    }

    fn apply_initial(&mut self, initial: InitialPayload) -> PayloadEffect {
        if self.initialized {
            tracing::debug!(target: "halt.session", "received a second initial payload");
        }
        self.timeout = initial.timeout;
        self.parameters = initial.parameters;
        self.running = initial.running;
        self.initialized = true;
        PayloadEffect::Initialized {
            running: self.running,
        }
    }

    fn apply_info(&mut self, info: InfoPayload) -> PayloadEffect {
        self.running = !info.paused;
        self.ended |= info.ended;

        let unknown = self
            .breakpoints
            .mark_fired(info.breakpoint_ids.iter().map(String::as_str));
        let fired: Vec<BreakpointId> = self.breakpoints.fired().cloned().collect();
        if !fired.is_empty() {
            tracing::debug!(
                target: "halt.session",
                fired = ?fired.iter().map(BreakpointId::as_str).collect::<Vec<_>>(),
                "breakpoints fired"
            );
        }
        if self.ended {
            tracing::debug!(target: "halt.session", "engine reported end of program");
        }

        PayloadEffect::Status {
            running: self.running,
            ended: self.ended,
            fired,
            unknown,
        }
    }

    fn apply_trace(&mut self, trace: TracePayload) -> PayloadEffect {
        let id = trace.id;
        self.parameters = trace.parameters.clone();
        let replaced = self.traces.record(trace).is_some();
        if replaced {
            tracing::debug!(target: "halt.session", trace_id = id, "trace re-delivered");
        }
        PayloadEffect::Traced { id, replaced }
    }

    pub fn breakpoints(&self) -> &BreakpointStore {
        &self.breakpoints
    }

    pub fn breakpoints_mut(&mut self) -> &mut BreakpointStore {
        &mut self.breakpoints
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn has_ended(&self) -> bool {
        self.ended
    }

    /// Delay between engine steps, in seconds.
    pub fn timeout(&self) -> f64 {
        self.timeout
    }

    /// Records a timeout the client asked the engine to use.
    pub fn set_timeout(&mut self, timeout: f64) {
        self.timeout = timeout;
    }

    /// Most recently reported program parameters.
    pub fn parameters(&self) -> &ParameterInfo {
        &self.parameters
    }

    pub fn traces(&self) -> &TraceLog {
        &self.traces
    }

    /// Traces loaded with [`DebugSession::import_traces`].
    pub fn reference_traces(&self) -> &TraceLog {
        &self.reference
    }

    /// Serialises the recorded traces (see [`TraceLog::to_json`]).
    pub fn export_traces(&self) -> SessionResult<String> {
        self.traces.to_json()
    }

    /// Loads a previous run's export as the reference trace, replacing any
    /// earlier reference. Returns the imported traces in id order.
    pub fn import_traces(&mut self, text: &str) -> SessionResult<Vec<TracePayload>> {
        self.reference = TraceLog::from_json(text, 0)?;
        tracing::debug!(
            target: "halt.session",
            traces = self.reference.len(),
            "imported reference trace"
        );
        Ok(self.reference.iter().cloned().collect())
    }

    /// Builds the breakpoint that halts as soon as the running program selects
    /// a different event than the reference trace did.
    ///
    /// Comparison starts at the step after the last recorded trace.
    pub fn stop_if_different(&self) -> JsonDifferenceBreakpoint {
        let current_position = self.traces.last_id().map_or(0, |id| id + 1);
        let chain = self
            .reference
            .iter()
            .map(|trace| JsonPredicate::flat(DIFFERENCE_PREDICATE, trace.selected.clone()))
            .collect();
        JsonDifferenceBreakpoint::new(current_position, chain)
    }
}
