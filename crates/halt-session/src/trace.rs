use std::collections::BTreeMap;

use halt_proto::{TracePayload, MAX_PAYLOAD_BYTES};

use crate::error::SessionResult;

/// Trace payloads keyed by their step id.
///
/// With a non-zero `limit`, recording past the limit evicts the lowest ids.
#[derive(Clone, Debug, Default)]
pub struct TraceLog {
    entries: BTreeMap<u64, TracePayload>,
    limit: usize,
}

impl TraceLog {
    pub fn new(limit: usize) -> Self {
        Self {
            entries: BTreeMap::new(),
            limit,
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Stores `trace`, returning the payload previously recorded for the same id.
    pub fn record(&mut self, trace: TracePayload) -> Option<TracePayload> {
        let previous = self.entries.insert(trace.id, trace);
        if self.limit > 0 {
            while self.entries.len() > self.limit {
                if let Some((evicted, _)) = self.entries.pop_first() {
                    tracing::trace!(target: "halt.session", trace_id = evicted, "evicted trace");
                }
            }
        }
        previous
    }

    pub fn get(&self, id: u64) -> Option<&TracePayload> {
        self.entries.get(&id)
    }

    pub fn last_id(&self) -> Option<u64> {
        self.entries.keys().next_back().copied()
    }

    /// Traces in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = &TracePayload> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// JSON object mapping each trace id (as a string) to its payload.
    pub fn to_json(&self) -> SessionResult<String> {
        Ok(serde_json::to_string(&self.entries)?)
    }

    /// Parses an export produced by [`TraceLog::to_json`].
    ///
    /// Entries are keyed by the payload's own `id`; the object keys are only
    /// used for transport.
    pub fn from_json(text: &str, limit: usize) -> SessionResult<Self> {
        if text.len() > MAX_PAYLOAD_BYTES {
            return Err(halt_proto::ProtoError::TooLarge {
                len: text.len(),
                max: MAX_PAYLOAD_BYTES,
            }
            .into());
        }
        let entries: BTreeMap<String, TracePayload> = serde_json::from_str(text)?;
        let mut log = Self::new(limit);
        for trace in entries.into_values() {
            log.record(trace);
        }
        Ok(log)
    }
}
