use indexmap::IndexMap;

use halt_proto::JsonBreakpoint;

use crate::breakpoint::{Breakpoint, BreakpointId};

/// The client's committed breakpoints, keyed by id, in insertion order.
#[derive(Clone, Debug, Default)]
pub struct BreakpointStore {
    breakpoints: IndexMap<BreakpointId, Breakpoint>,
}

impl BreakpointStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_wire<'a>(breakpoints: impl IntoIterator<Item = &'a JsonBreakpoint>) -> Self {
        let mut store = Self::new();
        for json in breakpoints {
            store.insert(Breakpoint::from_wire(json));
        }
        store
    }

    /// Adds `breakpoint`, replacing (and returning) any breakpoint with the
    /// same id. A replaced breakpoint keeps its position.
    pub fn insert(&mut self, breakpoint: Breakpoint) -> Option<Breakpoint> {
        let previous = self
            .breakpoints
            .insert(breakpoint.id().clone(), breakpoint);
        if let Some(previous) = &previous {
            tracing::debug!(
                target: "halt.breakpoints",
                breakpoint_id = %previous.id(),
                "replaced breakpoint with the same id"
            );
        }
        previous
    }

    pub fn remove(&mut self, id: &str) -> Option<Breakpoint> {
        self.breakpoints.shift_remove(id)
    }

    pub fn get(&self, id: &str) -> Option<&Breakpoint> {
        self.breakpoints.get(id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Breakpoint> {
        self.breakpoints.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.breakpoints.contains_key(id)
    }

    /// Pauses the breakpoint `id`; `false` if it is unknown.
    pub fn pause(&mut self, id: &str) -> bool {
        match self.breakpoints.get_mut(id) {
            Some(breakpoint) => {
                breakpoint.pause();
                true
            }
            None => false,
        }
    }

    /// Unpauses the breakpoint `id`; `false` if it is unknown.
    pub fn unpause(&mut self, id: &str) -> bool {
        match self.breakpoints.get_mut(id) {
            Some(breakpoint) => {
                breakpoint.unpause();
                true
            }
            None => false,
        }
    }

    /// Highlights exactly the breakpoints listed in `fired` and clears the
    /// highlight on all others.
    ///
    /// Returns the listed ids that do not name a stored breakpoint.
    pub fn mark_fired<'a>(&mut self, fired: impl IntoIterator<Item = &'a str>) -> Vec<String> {
        for breakpoint in self.breakpoints.values_mut() {
            breakpoint.set_fired(false);
        }

        let mut unknown = Vec::new();
        for id in fired {
            match self.breakpoints.get_mut(id) {
                Some(breakpoint) => breakpoint.set_fired(true),
                None => {
                    tracing::debug!(
                        target: "halt.breakpoints",
                        breakpoint_id = id,
                        "engine reported an unknown breakpoint as fired"
                    );
                    unknown.push(id.to_string());
                }
            }
        }
        unknown
    }

    /// Ids of the breakpoints currently highlighted as fired.
    pub fn fired(&self) -> impl Iterator<Item = &BreakpointId> {
        self.breakpoints
            .values()
            .filter(|breakpoint| breakpoint.is_fired())
            .map(Breakpoint::id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Breakpoint> {
        self.breakpoints.values()
    }

    pub fn len(&self) -> usize {
        self.breakpoints.len()
    }

    pub fn is_empty(&self) -> bool {
        self.breakpoints.is_empty()
    }

    pub fn to_wire(&self) -> Vec<JsonBreakpoint> {
        self.breakpoints.values().map(Breakpoint::to_wire).collect()
    }
}
