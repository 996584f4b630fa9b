use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use halt_proto::PredicateCatalog;
use uuid::Uuid;

use crate::builder::PredicateBuilder;
use crate::predicate::Predicate;

/// Globally unique breakpoint identifier.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BreakpointId(String);

impl BreakpointId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// A fresh random (UUID v4) identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for BreakpointId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for BreakpointId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<String> for BreakpointId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for BreakpointId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Produces ids for breakpoints minted by [`BreakpointBuilder::compile`].
pub type IdSource = Arc<dyn Fn() -> BreakpointId + Send + Sync>;

/// Display-only highlight toggled when the engine reports a breakpoint as hit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum FiredState {
    Primed,
    #[default]
    Secondary,
}

impl FiredState {
    /// Style token used by the rendering layer.
    pub fn as_str(self) -> &'static str {
        match self {
            FiredState::Primed => "primary",
            FiredState::Secondary => "secondary",
        }
    }
}

/// A committed, identified chain of root predicates.
///
/// The chain never changes after construction; editing goes through a
/// [`BreakpointBuilder`] which always mints a new breakpoint. Equality ignores
/// the fired highlight, which is not part of the breakpoint's persisted state.
#[derive(Clone, Debug)]
pub struct Breakpoint {
    id: BreakpointId,
    chain: Vec<Predicate>,
    paused: bool,
    fired: FiredState,
}

impl Breakpoint {
    pub fn new(id: BreakpointId, chain: Vec<Predicate>, paused: bool) -> Self {
        Self {
            id,
            chain,
            paused,
            fired: FiredState::default(),
        }
    }

    pub fn id(&self) -> &BreakpointId {
        &self.id
    }

    pub fn chain(&self) -> &[Predicate] {
        &self.chain
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    pub fn unpause(&mut self) {
        self.paused = false;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn set_fired(&mut self, fired: bool) {
        self.fired = if fired {
            FiredState::Primed
        } else {
            FiredState::Secondary
        };
    }

    pub fn fired_state(&self) -> FiredState {
        self.fired
    }

    pub fn is_fired(&self) -> bool {
        self.fired == FiredState::Primed
    }

    /// Each root predicate's rendering, separated by a blank line.
    pub fn display(&self) -> String {
        self.chain
            .iter()
            .map(Predicate::display)
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl PartialEq for Breakpoint {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && self.paused == other.paused && self.chain == other.chain
    }
}

impl Eq for Breakpoint {}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotId(u32);

/// Editable counterpart of a [`Breakpoint`]: one [`PredicateBuilder`] per
/// chain slot, in chain order.
///
/// The builder carries no id or pause state; [`compile`](Self::compile)
/// always produces a new, unpaused breakpoint with a freshly generated id,
/// even when the builder was hydrated from an existing breakpoint.
#[derive(Clone)]
pub struct BreakpointBuilder {
    catalog: Arc<PredicateCatalog>,
    slots: Vec<(SlotId, PredicateBuilder)>,
    next_slot: u32,
    ids: IdSource,
}

impl BreakpointBuilder {
    pub fn new(catalog: Arc<PredicateCatalog>) -> Self {
        Self::with_id_source(catalog, Arc::new(BreakpointId::generate))
    }

    pub fn with_id_source(catalog: Arc<PredicateCatalog>, ids: IdSource) -> Self {
        Self {
            catalog,
            slots: Vec::new(),
            next_slot: 0,
            ids,
        }
    }

    pub fn from_breakpoint(catalog: Arc<PredicateCatalog>, breakpoint: &Breakpoint) -> Self {
        let mut builder = Self::new(catalog);
        builder.hydrate(breakpoint);
        builder
    }

    /// Appends one hydrated builder per root predicate of `breakpoint`, in
    /// chain order, after any slots the builder already holds.
    pub fn hydrate(&mut self, breakpoint: &Breakpoint) {
        for predicate in breakpoint.chain() {
            let slot = self.add_predicate_builder();
            if let Some(builder) = self.predicate_builder_mut(slot) {
                let root = builder.root();
                builder.hydrate(root, predicate);
            }
        }
    }

    /// Appends an empty predicate builder to the end of the chain.
    pub fn add_predicate_builder(&mut self) -> SlotId {
        let slot = self.next_slot_id();
        self.slots
            .push((slot, PredicateBuilder::new(self.catalog.clone())));
        slot
    }

    /// Removes the builder in `slot`; `false` if there is no such slot.
    pub fn remove_predicate_builder(&mut self, slot: SlotId) -> bool {
        match self.slots.iter().position(|(id, _)| *id == slot) {
            Some(position) => {
                self.slots.remove(position);
                true
            }
            None => false,
        }
    }

    pub fn predicate_builder(&self, slot: SlotId) -> Option<&PredicateBuilder> {
        self.slots
            .iter()
            .find(|(id, _)| *id == slot)
            .map(|(_, builder)| builder)
    }

    pub fn predicate_builder_mut(&mut self, slot: SlotId) -> Option<&mut PredicateBuilder> {
        self.slots
            .iter_mut()
            .find(|(id, _)| *id == slot)
            .map(|(_, builder)| builder)
    }

    /// Slots in chain order.
    pub fn slots(&self) -> impl Iterator<Item = (SlotId, &PredicateBuilder)> {
        self.slots.iter().map(|(id, builder)| (*id, builder))
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn compile(&self) -> Breakpoint {
        let chain = self
            .slots
            .iter()
            .map(|(_, builder)| builder.compile())
            .collect();
        let id = (self.ids)();
        tracing::debug!(target: "halt.breakpoints", breakpoint_id = %id, "compiled breakpoint");
        Breakpoint::new(id, chain, false)
    }

    fn next_slot_id(&mut self) -> SlotId {
        let slot = SlotId(self.next_slot);
        self.next_slot += 1;
        slot
    }
}

impl fmt::Debug for BreakpointBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BreakpointBuilder")
            .field("catalog", &self.catalog)
            .field("slots", &self.slots)
            .field("next_slot", &self.next_slot)
            .finish_non_exhaustive()
    }
}
