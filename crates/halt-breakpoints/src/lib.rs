//! Conditional breakpoints for the halt debugger client.
//!
//! A breakpoint is a chain of predicate trees that the execution engine
//! evaluates step by step. This crate provides:
//! - the committed, read-only [`Predicate`] tree and its indented rendering,
//! - [`PredicateBuilder`] / [`BreakpointBuilder`], editable mirrors of those
//!   trees that tolerate half-finished edits until they are compiled,
//! - the JSON codec between the model and the `halt-proto` wire shapes,
//! - [`BreakpointStore`], the client's registry of committed breakpoints.

pub mod breakpoint;
pub mod builder;
pub mod error;
pub mod predicate;
pub mod store;
pub mod wire;

pub use crate::breakpoint::{Breakpoint, BreakpointBuilder, BreakpointId, FiredState, IdSource, SlotId};
pub use crate::builder::{BuilderHandle, PredicateBuilder};
pub use crate::error::{WireError, WireResult};
pub use crate::predicate::Predicate;
pub use crate::store::BreakpointStore;
pub use crate::wire::{decode_breakpoint, decode_breakpoints, encode_breakpoint, encode_breakpoints};

pub use halt_proto::{PredicateCatalog, PredicateKind, PredicateMapping};
