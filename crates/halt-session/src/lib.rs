//! Client-side state of a halt debugging session.
//!
//! [`DebugSession`] folds the payloads streamed by the execution engine into
//! the client's view of the program: running status, the latest parameters,
//! which breakpoints fired, and the recorded trace of selected events.

mod error;
mod session;
mod trace;

pub use error::{SessionError, SessionResult};
pub use session::{DebugSession, PayloadEffect};
pub use trace::TraceLog;
