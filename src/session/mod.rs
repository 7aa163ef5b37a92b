//! Conversation session
//!
//! - `state`: the message log and its three transitions
//! - `store`: shared handle the UI reads from
//! - `dispatcher`: sends queries and records their outcome

pub mod dispatcher;
pub mod state;
pub mod store;

pub use dispatcher::{DispatchEvent, RequestDispatcher, SendOutcome};
pub use state::{
    RejectReason, RequestState, SessionAction, SessionState, BACKEND_ERROR_TEXT, DEFAULT_GREETING,
};
pub use store::SessionStore;
