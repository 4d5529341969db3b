//! Session engine
//!
//! - [`SessionRegistry`] — keyed, TTL-evicting store of sessions
//! - [`Session`] — one conversation plus its reviewers; implements send-and-validate
//! - [`ValidatorBinding`] — reviewer attached to a session
//! - [`send_with_retry`] — backend call with timeout and retry

pub mod binding;
pub mod error;
pub mod registry;
pub mod retry;
pub mod session;

pub use binding::ValidatorBinding;
pub use error::{RegistrationError, SessionError};
pub use registry::SessionRegistry;
pub use retry::send_with_retry;
pub use session::{SendOutcome, Session};
