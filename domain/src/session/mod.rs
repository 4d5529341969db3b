//! Session addressing.
//!
//! - [`key::SessionKey`] — registry key of a session
//! - [`key::SessionRole`] — role label appended to an external session id

pub mod key;
