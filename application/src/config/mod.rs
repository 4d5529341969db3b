//! Application-level configuration.
//!
//! - [`SessionParams`] — TTL, backend timeouts, retries and nesting bound
//! - [`PanelConfig`] — prompts for the expert/judge pairing

pub mod panel_config;
pub mod session_params;

pub use panel_config::{DEFAULT_JUDGE_ID, PanelConfig};
pub use session_params::SessionParams;
