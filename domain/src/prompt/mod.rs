//! Prompt domain
//!
//! Templates for the expert, the judge, validator requests and corrective prompts.

mod template;

pub use template::{MESSAGE_PLACEHOLDER, PromptTemplate, RESPONSE_PLACEHOLDER};
