//! Application use cases

pub mod ask_expert;
