//! Review domain
//!
//! Everything a validator needs to judge a draft answer without touching a
//! backend: the verdict types, judge-response parsing and decision functions.
//!
//! ```text
//! validation text ──► parse_judge_response ──► JudgeVerdict
//!                                                  │
//!                      JudgeDecision::decide ◄─────┘
//!                                │
//!                 ReviewDecision { revision, payload }
//! ```

pub mod decision;
pub mod parsing;
pub mod verdict;

pub use decision::{JudgeDecision, ReviewDecision, ValidatorDecision};
pub use parsing::{parse_judge_response, strip_code_fence, try_parse_judge_response};
pub use verdict::{JudgeVerdict, Verdict};
