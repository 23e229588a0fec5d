//! Shared types for the Solace response engine.
//!
//! Value types only - no classification logic lives here.

pub mod emotion;
pub mod error;
pub mod reply;

pub use emotion::{Emotion, EmotionResult};
pub use error::SolaceError;
pub use reply::{ChatTurn, UnifiedReply};
