pub mod mode;

pub use mode::{ModeState, PollOutcome};
