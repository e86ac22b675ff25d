pub mod pipeline;

pub use pipeline::{RunOutcome, run};
