pub mod diff;
pub mod writer;

pub use diff::{DiffInput, approximate_serialized_size, diff};
pub use writer::write_report_json;
