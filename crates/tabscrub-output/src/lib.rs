pub mod writer;

pub use writer::serialize;
