pub mod encoding;
pub mod reader;

pub use encoding::{EncodingGuess, detect};
pub use reader::parse_table;
