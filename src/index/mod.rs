pub mod build;
pub mod error;
pub mod quotes;
pub mod stats;
pub mod types;

pub use build::{build_index, build_index_from_reader};
pub use error::{BuildError, FormatError};
pub use quotes::QuoteError;
pub use types::*;
