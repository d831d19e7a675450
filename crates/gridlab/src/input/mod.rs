//! Input parsing and dataset representation.

mod cell;
mod parser;
mod source;

pub use cell::{Cell, SortKey};
pub(crate) use cell::{format_number, parse_number};
pub use parser::{InputFormat, Parser, ParserConfig};
pub use source::{Dataset, Row, SourceMetadata};
