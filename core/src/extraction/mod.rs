pub mod identifier;
pub mod reader;
pub mod record;
pub mod scanner;
pub mod tags;

pub use identifier::IdentifierBuilder;
pub use reader::{FileHeaderReader, HeaderReader};
pub use record::FileRecord;
pub use scanner::TagScanner;
pub use tags::{parse_tag, SeriesAttribute};
