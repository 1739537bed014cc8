pub mod error;
pub mod fetch;
pub mod ingest;
pub mod parser;

pub use error::{EntryError, IngestError};
pub use fetch::RemoteFileClient;
pub use ingest::{load_promotions, load_promotions_file, IngestSummary};
pub use parser::{
    resolve_extension, JsonPromotionsParser, MockParser, ParserRegistry, PromotionsParser,
};
