pub mod error;
pub mod fetch;
pub mod links;
pub mod result;
pub mod walker;

pub use error::ScanError;
pub use fetch::{HttpFetcher, PageFetcher};
pub use links::{LinkExtractor, MatchMode, collisions_from_page, extract_links, summonses_from_page};
pub use result::{ArchivePage, FetchOutcome, LinkMap, MonthYear};
pub use walker::{ArchiveWalker, YearTemplate};
