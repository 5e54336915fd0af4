//! Capture pipeline: classify, normalize, and route observed responses
//!
//! Nothing in here fails on bad input. A payload that cannot be placed
//! produces an empty capture and the caller moves on.

pub mod classify;
pub mod fields;
pub mod ingest;
pub mod normalize;
pub mod router;
pub mod taxonomy;

pub use classify::{classify, Classified};
pub use ingest::{IngestReport, Ingestor};
pub use router::{locate_records, route, CapturedRecords, RoutedCapture, UrlHints};
pub use taxonomy::{extract_taxonomy, MAX_DEPTH};
