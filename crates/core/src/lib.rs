pub mod catalog;
pub mod config;
pub mod domain;
pub mod engine;
pub mod errors;
pub mod extraction;
pub mod merge;
pub mod packet;
pub mod session;
pub mod summary;

pub use catalog::{Catalog, CatalogError};
pub use domain::filters::{ExtractedFilters, FilterState, ManualFilterEdit, SortOrder};
pub use domain::product::{Product, ProductId};
pub use engine::ProductFilterEngine;
pub use errors::{ApplicationError, InterfaceError};
pub use extraction::FilterExtractor;
pub use merge::FilterChange;
pub use packet::{decode_filter_query, parse_filter_packet, DataPacket, PacketError};
pub use session::{
    FilterSession, GateDecision, MessageGate, PacketOutcome, ProcessedMarker, SkipReason,
    TranscriptMessage, TranscriptOutcome,
};
pub use summary::{FilterChip, FilterSummary};
