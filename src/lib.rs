//! # urnkit: Reference Resolution and Structural Extraction
//!
//! urnkit turns denormalized, graph-shaped API payloads into flat, typed
//! records. A response carries a flat pool of entities keyed by
//! `urn:li:<type>:<id>` identifiers, pointer fields (keys with a leading `*`)
//! that reference entities in that pool, and anchor entities that root
//! paginated section views.
//!
//! ## Features
//!
//! - **Entity index**: identifier lookup over one response's entity pool
//! - **Reference resolution**: pointer fields inlined recursively, with a per-path cycle guard
//! - **Declarative projection**: parsed field paths mapped onto flat records, plus side-table joins
//! - **Anchor discovery**: injectable predicates over identifiers, scanned in pool order
//! - **Section extraction**: grouped and ungrouped experience blocks, with diagnostics instead of failures
//!
//! ## Example
//!
//! ```
//! use serde_json::json;
//! use urnkit::{EntityIndex, ReferenceResolver};
//!
//! let pool = vec![
//!     json!({"entityUrn": "urn:li:fsd_position:1", "title": "Engineer", "*company": "urn:li:fsd_company:2"}),
//!     json!({"entityUrn": "urn:li:fsd_company:2", "name": "Acme"}),
//! ];
//! let index = EntityIndex::build(&pool);
//! let resolved = ReferenceResolver::new(&index).resolve(&pool[0]);
//!
//! assert_eq!(resolved["company"]["name"], "Acme");
//! ```
//!
//! ## Configuration
//!
//! ```yaml
//! experience:
//!   anchor: ["EXPERIENCE_VIEW_DETAILS", "fsd_profile:"]
//!   paged_list_keys: ["*pagedListComponent", "pagedListComponent"]
//! positions:
//!   side_fields: [universalName]
//!   match_field: companyUrn
//! ```

// Core modules
pub mod urn;
pub mod text;
pub mod entity;
pub mod path;
pub mod resolve;
pub mod project;
pub mod anchor;
pub mod section;
pub mod ordering;

// Documents, fetchers and the aggregation step
pub mod document;
pub mod profile;
pub mod pipeline;

pub mod config;
pub mod diagnostics;
pub mod error;
pub mod outline;
pub mod output;

// Re-export key types
pub use entity::EntityIndex;
pub use path::{Extractor, FieldPath, PathSegment};
pub use resolve::ReferenceResolver;
pub use project::{FieldsMap, Record};
pub use anchor::{AnchorPredicate, ContainsAll, Paging};
pub use section::{ExperienceExtractor, ExperienceRecord, SectionExtractor, SectionReport};
pub use ordering::EndDate;
pub use text::TextNode;

pub use document::{Fetcher, FileFetcher, LogicalQuery, PayloadEnvelope, ResponseDocument, StaticFetcher};
pub use pipeline::{Extraction, Pipeline};
pub use profile::ProfileRecord;

pub use config::ExtractionConfig;
pub use diagnostics::{Diagnostic, Diagnostics};
pub use error::{ConfigError, FetchError, OutputError, PathError};
pub use output::OutputFormat;
