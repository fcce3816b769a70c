//! paged-graphql - Client-side builder and incremental executor for
//! cursor-paginated GraphQL entity queries.
//!
//! This crate provides:
//! - A selection tree built from flat dotted field paths, with typed
//!   variables and per-field filters.
//! - Document rendering in the fixed object/connection wire shape
//!   (`edges { node { … } } pageInfo { endCursor hasNextPage }`).
//! - An executor that walks cursor pagination at every nesting level
//!   independently and merges each page into one output structure
//!   without duplication.
//! - A reqwest-based HTTP connector with retry and backoff.

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::too_many_lines)]

mod connector;
mod error;
mod fields;
mod queries;
mod query;
mod retry;
mod selection;
mod variables;

pub use connector::{
    Connector, ConnectorMetrics, ConnectorMetricsSnapshot, HttpConnector, HttpConnectorBuilder,
    HttpConnectorConfig, QueryResponse,
};
pub use error::{
    GraphqlError, GraphqlErrorLocation, GraphqlPathSegment, HttpErrorInfo, QueryError,
};
pub use fields::{fields_to_tree, FieldEntry, FieldTree};
pub use queries::{
    folders_query, project_query, projects_query, representations_query, subsets_query,
    versions_query,
};
pub use query::GraphqlQuery;
pub use retry::{RetryDecision, RetryPolicy, RetryStrategy};
pub use selection::{FilterValue, SelectionNode, PAGE_SIZE};
pub use variables::{VariableRef, VariableSet};
