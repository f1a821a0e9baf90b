//! Application services - orchestrate use cases.
//!
//! Services coordinate the domain layer and ports to accomplish
//! high-level use cases like "may this disk move" or "run this query".

pub mod context;
pub mod query_service;
pub mod relocation_service;

#[cfg(test)]
pub(crate) mod fixtures;

pub use context::ExecutionContext;
pub use query_service::{
    QUERY_REGISTRY, QueryDef, QueryParameters, QueryReturnValue, QueryService, QueryType,
    QueryValue, VmAttachment,
};
pub use relocation_service::RelocationService;
