//! Query Service - read-only lookups behind a permission gate.
//!
//! Every [`QueryType`] is described once in [`QUERY_REGISTRY`]: its admin
//! flag and the handler that answers it. [`QueryService::execute`] checks the
//! caller's [`ExecutionContext`] against the flag before the handler runs.
//!
//! A query may run when any of these holds:
//! - the engine runs it internally
//! - the caller is an administrator
//! - the caller asked for filtered results and the query is not admin-only

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::{debug, instrument, warn};

use crate::{
    application::{
        ApplicationError,
        ports::EntityReaders,
        services::{ExecutionContext, RelocationService},
    },
    domain::{
        Disk, DiskImage, DiskVmElement, DomainError, Guid, RelocationRequest, Snapshot,
        StorageDomain, ValidationResult, Vm, VmDevice,
    },
    error::RelocatorResult,
};

pub const INSUFFICIENT_PERMISSIONS: &str = "Insufficient permissions to run this query";

// ── Query types ──────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum QueryType {
    GetDiskById,
    GetDiskImageById,
    GetStorageDomainById,
    GetAllStorageDomains,
    GetVmsByDiskId,
    GetSnapshotsByVmId,
    GetDiskVmElementsByDiskId,
    GetRelocationVerdict,
}

impl QueryType {
    pub const ALL: &'static [QueryType] = &[
        Self::GetDiskById,
        Self::GetDiskImageById,
        Self::GetStorageDomainById,
        Self::GetAllStorageDomains,
        Self::GetVmsByDiskId,
        Self::GetSnapshotsByVmId,
        Self::GetDiskVmElementsByDiskId,
        Self::GetRelocationVerdict,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::GetDiskById => "get-disk-by-id",
            Self::GetDiskImageById => "get-disk-image-by-id",
            Self::GetStorageDomainById => "get-storage-domain-by-id",
            Self::GetAllStorageDomains => "get-all-storage-domains",
            Self::GetVmsByDiskId => "get-vms-by-disk-id",
            Self::GetSnapshotsByVmId => "get-snapshots-by-vm-id",
            Self::GetDiskVmElementsByDiskId => "get-disk-vm-elements-by-disk-id",
            Self::GetRelocationVerdict => "get-relocation-verdict",
        }
    }

    /// Whether only administrators (or internal callers) may run it.
    pub fn is_admin(&self) -> bool {
        query_def(*self).is_none_or(|d| d.admin)
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QueryType {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .iter()
            .copied()
            .find(|q| {
                q.as_str() == wanted || format!("{q:?}").to_ascii_lowercase() == wanted
            })
            .ok_or_else(|| DomainError::UnknownVariant {
                kind: "query type",
                value: s.to_string(),
            })
    }
}

// ── Parameters and results ───────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParameters {
    /// The caller accepts results filtered to what it may see.
    pub filtered: bool,
    /// Subject of id-keyed queries.
    pub id: Option<Guid>,
    /// Subject of [`QueryType::GetRelocationVerdict`].
    pub request: Option<RelocationRequest>,
}

impl QueryParameters {
    pub fn for_id(id: Guid) -> Self {
        Self {
            id: Some(id),
            ..Self::default()
        }
    }

    pub fn for_request(request: RelocationRequest) -> Self {
        Self {
            request: Some(request),
            ..Self::default()
        }
    }

    pub fn filtered(mut self, filtered: bool) -> Self {
        self.filtered = filtered;
        self
    }

    fn require_id(&self) -> Result<Guid, ApplicationError> {
        self.id
            .ok_or_else(|| ApplicationError::InvalidQueryParameters("an id is required".into()))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VmAttachment {
    pub vm: Vm,
    pub device: VmDevice,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum QueryValue {
    Disk(Option<Disk>),
    DiskImage(Option<DiskImage>),
    StorageDomain(Option<StorageDomain>),
    StorageDomains(Vec<StorageDomain>),
    VmAttachments(Vec<VmAttachment>),
    Snapshots(Vec<Snapshot>),
    DiskVmElements(Vec<DiskVmElement>),
    Verdict(ValidationResult),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryReturnValue {
    pub succeeded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<QueryValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exception_string: Option<String>,
}

impl QueryReturnValue {
    fn success(value: QueryValue) -> Self {
        Self {
            succeeded: true,
            value: Some(value),
            exception_string: None,
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            succeeded: false,
            value: None,
            exception_string: Some(message.into()),
        }
    }
}

// ── Registry ─────────────────────────────────────────────────────────────────

pub type QueryHandler = fn(&QueryService, &QueryParameters) -> RelocatorResult<QueryValue>;

#[derive(Clone, Copy)]
pub struct QueryDef {
    pub query_type: QueryType,
    pub admin: bool,
    pub handler: QueryHandler,
}

/// Single source of truth for what each query does and who may run it.
pub static QUERY_REGISTRY: &[QueryDef] = &[
    QueryDef {
        query_type: QueryType::GetDiskById,
        admin: false,
        handler: |svc, p| Ok(QueryValue::Disk(svc.readers.disks.get_disk(p.require_id()?)?)),
    },
    QueryDef {
        query_type: QueryType::GetDiskImageById,
        admin: false,
        handler: |svc, p| {
            Ok(QueryValue::DiskImage(
                svc.readers.disks.get_disk_image(p.require_id()?)?,
            ))
        },
    },
    QueryDef {
        query_type: QueryType::GetStorageDomainById,
        admin: true,
        handler: |svc, p| {
            Ok(QueryValue::StorageDomain(
                svc.readers.storage_domains.get(p.require_id()?)?,
            ))
        },
    },
    QueryDef {
        query_type: QueryType::GetAllStorageDomains,
        admin: true,
        handler: |svc, _| Ok(QueryValue::StorageDomains(svc.readers.storage_domains.list()?)),
    },
    QueryDef {
        query_type: QueryType::GetVmsByDiskId,
        admin: false,
        handler: |svc, p| {
            let attached = svc.readers.vms.get_vms_with_attachment(p.require_id()?)?;
            Ok(QueryValue::VmAttachments(
                attached
                    .into_iter()
                    .map(|(vm, device)| VmAttachment { vm, device })
                    .collect(),
            ))
        },
    },
    QueryDef {
        query_type: QueryType::GetSnapshotsByVmId,
        admin: false,
        handler: |svc, p| {
            Ok(QueryValue::Snapshots(
                svc.readers.snapshots.get_all_for_vm(p.require_id()?)?,
            ))
        },
    },
    QueryDef {
        query_type: QueryType::GetDiskVmElementsByDiskId,
        admin: false,
        handler: |svc, p| {
            Ok(QueryValue::DiskVmElements(
                svc.readers.disk_vm_elements.get_all_for_disk(p.require_id()?)?,
            ))
        },
    },
    QueryDef {
        query_type: QueryType::GetRelocationVerdict,
        admin: false,
        handler: |svc, p| {
            let request = p.request.ok_or_else(|| {
                ApplicationError::InvalidQueryParameters("a relocation request is required".into())
            })?;
            Ok(QueryValue::Verdict(svc.relocation.validate(&request)?))
        },
    },
];

pub fn query_def(query_type: QueryType) -> Option<&'static QueryDef> {
    QUERY_REGISTRY.iter().find(|d| d.query_type == query_type)
}

// ── Service ──────────────────────────────────────────────────────────────────

pub struct QueryService {
    readers: EntityReaders,
    relocation: RelocationService,
}

impl QueryService {
    pub fn new(readers: EntityReaders, relocation: RelocationService) -> Self {
        Self {
            readers,
            relocation,
        }
    }

    /// Whether `ctx` may run `query_type` with `params`.
    pub fn is_permitted(
        ctx: &ExecutionContext,
        query_type: QueryType,
        params: &QueryParameters,
    ) -> bool {
        ctx.internal_execution
            || ctx.user_is_admin()
            || (params.filtered && !query_type.is_admin())
    }

    #[instrument(skip_all, fields(query = %query_type, session = %ctx.session_id))]
    pub fn execute(
        &self,
        ctx: &ExecutionContext,
        query_type: QueryType,
        params: &QueryParameters,
    ) -> QueryReturnValue {
        let Some(def) = query_def(query_type) else {
            return QueryReturnValue::failure(format!("Unknown query {query_type}"));
        };

        if !Self::is_permitted(ctx, query_type, params) {
            warn!(
                admin_query = def.admin,
                filtered = params.filtered,
                "Query denied"
            );
            return QueryReturnValue::failure(INSUFFICIENT_PERMISSIONS);
        }

        match (def.handler)(self, params) {
            Ok(value) => {
                debug!("Query succeeded");
                QueryReturnValue::success(value)
            }
            Err(e) => {
                warn!(error = %e, "Query failed");
                QueryReturnValue::failure(e.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::application::ports::output::MockStorageDomainStore;
    use crate::application::services::fixtures::{DEST, DISK, FakeInventory, SRC};
    use crate::application::validators::{EngineValidators, StorageThresholds};
    use crate::domain::{FailureReason, ImageOperation};

    fn service_over(readers: EntityReaders) -> QueryService {
        let validators = EngineValidators::new(readers.clone(), StorageThresholds::default());
        let relocation = RelocationService::new(readers.clone(), Box::new(validators));
        QueryService::new(readers, relocation)
    }

    fn service() -> QueryService {
        service_over(FakeInventory::standard().into_readers())
    }

    fn full_params(filtered: bool) -> QueryParameters {
        QueryParameters {
            filtered,
            id: Some(DISK),
            request: Some(RelocationRequest::new(DISK, SRC, DEST, ImageOperation::Move)),
        }
    }

    #[test]
    fn every_query_type_is_registered_once() {
        for qt in QueryType::ALL {
            let count = QUERY_REGISTRY.iter().filter(|d| d.query_type == *qt).count();
            assert_eq!(count, 1, "{qt} registered {count} times");
            assert!(query_def(*qt).is_some());
        }
        assert_eq!(QUERY_REGISTRY.len(), QueryType::ALL.len());
    }

    #[test]
    fn query_type_parses_both_spellings() {
        assert_eq!(
            QueryType::from_str("get-disk-by-id").unwrap(),
            QueryType::GetDiskById
        );
        assert_eq!(
            QueryType::from_str("GetRelocationVerdict").unwrap(),
            QueryType::GetRelocationVerdict
        );
        assert!(QueryType::from_str("ThereIsNoSuchQuery").is_err());
    }

    #[test]
    fn permission_matrix() {
        let svc = service();
        let booleans = [true, false];
        for qt in QueryType::ALL {
            for filtered in booleans {
                for admin in booleans {
                    for internal in booleans {
                        let expected = internal || admin || (filtered && !qt.is_admin());
                        let ctx = ExecutionContext::user("test", Guid::from_u128(0xabc), admin)
                            .with_internal_execution(internal);

                        let ret = svc.execute(&ctx, *qt, &full_params(filtered));

                        assert_eq!(
                            ret.succeeded, expected,
                            "type={qt} admin={admin} filtered={filtered} internal={internal}"
                        );
                        if !expected {
                            assert_eq!(
                                ret.exception_string.as_deref(),
                                Some(INSUFFICIENT_PERMISSIONS)
                            );
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn denied_query_never_reaches_the_store() {
        let mut readers = FakeInventory::standard().into_readers();
        let mut domains = MockStorageDomainStore::new();
        domains.expect_list().never();
        readers.storage_domains = Arc::new(domains);

        let svc = service_over(readers);
        let ctx = ExecutionContext::user("s", Guid::from_u128(1), false);
        let ret = svc.execute(
            &ctx,
            QueryType::GetAllStorageDomains,
            &QueryParameters::default().filtered(true),
        );
        assert!(!ret.succeeded);
    }

    #[test]
    fn missing_id_fails_with_message() {
        let ret = service().execute(
            &ExecutionContext::internal(),
            QueryType::GetDiskById,
            &QueryParameters::default(),
        );
        assert!(!ret.succeeded);
        assert!(ret.exception_string.unwrap().contains("an id is required"));
    }

    #[test]
    fn verdict_query_runs_the_pipeline() {
        let ret = service().execute(
            &ExecutionContext::internal(),
            QueryType::GetRelocationVerdict,
            &QueryParameters::for_request(RelocationRequest::new(
                DISK,
                SRC,
                SRC,
                ImageOperation::Copy,
            )),
        );
        assert!(ret.succeeded);
        match ret.value {
            Some(QueryValue::Verdict(v)) => {
                assert_eq!(v.reason(), Some(FailureReason::SourceAndTargetSame))
            }
            other => panic!("unexpected value {other:?}"),
        }
    }

    #[test]
    fn disk_query_returns_record() {
        let ret = service().execute(
            &ExecutionContext::internal(),
            QueryType::GetDiskById,
            &QueryParameters::for_id(DISK),
        );
        match ret.value {
            Some(QueryValue::Disk(Some(d))) => assert_eq!(d.id, DISK),
            other => panic!("unexpected value {other:?}"),
        }
    }
}
