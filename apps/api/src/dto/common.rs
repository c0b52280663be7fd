use serde::Serialize;
use shopgate_application::{BulkItemFailure, BulkRemoveResult};
use ts_rs::TS;

/// Health response payload.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/health-response.ts"
)]
pub struct HealthResponse {
    pub status: &'static str,
}

/// One item of a bulk payload that could not be applied.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/bulk-failure-response.ts"
)]
pub struct BulkFailureResponse {
    pub key: String,
    pub reason: String,
}

/// Outcome of a bulk removal.
#[derive(Debug, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/bulk-remove-response.ts"
)]
pub struct BulkRemoveResponse {
    pub message: String,
    pub removed_count: usize,
    pub skipped_count: usize,
    pub failures: Vec<BulkFailureResponse>,
}

/// Whether a single association was inserted.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/created-response.ts"
)]
pub struct CreatedResponse {
    pub created: bool,
}

/// Whether a single association was removed.
#[derive(Debug, Serialize, TS)]
#[ts(
    export,
    export_to = "../../../packages/api-types/src/generated/removed-response.ts"
)]
pub struct RemovedResponse {
    pub removed: bool,
}

impl From<BulkItemFailure> for BulkFailureResponse {
    fn from(value: BulkItemFailure) -> Self {
        Self {
            key: value.key,
            reason: value.reason,
        }
    }
}

impl From<BulkRemoveResult> for BulkRemoveResponse {
    fn from(value: BulkRemoveResult) -> Self {
        Self {
            message: value.message,
            removed_count: value.removed_count,
            skipped_count: value.skipped_count,
            failures: value
                .failures
                .into_iter()
                .map(BulkFailureResponse::from)
                .collect(),
        }
    }
}
