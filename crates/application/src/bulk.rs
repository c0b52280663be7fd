use std::fmt::Display;
use std::future::Future;

use shopgate_core::{AppError, AppResult};

/// Per-item outcome of an idempotent bulk operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulkItemOutcome {
    /// The item changed stored state.
    Applied,
    /// The stored state already matched; nothing changed.
    Skipped,
}

/// Item that could not be processed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkItemFailure {
    /// Key as supplied by the caller.
    pub key: String,
    /// Failure reason.
    pub reason: String,
}

/// Aggregate result of [`apply_each`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkOutcome<K> {
    /// Keys that changed stored state.
    pub succeeded: Vec<K>,
    /// Keys that were already satisfied.
    pub skipped: Vec<K>,
    /// Keys that failed, with reasons.
    pub failed: Vec<BulkItemFailure>,
}

impl<K> Default for BulkOutcome<K> {
    fn default() -> Self {
        Self {
            succeeded: Vec::new(),
            skipped: Vec::new(),
            failed: Vec::new(),
        }
    }
}

impl<K> BulkOutcome<K> {
    /// Summarizes the outcome of a removal batch.
    #[must_use]
    pub fn into_remove_result(self, noun: &str) -> BulkRemoveResult {
        let removed_count = self.succeeded.len();
        let skipped_count = self.skipped.len();
        let failed_count = self.failed.len();

        let mut message =
            format!("removed {removed_count} {noun}, skipped {skipped_count} already absent");
        if failed_count > 0 {
            message.push_str(&format!(", {failed_count} failed"));
        }

        BulkRemoveResult {
            message,
            removed_count,
            skipped_count,
            failures: self.failed,
        }
    }

    /// Summarizes the outcome of an add batch with the resulting association set.
    #[must_use]
    pub fn into_add_result<A>(self, associations: Vec<A>) -> BulkAddResult<A> {
        BulkAddResult {
            associations,
            created_count: self.succeeded.len(),
            unchanged_count: self.skipped.len(),
            failures: self.failed,
        }
    }
}

/// Result of a bulk removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkRemoveResult {
    /// Human-readable summary.
    pub message: String,
    /// Associations deleted by this call.
    pub removed_count: usize,
    /// Keys with no association to delete.
    pub skipped_count: usize,
    /// Malformed keys.
    pub failures: Vec<BulkItemFailure>,
}

/// Result of a bulk add.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkAddResult<A> {
    /// Every association present after the call, not just the new ones.
    pub associations: Vec<A>,
    /// Associations created by this call.
    pub created_count: usize,
    /// Keys that were already associated.
    pub unchanged_count: usize,
    /// Keys that could not be applied.
    pub failures: Vec<BulkItemFailure>,
}

/// Rejects an empty bulk payload.
pub fn ensure_non_empty<K>(items: &[K], what: &str) -> AppResult<()> {
    if items.is_empty() {
        return Err(AppError::Validation(format!(
            "at least one {what} is required"
        )));
    }

    Ok(())
}

/// Applies an idempotent operation to every item independently.
///
/// Items run in order without a shared transaction. A failing item is recorded
/// and never rolls back or stops the items around it.
pub async fn apply_each<K, F, Fut>(
    items: impl IntoIterator<Item = K>,
    mut operation: F,
) -> BulkOutcome<K>
where
    K: Clone + Display,
    F: FnMut(K) -> Fut,
    Fut: Future<Output = AppResult<BulkItemOutcome>>,
{
    let mut outcome = BulkOutcome::default();

    for item in items {
        match operation(item.clone()).await {
            Ok(BulkItemOutcome::Applied) => outcome.succeeded.push(item),
            Ok(BulkItemOutcome::Skipped) => outcome.skipped.push(item),
            Err(error) => outcome.failed.push(BulkItemFailure {
                key: item.to_string(),
                reason: error.to_string(),
            }),
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use shopgate_core::AppError;
    use tokio::sync::Mutex;

    use super::{BulkItemOutcome, apply_each, ensure_non_empty};

    #[tokio::test]
    async fn apply_each_partitions_items_by_outcome() {
        let existing = Mutex::new(HashSet::from(["a".to_owned(), "c".to_owned()]));

        let outcome = apply_each(
            vec!["a".to_owned(), "b".to_owned(), "bad key".to_owned(), "c".to_owned()],
            |key: String| {
                let existing = &existing;
                async move {
                    if key.contains(' ') {
                        return Err(AppError::Validation(format!("malformed key '{key}'")));
                    }
                    if existing.lock().await.remove(&key) {
                        Ok(BulkItemOutcome::Applied)
                    } else {
                        Ok(BulkItemOutcome::Skipped)
                    }
                }
            },
        )
        .await;

        assert_eq!(outcome.succeeded, vec!["a".to_owned(), "c".to_owned()]);
        assert_eq!(outcome.skipped, vec!["b".to_owned()]);
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].key, "bad key");
        assert!(existing.lock().await.is_empty());
    }

    #[tokio::test]
    async fn remove_result_reports_counts_and_message() {
        let outcome = apply_each(vec![1, 2, 3], |key: i32| async move {
            if key == 2 {
                Ok(BulkItemOutcome::Skipped)
            } else {
                Ok(BulkItemOutcome::Applied)
            }
        })
        .await;

        let result = outcome.into_remove_result("roles");
        assert_eq!(result.removed_count, 2);
        assert_eq!(result.skipped_count, 1);
        assert_eq!(result.message, "removed 2 roles, skipped 1 already absent");
        assert!(result.failures.is_empty());
    }

    #[test]
    fn ensure_non_empty_rejects_empty_payload() {
        let empty: Vec<String> = Vec::new();
        assert!(matches!(
            ensure_non_empty(&empty, "role id"),
            Err(AppError::Validation(_))
        ));
        assert!(ensure_non_empty(&["x"], "role id").is_ok());
    }
}
