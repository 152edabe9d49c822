//! Active media collection for product hashing

use std::cmp::Ordering;

use crate::model::{MediaEntry, MediaRecord};
use crate::ports::{MediaStore, StoreError};

/// Workflow states whose media never contribute to a product hash
pub const EXCLUDED_WORKFLOWS: [&str; 2] = ["archived", "unpublished"];

/// Store-level query for the active media of one product
///
/// Matches records whose `metadata.productId` equals `product_id` and whose
/// workflow is not excluded (a record without a workflow matches). Results
/// are ordered by `(metadata.priority, uploadedAt)` ascending with missing
/// values first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaQuery {
    pub product_id: String,
    pub excluded_workflows: Vec<String>,
}

impl MediaQuery {
    pub fn active_for_product(product_id: impl Into<String>) -> Self {
        Self {
            product_id: product_id.into(),
            excluded_workflows: EXCLUDED_WORKFLOWS.iter().map(|w| w.to_string()).collect(),
        }
    }

    /// Whether a record satisfies the query's filter
    pub fn matches(&self, record: &MediaRecord) -> bool {
        if record.metadata.product_id.as_deref() != Some(self.product_id.as_str()) {
            return false;
        }

        match &record.metadata.workflow {
            Some(workflow) => !self.excluded_workflows.contains(workflow),
            None => true,
        }
    }

    /// Query sort order; `None` sorts before any value
    pub fn compare(a: &MediaRecord, b: &MediaRecord) -> Ordering {
        a.metadata
            .priority
            .cmp(&b.metadata.priority)
            .then_with(|| a.uploaded_at.cmp(&b.uploaded_at))
    }
}

/// Collect the id/priority list of a product's active media.
///
/// The store returns records in query order; the derived list is then
/// stable-sorted by priority alone with missing priorities last.
pub async fn collect_media<M>(store: &M, product_id: &str) -> Result<Vec<MediaEntry>, StoreError>
where
    M: MediaStore + ?Sized,
{
    let query = MediaQuery::active_for_product(product_id);
    let records = store.find_media(&query).await?;

    let mut entries: Vec<MediaEntry> = records.iter().map(MediaEntry::from).collect();
    entries.sort_by(|a, b| compare_priority(a.priority, b.priority));

    tracing::debug!(
        product_id = %product_id,
        media_count = entries.len(),
        "Collected active media"
    );

    Ok(entries)
}

fn compare_priority(a: Option<i64>, b: Option<i64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
