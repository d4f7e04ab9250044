// Latest polled summaries, shared between the poller and HTTP handlers
use crate::domain::summary::CameraSummary;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Clone, Default)]
pub struct SummaryCache {
    inner: Arc<RwLock<HashMap<i64, CameraSummary>>>,
}

impl SummaryCache {
    pub async fn get(&self, camera_id: i64) -> Option<CameraSummary> {
        self.inner.read().await.get(&camera_id).cloned()
    }

    /// Replace a camera's summary wholesale.
    pub async fn insert(&self, summary: CameraSummary) {
        self.inner.write().await.insert(summary.camera_id, summary);
    }
}
