// Zone poller - refreshes camera summaries on a fixed cadence
use crate::application::summary_cache::SummaryCache;
use crate::application::zone_service::{WindowRequest, ZoneService};
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

pub struct ZonePoller {
    service: ZoneService,
    cache: SummaryCache,
    cameras: Vec<i64>,
    interval: Duration,
    lookback_hours: i64,
}

/// Clears a camera's in-flight flag when the fetch task ends, however it ends.
struct InFlightGuard(Arc<AtomicBool>);

impl InFlightGuard {
    fn try_claim(flag: &Arc<AtomicBool>) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag.clone()))
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

impl ZonePoller {
    pub fn new(
        service: ZoneService,
        cache: SummaryCache,
        cameras: Vec<i64>,
        interval: Duration,
        lookback_hours: i64,
    ) -> Self {
        Self {
            service,
            cache,
            cameras,
            interval,
            lookback_hours,
        }
    }

    /// Start polling until `cancel` fires. Cancelling also abandons fetches
    /// that are still outstanding.
    pub fn spawn(self, cancel: CancellationToken) -> JoinHandle<()> {
        tokio::spawn(self.run(cancel))
    }

    async fn run(self, cancel: CancellationToken) {
        let in_flight: HashMap<i64, Arc<AtomicBool>> = self
            .cameras
            .iter()
            .map(|&id| (id, Arc::new(AtomicBool::new(false))))
            .collect();

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tracing::info!(
            cameras = ?self.cameras,
            interval_ms = self.interval.as_millis() as u64,
            "zone poller started"
        );

        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }

            for (&camera_id, flag) in &in_flight {
                let Some(guard) = InFlightGuard::try_claim(flag) else {
                    tracing::debug!(camera_id, "previous fetch still in flight, skipping tick");
                    continue;
                };
                self.spawn_fetch(camera_id, guard, cancel.clone());
            }
        }

        tracing::info!("zone poller stopped");
    }

    fn spawn_fetch(&self, camera_id: i64, guard: InFlightGuard, cancel: CancellationToken) {
        let service = self.service.clone();
        let cache = self.cache.clone();
        let request = WindowRequest::trailing_hours(self.lookback_hours);

        tokio::spawn(async move {
            let _guard = guard;
            tokio::select! {
                _ = cancel.cancelled() => {
                    tracing::debug!(camera_id, "abandoning in-flight fetch");
                }
                result = service.camera_summary(camera_id, &request, None) => match result {
                    Ok(summary) => cache.insert(summary).await,
                    Err(e) => {
                        tracing::warn!(camera_id, "poll failed, keeping previous summary: {}", e);
                    }
                },
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::clock::SystemClock;
    use crate::application::readings_source::{ReadingsSource, SourceError};
    use crate::application::zone_service::testing::FakeSource;
    use crate::domain::reading::{Camera, Reading, Zone};
    use crate::domain::settings::PipelineSettings;
    use crate::domain::window::DisplayWindow;
    use crate::infrastructure::memory_session::InMemorySessionStore;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::atomic::AtomicUsize;

    struct SlowSource {
        delay: Duration,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ReadingsSource for SlowSource {
        async fn list_cameras(&self, _token: Option<&str>) -> Result<Vec<Camera>, SourceError> {
            Ok(Vec::new())
        }

        async fn fetch_zones(
            &self,
            _camera_id: i64,
            _window: &DisplayWindow,
            _token: Option<&str>,
        ) -> Result<Vec<Zone>, SourceError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(self.delay).await;
            Ok(vec![Zone::new(1, vec![Reading::new(Utc::now(), 20.0)])])
        }
    }

    fn service(source: Arc<dyn ReadingsSource>) -> ZoneService {
        ZoneService::new(
            source,
            Arc::new(InMemorySessionStore::default()),
            Arc::new(SystemClock),
            PipelineSettings::default(),
        )
    }

    async fn wait_for<F, Fut>(mut check: F) -> bool
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = bool>,
    {
        for _ in 0..100 {
            if check().await {
                return true;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        false
    }

    #[tokio::test]
    async fn test_poller_fills_cache() {
        let zones = vec![Zone::new(1, vec![Reading::new(Utc::now(), 22.0)])];
        let source = Arc::new(FakeSource::with_zones(zones));
        let cache = SummaryCache::default();
        let cancel = CancellationToken::new();

        let handle = ZonePoller::new(
            service(source),
            cache.clone(),
            vec![9],
            Duration::from_millis(20),
            24,
        )
        .spawn(cancel.clone());

        assert!(wait_for(|| async { cache.get(9).await.is_some() }).await);
        let summary = cache.get(9).await.unwrap();
        assert_eq!(summary.zones[0].last_value, Some(22.0));

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_skips_tick_while_fetch_in_flight() {
        let source = Arc::new(SlowSource {
            delay: Duration::from_millis(400),
            calls: AtomicUsize::new(0),
        });
        let cancel = CancellationToken::new();

        let handle = ZonePoller::new(
            service(source.clone()),
            SummaryCache::default(),
            vec![1],
            Duration::from_millis(10),
            24,
        )
        .spawn(cancel.clone());

        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(source.calls.load(Ordering::SeqCst), 1);

        cancel.cancel();
        handle.await.unwrap();
    }

    #[tokio::test]
    async fn test_cancel_abandons_in_flight_fetch() {
        let source = Arc::new(SlowSource {
            delay: Duration::from_millis(300),
            calls: AtomicUsize::new(0),
        });
        let cache = SummaryCache::default();
        let cancel = CancellationToken::new();

        let handle = ZonePoller::new(
            service(source.clone()),
            cache.clone(),
            vec![1],
            Duration::from_secs(60),
            24,
        )
        .spawn(cancel.clone());

        assert!(wait_for(|| async { source.calls.load(Ordering::SeqCst) == 1 }).await);
        cancel.cancel();
        handle.await.unwrap();

        tokio::time::sleep(Duration::from_millis(400)).await;
        assert!(cache.get(1).await.is_none());
    }

    #[tokio::test]
    async fn test_failed_poll_keeps_previous_summary() {
        let zones = vec![Zone::new(1, vec![Reading::new(Utc::now(), 19.0)])];
        let source = Arc::new(FakeSource::with_zones(zones));
        let cache = SummaryCache::default();
        let cancel = CancellationToken::new();

        let handle = ZonePoller::new(
            service(source.clone()),
            cache.clone(),
            vec![5],
            Duration::from_millis(20),
            24,
        )
        .spawn(cancel.clone());

        assert!(wait_for(|| async { cache.get(5).await.is_some() }).await);
        *source.error.lock().unwrap() = Some(SourceError::Network("down".into()));
        let calls_before = source.seen_windows.lock().unwrap().len();
        assert!(
            wait_for(|| async { source.seen_windows.lock().unwrap().len() > calls_before + 2 })
                .await
        );

        let summary = cache.get(5).await.unwrap();
        assert_eq!(summary.zones[0].last_value, Some(19.0));

        cancel.cancel();
        handle.await.unwrap();
    }
}
