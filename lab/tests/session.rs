use async_trait::async_trait;
use block_economics::{NetworkSnapshot, Preset};
use block_lab::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Succeeds on the first fetch, then fails every time after.
struct FlakySource {
    calls: AtomicUsize,
    inner: StaticSource,
}

impl FlakySource {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
            inner: StaticSource::mock_baseline(),
        }
    }
}

#[async_trait]
impl SnapshotSource for FlakySource {
    async fn fetch(&self) -> Result<LiveData, ClientError> {
        if self.calls.fetch_add(1, Ordering::SeqCst) == 0 {
            self.inner.fetch().await
        } else {
            Err(ClientError::http(503))
        }
    }

    fn describe(&self) -> String {
        "flaky".to_string()
    }
}

fn snapshot(height: u64) -> NetworkSnapshot {
    NetworkSnapshot {
        transaction_volume_ratio: 1.0,
        unique_miner_count: 64,
        block_height: height,
        block_time_ms: 1000.0,
        mempool_fullness_pct: 10.0,
        issued_supply: 2_000_000.0,
    }
}

#[tokio::test]
async fn test_refresh_publishes_report() {
    let session = LabSession::new(&LabConfig::default());
    assert!(session.latest().is_none());

    session
        .refresh(&StaticSource::mock_baseline())
        .await
        .unwrap();

    let report = session.latest().unwrap();
    assert_eq!(report.live_revision, 1);
    assert_eq!(report.gates.len(), 4);
}

#[tokio::test]
async fn test_failed_refresh_keeps_last_known_good() {
    let session = LabSession::new(&LabConfig::default());
    let source = FlakySource::new();

    session.refresh(&source).await.unwrap();
    let good = session.latest().unwrap();

    let err = session.refresh(&source).await.unwrap_err();
    assert!(matches!(err, ClientError::Http(503, _)));

    let after = session.latest().unwrap();
    assert_eq!(after, good);
    let ctx = session.context();
    let ctx = ctx.lock().await;
    assert_eq!(ctx.live_revision(), 1);
    assert_eq!(
        ctx.live().unwrap().snapshot,
        StaticSource::mock_baseline().fetch().await.unwrap().snapshot
    );
}

#[tokio::test(start_paused = true)]
async fn test_edits_are_debounced() {
    let mut session = LabSession::new(&LabConfig::default());
    session
        .refresh(&StaticSource::new(snapshot(10), Vec::new()))
        .await
        .unwrap();

    let mut rx = session.subscribe();
    rx.borrow_and_update();

    for ratio in [1.2, 1.4, 1.6, 1.8, 2.0] {
        session.submit(InputEdit::TransactionVolumeRatio(ratio)).await;
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    assert!(session.has_pending_recompute());
    assert!(!rx.has_changed().unwrap());

    tokio::time::sleep(Duration::from_millis(400)).await;
    assert!(rx.has_changed().unwrap());

    let report = rx.borrow_and_update().clone().unwrap();
    assert_eq!(report.inputs.network.transaction_volume_ratio, 2.0);
    assert!(report.comparison.deltas.reward > 0.0);
    assert!(!session.has_pending_recompute());
}

#[tokio::test]
async fn test_preset_publishes_immediately() {
    let mut session = LabSession::new(&LabConfig::default());
    assert!(!session.apply_preset(Preset::Surge).await);

    session
        .refresh(&StaticSource::new(snapshot(10), Vec::new()))
        .await
        .unwrap();
    assert!(session.apply_preset(Preset::Surge).await);

    let report = session.latest().unwrap();
    assert_eq!(report.preset, Some(Preset::Surge));
    assert_eq!(report.inputs.network.transaction_volume_ratio, 2.5);
}

#[tokio::test]
async fn test_pin_publishes_comparison() {
    let session = LabSession::new(&LabConfig::default());
    session
        .refresh(&StaticSource::new(snapshot(10), Vec::new()))
        .await
        .unwrap();

    session.pin().await;
    assert!(session.latest().unwrap().pinned.is_some());

    session.unpin().await;
    assert!(session.latest().unwrap().pinned.is_none());
}

#[tokio::test(start_paused = true)]
async fn test_poller_refreshes() {
    let session = LabSession::new(&LabConfig::default());
    let mut rx = session.subscribe();

    let source: Arc<dyn SnapshotSource> = Arc::new(StaticSource::new(snapshot(10), Vec::new()));
    let poller = session.spawn_poller(source, Duration::from_secs(5));

    rx.changed().await.unwrap();
    assert_eq!(rx.borrow_and_update().as_ref().unwrap().live_revision, 1);

    tokio::time::sleep(Duration::from_secs(11)).await;
    assert_eq!(session.latest().unwrap().live_revision, 3);

    poller.abort();
}

/// Each fetch reports a taller chain than the last.
struct GrowingSource {
    height: AtomicUsize,
}

#[async_trait]
impl SnapshotSource for GrowingSource {
    async fn fetch(&self) -> Result<LiveData, ClientError> {
        let height = self.height.fetch_add(1, Ordering::SeqCst) as u64;
        tokio::task::yield_now().await;
        StaticSource::new(snapshot(height), Vec::new()).fetch().await
    }

    fn describe(&self) -> String {
        "growing".to_string()
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_publishers_end_on_latest_revision() {
    let source = Arc::new(GrowingSource {
        height: AtomicUsize::new(1),
    });

    for _ in 0..50 {
        let session = Arc::new(LabSession::new(&LabConfig::default()));
        let mut tasks = Vec::new();
        for i in 0..8 {
            let session = session.clone();
            let source = source.clone();
            tasks.push(tokio::spawn(async move {
                if i % 2 == 0 {
                    session.refresh(source.as_ref()).await.unwrap();
                } else {
                    session.pin().await;
                }
            }));
        }
        for task in tasks {
            task.await.unwrap();
        }

        let published = session.latest().unwrap();
        let ctx = session.context();
        let ctx = ctx.lock().await;
        assert_eq!(published.live_revision, ctx.live_revision());
        assert_eq!(published.live_revision, 4);
        assert_eq!(
            published.comparison.baseline,
            block_economics::compute_issuance(&ctx.live().unwrap().snapshot, ctx.params())
        );
    }
}
