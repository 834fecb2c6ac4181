//! Reactive shell around [`LabContext`]
//!
//! Live data arrives from a poller and is published right away. Input edits
//! are applied immediately but published through the debouncer, so dragging
//! a value produces one recompute once the user pauses.

use std::sync::Arc;
use std::time::Duration;

use block_economics::Preset;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::config::LabConfig;
use crate::context::{InputEdit, LabContext, LabReport};
use crate::debounce::Debouncer;
use crate::rpc::ClientError;
use crate::source::SnapshotSource;

pub type SharedContext = Arc<Mutex<LabContext>>;

pub struct LabSession {
    context: SharedContext,
    reports: watch::Sender<Option<LabReport>>,
    debouncer: Debouncer,
}

impl LabSession {
    pub fn new(config: &LabConfig) -> Self {
        let (reports, _) = watch::channel(None);
        Self {
            context: Arc::new(Mutex::new(LabContext::new(config))),
            reports,
            debouncer: Debouncer::new(config.debounce()),
        }
    }

    pub fn context(&self) -> SharedContext {
        self.context.clone()
    }

    /// Receiver that sees every published report.
    pub fn subscribe(&self) -> watch::Receiver<Option<LabReport>> {
        self.reports.subscribe()
    }

    pub fn latest(&self) -> Option<LabReport> {
        self.reports.borrow().clone()
    }

    /// Fetch once. On failure the last known-good snapshot stays in place.
    pub async fn refresh(&self, source: &dyn SnapshotSource) -> Result<(), ClientError> {
        refresh_into(&self.context, &self.reports, source).await
    }

    /// Refresh from `source` every `every` until the handle is aborted.
    pub fn spawn_poller(&self, source: Arc<dyn SnapshotSource>, every: Duration) -> JoinHandle<()> {
        let context = self.context.clone();
        let reports = self.reports.clone();

        tokio::spawn(async move {
            let mut ticker = interval(every);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            log::info!(
                "Snapshot poller started: {} every {}ms",
                source.describe(),
                every.as_millis()
            );

            loop {
                ticker.tick().await;
                // Errors are logged inside; keep polling.
                let _ = refresh_into(&context, &reports, source.as_ref()).await;
            }
        })
    }

    /// Apply an edit now, publish after the debounce window.
    pub async fn submit(&mut self, edit: InputEdit) {
        self.context.lock().await.apply_edit(edit);
        self.schedule_publish();
    }

    /// Presets are discrete actions and publish immediately.
    pub async fn apply_preset(&mut self, preset: Preset) -> bool {
        let applied = self.context.lock().await.apply_preset(preset);
        if applied {
            self.debouncer.cancel();
            publish(&self.context, &self.reports).await;
        }
        applied
    }

    pub async fn pin(&self) {
        self.context.lock().await.pin();
        publish(&self.context, &self.reports).await;
    }

    pub async fn unpin(&self) {
        self.context.lock().await.unpin();
        publish(&self.context, &self.reports).await;
    }

    pub fn has_pending_recompute(&self) -> bool {
        self.debouncer.is_pending()
    }

    fn schedule_publish(&mut self) {
        let context = self.context.clone();
        let reports = self.reports.clone();
        self.debouncer.schedule(async move {
            publish(&context, &reports).await;
        });
    }
}

async fn refresh_into(
    context: &SharedContext,
    reports: &watch::Sender<Option<LabReport>>,
    source: &dyn SnapshotSource,
) -> Result<(), ClientError> {
    match source.fetch().await {
        Ok(data) => {
            let mut ctx = context.lock().await;
            ctx.apply_live(data);
            publish_locked(&mut ctx, reports);
            Ok(())
        }
        Err(e) => {
            log::warn!(
                "⚠️ Refresh from {} failed, keeping last snapshot: {}",
                source.describe(),
                e
            );
            Err(e)
        }
    }
}

async fn publish(context: &SharedContext, reports: &watch::Sender<Option<LabReport>>) {
    let mut ctx = context.lock().await;
    publish_locked(&mut ctx, reports);
}

/// Send while the context lock is held, so publications follow the order
/// of state changes and the channel never ends on a stale revision.
fn publish_locked(ctx: &mut LabContext, reports: &watch::Sender<Option<LabReport>>) {
    if let Some(report) = ctx.report() {
        reports.send_replace(Some(report));
    }
}
