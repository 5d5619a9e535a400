//! Debounced background saving of editor drafts.
//!
//! Each post gets one worker task with a single pending slot. A new draft
//! replaces whatever is pending and restarts the quiet period. Once the
//! editor has been quiet for the debounce interval the pending draft is
//! saved. At most one save runs at a time; drafts that arrive meanwhile are
//! saved after it finishes. Failures are logged and counted, never
//! reported back to the editor. A worker with nothing to do for the idle
//! timeout stops; the registry then forgets it and spawns a fresh one on
//! the next draft.

use crate::domain::PostInput;
use crate::routes::blog::queries;
use anyhow::Context;
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use uuid::Uuid;

pub const DEFAULT_IDLE_TIMEOUT: Duration = Duration::from_secs(30 * 60);

#[async_trait::async_trait]
pub trait DraftStore: Send + Sync + 'static {
    async fn save(&self, post_id: Uuid, draft: PostInput) -> Result<(), anyhow::Error>;
}

/// Persists drafts through the same update path as a manual save.
pub struct PgDraftStore {
    pool: PgPool,
}

impl PgDraftStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl DraftStore for PgDraftStore {
    #[tracing::instrument(name = "Auto-saving draft", skip(self, draft))]
    async fn save(&self, post_id: Uuid, draft: PostInput) -> Result<(), anyhow::Error> {
        let post = draft.validate_existing()?;
        queries::update_post(&self.pool, post_id, &post)
            .await
            .context("Failed to auto-save the draft.")?
            .ok_or_else(|| anyhow::anyhow!("Post {} no longer exists.", post_id))?;
        Ok(())
    }
}

#[derive(Default)]
struct SaveCounters {
    completed: AtomicU64,
    failed: AtomicU64,
}

pub struct AutoSaver {
    sender: mpsc::UnboundedSender<PostInput>,
    counters: Arc<SaveCounters>,
}

impl AutoSaver {
    /// Starts the worker. Must be called inside a tokio runtime.
    pub fn spawn(
        post_id: Uuid,
        store: Arc<dyn DraftStore>,
        debounce: Duration,
        idle_timeout: Duration,
    ) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let counters = Arc::new(SaveCounters::default());
        tokio::spawn(run_worker(
            post_id,
            store,
            Timing {
                debounce,
                idle_timeout,
            },
            receiver,
            counters.clone(),
        ));
        Self { sender, counters }
    }

    /// Hands the draft back if the worker has already stopped.
    pub fn submit(&self, draft: PostInput) -> Result<(), PostInput> {
        self.sender.send(draft).map_err(|e| e.0)
    }

    pub fn is_stopped(&self) -> bool {
        self.sender.is_closed()
    }

    pub fn completed_saves(&self) -> u64 {
        self.counters.completed.load(Ordering::SeqCst)
    }

    pub fn failed_saves(&self) -> u64 {
        self.counters.failed.load(Ordering::SeqCst)
    }
}

struct Timing {
    debounce: Duration,
    idle_timeout: Duration,
}

async fn run_worker(
    post_id: Uuid,
    store: Arc<dyn DraftStore>,
    timing: Timing,
    mut receiver: mpsc::UnboundedReceiver<PostInput>,
    counters: Arc<SaveCounters>,
) {
    let mut pending: Option<PostInput> = None;
    loop {
        if pending.is_none() {
            match tokio::time::timeout(timing.idle_timeout, receiver.recv()).await {
                Ok(Some(draft)) => pending = Some(draft),
                Ok(None) => return,
                Err(_) => {
                    // Refuse new drafts, then finish whatever slipped in first.
                    receiver.close();
                    while let Ok(draft) = receiver.try_recv() {
                        pending = Some(draft);
                    }
                    if pending.is_none() {
                        tracing::debug!(%post_id, "Idle auto-saver stopped");
                        return;
                    }
                }
            }
        }

        // Quiet period: every new draft replaces the slot and restarts the timer.
        loop {
            tokio::select! {
                next = receiver.recv() => match next {
                    Some(draft) => pending = Some(draft),
                    None => break,
                },
                _ = tokio::time::sleep(timing.debounce) => break,
            }
        }

        let Some(draft) = pending.take() else {
            continue;
        };
        match store.save(post_id, draft).await {
            Ok(()) => {
                counters.completed.fetch_add(1, Ordering::SeqCst);
                tracing::debug!(%post_id, "Draft auto-saved");
            }
            Err(e) => {
                counters.failed.fetch_add(1, Ordering::SeqCst);
                tracing::warn!(%post_id, error.cause_chain = ?e, "Auto-save failed");
            }
        }

        // Edits made during the save: only the newest one matters.
        while let Ok(draft) = receiver.try_recv() {
            pending = Some(draft);
        }
    }
}

/// One saver per post being edited.
pub struct AutoSaveRegistry {
    store: Arc<dyn DraftStore>,
    debounce: Duration,
    idle_timeout: Duration,
    savers: Mutex<HashMap<Uuid, AutoSaver>>,
}

impl AutoSaveRegistry {
    pub fn new(store: Arc<dyn DraftStore>, debounce: Duration) -> Self {
        Self {
            store,
            debounce,
            idle_timeout: DEFAULT_IDLE_TIMEOUT,
            savers: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_idle_timeout(mut self, idle_timeout: Duration) -> Self {
        self.idle_timeout = idle_timeout;
        self
    }

    fn spawn_saver(&self, post_id: Uuid) -> AutoSaver {
        AutoSaver::spawn(post_id, self.store.clone(), self.debounce, self.idle_timeout)
    }

    pub fn submit(&self, post_id: Uuid, draft: PostInput) {
        let mut savers = self
            .savers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        savers.retain(|_, saver| !saver.is_stopped());
        let saver = savers
            .entry(post_id)
            .or_insert_with(|| self.spawn_saver(post_id));
        if let Err(draft) = saver.submit(draft) {
            // Went idle between the sweep and the send.
            let fresh = self.spawn_saver(post_id);
            let _ = fresh.submit(draft);
            savers.insert(post_id, fresh);
        }
    }

    /// Savers whose worker is still running.
    pub fn active_savers(&self) -> usize {
        let savers = self
            .savers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        savers.values().filter(|saver| !saver.is_stopped()).count()
    }

    /// Drops the saver; a draft still pending is flushed before the worker exits.
    pub fn remove(&self, post_id: Uuid) {
        let mut savers = self
            .savers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        savers.remove(&post_id);
    }
}
