//! Debounced apply coordination.
//!
//! Persisting and painting a color happens on every request. Recording it as
//! a recent selection waits until the color has been left alone for the
//! commit window, so dragging a picker across hundreds of intermediate
//! values only ever records the one the user settled on.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tint_model::{HexColor, Origin, Rgb};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tokio::task::{AbortHandle, JoinSet};
use tokio::time::{Duration, Instant, sleep_until};
use tracing::{debug, info, warn};

use super::delivery::{DeliveryOutcome, PaletteDelivery, PaletteRequest};
use crate::color::normalize;
use crate::error::Result;
use crate::store::{KeyValueStore, OriginColorStore};

/// Default stability window before a color is recorded as recent.
pub const DEFAULT_COMMIT_DELAY: Duration = Duration::from_millis(3_000);

/// Color used when an origin has no preference or the store is unreachable
/// (`#3584e4`).
pub const DEFAULT_BASE_RGB: Rgb = Rgb::new(0x35, 0x84, 0xe4);

/// When a requested color is committed to the recents list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommitPolicy {
    /// Commit once the color has been stable for the given window.
    Delayed(Duration),
    /// Commit as part of the request itself.
    Immediate,
}

impl Default for CommitPolicy {
    fn default() -> Self {
        Self::Delayed(DEFAULT_COMMIT_DELAY)
    }
}

impl CommitPolicy {
    /// `0` selects [`CommitPolicy::Immediate`].
    pub fn from_delay_ms(delay_ms: u64) -> Self {
        if delay_ms == 0 {
            Self::Immediate
        } else {
            Self::Delayed(Duration::from_millis(delay_ms))
        }
    }
}

/// Configuration knobs for the coordinator.
#[derive(Debug, Clone)]
pub struct CoordinatorConfig {
    pub commit_policy: CommitPolicy,
    pub default_color: HexColor,
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self {
            commit_policy: CommitPolicy::default(),
            default_color: default_base_color(),
        }
    }
}

pub fn default_base_color() -> HexColor {
    HexColor::from_rgb(DEFAULT_BASE_RGB)
}

/// Per-origin commit state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommitState {
    Idle,
    PendingCommit { hex: HexColor, deadline: Instant },
}

/// Result of a successful apply request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedColor {
    pub origin: Origin,
    pub color: HexColor,
    pub delivery: DeliveryOutcome,
}

struct PendingCommit {
    ticket: u64,
    hex: HexColor,
    deadline: Instant,
    task: AbortHandle,
}

type PendingMap = Arc<Mutex<HashMap<Origin, PendingCommit>>>;

/// Serializes apply requests per origin and defers the recents commit.
///
/// Persist, paint and schedule for one origin run under that origin's lock,
/// so overlapping requests take effect in arrival order. At most one commit
/// is pending per origin: scheduling cancels the previous one first. Origins
/// never share a lock or a timer.
pub struct ApplyCoordinator<S>
where
    S: KeyValueStore + ?Sized + 'static,
{
    store: OriginColorStore<S>,
    delivery: PaletteDelivery,
    config: CoordinatorConfig,
    pending: PendingMap,
    origin_locks: Mutex<HashMap<Origin, Arc<Mutex<()>>>>,
    commits: Mutex<JoinSet<()>>,
    next_ticket: AtomicU64,
}

impl<S> fmt::Debug for ApplyCoordinator<S>
where
    S: KeyValueStore + ?Sized + 'static,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("ApplyCoordinator");
        debug
            .field("store", &self.store)
            .field("delivery", &self.delivery)
            .field("config", &self.config);

        match self.pending.try_lock() {
            Ok(guard) => {
                debug.field("pending_commits", &guard.len());
            }
            Err(_) => {
                debug.field("pending_commits", &"<locked>");
            }
        }

        debug.finish()
    }
}

impl<S> ApplyCoordinator<S>
where
    S: KeyValueStore + ?Sized + 'static,
{
    pub fn new(
        store: OriginColorStore<S>,
        delivery: PaletteDelivery,
        config: CoordinatorConfig,
    ) -> Self {
        Self {
            store,
            delivery,
            config,
            pending: Arc::new(Mutex::new(HashMap::new())),
            origin_locks: Mutex::new(HashMap::new()),
            commits: Mutex::new(JoinSet::new()),
            next_ticket: AtomicU64::new(0),
        }
    }

    pub fn store(&self) -> &OriginColorStore<S> {
        &self.store
    }

    pub fn config(&self) -> &CoordinatorConfig {
        &self.config
    }

    /// Persist `color` for `origin`, paint it, and (re)start the commit
    /// timer. Persistence failures are returned; delivery failures are only
    /// logged.
    pub async fn request_apply(
        &self,
        origin: &Origin,
        color: &HexColor,
    ) -> Result<AppliedColor> {
        let _serial = self.lock_origin(origin).await;

        self.store.set_color_for_origin(origin, Some(color)).await?;

        let delivery = self
            .delivery
            .deliver(&PaletteRequest::new(color.clone()))
            .await;

        match self.config.commit_policy {
            CommitPolicy::Immediate => {
                self.cancel_pending(origin).await;
                commit_if_current(&self.store, origin, color).await?;
            }
            CommitPolicy::Delayed(delay) => {
                self.schedule_commit(origin, color, delay).await;
            }
        }

        Ok(AppliedColor {
            origin: origin.clone(),
            color: color.clone(),
            delivery,
        })
    }

    /// Same as [`request_apply`](Self::request_apply) for raw input.
    /// Input that does not normalize is ignored and yields `Ok(None)`.
    pub async fn request_apply_raw(
        &self,
        origin: &Origin,
        raw: &str,
    ) -> Result<Option<AppliedColor>> {
        let Some(color) = normalize(raw) else {
            debug!(%origin, input = raw, "ignoring invalid color input");
            return Ok(None);
        };
        self.request_apply(origin, &color).await.map(Some)
    }

    /// Re-apply the recent color at `index` (0 = most recent).
    pub async fn apply_recent(
        &self,
        origin: &Origin,
        index: usize,
    ) -> Result<Option<AppliedColor>> {
        let recents = self.store.get_recent_colors().await?;
        let Some(color) = recents.get(index) else {
            debug!(%origin, index, available = recents.len(), "no recent color at index");
            return Ok(None);
        };
        self.request_apply(origin, color).await.map(Some)
    }

    /// Paint the stored color for `origin` without touching recents, as a
    /// freshly loaded page does.
    pub async fn restore(
        &self,
        origin: &Origin,
    ) -> Result<Option<DeliveryOutcome>> {
        let _serial = self.lock_origin(origin).await;
        let Some(color) = self.store.get_color_for_origin(origin).await? else {
            return Ok(None);
        };
        Ok(Some(self.delivery.deliver(&PaletteRequest::new(color)).await))
    }

    /// Color to preselect for `origin`: the stored preference, otherwise the
    /// configured default. A store failure also yields the default.
    pub async fn initial_color(&self, origin: &Origin) -> HexColor {
        match self.store.get_color_for_origin(origin).await {
            Ok(Some(color)) => color,
            Ok(None) => self.config.default_color.clone(),
            Err(err) => {
                warn!(%origin, error = %err, "store unavailable, using default color");
                self.config.default_color.clone()
            }
        }
    }

    /// Remove the preference for `origin` and drop its pending commit.
    pub async fn clear(&self, origin: &Origin) -> Result<()> {
        let _serial = self.lock_origin(origin).await;
        self.cancel_pending(origin).await;
        self.store.set_color_for_origin(origin, None).await
    }

    pub async fn commit_state(&self, origin: &Origin) -> CommitState {
        match self.pending.lock().await.get(origin) {
            Some(entry) => CommitState::PendingCommit {
                hex: entry.hex.clone(),
                deadline: entry.deadline,
            },
            None => CommitState::Idle,
        }
    }

    pub async fn pending_count(&self) -> usize {
        self.pending.lock().await.len()
    }

    /// Wait until every scheduled commit has fired and finished.
    pub async fn drain(&self) {
        loop {
            // Join outside the lock so concurrent requests can keep
            // scheduling; anything they add is picked up next round.
            let mut batch = std::mem::take(&mut *self.commits.lock().await);
            if batch.is_empty() {
                break;
            }
            while batch.join_next().await.is_some() {}
        }
    }

    /// Cancel every commit that has not started yet.
    pub async fn shutdown(&self) {
        let mut pending = self.pending.lock().await;
        for (origin, entry) in pending.drain() {
            entry.task.abort();
            debug!(%origin, hex = %entry.hex, "pending commit cancelled on shutdown");
        }
    }

    /// Wait for the lock that orders requests for `origin`. tokio mutexes
    /// are fair, so waiters proceed in the order they arrived.
    async fn lock_origin(&self, origin: &Origin) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.origin_locks.lock().await;
            Arc::clone(locks.entry(origin.clone()).or_default())
        };
        lock.lock_owned().await
    }

    async fn cancel_pending(&self, origin: &Origin) {
        if let Some(previous) = self.pending.lock().await.remove(origin) {
            previous.task.abort();
            debug!(%origin, hex = %previous.hex, "pending commit cancelled");
        }
    }

    async fn schedule_commit(
        &self,
        origin: &Origin,
        color: &HexColor,
        delay: Duration,
    ) {
        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
        let deadline = Instant::now() + delay;

        // Holding the map lock across spawn + insert keeps the new task from
        // looking for its entry before it exists.
        let mut pending = self.pending.lock().await;
        if let Some(previous) = pending.remove(origin) {
            previous.task.abort();
            debug!(%origin, hex = %previous.hex, "pending commit superseded");
        }

        let task = {
            let mut commits = self.commits.lock().await;
            while commits.try_join_next().is_some() {}
            commits.spawn(run_commit(
                self.store.clone(),
                Arc::clone(&self.pending),
                origin.clone(),
                color.clone(),
                ticket,
                deadline,
            ))
        };

        pending.insert(
            origin.clone(),
            PendingCommit {
                ticket,
                hex: color.clone(),
                deadline,
                task,
            },
        );

        debug!(%origin, hex = %color, delay_ms = delay.as_millis() as u64, "commit scheduled");
    }
}

async fn run_commit<S>(
    store: OriginColorStore<S>,
    pending: PendingMap,
    origin: Origin,
    color: HexColor,
    ticket: u64,
    deadline: Instant,
) where
    S: KeyValueStore + ?Sized + 'static,
{
    sleep_until(deadline).await;

    {
        let mut pending = pending.lock().await;
        let is_current = pending
            .get(&origin)
            .is_some_and(|entry| entry.ticket == ticket);
        if !is_current {
            return;
        }
        pending.remove(&origin);
    }

    // Out of the map: later requests can no longer abort this commit.
    if let Err(err) = commit_if_current(&store, &origin, &color).await {
        warn!(%origin, hex = %color, error = %err, "failed to commit recent color");
    }
}

/// Push `color` to recents only if it is still the stored color for
/// `origin`.
async fn commit_if_current<S>(
    store: &OriginColorStore<S>,
    origin: &Origin,
    color: &HexColor,
) -> Result<bool>
where
    S: KeyValueStore + ?Sized,
{
    let current = store.get_color_for_origin(origin).await?;
    if current.as_ref() != Some(color) {
        info!(%origin, hex = %color, "skipped recent commit, color changed");
        return Ok(false);
    }

    store.push_recent_color(color).await?;
    info!(%origin, hex = %color, "added color to recents");
    Ok(true)
}
