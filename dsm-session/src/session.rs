//! Draft session for one open method page
//!
//! Owns the page's draft id, change tracker and navigation state, and
//! drives saves through [`DraftClient`].

use std::time::Duration;

use dsm_common::api::{SaveDraftRequest, UpdateDraftRequest};
use dsm_common::{FormData, MethodType};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::autosave::{AutoSaveTracker, SaveDecision};
use crate::client::{ClientError, DraftClient};
use crate::fields::{gather, restore, FieldRegistry, FieldSink, FieldSource};
use crate::navigation::{LeaveDecision, NavigationContext};

/// Autosave period used by the method pages
pub const DEFAULT_AUTOSAVE_INTERVAL: Duration = Duration::from_secs(120);

/// Result of a save attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// Stored under this draft id
    Saved(i64),
    /// Nothing was sent
    Skipped(SaveDecision),
}

pub struct DraftSession {
    client: DraftClient,
    registry: FieldRegistry,
    tracker: AutoSaveTracker,
    navigation: NavigationContext,
    route: String,
    draft_id: Option<i64>,
    /// Document the page was restored from; fills gaps the page has not
    /// rendered yet
    restored: Option<FormData>,
}

impl DraftSession {
    pub fn new(client: DraftClient, route: &str, navigation: NavigationContext) -> Self {
        Self {
            client,
            registry: FieldRegistry::default(),
            tracker: AutoSaveTracker::new(),
            navigation,
            route: route.to_string(),
            draft_id: None,
            restored: None,
        }
    }

    pub fn with_registry(mut self, registry: FieldRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn draft_id(&self) -> Option<i64> {
        self.draft_id
    }

    pub fn method(&self) -> MethodType {
        MethodType::from_route(&self.route)
    }

    pub fn navigation_mut(&mut self) -> &mut NavigationContext {
        &mut self.navigation
    }

    /// Page content as it would be saved now
    pub fn snapshot<S: FieldSource + ?Sized>(&self, source: &S) -> FormData {
        let mut form = gather(source, &self.registry);
        if let Some(restored) = &self.restored {
            form.fill_from(restored);
        }
        form
    }

    /// Save at the user's request
    ///
    /// Skips only when nothing changed since the last save. The first save
    /// creates a draft; later ones update it, creating a new one if it has
    /// since been deleted.
    pub async fn save_now<S: FieldSource + ?Sized>(
        &mut self,
        source: &S,
        title: Option<String>,
    ) -> Result<SaveOutcome, ClientError> {
        let form = self.snapshot(source);
        if self.tracker.decide(&form) == SaveDecision::NoChanges {
            info!("No changes to save");
            return Ok(SaveOutcome::Skipped(SaveDecision::NoChanges));
        }
        self.store(form, title, false).await
    }

    /// Load draft `id` onto the page
    pub async fn load<S: FieldSink + ?Sized>(
        &mut self,
        sink: &mut S,
        id: i64,
    ) -> Result<FormData, ClientError> {
        let detail = self.client.fetch(id).await?;
        let form = detail
            .form()
            .map_err(|e| ClientError::Parse(e.to_string()))?;

        restore(sink, &self.registry, &form);
        info!(draft_id = id, title = %detail.summary.title, "Draft restored");

        self.draft_id = Some(id);
        self.tracker.mark_saved(form.clone());
        self.restored = Some(form.clone());
        Ok(form)
    }

    /// One autosave tick: saves only when the page has changed content
    pub async fn autosave_once<S: FieldSource + ?Sized>(
        &mut self,
        source: &S,
    ) -> Result<SaveOutcome, ClientError> {
        let form = self.snapshot(source);
        match self.tracker.decide(&form) {
            SaveDecision::Save => self.store(form, None, true).await,
            decision => {
                debug!(?decision, "Autosave skipped");
                Ok(SaveOutcome::Skipped(decision))
            }
        }
    }

    /// Autosave every `period` until `shutdown` is cancelled
    ///
    /// A failed save is logged and tried again on the next tick.
    pub async fn run_autosave<S: FieldSource + ?Sized>(
        &mut self,
        source: &S,
        period: Duration,
        shutdown: CancellationToken,
    ) {
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        info!(period_secs = period.as_secs_f64(), "Autosave started");
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => break,
                _ = ticker.tick() => {
                    if let Err(e) = self.autosave_once(source).await {
                        warn!("Autosave failed: {}", e);
                    }
                }
            }
        }
        info!("Autosave stopped");
    }

    /// Unload check combining navigation state and unsaved changes
    pub fn before_unload<S: FieldSource + ?Sized>(&mut self, source: &S) -> LeaveDecision {
        let unsaved = self.tracker.has_unsaved_changes(&self.snapshot(source));
        self.navigation.before_unload(unsaved)
    }

    async fn store(
        &mut self,
        form: FormData,
        title: Option<String>,
        is_auto_save: bool,
    ) -> Result<SaveOutcome, ClientError> {
        if let Some(id) = self.draft_id {
            let update = UpdateDraftRequest {
                title: title.clone(),
                current_route: Some(self.route.clone()),
                form_data: Some(form.clone()),
            };
            match self.client.update(id, &update).await {
                Ok(()) => {
                    info!(draft_id = id, auto = is_auto_save, "Draft updated");
                    self.tracker.mark_saved(form);
                    return Ok(SaveOutcome::Saved(id));
                }
                Err(e) if e.status() == Some(404) => {
                    warn!(draft_id = id, "Draft no longer exists, saving a new one");
                }
                Err(e) => return Err(e),
            }
        }

        let request = SaveDraftRequest {
            method_type: self.method().as_str().to_string(),
            current_route: self.route.clone(),
            form_data: form.clone(),
            title,
            is_auto_save,
        };
        let id = self.client.save(&request).await?;
        info!(draft_id = id, auto = is_auto_save, "Draft saved");

        self.draft_id = Some(id);
        self.tracker.mark_saved(form);
        Ok(SaveOutcome::Saved(id))
    }
}
