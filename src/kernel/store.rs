use std::sync::Arc;

use serde_json::Value;

use crate::schema::{self, DashboardId, DocumentError, MigrationError, Migrator, WorkspaceDocument};
use crate::widgets::WidgetRegistry;

use super::convert::{to_persisted, to_runtime};
use super::projection::{DashboardActions, SubscriptionId, Subscriptions};
use super::services::ports::StorageError;
use super::services::StoreMessage;
use super::state::{Dashboards, WorkspaceState, TELEOP_DASHBOARD_ID};
use super::{Action, Effect};

mod reducers;

#[derive(Debug, Clone, PartialEq)]
pub struct DispatchResult {
    pub effects: Vec<Effect>,
    pub state_changed: bool,
}

impl DispatchResult {
    pub fn unchanged() -> Self {
        Self {
            effects: Vec::new(),
            state_changed: false,
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum HydrationError {
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Document(#[from] DocumentError),
    #[error(transparent)]
    Migration(#[from] MigrationError),
}

/// Owner of the workspace state.
///
/// Every mutation is applied to a clone of the current state and swapped in whole, so a
/// snapshot taken from [`Store::snapshot`] never observes a half-applied change.
#[derive(Debug)]
pub struct Store {
    state: Arc<WorkspaceState>,
    registry: WidgetRegistry,
    migrator: Migrator,
    subscriptions: Subscriptions,
    revision: u64,
}

impl Store {
    pub fn new(registry: WidgetRegistry) -> Self {
        Self {
            state: Arc::new(WorkspaceState::default()),
            registry,
            migrator: Migrator::new(),
            subscriptions: Subscriptions::default(),
            revision: 0,
        }
    }

    pub fn with_migrator(mut self, migrator: Migrator) -> Self {
        self.migrator = migrator;
        self
    }

    pub fn state(&self) -> &WorkspaceState {
        &self.state
    }

    pub fn snapshot(&self) -> Arc<WorkspaceState> {
        self.state.clone()
    }

    pub fn registry(&self) -> &WidgetRegistry {
        &self.registry
    }

    /// Incremented on every committed change.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn has_hydrated(&self) -> bool {
        self.state.has_hydrated
    }

    pub fn dispatch(&mut self, action: Action) -> DispatchResult {
        let name = action.name();
        let touches_document = action.touches_document();

        let mut draft = (*self.state).clone();
        let changed = match &action {
            Action::AddDashboard { .. }
            | Action::RemoveDashboard { .. }
            | Action::MoveDashboard { .. }
            | Action::SelectDashboard { .. }
            | Action::SelectDashboardByKey { .. } => {
                reducers::reduce_dashboard_action(&mut draft, action)
            }
            Action::AddWidget { .. }
            | Action::RemoveWidget { .. }
            | Action::LayoutWidget { .. }
            | Action::UpdateWidgetProps { .. }
            | Action::UpdateWidgetLookback { .. }
            | Action::UpdateWidgetSlot { .. }
            | Action::UpdateViewport { .. } => reducers::reduce_widget_action(&mut draft, action),
            Action::ToggleDesignMode | Action::EnterDesignMode | Action::ExitDesignMode => {
                reducers::reduce_design_action(&mut draft, action)
            }
        };

        if !changed {
            tracing::debug!(action = name, "dispatch: no-op");
            return DispatchResult::unchanged();
        }

        tracing::debug!(action = name, "dispatch");
        draft.recompute_slots();
        self.commit(draft, touches_document)
    }

    /// Replaces the whole workspace with `candidate` if it validates.
    ///
    /// The state is untouched when validation fails.
    pub fn import(&mut self, candidate: &Value) -> Result<DispatchResult, DocumentError> {
        let document = match schema::validate(candidate) {
            Ok(document) => document,
            Err(err) => {
                tracing::info!(issues = err.issues().len(), "import rejected");
                return Err(err);
            }
        };

        let mut draft = (*self.state).clone();
        apply_document(&mut draft, document, &self.registry);
        draft.recompute_slots();

        tracing::info!(custom = draft.dashboards.custom.len(), "workspace imported");
        if draft == *self.state {
            return Ok(DispatchResult::unchanged());
        }
        Ok(self.commit(draft, true))
    }

    /// Completes startup with the stored document text.
    ///
    /// Only the first call has any effect. A missing document keeps the current state; an
    /// unreadable or invalid one is logged and the current state is kept too.
    pub fn hydrate(&mut self, stored: Result<Option<String>, StorageError>) -> DispatchResult {
        if self.state.has_hydrated {
            tracing::debug!("hydrate: already hydrated");
            return DispatchResult::unchanged();
        }

        let mut draft = (*self.state).clone();
        match stored
            .map_err(HydrationError::from)
            .and_then(|text| text.map(|text| self.load_document(&text)).transpose())
        {
            Ok(Some(document)) => {
                apply_document(&mut draft, document, &self.registry);
                tracing::info!(custom = draft.dashboards.custom.len(), "workspace hydrated");
            }
            Ok(None) => tracing::info!("no stored workspace, using defaults"),
            Err(error) => tracing::error!(%error, "workspace hydration failed, using defaults"),
        }

        draft.has_hydrated = true;
        draft.recompute_slots();
        self.commit(draft, false)
    }

    /// Parses, migrates and validates stored document text.
    pub fn load_document(&self, text: &str) -> Result<WorkspaceDocument, HydrationError> {
        let value = schema::parse(text)?;
        let value = self.migrator.migrate(value)?;
        Ok(schema::validate(&value)?)
    }

    pub fn handle_message(&mut self, msg: StoreMessage) -> DispatchResult {
        match msg {
            StoreMessage::Hydrated(stored) => self.hydrate(stored),
        }
    }

    /// Exportable snapshot of the current workspace.
    pub fn workspace_document(&self) -> WorkspaceDocument {
        to_persisted(&self.state)
    }

    /// Widget and viewport operations bound to `dashboard`.
    pub fn dashboard_actions(&mut self, dashboard: impl Into<DashboardId>) -> DashboardActions<'_> {
        DashboardActions::new(self, dashboard.into())
    }

    /// Calls `on_change` after each commit that changes the selected slice.
    pub fn subscribe<T, S, F>(&mut self, select: S, on_change: F) -> SubscriptionId
    where
        T: PartialEq + 'static,
        S: Fn(&WorkspaceState) -> T + 'static,
        F: FnMut(&T) + 'static,
    {
        self.subscriptions.subscribe(&self.state, select, on_change)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.subscriptions.unsubscribe(id)
    }

    fn commit(&mut self, draft: WorkspaceState, touches_document: bool) -> DispatchResult {
        let mut effects = Vec::new();
        if draft.slots != self.state.slots {
            effects.push(Effect::SubscribeSlots(draft.slots.clone()));
        }

        self.state = Arc::new(draft);
        self.revision += 1;

        if touches_document && self.state.has_hydrated {
            effects.push(Effect::Persist(Arc::new(to_persisted(&self.state))));
        }

        self.subscriptions.notify(&self.state);
        DispatchResult {
            effects,
            state_changed: true,
        }
    }
}

fn apply_document(draft: &mut WorkspaceState, document: WorkspaceDocument, registry: &WidgetRegistry) {
    let (selected, dashboards): (_, Dashboards) = to_runtime(document, registry);
    draft.dashboards = dashboards;
    draft.dashboard_id = selected
        .filter(|id| draft.dashboards.resolve(id).is_some())
        .unwrap_or_else(|| TELEOP_DASHBOARD_ID.into());
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/store.rs"]
mod tests;
