//! Read-only views derived from the workspace state.
//!
//! Selectors slice a snapshot into the value a consumer renders. [`Selector`] memoizes one
//! slice and reports it as changed only when it is structurally different; store
//! subscriptions do the same on every committed mutation.

use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::schema::{DashboardId, Viewport, WidgetId, WidgetLayout, WorkspaceDocument};
use crate::widgets::WidgetDescriptor;

use super::convert::to_persisted;
use super::state::{generate_id, RuntimeDashboard, RuntimeWidget, WorkspaceState};
use super::store::{DispatchResult, Store};
use super::Action;

pub fn current_dashboard(state: &WorkspaceState) -> Option<RuntimeDashboard> {
    state.current_dashboard().cloned()
}

pub fn dashboard(id: DashboardId) -> impl Fn(&WorkspaceState) -> Option<RuntimeDashboard> {
    move |state| state.dashboards.resolve(&id).cloned()
}

pub fn widget(
    dashboard: Option<DashboardId>,
    id: WidgetId,
) -> impl Fn(&WorkspaceState) -> Option<RuntimeWidget> {
    move |state| state.widget(dashboard.as_deref(), &id).cloned()
}

pub fn slots(state: &WorkspaceState) -> Option<BTreeSet<String>> {
    state.slots.clone()
}

/// `(id, name)` of every dashboard in display order.
pub fn dashboard_list(state: &WorkspaceState) -> Vec<(DashboardId, String)> {
    state
        .dashboards
        .iter()
        .map(|d| (d.id.clone(), d.name.clone()))
        .collect()
}

pub fn document(state: &WorkspaceState) -> WorkspaceDocument {
    to_persisted(state)
}

/// Memoized slice of the store.
pub struct Selector<T> {
    select: Box<dyn Fn(&WorkspaceState) -> T>,
    value: T,
    revision: u64,
    changed: bool,
}

impl<T: fmt::Debug> fmt::Debug for Selector<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Selector")
            .field("value", &self.value)
            .field("revision", &self.revision)
            .finish()
    }
}

impl<T: PartialEq> Selector<T> {
    pub fn new(store: &Store, select: impl Fn(&WorkspaceState) -> T + 'static) -> Self {
        let value = select(store.state());
        Self {
            select: Box::new(select),
            value,
            revision: store.revision(),
            changed: false,
        }
    }

    fn refresh(&mut self, store: &Store) {
        if self.revision == store.revision() {
            return;
        }
        self.revision = store.revision();

        let next = (self.select)(store.state());
        if next != self.value {
            self.value = next;
            self.changed = true;
        }
    }

    /// Current slice, recomputed only if the store changed since the last read.
    pub fn get(&mut self, store: &Store) -> &T {
        self.refresh(store);
        &self.value
    }

    /// The slice if it changed since the previous `poll`.
    pub fn poll(&mut self, store: &Store) -> Option<&T> {
        self.refresh(store);
        if std::mem::take(&mut self.changed) {
            Some(&self.value)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&WorkspaceState)>;

/// Change listeners keyed by subscription id.
#[derive(Default)]
pub struct Subscriptions {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl fmt::Debug for Subscriptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscriptions")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Subscriptions {
    pub(super) fn subscribe<T, S, F>(
        &mut self,
        state: &WorkspaceState,
        select: S,
        mut on_change: F,
    ) -> SubscriptionId
    where
        T: PartialEq + 'static,
        S: Fn(&WorkspaceState) -> T + 'static,
        F: FnMut(&T) + 'static,
    {
        let mut last = select(state);
        let listener = move |state: &WorkspaceState| {
            let next = select(state);
            if next != last {
                on_change(&next);
                last = next;
            }
        };

        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub(super) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    pub(super) fn notify(&mut self, state: &WorkspaceState) {
        for (_, listener) in &mut self.listeners {
            listener(state);
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

/// Widget and viewport operations bound to one dashboard.
pub struct DashboardActions<'a> {
    store: &'a mut Store,
    dashboard: DashboardId,
}

impl<'a> DashboardActions<'a> {
    pub(super) fn new(store: &'a mut Store, dashboard: DashboardId) -> Self {
        Self { store, dashboard }
    }

    pub fn dashboard_id(&self) -> &str {
        &self.dashboard
    }

    pub fn dashboard(&self) -> Option<&RuntimeDashboard> {
        self.store.state().dashboards.resolve(&self.dashboard)
    }

    fn target(&self) -> Option<DashboardId> {
        Some(self.dashboard.clone())
    }

    /// Adds a widget and returns its id, or `None` when the dashboard does not exist.
    pub fn add_widget(
        &mut self,
        descriptor: Arc<WidgetDescriptor>,
        layout: WidgetLayout,
    ) -> Option<WidgetId> {
        let id = generate_id();
        let dashboard = self.target();
        let result = self.store.dispatch(Action::AddWidget {
            id: id.clone(),
            descriptor,
            layout,
            dashboard,
        });
        result.state_changed.then_some(id)
    }

    pub fn remove_widget(&mut self, id: &str) -> DispatchResult {
        let dashboard = self.target();
        self.store.dispatch(Action::RemoveWidget {
            id: id.into(),
            dashboard,
        })
    }

    pub fn layout_widget(&mut self, id: &str, layout: WidgetLayout) -> DispatchResult {
        let dashboard = self.target();
        self.store.dispatch(Action::LayoutWidget {
            id: id.into(),
            layout,
            dashboard,
        })
    }

    pub fn update_widget_props(&mut self, id: &str, props: Option<Value>) -> DispatchResult {
        let dashboard = self.target();
        self.store.dispatch(Action::UpdateWidgetProps {
            id: id.into(),
            props,
            dashboard,
        })
    }

    pub fn update_widget_lookback(&mut self, id: &str, lookback: Option<f64>) -> DispatchResult {
        let dashboard = self.target();
        self.store.dispatch(Action::UpdateWidgetLookback {
            id: id.into(),
            lookback,
            dashboard,
        })
    }

    pub fn update_widget_slot(&mut self, id: &str, slot: Option<String>) -> DispatchResult {
        let dashboard = self.target();
        self.store.dispatch(Action::UpdateWidgetSlot {
            id: id.into(),
            slot,
            dashboard,
        })
    }

    pub fn update_viewport(&mut self, x: f64, y: f64, scale: f64) -> DispatchResult {
        let dashboard = self.target();
        self.store.dispatch(Action::UpdateViewport {
            viewport: Viewport { x, y, scale },
            dashboard,
        })
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/projection.rs"]
mod tests;
