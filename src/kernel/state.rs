use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use compact_str::CompactString;
use serde_json::Value;

use crate::schema::{DashboardId, Viewport, WidgetId, WidgetLayout, WidgetLayoutConstraints};
use crate::widgets::{WidgetDescriptor, WidgetKind};

pub const AUTO_DASHBOARD_ID: &str = "auto";
pub const TELEOP_DASHBOARD_ID: &str = "teleop";

pub(crate) fn generate_id() -> CompactString {
    CompactString::from(uuid::Uuid::new_v4().simple().to_string())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DashboardKind {
    Auto,
    Teleop,
    Custom,
}

/// A widget joined with the descriptor of its kind.
#[derive(Debug, Clone)]
pub struct RuntimeWidget {
    pub id: WidgetId,
    pub descriptor: Arc<WidgetDescriptor>,
    pub layout: WidgetLayout,
    pub constraints: Option<WidgetLayoutConstraints>,
    pub slot: Option<String>,
    pub lookback: Option<f64>,
    pub props: Option<Value>,
}

impl RuntimeWidget {
    /// New widget of `descriptor`'s kind with the kind's defaults.
    pub fn create(id: WidgetId, descriptor: Arc<WidgetDescriptor>, layout: WidgetLayout) -> Self {
        Self {
            id,
            layout,
            constraints: descriptor.constraints,
            slot: descriptor.default_channel().map(str::to_owned),
            lookback: descriptor.default_lookback(),
            props: descriptor.default_props(),
            descriptor,
        }
    }

    pub fn kind(&self) -> WidgetKind {
        self.descriptor.kind
    }
}

impl PartialEq for RuntimeWidget {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
            && self.descriptor.kind == other.descriptor.kind
            && self.layout == other.layout
            && self.constraints == other.constraints
            && self.slot == other.slot
            && self.lookback == other.lookback
            && self.props == other.props
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeDashboard {
    pub id: DashboardId,
    pub kind: DashboardKind,
    pub name: String,
    pub widgets: BTreeMap<WidgetId, RuntimeWidget>,
    pub viewport: Option<Viewport>,
}

impl RuntimeDashboard {
    pub fn auto() -> Self {
        Self::empty(AUTO_DASHBOARD_ID.into(), DashboardKind::Auto, "Autonomous".to_string())
    }

    pub fn teleop() -> Self {
        Self::empty(TELEOP_DASHBOARD_ID.into(), DashboardKind::Teleop, "Teleoperated".to_string())
    }

    pub fn custom(id: DashboardId, index: usize) -> Self {
        Self::empty(id, DashboardKind::Custom, custom_name(index))
    }

    fn empty(id: DashboardId, kind: DashboardKind, name: String) -> Self {
        Self {
            id,
            kind,
            name,
            widgets: BTreeMap::new(),
            viewport: None,
        }
    }

    pub fn widget(&self, id: &str) -> Option<&RuntimeWidget> {
        self.widgets.get(id)
    }

    pub fn widget_mut(&mut self, id: &str) -> Option<&mut RuntimeWidget> {
        self.widgets.get_mut(id)
    }

    pub fn slots(&self) -> impl Iterator<Item = &str> {
        self.widgets.values().filter_map(|w| w.slot.as_deref())
    }
}

pub fn custom_name(index: usize) -> String {
    format!("Dashboard {}", index + 1)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboards {
    pub auto: RuntimeDashboard,
    pub teleop: RuntimeDashboard,
    pub custom: Vec<RuntimeDashboard>,
}

impl Default for Dashboards {
    fn default() -> Self {
        Self {
            auto: RuntimeDashboard::auto(),
            teleop: RuntimeDashboard::teleop(),
            custom: Vec::new(),
        }
    }
}

impl Dashboards {
    /// Resolves `auto`, then `teleop`, then the custom dashboards in order.
    pub fn resolve(&self, id: &str) -> Option<&RuntimeDashboard> {
        if self.auto.id.as_str() == id {
            return Some(&self.auto);
        }
        if self.teleop.id.as_str() == id {
            return Some(&self.teleop);
        }
        self.custom.iter().find(|d| d.id.as_str() == id)
    }

    pub fn resolve_mut(&mut self, id: &str) -> Option<&mut RuntimeDashboard> {
        if self.auto.id.as_str() == id {
            return Some(&mut self.auto);
        }
        if self.teleop.id.as_str() == id {
            return Some(&mut self.teleop);
        }
        self.custom.iter_mut().find(|d| d.id.as_str() == id)
    }

    pub fn custom_index(&self, id: &str) -> Option<usize> {
        self.custom.iter().position(|d| d.id.as_str() == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RuntimeDashboard> {
        [&self.auto, &self.teleop].into_iter().chain(self.custom.iter())
    }

    /// Rewrites custom dashboard names from their positions.
    pub fn renumber_custom(&mut self) {
        for (index, dashboard) in self.custom.iter_mut().enumerate() {
            dashboard.name = custom_name(index);
        }
    }

    /// Unique channel paths bound by any widget on any dashboard.
    pub fn bound_slots(&self) -> BTreeSet<String> {
        self.iter()
            .flat_map(RuntimeDashboard::slots)
            .map(str::to_owned)
            .collect()
    }
}

/// Runtime root of the workspace.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkspaceState {
    pub dashboard_id: DashboardId,
    pub dashboards: Dashboards,
    pub design_mode: bool,
    /// Channels to subscribe to; `None` means every channel (design mode).
    pub slots: Option<BTreeSet<String>>,
    pub has_hydrated: bool,
}

impl Default for WorkspaceState {
    fn default() -> Self {
        Self {
            dashboard_id: TELEOP_DASHBOARD_ID.into(),
            dashboards: Dashboards::default(),
            design_mode: false,
            slots: Some(BTreeSet::new()),
            has_hydrated: false,
        }
    }
}

impl WorkspaceState {
    pub fn current_dashboard(&self) -> Option<&RuntimeDashboard> {
        self.dashboards.resolve(&self.dashboard_id)
    }

    /// Dashboard addressed by `id`, or the selected one when `id` is `None`.
    pub fn dashboard(&self, id: Option<&str>) -> Option<&RuntimeDashboard> {
        self.dashboards.resolve(id.unwrap_or(self.dashboard_id.as_str()))
    }

    pub fn dashboard_mut(&mut self, id: Option<&str>) -> Option<&mut RuntimeDashboard> {
        let id = match id {
            Some(id) => CompactString::from(id),
            None => self.dashboard_id.clone(),
        };
        self.dashboards.resolve_mut(&id)
    }

    pub fn widget(&self, dashboard: Option<&str>, id: &str) -> Option<&RuntimeWidget> {
        self.dashboard(dashboard)?.widget(id)
    }

    pub fn recompute_slots(&mut self) {
        self.slots = if self.design_mode {
            None
        } else {
            Some(self.dashboards.bound_slots())
        };
    }
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/state.rs"]
mod tests;
