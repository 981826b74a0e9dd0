use std::sync::Arc;

use serde_json::Value;

use crate::schema::{DashboardId, Viewport, WidgetId, WidgetLayout};
use crate::widgets::WidgetDescriptor;

use super::state::generate_id;

/// Workspace mutations. Widget and viewport actions address `dashboard`, or the selected
/// dashboard when it is `None`.
#[derive(Debug, Clone)]
pub enum Action {
    AddDashboard {
        id: DashboardId,
    },
    RemoveDashboard {
        id: DashboardId,
    },
    MoveDashboard {
        id: DashboardId,
        target: DashboardId,
    },
    SelectDashboard {
        id: DashboardId,
    },
    SelectDashboardByKey {
        index: usize,
    },
    AddWidget {
        id: WidgetId,
        descriptor: Arc<WidgetDescriptor>,
        layout: WidgetLayout,
        dashboard: Option<DashboardId>,
    },
    RemoveWidget {
        id: WidgetId,
        dashboard: Option<DashboardId>,
    },
    LayoutWidget {
        id: WidgetId,
        layout: WidgetLayout,
        dashboard: Option<DashboardId>,
    },
    UpdateWidgetProps {
        id: WidgetId,
        props: Option<Value>,
        dashboard: Option<DashboardId>,
    },
    UpdateWidgetLookback {
        id: WidgetId,
        lookback: Option<f64>,
        dashboard: Option<DashboardId>,
    },
    UpdateWidgetSlot {
        id: WidgetId,
        slot: Option<String>,
        dashboard: Option<DashboardId>,
    },
    UpdateViewport {
        viewport: Viewport,
        dashboard: Option<DashboardId>,
    },
    ToggleDesignMode,
    EnterDesignMode,
    ExitDesignMode,
}

impl Action {
    /// Appends a custom dashboard under a freshly generated id.
    pub fn add_dashboard() -> Self {
        Action::AddDashboard { id: generate_id() }
    }

    /// Adds a widget of `descriptor`'s kind under a freshly generated id.
    pub fn add_widget(
        descriptor: Arc<WidgetDescriptor>,
        layout: WidgetLayout,
        dashboard: Option<DashboardId>,
    ) -> Self {
        Action::AddWidget {
            id: generate_id(),
            descriptor,
            layout,
            dashboard,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Action::AddDashboard { .. } => "add_dashboard",
            Action::RemoveDashboard { .. } => "remove_dashboard",
            Action::MoveDashboard { .. } => "move_dashboard",
            Action::SelectDashboard { .. } => "select_dashboard",
            Action::SelectDashboardByKey { .. } => "select_dashboard_by_key",
            Action::AddWidget { .. } => "add_widget",
            Action::RemoveWidget { .. } => "remove_widget",
            Action::LayoutWidget { .. } => "layout_widget",
            Action::UpdateWidgetProps { .. } => "update_widget_props",
            Action::UpdateWidgetLookback { .. } => "update_widget_lookback",
            Action::UpdateWidgetSlot { .. } => "update_widget_slot",
            Action::UpdateViewport { .. } => "update_viewport",
            Action::ToggleDesignMode => "toggle_design_mode",
            Action::EnterDesignMode => "enter_design_mode",
            Action::ExitDesignMode => "exit_design_mode",
        }
    }

    /// Whether the action changes anything the persisted document records.
    pub fn touches_document(&self) -> bool {
        !matches!(
            self,
            Action::ToggleDesignMode | Action::EnterDesignMode | Action::ExitDesignMode
        )
    }
}
