//! Conversion between the persisted document and the runtime state.
//!
//! `to_persisted` is trusting: whatever is in memory is written as is. `to_runtime` is
//! lenient per widget: unknown kinds are dropped and props that fail their schema are
//! replaced by the kind's default, so one bad widget never blocks the rest.

use std::collections::BTreeMap;

use crate::schema::{
    DashboardId, DashboardRecord, DashboardsRecord, WidgetRecord, WorkspaceDocument,
    CURRENT_VERSION,
};
use crate::widgets::WidgetRegistry;

use super::state::{Dashboards, RuntimeDashboard, RuntimeWidget, WorkspaceState};

pub fn to_persisted(state: &WorkspaceState) -> WorkspaceDocument {
    let dashboards = &state.dashboards;
    WorkspaceDocument {
        version: CURRENT_VERSION,
        dashboard_id: Some(state.dashboard_id.clone()),
        dashboards: Some(DashboardsRecord {
            auto: Some(dashboard_record(&dashboards.auto)),
            teleop: Some(dashboard_record(&dashboards.teleop)),
            custom: Some(dashboards.custom.iter().map(dashboard_record).collect()),
        }),
    }
}

fn dashboard_record(dashboard: &RuntimeDashboard) -> DashboardRecord {
    DashboardRecord {
        id: dashboard.id.clone(),
        widgets: dashboard.widgets.values().map(widget_record).collect(),
        viewport: dashboard.viewport,
    }
}

fn widget_record(widget: &RuntimeWidget) -> WidgetRecord {
    WidgetRecord {
        id: widget.id.clone(),
        kind: widget.descriptor.tag().into(),
        layout: widget.layout,
        constraints: widget.constraints,
        slot: widget.slot.clone(),
        lookback: widget.lookback,
        props: widget.props.clone(),
    }
}

/// Runtime dashboards built from `document`, plus the selected dashboard id it declares.
pub fn to_runtime(
    document: WorkspaceDocument,
    registry: &WidgetRegistry,
) -> (Option<DashboardId>, Dashboards) {
    let records = document.dashboards.unwrap_or_default();

    let mut auto = RuntimeDashboard::auto();
    if let Some(record) = records.auto {
        fill_dashboard(&mut auto, record, registry);
    }

    let mut teleop = RuntimeDashboard::teleop();
    if let Some(record) = records.teleop {
        fill_dashboard(&mut teleop, record, registry);
    }

    let custom = records
        .custom
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .map(|(index, record)| {
            let mut dashboard = RuntimeDashboard::custom(record.id.clone(), index);
            fill_dashboard(&mut dashboard, record, registry);
            dashboard
        })
        .collect();

    (
        document.dashboard_id,
        Dashboards {
            auto,
            teleop,
            custom,
        },
    )
}

fn fill_dashboard(dashboard: &mut RuntimeDashboard, record: DashboardRecord, registry: &WidgetRegistry) {
    dashboard.viewport = record.viewport;
    dashboard.widgets = record
        .widgets
        .into_iter()
        .filter_map(|widget| runtime_widget(widget, registry))
        .map(|widget| (widget.id.clone(), widget))
        .collect::<BTreeMap<_, _>>();
}

fn runtime_widget(record: WidgetRecord, registry: &WidgetRegistry) -> Option<RuntimeWidget> {
    let Some(descriptor) = registry.lookup(&record.kind) else {
        tracing::warn!(id = %record.id, kind = %record.kind, "dropping widget of unknown kind");
        return None;
    };

    Some(RuntimeWidget {
        props: descriptor.resolve_props(record.props.as_ref()),
        descriptor: descriptor.clone(),
        id: record.id,
        layout: record.layout,
        constraints: record.constraints,
        slot: record.slot,
        lookback: record.lookback,
    })
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/convert.rs"]
mod tests;
