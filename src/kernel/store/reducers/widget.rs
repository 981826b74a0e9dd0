use crate::kernel::state::{RuntimeWidget, WorkspaceState};
use crate::kernel::Action;
use crate::schema::{DashboardId, Viewport, WidgetLayout};

pub(in crate::kernel::store) fn reduce_widget_action(draft: &mut WorkspaceState, action: Action) -> bool {
    match action {
        Action::AddWidget {
            id,
            descriptor,
            layout,
            dashboard,
        } => {
            if !is_storable_layout(&layout) {
                return false;
            }
            let Some(target) = draft.dashboard_mut(dashboard.as_deref()) else {
                return false;
            };
            if target.widgets.contains_key(&id) {
                return false;
            }

            let widget = RuntimeWidget::create(id.clone(), descriptor, layout);
            target.widgets.insert(id, widget);
            true
        }
        Action::RemoveWidget { id, dashboard } => draft
            .dashboard_mut(dashboard.as_deref())
            .and_then(|d| d.widgets.remove(&id))
            .is_some(),
        Action::LayoutWidget {
            id,
            layout,
            dashboard,
        } => {
            if !is_storable_layout(&layout) {
                return false;
            }
            update_widget(draft, dashboard, &id, |w| &mut w.layout, layout)
        }
        Action::UpdateWidgetProps {
            id,
            props,
            dashboard,
        } => {
            let Some(widget) = draft
                .dashboard_mut(dashboard.as_deref())
                .and_then(|d| d.widget_mut(&id))
            else {
                return false;
            };
            // Clearing props falls back to the kind's defaults.
            let props = props.or_else(|| widget.descriptor.default_props());
            if widget.props == props {
                return false;
            }
            widget.props = props;
            true
        }
        Action::UpdateWidgetLookback {
            id,
            lookback,
            dashboard,
        } => {
            if lookback.is_some_and(|seconds| !seconds.is_finite()) {
                return false;
            }
            let lookback = lookback.map(|seconds| seconds.max(0.0));
            update_widget(draft, dashboard, &id, |w| &mut w.lookback, lookback)
        }
        Action::UpdateWidgetSlot {
            id,
            slot,
            dashboard,
        } => update_widget(draft, dashboard, &id, |w| &mut w.slot, slot),
        Action::UpdateViewport {
            viewport,
            dashboard,
        } => {
            if !is_storable_viewport(&viewport) {
                return false;
            }
            let Some(target) = draft.dashboard_mut(dashboard.as_deref()) else {
                return false;
            };
            if target.viewport == Some(viewport) {
                return false;
            }

            target.viewport = Some(viewport);
            true
        }
        _ => unreachable!("non-widget action passed to reduce_widget_action"),
    }
}

/// Sizes below one cell cannot be written to the workspace document.
fn is_storable_layout(layout: &WidgetLayout) -> bool {
    layout.width >= 1 && layout.height >= 1
}

/// Finite offsets and a positive, finite scale.
fn is_storable_viewport(viewport: &Viewport) -> bool {
    viewport.x.is_finite()
        && viewport.y.is_finite()
        && viewport.scale.is_finite()
        && viewport.scale > 0.0
}

fn update_widget<T: PartialEq>(
    draft: &mut WorkspaceState,
    dashboard: Option<DashboardId>,
    id: &str,
    field: impl FnOnce(&mut RuntimeWidget) -> &mut T,
    value: T,
) -> bool {
    let Some(widget) = draft
        .dashboard_mut(dashboard.as_deref())
        .and_then(|d| d.widget_mut(id))
    else {
        return false;
    };

    let slot = field(widget);
    if *slot == value {
        return false;
    }
    *slot = value;
    true
}
