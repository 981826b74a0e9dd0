use super::*;
use crate::kernel::state::TELEOP_DASHBOARD_ID;
use crate::schema::{self, Viewport, WidgetLayout};
use crate::widgets::WidgetKind;
use serde_json::json;

fn document(value: serde_json::Value) -> WorkspaceDocument {
    schema::validate(&value).unwrap()
}

#[test]
fn missing_dashboards_become_canonical_empty_ones() {
    let registry = WidgetRegistry::builtin();
    let (selected, dashboards) = to_runtime(document(json!({ "version": 1 })), &registry);

    assert!(selected.is_none());
    assert_eq!(dashboards, Dashboards::default());
}

#[test]
fn unknown_kinds_are_dropped_and_bad_props_replaced() {
    let registry = WidgetRegistry::builtin();
    let doc = document(json!({
        "version": 1,
        "dashboards": {
            "teleop": {
                "id": "teleop",
                "widgets": [
                    { "id": "gone", "type": "swerve", "layout": { "left": 0, "top": 0, "width": 1, "height": 1 } },
                    {
                        "id": "num",
                        "type": "number",
                        "layout": { "left": 1, "top": 0, "width": 2, "height": 1 },
                        "props": { "precision": "lots" }
                    },
                    {
                        "id": "ok",
                        "type": "gauge",
                        "layout": { "left": 3, "top": 0, "width": 2, "height": 2 },
                        "props": { "min": -1, "max": 1, "precision": 1 }
                    }
                ]
            }
        }
    }));

    let (_, dashboards) = to_runtime(doc, &registry);
    let teleop = &dashboards.teleop;
    assert_eq!(teleop.widgets.len(), 2);
    assert!(teleop.widget("gone").is_none());
    assert_eq!(teleop.widget("num").unwrap().props, Some(json!({ "precision": 2 })));
    assert_eq!(
        teleop.widget("ok").unwrap().props,
        Some(json!({ "min": -1, "max": 1, "precision": 1 }))
    );
}

#[test]
fn custom_dashboards_are_named_by_position() {
    let registry = WidgetRegistry::builtin();
    let doc = document(json!({
        "version": 1,
        "dashboardId": "second",
        "dashboards": { "custom": [ { "id": "first" }, { "id": "second" } ] }
    }));

    let (selected, dashboards) = to_runtime(doc, &registry);
    assert_eq!(selected.as_deref(), Some("second"));
    let names: Vec<_> = dashboards
        .custom
        .iter()
        .map(|d| (d.id.as_str(), d.name.as_str()))
        .collect();
    assert_eq!(names, [("first", "Dashboard 1"), ("second", "Dashboard 2")]);
}

#[test]
fn persisted_document_always_lists_every_dashboard() {
    let mut state = WorkspaceState::default();
    state.dashboards.teleop.viewport = Some(Viewport {
        x: 1.0,
        y: 2.0,
        scale: 0.5,
    });

    let doc = to_persisted(&state);
    assert_eq!(doc.version, CURRENT_VERSION);
    assert_eq!(doc.dashboard_id.as_deref(), Some(TELEOP_DASHBOARD_ID));

    let dashboards = doc.dashboards.unwrap();
    assert_eq!(dashboards.auto.unwrap().id, "auto");
    let teleop = dashboards.teleop.unwrap();
    assert_eq!(teleop.viewport.unwrap().scale, 0.5);
    assert!(dashboards.custom.unwrap().is_empty());
}

#[test]
fn persisted_widgets_carry_type_tag_and_fields() {
    let registry = WidgetRegistry::builtin();
    let descriptor = registry.get(WidgetKind::Graph).unwrap().clone();
    let mut widget = RuntimeWidget::create("g".into(), descriptor, WidgetLayout::new(0, 0, 4, 2));
    widget.slot = Some("nt:/Drive/Velocity".to_string());

    let mut state = WorkspaceState::default();
    state.dashboards.auto.widgets.insert("g".into(), widget);

    let doc = to_persisted(&state);
    let value = serde_json::to_value(&doc).unwrap();
    let record = &value["dashboards"]["auto"]["widgets"][0];
    assert_eq!(record["type"], "graph");
    assert_eq!(record["slot"], "nt:/Drive/Velocity");
    assert_eq!(record["lookback"], 10.0);

    // The written document passes the same validation an import does.
    assert!(schema::validate(&value).is_ok());
}

#[test]
fn runtime_round_trip_preserves_state() {
    let registry = WidgetRegistry::builtin();
    let mut state = WorkspaceState::default();
    state.dashboards.custom.push(RuntimeDashboard::custom("c".into(), 0));
    let descriptor = registry.get(WidgetKind::Slider).unwrap().clone();
    let mut widget = RuntimeWidget::create("s".into(), descriptor, WidgetLayout::new(2, 3, 3, 1));
    widget.props = Some(json!({ "min": -5, "max": 5, "step": 0.5 }));
    widget.lookback = Some(2.5);
    state.dashboards.custom[0].widgets.insert("s".into(), widget);
    state.dashboard_id = "c".into();

    let (selected, dashboards) = to_runtime(to_persisted(&state), &registry);
    assert_eq!(selected.as_deref(), Some("c"));
    assert_eq!(dashboards, state.dashboards);
}
