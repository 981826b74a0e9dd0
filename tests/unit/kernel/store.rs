use super::*;
use crate::kernel::state::AUTO_DASHBOARD_ID;
use crate::schema::{Viewport, WidgetLayout};
use crate::widgets::WidgetKind;
use serde_json::json;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

fn new_store() -> Store {
    Store::new(WidgetRegistry::builtin())
}

fn hydrated_store() -> Store {
    let mut store = new_store();
    store.hydrate(Ok(None));
    store
}

fn add_widget(store: &mut Store, kind: WidgetKind, dashboard: Option<&str>) -> String {
    let descriptor = store.registry().get(kind).unwrap().clone();
    let layout = descriptor.default_layout(0, 0);
    let action = Action::add_widget(descriptor, layout, dashboard.map(Into::into));
    let Action::AddWidget { id, .. } = &action else {
        unreachable!()
    };
    let id = id.to_string();
    assert!(store.dispatch(action).state_changed);
    id
}

fn set_slot(store: &mut Store, id: &str, slot: Option<&str>) {
    store.dispatch(Action::UpdateWidgetSlot {
        id: id.into(),
        slot: slot.map(str::to_owned),
        dashboard: None,
    });
}

fn custom_names(store: &Store) -> Vec<String> {
    store
        .state()
        .dashboards
        .custom
        .iter()
        .map(|d| d.name.clone())
        .collect()
}

fn has_persist(result: &DispatchResult) -> bool {
    result
        .effects
        .iter()
        .any(|effect| matches!(effect, Effect::Persist(_)))
}

#[test]
fn add_dashboard_appends_and_selects() {
    let mut store = hydrated_store();
    let result = store.dispatch(Action::add_dashboard());

    assert!(result.state_changed);
    assert!(has_persist(&result));
    let state = store.state();
    assert_eq!(state.dashboards.custom.len(), 1);
    assert_eq!(state.dashboard_id, state.dashboards.custom[0].id);
    assert_eq!(state.dashboards.custom[0].name, "Dashboard 1");
}

#[test]
fn removing_first_custom_dashboard_renumbers_the_rest() {
    let mut store = hydrated_store();
    for _ in 0..3 {
        store.dispatch(Action::add_dashboard());
    }
    assert_eq!(custom_names(&store), ["Dashboard 1", "Dashboard 2", "Dashboard 3"]);

    let first = store.state().dashboards.custom[0].id.clone();
    let second = store.state().dashboards.custom[1].id.clone();
    assert!(store.dispatch(Action::RemoveDashboard { id: first }).state_changed);

    assert_eq!(custom_names(&store), ["Dashboard 1", "Dashboard 2"]);
    assert_eq!(store.state().dashboards.custom[0].id, second);
    assert_eq!(store.state().dashboard_id, TELEOP_DASHBOARD_ID);
}

#[test]
fn remove_dashboard_ignores_unknown_and_fixed_ids() {
    let mut store = hydrated_store();
    store.dispatch(Action::add_dashboard());
    let revision = store.revision();

    assert!(!store.dispatch(Action::RemoveDashboard { id: "nope".into() }).state_changed);
    assert!(!store.dispatch(Action::RemoveDashboard { id: "auto".into() }).state_changed);
    assert_eq!(store.revision(), revision);
    assert_eq!(store.state().dashboards.custom.len(), 1);
}

#[test]
fn move_dashboard_reorders_and_renumbers() {
    let mut store = hydrated_store();
    for _ in 0..3 {
        store.dispatch(Action::add_dashboard());
    }
    let ids: Vec<_> = store
        .state()
        .dashboards
        .custom
        .iter()
        .map(|d| d.id.clone())
        .collect();

    let result = store.dispatch(Action::MoveDashboard {
        id: ids[2].clone(),
        target: ids[0].clone(),
    });
    assert!(result.state_changed);

    let custom = &store.state().dashboards.custom;
    assert_eq!(custom[0].id, ids[2]);
    assert_eq!(custom[1].id, ids[0]);
    assert_eq!(custom[2].id, ids[1]);
    assert_eq!(custom_names(&store), ["Dashboard 1", "Dashboard 2", "Dashboard 3"]);

    let missing = store.dispatch(Action::MoveDashboard {
        id: ids[0].clone(),
        target: "nope".into(),
    });
    assert!(!missing.state_changed);
}

#[test]
fn select_dashboard_ignores_unknown_ids() {
    let mut store = hydrated_store();
    let before = store.state().dashboard_id.clone();

    let result = store.dispatch(Action::SelectDashboard {
        id: "nonexistent-id".into(),
    });
    assert!(!result.state_changed);
    assert!(result.effects.is_empty());
    assert_eq!(store.state().dashboard_id, before);

    assert!(store
        .dispatch(Action::SelectDashboard {
            id: AUTO_DASHBOARD_ID.into()
        })
        .state_changed);
    assert_eq!(store.state().dashboard_id, AUTO_DASHBOARD_ID);
}

#[test]
fn select_dashboard_by_key_uses_custom_positions() {
    let mut store = hydrated_store();
    store.dispatch(Action::add_dashboard());
    store.dispatch(Action::add_dashboard());
    store.dispatch(Action::SelectDashboard {
        id: TELEOP_DASHBOARD_ID.into(),
    });

    assert!(store.dispatch(Action::SelectDashboardByKey { index: 1 }).state_changed);
    assert_eq!(
        store.state().dashboard_id,
        store.state().dashboards.custom[1].id
    );
    assert!(!store.dispatch(Action::SelectDashboardByKey { index: 2 }).state_changed);
}

#[test]
fn add_widget_on_missing_dashboard_is_a_no_op() {
    let mut store = hydrated_store();
    let descriptor = store.registry().get(WidgetKind::Text).unwrap().clone();
    let result = store.dispatch(Action::add_widget(
        descriptor,
        WidgetLayout::new(0, 0, 2, 1),
        Some("nope".into()),
    ));
    assert!(!result.state_changed);
    assert!(store.state().dashboards.teleop.widgets.is_empty());
}

#[test]
fn widget_updates_apply_in_place() {
    let mut store = hydrated_store();
    let id = add_widget(&mut store, WidgetKind::Gauge, None);

    store.dispatch(Action::LayoutWidget {
        id: id.as_str().into(),
        layout: WidgetLayout::new(4, 4, 3, 3),
        dashboard: None,
    });
    store.dispatch(Action::UpdateWidgetLookback {
        id: id.as_str().into(),
        lookback: Some(-3.0),
        dashboard: None,
    });
    store.dispatch(Action::UpdateWidgetProps {
        id: id.as_str().into(),
        props: Some(json!({ "min": 0, "max": 12, "precision": 1 })),
        dashboard: None,
    });

    let widget = store.state().widget(None, &id).unwrap();
    assert_eq!(widget.layout, WidgetLayout::new(4, 4, 3, 3));
    assert_eq!(widget.lookback, Some(0.0));
    assert_eq!(widget.props, Some(json!({ "min": 0, "max": 12, "precision": 1 })));

    let cleared = store.dispatch(Action::UpdateWidgetProps {
        id: id.as_str().into(),
        props: None,
        dashboard: None,
    });
    assert!(cleared.state_changed);
    let widget = store.state().widget(None, &id).unwrap();
    assert_eq!(widget.props, widget.descriptor.default_props());
}

#[test]
fn widget_updates_on_missing_widget_are_no_ops() {
    let mut store = hydrated_store();
    let revision = store.revision();

    let results = [
        store.dispatch(Action::RemoveWidget {
            id: "nope".into(),
            dashboard: None,
        }),
        store.dispatch(Action::LayoutWidget {
            id: "nope".into(),
            layout: WidgetLayout::new(0, 0, 1, 1),
            dashboard: None,
        }),
        store.dispatch(Action::UpdateWidgetSlot {
            id: "nope".into(),
            slot: Some("nt:/A".to_string()),
            dashboard: None,
        }),
    ];

    assert!(results.iter().all(|r| !r.state_changed && r.effects.is_empty()));
    assert_eq!(store.revision(), revision);
}

#[test]
fn update_viewport_requires_dashboard_and_positive_scale() {
    let mut store = hydrated_store();
    let viewport = Viewport {
        x: 3.0,
        y: 4.0,
        scale: 2.0,
    };

    assert!(store
        .dispatch(Action::UpdateViewport {
            viewport,
            dashboard: Some(AUTO_DASHBOARD_ID.into()),
        })
        .state_changed);
    assert_eq!(store.state().dashboards.auto.viewport, Some(viewport));

    assert!(!store
        .dispatch(Action::UpdateViewport {
            viewport,
            dashboard: Some("nope".into()),
        })
        .state_changed);
    assert!(!store
        .dispatch(Action::UpdateViewport {
            viewport: Viewport { scale: 0.0, ..viewport },
            dashboard: None,
        })
        .state_changed);
}

#[test]
fn values_the_document_cannot_hold_are_rejected() {
    let mut store = hydrated_store();
    let id = add_widget(&mut store, WidgetKind::Number, None);
    let revision = store.revision();
    let descriptor = store.registry().get(WidgetKind::Number).unwrap().clone();

    let rejected = [
        store.dispatch(Action::add_widget(
            descriptor,
            WidgetLayout::new(0, 0, 0, 1),
            None,
        )),
        store.dispatch(Action::LayoutWidget {
            id: id.as_str().into(),
            layout: WidgetLayout::new(0, 0, 2, 0),
            dashboard: None,
        }),
        store.dispatch(Action::UpdateWidgetLookback {
            id: id.as_str().into(),
            lookback: Some(f64::INFINITY),
            dashboard: None,
        }),
        store.dispatch(Action::UpdateWidgetLookback {
            id: id.as_str().into(),
            lookback: Some(f64::NAN),
            dashboard: None,
        }),
        store.dispatch(Action::UpdateViewport {
            viewport: Viewport {
                x: f64::NAN,
                y: 0.0,
                scale: 1.0,
            },
            dashboard: None,
        }),
        store.dispatch(Action::UpdateViewport {
            viewport: Viewport {
                x: 0.0,
                y: f64::NEG_INFINITY,
                scale: 1.0,
            },
            dashboard: None,
        }),
    ];

    assert!(rejected.iter().all(|r| !r.state_changed && r.effects.is_empty()));
    assert_eq!(store.revision(), revision);
    assert_eq!(store.state().dashboards.teleop.widgets.len(), 1);

    let text = serde_json::to_string(&store.workspace_document()).unwrap();
    let reloaded = new_store().load_document(&text).unwrap();
    assert_eq!(reloaded, store.workspace_document());
}

#[test]
fn bound_slots_are_unique_and_unbounded_in_design_mode() {
    let mut store = hydrated_store();
    let a1 = add_widget(&mut store, WidgetKind::Number, None);
    let a2 = add_widget(&mut store, WidgetKind::Gauge, None);
    let b = add_widget(&mut store, WidgetKind::Graph, None);
    add_widget(&mut store, WidgetKind::Text, None);
    set_slot(&mut store, &a1, Some("nt:/A"));
    set_slot(&mut store, &a2, Some("nt:/A"));
    set_slot(&mut store, &b, Some("nt:/B"));

    let expected: BTreeSet<String> = ["nt:/A", "nt:/B"].into_iter().map(String::from).collect();
    assert_eq!(store.state().slots, Some(expected.clone()));

    let entered = store.dispatch(Action::EnterDesignMode);
    assert!(store.state().slots.is_none());
    assert_eq!(entered.effects, vec![Effect::SubscribeSlots(None)]);

    let exited = store.dispatch(Action::ToggleDesignMode);
    assert!(!store.state().design_mode);
    assert_eq!(store.state().slots, Some(expected.clone()));
    assert_eq!(exited.effects, vec![Effect::SubscribeSlots(Some(expected))]);

    assert!(!store.dispatch(Action::ExitDesignMode).state_changed);
}

#[test]
fn slot_changes_in_design_mode_keep_slots_unbounded() {
    let mut store = hydrated_store();
    let id = add_widget(&mut store, WidgetKind::Number, None);
    store.dispatch(Action::EnterDesignMode);

    let result = store.dispatch(Action::UpdateWidgetSlot {
        id: id.as_str().into(),
        slot: Some("nt:/C".to_string()),
        dashboard: None,
    });
    assert!(result.state_changed);
    assert!(store.state().slots.is_none());
    assert!(!result
        .effects
        .iter()
        .any(|effect| matches!(effect, Effect::SubscribeSlots(_))));
}

#[test]
fn import_rejects_wrong_version_and_leaves_state() {
    let mut store = hydrated_store();
    store.dispatch(Action::add_dashboard());
    let before = store.snapshot();

    let err = store
        .import(&json!({
            "version": 2,
            "dashboards": { "custom": [] }
        }))
        .unwrap_err();

    assert!(err.issues().iter().any(|issue| issue.path == "/version"));
    assert_eq!(*store.state(), *before);
}

#[test]
fn import_reports_structured_issues() {
    let mut store = hydrated_store();
    let err = store
        .import(&json!({
            "version": 1,
            "dashboards": {
                "teleop": {
                    "id": "teleop",
                    "widgets": [ { "id": "w", "type": "number", "layout": { "left": 0, "top": 0, "width": 0, "height": 1 } } ]
                }
            }
        }))
        .unwrap_err();

    assert!(matches!(err, DocumentError::Invalid { .. }));
    assert!(err
        .issues()
        .iter()
        .any(|issue| issue.path == "/dashboards/teleop/widgets/0/layout/width"));
}

#[test]
fn import_drops_unknown_kinds_and_substitutes_bad_props() {
    let mut store = hydrated_store();
    let result = store
        .import(&json!({
            "version": 1,
            "dashboardId": "auto",
            "dashboards": {
                "auto": {
                    "id": "auto",
                    "widgets": [
                        { "id": "old", "type": "camera-stream", "layout": { "left": 0, "top": 0, "width": 2, "height": 2 } },
                        {
                            "id": "slider",
                            "type": "slider",
                            "layout": { "left": 2, "top": 0, "width": 3, "height": 1 },
                            "slot": "nt:/Arm/Setpoint",
                            "props": { "min": 0, "max": 1, "step": -1 }
                        }
                    ]
                }
            }
        }))
        .unwrap();

    assert!(result.state_changed);
    assert!(has_persist(&result));
    let state = store.state();
    assert_eq!(state.dashboard_id, AUTO_DASHBOARD_ID);
    assert!(state.widget(None, "old").is_none());
    let slider = state.widget(None, "slider").unwrap();
    assert_eq!(slider.props, slider.descriptor.default_props());
    assert_eq!(
        state.slots,
        Some(BTreeSet::from(["nt:/Arm/Setpoint".to_string()]))
    );
}

#[test]
fn import_with_unknown_selection_falls_back_to_teleop() {
    let mut store = hydrated_store();
    store
        .import(&json!({ "version": 1, "dashboardId": "gone" }))
        .unwrap();
    assert_eq!(store.state().dashboard_id, TELEOP_DASHBOARD_ID);
}

#[test]
fn exported_document_reimports_to_the_same_state() {
    let mut store = hydrated_store();
    store.dispatch(Action::add_dashboard());
    let graph = add_widget(&mut store, WidgetKind::Graph, None);
    set_slot(&mut store, &graph, Some("nt:/Drive/Speed"));
    add_widget(&mut store, WidgetKind::MatchTime, Some(TELEOP_DASHBOARD_ID));
    store.dispatch(Action::UpdateViewport {
        viewport: Viewport {
            x: -2.0,
            y: 1.5,
            scale: 0.75,
        },
        dashboard: None,
    });
    let before = store.snapshot();

    let exported = serde_json::to_value(store.workspace_document()).unwrap();
    let mut other = hydrated_store();
    other.import(&exported).unwrap();

    assert_eq!(other.state().dashboards, before.dashboards);
    assert_eq!(other.state().dashboard_id, before.dashboard_id);
    assert_eq!(other.state().slots, before.slots);
}

#[test]
fn persist_is_suppressed_until_hydrated() {
    let mut store = new_store();
    let early = store.dispatch(Action::add_dashboard());
    assert!(early.state_changed);
    assert!(!has_persist(&early));

    let hydrated = store.hydrate(Ok(None));
    assert!(hydrated.state_changed);
    assert!(store.has_hydrated());
    assert!(!has_persist(&hydrated));
    assert_eq!(store.state().dashboards.custom.len(), 1);

    let later = store.dispatch(Action::add_dashboard());
    assert!(has_persist(&later));
}

#[test]
fn design_mode_changes_do_not_persist() {
    let mut store = hydrated_store();
    let result = store.dispatch(Action::ToggleDesignMode);
    assert!(result.state_changed);
    assert!(!has_persist(&result));
}

#[test]
fn hydrate_loads_stored_document_once() {
    let mut store = new_store();
    let stored = json!({
        "version": 1,
        "dashboardId": "c1",
        "dashboards": { "custom": [ { "id": "c1" } ] }
    })
    .to_string();

    store.hydrate(Ok(Some(stored)));
    assert!(store.has_hydrated());
    assert_eq!(store.state().dashboard_id, "c1");
    assert_eq!(store.state().dashboards.custom[0].name, "Dashboard 1");

    let again = store.hydrate(Ok(Some(json!({ "version": 1 }).to_string())));
    assert!(!again.state_changed);
    assert_eq!(store.state().dashboards.custom.len(), 1);
}

#[test]
fn hydrate_failures_keep_defaults_and_still_complete() {
    let mut corrupt = new_store();
    corrupt.hydrate(Ok(Some("{ not json".to_string())));
    assert!(corrupt.has_hydrated());
    assert_eq!(corrupt.state().dashboards, Dashboards::default());

    let mut unreadable = new_store();
    unreadable.handle_message(StoreMessage::Hydrated(Err(StorageError::NoLocation)));
    assert!(unreadable.has_hydrated());

    let mut future = new_store();
    future.hydrate(Ok(Some(json!({ "version": 99 }).to_string())));
    assert!(future.has_hydrated());
    assert_eq!(future.state().dashboard_id, TELEOP_DASHBOARD_ID);
}

#[test]
fn hydrate_runs_registered_migrations() {
    let migrator = Migrator::new().with_step(0, |mut doc| {
        doc["version"] = json!(1);
        doc["dashboardId"] = json!("auto");
        Ok(doc)
    });
    let mut store = new_store().with_migrator(migrator);

    store.hydrate(Ok(Some(json!({ "version": 0 }).to_string())));
    assert_eq!(store.state().dashboard_id, AUTO_DASHBOARD_ID);
}

#[test]
fn snapshots_are_not_affected_by_later_mutations() {
    let mut store = hydrated_store();
    let before = store.snapshot();
    store.dispatch(Action::add_dashboard());

    assert!(before.dashboards.custom.is_empty());
    assert_eq!(store.state().dashboards.custom.len(), 1);
}

#[test]
fn subscriptions_fire_only_when_slice_changes() {
    let mut store = hydrated_store();
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = seen.clone();
    let id = store.subscribe(
        |state: &WorkspaceState| state.dashboard_id.clone(),
        move |dashboard_id: &DashboardId| sink.borrow_mut().push(dashboard_id.to_string()),
    );

    store.dispatch(Action::ToggleDesignMode);
    store.dispatch(Action::SelectDashboard {
        id: AUTO_DASHBOARD_ID.into(),
    });
    store.dispatch(Action::SelectDashboard {
        id: AUTO_DASHBOARD_ID.into(),
    });
    assert_eq!(*seen.borrow(), vec!["auto".to_string()]);

    assert!(store.unsubscribe(id));
    store.dispatch(Action::SelectDashboard {
        id: TELEOP_DASHBOARD_ID.into(),
    });
    assert_eq!(seen.borrow().len(), 1);
}
