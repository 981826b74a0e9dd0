use crate::kernel::state::{RuntimeDashboard, WorkspaceState, TELEOP_DASHBOARD_ID};
use crate::kernel::Action;

pub(in crate::kernel::store) fn reduce_dashboard_action(
    draft: &mut WorkspaceState,
    action: Action,
) -> bool {
    match action {
        Action::AddDashboard { id } => {
            if draft.dashboards.resolve(&id).is_some() {
                return false;
            }

            let index = draft.dashboards.custom.len();
            draft
                .dashboards
                .custom
                .push(RuntimeDashboard::custom(id.clone(), index));
            draft.dashboard_id = id;
            true
        }
        Action::RemoveDashboard { id } => {
            let Some(index) = draft.dashboards.custom_index(&id) else {
                return false;
            };

            draft.dashboards.custom.remove(index);
            draft.dashboards.renumber_custom();
            draft.dashboard_id = TELEOP_DASHBOARD_ID.into();
            true
        }
        Action::MoveDashboard { id, target } => {
            let from = draft.dashboards.custom_index(&id);
            let to = draft.dashboards.custom_index(&target);
            let (Some(from), Some(to)) = (from, to) else {
                return false;
            };
            if from == to {
                return false;
            }

            let dashboard = draft.dashboards.custom.remove(from);
            draft.dashboards.custom.insert(to, dashboard);
            draft.dashboards.renumber_custom();
            true
        }
        Action::SelectDashboard { id } => {
            if draft.dashboard_id == id || draft.dashboards.resolve(&id).is_none() {
                return false;
            }

            draft.dashboard_id = id;
            true
        }
        Action::SelectDashboardByKey { index } => {
            let Some(id) = draft.dashboards.custom.get(index).map(|d| d.id.clone()) else {
                return false;
            };
            if draft.dashboard_id == id {
                return false;
            }

            draft.dashboard_id = id;
            true
        }
        _ => unreachable!("non-dashboard action passed to reduce_dashboard_action"),
    }
}
