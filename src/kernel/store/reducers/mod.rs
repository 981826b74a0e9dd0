//! Reducers apply one action to a draft of the workspace state and report whether the
//! draft changed. They never touch derived state; the store recomputes it afterwards.

mod dashboard;
mod design;
mod widget;

pub(super) use dashboard::reduce_dashboard_action;
pub(super) use design::reduce_design_action;
pub(super) use widget::reduce_widget_action;
