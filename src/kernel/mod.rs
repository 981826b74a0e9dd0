//! Headless workspace core (state/action/effect).

pub mod action;
pub mod convert;
pub mod effect;
pub mod projection;
pub mod services;
pub mod state;
pub mod store;

pub use action::Action;
pub use effect::Effect;
pub use projection::{DashboardActions, Selector, SubscriptionId};
pub use state::{
    DashboardKind, Dashboards, RuntimeDashboard, RuntimeWidget, WorkspaceState,
    AUTO_DASHBOARD_ID, TELEOP_DASHBOARD_ID,
};
pub use store::{DispatchResult, HydrationError, Store};
