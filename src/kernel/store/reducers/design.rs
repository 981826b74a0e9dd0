use crate::kernel::state::WorkspaceState;
use crate::kernel::Action;

pub(in crate::kernel::store) fn reduce_design_action(draft: &mut WorkspaceState, action: Action) -> bool {
    let design_mode = match action {
        Action::ToggleDesignMode => !draft.design_mode,
        Action::EnterDesignMode => true,
        Action::ExitDesignMode => false,
        _ => unreachable!("non-design action passed to reduce_design_action"),
    };

    let changed = draft.design_mode != design_mode;
    draft.design_mode = design_mode;
    changed
}
