use super::{Action, ActionContext};
use crate::engine::Phase;

pub(super) fn handle(ctx: &mut ActionContext<'_>, action: Action) {
    let max_offset = ctx
        .state
        .log
        .len()
        .saturating_sub(ctx.config.log_window);
    match action {
        Action::ScrollUp => {
            ctx.state.log_offset = (ctx.state.log_offset + 1).min(max_offset);
        }
        Action::ScrollDown => {
            ctx.state.log_offset = ctx.state.log_offset.saturating_sub(1).min(max_offset);
        }
        Action::Cancel => ctx.transition(Phase::PlayerTurn),
        _ => {}
    }
}
