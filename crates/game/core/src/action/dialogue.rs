//! Conversation navigation.
//!
//! Broken narrative data (missing parcel or node) ends the conversation with
//! an in-fiction message instead of failing the turn.

use super::{Action, ActionContext, wrap_selection};
use crate::engine::Phase;
use crate::env::{DialogueNode, DialogueParcel};
use crate::state::{Conversation, LogKind};

/// Starts the conversation `parcel_key`.
///
/// Returns false when the parcel cannot be resolved; the caller decides how
/// the turn continues.
pub(crate) fn start(ctx: &mut ActionContext<'_>, parcel_key: &str) -> bool {
    let content = ctx.content;
    let Some(parcel) = content.dialogue(parcel_key) else {
        tracing::warn!(parcel = parcel_key, "dialogue parcel not found");
        ctx.state
            .log(LogKind::Warning, "They have nothing to say to you.");
        return false;
    };
    let Some(node) = parcel.node(&parcel.start) else {
        tracing::warn!(parcel = parcel_key, node = %parcel.start, "dialogue start node not found");
        ctx.state
            .log(LogKind::Warning, "They have nothing to say to you.");
        return false;
    };

    ctx.state.conversation = Some(Conversation::new(&parcel.key, &parcel.start));
    speak(ctx, parcel, node);
    ctx.transition(Phase::Dialogue);
    true
}

pub(super) fn handle(ctx: &mut ActionContext<'_>, action: Action) {
    let content = ctx.content;
    let Some(conversation) = ctx.state.conversation.clone() else {
        return end(ctx, None);
    };
    let Some(parcel) = content.dialogue(&conversation.parcel_id) else {
        tracing::warn!(parcel = %conversation.parcel_id, "dialogue parcel vanished");
        return end(ctx, Some("The conversation trails off."));
    };
    let Some(node) = parcel.node(&conversation.node_id) else {
        tracing::warn!(node = %conversation.node_id, "dialogue node not found");
        return end(ctx, Some("The conversation trails off."));
    };

    match action {
        Action::SelectNext | Action::SelectPrevious => {
            let index = wrap_selection(
                conversation.choice_index,
                node.choices.len(),
                action == Action::SelectNext,
            );
            if let Some(active) = ctx.state.conversation.as_mut() {
                active.choice_index = index;
            }
        }
        Action::Confirm => {
            if node.choices.is_empty() {
                return end(ctx, None);
            }
            let choice = &node.choices[conversation.choice_index % node.choices.len()];
            let Some(next) = parcel.node(&choice.target) else {
                tracing::warn!(link = %choice.target, "broken dialogue link");
                return end(ctx, Some("You lose the thread of the conversation."));
            };
            if let Some(active) = ctx.state.conversation.as_mut() {
                active.node_id = choice.target.clone();
                active.choice_index = 0;
            }
            speak(ctx, parcel, next);
            if next.choices.is_empty() {
                ctx.state.log(
                    LogKind::Dialogue,
                    format!("{} has nothing more to say.", parcel.speaker),
                );
            }
        }
        Action::Cancel => end(ctx, None),
        _ => {}
    }
}

fn speak(ctx: &mut ActionContext<'_>, parcel: &DialogueParcel, node: &DialogueNode) {
    ctx.state.log(
        LogKind::Dialogue,
        format!("{}: {}", parcel.speaker, node.text),
    );
}

fn end(ctx: &mut ActionContext<'_>, message: Option<&str>) {
    if let Some(message) = message {
        ctx.state.log(LogKind::Warning, message);
    }
    ctx.state.conversation = None;
    ctx.transition(Phase::PlayerTurn);
}
