use newsroom_core::article::Article;
use newsroom_core::operation::{OperationState, OperationTarget};
use newsroom_core::types::ReviewAction;
use std::path::Path;

use crate::cmd::{confirm, open_engine, parse_restore_to, Who};
use crate::output::print_json;

pub struct ReviewArgs {
    pub id: String,
    pub action: String,
    pub feedback: Option<String>,
    pub restore_to: Option<String>,
    pub yes: bool,
}

pub fn run(root: &Path, who: &Who, args: ReviewArgs, json: bool) -> anyhow::Result<()> {
    let actor = who.require()?;
    let action: ReviewAction = args.action.parse()?;
    let restore_to = parse_restore_to(args.restore_to.as_deref())?;
    let (_, engine) = open_engine(root)?;

    let state = OperationState::<Article>::Idle
        .request(action, OperationTarget::Article(args.id.clone()))?;

    if !confirm(&format!("{action} article '{}'?", args.id), args.yes)? {
        state.dismiss()?;
        println!("Cancelled.");
        return Ok(());
    }

    let state = state.confirm()?.run(|action, _| {
        engine.apply_action(
            &args.id,
            action,
            &actor,
            args.feedback.as_deref(),
            restore_to,
        )
    })?;

    match state {
        OperationState::Succeeded { result } => {
            if json {
                print_json(&serde_json::json!({
                    "id": result.id,
                    "action": action,
                    "status": result.status,
                    "article": result,
                }))?;
            } else {
                println!(
                    "Article '{}' {}; now {}.",
                    result.id,
                    action.past_tense(),
                    result.status
                );
            }
            Ok(())
        }
        OperationState::Failed { error } => anyhow::bail!("{}", error.message),
        other => anyhow::bail!("review ended in unexpected state: {}", other.name()),
    }
}
