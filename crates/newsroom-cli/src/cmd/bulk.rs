use newsroom_core::bulk::{BulkActionResult, BulkCoordinator, BulkOutcome, BulkRequest};
use newsroom_core::operation::{OperationFailure, OperationState, OperationTarget};
use newsroom_core::types::ReviewAction;
use std::path::Path;

use crate::cmd::{confirm, open_engine, parse_restore_to, Who};
use crate::output::{or_dash, print_json, print_table};

pub struct BulkArgs {
    pub action: String,
    pub ids: Vec<String>,
    pub feedback: Option<String>,
    pub restore_to: Option<String>,
    pub timeout_secs: Option<u64>,
    pub yes: bool,
}

pub fn run(root: &Path, who: &Who, args: BulkArgs, json: bool) -> anyhow::Result<()> {
    let actor = who.require()?;
    let action: ReviewAction = args.action.parse()?;
    let restore_to = parse_restore_to(args.restore_to.as_deref())?;
    let (config, engine) = open_engine(root)?;
    let coordinator = BulkCoordinator::from_config(engine, &config.workflow);

    let state = OperationState::<BulkActionResult>::Idle
        .request(action, OperationTarget::Batch(args.ids.clone()))?;

    if !confirm(
        &format!("{action} {} article(s)?", args.ids.len()),
        args.yes,
    )? {
        state.dismiss()?;
        println!("Cancelled.");
        return Ok(());
    }
    let state = state.confirm()?;

    let request = BulkRequest {
        ids: args.ids,
        action,
        feedback: args.feedback,
        restore_to,
        timeout_secs: args.timeout_secs,
    };

    let rt = tokio::runtime::Runtime::new()?;
    let outcome = rt.block_on(async move {
        match coordinator.apply(request, actor).await? {
            BulkOutcome::Completed(result) => Ok(result),
            BulkOutcome::Pending(pending) => {
                // Exiting now would abort the batch, so keep waiting.
                eprintln!("{}", pending.message);
                pending.wait().await
            }
        }
    });

    let state = match outcome {
        Ok(result) => state.succeed(result)?,
        Err(e) => state.fail(OperationFailure::from(&e))?,
    };

    match state {
        OperationState::Succeeded { result } => {
            if json {
                print_json(&result)?;
            } else {
                print_result(action, &result);
            }
            if result.failed > 0 && result.successful == 0 {
                anyhow::bail!("no article accepted {action}");
            }
            Ok(())
        }
        OperationState::Failed { error } => anyhow::bail!("{}", error.message),
        other => anyhow::bail!("bulk action ended in unexpected state: {}", other.name()),
    }
}

fn print_result(action: ReviewAction, result: &BulkActionResult) {
    let rows = result
        .items
        .iter()
        .map(|item| {
            vec![
                item.id.clone(),
                if item.success { "ok" } else { "failed" }.to_string(),
                item.status
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| or_dash(item.error.as_deref())),
            ]
        })
        .collect();
    print_table(&["ID", "RESULT", "DETAIL"], rows);
    println!(
        "\n{action}: {} of {} succeeded, {} failed.",
        result.successful, result.total, result.failed
    );
}
