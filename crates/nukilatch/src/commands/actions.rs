//! One-shot lock action handlers.

use nukilatch_core::{ActionResponse, LockAction};

use crate::cli::GlobalOpts;
use crate::config::Loaded;
use crate::error::CliError;
use crate::output;

pub async fn handle(
    loaded: &Loaded,
    action: LockAction,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let nuki_id = loaded.nuki_id()?;
    let client = loaded.client()?;

    tracing::debug!(nuki_id, %action, "issuing one-shot action");
    let resp = client.lock_action(nuki_id, action).await?;

    if !resp.success {
        return Err(CliError::Rejected {
            action: action.to_string(),
            message: resp.message.unwrap_or_else(|| "no reason given".into()),
        });
    }

    let out = output::render_single(
        global.output,
        &resp,
        |r| detail(action, nuki_id, r),
        |r| r.success.to_string(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

fn detail(action: LockAction, nuki_id: u64, resp: &ActionResponse) -> String {
    let mut line = format!("{action}: confirmed for {nuki_id}");
    if resp.battery_critical == Some(true) {
        line.push_str(" (battery critical)");
    }
    line
}
