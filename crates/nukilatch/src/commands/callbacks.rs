//! Callback command handlers.

use serde::Serialize;
use tabled::Tabled;

use nukilatch_core::{Callback, CallbackRegistration};

use crate::cli::{GlobalOpts, RegisterArgs};
use crate::config::Loaded;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct CallbackRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "URL")]
    url: String,
}

impl From<&Callback> for CallbackRow {
    fn from(c: &Callback) -> Self {
        Self {
            id: c.id.map(|id| id.to_string()).unwrap_or_default(),
            url: c.url.clone(),
        }
    }
}

pub async fn list(loaded: &Loaded, global: &GlobalOpts) -> Result<(), CliError> {
    let client = loaded.client()?;
    let callbacks = client.list_callbacks().await?;

    let out = output::render_list(
        global.output,
        &callbacks,
        |c| CallbackRow::from(c),
        |c| c.url.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}

#[derive(Serialize)]
struct Registered {
    url: String,
    already_registered: bool,
}

pub async fn register(
    loaded: &Loaded,
    args: RegisterArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let url = args
        .url
        .or_else(|| loaded.config.webhook.resolved_callback_url())
        .ok_or_else(|| {
            CliError::config(
                &loaded.path,
                nukilatch_config::ConfigError::Missing {
                    field: "webhook.advertise_host or webhook.callback_url".into(),
                },
            )
        })?;

    let client = loaded.client()?;
    let already_registered = match client.register_webhook(&url).await {
        CallbackRegistration::AlreadyRegistered => true,
        CallbackRegistration::Registered => false,
        CallbackRegistration::Rejected { message } => {
            return Err(CliError::Rejected {
                action: "callback registration".into(),
                message: message.unwrap_or_else(|| "no reason given".into()),
            });
        }
        CallbackRegistration::Failed { reason } => {
            return Err(CliError::Protocol { message: reason });
        }
    };

    let result = Registered {
        url,
        already_registered,
    };
    let out = output::render_single(
        global.output,
        &result,
        |r| {
            if r.already_registered {
                format!("Already registered: {}", r.url)
            } else {
                format!("Registered: {}", r.url)
            }
        },
        |r| r.url.clone(),
    )?;
    output::print_output(&out, global.quiet);
    Ok(())
}
