use std::path::Path;

use anyhow::Result;
use rschema_core::config::ValidatorConfig;
use rschema_core::Validator;
use serde::Serialize;
use termcolor::Color;
use tracing::info;

use crate::cmd::Outcome;
use crate::io::input;
use crate::output;

#[derive(Debug, Serialize)]
pub struct CheckSchemaOut {
    pub ok: bool,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draft: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

pub async fn run(file: &Path, max_bytes: usize) -> Result<Outcome> {
    let schema = input::read_json_file(file, max_bytes).await?;

    let mut config = ValidatorConfig::default();
    config.limits.max_json_bytes = max_bytes;

    let out = match Validator::options().with_config(config).build(&schema) {
        Ok(v) => {
            info!(path = %file.display(), draft = v.draft().uri(), "schema compiled");
            CheckSchemaOut {
                ok: true,
                path: file.display().to_string(),
                draft: Some(v.draft().uri()),
                code: None,
                error: None,
            }
        }
        Err(e) => CheckSchemaOut {
            ok: false,
            path: file.display().to_string(),
            draft: None,
            code: Some(e.code()),
            error: Some(e.to_string()),
        },
    };

    if output::is_json() {
        output::print(&out)?;
    } else {
        let mut stdout = output::stdout();
        match &out.error {
            None => output::status_line(
                &mut stdout,
                Color::Green,
                "ok",
                &format!("{} ({})", out.path, out.draft.unwrap_or_default()),
            )?,
            Some(err) => {
                output::status_line(&mut stdout, Color::Red, "invalid", &format!("{}: {err}", out.path))?
            }
        }
    }

    Ok(if out.ok { Outcome::Clean } else { Outcome::Invalid })
}
