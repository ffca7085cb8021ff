use std::process::ExitCode;

use anyhow::Result;

use crate::args::{Cli, Command};

mod check_schema;
mod schema;
mod validate;

/// How a command ended; maps onto the process exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Everything checked out.
    Clean,
    /// At least one document (or schema) failed validation.
    Invalid,
    /// Usage, I/O or schema errors.
    Failed,
}

impl From<Outcome> for ExitCode {
    fn from(o: Outcome) -> Self {
        match o {
            Outcome::Clean => ExitCode::SUCCESS,
            Outcome::Invalid => ExitCode::from(1),
            Outcome::Failed => ExitCode::from(2),
        }
    }
}

pub async fn dispatch(cli: Cli) -> Result<Outcome> {
    match cli.command {
        Command::Validate { schema, max_bytes, paths } => {
            validate::run(schema.as_deref(), max_bytes, &paths).await
        }
        Command::Schema => schema::run(),
        Command::CheckSchema { file, max_bytes } => check_schema::run(&file, max_bytes).await,
    }
}
