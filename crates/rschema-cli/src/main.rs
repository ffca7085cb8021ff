use std::process::ExitCode;

use clap::Parser;

mod args;
mod cmd;
mod io;
mod logging;
mod output;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = args::Cli::parse();
    output::init(cli.json);

    if let Err(e) = logging::init(&cli.log_level, cli.json) {
        output::print_error(&e);
        return cmd::Outcome::Failed.into();
    }

    match cmd::dispatch(cli).await {
        Ok(outcome) => outcome.into(),
        Err(e) => {
            output::print_error(&e);
            cmd::Outcome::Failed.into()
        }
    }
}
