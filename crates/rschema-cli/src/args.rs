use std::path::PathBuf;

use clap::{Parser, Subcommand};
use rschema_core::config::DEFAULT_MAX_JSON_BYTES;

#[derive(Parser, Debug, Clone)]
#[command(name = "rschema", version, about = "Validate Records and JSON documents against JSON Schema")]
pub struct Cli {
    /// Emit JSON output on stdout.
    #[arg(long, global = true)]
    pub json: bool,

    /// Log filter used when RSCHEMA_LOG is unset (e.g. debug, rschema_core=trace).
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Validate JSON files against the Record schema or a custom schema.
    Validate {
        /// Schema file. Defaults to the bundled Record schema.
        #[arg(long)]
        schema: Option<PathBuf>,

        /// Reject inputs larger than this many bytes.
        #[arg(long, default_value_t = DEFAULT_MAX_JSON_BYTES)]
        max_bytes: usize,

        /// Files, directories (searched for *.json) or `-` for stdin.
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Print the bundled Record schema.
    Schema,

    /// Compile a schema and report whether it is usable.
    CheckSchema {
        file: PathBuf,

        #[arg(long, default_value_t = DEFAULT_MAX_JSON_BYTES)]
        max_bytes: usize,
    },
}
