use anyhow::Result;
use rschema_core::record::{record_schema, RECORD_SCHEMA_JSON};

use crate::cmd::Outcome;
use crate::output;

pub fn run() -> Result<Outcome> {
    if output::is_json() {
        output::print(record_schema()?)?;
    } else {
        print!("{RECORD_SCHEMA_JSON}");
    }
    Ok(Outcome::Clean)
}
