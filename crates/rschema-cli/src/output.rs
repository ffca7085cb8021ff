use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

static JSON_MODE: AtomicBool = AtomicBool::new(false);

pub fn init(json: bool) {
    JSON_MODE.store(json, Ordering::Relaxed);
}

pub fn is_json() -> bool {
    JSON_MODE.load(Ordering::Relaxed)
}

pub fn print<T: Serialize>(value: &T) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    println!("{s}");
    Ok(())
}

#[derive(Serialize)]
struct ErrorOut<'a> {
    ok: bool,
    error: &'a str,
}

/// Report a command failure on stdout (JSON mode) or stderr.
pub fn print_error(e: &anyhow::Error) {
    let msg = format!("{e:#}");
    if is_json() && print(&ErrorOut { ok: false, error: &msg }).is_ok() {
        return;
    }
    eprintln_line(&format!("error: {msg}"));
}

pub fn eprintln_line(msg: &str) {
    let _ = writeln!(io::stderr(), "{msg}");
}

pub fn stdout() -> StandardStream {
    StandardStream::stdout(ColorChoice::Auto)
}

/// Write `label` in `color`, then the rest of the line uncolored.
pub fn status_line(out: &mut StandardStream, color: Color, label: &str, rest: &str) -> io::Result<()> {
    out.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true))?;
    write!(out, "{label}")?;
    out.reset()?;
    writeln!(out, " {rest}")
}
