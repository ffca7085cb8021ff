use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use rschema_core::parse::parse_json_bytes;
use serde_json::Value;
use tokio::io::AsyncReadExt;
use walkdir::WalkDir;

/// One document to validate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    Stdin,
    File(PathBuf),
}

impl fmt::Display for Input {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Stdin => f.write_str("-"),
            Self::File(p) => write!(f, "{}", p.display()),
        }
    }
}

impl Input {
    /// Raw document bytes. Parsing is left to the caller.
    pub async fn read_bytes(&self, max_bytes: usize) -> Result<Vec<u8>> {
        match self {
            Self::Stdin => read_stdin_bytes(max_bytes).await,
            Self::File(p) => read_file_bytes(p, max_bytes).await,
        }
    }
}

/// Expand command-line paths: `-` is stdin, directories are walked for
/// `*.json` files in sorted order, anything else must be an existing file.
pub fn collect_inputs(paths: &[String]) -> Result<Vec<Input>> {
    let mut inputs = Vec::new();
    let mut saw_stdin = false;

    for raw in paths {
        if raw == "-" {
            if saw_stdin {
                return Err(anyhow!("stdin (`-`) given more than once"));
            }
            saw_stdin = true;
            inputs.push(Input::Stdin);
            continue;
        }

        let path = Path::new(raw);
        if path.is_dir() {
            for entry in WalkDir::new(path).sort_by_file_name() {
                let entry = entry.with_context(|| format!("walk {}", path.display()))?;
                if entry.file_type().is_file() && is_json_file(entry.path()) {
                    inputs.push(Input::File(entry.into_path()));
                }
            }
        } else if path.is_file() {
            inputs.push(Input::File(path.to_path_buf()));
        } else {
            return Err(anyhow!("no such file or directory: {raw}"));
        }
    }
    Ok(inputs)
}

fn is_json_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map_or(false, |e| e.eq_ignore_ascii_case("json"))
}

pub async fn read_json_file<P: AsRef<Path>>(path: P, max_bytes: usize) -> Result<Value> {
    let path = path.as_ref();
    let raw = read_file_bytes(path, max_bytes).await?;
    parse_json_bytes(&raw, max_bytes).with_context(|| format!("parse {}", path.display()))
}

async fn read_file_bytes(path: &Path, max_bytes: usize) -> Result<Vec<u8>> {
    let meta = tokio::fs::metadata(path)
        .await
        .with_context(|| format!("stat {}", path.display()))?;
    if meta.len() > max_bytes as u64 {
        return Err(anyhow!(
            "{}: file too large ({} bytes > limit {max_bytes})",
            path.display(),
            meta.len()
        ));
    }
    tokio::fs::read(path)
        .await
        .with_context(|| format!("read {}", path.display()))
}

async fn read_stdin_bytes(max_bytes: usize) -> Result<Vec<u8>> {
    let mut raw = Vec::new();
    // One extra byte tells "exactly at the limit" from "over it".
    tokio::io::stdin()
        .take(max_bytes as u64 + 1)
        .read_to_end(&mut raw)
        .await
        .context("read stdin")?;
    Ok(raw)
}
