use std::path::Path;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use rschema_core::config::ValidatorConfig;
use rschema_core::error::ValidationError;
use rschema_core::record::{compile_record_validator, RecordReport};
use rschema_core::Validator;
use serde::Serialize;
use serde_json::Value;
use termcolor::Color;
use tracing::{debug, info, warn};

use crate::cmd::Outcome;
use crate::io::input::{self, Input};
use crate::output;

/// What documents are checked against.
#[derive(Clone)]
enum Target {
    /// The bundled Record schema, reported with the Record taxonomy.
    Record(Arc<Validator>),
    Custom(Arc<Validator>),
}

impl Target {
    fn validator(&self) -> &Validator {
        match self {
            Self::Record(v) | Self::Custom(v) => v,
        }
    }

    /// Parse under the validator's size limit, then validate.
    fn check_bytes(&self, bytes: &[u8]) -> Result<Vec<Finding>> {
        let instance = self.validator().parse_instance(bytes)?;
        Ok(self.check(&instance))
    }

    fn check(&self, instance: &Value) -> Vec<Finding> {
        let errors = self.validator().iter_errors(instance);
        match self {
            Self::Record(_) => RecordReport::from_errors(&errors)
                .violations
                .into_iter()
                .map(|v| Finding {
                    field: v.field,
                    pointer: v.pointer,
                    constraint: v.kind.as_str().to_string(),
                    message: v.message,
                })
                .collect(),
            Self::Custom(_) => errors.iter().map(Finding::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Finding {
    pub field: String,
    pub pointer: String,
    pub constraint: String,
    pub message: String,
}

impl From<&ValidationError> for Finding {
    fn from(e: &ValidationError) -> Self {
        Self {
            field: e.instance_path.as_field_path(),
            pointer: e.instance_path.as_pointer(),
            constraint: e.kind.keyword().to_string(),
            message: e.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: String,
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub violations: Vec<Finding>,
}

#[derive(Debug, Serialize)]
pub struct ValidateOut {
    pub ok: bool,
    pub checked: usize,
    pub invalid: usize,
    pub errors: usize,
    pub files: Vec<FileReport>,
}

pub async fn run(schema: Option<&Path>, max_bytes: usize, paths: &[String]) -> Result<Outcome> {
    let target = match schema {
        Some(path) => Target::Custom(Arc::new(load_validator(path, max_bytes).await?)),
        None => Target::Record(Arc::new(compile_record_validator(limits(max_bytes))?)),
    };

    let inputs = input::collect_inputs(paths)?;
    if inputs.is_empty() {
        return Err(anyhow!("no JSON files found"));
    }
    debug!(inputs = inputs.len(), "collected inputs");

    let mut handles = Vec::with_capacity(inputs.len());
    for input in inputs {
        let target = target.clone();
        handles.push(tokio::spawn(async move { check_one(&input, &target, max_bytes).await }));
    }

    let mut files = Vec::with_capacity(handles.len());
    for handle in handles {
        files.push(handle.await.context("validation task panicked")?);
    }

    let out = summarize(files);
    info!(
        checked = out.checked,
        invalid = out.invalid,
        errors = out.errors,
        "validation finished"
    );

    if output::is_json() {
        output::print(&out)?;
    } else {
        render_text(&out)?;
    }

    Ok(if out.errors > 0 {
        Outcome::Failed
    } else if out.invalid > 0 {
        Outcome::Invalid
    } else {
        Outcome::Clean
    })
}

fn limits(max_bytes: usize) -> ValidatorConfig {
    let mut config = ValidatorConfig::default();
    config.limits.max_json_bytes = max_bytes;
    config
}

async fn load_validator(path: &Path, max_bytes: usize) -> Result<Validator> {
    let schema = input::read_json_file(path, max_bytes).await?;
    Validator::options()
        .with_config(limits(max_bytes))
        .build(&schema)
        .with_context(|| format!("compile schema {}", path.display()))
}

/// Reading is async; parsing and validation are CPU-bound and run on the
/// blocking pool.
async fn check_one(input: &Input, target: &Target, max_bytes: usize) -> FileReport {
    let path = input.to_string();
    let checked = match input.read_bytes(max_bytes).await {
        Ok(bytes) => {
            let target = target.clone();
            let label = path.clone();
            tokio::task::spawn_blocking(move || {
                target
                    .check_bytes(&bytes)
                    .with_context(|| format!("parse {label}"))
            })
            .await
            .context("validation task panicked")
            .and_then(|checked| checked)
        }
        Err(e) => Err(e),
    };
    match checked {
        Ok(violations) => FileReport {
            path,
            valid: violations.is_empty(),
            error: None,
            violations,
        },
        Err(e) => {
            warn!(path = %path, error = %format!("{e:#}"), "input skipped");
            FileReport {
                path,
                valid: false,
                error: Some(format!("{e:#}")),
                violations: Vec::new(),
            }
        }
    }
}

fn summarize(files: Vec<FileReport>) -> ValidateOut {
    let errors = files.iter().filter(|f| f.error.is_some()).count();
    let invalid = files.iter().filter(|f| f.error.is_none() && !f.valid).count();
    ValidateOut {
        ok: errors == 0 && invalid == 0,
        checked: files.len(),
        invalid,
        errors,
        files,
    }
}

fn render_text(out: &ValidateOut) -> Result<()> {
    let mut stdout = output::stdout();
    for file in &out.files {
        match (&file.error, file.valid) {
            (Some(err), _) => output::status_line(&mut stdout, Color::Yellow, "error", &format!("{}: {err}", file.path))?,
            (None, true) => output::status_line(&mut stdout, Color::Green, "ok", &file.path)?,
            (None, false) => {
                output::status_line(&mut stdout, Color::Red, "invalid", &file.path)?;
                for v in &file.violations {
                    println!("  {}: {} [{}]", v.field, v.message, v.constraint);
                }
            }
        }
    }
    println!(
        "{} checked, {} invalid, {} error(s)",
        out.checked, out.invalid, out.errors
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record_target(max_bytes: usize) -> Target {
        Target::Record(Arc::new(compile_record_validator(limits(max_bytes)).unwrap()))
    }

    #[test]
    fn record_target_uses_the_taxonomy() {
        let instance = json!({"id": 2, "name": "a", "tags": ["x", "x"]});
        let findings = record_target(1024).check(&instance);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].field, "tags");
        assert_eq!(findings[0].constraint, "duplicate-tag-violation");
    }

    #[test]
    fn custom_target_reports_keywords() {
        let v = Validator::new(&json!({"required": ["a"]})).unwrap();
        let findings = Target::Custom(Arc::new(v)).check(&json!({}));
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].field, "$");
        assert_eq!(findings[0].constraint, "required");
    }

    #[test]
    fn byte_limit_comes_from_the_validator() {
        let target = record_target(24);
        assert!(target.check_bytes(br#"{"id": 1, "name": "w"}"#).unwrap().is_empty());
        let err = target
            .check_bytes(br#"{"id": 1, "name": "widget-with-a-long-name"}"#)
            .unwrap_err();
        assert!(format!("{err:#}").contains("too large"), "{err:#}");
    }

    #[tokio::test]
    async fn files_are_checked_off_the_async_workers() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.json");
        let bad = dir.path().join("bad.json");
        std::fs::write(&good, r#"{"id": 1, "name": "w"}"#).unwrap();
        std::fs::write(&bad, r#"{"id": 0, "name": "w"}"#).unwrap();
        let target = record_target(1024);

        let report = check_one(&Input::File(good), &target, 1024).await;
        assert!(report.valid && report.error.is_none());

        let report = check_one(&Input::File(bad), &target, 1024).await;
        assert!(!report.valid);
        assert_eq!(report.violations[0].constraint, "range-violation");
    }

    #[test]
    fn summary_counts() {
        let file = |valid, error: Option<&str>| FileReport {
            path: "p".into(),
            valid,
            error: error.map(str::to_string),
            violations: Vec::new(),
        };
        let out = summarize(vec![file(true, None), file(false, None), file(false, Some("boom"))]);
        assert_eq!((out.checked, out.invalid, out.errors, out.ok), (3, 1, 1, false));
    }
}
