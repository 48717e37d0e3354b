use std::path::Path;

use serde_json::{Value, json};
use thiserror::Error;

use crate::report::NormalizeError;

pub(crate) const REPORT_HELP_COMMAND: &str = "creditsea report create --help";
pub(crate) const REPORT_HELP_SECTION_TITLE: &str = "Report Troubleshooting";

#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ClientError {
    pub code: String,
    pub message: String,
    pub recovery_steps: Vec<String>,
    pub data: Option<Value>,
}

impl ClientError {
    pub fn new(code: &str, message: &str, recovery_steps: Vec<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            recovery_steps,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn with_report_help_data(self, data: Value) -> Self {
        self.with_data(merge_report_help_data(data))
    }

    pub fn invalid_argument_for_command(message: &str, command: Option<&str>) -> Self {
        let help_hint = match command {
            Some(cmd) => format!("Run `creditsea {cmd} --help` for usage."),
            None => "Run `creditsea --help` for usage.".to_string(),
        };
        let error = Self::new("invalid_argument", message, vec![help_hint]);
        if let Some(cmd) = command {
            return error.with_data(json!({
                "command_hint": cmd,
            }));
        }
        error
    }

    pub fn invalid_argument_with_recovery(message: &str, recovery_steps: Vec<String>) -> Self {
        Self::new("invalid_argument", message, recovery_steps)
    }

    pub fn malformed_input(detail: &str) -> Self {
        Self::new(
            "malformed_input",
            &format!("The credit report could not be read as XML: {detail}"),
            vec![
                "Confirm the file is the XML credit report exported by the bureau.".to_string(),
                "Rerun `creditsea report create --dry-run <path>`.".to_string(),
            ],
        )
        .with_report_help_data(json!({
            "detail": detail,
        }))
    }

    pub fn unreadable_source(source: &str, detail: &str) -> Self {
        Self::new(
            "malformed_input",
            &format!("Could not read credit report `{source}`: {detail}"),
            vec![
                "Verify the path exists and is readable.".to_string(),
                "Rerun `creditsea report create <path>`.".to_string(),
            ],
        )
        .with_report_help_data(json!({
            "source": source,
            "detail": detail,
        }))
    }

    pub fn normalization_failed(detail: &str) -> Self {
        Self::new(
            "normalization_failed",
            &format!("The credit report could not be normalized: {detail}"),
            vec!["Check the report contents, then retry the upload.".to_string()],
        )
        .with_report_help_data(json!({
            "detail": detail,
        }))
    }

    pub fn source_too_large(size: u64, limit: u64) -> Self {
        Self::new(
            "source_too_large",
            &format!("Credit report is {size} bytes; the limit is {limit} bytes."),
            vec!["Upload a single bureau report rather than a combined export.".to_string()],
        )
        .with_report_help_data(json!({
            "size_bytes": size,
            "limit_bytes": limit,
        }))
    }

    pub fn report_not_found(report_id: &str) -> Self {
        Self::new(
            "report_not_found",
            &format!("Report id `{report_id}` was not found."),
            vec![
                "Run `creditsea report list` to find a valid report id.".to_string(),
                "Check that `--owner` matches the owner that uploaded the report.".to_string(),
            ],
        )
        .with_data(json!({
            "report_id": report_id,
        }))
    }

    pub fn internal_serialization(message: &str) -> Self {
        Self::new("internal_serialization_error", message, Vec::new())
    }

    pub fn store_init_permission_denied(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "store_init_permission_denied",
            &format!("Cannot initialize report store at `{location}`: {detail}"),
            vec![format!(
                "Grant write access to `{location}` or set `CREDITSEA_HOME` to a writable directory."
            )],
        )
    }

    pub fn store_locked(path: &Path) -> Self {
        let location = path.display().to_string();
        Self::new(
            "store_locked",
            &format!("Report store is locked at `{location}`."),
            vec![format!(
                "Close other processes using `{location}` so the lock is released."
            )],
        )
    }

    pub fn store_corrupt(path: &Path) -> Self {
        let location = path.display().to_string();
        Self::new(
            "store_corrupt",
            &format!("Report store appears corrupt at `{location}`."),
            vec![format!(
                "Move `{location}` aside so a fresh store can be created, or restore from backup."
            )],
        )
    }

    pub fn migration_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "migration_failed",
            &format!("Report store migration failed at `{location}`: {detail}"),
            vec!["Resolve conflicting schema objects referenced in the error details.".to_string()],
        )
    }

    pub fn store_init_failed(path: &Path, detail: &str) -> Self {
        let location = path.display().to_string();
        Self::new(
            "store_init_failed",
            &format!("Report store initialization failed at `{location}`: {detail}"),
            Vec::new(),
        )
    }
}

impl From<NormalizeError> for ClientError {
    fn from(error: NormalizeError) -> Self {
        match error {
            NormalizeError::MalformedInput(detail) => Self::malformed_input(&detail),
            NormalizeError::Normalization(detail) => Self::normalization_failed(&detail),
        }
    }
}

fn merge_report_help_data(mut data: Value) -> Value {
    if !data.is_object() {
        data = json!({});
    }

    if let Some(object) = data.as_object_mut() {
        object.insert(
            "help_command".to_string(),
            Value::String(REPORT_HELP_COMMAND.to_string()),
        );
        object.insert(
            "help_section_title".to_string(),
            Value::String(REPORT_HELP_SECTION_TITLE.to_string()),
        );
    }

    data
}

pub type ClientResult<T> = Result<T, ClientError>;
