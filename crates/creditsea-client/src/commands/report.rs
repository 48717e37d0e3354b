use std::path::{Path, PathBuf};

use crate::contracts::envelope::{SuccessEnvelope, success};
use crate::contracts::types::{ReportCreateData, ReportDeleteData, ReportListData, ReportShowData};
use crate::ingest::{self, persist};
use crate::setup::{SetupContext, ensure_initialized, ensure_initialized_at};
use crate::state::open_connection;
use crate::{ClientError, ClientResult};

pub const DEFAULT_OWNER: &str = "local";

#[derive(Debug, Default)]
pub struct ReportCreateOptions<'a> {
    pub path: Option<String>,
    pub dry_run: bool,
    pub owner: Option<String>,
    pub home_override: Option<&'a Path>,
    pub stdin_override: Option<Vec<u8>>,
}

#[derive(Debug, Default)]
pub struct ReportListOptions<'a> {
    pub owner: Option<String>,
    pub home_override: Option<&'a Path>,
}

#[derive(Debug, Default)]
pub struct ReportLookupOptions<'a> {
    pub owner: Option<String>,
    pub home_override: Option<&'a Path>,
}

pub fn run(
    path: Option<String>,
    dry_run: bool,
    owner: Option<String>,
) -> ClientResult<SuccessEnvelope> {
    run_with_options(ReportCreateOptions {
        path,
        dry_run,
        owner,
        home_override: None,
        stdin_override: None,
    })
}

#[doc(hidden)]
pub fn run_with_options(options: ReportCreateOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let owner_id = resolve_owner(options.owner)?;
    let prepared = ingest::prepare(options.path.clone(), options.stdin_override)?;
    let execution = if options.dry_run {
        prepared.into_dry_run()
    } else {
        let setup = load_setup(options.home_override)?;
        ingest::store(&setup, &owner_id, prepared)?
    };

    let message = if execution.dry_run {
        "Report normalized. Nothing was stored.".to_string()
    } else {
        "Report normalized and stored.".to_string()
    };

    let data = ReportCreateData {
        dry_run: execution.dry_run,
        path: options.path,
        report_id: execution.report_id,
        uploaded_at: execution.uploaded_at,
        owner_id,
        file_name: execution.file_name,
        source_kind: execution.source_kind.to_string(),
        message,
        record: execution.record,
    };

    success("report create", data)
}

pub fn list(owner: Option<String>) -> ClientResult<SuccessEnvelope> {
    list_with_options(ReportListOptions {
        owner,
        home_override: None,
    })
}

#[doc(hidden)]
pub fn list_with_options(options: ReportListOptions<'_>) -> ClientResult<SuccessEnvelope> {
    let owner_id = resolve_owner(options.owner)?;
    let setup = load_setup(options.home_override)?;
    let db_path = PathBuf::from(&setup.db_path);
    let connection = open_connection(&db_path)?;
    let rows = persist::list_reports(&connection, &db_path, &owner_id)?;

    success("report list", ReportListData { owner_id, rows })
}

pub fn show(report_id: &str, owner: Option<String>) -> ClientResult<SuccessEnvelope> {
    show_with_options(
        report_id,
        ReportLookupOptions {
            owner,
            home_override: None,
        },
    )
}

#[doc(hidden)]
pub fn show_with_options(
    report_id: &str,
    options: ReportLookupOptions<'_>,
) -> ClientResult<SuccessEnvelope> {
    let owner_id = resolve_owner(options.owner)?;
    let report_id = normalize_report_id(report_id, "report show")?;
    let setup = load_setup(options.home_override)?;
    let db_path = PathBuf::from(&setup.db_path);
    let connection = open_connection(&db_path)?;
    let stored = persist::fetch_report(&connection, &db_path, &owner_id, &report_id)?;

    success(
        "report show",
        ReportShowData {
            report_id: stored.report_id,
            owner_id,
            file_name: stored.file_name,
            source_kind: stored.source_kind,
            uploaded_at: stored.created_at,
            record: stored.record,
        },
    )
}

pub fn delete(report_id: &str, owner: Option<String>) -> ClientResult<SuccessEnvelope> {
    delete_with_options(
        report_id,
        ReportLookupOptions {
            owner,
            home_override: None,
        },
    )
}

#[doc(hidden)]
pub fn delete_with_options(
    report_id: &str,
    options: ReportLookupOptions<'_>,
) -> ClientResult<SuccessEnvelope> {
    let owner_id = resolve_owner(options.owner)?;
    let report_id = normalize_report_id(report_id, "report delete")?;
    let setup = load_setup(options.home_override)?;
    let db_path = PathBuf::from(&setup.db_path);
    let mut connection = open_connection(&db_path)?;
    persist::delete_report(&mut connection, &db_path, &owner_id, &report_id)?;

    success(
        "report delete",
        ReportDeleteData {
            message: format!("Report `{report_id}` was deleted."),
            report_id,
            owner_id,
            deleted: true,
        },
    )
}

fn resolve_owner(owner: Option<String>) -> ClientResult<String> {
    let Some(raw) = owner else {
        return Ok(DEFAULT_OWNER.to_string());
    };
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ClientError::invalid_argument_with_recovery(
            "Owner id cannot be blank.",
            vec![
                "Pass a non-empty `--owner <id>`, or unset `CREDITSEA_OWNER` to use `local`."
                    .to_string(),
            ],
        ));
    }
    Ok(trimmed.to_string())
}

fn normalize_report_id(report_id: &str, command: &str) -> ClientResult<String> {
    let trimmed = report_id.trim();
    if trimmed.is_empty() {
        return Err(ClientError::invalid_argument_for_command(
            "Report id cannot be blank.",
            Some(command),
        ));
    }
    Ok(trimmed.to_string())
}

fn load_setup(home_override: Option<&Path>) -> ClientResult<SetupContext> {
    if let Some(path) = home_override {
        return ensure_initialized_at(path);
    }
    ensure_initialized()
}
