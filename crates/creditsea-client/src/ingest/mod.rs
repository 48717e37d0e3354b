pub(crate) mod input;
pub(crate) mod persist;

use std::path::PathBuf;

use tracing::debug;

use crate::ClientResult;
use crate::report::{self, AggregateRecord};
use crate::setup::SetupContext;
use crate::state::open_connection;

#[derive(Debug, Clone)]
pub(crate) struct ReportExecutionResult {
    pub dry_run: bool,
    pub report_id: Option<String>,
    pub uploaded_at: Option<String>,
    pub file_name: Option<String>,
    pub source_kind: &'static str,
    pub record: AggregateRecord,
}

pub(crate) struct PreparedReport {
    file_name: Option<String>,
    source_kind: &'static str,
    record: AggregateRecord,
}

impl PreparedReport {
    /// Finishes a dry run. Nothing touches the store.
    pub(crate) fn into_dry_run(self) -> ReportExecutionResult {
        ReportExecutionResult {
            dry_run: true,
            report_id: None,
            uploaded_at: None,
            file_name: self.file_name,
            source_kind: self.source_kind,
            record: self.record,
        }
    }
}

/// Reads and normalizes the source without opening the store.
pub(crate) fn prepare(
    path: Option<String>,
    stdin_override: Option<Vec<u8>>,
) -> ClientResult<PreparedReport> {
    let resolved_source = input::resolve_source(path, stdin_override)?;
    debug!(
        source_kind = resolved_source.source_kind.as_str(),
        bytes = resolved_source.content.len(),
        "read credit report source"
    );

    let record = report::normalize(&resolved_source.content)?;
    Ok(PreparedReport {
        file_name: resolved_source.file_name,
        source_kind: resolved_source.source_kind.as_str(),
        record,
    })
}

pub(crate) fn store(
    setup: &SetupContext,
    owner_id: &str,
    prepared: PreparedReport,
) -> ClientResult<ReportExecutionResult> {
    let db_path = PathBuf::from(&setup.db_path);
    let mut connection = open_connection(&db_path)?;
    let persisted = persist::persist_report(
        &mut connection,
        &db_path,
        persist::PersistInput {
            owner_id,
            file_name: prepared.file_name.as_deref(),
            source_kind: prepared.source_kind,
            record: &prepared.record,
        },
    )?;

    Ok(ReportExecutionResult {
        dry_run: false,
        report_id: Some(persisted.report_id),
        uploaded_at: Some(persisted.created_at),
        file_name: prepared.file_name,
        source_kind: prepared.source_kind,
        record: prepared.record,
    })
}
