use std::path::Path;

use chrono::{SecondsFormat, Utc};
use rusqlite::{Connection, OptionalExtension, TransactionBehavior, params};
use tracing::info;
use ulid::Ulid;

use crate::contracts::types::ReportListItem;
use crate::report::AggregateRecord;
use crate::state::map_sqlite_error;
use crate::{ClientError, ClientResult};

#[derive(Debug, Clone)]
pub(crate) struct PersistResult {
    pub(crate) report_id: String,
    pub(crate) created_at: String,
}

pub(crate) struct PersistInput<'a> {
    pub(crate) owner_id: &'a str,
    pub(crate) file_name: Option<&'a str>,
    pub(crate) source_kind: &'a str,
    pub(crate) record: &'a AggregateRecord,
}

#[derive(Debug, Clone)]
pub(crate) struct StoredReport {
    pub(crate) report_id: String,
    pub(crate) file_name: Option<String>,
    pub(crate) source_kind: String,
    pub(crate) created_at: String,
    pub(crate) record: AggregateRecord,
}

pub(crate) fn persist_report(
    connection: &mut Connection,
    db_path: &Path,
    input: PersistInput<'_>,
) -> ClientResult<PersistResult> {
    let report_id = format!("rpt_{}", Ulid::new());
    let created_at = now_timestamp();
    let record_json = serde_json::to_string(input.record)
        .map_err(|error| ClientError::internal_serialization(&error.to_string()))?;

    let transaction = connection
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    transaction
        .execute(
            "INSERT INTO internal_reports (
                report_id,
                owner_id,
                file_name,
                source_kind,
                created_at,
                applicant_name,
                credit_score,
                record_json
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                &report_id,
                input.owner_id,
                input.file_name,
                input.source_kind,
                &created_at,
                &input.record.basic_details.name,
                input.record.basic_details.credit_score,
                &record_json
            ],
        )
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    transaction
        .commit()
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    info!(
        report_id = %report_id,
        owner_id = input.owner_id,
        accounts = input.record.report_summary.total_accounts,
        "stored credit report"
    );

    Ok(PersistResult {
        report_id,
        created_at,
    })
}

pub(crate) fn list_reports(
    connection: &Connection,
    db_path: &Path,
    owner_id: &str,
) -> ClientResult<Vec<ReportListItem>> {
    let mut statement = connection
        .prepare(
            "SELECT
                report_id,
                applicant_name,
                credit_score,
                file_name,
                created_at
             FROM internal_reports
             WHERE owner_id = ?1
             ORDER BY created_at DESC, report_id DESC",
        )
        .map_err(|error| map_sqlite_error(db_path, &error))?;
    let rows_iter = statement
        .query_map(params![owner_id], |row| {
            Ok(ReportListItem {
                report_id: row.get(0)?,
                name: row.get(1)?,
                credit_score: row.get(2)?,
                file_name: row.get::<_, Option<String>>(3)?,
                uploaded_at: row.get(4)?,
            })
        })
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let mut rows = Vec::new();
    for row in rows_iter {
        rows.push(row.map_err(|error| map_sqlite_error(db_path, &error))?);
    }
    Ok(rows)
}

pub(crate) fn fetch_report(
    connection: &Connection,
    db_path: &Path,
    owner_id: &str,
    report_id: &str,
) -> ClientResult<StoredReport> {
    let row = connection
        .query_row(
            "SELECT report_id, file_name, source_kind, created_at, record_json
             FROM internal_reports
             WHERE report_id = ?1 AND owner_id = ?2
             LIMIT 1",
            params![report_id, owner_id],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, Option<String>>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, String>(4)?,
                ))
            },
        )
        .optional()
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let Some((report_id, file_name, source_kind, created_at, record_json)) = row else {
        return Err(ClientError::report_not_found(report_id));
    };

    let record = serde_json::from_str::<AggregateRecord>(&record_json)
        .map_err(|_| ClientError::store_corrupt(db_path))?;

    Ok(StoredReport {
        report_id,
        file_name,
        source_kind,
        created_at,
        record,
    })
}

pub(crate) fn delete_report(
    connection: &mut Connection,
    db_path: &Path,
    owner_id: &str,
    report_id: &str,
) -> ClientResult<()> {
    let transaction = connection
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    let deleted = transaction
        .execute(
            "DELETE FROM internal_reports WHERE report_id = ?1 AND owner_id = ?2",
            params![report_id, owner_id],
        )
        .map_err(|error| map_sqlite_error(db_path, &error))?;
    if deleted == 0 {
        return Err(ClientError::report_not_found(report_id));
    }

    transaction
        .commit()
        .map_err(|error| map_sqlite_error(db_path, &error))?;

    info!(report_id, owner_id, "deleted credit report");
    Ok(())
}

// Millisecond RFC 3339 in UTC so lexical order matches upload order.
pub(crate) fn now_timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}
