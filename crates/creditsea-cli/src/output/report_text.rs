use std::io;

use chrono::{DateTime, Local};
use serde_json::{Map, Value};

use super::format::{self, Column};

pub fn render_report_create(data: &Value) -> io::Result<String> {
    let record = require_object(data, "record", "report create")?;
    let dry_run = data.get("dry_run").and_then(Value::as_bool).unwrap_or(false);

    let mut lines = Vec::new();
    if dry_run {
        lines.push("Dry run complete. Nothing was stored.".to_string());
    } else {
        lines.push("Report stored.".to_string());
        lines.push(String::new());
        lines.extend(format::key_value_rows(
            &[
                ("Report ID:", string_field(data, "report_id", "unknown")),
                ("Owner:", string_field(data, "owner_id", "unknown")),
                ("Uploaded:", format_uploaded_local(data)),
            ],
            2,
        ));
    }

    lines.push(String::new());
    lines.extend(render_record(record));

    lines.push(String::new());
    lines.push("What to do next:".to_string());
    if dry_run {
        let path = data
            .get("path")
            .and_then(Value::as_str)
            .unwrap_or("<path>");
        lines.push(format!("  1. Run `creditsea report create {path}` to store this report."));
    } else {
        lines.push("  1. Run `creditsea report list` to see all stored reports.".to_string());
    }

    Ok(lines.join("\n"))
}

pub fn render_report_list(data: &Value) -> io::Result<String> {
    let rows = data
        .get("rows")
        .and_then(Value::as_array)
        .ok_or_else(|| io::Error::other("report list output requires rows"))?;

    if rows.is_empty() {
        return Ok([
            "No reports found yet.",
            "",
            "Upload your first report:",
            "  1. creditsea report create --help",
            "  2. creditsea report create --dry-run <path>",
            "  3. creditsea report create <path>",
        ]
        .join("\n"));
    }

    let count_label = if rows.len() == 1 {
        "1 report found.".to_string()
    } else {
        format!("{} reports found.", rows.len())
    };

    let columns = [
        Column::left("Report ID"),
        Column::left("Name"),
        Column::right("Score"),
        Column::left("File"),
        Column::left("Uploaded (local)"),
    ];
    let table_rows = rows
        .iter()
        .map(|row| {
            vec![
                string_field(row, "report_id", "unknown"),
                string_field(row, "name", "N/A"),
                row.get("credit_score")
                    .and_then(Value::as_u64)
                    .unwrap_or(0)
                    .to_string(),
                string_field(row, "file_name", "(stdin)"),
                format_local_timestamp(row.get("uploaded_at")),
            ]
        })
        .collect::<Vec<Vec<String>>>();

    let mut lines = vec![count_label, String::new()];
    lines.extend(format::render_table_or_blocks(
        &columns,
        &table_rows,
        format::terminal_width(),
        "Report",
    ));
    Ok(lines.join("\n"))
}

pub fn render_report_show(data: &Value) -> io::Result<String> {
    let record = require_object(data, "record", "report show")?;

    let mut lines = vec![format!(
        "Report {}",
        string_field(data, "report_id", "unknown")
    )];
    lines.push(String::new());
    lines.extend(format::key_value_rows(
        &[
            ("File:", string_field(data, "file_name", "(stdin)")),
            ("Owner:", string_field(data, "owner_id", "unknown")),
            ("Uploaded:", format_uploaded_local(data)),
        ],
        2,
    ));
    lines.push(String::new());
    lines.extend(render_record(record));
    Ok(lines.join("\n"))
}

pub fn render_report_delete(data: &Value) -> io::Result<String> {
    let message = data
        .get("message")
        .and_then(Value::as_str)
        .ok_or_else(|| io::Error::other("report delete output requires message"))?;
    Ok(message.to_string())
}

fn render_record(record: &Map<String, Value>) -> Vec<String> {
    let empty = Map::new();
    let details = record
        .get("basicDetails")
        .and_then(Value::as_object)
        .unwrap_or(&empty);
    let summary = record
        .get("reportSummary")
        .and_then(Value::as_object)
        .unwrap_or(&empty);

    let mut lines = vec!["Basic details:".to_string()];
    lines.extend(format::key_value_rows(
        &[
            ("Name:", map_string(details, "name")),
            ("Mobile phone:", map_string(details, "mobilePhone")),
            ("PAN:", map_string(details, "pan")),
            ("Credit score:", map_count(details, "creditScore")),
        ],
        2,
    ));

    lines.push(String::new());
    lines.push("Report summary:".to_string());
    lines.extend(format::key_value_rows(
        &[
            ("Total accounts:", map_count(summary, "totalAccounts")),
            ("Active accounts:", map_count(summary, "activeAccounts")),
            ("Closed accounts:", map_count(summary, "closedAccounts")),
            ("Current balance:", map_amount(summary, "currentBalanceAmount")),
            ("Secured amount:", map_amount(summary, "securedAccountsAmount")),
            ("Unsecured amount:", map_amount(summary, "unsecuredAccountsAmount")),
            ("Enquiries (7 days):", map_count(summary, "last7DaysEnquiries")),
        ],
        2,
    ));

    let accounts = record
        .get("creditAccounts")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    lines.push(String::new());
    if accounts.is_empty() {
        lines.push("Credit accounts: none".to_string());
    } else {
        lines.push("Credit accounts:".to_string());
        lines.extend(render_accounts_table(&accounts));
    }

    let addresses = record
        .get("addresses")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();
    lines.push(String::new());
    if addresses.is_empty() {
        lines.push("Addresses: none".to_string());
    } else {
        lines.push("Addresses:".to_string());
        for address in addresses.iter().filter_map(Value::as_str) {
            lines.push(format!("  - {address}"));
        }
    }

    lines
}

fn render_accounts_table(accounts: &[Value]) -> Vec<String> {
    let columns = [
        Column::left("Type"),
        Column::left("Bank"),
        Column::left("Account No."),
        Column::left("Status"),
        Column::right("Balance"),
        Column::right("Overdue"),
    ];
    let rows = accounts
        .iter()
        .map(|account| {
            vec![
                string_field(account, "type", "Unknown"),
                string_field(account, "bank", "N/A"),
                string_field(account, "accountNumber", "N/A"),
                string_field(account, "status", "Unknown"),
                format::format_amount(
                    account
                        .get("currentBalance")
                        .and_then(Value::as_f64)
                        .unwrap_or(0.0),
                ),
                format::format_amount(
                    account
                        .get("amountOverdue")
                        .and_then(Value::as_f64)
                        .unwrap_or(0.0),
                ),
            ]
        })
        .collect::<Vec<Vec<String>>>();

    format::render_table_or_blocks(&columns, &rows, format::terminal_width(), "Account")
}

fn require_object<'a>(
    data: &'a Value,
    key: &str,
    command: &str,
) -> io::Result<&'a Map<String, Value>> {
    data.get(key)
        .and_then(Value::as_object)
        .ok_or_else(|| io::Error::other(format!("{command} output requires {key}")))
}

fn string_field(value: &Value, key: &str, fallback: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or(fallback)
        .to_string()
}

fn map_string(map: &Map<String, Value>, key: &str) -> String {
    map.get(key)
        .and_then(Value::as_str)
        .unwrap_or("N/A")
        .to_string()
}

fn map_count(map: &Map<String, Value>, key: &str) -> String {
    map.get(key)
        .and_then(Value::as_i64)
        .unwrap_or(0)
        .to_string()
}

fn map_amount(map: &Map<String, Value>, key: &str) -> String {
    format::format_amount(map.get(key).and_then(Value::as_f64).unwrap_or(0.0))
}

fn format_uploaded_local(data: &Value) -> String {
    format_local_timestamp(data.get("uploaded_at"))
}

fn format_local_timestamp(raw: Option<&Value>) -> String {
    let Some(text) = raw.and_then(Value::as_str) else {
        return "unknown".to_string();
    };
    match DateTime::parse_from_rfc3339(text) {
        Ok(parsed) => parsed
            .with_timezone(&Local)
            .format("%Y-%m-%d %H:%M:%S %:z")
            .to_string(),
        Err(_) => text.to_string(),
    }
}
