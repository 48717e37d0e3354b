pub mod accounts;
pub mod classify;
pub mod enquiries;
pub mod fields;
pub mod resolve;
pub mod tree;
pub mod types;

use chrono::{NaiveDate, Utc};
use thiserror::Error;
use tracing::debug;

use crate::report::resolve::{resolve_or, resolve_sequence, resolve_text};
use crate::report::tree::{Node, RawDocument};

pub use types::{AccountRecord, AggregateRecord, BasicDetails, ReportSummary};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NormalizeError {
    #[error("input is not well-formed XML: {0}")]
    MalformedInput(String),
    #[error("credit report could not be normalized: {0}")]
    Normalization(String),
}

/// Normalizes one credit report, evaluating the enquiry window against the
/// current UTC date.
pub fn normalize(bytes: &[u8]) -> Result<AggregateRecord, NormalizeError> {
    normalize_at(bytes, Utc::now().date_naive())
}

pub fn normalize_at(bytes: &[u8], today: NaiveDate) -> Result<AggregateRecord, NormalizeError> {
    let document = tree::parse_document(bytes)?;
    let report = report_scope(&document);

    let basic_details = read_basic_details(report);
    let tally = accounts::tally_accounts(resolve_sequence(report, &fields::ACCOUNTS));
    let mut report_summary = tally.summary;
    report_summary.last_7_days_enquiries =
        enquiries::count_recent(resolve_sequence(report, &fields::ENQUIRIES), today);

    ensure_finite_totals(&report_summary)?;

    debug!(
        root = document.root_name(),
        total_accounts = report_summary.total_accounts,
        active_accounts = report_summary.active_accounts,
        closed_accounts = report_summary.closed_accounts,
        addresses = tally.addresses.len(),
        recent_enquiries = report_summary.last_7_days_enquiries,
        "normalized credit report"
    );

    Ok(AggregateRecord {
        basic_details,
        report_summary,
        credit_accounts: tally.accounts,
        addresses: tally.addresses,
    })
}

fn report_scope(document: &RawDocument) -> &Node {
    let wrapper = document.as_node();
    fields::REPORT_ROOTS
        .iter()
        .find_map(|name| wrapper.child(name).and_then(<[Node]>::first))
        .unwrap_or(wrapper)
}

fn read_basic_details(report: &Node) -> BasicDetails {
    BasicDetails {
        name: resolve_or(report, &fields::APPLICANT_NAME, fields::NOT_AVAILABLE),
        mobile_phone: resolve_or(report, &fields::MOBILE_PHONE, fields::NOT_AVAILABLE),
        pan: resolve_or(report, &fields::PAN, fields::NOT_AVAILABLE),
        credit_score: accounts::parse_score(
            resolve_text(report, &fields::CREDIT_SCORE).as_deref(),
        ),
    }
}

fn ensure_finite_totals(summary: &ReportSummary) -> Result<(), NormalizeError> {
    let totals = [
        ("currentBalanceAmount", summary.current_balance_amount),
        ("securedAccountsAmount", summary.secured_accounts_amount),
        ("unsecuredAccountsAmount", summary.unsecured_accounts_amount),
    ];
    for (name, value) in totals {
        if !value.is_finite() {
            return Err(NormalizeError::Normalization(format!(
                "{name} overflowed while summing account balances"
            )));
        }
    }
    Ok(())
}
