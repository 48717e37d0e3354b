use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasicDetails {
    pub name: String,
    pub mobile_phone: String,
    pub pan: String,
    pub credit_score: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountRecord {
    #[serde(rename = "type")]
    pub account_type: String,
    pub bank: String,
    pub account_number: String,
    pub current_balance: f64,
    pub amount_overdue: f64,
    pub address: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSummary {
    pub total_accounts: i64,
    pub active_accounts: i64,
    pub closed_accounts: i64,
    pub current_balance_amount: f64,
    pub secured_accounts_amount: f64,
    pub unsecured_accounts_amount: f64,
    #[serde(rename = "last7DaysEnquiries")]
    pub last_7_days_enquiries: i64,
}

/// The normalized form of one credit report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateRecord {
    pub basic_details: BasicDetails,
    pub report_summary: ReportSummary,
    pub credit_accounts: Vec<AccountRecord>,
    pub addresses: BTreeSet<String>,
}
