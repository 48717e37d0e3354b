use serde::Serialize;

use crate::report::AggregateRecord;

#[derive(Debug, Clone, Serialize)]
pub struct ReportCreateData {
    pub dry_run: bool,
    pub path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<String>,
    pub owner_id: String,
    pub file_name: Option<String>,
    pub source_kind: String,
    pub message: String,
    pub record: AggregateRecord,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportListItem {
    pub report_id: String,
    pub name: String,
    pub credit_score: u32,
    pub file_name: Option<String>,
    pub uploaded_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportListData {
    pub owner_id: String,
    pub rows: Vec<ReportListItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportShowData {
    pub report_id: String,
    pub owner_id: String,
    pub file_name: Option<String>,
    pub source_kind: String,
    pub uploaded_at: String,
    pub record: AggregateRecord,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportDeleteData {
    pub report_id: String,
    pub owner_id: String,
    pub deleted: bool,
    pub message: String,
}
