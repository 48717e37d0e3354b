//! Candidate paths for every logical field, most specific first.

/// Root element names that hold the report body. Other roots are read from the
/// document wrapper directly.
pub const REPORT_ROOTS: [&str; 2] = ["CreditReport", "INProfileResponse"];

pub const APPLICANT_NAME: [&str; 3] = [
    "Applicant.0.Name.0",
    "Header.0.Applicant.0.Name.0",
    "Name.0",
];
pub const MOBILE_PHONE: [&str; 3] = [
    "Applicant.0.Telephone.0.Number.0",
    "Telephone.0",
    "Mobile.0",
];
pub const PAN: [&str; 2] = ["Applicant.0.Identifier.0.PAN.0", "PAN.0"];
pub const CREDIT_SCORE: [&str; 2] = ["Score.0.Value.0", "CreditScore.0"];

pub const ACCOUNTS: [&str; 2] = ["Accounts.0.Account", "Account"];
pub const ACCOUNT_TYPE: [&str; 2] = ["AccountType.0", "Type.0"];
pub const ACCOUNT_STATUS: [&str; 2] = ["Status.0", "AccountStatus.0"];
pub const CURRENT_BALANCE: [&str; 2] = ["CurrentBalance.0", "Balance.0"];
pub const AMOUNT_OVERDUE: [&str; 2] = ["AmountOverdue.0", "Overdue.0"];
pub const BANK: [&str; 2] = ["Institution.0", "Subscriber.0.Name.0"];
pub const ACCOUNT_NUMBER: [&str; 2] = ["AccountNumber.0", "Number.0"];
pub const ADDRESS: [&str; 2] = ["Address.0", "Subscriber.0.Address.0"];

pub const ENQUIRIES: [&str; 2] = ["Enquiries.0.Enquiry", "Enquiry"];
pub const ENQUIRY_DATE: [&str; 1] = ["Date.0"];

pub const NOT_AVAILABLE: &str = "N/A";
pub const UNKNOWN: &str = "Unknown";
