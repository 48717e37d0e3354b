use std::collections::BTreeSet;

use tracing::trace;

use crate::report::classify::{Collateral, StatusClass, classify_collateral, classify_status};
use crate::report::fields;
use crate::report::resolve::{resolve_or, resolve_text};
use crate::report::tree::Node;
use crate::report::types::{AccountRecord, ReportSummary};

/// Running state of the single pass over the account list.
#[derive(Debug, Clone, Default)]
pub(crate) struct AccountTally {
    pub(crate) accounts: Vec<AccountRecord>,
    pub(crate) addresses: BTreeSet<String>,
    pub(crate) summary: ReportSummary,
}

impl AccountTally {
    fn record(&mut self, account: AccountRecord, address: Option<String>) {
        let summary = &mut self.summary;
        summary.total_accounts += 1;

        match classify_status(&account.status) {
            StatusClass::Active => summary.active_accounts += 1,
            StatusClass::Closed => summary.closed_accounts += 1,
            StatusClass::Other => {}
        }

        let collateral = classify_collateral(&account.account_type);
        match collateral {
            Collateral::Secured => summary.secured_accounts_amount += account.current_balance,
            Collateral::Unsecured => summary.unsecured_accounts_amount += account.current_balance,
        }
        summary.current_balance_amount += account.current_balance;

        trace!(
            account_type = %account.account_type,
            status = classify_status(&account.status).as_str(),
            collateral = collateral.as_str(),
            balance = account.current_balance,
            "classified account"
        );

        if let Some(value) = address {
            self.addresses.insert(value);
        }
        self.accounts.push(account);
    }
}

pub(crate) fn tally_accounts(entries: &[Node]) -> AccountTally {
    let mut tally = AccountTally::default();
    for entry in entries {
        let (account, address) = read_account(entry);
        tally.record(account, address);
    }
    tally
}

fn read_account(entry: &Node) -> (AccountRecord, Option<String>) {
    let address = resolve_text(entry, &fields::ADDRESS);
    let account = AccountRecord {
        account_type: resolve_or(entry, &fields::ACCOUNT_TYPE, fields::UNKNOWN),
        bank: resolve_or(entry, &fields::BANK, fields::NOT_AVAILABLE),
        account_number: resolve_or(entry, &fields::ACCOUNT_NUMBER, fields::NOT_AVAILABLE),
        current_balance: parse_amount(resolve_text(entry, &fields::CURRENT_BALANCE).as_deref()),
        amount_overdue: parse_amount(resolve_text(entry, &fields::AMOUNT_OVERDUE).as_deref()),
        address: address
            .clone()
            .unwrap_or_else(|| fields::NOT_AVAILABLE.to_string()),
        status: resolve_or(entry, &fields::ACCOUNT_STATUS, fields::UNKNOWN),
    };
    (account, address)
}

/// Parses a decimal amount, ignoring `,` group separators. Absent, malformed,
/// negative and non-finite values all become `0`.
pub fn parse_amount(raw: Option<&str>) -> f64 {
    let Some(value) = raw else {
        return 0.0;
    };
    let cleaned = value.trim().replace(',', "");
    match cleaned.parse::<f64>() {
        Ok(amount) if amount.is_finite() && amount >= 0.0 => amount,
        _ => 0.0,
    }
}

/// Parses a whole score the way a leading-digits integer parse would:
/// `"750"` and `"750.4"` give 750, anything without leading digits gives 0.
pub fn parse_score(raw: Option<&str>) -> u32 {
    let Some(value) = raw else {
        return 0;
    };
    let trimmed = value.trim();
    let unsigned = trimmed.strip_prefix('+').unwrap_or(trimmed);
    let digits = unsigned
        .chars()
        .take_while(char::is_ascii_digit)
        .collect::<String>();
    digits.parse::<u32>().unwrap_or(0)
}
