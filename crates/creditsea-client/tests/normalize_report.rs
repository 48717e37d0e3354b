use chrono::{Duration, NaiveDate, Utc};
use creditsea_client::{AggregateRecord, NormalizeError, normalize, normalize_at};

fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 3, 10).unwrap_or_default()
}

fn normalize_fixed(xml: &str) -> Option<AggregateRecord> {
    let result = normalize_at(xml.as_bytes(), fixed_today());
    assert!(result.is_ok(), "unexpected error: {result:?}");
    result.ok()
}

fn account(kind: &str, status: &str, balance: &str, address: Option<&str>) -> String {
    let address_tag = address
        .map(|value| format!("<Address>{value}</Address>"))
        .unwrap_or_default();
    format!(
        "<Account><AccountType>{kind}</AccountType><Status>{status}</Status>\
         <CurrentBalance>{balance}</CurrentBalance><AmountOverdue>0</AmountOverdue>\
         <Institution>Bank</Institution><AccountNumber>XX1</AccountNumber>{address_tag}</Account>"
    )
}

fn report_with_accounts(accounts: &[String]) -> String {
    format!(
        "<CreditReport><Accounts>{}</Accounts></CreditReport>",
        accounts.concat()
    )
}

#[test]
fn single_active_credit_card_is_unsecured() {
    let xml = report_with_accounts(&[account("Credit Card", "Active", "50000", None)]);
    let record = normalize_fixed(&xml);
    assert!(record.is_some());
    if let Some(value) = record {
        let summary = value.report_summary;
        assert_eq!(summary.total_accounts, 1);
        assert_eq!(summary.active_accounts, 1);
        assert_eq!(summary.closed_accounts, 0);
        assert_eq!(summary.current_balance_amount, 50000.0);
        assert_eq!(summary.unsecured_accounts_amount, 50000.0);
        assert_eq!(summary.secured_accounts_amount, 0.0);
    }
}

#[test]
fn secured_and_unsecured_balances_are_bucketed() {
    let xml = report_with_accounts(&[
        account("Auto Loan", "Active", "50000", None),
        account("Credit Card", "Active", "25000", None),
    ]);
    let record = normalize_fixed(&xml);
    assert!(record.is_some());
    if let Some(value) = record {
        let summary = value.report_summary;
        assert_eq!(summary.secured_accounts_amount, 50000.0);
        assert_eq!(summary.unsecured_accounts_amount, 25000.0);
        assert_eq!(summary.current_balance_amount, 75000.0);
    }
}

#[test]
fn empty_report_yields_zeroed_record() {
    let record = normalize_fixed("<CreditReport></CreditReport>");
    assert!(record.is_some());
    if let Some(value) = record {
        assert!(value.credit_accounts.is_empty());
        assert!(value.addresses.is_empty());
        assert_eq!(value.basic_details.name, "N/A");
        assert_eq!(value.basic_details.mobile_phone, "N/A");
        assert_eq!(value.basic_details.pan, "N/A");
        assert_eq!(value.basic_details.credit_score, 0);
        let summary = value.report_summary;
        assert_eq!(summary.total_accounts, 0);
        assert_eq!(summary.active_accounts, 0);
        assert_eq!(summary.closed_accounts, 0);
        assert_eq!(summary.current_balance_amount, 0.0);
        assert_eq!(summary.secured_accounts_amount, 0.0);
        assert_eq!(summary.unsecured_accounts_amount, 0.0);
        assert_eq!(summary.last_7_days_enquiries, 0);
    }
}

#[test]
fn totals_and_buckets_cover_every_account() {
    let xml = report_with_accounts(&[
        account("Home Loan", "Closed", "1200.50", None),
        account("Personal Loan", "Written Off", "300", None),
        account("Mortgage", "11", "10,000", None),
        account("Credit Card", "ACTIVE", "abc", None),
    ]);
    let record = normalize_fixed(&xml);
    assert!(record.is_some());
    if let Some(value) = record {
        let summary = &value.report_summary;
        assert_eq!(summary.total_accounts, value.credit_accounts.len() as i64);
        assert_eq!(summary.total_accounts, 4);

        let balance_sum: f64 = value
            .credit_accounts
            .iter()
            .map(|entry| entry.current_balance)
            .sum();
        assert!((summary.current_balance_amount - balance_sum).abs() < 1e-9);
        assert!(
            (summary.secured_accounts_amount + summary.unsecured_accounts_amount
                - summary.current_balance_amount)
                .abs()
                < 1e-9
        );

        assert_eq!(summary.active_accounts, 2);
        assert_eq!(summary.closed_accounts, 1);
        assert!(summary.active_accounts + summary.closed_accounts <= summary.total_accounts);

        assert_eq!(value.credit_accounts[2].current_balance, 10000.0);
        assert_eq!(value.credit_accounts[3].current_balance, 0.0);
        assert_eq!(summary.secured_accounts_amount, 11200.5);
    }
}

#[test]
fn addresses_are_deduplicated() {
    let xml = report_with_accounts(&[
        account("Credit Card", "Active", "1", Some("12 MG Road, Pune")),
        account("Auto Loan", "Active", "1", Some("12 MG Road, Pune")),
        account("Home Loan", "Active", "1", Some("4 Park Street, Kolkata")),
        account("Gold Loan", "Active", "1", None),
    ]);
    let record = normalize_fixed(&xml);
    assert!(record.is_some());
    if let Some(value) = record {
        assert_eq!(value.addresses.len(), 2);
        assert!(value.addresses.contains("12 MG Road, Pune"));
        assert!(value.addresses.contains("4 Park Street, Kolkata"));
        assert_eq!(value.credit_accounts[3].address, "N/A");
    }
}

#[test]
fn comments_and_cdata_inside_fields_keep_surrounding_spaces() {
    let xml = "<CreditReport><Applicant><Name>John <!-- middle --> Doe</Name></Applicant>\
        <Accounts>\
        <Account><Status>Active</Status><Address>12 MG Road<![CDATA[ , ]]>Pune</Address></Account>\
        <Account><Status>Active</Status><Address>12 MG Road , Pune</Address></Account>\
        </Accounts></CreditReport>";
    let record = normalize_fixed(xml);
    assert!(record.is_some());
    if let Some(value) = record {
        assert_eq!(value.basic_details.name, "John  Doe");
        assert_eq!(value.addresses.len(), 1);
        assert!(value.addresses.contains("12 MG Road , Pune"));
    }
}

#[test]
fn sparse_accounts_fall_back_to_placeholders() {
    let record = normalize_fixed("<CreditReport><Accounts><Account/></Accounts></CreditReport>");
    assert!(record.is_some());
    if let Some(value) = record {
        assert_eq!(value.credit_accounts.len(), 1);
        let entry = &value.credit_accounts[0];
        assert_eq!(entry.account_type, "Unknown");
        assert_eq!(entry.status, "Unknown");
        assert_eq!(entry.bank, "N/A");
        assert_eq!(entry.account_number, "N/A");
        assert_eq!(entry.address, "N/A");
        assert_eq!(entry.current_balance, 0.0);
        assert_eq!(entry.amount_overdue, 0.0);
        assert_eq!(value.report_summary.total_accounts, 1);
        assert_eq!(value.report_summary.active_accounts, 0);
        assert_eq!(value.report_summary.closed_accounts, 0);
    }
}

#[test]
fn unparsable_score_defaults_to_zero() {
    let record = normalize_fixed(
        "<CreditReport><Score><Value>not-a-score</Value></Score></CreditReport>",
    );
    assert!(record.is_some());
    if let Some(value) = record {
        assert_eq!(value.basic_details.credit_score, 0);
    }
}

#[test]
fn enquiries_are_counted_inside_the_recency_window() {
    let xml = "<CreditReport><Enquiries>\
               <Enquiry><Date>2026-03-10</Date></Enquiry>\
               <Enquiry><Date>2026-03-07</Date></Enquiry>\
               <Enquiry><Date>2026-02-28</Date></Enquiry>\
               <Enquiry><Date>garbage</Date></Enquiry>\
               <Enquiry/>\
               </Enquiries></CreditReport>";
    let record = normalize_fixed(xml);
    assert!(record.is_some());
    if let Some(value) = record {
        assert_eq!(value.report_summary.last_7_days_enquiries, 2);
    }
}

#[test]
fn recency_window_tracks_the_current_date() {
    let today = Utc::now().date_naive();
    let dates = [today, today - Duration::days(3), today - Duration::days(10)];
    let enquiries: String = dates
        .iter()
        .map(|date| format!("<Enquiry><Date>{}</Date></Enquiry>", date.format("%Y-%m-%d")))
        .collect();
    let xml = format!("<CreditReport><Enquiries>{enquiries}</Enquiries></CreditReport>");

    let record = normalize(xml.as_bytes());
    assert!(record.is_ok());
    if let Ok(value) = record {
        assert_eq!(value.report_summary.last_7_days_enquiries, 2);
    }
}

#[test]
fn non_xml_input_is_malformed() {
    let result = normalize(b"This is not valid XML content at all");
    assert!(matches!(result, Err(NormalizeError::MalformedInput(_))));

    let truncated = normalize(b"<CreditReport><Accounts>");
    assert!(matches!(truncated, Err(NormalizeError::MalformedInput(_))));
}

#[test]
fn serialized_record_uses_contract_field_names() {
    let xml = report_with_accounts(&[account("Credit Card", "Active", "10", Some("Addr"))]);
    let record = normalize_fixed(&xml);
    assert!(record.is_some());
    if let Some(value) = record {
        let json = serde_json::to_value(&value);
        assert!(json.is_ok());
        if let Ok(body) = json {
            assert!(body.pointer("/basicDetails/mobilePhone").is_some());
            assert!(body.pointer("/basicDetails/creditScore").is_some());
            assert!(body.pointer("/reportSummary/last7DaysEnquiries").is_some());
            assert!(body.pointer("/reportSummary/securedAccountsAmount").is_some());
            assert_eq!(
                body.pointer("/creditAccounts/0/type").and_then(|v| v.as_str()),
                Some("Credit Card")
            );
            assert_eq!(
                body.pointer("/addresses/0").and_then(|v| v.as_str()),
                Some("Addr")
            );
        }
    }
}
