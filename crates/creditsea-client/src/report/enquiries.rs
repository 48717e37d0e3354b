use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};
use tracing::trace;

use crate::report::fields;
use crate::report::resolve::resolve_text;
use crate::report::tree::Node;

pub const RECENCY_WINDOW_DAYS: i64 = 7;

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d-%m-%Y", "%d/%m/%Y", "%Y/%m/%d"];
const DATE_TIME_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Counts enquiries dated within `[today - 7 days, today]`, both ends
/// inclusive. Entries without a readable date are skipped.
pub fn count_recent(entries: &[Node], today: NaiveDate) -> i64 {
    let earliest = today - Duration::days(RECENCY_WINDOW_DAYS);
    let mut count = 0_i64;
    for entry in entries {
        let Some(raw) = resolve_text(entry, &fields::ENQUIRY_DATE) else {
            continue;
        };
        let Some(date) = parse_enquiry_date(&raw) else {
            trace!(value = %raw, "skipping enquiry with unreadable date");
            continue;
        };
        if date >= earliest && date <= today {
            count += 1;
        }
    }
    count
}

pub fn parse_enquiry_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();

    if looks_like_compact_date(trimmed) {
        return NaiveDate::parse_from_str(trimmed, "%Y%m%d").ok();
    }

    for format in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return Some(date);
        }
    }

    if let Ok(timestamp) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(timestamp.with_timezone(&Utc).date_naive());
    }

    DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(trimmed, format).ok())
        .map(|timestamp| timestamp.date())
}

fn looks_like_compact_date(value: &str) -> bool {
    value.len() == 8 && value.bytes().all(|byte| byte.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate};

    use super::{count_recent, parse_enquiry_date};
    use crate::report::tree::{Node, parse_document};

    fn enquiry_entries(dates: &[&str]) -> Vec<Node> {
        let mut body = String::from("<Enquiries>");
        for date in dates {
            body.push_str(&format!("<Enquiry><Date>{date}</Date></Enquiry>"));
        }
        body.push_str("<Enquiry><Purpose>no date</Purpose></Enquiry></Enquiries>");

        let parsed = parse_document(body.as_bytes());
        assert!(parsed.is_ok());
        parsed
            .ok()
            .and_then(|document| {
                document
                    .as_node()
                    .child("Enquiries")
                    .and_then(<[Node]>::first)
                    .and_then(|node| node.child("Enquiry"))
                    .map(<[Node]>::to_vec)
            })
            .unwrap_or_default()
    }

    fn day(year: i32, month: u32, date: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, date).unwrap_or_default()
    }

    #[test]
    fn accepts_common_report_date_layouts() {
        let expected = Some(day(2026, 3, 9));
        assert_eq!(parse_enquiry_date("2026-03-09"), expected);
        assert_eq!(parse_enquiry_date("20260309"), expected);
        assert_eq!(parse_enquiry_date("09-03-2026"), expected);
        assert_eq!(parse_enquiry_date("09/03/2026"), expected);
        assert_eq!(parse_enquiry_date("2026/03/09"), expected);
        assert_eq!(parse_enquiry_date("2026-03-09T10:15:00"), expected);
        assert_eq!(parse_enquiry_date("2026-03-09T23:30:00-05:00"), Some(day(2026, 3, 10)));
    }

    #[test]
    fn rejects_unreadable_dates() {
        assert_eq!(parse_enquiry_date("yesterday"), None);
        assert_eq!(parse_enquiry_date("2026-02-30"), None);
        assert_eq!(parse_enquiry_date("20261340"), None);
        assert_eq!(parse_enquiry_date(""), None);
    }

    #[test]
    fn window_is_inclusive_on_both_ends() {
        let today = day(2026, 3, 10);
        let dates = [
            today,
            today - Duration::days(3),
            today - Duration::days(7),
            today - Duration::days(8),
            today - Duration::days(10),
            today + Duration::days(1),
        ]
        .map(|date| date.format("%Y-%m-%d").to_string());
        let entries = enquiry_entries(&dates.iter().map(String::as_str).collect::<Vec<&str>>());
        assert_eq!(count_recent(&entries, today), 3);
    }

    #[test]
    fn no_entries_counts_zero() {
        assert_eq!(count_recent(&[], day(2026, 3, 10)), 0);
    }
}
