//! Day-first date token conversion to ISO `YYYY-MM-DD`.

use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;

pub fn date_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\b(\d{1,2})[/-](\d{1,2})[/-](\d{2,4})\b").expect("date regex"))
}

/// Expand a two-digit year. Rule used across every extraction path:
/// yy > 50 lands in the 1900s, otherwise the 2000s.
fn expand_year(year: i32) -> i32 {
    if year >= 100 {
        year
    } else if year > 50 {
        1900 + year
    } else {
        2000 + year
    }
}

/// Convert a `D/M/YY`, `D-M-YY`, `D/M/YYYY`... token into `YYYY-MM-DD`.
///
/// Tokens that carry no date pattern, or whose day/month pair is not a real
/// calendar date, fall back to `today` — a missing date never fails a
/// record on its own.
pub fn to_iso_date(raw: &str, today: NaiveDate) -> String {
    if let Some(caps) = date_re().captures(raw) {
        let day: u32 = caps[1].parse().unwrap_or(0);
        let month: u32 = caps[2].parse().unwrap_or(0);
        let year = expand_year(caps[3].parse().unwrap_or(0));
        if let Some(date) = NaiveDate::from_ymd_opt(year, month, day) {
            return date.format("%Y-%m-%d").to_string();
        }
    }
    today.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, 27).unwrap()
    }

    #[test]
    fn test_slash_separated() {
        assert_eq!(to_iso_date("05/03/2024", today()), "2024-03-05");
        assert_eq!(to_iso_date("31/12/2023", today()), "2023-12-31");
    }

    #[test]
    fn test_dash_separated_two_digit_year() {
        assert_eq!(to_iso_date("5-3-24", today()), "2024-03-05");
    }

    #[test]
    fn test_century_rule() {
        assert_eq!(to_iso_date("01/02/99", today()), "1999-02-01");
        assert_eq!(to_iso_date("01/02/51", today()), "1951-02-01");
        assert_eq!(to_iso_date("01/02/50", today()), "2050-02-01");
        assert_eq!(to_iso_date("01/02/07", today()), "2007-02-01");
    }

    #[test]
    fn test_zero_padding() {
        assert_eq!(to_iso_date("1/1/2024", today()), "2024-01-01");
    }

    #[test]
    fn test_unmatched_falls_back_to_today() {
        assert_eq!(to_iso_date("no date here", today()), "2025-08-27");
        assert_eq!(to_iso_date("", today()), "2025-08-27");
    }

    #[test]
    fn test_invalid_calendar_date_falls_back() {
        // 32/13/2024 is day-first nonsense; never a hard failure
        assert_eq!(to_iso_date("32/13/2024", today()), "2025-08-27");
    }

    #[test]
    fn test_embedded_in_line() {
        assert_eq!(
            to_iso_date("PIX RECEBIDO 14/02/2024 JOAO", today()),
            "2024-02-14"
        );
    }
}
