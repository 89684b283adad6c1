use chrono::{Datelike, NaiveDate};

use crate::rotation::history::fallback_quote;
use crate::types::quote::Quote;

/// Stable pick for a calendar day: the same date always lands on the same
/// candidate, consecutive dates spread across the list.
pub fn daily_quote(date: NaiveDate, candidates: &[Quote]) -> Quote {
    if candidates.is_empty() {
        return fallback_quote();
    }

    candidates[daily_index(date, candidates.len())].clone()
}

fn daily_index(date: NaiveDate, len: usize) -> usize {
    let key =
        date.year() as i64 * 10_000 + date.month() as i64 * 100 + date.day() as i64;

    // Fibonacci-hash scramble so neighbouring days do not walk the list in
    // catalog order.
    let mixed = (key as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15);

    (mixed >> 32) as usize % len
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rotation::history::FALLBACK_TEXT;

    fn candidates(count: usize) -> Vec<Quote> {
        (0..count)
            .map(|index| Quote::builtin(format!("quote {index}")))
            .collect()
    }

    #[test]
    fn same_date_same_quote() {
        let list = candidates(10);
        let date = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();

        assert_eq!(daily_quote(date, &list), daily_quote(date, &list));
    }

    #[test]
    fn a_month_of_dates_spreads_across_candidates() {
        let list = candidates(10);
        let picked: std::collections::HashSet<String> = (1..=31)
            .map(|day| {
                let date = NaiveDate::from_ymd_opt(2026, 8, day).unwrap();
                daily_quote(date, &list).text
            })
            .collect();

        assert!(picked.len() > 1, "every day of the month picked {picked:?}");
    }

    #[test]
    fn empty_candidates_fall_back() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 6).unwrap();
        assert_eq!(daily_quote(date, &[]).text, FALLBACK_TEXT);
    }
}
