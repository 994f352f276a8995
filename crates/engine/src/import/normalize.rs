use chrono::{DateTime, NaiveDate, NaiveDateTime};
use chrono_tz::Tz;

use crate::{Category, dates::local_date};

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Ordered keyword rules; the first rule with a matching keyword wins.
const RULES: [(Category, &[&str]); 5] = [
    (Category::Food, &["ăn", "uống", "phở", "cơm"]),
    (Category::Transport, &["xăng", "grab", "xe"]),
    (Category::Shopping, &["mua", "siêu thị", "shop"]),
    (Category::Utilities, &["điện", "nước", "internet", "tiện ích"]),
    (Category::Education, &["sách", "học", "khóa"]),
];

/// Calendar date of an import timestamp.
///
/// Offset-carrying timestamps are moved into `tz` first; naive ones are
/// taken as already local. Returns `None` for anything unparseable.
pub(crate) fn parse_time(text: &str, tz: Tz) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(at) = DateTime::parse_from_rfc3339(text) {
        return Some(local_date(at.to_utc(), tz));
    }
    if let Some(at) = NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(text, fmt).ok())
    {
        return Some(at.date());
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d").ok()
}

/// Category for a free-text note.
pub(crate) fn classify_note(note: &str) -> Category {
    let note = note.to_lowercase();
    RULES
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| note.contains(k)))
        .map_or(Category::Other, |(category, _)| *category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dates::DEFAULT_TIMEZONE;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn rfc3339_is_moved_into_the_zone() {
        assert_eq!(
            parse_time("2025-04-30T20:00:00Z", DEFAULT_TIMEZONE),
            Some(date(2025, 5, 1))
        );
        assert_eq!(
            parse_time("2025-04-30T20:00:00+07:00", DEFAULT_TIMEZONE),
            Some(date(2025, 4, 30))
        );
    }

    #[test]
    fn naive_forms_keep_their_day() {
        assert_eq!(
            parse_time("2025-04-30 23:15:00", DEFAULT_TIMEZONE),
            Some(date(2025, 4, 30))
        );
        assert_eq!(
            parse_time("2025-04-30T23:15", DEFAULT_TIMEZONE),
            Some(date(2025, 4, 30))
        );
        assert_eq!(
            parse_time(" 2025-04-30 ", DEFAULT_TIMEZONE),
            Some(date(2025, 4, 30))
        );
    }

    #[test]
    fn garbage_time_is_none() {
        assert_eq!(parse_time("hôm qua", DEFAULT_TIMEZONE), None);
        assert_eq!(parse_time("", DEFAULT_TIMEZONE), None);
        assert_eq!(parse_time("2025-02-30", DEFAULT_TIMEZONE), None);
    }

    #[test]
    fn notes_map_to_categories() {
        assert_eq!(classify_note("Phở bò"), Category::Food);
        assert_eq!(classify_note("đi xe buýt"), Category::Transport);
        // "xăng" contains "ăn", so the food rule claims it first.
        assert_eq!(classify_note("đổ xăng"), Category::Food);
        assert_eq!(classify_note("GRAB về nhà"), Category::Transport);
        assert_eq!(classify_note("siêu thị"), Category::Shopping);
        assert_eq!(classify_note("tiền điện"), Category::Utilities);
        assert_eq!(classify_note("mua sách"), Category::Shopping);
        assert_eq!(classify_note("khóa tiếng anh"), Category::Education);
        assert_eq!(classify_note(""), Category::Other);
        assert_eq!(classify_note("quà sinh nhật"), Category::Other);
    }
}
