//! Display formatting helpers.
//!
//! Every value placed on a report goes through one of these helpers, so the
//! document's wording conventions live in exactly one place. The rules are
//! part of the compatibility contract:
//! - dates render long-form as "D Month YYYY", day unpadded;
//! - kebab-case tags title-case segment by segment ("black-african" ->
//!   "Black African");
//! - tag lists join with ", " and never show the literal `none` tag;
//! - absent demographic values render [`NOT_PROVIDED`], absent clinical
//!   values render [`NOT_AVAILABLE`] or the section's "None reported"
//!   wording.

use chrono::{Datelike, NaiveDate};
use ph_core::YesNo;

/// Placeholder for missing demographic fields.
pub const NOT_PROVIDED: &str = "Not provided";

/// Placeholder for missing clinical fields.
pub const NOT_AVAILABLE: &str = "N/A";

/// Clinical-section wording for an empty list.
pub const NONE_REPORTED: &str = "None reported";

/// Patient-facing wording for an empty list.
pub const NONE_LABEL: &str = "None";

const MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Long-form date: "3 March 1975" (day unpadded, full month name).
pub fn long_date(date: NaiveDate) -> String {
    format!(
        "{} {} {}",
        date.day(),
        MONTHS[date.month0() as usize],
        date.year()
    )
}

/// Title-case a kebab-case tag: split on "-", capitalise the first letter of
/// each segment, lowercase the rest, join with a single space.
pub fn title_case_tag(tag: &str) -> String {
    tag.split('-')
        .map(|segment| {
            let mut chars = segment.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Join tags into a single ", "-separated display string, title-casing each
/// tag and skipping the literal `none` tag. Returns `None` when nothing is
/// left to display, so the caller chooses its section-specific empty wording.
pub fn join_tags<'a>(tags: impl IntoIterator<Item = &'a str>) -> Option<String> {
    let formatted: Vec<String> = tags
        .into_iter()
        .filter(|tag| !tag.is_empty() && *tag != "none")
        .map(title_case_tag)
        .collect();
    if formatted.is_empty() {
        None
    } else {
        Some(formatted.join(", "))
    }
}

/// Display form of a yes/no answer.
pub fn yes_no(answer: YesNo) -> &'static str {
    match answer {
        YesNo::Yes => "Yes",
        YesNo::No => "No",
    }
}

/// PSA result with its unit, e.g. "4.2 ng/mL".
pub fn psa_result(value: f64) -> String {
    format!("{value} ng/mL")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid test date")
    }

    #[test]
    fn long_date_is_unpadded_with_full_month() {
        assert_eq!(long_date(date(1975, 3, 3)), "3 March 1975");
        assert_eq!(long_date(date(2024, 12, 31)), "31 December 2024");
        assert_eq!(long_date(date(2025, 1, 9)), "9 January 2025");
    }

    #[test]
    fn title_casing_tags() {
        assert_eq!(title_case_tag("black-african"), "Black African");
        assert_eq!(title_case_tag("black-caribbean"), "Black Caribbean");
        assert_eq!(title_case_tag("father"), "Father");
        assert_eq!(title_case_tag("WHITE"), "White");
    }

    #[test]
    fn title_casing_preserves_segment_count() {
        for tag in ["black-african", "black-caribbean", "white", "a-b-c"] {
            let segments = tag.split('-').count();
            let words = title_case_tag(tag).split(' ').count();
            assert_eq!(segments, words, "segment count changed for {tag:?}");
        }
    }

    #[test]
    fn join_tags_skips_none_and_signals_empty() {
        assert_eq!(
            join_tags(["father", "brother"]),
            Some("Father, Brother".to_string())
        );
        assert_eq!(join_tags(["none"]), None);
        assert_eq!(join_tags([]), None);
        assert_eq!(join_tags(["urinary", "none"]), Some("Urinary".to_string()));
    }

    #[test]
    fn psa_results_carry_their_unit() {
        assert_eq!(psa_result(4.2), "4.2 ng/mL");
        assert_eq!(psa_result(12.0), "12 ng/mL");
    }
}
