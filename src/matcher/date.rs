//! DateCortex - Full calendar date detection via Regex + chrono
//!
//! Detects fully-specified dates (year + month + day) in title text:
//! - CJK units:   2025年2月12日
//! - Slash:       2025/02/12
//! - Hyphen:      2025-2-12
//! - Dot:         2025.2.12
//! - Underscore:  2025_2_12
//! - Whitespace:  2025 2 12
//!
//! Separator styles may be mixed within one date ("2025/2.12" matches).
//! Partial dates (year+month only) and bare 4-digit numbers never match.
//!
//! Calendrical validity is delegated to chrono: `NaiveDate::from_ymd_opt`
//! rejects non-existent dates (2025-02-31, 2025-04-31), so leap years and
//! month lengths are never hand-coded here.

use chrono::NaiveDate;
use regex::Regex;
use serde::{Deserialize, Serialize};

// ==================== TYPE DEFINITIONS ====================

/// A validated full-date match within a piece of text
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct DateMatch {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    /// Byte offset of the match start
    pub start: usize,
    /// Byte offset one past the match end
    pub end: usize,
    /// The matched fragment as it appeared in the text
    pub text: String,
}

// ==================== MAIN IMPLEMENTATION ====================

/// DateCortex - full-date detector
///
/// A match requires an explicit unit marker or separator between the
/// year/month and month/day components, so digit runs like "20250212"
/// (IDs, phone numbers) are never classified as dates.
pub struct DateCortex {
    date_re: Regex,
}

impl DateCortex {
    pub fn new() -> Self {
        // 4-digit year, unit-or-separator, 1-2 digit month, unit-or-separator,
        // 1-2 digit day, optional day unit. Whitespace is both a valid
        // separator and allowed padding around the other separators.
        //
        // The digit-boundary guards of the original lookaround form
        // ((?<!\d) ... (?!\d)) are applied in evaluate(); the regex crate
        // does not support lookaround.
        let date_re =
            Regex::new(r"(\d{4})\s*(?:年|[/\-._\s])\s*(\d{1,2})\s*(?:月|[/\-._\s])\s*(\d{1,2})\s*日?")
                .unwrap();

        Self { date_re }
    }

    /// Evaluate `text` for a fully-specified, calendrically valid date.
    ///
    /// Candidate matches whose year is preceded by a digit, or whose day
    /// is followed by a digit, are skipped and the search continues past
    /// them. The first surviving candidate is then range- and
    /// calendar-checked; if it fails, the whole text is classified as
    /// having no date (a single hit decides the text).
    pub fn evaluate(&self, text: &str) -> Option<DateMatch> {
        if text.is_empty() {
            return None;
        }
        let bytes = text.as_bytes();

        for caps in self.date_re.captures_iter(text) {
            let whole = caps.get(0)?;
            let year_grp = caps.get(1)?;
            let day_grp = caps.get(3)?;

            // Digit-boundary guards: reject matches embedded in longer
            // numeric runs. UTF-8 continuation bytes are never ASCII
            // digits, so byte-level checks are safe.
            if year_grp.start() > 0 && bytes[year_grp.start() - 1].is_ascii_digit() {
                continue;
            }
            if day_grp.end() < bytes.len() && bytes[day_grp.end()].is_ascii_digit() {
                continue;
            }

            let year: i32 = year_grp.as_str().parse().unwrap_or(0);
            let month: u32 = caps.get(2)?.as_str().parse().unwrap_or(0);
            let day: u32 = day_grp.as_str().parse().unwrap_or(0);

            // Cheap range pre-filter before touching the calendar
            if !(1..=12).contains(&month) || !(1..=31).contains(&day) {
                return None;
            }

            // Calendar check: construction fails for dates that do not
            // exist (day 31 in a 30-day month, Feb 29 off leap years)
            NaiveDate::from_ymd_opt(year, month, day)?;

            return Some(DateMatch {
                year,
                month,
                day,
                start: whole.start(),
                end: whole.end(),
                text: whole.as_str().to_string(),
            });
        }

        None
    }

    /// True if `text` contains at least one valid full date
    pub fn has_full_date(&self, text: &str) -> bool {
        self.evaluate(text).is_some()
    }
}

impl Default for DateCortex {
    fn default() -> Self {
        Self::new()
    }
}

// ==================== TESTS ====================
