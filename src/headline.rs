//! Best-effort extraction of display fields from a market question.
//!
//! Market questions are free text ("Will BTC close above $100k by March
//! 2026?"), so everything here is heuristic. Non-matching inputs fall back to
//! the cleaned question as the subject with no tag and no date suffix; callers
//! must not assume anything beyond that.

use crate::types::Category;

#[derive(Debug, Clone, PartialEq)]
pub struct DisplayFields {
    /// The question with trailing punctuation stripped and any recognized
    /// date clause removed.
    pub subject: String,
    /// Category inferred from keywords in the question, if any.
    pub condition_tag: Option<Category>,
    /// Recognized trailing date clause, e.g. "by March 2026" or "in 2025".
    pub date_suffix: Option<String>,
}

const MONTHS: &[&str] = &[
    "january", "february", "march", "april", "may", "june", "july", "august",
    "september", "october", "november", "december",
];

/// Strip trailing question marks, periods, exclamation marks and whitespace.
pub fn clean_question(question: &str) -> String {
    question
        .trim()
        .trim_end_matches(['?', '.', '!'])
        .trim_end()
        .to_string()
}

pub fn extract_display_fields(question: &str) -> DisplayFields {
    let cleaned = clean_question(question);
    let condition_tag = scan_category(&cleaned);
    let (subject, date_suffix) = split_date_clause(&cleaned);
    DisplayFields { subject, condition_tag, date_suffix }
}

/// Split a trailing "by <date>" / "before <date>" / "in <year>" clause off
/// the question. Only fires when the clause tail actually looks like a date
/// (a month name or a 4-digit year); otherwise the question is returned whole.
fn split_date_clause(cleaned: &str) -> (String, Option<String>) {
    // ASCII-only lowercasing keeps byte offsets valid on the original string
    // (full to_lowercase() can change byte length, e.g. 'İ' becomes two
    // chars). The prepositions being matched are ASCII anyway.
    let lower = cleaned.to_ascii_lowercase();
    for prep in [" by ", " before ", " in "] {
        if let Some(idx) = lower.rfind(prep) {
            let tail = cleaned[idx + prep.len()..].trim();
            if looks_like_date(tail) {
                let subject = cleaned[..idx].trim_end().to_string();
                let suffix = format!("{} {}", prep.trim(), tail);
                return (subject, Some(suffix));
            }
        }
    }
    (cleaned.to_string(), None)
}

fn looks_like_date(tail: &str) -> bool {
    if tail.is_empty() || tail.split_whitespace().count() > 4 {
        return false;
    }
    let lower = tail.to_lowercase();
    if MONTHS.iter().any(|m| lower.starts_with(m)) {
        return true;
    }
    // A bare 4-digit year (possibly "end of 2026" style tails are too long
    // and already rejected above).
    tail.split_whitespace().any(|w| {
        w.len() == 4 && w.chars().all(|c| c.is_ascii_digit()) && (w.starts_with("19") || w.starts_with("20"))
    })
}

fn scan_category(question: &str) -> Option<Category> {
    let lower = question.to_lowercase();
    let hit = |words: &[&str]| words.iter().any(|w| lower.contains(w));

    if hit(&["bitcoin", "btc", "ethereum", "eth ", "solana", "crypto", "dogecoin"]) {
        Some(Category::Crypto)
    } else if hit(&["election", "president", "senate", "congress", "vote", "governor", "parliament"]) {
        Some(Category::Politics)
    } else if hit(&["fed ", "rate cut", "inflation", "gdp", "recession", "tariff", "unemployment"]) {
        Some(Category::Economics)
    } else if hit(&["nba", "nfl", "mlb", "nhl", "ufc", "super bowl", "championship", "world cup"]) {
        Some(Category::Sports)
    } else if hit(&["temperature", "hurricane", "rainfall", "snowfall", "heat wave"]) {
        Some(Category::Weather)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cleans_trailing_punctuation() {
        assert_eq!(clean_question("Will X happen?"), "Will X happen");
        assert_eq!(clean_question("Done."), "Done");
        assert_eq!(clean_question("  Sure?!  "), "Sure");
        assert_eq!(clean_question("No punctuation"), "No punctuation");
    }

    #[test]
    fn splits_month_year_date_clause() {
        let f = extract_display_fields("Will BTC close above $100k by March 2026?");
        assert_eq!(f.subject, "Will BTC close above $100k");
        assert_eq!(f.date_suffix.as_deref(), Some("by March 2026"));
        assert_eq!(f.condition_tag, Some(Category::Crypto));
    }

    #[test]
    fn splits_bare_year_clause() {
        let f = extract_display_fields("Will there be a recession in 2026?");
        assert_eq!(f.subject, "Will there be a recession");
        assert_eq!(f.date_suffix.as_deref(), Some("in 2026"));
        assert_eq!(f.condition_tag, Some(Category::Economics));
    }

    #[test]
    fn non_date_tail_is_left_alone() {
        let f = extract_display_fields("Will the bill pass in the senate?");
        assert_eq!(f.subject, "Will the bill pass in the senate");
        assert_eq!(f.date_suffix, None);
        assert_eq!(f.condition_tag, Some(Category::Politics));
    }

    #[test]
    fn fallback_is_cleaned_question_verbatim() {
        let f = extract_display_fields("X?");
        assert_eq!(f.subject, "X");
        assert_eq!(f.condition_tag, None);
        assert_eq!(f.date_suffix, None);
    }

    #[test]
    fn multibyte_titles_do_not_break_the_split() {
        // Characters whose full lowercase mapping changes byte length must
        // not shift the clause offsets or panic.
        let f = extract_display_fields("İa by é2026?");
        assert_eq!(f.subject, "İa by é2026");
        assert_eq!(f.date_suffix, None);

        let f = extract_display_fields("İstanbul election decided by March 2026?");
        assert_eq!(f.subject, "İstanbul election decided");
        assert_eq!(f.date_suffix.as_deref(), Some("by March 2026"));

        let f = extract_display_fields("Prix du café above €5 in 2026?");
        assert_eq!(f.subject, "Prix du café above €5");
        assert_eq!(f.date_suffix.as_deref(), Some("in 2026"));
    }

    #[test]
    fn empty_question_is_handled() {
        let f = extract_display_fields("");
        assert_eq!(f.subject, "");
        assert_eq!(f.condition_tag, None);
        assert_eq!(f.date_suffix, None);
    }
}
