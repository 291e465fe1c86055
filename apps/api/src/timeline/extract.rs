//! Date mention extraction. Finds "Mon YYYY – Mon YYYY" / "Mon YYYY – Present"
//! ranges in free resume text and resolves them to calendar points.
//!
//! Parsing is best-effort: a candidate that looks like a range but carries an
//! unknown month token or an impossible date is skipped and counted, never
//! surfaced as an error.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::{Captures, Regex};
use serde::Serialize;

/// Month tokens keyed by their first three letters.
const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

const MONTH_NAMES: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// Candidate range pattern.
///
/// The month slot accepts any alphabetic word so that garbled tokens still
/// match and get counted as discards. The separator accepts ASCII and Unicode
/// dashes plus the cp1252 mojibake PDF extraction tends to leave behind
/// (`â€“` for an en-dash, `â€”` for an em-dash, U+FFFD).
static RANGE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?ix)
        \b(?P<start_month>[a-z]{3,9})\.?\s+(?P<start_year>\d{4})
        \s*(?:-|–|—|‒|―|−|â[€\x{80}][–—“”\x{93}\x{94}]|\x{FFFD})+\s*
        (?:
            (?P<present>present|current|now)
            |
            (?P<end_month>[a-z]{3,9})\.?\s+(?P<end_year>\d{4})
        )\b",
    )
    .expect("date range pattern must compile")
});

/// A single extracted start–end range with the text it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRangeMention {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub source_text: String,
    /// The end bound was "Present" and resolved to the evaluation date.
    pub ongoing: bool,
}

impl DateRangeMention {
    /// End precedes start, usually a typo in the resume.
    pub fn is_reversed(&self) -> bool {
        self.end < self.start
    }
}

/// Resolves a month token via its first three letters, case-insensitive.
///
/// The token must still be spelled as a month ("Sep", "Sept", "September"),
/// so words like "Marketing" do not resolve to March.
pub fn month_number(token: &str) -> Option<u32> {
    let token = token.to_lowercase();
    let prefix: String = token.chars().take(3).collect();
    let idx = MONTHS.iter().position(|m| *m == prefix)?;
    let spelled = MONTH_NAMES[idx].starts_with(token.as_str()) || token == "sept";
    spelled.then_some(idx as u32 + 1)
}

/// Builds the first-of-month calendar point for a month token and year string.
fn calendar_point(month_token: &str, year: &str) -> Option<NaiveDate> {
    let month = month_number(month_token)?;
    let year = year.parse::<i32>().ok()?;
    NaiveDate::from_ymd_opt(year, month, 1)
}

fn parse_candidate(caps: &Captures<'_>, today: NaiveDate) -> Option<DateRangeMention> {
    let start = calendar_point(&caps["start_month"], &caps["start_year"])?;

    let (end, ongoing) = if caps.name("present").is_some() {
        (today, true)
    } else {
        let month = caps.name("end_month")?.as_str();
        let year = caps.name("end_year")?.as_str();
        (calendar_point(month, year)?, false)
    };

    Some(DateRangeMention {
        start,
        end,
        source_text: caps[0].trim().to_string(),
        ongoing,
    })
}

/// A restartable scan over one text. Every call to [`MentionScan::iter`]
/// starts again from the beginning of the text.
#[derive(Debug, Clone, Copy)]
pub struct MentionScan<'t> {
    text: &'t str,
    today: NaiveDate,
}

impl<'t> MentionScan<'t> {
    pub fn new(text: &'t str, today: NaiveDate) -> Self {
        Self { text, today }
    }

    pub fn iter(&self) -> Mentions<'t> {
        Mentions {
            text: self.text,
            pos: 0,
            today: self.today,
            discarded: 0,
        }
    }
}

impl<'t> IntoIterator for &MentionScan<'t> {
    type Item = DateRangeMention;
    type IntoIter = Mentions<'t>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Lazy iterator over successfully parsed mentions, in text order.
pub struct Mentions<'t> {
    text: &'t str,
    /// Byte offset the next candidate search starts from.
    pos: usize,
    today: NaiveDate,
    discarded: usize,
}

impl Mentions<'_> {
    /// Candidates skipped so far because they did not resolve to valid dates.
    pub fn discarded(&self) -> usize {
        self.discarded
    }
}

impl Iterator for Mentions<'_> {
    type Item = DateRangeMention;

    fn next(&mut self) -> Option<Self::Item> {
        while self.pos < self.text.len() {
            let caps = RANGE_PATTERN.captures_at(self.text, self.pos)?;
            let whole = caps.get(0)?;
            if let Some(mention) = parse_candidate(&caps, self.today) {
                self.pos = whole.end();
                return Some(mention);
            }

            tracing::trace!(candidate = whole.as_str(), "discarding unparseable date range");
            self.discarded += 1;
            // A rejected candidate must not swallow its own end bound, which
            // may open the next valid range ("Marketing 2019 – Jan 2020 – Present").
            self.pos = caps
                .name("end_month")
                .map_or(whole.end(), |end_month| end_month.start());
        }
        None
    }
}

/// Result of a complete extraction pass.
#[derive(Debug, Clone, Default)]
pub struct Extraction {
    pub mentions: Vec<DateRangeMention>,
    pub discarded: usize,
}

/// Extracts every parseable range from `text`, resolving "Present" to `today`.
pub fn extract_mentions(text: &str, today: NaiveDate) -> Extraction {
    let mut iter = MentionScan::new(text, today).iter();
    let mentions: Vec<_> = iter.by_ref().collect();
    Extraction {
        mentions,
        discarded: iter.discarded(),
    }
}
