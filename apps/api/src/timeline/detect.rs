//! Overlap & gap detection over chronologically sorted mentions.

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::timeline::extract::DateRangeMention;

/// Idle time longer than this between two ranges is reported as a gap.
pub const DEFAULT_GAP_THRESHOLD_DAYS: i64 = 90;

/// How overlaps are searched for.
///
/// `Adjacent` only compares neighbours after sorting by start. Three or more
/// concurrent ranges are therefore only partially reported: with A ⊃ B and
/// A ⊃ C, the A/C overlap is missed because B sits between them. `Sweep`
/// compares each range against every earlier range still active and measures
/// gaps from the furthest end seen so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverlapMode {
    #[default]
    Adjacent,
    Sweep,
}

impl FromStr for OverlapMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "adjacent" => Ok(OverlapMode::Adjacent),
            "sweep" => Ok(OverlapMode::Sweep),
            other => Err(format!("unknown overlap mode '{other}' (expected adjacent|sweep)")),
        }
    }
}

/// Human-readable findings for reviewer attention.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimelineReport {
    pub overlaps: Vec<String>,
    pub gaps: Vec<String>,
}

impl TimelineReport {
    pub fn is_empty(&self) -> bool {
        self.overlaps.is_empty() && self.gaps.is_empty()
    }
}

/// Stable sort by start; ties keep their order of appearance.
pub fn sort_mentions(mut mentions: Vec<DateRangeMention>) -> Vec<DateRangeMention> {
    mentions.sort_by_key(|m| m.start);
    mentions
}

/// Runs overlap and gap detection over mentions already sorted by start.
pub fn detect(
    sorted: &[DateRangeMention],
    mode: OverlapMode,
    gap_threshold_days: i64,
) -> TimelineReport {
    match mode {
        OverlapMode::Adjacent => detect_adjacent(sorted, gap_threshold_days),
        OverlapMode::Sweep => detect_sweep(sorted, gap_threshold_days),
    }
}

fn detect_adjacent(sorted: &[DateRangeMention], gap_threshold_days: i64) -> TimelineReport {
    let mut report = TimelineReport::default();

    for pair in sorted.windows(2) {
        let (current, next) = (&pair[0], &pair[1]);

        if current.end > next.start {
            report.overlaps.push(overlap_message(current, next));
        }

        let gap = gap_message(current.end, &current.source_text, next, gap_threshold_days);
        if let Some(msg) = gap {
            report.gaps.push(msg);
        }
    }

    report
}

fn detect_sweep(sorted: &[DateRangeMention], gap_threshold_days: i64) -> TimelineReport {
    let mut report = TimelineReport::default();
    // Range with the latest end among those already visited.
    let mut frontier: Option<&DateRangeMention> = None;

    for (idx, next) in sorted.iter().enumerate() {
        for earlier in &sorted[..idx] {
            if earlier.end > next.start {
                report.overlaps.push(overlap_message(earlier, next));
            }
        }

        if let Some(reach) = frontier {
            let gap = gap_message(reach.end, &reach.source_text, next, gap_threshold_days);
            if let Some(msg) = gap {
                report.gaps.push(msg);
            }
        }

        if frontier.map_or(true, |f| next.end > f.end) {
            frontier = Some(next);
        }
    }

    report
}

fn overlap_message(current: &DateRangeMention, next: &DateRangeMention) -> String {
    format!(
        "Potential overlap between '{}' and '{}'.",
        current.source_text, next.source_text
    )
}

fn gap_message(
    until: NaiveDate,
    until_text: &str,
    next: &DateRangeMention,
    gap_threshold_days: i64,
) -> Option<String> {
    let days = (next.start - until).num_days();
    if days <= gap_threshold_days {
        return None;
    }
    let months = (days as f64 / 30.0).round() as i64;
    Some(format!(
        "Potential gap of approximately {months} months between '{until_text}' and '{}'.",
        next.source_text
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mention(start: (i32, u32), end: (i32, u32), text: &str) -> DateRangeMention {
        DateRangeMention {
            start: NaiveDate::from_ymd_opt(start.0, start.1, 1).unwrap(),
            end: NaiveDate::from_ymd_opt(end.0, end.1, 1).unwrap(),
            source_text: text.to_string(),
            ongoing: false,
        }
    }

    #[test]
    fn test_empty_and_single_produce_empty_report() {
        assert!(detect(&[], OverlapMode::Adjacent, 90).is_empty());
        let one = [mention((2019, 1), (2020, 1), "a")];
        assert!(detect(&one, OverlapMode::Adjacent, 90).is_empty());
        assert!(detect(&one, OverlapMode::Sweep, 90).is_empty());
    }

    #[test]
    fn test_sort_is_stable_on_equal_starts() {
        let sorted = sort_mentions(vec![
            mention((2020, 1), (2021, 1), "second-start"),
            mention((2018, 5), (2019, 1), "first"),
            mention((2020, 1), (2020, 6), "tie-a"),
        ]);
        let order: Vec<_> = sorted.iter().map(|m| m.source_text.as_str()).collect();
        assert_eq!(order, vec!["first", "second-start", "tie-a"]);
    }

    #[test]
    fn test_touching_boundary_is_not_overlap() {
        let sorted = [
            mention((2019, 1), (2020, 6), "Jan 2019 – Jun 2020"),
            mention((2020, 6), (2021, 12), "Jun 2020 – Dec 2021"),
        ];
        let report = detect(&sorted, OverlapMode::Adjacent, 90);
        assert!(report.overlaps.is_empty());
        assert!(report.gaps.is_empty());
    }

    #[test]
    fn test_overlap_names_both_sources() {
        let sorted = [
            mention((2019, 1), (2020, 12), "Jan 2019 – Dec 2020"),
            mention((2020, 6), (2021, 12), "Jun 2020 – Dec 2021"),
        ];
        let report = detect(&sorted, OverlapMode::Adjacent, 90);
        assert_eq!(report.overlaps.len(), 1);
        assert!(report.overlaps[0].contains("Jan 2019 – Dec 2020"));
        assert!(report.overlaps[0].contains("Jun 2020 – Dec 2021"));
        assert!(report.gaps.is_empty());
    }

    #[test]
    fn test_gap_reports_rounded_months() {
        let sorted = [
            mention((2018, 1), (2018, 12), "Jan 2018 – Dec 2018"),
            mention((2019, 8), (2020, 12), "Aug 2019 – Dec 2020"),
        ];
        let report = detect(&sorted, OverlapMode::Adjacent, 90);
        assert!(report.overlaps.is_empty());
        assert_eq!(report.gaps.len(), 1);
        // 243 days / 30 rounds to 8
        assert!(report.gaps[0].contains("approximately 8 months"), "{}", report.gaps[0]);
    }

    #[test]
    fn test_sixty_day_gap_is_below_threshold() {
        // Jan 1 2020 to Mar 1 2020 is exactly 60 days (leap year).
        let sorted = [
            mention((2019, 1), (2020, 1), "a"),
            mention((2020, 3), (2021, 1), "b"),
        ];
        assert!(detect(&sorted, OverlapMode::Adjacent, 90).gaps.is_empty());
    }

    #[test]
    fn test_threshold_is_exclusive() {
        // 60-day distance against thresholds of 60 and 59.
        let sorted = [
            mention((2019, 1), (2020, 1), "a"),
            mention((2020, 3), (2021, 1), "b"),
        ];
        assert!(detect(&sorted, OverlapMode::Adjacent, 60).gaps.is_empty());
        assert_eq!(detect(&sorted, OverlapMode::Adjacent, 59).gaps.len(), 1);
    }

    #[test]
    fn test_adjacent_misses_non_adjacent_overlap() {
        let sorted = [
            mention((2015, 1), (2022, 1), "long"),
            mention((2016, 1), (2017, 1), "short-1"),
            mention((2019, 1), (2020, 1), "short-2"),
        ];
        let report = detect(&sorted, OverlapMode::Adjacent, 90);
        assert_eq!(report.overlaps.len(), 1);
        // short-1 → short-2 is reported as a gap even though "long" covers it.
        assert_eq!(report.gaps.len(), 1);
    }

    #[test]
    fn test_sweep_finds_all_overlaps_and_suppresses_covered_gaps() {
        let sorted = [
            mention((2015, 1), (2022, 1), "long"),
            mention((2016, 1), (2017, 1), "short-1"),
            mention((2019, 1), (2020, 1), "short-2"),
        ];
        let report = detect(&sorted, OverlapMode::Sweep, 90);
        assert_eq!(report.overlaps.len(), 2);
        assert!(report.overlaps.iter().all(|o| o.contains("'long'")));
        assert!(report.gaps.is_empty());
    }

    #[test]
    fn test_sweep_reports_gap_after_frontier() {
        let sorted = [
            mention((2015, 1), (2016, 1), "a"),
            mention((2017, 1), (2018, 1), "b"),
        ];
        let report = detect(&sorted, OverlapMode::Sweep, 90);
        assert!(report.overlaps.is_empty());
        assert_eq!(report.gaps.len(), 1);
        assert!(report.gaps[0].contains("approximately 12 months"));
    }

    #[test]
    fn test_overlap_mode_from_str() {
        assert_eq!("adjacent".parse::<OverlapMode>(), Ok(OverlapMode::Adjacent));
        assert_eq!(" SWEEP ".parse::<OverlapMode>(), Ok(OverlapMode::Sweep));
        assert!("pairwise".parse::<OverlapMode>().is_err());
    }
}
