//! Work-history timeline analysis.
//!
//! Pipeline: extract date-range mentions from resume text → stable sort by
//! start → overlap / gap detection. Pure and synchronous; every call is
//! independent and safe to run concurrently.

pub mod detect;
pub mod extract;

use chrono::{NaiveDate, Utc};
use tracing::{debug, warn};

pub use detect::{OverlapMode, TimelineReport, DEFAULT_GAP_THRESHOLD_DAYS};

use crate::timeline::detect::{detect, sort_mentions};
use crate::timeline::extract::extract_mentions;

/// Counters describing what the analysis skipped or accepted with caveats.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TimelineDiagnostics {
    /// Pattern-shaped candidates that did not resolve to valid dates.
    pub discarded: usize,
    /// Mentions whose end precedes their start. Kept in the analysis as-is.
    pub reversed: usize,
}

#[derive(Debug, Clone, Default)]
pub struct TimelineAnalysis {
    pub report: TimelineReport,
    pub diagnostics: TimelineDiagnostics,
}

/// Analyzer settings, built once from config and shared by handlers.
#[derive(Debug, Clone, Copy)]
pub struct TimelineAnalyzer {
    pub mode: OverlapMode,
    pub gap_threshold_days: i64,
}

impl Default for TimelineAnalyzer {
    fn default() -> Self {
        Self {
            mode: OverlapMode::Adjacent,
            gap_threshold_days: DEFAULT_GAP_THRESHOLD_DAYS,
        }
    }
}

impl TimelineAnalyzer {
    pub fn new(mode: OverlapMode, gap_threshold_days: i64) -> Self {
        Self {
            mode,
            gap_threshold_days,
        }
    }

    /// Analyzes `text`, resolving "Present" against today's date (UTC),
    /// read once for this call.
    pub fn analyze_text(&self, text: &str) -> TimelineAnalysis {
        self.analyze_text_at(text, Utc::now().date_naive())
    }

    /// Analyzes `text` with an explicit evaluation date.
    pub fn analyze_text_at(&self, text: &str, today: NaiveDate) -> TimelineAnalysis {
        let extraction = extract_mentions(text, today);

        let reversed: Vec<_> = extraction
            .mentions
            .iter()
            .filter(|m| m.is_reversed())
            .collect();
        for m in &reversed {
            warn!(source = %m.source_text, "date range ends before it starts");
        }
        let diagnostics = TimelineDiagnostics {
            discarded: extraction.discarded,
            reversed: reversed.len(),
        };

        let sorted = sort_mentions(extraction.mentions);
        let report = detect(&sorted, self.mode, self.gap_threshold_days);

        debug!(
            mentions = sorted.len(),
            discarded = diagnostics.discarded,
            reversed = diagnostics.reversed,
            overlaps = report.overlaps.len(),
            gaps = report.gaps.len(),
            "timeline analysis complete"
        );

        TimelineAnalysis {
            report,
            diagnostics,
        }
    }
}
