use cookcal_api::CalendarBackend;
use cookcal_calendar::{CalendarRangeCache, CoverageMode, EnsureOptions, EnsureOutcome};

use super::parse_range;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CheckReport {
    pub mode: CoverageMode,
    pub first: EnsureOutcome,
    pub second: EnsureOutcome,
}

impl CheckReport {
    pub fn served_from_cache(&self) -> bool {
        self.second == EnsureOutcome::CacheHit
    }
}

/// Requests the same window twice, the second call should never reach the
/// backend.
pub async fn check_coverage<B: CalendarBackend>(
    cache: &CalendarRangeCache<B>,
    start: &str,
    end: &str,
) -> anyhow::Result<CheckReport> {
    let range = parse_range(start, end)?;

    let first = cache.ensure_range(range, EnsureOptions::default()).await;
    if let Some(err) = cache.error() {
        anyhow::bail!("failed to load {range}: {err}");
    }

    let second = cache.ensure_range(range, EnsureOptions::default()).await;

    Ok(CheckReport {
        mode: cache.coverage_mode(),
        first,
        second,
    })
}
