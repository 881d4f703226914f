use cookcal_shared::DateRange;
use serde::Deserialize;
use strum::{Display, EnumString};

#[derive(
    EnumString,
    Display,
    Default,
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Deserialize,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CoverageMode {
    /// One min/max interval. A request inside a gap between two fetches is
    /// reported as covered.
    #[default]
    Widening,
    /// Disjoint intervals, merged when they overlap or touch.
    Exact,
}

/// Date intervals the cache holds authoritative data for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Coverage {
    Widening(Option<DateRange>),
    Exact(Vec<DateRange>),
}

impl Coverage {
    pub fn new(mode: CoverageMode) -> Self {
        match mode {
            CoverageMode::Widening => Self::Widening(None),
            CoverageMode::Exact => Self::Exact(Vec::new()),
        }
    }

    pub fn mode(&self) -> CoverageMode {
        match self {
            Self::Widening(_) => CoverageMode::Widening,
            Self::Exact(_) => CoverageMode::Exact,
        }
    }

    pub fn covers(&self, range: &DateRange) -> bool {
        match self {
            Self::Widening(covered) => covered.is_some_and(|covered| covered.covers(range)),
            Self::Exact(spans) => spans.iter().any(|span| span.covers(range)),
        }
    }

    pub fn insert(&mut self, range: DateRange) {
        match self {
            Self::Widening(covered) => {
                *covered = Some(match covered {
                    Some(covered) => covered.union(&range),
                    None => range,
                });
            }
            Self::Exact(spans) => {
                let mut merged = range;
                spans.retain(|span| {
                    if span.touches(&merged) {
                        merged = merged.union(span);
                        false
                    } else {
                        true
                    }
                });

                let at = spans.partition_point(|span| span.end() < merged.start());
                spans.insert(at, merged);
            }
        }
    }

    pub fn clear(&mut self) {
        match self {
            Self::Widening(covered) => *covered = None,
            Self::Exact(spans) => spans.clear(),
        }
    }

    /// Outer bounds of everything covered.
    pub fn bounds(&self) -> Option<DateRange> {
        match self {
            Self::Widening(covered) => *covered,
            Self::Exact(spans) => match (spans.first(), spans.last()) {
                (Some(first), Some(last)) => Some(first.union(last)),
                _ => None,
            },
        }
    }

    pub fn spans(&self) -> &[DateRange] {
        match self {
            Self::Widening(covered) => covered.as_slice(),
            Self::Exact(spans) => spans,
        }
    }
}
