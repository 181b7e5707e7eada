use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::interest::rates::RateTable;
use crate::types::PauseRange;

/// the accrual timeline of one interest-bearing amount
#[derive(Debug, Clone, PartialEq)]
pub struct Timeline {
    /// date interest starts; anniversaries are counted from here
    pub anchor: NaiveDate,
    pub compounding: bool,
    pub follows_rate_table: bool,
    pub margin_from: Option<NaiveDate>,
    pub pauses: Vec<PauseRange>,
}

/// half-open sub-period [start, end) with a constant rate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodSpan {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub is_pause: bool,
    pub is_capitalization_point: bool,
}

impl PeriodSpan {
    /// calendar days in the half-open interval
    pub fn day_count(&self) -> u32 {
        (self.end - self.start).num_days().max(0) as u32
    }
}

/// anniversary of `anchor` in `year`; a 29 February anchor falls on
/// 28 February in common years
pub fn anniversary(anchor: NaiveDate, year: i32) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, anchor.month(), anchor.day())
        .or_else(|| NaiveDate::from_ymd_opt(year, anchor.month(), 28))
}

pub fn is_anniversary(anchor: NaiveDate, date: NaiveDate) -> bool {
    date > anchor && anniversary(anchor, date.year()) == Some(date)
}

/// splits timelines into constant-rate spans
pub struct PeriodSplitter<'a> {
    rates: &'a RateTable,
}

impl<'a> PeriodSplitter<'a> {
    pub fn new(rates: &'a RateTable) -> Self {
        Self { rates }
    }

    /// sorted, deduplicated boundary dates between `from` and `to` inclusive
    pub fn boundaries(&self, timeline: &Timeline, from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
        if from >= to {
            return Vec::new();
        }

        let inside = |d: NaiveDate| from < d && d < to;
        let mut dates = BTreeSet::from([from, to]);

        if timeline.follows_rate_table {
            dates.extend(self.rates.change_dates_between(from, to));
        }

        if timeline.compounding {
            let first_year = from.year().max(timeline.anchor.year() + 1);
            for year in first_year..=to.year() {
                if let Some(date) = anniversary(timeline.anchor, year) {
                    if inside(date) {
                        dates.insert(date);
                    }
                }
            }
        }

        for pause in &timeline.pauses {
            // pauses outside the range contribute nothing, partial overlaps are clipped
            for edge in [pause.start, pause.end] {
                if inside(edge) {
                    dates.insert(edge);
                }
            }
        }

        if let Some(margin_from) = timeline.margin_from {
            if inside(margin_from) {
                dates.insert(margin_from);
            }
        }

        dates.into_iter().collect()
    }

    /// consecutive half-open spans covering [from, to)
    pub fn split(&self, timeline: &Timeline, from: NaiveDate, to: NaiveDate) -> Vec<PeriodSpan> {
        self.boundaries(timeline, from, to)
            .windows(2)
            .filter(|pair| pair[0] < pair[1])
            .map(|pair| {
                let (start, end) = (pair[0], pair[1]);
                let is_pause = timeline.pauses.iter().any(|p| p.contains(start));
                PeriodSpan {
                    start,
                    end,
                    is_pause,
                    is_capitalization_point: timeline.compounding
                        && is_anniversary(timeline.anchor, end),
                }
            })
            .collect()
    }
}
