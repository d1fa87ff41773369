use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::eara::types::CalendarEntry;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DayLoad {
    pub date: NaiveDate,
    pub total_minutes: i64,
    pub pinned_minutes: i64,
    pub session_count: usize,
}

/// 日历快照统计，供仪表盘按日/学科/阶段展示
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleSummary {
    pub total_sessions: usize,
    pub total_minutes: i64,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub days: Vec<DayLoad>,
    pub minutes_by_discipline: BTreeMap<String, i64>,
    pub sessions_by_cycle: BTreeMap<String, usize>,
}

impl ScheduleSummary {
    pub fn from_entries(entries: &[CalendarEntry]) -> Self {
        let mut days: BTreeMap<NaiveDate, DayLoad> = BTreeMap::new();
        let mut summary = Self::default();

        for entry in entries {
            let minutes = entry.session.duration;
            summary.total_sessions += 1;
            summary.total_minutes += minutes;

            let day = days.entry(entry.date).or_insert_with(|| DayLoad {
                date: entry.date,
                total_minutes: 0,
                pinned_minutes: 0,
                session_count: 0,
            });
            day.total_minutes += minutes;
            day.session_count += 1;
            if entry.session.pinned {
                day.pinned_minutes += minutes;
            }

            *summary
                .minutes_by_discipline
                .entry(entry.session.discipline.clone())
                .or_default() += minutes;
            *summary
                .sessions_by_cycle
                .entry(entry.session.cycle_tag.to_string())
                .or_default() += 1;
        }

        summary.first_date = days.keys().next().copied();
        summary.last_date = days.keys().next_back().copied();
        summary.days = days.into_values().collect();
        summary
    }

    pub fn busiest_day(&self) -> Option<&DayLoad> {
        self.days.iter().max_by_key(|d| (d.total_minutes, std::cmp::Reverse(d.date)))
    }

    /// Days whose non-pinned load exceeds the budget. Empty for any calendar the distributor produced.
    pub fn days_over_budget(&self, budget: i64) -> Vec<NaiveDate> {
        self.days
            .iter()
            .filter(|d| d.total_minutes - d.pinned_minutes > budget)
            .map(|d| d.date)
            .collect()
    }
}
