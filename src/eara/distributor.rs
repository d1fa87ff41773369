//! 日历分配：按权重顺序为每个派生会话确定具体日期
//!
//! 游标只会向前移动。每次放置都受每日预算、可学习日和组内前驱偏移窗口约束。

use std::collections::HashMap;

use chrono::{Datelike, Duration, NaiveDate};
use rand::Rng;

use crate::constants::WEEKDAY_SEARCH_WINDOW_DAYS;
use crate::eara::config::ScheduleConfig;
use crate::eara::error::{EngineError, InputError};
use crate::eara::pacing::AdaptivePacer;
use crate::eara::priority::order_sessions;
use crate::eara::types::{AdvisoryWarning, CalendarEntry, CycleTag, DerivedSession};

fn add_days(from: NaiveDate, days: i64) -> Result<NaiveDate, EngineError> {
    from.checked_add_signed(Duration::days(days))
        .ok_or(EngineError::DateOutOfRange { from, days })
}

/// Set of study weekdays, indexed 0 = Sunday .. 6 = Saturday.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekdaySet([bool; 7]);

impl WeekdaySet {
    pub fn from_indices(indices: &[u8]) -> Result<Self, InputError> {
        if indices.is_empty() {
            return Err(InputError::EmptyWeekdays);
        }
        let mut days = [false; 7];
        for &idx in indices {
            let slot = days
                .get_mut(idx as usize)
                .ok_or(InputError::InvalidWeekday(idx))?;
            *slot = true;
        }
        Ok(Self(days))
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.0[date.weekday().num_days_from_sunday() as usize]
    }

    pub fn indices(&self) -> Vec<u8> {
        (0..7u8).filter(|i| self.0[*i as usize]).collect()
    }

    /// First study day `>= from`, searching at most [`WEEKDAY_SEARCH_WINDOW_DAYS`] days.
    pub fn next_on_or_after(&self, from: NaiveDate) -> Result<NaiveDate, EngineError> {
        for offset in 0..WEEKDAY_SEARCH_WINDOW_DAYS {
            let date = add_days(from, offset)?;
            if self.contains(date) {
                return Ok(date);
            }
        }
        Err(EngineError::NoEligibleWeekday {
            from,
            window_days: WEEKDAY_SEARCH_WINDOW_DAYS,
        })
    }

    /// First study day strictly after `date`.
    pub fn next_after(&self, date: NaiveDate) -> Result<NaiveDate, EngineError> {
        self.next_on_or_after(add_days(date, 1)?)
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DistributionParams<'a> {
    pub start_date: NaiveDate,
    pub daily_budget_minutes: i64,
    pub weekdays: &'a WeekdaySet,
    pub config: &'a ScheduleConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Distribution {
    pub entries: Vec<CalendarEntry>,
    pub warnings: Vec<AdvisoryWarning>,
}

/// Cursor and reference dates for one run. Never shared between runs.
#[derive(Debug)]
pub struct DistributionState {
    current_date: NaiveDate,
    minutes_used_today: i64,
    last_discipline: Option<String>,
    minutes_on_last_discipline: i64,
    reference_dates: HashMap<String, HashMap<CycleTag, NaiveDate>>,
    entries: Vec<CalendarEntry>,
    warnings: Vec<AdvisoryWarning>,
}

impl DistributionState {
    pub fn new(start_date: NaiveDate, weekdays: &WeekdaySet) -> Result<Self, EngineError> {
        Ok(Self {
            current_date: weekdays.next_on_or_after(start_date)?,
            minutes_used_today: 0,
            last_discipline: None,
            minutes_on_last_discipline: 0,
            reference_dates: HashMap::new(),
            entries: Vec::new(),
            warnings: Vec::new(),
        })
    }

    pub fn current_date(&self) -> NaiveDate {
        self.current_date
    }

    pub fn minutes_used_today(&self) -> i64 {
        self.minutes_used_today
    }

    fn start_fresh_day(&mut self, date: NaiveDate) {
        self.current_date = date;
        self.minutes_used_today = 0;
        self.last_discipline = None;
        self.minutes_on_last_discipline = 0;
    }

    fn reference_date(&self, topic_id: &str, tag: CycleTag) -> Option<NaiveDate> {
        self.reference_dates
            .get(topic_id)
            .and_then(|dates| dates.get(&tag))
            .copied()
    }

    fn place(&mut self, session: DerivedSession) {
        self.minutes_used_today += session.duration;
        if self.last_discipline.as_deref() == Some(session.discipline.as_str()) {
            self.minutes_on_last_discipline += session.duration;
        } else {
            self.last_discipline = Some(session.discipline.clone());
            self.minutes_on_last_discipline = session.duration;
        }
        self.reference_dates
            .entry(session.topic_id.clone())
            .or_default()
            .insert(session.cycle_tag, self.current_date);

        let order_index = self.entries.len() + 1;
        tracing::debug!(
            session_id = %session.id,
            date = %self.current_date,
            order_index,
            minutes_used_today = self.minutes_used_today,
            "Session placed"
        );
        self.entries.push(CalendarEntry {
            date: self.current_date,
            session,
            order_index,
        });
    }

    pub fn finish(self) -> Distribution {
        Distribution {
            entries: self.entries,
            warnings: self.warnings,
        }
    }
}

/// Earliest date allowed by the session's offset window, or None when it has no predecessor.
/// Fails when the offset walks off the end of the calendar.
fn earliest_permissible<R: Rng + ?Sized>(
    state: &DistributionState,
    session: &DerivedSession,
    pacer: Option<&mut AdaptivePacer>,
    rng: &mut R,
) -> Result<Option<NaiveDate>, EngineError> {
    let (window, reference_tag) = match (session.offset_window, session.reference_tag) {
        (Some(window), Some(tag)) => (window, tag),
        _ => return Ok(None),
    };
    let Some(reference) = state.reference_date(&session.topic_id, reference_tag) else {
        tracing::warn!(
            session_id = %session.id,
            reference = %reference_tag,
            "Reference session not placed yet, ignoring offset window"
        );
        return Ok(None);
    };

    let window = match pacer {
        Some(pacer) if session.cycle_tag.is_review() => {
            pacer.resolve_window(&session.group_key, window)
        }
        _ => window,
    };
    let offset = rng.gen_range(window.min..=window.max);
    add_days(reference, offset as i64).map(Some)
}

/// Places every session on the calendar, one placement per session.
pub fn distribute<R: Rng + ?Sized>(
    sessions: &[DerivedSession],
    params: &DistributionParams<'_>,
    mut pacer: Option<&mut AdaptivePacer>,
    rng: &mut R,
) -> Result<Distribution, EngineError> {
    let mut ordered = sessions.to_vec();
    order_sessions(&mut ordered);

    let weekdays = params.weekdays;
    let budget = params.daily_budget_minutes;
    let ceiling = params.config.alternation.max_minutes;
    let mut state = DistributionState::new(params.start_date, weekdays)?;

    for session in ordered {
        // 1. 前驱日期 + 随机偏移
        if let Some(earliest) = earliest_permissible(&state, &session, pacer.as_deref_mut(), rng)? {
            // 2. 向前跳转总是开启新的一天
            if earliest > state.current_date {
                let target = weekdays.next_on_or_after(earliest)?;
                state.start_fresh_day(target);
            }
        }

        // 3. 交替检查：仅提示，不重排队列
        if state.last_discipline.as_deref() == Some(session.discipline.as_str()) {
            let streak = state.minutes_on_last_discipline + session.duration;
            if streak > ceiling {
                tracing::warn!(
                    date = %state.current_date,
                    discipline = %session.discipline,
                    streak,
                    ceiling,
                    "Alternation ceiling exceeded"
                );
                state.warnings.push(AdvisoryWarning::AlternationCeilingExceeded {
                    date: state.current_date,
                    discipline: session.discipline.clone(),
                    streak_minutes: streak,
                    ceiling_minutes: ceiling,
                });
            }
        }

        // 4. 预算检查
        if state.minutes_used_today + session.duration > budget {
            let next = weekdays.next_after(state.current_date)?;
            state.start_fresh_day(next);
        }

        // 5. 放置
        state.place(session);
    }

    let distribution = state.finish();
    tracing::info!(
        sessions = distribution.entries.len(),
        warnings = distribution.warnings.len(),
        first_date = ?distribution.entries.first().map(|e| e.date),
        last_date = ?distribution.entries.last().map(|e| e.date),
        "Distribution complete"
    );
    Ok(distribution)
}
