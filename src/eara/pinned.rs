//! 固定学科注入：每个已排程日补上缺失的固定学科占位会话。
//!
//! 只增不删，不检查每日预算，固定学科较多时可能超出当日预算。

use std::collections::{BTreeMap, HashSet};

use chrono::{Datelike, NaiveDate};

use crate::constants::PINNED_GROUP_PREFIX;
use crate::eara::config::PinnedDiscipline;
use crate::eara::sequence::normalize_key;
use crate::eara::types::{CalendarEntry, CycleTag, DerivedSession};

fn applies_on(pinned: &PinnedDiscipline, date: NaiveDate) -> bool {
    pinned.weekdays.is_empty()
        || pinned
            .weekdays
            .contains(&(date.weekday().num_days_from_sunday() as u8))
}

fn placeholder(pinned: &PinnedDiscipline, date: NaiveDate) -> DerivedSession {
    let key = normalize_key(&pinned.discipline);
    let id = format!("{PINNED_GROUP_PREFIX}:{key}:{date}");
    DerivedSession {
        id: id.clone(),
        topic_id: id,
        discipline: pinned.discipline.clone(),
        subject: pinned.discipline.clone(),
        kind: None,
        incidence: None,
        priority: 0,
        duration: pinned.daily_minutes,
        sequence_index: 1,
        cycle_tag: CycleTag::Pinned,
        origin_topic_id: None,
        group_key: format!("{PINNED_GROUP_PREFIX}_{key}"),
        reference_tag: None,
        offset_window: None,
        pinned: true,
    }
}

/// Adds missing pinned disciplines to every scheduled date. Returns how many were added.
///
/// Placeholders go right after the last entry of their date; `order_index` is then
/// renumbered from 1 keeping the relative order of existing entries.
pub fn inject(calendar: &mut Vec<CalendarEntry>, pinned: &[PinnedDiscipline]) -> usize {
    if calendar.is_empty() || pinned.is_empty() {
        return 0;
    }

    let mut last_position: BTreeMap<NaiveDate, usize> = BTreeMap::new();
    let mut present: BTreeMap<NaiveDate, HashSet<String>> = BTreeMap::new();
    for (pos, entry) in calendar.iter().enumerate() {
        last_position.insert(entry.date, pos);
        present
            .entry(entry.date)
            .or_default()
            .insert(normalize_key(&entry.session.discipline));
    }

    let mut additions: BTreeMap<usize, Vec<DerivedSession>> = BTreeMap::new();
    let mut added = 0;
    for (date, pos) in &last_position {
        let disciplines = present.get(date);
        for p in pinned {
            let key = normalize_key(&p.discipline);
            let already = disciplines.is_some_and(|set| set.contains(&key));
            if already || !applies_on(p, *date) {
                continue;
            }
            additions.entry(*pos).or_default().push(placeholder(p, *date));
            added += 1;
        }
    }

    if added == 0 {
        return 0;
    }

    let existing = std::mem::take(calendar);
    calendar.reserve(existing.len() + added);
    for (pos, entry) in existing.into_iter().enumerate() {
        let date = entry.date;
        calendar.push(entry);
        if let Some(sessions) = additions.remove(&pos) {
            calendar.extend(sessions.into_iter().map(|session| CalendarEntry {
                date,
                session,
                order_index: 0,
            }));
        }
    }
    for (i, entry) in calendar.iter_mut().enumerate() {
        entry.order_index = i + 1;
    }

    tracing::info!(added, days = last_position.len(), "Pinned disciplines injected");
    added
}
