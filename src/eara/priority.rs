use std::cmp::Ordering;

use crate::eara::types::{AdvisoryWarning, DerivedSession, Incidence, Topic};

pub fn incidence_factor(incidence: Option<Incidence>) -> u32 {
    match incidence.unwrap_or(Incidence::Medium) {
        Incidence::High => 3,
        Incidence::Medium => 2,
        Incidence::Low => 1,
    }
}

/// Ranking weight, used for ordering only.
pub fn weight(session: &DerivedSession) -> u32 {
    incidence_factor(session.incidence) * session.priority.max(0) as u32
}

fn schedule_order(a: &DerivedSession, b: &DerivedSession) -> Ordering {
    weight(b)
        .cmp(&weight(a))
        .then(a.sequence_index.cmp(&b.sequence_index))
}

/// Weight descending, then `sequence_index` ascending. Stable, so equal keys keep input order.
pub fn order_sessions(sessions: &mut [DerivedSession]) {
    sessions.sort_by(schedule_order);
}

pub fn high_incidence_warning(topics: &[Topic], threshold: f64) -> Option<AdvisoryWarning> {
    if topics.is_empty() {
        return None;
    }
    let high_count = topics
        .iter()
        .filter(|t| t.incidence == Some(Incidence::High))
        .count();
    let ratio = high_count as f64 / topics.len() as f64;
    if ratio > threshold {
        tracing::warn!(
            high_count,
            total = topics.len(),
            ratio,
            "High-incidence topics are overrepresented"
        );
        Some(AdvisoryWarning::HighIncidenceOverrepresented {
            high_count,
            total: topics.len(),
            ratio,
        })
    } else {
        None
    }
}
