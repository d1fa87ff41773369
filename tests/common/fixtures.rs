use chrono::NaiveDate;

use eara_planner::eara::config::{PinnedDiscipline, ScheduleConfig};
use eara_planner::eara::engine::{PlanEngine, PlanRequest};
use eara_planner::eara::types::{Incidence, Topic};

/// 2024-03-04 is a Monday.
pub fn monday() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 3, 4).expect("valid date")
}

pub fn topic(
    id: &str,
    discipline: &str,
    subject: &str,
    duration: i64,
    incidence: Option<Incidence>,
    priority: i32,
) -> Topic {
    Topic {
        id: id.to_string(),
        discipline: discipline.to_string(),
        subject: subject.to_string(),
        kind: None,
        duration,
        incidence,
        priority,
    }
}

pub fn constitutional_principles() -> Topic {
    topic(
        "dc-principios",
        "Direito Constitucional",
        "Princípios",
        120,
        Some(Incidence::High),
        5,
    )
}

pub fn weekday_request(topics: Vec<Topic>) -> PlanRequest {
    PlanRequest {
        topics,
        start_date: monday(),
        daily_budget_minutes: 240,
        valid_weekdays: vec![1, 2, 3, 4, 5],
        seed: 42,
        outcomes: vec![],
    }
}

pub fn default_engine() -> PlanEngine {
    PlanEngine::new(ScheduleConfig::default()).expect("default config is valid")
}

pub fn engine_with_pinned(discipline: &str, daily_minutes: i64, weekdays: Vec<u8>) -> PlanEngine {
    let config = ScheduleConfig {
        pinned: vec![PinnedDiscipline {
            discipline: discipline.to_string(),
            daily_minutes,
            weekdays,
        }],
        ..ScheduleConfig::default()
    };
    PlanEngine::new(config).expect("pinned config is valid")
}
