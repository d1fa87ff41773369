use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum InputError {
    #[error("topic list is empty")]
    EmptyTopics,
    #[error("topic {topic_id}: duration must be > 0 minutes, got {duration}")]
    NonPositiveDuration { topic_id: String, duration: i64 },
    #[error("topic {topic_id}: duration must be at most {max} minutes, got {duration}")]
    DurationTooLong {
        topic_id: String,
        duration: i64,
        max: i64,
    },
    #[error("topic id {topic_id} appears more than once")]
    DuplicateTopicId { topic_id: String },
    #[error("topic {topic_id}: priority must be in 1..=5, got {priority}")]
    PriorityOutOfRange { topic_id: String, priority: i32 },
    #[error("topic {topic_id}: discipline must not be blank")]
    BlankDiscipline { topic_id: String },
    #[error("valid weekday set is empty")]
    EmptyWeekdays,
    #[error("weekday index {0} is outside 0..=6 (0 = Sunday)")]
    InvalidWeekday(u8),
    #[error("daily budget must be > 0 minutes, got {0}")]
    NonPositiveBudget(i64),
    #[error("daily budget must be at most {max} minutes, got {budget}")]
    BudgetTooLarge { budget: i64, max: i64 },
    #[error("session {session_id} needs {duration} min, more than the daily budget of {budget} min")]
    SessionExceedsBudget {
        session_id: String,
        duration: i64,
        budget: i64,
    },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid schedule config: {0}")]
    Invalid(String),
    #[error("failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid input: {0}")]
    Input(#[from] InputError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("no eligible weekday within {window_days} days from {from}")]
    NoEligibleWeekday { from: NaiveDate, window_days: i64 },
    #[error("date {from} + {days} days is outside the supported calendar range")]
    DateOutOfRange { from: NaiveDate, days: i64 },
    #[error("schedule validation failed: {}", .0.join("; "))]
    Validation(Vec<String>),
}
