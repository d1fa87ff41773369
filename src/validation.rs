//! 排程输入校验
//! 题目列表、每日预算以及派生会话是否能放进单日预算，失败即返回 InputError。

use std::collections::HashSet;

use crate::constants::{MAX_PRIORITY, MINUTES_PER_DAY, MIN_PRIORITY};
use crate::eara::error::InputError;
use crate::eara::types::{DerivedSession, Topic};

/// 校验题目列表：非空、id 唯一、时长在 1..=1440、优先级 1..=5、学科名非空
pub fn validate_topics(topics: &[Topic]) -> Result<(), InputError> {
    if topics.is_empty() {
        return Err(InputError::EmptyTopics);
    }
    let mut seen: HashSet<&str> = HashSet::with_capacity(topics.len());
    for topic in topics {
        // 分配状态按 topic_id 记录参考日期，重复 id 会互相覆盖
        if !seen.insert(topic.id.as_str()) {
            return Err(InputError::DuplicateTopicId {
                topic_id: topic.id.clone(),
            });
        }
        if topic.duration <= 0 {
            return Err(InputError::NonPositiveDuration {
                topic_id: topic.id.clone(),
                duration: topic.duration,
            });
        }
        if topic.duration > MINUTES_PER_DAY {
            return Err(InputError::DurationTooLong {
                topic_id: topic.id.clone(),
                duration: topic.duration,
                max: MINUTES_PER_DAY,
            });
        }
        if !(MIN_PRIORITY..=MAX_PRIORITY).contains(&topic.priority) {
            return Err(InputError::PriorityOutOfRange {
                topic_id: topic.id.clone(),
                priority: topic.priority,
            });
        }
        if topic.discipline.trim().is_empty() {
            return Err(InputError::BlankDiscipline {
                topic_id: topic.id.clone(),
            });
        }
    }
    Ok(())
}

pub fn validate_budget(daily_budget_minutes: i64) -> Result<(), InputError> {
    if daily_budget_minutes <= 0 {
        return Err(InputError::NonPositiveBudget(daily_budget_minutes));
    }
    if daily_budget_minutes > MINUTES_PER_DAY {
        return Err(InputError::BudgetTooLarge {
            budget: daily_budget_minutes,
            max: MINUTES_PER_DAY,
        });
    }
    Ok(())
}

/// 单个会话超过每日预算时无法放置，直接拒绝而不是静默丢弃
pub fn validate_sessions_fit_budget(
    sessions: &[DerivedSession],
    daily_budget_minutes: i64,
) -> Result<(), InputError> {
    match sessions
        .iter()
        .find(|s| s.duration > daily_budget_minutes)
    {
        Some(session) => Err(InputError::SessionExceedsBudget {
            session_id: session.id.clone(),
            duration: session.duration,
            budget: daily_budget_minutes,
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eara::config::ScheduleConfig;
    use crate::eara::sequence::expand;

    fn topic(duration: i64, priority: i32) -> Topic {
        topic_with_id("t1", duration, priority)
    }

    fn topic_with_id(id: &str, duration: i64, priority: i32) -> Topic {
        Topic {
            id: id.to_string(),
            discipline: "Direito".to_string(),
            subject: "Prazos".to_string(),
            kind: None,
            duration,
            incidence: None,
            priority,
        }
    }

    #[test]
    fn topic_rules() {
        assert_eq!(validate_topics(&[]), Err(InputError::EmptyTopics));
        assert!(validate_topics(&[topic(60, 3)]).is_ok());
        assert!(matches!(
            validate_topics(&[topic(0, 3)]),
            Err(InputError::NonPositiveDuration { duration: 0, .. })
        ));
        assert!(matches!(
            validate_topics(&[topic(60, 6)]),
            Err(InputError::PriorityOutOfRange { priority: 6, .. })
        ));
        assert!(matches!(
            validate_topics(&[topic(i64::MAX, 3)]),
            Err(InputError::DurationTooLong { max: 1440, .. })
        ));
        assert!(validate_topics(&[topic(MINUTES_PER_DAY, 3)]).is_ok());

        let mut other_subject = topic_with_id("t", 45, 3);
        other_subject.discipline = "Português".to_string();
        assert_eq!(
            validate_topics(&[topic_with_id("t", 60, 3), other_subject]),
            Err(InputError::DuplicateTopicId {
                topic_id: "t".to_string()
            })
        );
        assert!(validate_topics(&[topic_with_id("a", 60, 3), topic_with_id("b", 60, 3)]).is_ok());

        let mut blank = topic(60, 3);
        blank.discipline = "   ".to_string();
        assert!(matches!(
            validate_topics(&[blank]),
            Err(InputError::BlankDiscipline { .. })
        ));
    }

    #[test]
    fn budget_rules() {
        assert!(validate_budget(1).is_ok());
        assert_eq!(validate_budget(0), Err(InputError::NonPositiveBudget(0)));
        assert!(validate_budget(MINUTES_PER_DAY).is_ok());
        assert_eq!(
            validate_budget(i64::MAX),
            Err(InputError::BudgetTooLarge {
                budget: i64::MAX,
                max: MINUTES_PER_DAY
            })
        );
    }

    #[test]
    fn oversized_session_is_rejected() {
        let sessions = expand(&topic(120, 3), &ScheduleConfig::default());
        assert!(validate_sessions_fit_budget(&sessions, 120).is_ok());
        assert!(matches!(
            validate_sessions_fit_budget(&sessions, 90),
            Err(InputError::SessionExceedsBudget { duration: 120, budget: 90, .. })
        ));
    }
}
