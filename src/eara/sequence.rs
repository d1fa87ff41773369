//! 将一个基础题目展开为 E-A-R-R-R 派生会话组

use crate::constants::{MIN_PRACTICE_MINUTES, MIN_REVIEW_MINUTES};
use crate::eara::config::ScheduleConfig;
use crate::eara::types::{CycleTag, DerivedSession, OffsetWindow, Topic};

fn fold_diacritic(ch: char) -> char {
    match ch {
        'á' | 'à' | 'â' | 'ã' | 'ä' => 'a',
        'é' | 'è' | 'ê' | 'ë' => 'e',
        'í' | 'ì' | 'î' | 'ï' => 'i',
        'ó' | 'ò' | 'ô' | 'õ' | 'ö' => 'o',
        'ú' | 'ù' | 'û' | 'ü' => 'u',
        'ç' => 'c',
        'ñ' => 'n',
        other => other,
    }
}

/// Lowercase, fold accents, and collapse every run of separators into a single `_`.
pub fn normalize_key(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_sep = false;
    for ch in raw.chars().flat_map(char::to_lowercase).map(fold_diacritic) {
        if ch.is_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(ch);
        } else {
            pending_sep = true;
        }
    }
    out
}

pub fn group_key(discipline: &str, subject: &str) -> String {
    normalize_key(&format!("{discipline}_{subject}"))
}

fn scaled_duration(study_minutes: i64, percent: u32, floor: i64) -> i64 {
    let scaled = (study_minutes as f64 * percent as f64 / 100.0).round() as i64;
    scaled.max(floor)
}

struct Phase {
    tag: CycleTag,
    sequence_index: u32,
    duration: i64,
    window: Option<OffsetWindow>,
}

fn phases_for(topic: &Topic, config: &ScheduleConfig) -> Vec<Phase> {
    let mut phases = Vec::with_capacity(2 + config.review_cycles());

    if config.phases.study {
        phases.push(Phase {
            tag: CycleTag::Study,
            sequence_index: 1,
            duration: topic.duration,
            window: None,
        });
    }
    if config.phases.practice {
        phases.push(Phase {
            tag: CycleTag::Practice,
            sequence_index: 2,
            duration: scaled_duration(
                topic.duration,
                config.durations.practice_percent,
                MIN_PRACTICE_MINUTES,
            ),
            window: Some(config.intervals.practice),
        });
    }
    if config.phases.review {
        let review_minutes = scaled_duration(
            topic.duration,
            config.durations.review_percent,
            MIN_REVIEW_MINUTES,
        );
        for (i, window) in config.intervals.reviews.iter().enumerate() {
            let cycle = i as u32 + 1;
            phases.push(Phase {
                tag: CycleTag::Review(cycle as u8),
                sequence_index: 2 + cycle,
                duration: review_minutes,
                window: Some(*window),
            });
        }
    }

    phases
}

/// Expands one topic into its ordered session group. Pure; inputs are assumed validated.
pub fn expand(topic: &Topic, config: &ScheduleConfig) -> Vec<DerivedSession> {
    let key = group_key(&topic.discipline, &topic.subject);
    let mut previous: Option<CycleTag> = None;

    phases_for(topic, config)
        .into_iter()
        .map(|phase| {
            // 组内第一个会话没有前驱，也就没有偏移窗口
            let (reference_tag, offset_window) = match previous {
                Some(tag) => (Some(tag), phase.window),
                None => (None, None),
            };
            previous = Some(phase.tag);

            DerivedSession {
                id: format!("{}:{}", topic.id, phase.tag),
                topic_id: topic.id.clone(),
                discipline: topic.discipline.clone(),
                subject: topic.subject.clone(),
                kind: topic.kind.clone(),
                incidence: topic.incidence,
                priority: topic.priority,
                duration: phase.duration,
                sequence_index: phase.sequence_index,
                cycle_tag: phase.tag,
                origin_topic_id: match phase.tag {
                    CycleTag::Study => None,
                    _ => Some(topic.id.clone()),
                },
                group_key: key.clone(),
                reference_tag,
                offset_window,
                pinned: false,
            }
        })
        .collect()
}

pub fn expand_all(topics: &[Topic], config: &ScheduleConfig) -> Vec<DerivedSession> {
    topics.iter().flat_map(|t| expand(t, config)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::eara::types::Incidence;

    fn topic(duration: i64) -> Topic {
        Topic {
            id: "t1".to_string(),
            discipline: "Direito Constitucional".to_string(),
            subject: "Princípios".to_string(),
            kind: None,
            duration,
            incidence: Some(Incidence::High),
            priority: 5,
        }
    }

    #[test]
    fn normalizes_group_keys() {
        assert_eq!(
            group_key("Direito Constitucional", "Princípios"),
            "direito_constitucional_principios"
        );
        assert_eq!(normalize_key("  Língua -- Portuguesa!! "), "lingua_portuguesa");
        assert_eq!(normalize_key("Ação"), "acao");
    }

    #[test]
    fn expands_full_cycle() {
        let sessions = expand(&topic(120), &ScheduleConfig::default());
        let tags: Vec<String> = sessions.iter().map(|s| s.cycle_tag.to_string()).collect();
        assert_eq!(tags, ["study", "practice", "review1", "review2", "review3"]);

        let seq: Vec<u32> = sessions.iter().map(|s| s.sequence_index).collect();
        assert_eq!(seq, [1, 2, 3, 4, 5]);

        let durations: Vec<i64> = sessions.iter().map(|s| s.duration).collect();
        assert_eq!(durations, [120, 60, 36, 36, 36]);

        assert!(sessions[0].origin_topic_id.is_none());
        assert!(sessions[0].offset_window.is_none());
        assert!(sessions[1..]
            .iter()
            .all(|s| s.origin_topic_id.as_deref() == Some("t1")));
        assert!(sessions
            .iter()
            .all(|s| s.group_key == "direito_constitucional_principios"));
    }

    #[test]
    fn references_point_at_the_preceding_cycle() {
        let sessions = expand(&topic(120), &ScheduleConfig::default());
        assert_eq!(sessions[1].reference_tag, Some(CycleTag::Study));
        assert_eq!(sessions[2].reference_tag, Some(CycleTag::Practice));
        assert_eq!(sessions[3].reference_tag, Some(CycleTag::Review(1)));
        assert_eq!(sessions[4].reference_tag, Some(CycleTag::Review(2)));
        assert_eq!(sessions[3].offset_window, Some(OffsetWindow::new(7, 14)));
    }

    #[test]
    fn short_topics_hit_duration_floors() {
        let sessions = expand(&topic(20), &ScheduleConfig::default());
        assert_eq!(sessions[1].duration, MIN_PRACTICE_MINUTES);
        assert!(sessions[2..].iter().all(|s| s.duration == MIN_REVIEW_MINUTES));
    }

    #[test]
    fn disabled_practice_links_review_to_study() {
        let mut cfg = ScheduleConfig::default();
        cfg.phases.practice = false;
        let sessions = expand(&topic(60), &cfg);
        assert_eq!(sessions.len(), 4);
        assert_eq!(sessions[1].cycle_tag, CycleTag::Review(1));
        assert_eq!(sessions[1].sequence_index, 3);
        assert_eq!(sessions[1].reference_tag, Some(CycleTag::Study));
    }

    #[test]
    fn disabled_study_leaves_practice_unanchored() {
        let mut cfg = ScheduleConfig::default();
        cfg.phases.study = false;
        let sessions = expand(&topic(60), &cfg);
        assert_eq!(sessions[0].cycle_tag, CycleTag::Practice);
        assert!(sessions[0].offset_window.is_none());
        assert!(sessions[0].reference_tag.is_none());
    }
}
