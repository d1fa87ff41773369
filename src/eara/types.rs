use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Incidence {
    Low,
    Medium,
    High,
}

impl Incidence {
    /// 解析题目的考试权重等级，同时接受平台使用的葡语标签。
    /// `none` / `nenhuma` 视为未设置。
    pub fn parse_label(raw: &str) -> Result<Option<Self>, String> {
        match raw.trim().to_lowercase().as_str() {
            "" | "none" | "nenhuma" => Ok(None),
            "low" | "baixa" => Ok(Some(Self::Low)),
            "medium" | "media" | "média" => Ok(Some(Self::Medium)),
            "high" | "alta" => Ok(Some(Self::High)),
            other => Err(format!("unknown incidence label '{other}'")),
        }
    }
}

fn deserialize_incidence<'de, D>(deserializer: D) -> Result<Option<Incidence>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw {
        None => Ok(None),
        Some(label) => Incidence::parse_label(&label).map_err(serde::de::Error::custom),
    }
}

fn default_priority() -> i32 {
    3
}

/// Base study unit handed in by the plan-assignment workflow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Topic {
    pub id: String,
    pub discipline: String,
    pub subject: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Minutes.
    pub duration: i64,
    #[serde(default, deserialize_with = "deserialize_incidence")]
    pub incidence: Option<Incidence>,
    #[serde(default = "default_priority")]
    pub priority: i32,
}

/// Phase of the EARA cycle a derived session belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum CycleTag {
    Study,
    Practice,
    /// 1-based review cycle number.
    Review(u8),
    /// Placeholder added for a pinned discipline.
    Pinned,
}

impl CycleTag {
    pub fn is_review(&self) -> bool {
        matches!(self, Self::Review(_))
    }

    pub fn parse_label(raw: &str) -> Option<Self> {
        match raw {
            "study" => Some(Self::Study),
            "practice" => Some(Self::Practice),
            "pinned" => Some(Self::Pinned),
            other => other
                .strip_prefix("review")
                .and_then(|n| n.parse::<u8>().ok())
                .filter(|n| *n >= 1)
                .map(Self::Review),
        }
    }
}

impl fmt::Display for CycleTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Study => f.write_str("study"),
            Self::Practice => f.write_str("practice"),
            Self::Review(n) => write!(f, "review{n}"),
            Self::Pinned => f.write_str("pinned"),
        }
    }
}

impl From<CycleTag> for String {
    fn from(tag: CycleTag) -> Self {
        tag.to_string()
    }
}

impl TryFrom<String> for CycleTag {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse_label(&value).ok_or_else(|| format!("unknown cycle tag '{value}'"))
    }
}

/// Inclusive day-offset range relative to the predecessor's resolved date.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OffsetWindow {
    pub min: u32,
    pub max: u32,
}

impl OffsetWindow {
    pub const fn new(min: u32, max: u32) -> Self {
        Self { min, max }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DerivedSession {
    /// `{topicId}:{cycleTag}`
    pub id: String,
    pub topic_id: String,
    pub discipline: String,
    pub subject: String,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    pub incidence: Option<Incidence>,
    pub priority: i32,
    pub duration: i64,
    pub sequence_index: u32,
    pub cycle_tag: CycleTag,
    /// None for the Study session itself.
    pub origin_topic_id: Option<String>,
    pub group_key: String,
    /// Cycle whose resolved date anchors `offset_window`.
    pub reference_tag: Option<CycleTag>,
    pub offset_window: Option<OffsetWindow>,
    #[serde(default)]
    pub pinned: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalendarEntry {
    pub date: NaiveDate,
    pub session: DerivedSession,
    /// 1-based placement ordinal, distinct from `sequence_index`.
    pub order_index: usize,
}

/// Non-fatal condition observed during a run. Logged and returned with the plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AdvisoryWarning {
    #[serde(rename_all = "camelCase")]
    HighIncidenceOverrepresented {
        high_count: usize,
        total: usize,
        ratio: f64,
    },
    #[serde(rename_all = "camelCase")]
    AlternationCeilingExceeded {
        date: NaiveDate,
        discipline: String,
        streak_minutes: i64,
        ceiling_minutes: i64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn incidence_accepts_portuguese_labels() {
        assert_eq!(Incidence::parse_label("alta"), Ok(Some(Incidence::High)));
        assert_eq!(Incidence::parse_label("Média"), Ok(Some(Incidence::Medium)));
        assert_eq!(Incidence::parse_label("baixa"), Ok(Some(Incidence::Low)));
        assert_eq!(Incidence::parse_label("nenhuma"), Ok(None));
        assert!(Incidence::parse_label("urgent").is_err());
    }

    #[test]
    fn topic_deserializes_with_defaults() {
        let topic: Topic = serde_json::from_str(
            r#"{"id":"t1","discipline":"Português","subject":"Crase","duration":45,"incidence":"alta","type":"teoria"}"#,
        )
        .unwrap();
        assert_eq!(topic.incidence, Some(Incidence::High));
        assert_eq!(topic.priority, 3);
        assert_eq!(topic.kind.as_deref(), Some("teoria"));

        let bare: Topic = serde_json::from_str(
            r#"{"id":"t2","discipline":"Direito","subject":"Prazos","duration":30}"#,
        )
        .unwrap();
        assert_eq!(bare.incidence, None);
    }

    #[test]
    fn cycle_tag_labels() {
        assert_eq!(CycleTag::Review(2).to_string(), "review2");
        assert_eq!(CycleTag::parse_label("review3"), Some(CycleTag::Review(3)));
        assert_eq!(CycleTag::parse_label("review0"), None);
        assert_eq!(CycleTag::parse_label("practice"), Some(CycleTag::Practice));

        let json = serde_json::to_string(&CycleTag::Review(1)).unwrap();
        assert_eq!(json, "\"review1\"");
        let back: CycleTag = serde_json::from_str(&json).unwrap();
        assert_eq!(back, CycleTag::Review(1));
    }

    #[test]
    fn warning_serializes_tagged_camel_case() {
        let warning = AdvisoryWarning::HighIncidenceOverrepresented {
            high_count: 4,
            total: 10,
            ratio: 0.4,
        };
        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(json["kind"], "highIncidenceOverrepresented");
        assert_eq!(json["highCount"], 4);
    }
}
