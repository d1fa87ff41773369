use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::constants::{HIGH_INCIDENCE_WARN_RATIO, MAX_OFFSET_WINDOW_DAYS, MINUTES_PER_DAY};
use crate::eara::error::ConfigError;
use crate::eara::types::OffsetWindow;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhaseFlags {
    #[serde(alias = "estudo")]
    pub study: bool,
    #[serde(alias = "aplicacao")]
    pub practice: bool,
    #[serde(alias = "revisao")]
    pub review: bool,
}

impl Default for PhaseFlags {
    fn default() -> Self {
        Self {
            study: true,
            practice: true,
            review: true,
        }
    }
}

/// Practice / Review durations as a percentage of the Study duration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationConfig {
    #[serde(alias = "aplicacaoPercent")]
    pub practice_percent: u32,
    #[serde(alias = "revisaoPercent")]
    pub review_percent: u32,
}

impl Default for DurationConfig {
    fn default() -> Self {
        Self {
            practice_percent: 50,
            review_percent: 30,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntervalConfig {
    /// Window of Practice relative to Study. `[0,0]` keeps it on the Study day when budget allows.
    #[serde(default = "default_practice_window")]
    pub practice: OffsetWindow,
    /// One window per review cycle; its length is the number of cycles.
    #[serde(alias = "revisoes")]
    pub reviews: Vec<OffsetWindow>,
}

fn default_practice_window() -> OffsetWindow {
    OffsetWindow::new(0, 0)
}

impl Default for IntervalConfig {
    fn default() -> Self {
        Self {
            practice: default_practice_window(),
            reviews: vec![
                OffsetWindow::new(1, 3),
                OffsetWindow::new(7, 14),
                OffsetWindow::new(14, 30),
            ],
        }
    }
}

/// Alternation bounds in minutes. Only the ceiling is evaluated during distribution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlternationConfig {
    #[serde(alias = "intervaloMinimo")]
    pub min_minutes: i64,
    #[serde(alias = "intervaloMaximo")]
    pub max_minutes: i64,
}

impl Default for AlternationConfig {
    fn default() -> Self {
        Self {
            min_minutes: 30,
            max_minutes: 120,
        }
    }
}

/// Accuracy thresholds are percentages in `[0,100]`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdaptationConfig {
    #[serde(alias = "acelerarSeAcima")]
    pub accelerate_above: f64,
    #[serde(alias = "desacelerarSeAbaixo")]
    pub decelerate_below: f64,
    #[serde(alias = "ajustePercentual")]
    pub adjust_percent: f64,
    /// Number of trailing outcomes averaged per group.
    #[serde(default = "default_adaptation_window")]
    pub window_size: usize,
}

fn default_adaptation_window() -> usize {
    3
}

impl Default for AdaptationConfig {
    fn default() -> Self {
        Self {
            accelerate_above: 85.0,
            decelerate_below: 60.0,
            adjust_percent: 20.0,
            window_size: default_adaptation_window(),
        }
    }
}

/// Discipline that recurs on every scheduled day regardless of weight.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PinnedDiscipline {
    #[serde(alias = "disciplina")]
    pub discipline: String,
    #[serde(alias = "duracaoDiaria")]
    pub daily_minutes: i64,
    /// Restricts the discipline to these weekdays (0 = Sunday). Empty means every scheduled day.
    #[serde(default)]
    pub weekdays: Vec<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleConfig {
    #[serde(default)]
    pub phases: PhaseFlags,
    #[serde(default, alias = "duracoes")]
    pub durations: DurationConfig,
    #[serde(default, alias = "intervalos")]
    pub intervals: IntervalConfig,
    #[serde(default, alias = "alternancia")]
    pub alternation: AlternationConfig,
    #[serde(default, alias = "adaptacao")]
    pub adaptation: AdaptationConfig,
    #[serde(default, alias = "disciplinasFixas")]
    pub pinned: Vec<PinnedDiscipline>,
    #[serde(default = "default_high_incidence_warn_ratio")]
    pub high_incidence_warn_ratio: f64,
}

fn default_high_incidence_warn_ratio() -> f64 {
    HIGH_INCIDENCE_WARN_RATIO
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            phases: PhaseFlags::default(),
            durations: DurationConfig::default(),
            intervals: IntervalConfig::default(),
            alternation: AlternationConfig::default(),
            adaptation: AdaptationConfig::default(),
            pinned: Vec::new(),
            high_incidence_warn_ratio: HIGH_INCIDENCE_WARN_RATIO,
        }
    }
}

impl ScheduleConfig {
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        config.validate()?;
        tracing::info!(path = %path.display(), "Schedule config loaded");
        Ok(config)
    }

    /// Number of review cycles emitted per topic.
    pub fn review_cycles(&self) -> usize {
        if self.phases.review {
            self.intervals.reviews.len()
        } else {
            0
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |msg: String| -> Result<(), ConfigError> { Err(ConfigError::Invalid(msg)) };

        if !self.phases.study && !self.phases.practice && !self.phases.review {
            return invalid("at least one phase must be enabled".to_string());
        }
        if !(1..=100).contains(&self.durations.practice_percent) {
            return invalid("durations.practice_percent must be in [1,100]".to_string());
        }
        if !(1..=100).contains(&self.durations.review_percent) {
            return invalid("durations.review_percent must be in [1,100]".to_string());
        }

        let practice = self.intervals.practice;
        if practice.min > practice.max {
            return invalid("intervals.practice: min must be <= max".to_string());
        }
        if practice.max > MAX_OFFSET_WINDOW_DAYS {
            return invalid(format!(
                "intervals.practice: max must be <= {MAX_OFFSET_WINDOW_DAYS} days"
            ));
        }
        if self.intervals.reviews.len() > u8::MAX as usize {
            return invalid("intervals.reviews: too many review cycles".to_string());
        }
        for (i, window) in self.intervals.reviews.iter().enumerate() {
            if window.min > window.max {
                return invalid(format!("intervals.reviews[{i}]: min must be <= max"));
            }
            if window.max > MAX_OFFSET_WINDOW_DAYS {
                return invalid(format!(
                    "intervals.reviews[{i}]: max must be <= {MAX_OFFSET_WINDOW_DAYS} days"
                ));
            }
        }

        if self.alternation.min_minutes < 0 || self.alternation.max_minutes <= 0 {
            return invalid("alternation bounds must be positive".to_string());
        }
        if self.alternation.min_minutes > self.alternation.max_minutes {
            return invalid("alternation.min_minutes must be <= max_minutes".to_string());
        }

        let adaptation = &self.adaptation;
        if !(0.0..=100.0).contains(&adaptation.accelerate_above)
            || !(0.0..=100.0).contains(&adaptation.decelerate_below)
        {
            return invalid("adaptation thresholds must be in [0,100]".to_string());
        }
        if adaptation.decelerate_below >= adaptation.accelerate_above {
            return invalid(
                "adaptation.decelerate_below must be < adaptation.accelerate_above".to_string(),
            );
        }
        if !(adaptation.adjust_percent > 0.0 && adaptation.adjust_percent <= 100.0) {
            return invalid("adaptation.adjust_percent must be in (0,100]".to_string());
        }
        if adaptation.window_size == 0 {
            return invalid("adaptation.window_size must be > 0".to_string());
        }

        for pinned in &self.pinned {
            if pinned.discipline.trim().is_empty() {
                return invalid("pinned discipline name must not be blank".to_string());
            }
            if !(1..=MINUTES_PER_DAY).contains(&pinned.daily_minutes) {
                return invalid(format!(
                    "pinned discipline '{}': daily_minutes must be in 1..={MINUTES_PER_DAY}",
                    pinned.discipline
                ));
            }
            if let Some(day) = pinned.weekdays.iter().find(|d| **d > 6) {
                return invalid(format!(
                    "pinned discipline '{}': weekday {day} is outside 0..=6",
                    pinned.discipline
                ));
            }
        }

        if !(0.0..=1.0).contains(&self.high_incidence_warn_ratio) {
            return invalid("high_incidence_warn_ratio must be in [0,1]".to_string());
        }

        Ok(())
    }
}
