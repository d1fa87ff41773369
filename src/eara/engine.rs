use std::path::Path;

use chrono::NaiveDate;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::eara::config::ScheduleConfig;
use crate::eara::distributor::{self, DistributionParams, WeekdaySet};
use crate::eara::error::{ConfigError, EngineError};
use crate::eara::pacing::{AdaptivePacer, PerformanceOutcome};
use crate::eara::priority::high_incidence_warning;
use crate::eara::summary::ScheduleSummary;
use crate::eara::types::{AdvisoryWarning, CalendarEntry, Topic};
use crate::eara::{pinned, sequence, validator};
use crate::validation;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    pub topics: Vec<Topic>,
    pub start_date: NaiveDate,
    pub daily_budget_minutes: i64,
    /// 0 = Sunday .. 6 = Saturday.
    pub valid_weekdays: Vec<u8>,
    pub seed: u64,
    /// Review outcomes already known when re-planning.
    #[serde(default)]
    pub outcomes: Vec<PerformanceOutcome>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedPlan {
    pub seed: u64,
    pub entries: Vec<CalendarEntry>,
    pub warnings: Vec<AdvisoryWarning>,
    pub summary: ScheduleSummary,
}

fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Reads a topic snapshot (JSON array) exported by the storage layer.
pub fn load_topics(path: impl AsRef<Path>) -> Result<Vec<Topic>, ConfigError> {
    load_json(path.as_ref())
}

pub fn load_outcomes(path: impl AsRef<Path>) -> Result<Vec<PerformanceOutcome>, ConfigError> {
    load_json(path.as_ref())
}

pub struct PlanEngine {
    config: ScheduleConfig,
}

impl PlanEngine {
    pub fn new(config: ScheduleConfig) -> Result<Self, EngineError> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    pub fn reload_config(&mut self, new_config: ScheduleConfig) -> Result<(), EngineError> {
        new_config.validate()?;
        self.config = new_config;
        tracing::info!("Schedule config reloaded");
        Ok(())
    }

    /// Runs the full pipeline with a `ChaCha8Rng` seeded from `request.seed`.
    pub fn generate(&self, request: &PlanRequest) -> Result<GeneratedPlan, EngineError> {
        let mut rng = ChaCha8Rng::seed_from_u64(request.seed);
        self.generate_with_rng(request, &mut rng)
    }

    pub fn generate_with_rng<R: Rng + ?Sized>(
        &self,
        request: &PlanRequest,
        rng: &mut R,
    ) -> Result<GeneratedPlan, EngineError> {
        let start = std::time::Instant::now();

        validation::validate_topics(&request.topics)?;
        validation::validate_budget(request.daily_budget_minutes)?;
        let weekdays = WeekdaySet::from_indices(&request.valid_weekdays)?;

        let mut warnings: Vec<AdvisoryWarning> =
            high_incidence_warning(&request.topics, self.config.high_incidence_warn_ratio)
                .into_iter()
                .collect();

        let sessions = sequence::expand_all(&request.topics, &self.config);
        validation::validate_sessions_fit_budget(&sessions, request.daily_budget_minutes)?;

        let mut pacer = AdaptivePacer::new(&self.config.adaptation);
        for outcome in &request.outcomes {
            pacer.record_outcome(&outcome.group_key, outcome.accuracy);
        }

        let params = DistributionParams {
            start_date: request.start_date,
            daily_budget_minutes: request.daily_budget_minutes,
            weekdays: &weekdays,
            config: &self.config,
        };
        let distribution = distributor::distribute(&sessions, &params, Some(&mut pacer), rng)?;
        warnings.extend(distribution.warnings);

        let mut entries = distribution.entries;
        pinned::inject(&mut entries, &self.config.pinned);

        // 校验失败时整份日历作废，不返回部分结果
        validator::validate(&entries).into_result()?;

        let summary = ScheduleSummary::from_entries(&entries);
        tracing::info!(
            topics = request.topics.len(),
            sessions = sessions.len(),
            entries = entries.len(),
            warnings = warnings.len(),
            seed = request.seed,
            elapsed_us = start.elapsed().as_micros() as u64,
            "Plan generated"
        );

        Ok(GeneratedPlan {
            seed: request.seed,
            entries,
            warnings,
            summary,
        })
    }
}
