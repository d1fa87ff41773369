use std::process::ExitCode;

use eara_planner::config::Config;
use eara_planner::eara::config::ScheduleConfig;
use eara_planner::eara::engine::{
    load_outcomes, load_topics, GeneratedPlan, PlanEngine, PlanRequest,
};
use eara_planner::eara::error::{ConfigError, EngineError};
use eara_planner::logging::{init_tracing, LogConfig};

#[derive(Debug, thiserror::Error)]
enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Engine(#[from] EngineError),
    #[error("failed to write plan: {0}")]
    Output(#[from] serde_json::Error),
}

fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let mut config = Config::from_env();
    if let Some(path) = std::env::args().nth(1) {
        config.topics_path = path;
    }

    init_tracing(&LogConfig::from(&config));
    tracing::info!(topics_path = %config.topics_path, "Starting eara-planner");

    match run(&config) {
        Ok(plan) => {
            tracing::info!(
                entries = plan.entries.len(),
                warnings = plan.warnings.len(),
                "Done"
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::error!(error = %e, "Plan generation failed");
            ExitCode::FAILURE
        }
    }
}

fn run(config: &Config) -> Result<GeneratedPlan, RunError> {
    let schedule_config = match &config.schedule_config_path {
        Some(path) => ScheduleConfig::load_from_file(path)?,
        None => ScheduleConfig::default(),
    };
    let engine = PlanEngine::new(schedule_config)?;

    let request = PlanRequest {
        topics: load_topics(&config.topics_path)?,
        start_date: config.run.start_date,
        daily_budget_minutes: config.run.daily_budget_minutes,
        valid_weekdays: config.run.valid_weekdays.clone(),
        seed: config.run.seed,
        outcomes: match &config.outcomes_path {
            Some(path) => load_outcomes(path)?,
            None => Vec::new(),
        },
    };
    let plan = engine.generate(&request)?;

    let stdout = std::io::stdout();
    serde_json::to_writer_pretty(stdout.lock(), &plan)?;
    println!();
    Ok(plan)
}
