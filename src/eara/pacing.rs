//! 自适应节奏：根据复习正确率缩短或延长同组下一个未排定的复习窗口

use std::collections::{HashMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::constants::MAX_OFFSET_WINDOW_DAYS;
use crate::eara::config::AdaptationConfig;
use crate::eara::types::OffsetWindow;

const MIN_WINDOW_DAYS: u32 = 1;

/// Observed result of a Review (quiz accuracy in percent).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceOutcome {
    pub group_key: String,
    pub accuracy: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaceDecision {
    Accelerate,
    Decelerate,
    Hold,
}

pub fn adjust_window(window: OffsetWindow, decision: PaceDecision, percent: f64) -> OffsetWindow {
    let factor = match decision {
        PaceDecision::Accelerate => 1.0 - percent / 100.0,
        PaceDecision::Decelerate => 1.0 + percent / 100.0,
        PaceDecision::Hold => return window,
    };
    let scale = |days: u32| {
        ((days as f64 * factor).round().max(0.0) as u32).clamp(MIN_WINDOW_DAYS, MAX_OFFSET_WINDOW_DAYS)
    };
    let min = scale(window.min);
    let max = scale(window.max).max(min);
    OffsetWindow { min, max }
}

#[derive(Debug, Clone)]
pub struct AdaptivePacer {
    config: AdaptationConfig,
    history: HashMap<String, VecDeque<f64>>,
    pending: HashMap<String, PaceDecision>,
}

impl AdaptivePacer {
    pub fn new(config: &AdaptationConfig) -> Self {
        Self {
            config: config.clone(),
            history: HashMap::new(),
            pending: HashMap::new(),
        }
    }

    /// Records an outcome and re-evaluates the group's pending adjustment.
    pub fn record_outcome(&mut self, group_key: &str, accuracy: f64) -> PaceDecision {
        let window_size = self.config.window_size.max(1);
        let history = self.history.entry(group_key.to_string()).or_default();
        history.push_back(accuracy.clamp(0.0, 100.0));
        while history.len() > window_size {
            history.pop_front();
        }

        let trailing = history.iter().sum::<f64>() / history.len() as f64;
        let decision = if trailing > self.config.accelerate_above {
            PaceDecision::Accelerate
        } else if trailing < self.config.decelerate_below {
            PaceDecision::Decelerate
        } else {
            PaceDecision::Hold
        };

        match decision {
            PaceDecision::Hold => {
                self.pending.remove(group_key);
            }
            _ => {
                self.pending.insert(group_key.to_string(), decision);
            }
        }
        tracing::debug!(group_key, trailing, ?decision, "Pace re-evaluated");
        decision
    }

    pub fn trailing_accuracy(&self, group_key: &str) -> Option<f64> {
        self.history
            .get(group_key)
            .filter(|h| !h.is_empty())
            .map(|h| h.iter().sum::<f64>() / h.len() as f64)
    }

    pub fn pending_decision(&self, group_key: &str) -> Option<PaceDecision> {
        self.pending.get(group_key).copied()
    }

    /// Applies and consumes the group's pending adjustment, if any.
    pub fn resolve_window(&mut self, group_key: &str, window: OffsetWindow) -> OffsetWindow {
        match self.pending.remove(group_key) {
            Some(decision) => {
                let adjusted = adjust_window(window, decision, self.config.adjust_percent);
                tracing::debug!(
                    group_key,
                    ?decision,
                    from_min = window.min,
                    from_max = window.max,
                    to_min = adjusted.min,
                    to_max = adjusted.max,
                    "Offset window adjusted"
                );
                adjusted
            }
            None => window,
        }
    }
}
