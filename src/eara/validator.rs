use serde::Serialize;

use crate::eara::error::EngineError;
use crate::eara::types::CalendarEntry;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationReport {
    pub ok: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    pub fn into_result(self) -> Result<(), EngineError> {
        if self.ok {
            Ok(())
        } else {
            Err(EngineError::Validation(self.errors))
        }
    }
}

/// Post-condition checks on a produced calendar. Collects every violation instead of stopping
/// at the first one.
pub fn validate(calendar: &[CalendarEntry]) -> ValidationReport {
    let mut errors = Vec::new();

    if calendar.is_empty() {
        errors.push("calendar is empty".to_string());
    }

    let mut by_order: Vec<&CalendarEntry> = calendar.iter().collect();
    by_order.sort_by_key(|e| e.order_index);

    for pair in by_order.windows(2) {
        if pair[1].date < pair[0].date {
            errors.push(format!(
                "entry {} ({}) is dated before entry {} ({})",
                pair[1].order_index, pair[1].date, pair[0].order_index, pair[0].date
            ));
        }
    }

    for (expected, entry) in (1..).zip(&by_order) {
        if entry.order_index != expected {
            errors.push(format!(
                "order index {} found where {} was expected",
                entry.order_index, expected
            ));
            break;
        }
    }

    for entry in &by_order {
        if entry.session.duration <= 0 {
            errors.push(format!(
                "entry {} ({}) has non-positive duration {}",
                entry.order_index, entry.session.id, entry.session.duration
            ));
        }
    }

    if !errors.is_empty() {
        tracing::warn!(violations = errors.len(), "Schedule validation failed");
    }

    ValidationReport {
        ok: errors.is_empty(),
        errors,
    }
}
