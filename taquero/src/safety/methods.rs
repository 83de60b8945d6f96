//! Method validation
//!
//! A method is proven by recording `required_batches` passing batches.
//! Batches are numbered from 1 and must arrive in order; once the method
//! is validated no further batches are accepted.

use chrono::{DateTime, Utc};
use shared::models::{Batch, Method, TemperatureReading, Verdict};
use shared::{AppError, AppResult, ErrorCode};

use super::thresholds::classify;
use crate::utils::validation::validate_temperature;

/// Record the next batch on a method
///
/// `number` is the batch number the operator believes they are recording
/// (the wizard shows "batch 2 of 3"); it must be the next one.
pub fn record_batch(
    method: &mut Method,
    number: u32,
    reading: TemperatureReading,
    author: &str,
    notes: Option<String>,
    now: DateTime<Utc>,
) -> AppResult<Batch> {
    if method.is_validated() {
        return Err(AppError::safety(
            ErrorCode::MethodAlreadyValidated,
            format!("{} is already validated", method.name),
        ));
    }

    let expected = method.batches.len() as u32 + 1;
    if number != expected {
        return Err(AppError::safety(
            ErrorCode::BatchOutOfOrder,
            format!("Record batch {expected} before batch {number}"),
        )
        .with_detail("expected", expected)
        .with_detail("got", number));
    }

    validate_temperature(reading.celsius, "temperature")?;

    let verdict = classify(method.kind, reading);
    let batch = Batch {
        number,
        recorded_at: now,
        recorded_by: author.to_string(),
        reading,
        verdict,
        notes,
    };
    method.batches.push(batch.clone());

    if verdict == Verdict::Safe && method.passed_batches() >= method.required_batches {
        method.validated_at = Some(now);
        tracing::info!(method = %method.name, batches = method.batches.len(), "Method validated");
    } else if verdict == Verdict::Unsafe {
        tracing::warn!(method = %method.name, batch = number, celsius = reading.celsius, "Batch failed");
    }

    Ok(batch)
}

/// Human readable progress line ("2 of 3 batches passed")
pub fn progress_label(method: &Method) -> String {
    let (passed, required) = method.progress();
    if method.is_validated() {
        format!("validated ({passed} of {required} batches passed)")
    } else {
        format!("{passed} of {required} batches passed")
    }
}
