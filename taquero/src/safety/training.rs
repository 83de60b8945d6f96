//! Staff training checks

use chrono::{Duration, NaiveDate};
use shared::models::{Staff, TrainingRecord};
use shared::{AppError, AppResult};

use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};

/// Attach a training record to a staff member
pub fn add_training(staff: &mut Staff, record: TrainingRecord) -> AppResult<()> {
    validate_required_text(&record.course, "course", MAX_NAME_LEN)?;
    if let Some(expires) = record.expires_on
        && expires < record.completed_on
    {
        return Err(AppError::validation(format!(
            "{} expires ({expires}) before it was completed ({})",
            record.course, record.completed_on
        )));
    }
    if staff.training.iter().any(|t| t.id == record.id) {
        return Err(AppError::already_exists(format!("training {}", record.id)));
    }
    staff.training.push(record);
    staff.training.sort_by_key(|t| t.completed_on);
    Ok(())
}

/// Remove a training record by id
pub fn remove_training(staff: &mut Staff, training_id: &str) -> AppResult<TrainingRecord> {
    let idx = staff
        .training
        .iter()
        .position(|t| t.id == training_id)
        .ok_or_else(|| AppError::not_found(format!("training {training_id}")))?;
    Ok(staff.training.remove(idx))
}

/// Courses already expired on `today`
pub fn expired(staff: &Staff, today: NaiveDate) -> Vec<&TrainingRecord> {
    staff
        .training
        .iter()
        .filter(|t| t.expires_on.is_some_and(|e| e < today))
        .collect()
}

/// Courses expiring between `today` and `today + days` (inclusive)
pub fn expiring_within(staff: &Staff, today: NaiveDate, days: i64) -> Vec<&TrainingRecord> {
    let horizon = today + Duration::days(days);
    staff
        .training
        .iter()
        .filter(|t| t.expires_on.is_some_and(|e| e >= today && e <= horizon))
        .collect()
}

/// Latest record for a course (case-insensitive match)
pub fn latest_for<'a>(staff: &'a Staff, course: &str) -> Option<&'a TrainingRecord> {
    staff
        .training
        .iter()
        .filter(|t| t.course.eq_ignore_ascii_case(course))
        .max_by_key(|t| t.completed_on)
}
