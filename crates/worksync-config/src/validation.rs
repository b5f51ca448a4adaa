//! Configuration validation

use crate::schema::{RawConfig, RawEmployee, RawInsightConfig, RawSeedConfig};
use std::collections::HashSet;
use thiserror::Error;

/// Validation error
#[derive(Debug, Clone, Error)]
pub enum ValidationError {
    #[error("Employee '{employee_id}': {message}")]
    EmployeeError { employee_id: String, message: String },

    #[error("Duplicate employee ID: {0}")]
    DuplicateEmployeeId(String),

    #[error("Invalid time format '{value}': {message}")]
    InvalidTimeFormat { value: String, message: String },

    #[error("Seed config error: {0}")]
    SeedError(String),

    #[error("Insight config error: {0}")]
    InsightError(String),
}

/// Validate a raw configuration
pub fn validate_config(config: &RawConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    // Check for duplicate employee IDs
    let mut seen_ids = HashSet::new();
    for employee in &config.employees {
        if !seen_ids.insert(&employee.id) {
            errors.push(ValidationError::DuplicateEmployeeId(employee.id.clone()));
        }
    }

    for employee in &config.employees {
        errors.extend(validate_employee(employee));
    }

    errors.extend(validate_seed(&config.seed));
    errors.extend(validate_insight(&config.insight));

    errors
}

fn validate_employee(employee: &RawEmployee) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if employee.id.trim().is_empty() {
        errors.push(ValidationError::EmployeeError {
            employee_id: employee.id.clone(),
            message: "id cannot be empty".into(),
        });
    }
    if employee.name.trim().is_empty() {
        errors.push(ValidationError::EmployeeError {
            employee_id: employee.id.clone(),
            message: "name cannot be empty".into(),
        });
    }

    errors
}

fn validate_seed(seed: &RawSeedConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if let Some(p) = seed.weekend_work_probability
        && !(0.0..=1.0).contains(&p)
    {
        errors.push(ValidationError::SeedError(format!(
            "weekend_work_probability must be within 0.0-1.0, got {}",
            p
        )));
    }

    let start = seed.check_in_start.as_deref().map(|s| (s, parse_time(s)));
    let end = seed.check_in_end.as_deref().map(|s| (s, parse_time(s)));
    for (value, parsed) in [start.clone(), end.clone()].into_iter().flatten() {
        if let Err(message) = parsed {
            errors.push(ValidationError::InvalidTimeFormat {
                value: value.to_string(),
                message,
            });
        }
    }

    let start_minutes = match start {
        Some((_, Ok((h, m)))) => Some(h as u32 * 60 + m as u32),
        Some((_, Err(_))) => None,
        None => Some(8 * 60),
    };
    let end_minutes = match end {
        Some((_, Ok((h, m)))) => Some(h as u32 * 60 + m as u32),
        Some((_, Err(_))) => None,
        None => Some(10 * 60),
    };
    if let (Some(s), Some(e)) = (start_minutes, end_minutes)
        && s >= e
    {
        errors.push(ValidationError::SeedError(
            "check_in_start must be earlier than check_in_end".into(),
        ));
    }

    let min = seed.min_duration_minutes.unwrap_or(450);
    let max = seed.max_duration_minutes.unwrap_or(600);
    if min >= max {
        errors.push(ValidationError::SeedError(format!(
            "min_duration_minutes ({}) must be less than max_duration_minutes ({})",
            min, max
        )));
    }

    errors
}

fn validate_insight(insight: &RawInsightConfig) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    if insight.timeout_seconds == Some(0) {
        errors.push(ValidationError::InsightError(
            "timeout_seconds must be greater than 0".into(),
        ));
    }
    if insight.max_records == Some(0) {
        errors.push(ValidationError::InsightError(
            "max_records must be greater than 0".into(),
        ));
    }
    if let Some(endpoint) = &insight.endpoint
        && !(endpoint.starts_with("http://") || endpoint.starts_with("https://"))
    {
        errors.push(ValidationError::InsightError(format!(
            "endpoint must be an http(s) URL, got '{}'",
            endpoint
        )));
    }
    if let Some(model) = &insight.model
        && model.trim().is_empty()
    {
        errors.push(ValidationError::InsightError("model cannot be empty".into()));
    }

    errors
}

/// Parse HH:MM time format
pub fn parse_time(s: &str) -> Result<(u8, u8), String> {
    let parts: Vec<&str> = s.split(':').collect();
    if parts.len() != 2 {
        return Err("Expected HH:MM format".into());
    }

    let hour: u8 = parts[0]
        .parse()
        .map_err(|_| "Invalid hour".to_string())?;
    let minute: u8 = parts[1]
        .parse()
        .map_err(|_| "Invalid minute".to_string())?;

    if hour >= 24 {
        return Err("Hour must be 0-23".into());
    }
    if minute >= 60 {
        return Err("Minute must be 0-59".into());
    }

    Ok((hour, minute))
}
