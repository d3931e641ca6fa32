//! Custom validators used with `#[validate(custom(...))]`.

use chrono::NaiveDate;
use validator::ValidationError;

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(message.into());
    err
}

/// Rejects strings that are empty after trimming.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(error("blank", "Value cannot be blank"))
    } else {
        Ok(())
    }
}

/// Validates that a borrow period ends on or after its start.
pub fn validate_date_range(start: NaiveDate, end: NaiveDate) -> Result<(), ValidationError> {
    if end < start {
        Err(error("date_range", "End date must be on or after the start date"))
    } else {
        Ok(())
    }
}

/// Validates that a borrow period does not start before `today`.
pub fn validate_not_in_past(start: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
    if start < today {
        Err(error("start_in_past", "Start date cannot be in the past"))
    } else {
        Ok(())
    }
}

/// Serial numbers are printable ASCII without whitespace.
pub fn validate_serial_number(serial: &str) -> Result<(), ValidationError> {
    if !serial.is_empty() && serial.chars().all(|c| c.is_ascii_graphic()) {
        Ok(())
    } else {
        Err(error(
            "serial_number",
            "Serial number must be printable characters without spaces",
        ))
    }
}
