//! Field rules for the event form.
//!
//! Every rule is a pure function of the raw value; the date rule additionally
//! depends on the caller-supplied `today`.

use chrono::NaiveDate;
use shared::{
    domain::EventField,
    protocol::{parse_calendar_date, parse_wall_clock, EventRecord},
};
use thiserror::Error;

pub const NAME_LEN: (usize, usize) = (3, 100);
pub const LOCATION_LEN: (usize, usize) = (3, 200);
pub const DESCRIPTION_LEN: (usize, usize) = (10, 1000);

pub const NAME_TOO_SHORT: &str = "Name must be at least 3 characters";
pub const NAME_TOO_LONG: &str = "Name must not exceed 100 characters";
pub const DATE_REQUIRED: &str = "Select a date";
pub const DATE_IN_PAST: &str = "Date cannot be in the past";
pub const TIME_REQUIRED: &str = "Select a time";
pub const TIME_INVALID: &str = "Enter a valid time";
pub const LOCATION_TOO_SHORT: &str = "Location must be at least 3 characters";
pub const LOCATION_TOO_LONG: &str = "Location must not exceed 200 characters";
pub const DESCRIPTION_TOO_SHORT: &str = "Description must be at least 10 characters";
pub const DESCRIPTION_TOO_LONG: &str = "Description must not exceed 1000 characters";

/// Outcome of checking one field. The message is empty iff the field is valid.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldValidation {
    message: Option<&'static str>,
}

impl FieldValidation {
    pub fn valid() -> Self {
        Self { message: None }
    }

    pub fn invalid(message: &'static str) -> Self {
        Self {
            message: Some(message),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.message.is_none()
    }

    pub fn message(&self) -> &'static str {
        self.message.unwrap_or_default()
    }
}

pub fn validate_field(field: EventField, value: &str, today: NaiveDate) -> FieldValidation {
    match field {
        EventField::Name => check_length(value, NAME_LEN, NAME_TOO_SHORT, NAME_TOO_LONG),
        EventField::Date => match parse_calendar_date(value) {
            None => FieldValidation::invalid(DATE_REQUIRED),
            Some(date) if date < today => FieldValidation::invalid(DATE_IN_PAST),
            Some(_) => FieldValidation::valid(),
        },
        EventField::Time => {
            if value.trim().is_empty() {
                FieldValidation::invalid(TIME_REQUIRED)
            } else if parse_wall_clock(value).is_none() {
                FieldValidation::invalid(TIME_INVALID)
            } else {
                FieldValidation::valid()
            }
        }
        EventField::Location => check_length(
            value,
            LOCATION_LEN,
            LOCATION_TOO_SHORT,
            LOCATION_TOO_LONG,
        ),
        EventField::Description => check_length(
            value,
            DESCRIPTION_LEN,
            DESCRIPTION_TOO_SHORT,
            DESCRIPTION_TOO_LONG,
        ),
    }
}

fn check_length(
    value: &str,
    (min, max): (usize, usize),
    too_short: &'static str,
    too_long: &'static str,
) -> FieldValidation {
    let len = value.chars().count();
    if len < min {
        FieldValidation::invalid(too_short)
    } else if len > max {
        FieldValidation::invalid(too_long)
    } else {
        FieldValidation::valid()
    }
}

/// Raw text of the five inputs, exactly as typed.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FormValues {
    pub name: String,
    pub date: String,
    pub time: String,
    pub location: String,
    pub description: String,
}

impl FormValues {
    pub fn get(&self, field: EventField) -> &str {
        match field {
            EventField::Name => &self.name,
            EventField::Date => &self.date,
            EventField::Time => &self.time,
            EventField::Location => &self.location,
            EventField::Description => &self.description,
        }
    }

    pub fn set(&mut self, field: EventField, value: impl Into<String>) {
        let slot = match field {
            EventField::Name => &mut self.name,
            EventField::Date => &mut self.date,
            EventField::Time => &mut self.time,
            EventField::Location => &mut self.location,
            EventField::Description => &mut self.description,
        };
        *slot = value.into();
    }
}

/// Per-field results of a full-form check. Every field is always evaluated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormReport {
    results: Vec<(EventField, FieldValidation)>,
}

impl FormReport {
    pub fn is_valid(&self) -> bool {
        self.results.iter().all(|(_, result)| result.is_valid())
    }

    pub fn results(&self) -> &[(EventField, FieldValidation)] {
        &self.results
    }

    /// Turns a passing report into a record. Creator and timestamp are left
    /// for the caller to attach.
    pub fn into_record(self, values: &FormValues) -> Result<EventRecord, ValidationError> {
        if let Some(err) = self.into_error() {
            return Err(err);
        }
        let date = parse_calendar_date(&values.date).ok_or_else(|| ValidationError {
            failures: vec![(EventField::Date, DATE_REQUIRED)],
        })?;
        let time = parse_wall_clock(&values.time).ok_or_else(|| ValidationError {
            failures: vec![(EventField::Time, TIME_INVALID)],
        })?;

        Ok(EventRecord {
            id: None,
            name: values.name.clone(),
            date,
            time,
            location: values.location.clone(),
            description: values.description.clone(),
            creator: None,
            created_at: None,
        })
    }

    pub fn into_error(self) -> Option<ValidationError> {
        let failures: Vec<_> = self
            .results
            .into_iter()
            .filter(|(_, result)| !result.is_valid())
            .map(|(field, result)| (field, result.message()))
            .collect();
        if failures.is_empty() {
            None
        } else {
            Some(ValidationError { failures })
        }
    }
}

pub fn validate_form(values: &FormValues, today: NaiveDate) -> FormReport {
    FormReport {
        results: EventField::ALL
            .iter()
            .map(|&field| (field, validate_field(field, values.get(field), today)))
            .collect(),
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid fields: {}", describe_failures(.failures))]
pub struct ValidationError {
    failures: Vec<(EventField, &'static str)>,
}

impl ValidationError {
    pub fn failures(&self) -> &[(EventField, &'static str)] {
        &self.failures
    }

    pub fn fields(&self) -> impl Iterator<Item = EventField> + '_ {
        self.failures.iter().map(|(field, _)| *field)
    }
}

fn describe_failures(failures: &[(EventField, &'static str)]) -> String {
    failures
        .iter()
        .map(|(field, message)| format!("{field} ({message})"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
#[path = "tests/validation_tests.rs"]
mod tests;
