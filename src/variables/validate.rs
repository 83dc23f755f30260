//! Value validation for typed variables.

use super::phone::parse_phone;
use crate::error::{ValidationCode, ValidationError};
use crate::model::{
    DateRules, EmailRules, NumberRules, PhoneRules, TextRules, VariableDefinition, VariableType,
    VariableValidation,
};
use chrono::{DateTime, NaiveDate};
use regex::Regex;
use std::collections::HashMap;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Date input formats accepted besides RFC 3339 timestamps.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y", "%d.%m.%Y", "%B %d, %Y", "%b %d, %Y"];

/// Parse a date in any accepted input format.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
        .or_else(|| DateTime::parse_from_rfc3339(value).ok().map(|dt| dt.date_naive()))
}

/// Parse a number, allowing thousands separators.
pub fn parse_number(value: &str) -> Option<f64> {
    let cleaned: String = value.trim().chars().filter(|c| *c != ',').collect();
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn decimal_places(value: &str) -> usize {
    value
        .trim()
        .split_once('.')
        .map(|(_, frac)| frac.chars().take_while(|c| c.is_ascii_digit()).count())
        .unwrap_or(0)
}

/// Validate a raw value against a variable definition.
///
/// Blank values fail only when the variable is required. Type checks
/// apply even without explicit rules; rules declared for a different type
/// are ignored.
///
/// # Example
///
/// ```
/// use pagetree::model::{VariableDefinition, VariableType};
/// use pagetree::variables::validate;
/// use pagetree::ValidationCode;
///
/// let email = VariableDefinition::new("EMAIL", VariableType::Email);
/// assert!(validate(&email, "jane@example.com").is_ok());
/// assert_eq!(validate(&email, "").unwrap_err().code, ValidationCode::Required);
/// ```
pub fn validate(def: &VariableDefinition, raw: &str) -> Result<(), ValidationError> {
    let value = raw.trim();
    if value.is_empty() {
        if def.required {
            return Err(failure(
                def,
                ValidationCode::Required,
                format!("{} is required", def.display_label()),
            ));
        }
        return Ok(());
    }

    let rules = def.validation.as_ref().filter(|r| r.var_type() == def.var_type);
    match (def.var_type, rules) {
        (VariableType::Text, Some(VariableValidation::Text(r))) => check_text(def, value, r),
        (VariableType::Text, _) => Ok(()),
        (VariableType::Email, Some(VariableValidation::Email(r))) => check_email(def, value, r),
        (VariableType::Email, _) => check_email(def, value, &EmailRules::default()),
        (VariableType::Date, Some(VariableValidation::Date(r))) => check_date(def, value, r),
        (VariableType::Date, _) => check_date(def, value, &DateRules::default()),
        (VariableType::Number, Some(VariableValidation::Number(r))) => check_number(def, value, r),
        (VariableType::Number, _) => check_number(def, value, &NumberRules::default()),
        (VariableType::Phone, Some(VariableValidation::Phone(r))) => {
            check_phone(def, value, Some(r))
        }
        (VariableType::Phone, _) => check_phone(def, value, None),
    }
}

/// Validate every definition against a value map.
///
/// Missing values fall back to the definition's default. All failures are
/// returned, in definition order.
pub fn validate_all(
    definitions: &[VariableDefinition],
    values: &HashMap<String, String>,
) -> Vec<ValidationError> {
    definitions
        .iter()
        .filter_map(|def| {
            let raw = values
                .get(&def.name)
                .filter(|v| !v.trim().is_empty())
                .or(def.default_value.as_ref())
                .map(String::as_str)
                .unwrap_or("");
            validate(def, raw).err()
        })
        .collect()
}

fn failure(def: &VariableDefinition, code: ValidationCode, message: String) -> ValidationError {
    ValidationError::new(def.name.clone(), code, message)
}

fn check_text(
    def: &VariableDefinition,
    value: &str,
    rules: &TextRules,
) -> Result<(), ValidationError> {
    let len = value.chars().count();
    let label = def.display_label();
    if let Some(min) = rules.min_length {
        if len < min {
            return Err(failure(
                def,
                ValidationCode::MinLength,
                format!("{} must be at least {} characters", label, min),
            ));
        }
    }
    if let Some(max) = rules.max_length {
        if len > max {
            return Err(failure(
                def,
                ValidationCode::MaxLength,
                format!("{} must be at most {} characters", label, max),
            ));
        }
    }
    if let Some(pattern) = rules.pattern.as_deref() {
        // The whole value must match.
        match Regex::new(&format!("^(?:{})$", pattern)) {
            Ok(re) if !re.is_match(value) => {
                return Err(failure(
                    def,
                    ValidationCode::Pattern,
                    format!("{} has an invalid format", label),
                ));
            }
            Ok(_) => {}
            Err(e) => log::warn!("Ignoring invalid pattern for {}: {}", def.name, e),
        }
    }
    Ok(())
}

fn check_email(
    def: &VariableDefinition,
    value: &str,
    rules: &EmailRules,
) -> Result<(), ValidationError> {
    if !EMAIL_RE.is_match(value) {
        return Err(failure(
            def,
            ValidationCode::InvalidEmail,
            format!("{} must be a valid email address", def.display_label()),
        ));
    }
    if !rules.domains.is_empty() {
        let domain = value
            .rsplit_once('@')
            .map(|(_, d)| d.to_ascii_lowercase())
            .unwrap_or_default();
        if !rules.domains.iter().any(|d| d.eq_ignore_ascii_case(&domain)) {
            return Err(failure(
                def,
                ValidationCode::InvalidDomain,
                format!("Email domain must be one of: {}", rules.domains.join(", ")),
            ));
        }
    }
    Ok(())
}

fn bound(def: &VariableDefinition, raw: Option<&str>, which: &str) -> Option<NaiveDate> {
    let raw = raw?;
    let date = parse_date(raw);
    if date.is_none() {
        log::warn!("Ignoring unparsable {} '{}' for {}", which, raw, def.name);
    }
    date
}

fn check_date(
    def: &VariableDefinition,
    value: &str,
    rules: &DateRules,
) -> Result<(), ValidationError> {
    let label = def.display_label();
    let date = parse_date(value).ok_or_else(|| {
        failure(
            def,
            ValidationCode::InvalidDate,
            format!("{} must be a valid date", label),
        )
    })?;
    if let Some(min) = bound(def, rules.min_date.as_deref(), "minDate") {
        if date < min {
            return Err(failure(
                def,
                ValidationCode::DateTooEarly,
                format!("{} must be on or after {}", label, min),
            ));
        }
    }
    if let Some(max) = bound(def, rules.max_date.as_deref(), "maxDate") {
        if date > max {
            return Err(failure(
                def,
                ValidationCode::DateTooLate,
                format!("{} must be on or before {}", label, max),
            ));
        }
    }
    Ok(())
}

fn check_number(
    def: &VariableDefinition,
    value: &str,
    rules: &NumberRules,
) -> Result<(), ValidationError> {
    let label = def.display_label();
    let number = parse_number(value).ok_or_else(|| {
        failure(
            def,
            ValidationCode::InvalidNumber,
            format!("{} must be a number", label),
        )
    })?;
    if let Some(decimals) = rules.decimals {
        if decimal_places(value) > decimals as usize {
            return Err(failure(
                def,
                ValidationCode::InvalidNumber,
                format!("{} allows at most {} decimal places", label, decimals),
            ));
        }
    }
    if let Some(min) = rules.min {
        if number < min {
            return Err(failure(
                def,
                ValidationCode::NumberTooSmall,
                format!("{} must be at least {}", label, min),
            ));
        }
    }
    if let Some(max) = rules.max {
        if number > max {
            return Err(failure(
                def,
                ValidationCode::NumberTooLarge,
                format!("{} must be at most {}", label, max),
            ));
        }
    }
    Ok(())
}

fn check_phone(
    def: &VariableDefinition,
    value: &str,
    rules: Option<&PhoneRules>,
) -> Result<(), ValidationError> {
    match parse_phone(value, rules) {
        Some(_) => Ok(()),
        None => Err(failure(
            def,
            ValidationCode::InvalidPhone,
            format!("{} must be a valid phone number", def.display_label()),
        )),
    }
}
