//! Display formatting of variable values.

use super::phone::format_phone;
use super::validate::{parse_date, parse_number};
use crate::model::{DateStyle, VariableDefinition, VariableType, VariableValidation};
use chrono::NaiveDate;

/// Order of the day, month and year in a displayed date.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateOrder {
    /// `January 5, 2025` (en-US)
    MonthFirst,
    /// `5 January 2025` (en-GB and most locales)
    DayFirst,
    /// `2025 January 5` (ja, zh, ko, sv, lt)
    YearFirst,
}

impl DateOrder {
    /// Pick the order for a BCP 47 locale tag such as `en-US` or `de`.
    pub fn for_locale(locale: &str) -> Self {
        let tag = locale.trim().replace('_', "-").to_ascii_lowercase();
        let language = tag.split('-').next().unwrap_or("");
        match language {
            "ja" | "zh" | "ko" | "sv" | "lt" | "hu" => DateOrder::YearFirst,
            "en" if tag == "en" || tag == "en-us" || tag.starts_with("en-us-") => {
                DateOrder::MonthFirst
            }
            "" => DateOrder::MonthFirst,
            _ => DateOrder::DayFirst,
        }
    }
}

/// Format a date for display in a style and order.
pub fn format_date(date: NaiveDate, style: DateStyle, order: DateOrder) -> String {
    let pattern = match (style, order) {
        (DateStyle::Short, DateOrder::MonthFirst) => "%-m/%-d/%Y",
        (DateStyle::Short, DateOrder::DayFirst) => "%d/%m/%Y",
        (DateStyle::Short, DateOrder::YearFirst) => "%Y-%m-%d",
        (DateStyle::Medium, DateOrder::MonthFirst) => "%b %-d, %Y",
        (DateStyle::Medium, DateOrder::DayFirst) => "%-d %b %Y",
        (DateStyle::Medium, DateOrder::YearFirst) => "%Y %b %-d",
        (DateStyle::Long, DateOrder::MonthFirst) => "%B %-d, %Y",
        (DateStyle::Long, DateOrder::DayFirst) => "%-d %B %Y",
        (DateStyle::Long, DateOrder::YearFirst) => "%Y %B %-d",
        (DateStyle::Full, DateOrder::MonthFirst) => "%A, %B %-d, %Y",
        (DateStyle::Full, DateOrder::DayFirst) => "%A, %-d %B %Y",
        (DateStyle::Full, DateOrder::YearFirst) => "%Y %B %-d (%A)",
    };
    date.format(pattern).to_string()
}

/// Format a value for display with US conventions.
///
/// Phones become their canonical form, dates their display style and
/// numbers their fixed decimals. Values that do not parse, and all text
/// and email values, are returned unchanged.
///
/// # Example
///
/// ```
/// use pagetree::model::{VariableDefinition, VariableType};
/// use pagetree::variables::format_value;
///
/// let phone = VariableDefinition::new("PHONE", VariableType::Phone);
/// assert_eq!(format_value(&phone, "415.555.2671"), "(415) 555-2671");
///
/// let date = VariableDefinition::new("DATE", VariableType::Date);
/// assert_eq!(format_value(&date, "2025-01-05"), "Jan 5, 2025");
/// ```
pub fn format_value(def: &VariableDefinition, raw: &str) -> String {
    format_with_locale(def, raw, "en-US")
}

/// Format a value for display, ordering dates for `locale`.
pub fn format_with_locale(def: &VariableDefinition, raw: &str, locale: &str) -> String {
    let value = raw.trim();
    let rules = def.validation.as_ref();
    let formatted = match def.var_type {
        VariableType::Phone => {
            let phone_rules = match rules {
                Some(VariableValidation::Phone(r)) => Some(r),
                _ => None,
            };
            format_phone(value, phone_rules)
        }
        VariableType::Date => {
            let style = match rules {
                Some(VariableValidation::Date(r)) => r.format.unwrap_or_default(),
                _ => DateStyle::default(),
            };
            parse_date(value).map(|d| format_date(d, style, DateOrder::for_locale(locale)))
        }
        VariableType::Number => match rules {
            Some(VariableValidation::Number(r)) => r.decimals.and_then(|decimals| {
                parse_number(value).map(|n| format!("{:.*}", decimals as usize, n))
            }),
            _ => None,
        },
        VariableType::Text | VariableType::Email => None,
    };
    formatted.unwrap_or_else(|| raw.to_string())
}
