//! Typed template variable definitions.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A template variable declared by (or inferred from) a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableDefinition {
    /// Unique token, conventionally upper snake case
    pub name: String,

    /// Value type
    #[serde(rename = "type")]
    pub var_type: VariableType,

    /// Human-readable label
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    /// Whether a value must be supplied
    #[serde(default = "default_required")]
    pub required: bool,

    /// Value used when none is supplied
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,

    /// Input placeholder text
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,

    /// Help text shown next to the input
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help_text: Option<String>,

    /// Type-specific validation rules
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub validation: Option<VariableValidation>,
}

fn default_required() -> bool {
    true
}

impl VariableDefinition {
    /// Create a required variable with no extra properties.
    pub fn new(name: impl Into<String>, var_type: VariableType) -> Self {
        Self {
            name: name.into(),
            var_type,
            label: None,
            required: true,
            default_value: None,
            placeholder: None,
            help_text: None,
            validation: None,
        }
    }

    /// Set the label and return self.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set whether the variable is required and return self.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Set the default value and return self.
    pub fn with_default(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Set validation rules and return self.
    pub fn with_validation(mut self, validation: VariableValidation) -> Self {
        self.validation = Some(validation);
        self
    }

    /// Label to display, falling back to the name.
    pub fn display_label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }
}

/// Variable value types.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum VariableType {
    /// Free text
    #[default]
    Text,
    /// Calendar date
    Date,
    /// Email address
    Email,
    /// Numeric value
    Number,
    /// Telephone number
    Phone,
}

impl VariableType {
    /// The serialized type token.
    pub fn as_str(&self) -> &'static str {
        match self {
            VariableType::Text => "TEXT",
            VariableType::Date => "DATE",
            VariableType::Email => "EMAIL",
            VariableType::Number => "NUMBER",
            VariableType::Phone => "PHONE",
        }
    }

    /// Parse a type token, ignoring case.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_uppercase().as_str() {
            "TEXT" => Some(VariableType::Text),
            "DATE" => Some(VariableType::Date),
            "EMAIL" => Some(VariableType::Email),
            "NUMBER" => Some(VariableType::Number),
            "PHONE" => Some(VariableType::Phone),
            _ => None,
        }
    }
}

impl fmt::Display for VariableType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Type-tagged validation rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "UPPERCASE")]
pub enum VariableValidation {
    /// Rules for TEXT variables
    Text(TextRules),
    /// Rules for DATE variables
    Date(DateRules),
    /// Rules for EMAIL variables
    Email(EmailRules),
    /// Rules for NUMBER variables
    Number(NumberRules),
    /// Rules for PHONE variables
    Phone(PhoneRules),
}

impl VariableValidation {
    /// Empty rules for a variable type.
    pub fn empty_for(var_type: VariableType) -> Self {
        match var_type {
            VariableType::Text => VariableValidation::Text(TextRules::default()),
            VariableType::Date => VariableValidation::Date(DateRules::default()),
            VariableType::Email => VariableValidation::Email(EmailRules::default()),
            VariableType::Number => VariableValidation::Number(NumberRules::default()),
            VariableType::Phone => VariableValidation::Phone(PhoneRules::default()),
        }
    }

    /// The variable type these rules apply to.
    pub fn var_type(&self) -> VariableType {
        match self {
            VariableValidation::Text(_) => VariableType::Text,
            VariableValidation::Date(_) => VariableType::Date,
            VariableValidation::Email(_) => VariableType::Email,
            VariableValidation::Number(_) => VariableType::Number,
            VariableValidation::Phone(_) => VariableType::Phone,
        }
    }
}

/// TEXT rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRules {
    /// Minimum length in characters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    /// Maximum length in characters
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    /// Regular expression the whole value must match
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
}

/// DATE rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateRules {
    /// Earliest allowed date (ISO `YYYY-MM-DD`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_date: Option<String>,
    /// Latest allowed date (ISO `YYYY-MM-DD`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_date: Option<String>,
    /// Display style
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<DateStyle>,
}

/// EMAIL rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailRules {
    /// Allowed domains; empty allows any
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub domains: Vec<String>,
}

/// NUMBER rules.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberRules {
    /// Minimum value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Maximum value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Maximum decimal places, also used for formatting
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decimals: Option<u32>,
    /// Input step hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step: Option<f64>,
}

/// PHONE rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhoneRules {
    /// Accepted numbering plan
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<PhoneFormat>,
    /// ISO region used for numbers without a country code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
}

/// Date display styles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateStyle {
    /// `1/5/2025`
    Short,
    /// `Jan 5, 2025`
    #[default]
    Medium,
    /// `January 5, 2025`
    Long,
    /// `Sunday, January 5, 2025`
    Full,
}

impl DateStyle {
    /// Parse a style token, ignoring case.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "short" => Some(DateStyle::Short),
            "medium" => Some(DateStyle::Medium),
            "long" => Some(DateStyle::Long),
            "full" => Some(DateStyle::Full),
            _ => None,
        }
    }
}

/// Phone numbering plans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PhoneFormat {
    /// North American numbering plan, national form
    Us,
    /// Any country, international form
    International,
}

impl PhoneFormat {
    /// Parse a plan token, ignoring case.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_uppercase().as_str() {
            "US" => Some(PhoneFormat::Us),
            "INTERNATIONAL" | "INTL" => Some(PhoneFormat::International),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_defaults_to_true() {
        let def: VariableDefinition =
            serde_json::from_str(r#"{ "name": "CLIENT", "type": "TEXT" }"#).unwrap();
        assert!(def.required);
        assert_eq!(def.var_type, VariableType::Text);
    }

    #[test]
    fn test_validation_is_type_tagged() {
        let def = VariableDefinition::new("AMOUNT", VariableType::Number).with_validation(
            VariableValidation::Number(NumberRules {
                min: Some(0.0),
                decimals: Some(2),
                ..Default::default()
            }),
        );
        let json = serde_json::to_value(&def).unwrap();
        assert_eq!(json["validation"]["type"], "NUMBER");
        assert_eq!(json["validation"]["decimals"], 2);
        assert_eq!(json["required"], true);

        let back: VariableDefinition = serde_json::from_value(json).unwrap();
        assert_eq!(back, def);
    }

    #[test]
    fn test_camel_case_fields() {
        let def = VariableDefinition::new("START", VariableType::Date)
            .with_default("2025-01-01")
            .with_validation(VariableValidation::Date(DateRules {
                min_date: Some("2024-01-01".into()),
                format: Some(DateStyle::Long),
                ..Default::default()
            }));
        let json = serde_json::to_value(&def).unwrap();
        assert_eq!(json["defaultValue"], "2025-01-01");
        assert_eq!(json["validation"]["minDate"], "2024-01-01");
        assert_eq!(json["validation"]["format"], "long");
    }

    #[test]
    fn test_type_tokens() {
        assert_eq!(VariableType::parse("phone"), Some(VariableType::Phone));
        assert_eq!(VariableType::parse("Date"), Some(VariableType::Date));
        assert_eq!(VariableType::parse("uuid"), None);
        assert_eq!(PhoneFormat::parse("international"), Some(PhoneFormat::International));
        assert_eq!(serde_json::to_string(&PhoneFormat::Us).unwrap(), "\"US\"");
    }
}
