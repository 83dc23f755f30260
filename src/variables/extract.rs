//! Placeholder scanning and variable inference.

use super::validate::parse_number;
use super::ExtractOptions;
use crate::model::{
    DateStyle, Document, Node, PhoneFormat, VariableDefinition, VariableType, VariableValidation,
};
use crate::path::NodePath;
use crate::visitor::{walk, NodeVisitor};
use regex::Regex;
use std::collections::HashSet;
use std::ops::Range;
use std::sync::LazyLock;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").unwrap());

/// A `${...}` placeholder found in content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Variable name
    pub name: String,

    /// Explicit type token, as written
    pub type_token: Option<String>,

    /// `key=value` properties in order of appearance
    pub properties: Vec<(String, String)>,

    /// Byte range of the whole `${...}` in the scanned text
    pub span: Range<usize>,
}

impl Placeholder {
    /// Parse the text between `${` and `}`.
    ///
    /// Returns `None` when the name is not an identifier. A segment
    /// without `=` after the type continues the previous value, so values
    /// may contain `:`.
    pub fn parse(inner: &str, span: Range<usize>) -> Option<Self> {
        let mut segments = inner.split(':');
        let name = segments.next()?.trim();
        if !NAME_RE.is_match(name) {
            return None;
        }

        let mut type_token = None;
        let mut properties: Vec<(String, String)> = Vec::new();
        for (i, segment) in segments.enumerate() {
            match segment.split_once('=') {
                Some((key, value)) => {
                    properties.push((key.trim().to_string(), value.trim().to_string()));
                }
                None if i == 0 => {
                    let token = segment.trim();
                    if !token.is_empty() {
                        type_token = Some(token.to_string());
                    }
                }
                None => {
                    if let Some((_, value)) = properties.last_mut() {
                        value.push(':');
                        value.push_str(segment.trim_end());
                    }
                }
            }
        }

        Some(Self {
            name: name.to_string(),
            type_token,
            properties,
            span,
        })
    }

    /// Look up a property value by key.
    pub fn property(&self, key: &str) -> Option<&str> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Find every placeholder in a string, in order.
///
/// A placeholder runs from `${` to the first `}` outside balanced inner
/// braces, so values such as `pattern=^\d{5}$` stay whole. An unclosed
/// `${` is skipped.
pub fn find_placeholders(text: &str) -> Vec<Placeholder> {
    let mut found = Vec::new();
    let mut from = 0;
    while let Some(offset) = text[from..].find("${") {
        let start = from + offset;
        let body = start + 2;
        match closing_brace(&text[body..]) {
            Some(len) => {
                let end = body + len + 1;
                found.extend(Placeholder::parse(&text[body..body + len], start..end));
                from = end;
            }
            None => from = body,
        }
    }
    found
}

/// Byte offset of the `}` that closes a placeholder body.
fn closing_brace(body: &str) -> Option<usize> {
    let mut depth = 0usize;
    for (i, byte) in body.bytes().enumerate() {
        match byte {
            b'{' => depth += 1,
            b'}' if depth == 0 => return Some(i),
            b'}' => depth -= 1,
            _ => {}
        }
    }
    None
}

/// Collect every placeholder in the document, in reading order.
pub fn document_placeholders(doc: &Document) -> Vec<Placeholder> {
    struct Scanner(Vec<Placeholder>);

    impl NodeVisitor for Scanner {
        fn visit_content(&mut self, _path: &NodePath, _node: &Node, content: &str) {
            self.0.extend(find_placeholders(content));
        }
    }

    let mut scanner = Scanner(Vec::new());
    walk(doc, &mut scanner);
    scanner.0
}

/// Extract the variables of a document.
///
/// A non-empty declared `variables` list is returned as is. Otherwise the
/// definitions are inferred from placeholders, keeping the first
/// occurrence of each name.
pub fn extract_variables(doc: &Document, options: &ExtractOptions) -> Vec<VariableDefinition> {
    if let Some(declared) = doc.declared_variables() {
        return declared.to_vec();
    }
    definitions_from(document_placeholders(doc), options)
}

/// Extract variables from a single string.
pub fn extract_from_text(text: &str, options: &ExtractOptions) -> Vec<VariableDefinition> {
    definitions_from(find_placeholders(text), options)
}

fn definitions_from(
    placeholders: Vec<Placeholder>,
    options: &ExtractOptions,
) -> Vec<VariableDefinition> {
    let mut seen = HashSet::new();
    let definitions: Vec<VariableDefinition> = placeholders
        .iter()
        .filter(|p| seen.insert(p.name.clone()))
        .map(|p| definition_from(p, options))
        .collect();
    log::debug!(
        "Extracted {} variables from {} placeholders",
        definitions.len(),
        placeholders.len()
    );
    definitions
}

/// Build a definition from one placeholder.
pub fn definition_from(placeholder: &Placeholder, options: &ExtractOptions) -> VariableDefinition {
    let name = placeholder.name.as_str();
    let var_type = match placeholder.type_token.as_deref() {
        Some(token) => VariableType::parse(token).unwrap_or_else(|| {
            log::warn!("Unknown variable type '{}' for {}, using TEXT", token, name);
            VariableType::Text
        }),
        None if options.infer_types => infer_type(name),
        None => VariableType::Text,
    };

    let mut def = VariableDefinition::new(name, var_type);
    for (key, value) in &placeholder.properties {
        apply_property(&mut def, key, value);
    }

    if options.infer_types && def.label.is_none() {
        def.label = Some(label_from_name(name));
    }
    def
}

fn apply_property(def: &mut VariableDefinition, key: &str, value: &str) {
    match key {
        "label" => def.label = Some(value.to_string()),
        "required" => match parse_bool(value) {
            Some(required) => def.required = required,
            None => log::warn!("Invalid required flag '{}' for {}", value, def.name),
        },
        "default" | "defaultValue" => def.default_value = Some(value.to_string()),
        "placeholder" => def.placeholder = Some(value.to_string()),
        "helpText" | "help" => def.help_text = Some(value.to_string()),
        _ => apply_rule(def, key, value),
    }
}

fn apply_rule(def: &mut VariableDefinition, key: &str, value: &str) {
    let original = def.validation.take();
    let mut rules = original
        .clone()
        .filter(|rules| rules.var_type() == def.var_type)
        .unwrap_or_else(|| VariableValidation::empty_for(def.var_type));

    let applied = match &mut rules {
        VariableValidation::Text(r) => match key {
            "minLength" => set(&mut r.min_length, value.parse().ok()),
            "maxLength" => set(&mut r.max_length, value.parse().ok()),
            "pattern" => set(&mut r.pattern, Some(value.to_string())),
            _ => false,
        },
        VariableValidation::Date(r) => match key {
            "minDate" => set(&mut r.min_date, Some(value.to_string())),
            "maxDate" => set(&mut r.max_date, Some(value.to_string())),
            "format" => set(&mut r.format, DateStyle::parse(value)),
            _ => false,
        },
        VariableValidation::Email(r) => match key {
            "domains" => {
                r.domains = value
                    .split(',')
                    .map(|d| d.trim().trim_start_matches('@').to_ascii_lowercase())
                    .filter(|d| !d.is_empty())
                    .collect();
                true
            }
            _ => false,
        },
        VariableValidation::Number(r) => match key {
            "min" => set(&mut r.min, parse_number(value)),
            "max" => set(&mut r.max, parse_number(value)),
            "decimals" => set(&mut r.decimals, value.parse().ok()),
            "step" => set(&mut r.step, parse_number(value)),
            _ => false,
        },
        VariableValidation::Phone(r) => match key {
            "format" => set(&mut r.format, PhoneFormat::parse(value)),
            "country" => set(&mut r.country, Some(value.trim().to_ascii_uppercase())),
            _ => false,
        },
    };

    if applied {
        def.validation = Some(rules);
    } else {
        log::warn!(
            "Ignoring property {}={} on {} variable {}",
            key,
            value,
            def.var_type,
            def.name
        );
        def.validation = original;
    }
}

fn set<T>(slot: &mut Option<T>, value: Option<T>) -> bool {
    match value {
        Some(value) => {
            *slot = Some(value);
            true
        }
        None => false,
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "1" => Some(true),
        "false" | "no" | "0" => Some(false),
        _ => None,
    }
}

/// Guess a type from a variable name such as `CLIENT_EMAIL` or `START_DATE`.
pub fn infer_type(name: &str) -> VariableType {
    let upper = name.to_ascii_uppercase();
    let words: Vec<&str> = upper.split('_').filter(|w| !w.is_empty()).collect();
    let has_word = |candidates: &[&str]| words.iter().any(|w| candidates.contains(w));

    if upper.contains("EMAIL") {
        VariableType::Email
    } else if upper.contains("PHONE") || has_word(&["TEL", "MOBILE", "CELL", "FAX"]) {
        VariableType::Phone
    } else if upper.contains("DATE") || has_word(&["DOB", "BIRTHDAY", "DEADLINE"]) {
        VariableType::Date
    } else if has_word(&[
        "AMOUNT", "PRICE", "TOTAL", "COUNT", "QTY", "QUANTITY", "AGE", "FEE", "SALARY", "RATE",
        "NUMBER", "PERCENT", "YEARS",
    ]) {
        VariableType::Number
    } else {
        VariableType::Text
    }
}

/// Title-case a variable name: `FULL_NAME` becomes `Full Name`.
pub fn label_from_name(name: &str) -> String {
    name.split(['_', '-'])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let lower = word.to_lowercase();
            let mut chars = lower.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NumberRules, TextRules};
    use crate::variables::fill_text;
    use std::collections::HashMap;

    #[test]
    fn test_extended_placeholder() {
        let vars = extract_from_text(
            "Hello ${NAME:TEXT:label=Full Name:required=false}",
            &ExtractOptions::default(),
        );
        assert_eq!(
            vars,
            vec![VariableDefinition::new("NAME", VariableType::Text)
                .with_label("Full Name")
                .required(false)]
        );
    }

    #[test]
    fn test_simple_placeholder_inferred() {
        let vars = extract_from_text("Send to ${CLIENT_EMAIL}", &ExtractOptions::default());
        assert_eq!(vars[0].var_type, VariableType::Email);
        assert_eq!(vars[0].label.as_deref(), Some("Client Email"));
        assert!(vars[0].required);

        let plain = ExtractOptions::new().with_infer_types(false);
        let vars = extract_from_text("Send to ${CLIENT_EMAIL}", &plain);
        assert_eq!(vars[0].var_type, VariableType::Text);
        assert!(vars[0].label.is_none());
    }

    #[test]
    fn test_validation_keys() {
        let vars = extract_from_text(
            "${CODE:TEXT:minLength=2:maxLength=8:pattern=^[A-Z]+$} ${FEE:NUMBER:min=0:max=100.5:decimals=2}",
            &ExtractOptions::default(),
        );
        assert_eq!(
            vars[0].validation,
            Some(VariableValidation::Text(TextRules {
                min_length: Some(2),
                max_length: Some(8),
                pattern: Some("^[A-Z]+$".to_string()),
            }))
        );
        assert_eq!(
            vars[1].validation,
            Some(VariableValidation::Number(NumberRules {
                min: Some(0.0),
                max: Some(100.5),
                decimals: Some(2),
                step: None,
            }))
        );
    }

    #[test]
    fn test_first_occurrence_wins() {
        let vars = extract_from_text(
            "${NAME:TEXT:label=First} and ${NAME:TEXT:label=Second}",
            &ExtractOptions::default(),
        );
        assert_eq!(vars.len(), 1);
        assert_eq!(vars[0].label.as_deref(), Some("First"));
    }

    #[test]
    fn test_domains_and_unknown_type() {
        let vars = extract_from_text(
            "${WORK:EMAIL:domains=Acme.com, @example.org} ${X:MONEY}",
            &ExtractOptions::default(),
        );
        match &vars[0].validation {
            Some(VariableValidation::Email(r)) => {
                assert_eq!(r.domains, vec!["acme.com", "example.org"]);
            }
            other => panic!("unexpected rules {:?}", other),
        }
        assert_eq!(vars[1].var_type, VariableType::Text);
    }

    #[test]
    fn test_value_with_colon() {
        let p = find_placeholders("${T:TEXT:default=10:30}");
        assert_eq!(p[0].property("default"), Some("10:30"));
        assert_eq!(p[0].span, 0..23);
    }

    #[test]
    fn test_pattern_with_quantifier_braces() {
        let text = "Zip: ${ZIP:TEXT:pattern=^\\d{5}$}";
        let vars = extract_from_text(text, &ExtractOptions::default());
        assert_eq!(vars.len(), 1);
        assert_eq!(vars[0].name, "ZIP");
        assert_eq!(
            vars[0].validation,
            Some(VariableValidation::Text(TextRules {
                pattern: Some("^\\d{5}$".to_string()),
                ..TextRules::default()
            }))
        );

        let definitions: HashMap<String, VariableDefinition> =
            vars.into_iter().map(|d| (d.name.clone(), d)).collect();
        let values = HashMap::from([("ZIP".to_string(), "02139".to_string())]);
        assert_eq!(fill_text(text, &definitions, &values), "Zip: 02139");
    }

    #[test]
    fn test_braced_pattern_in_document() {
        let doc = Document::with_children(vec![Node::text(
            "Zip: ${ZIP:TEXT:pattern=[0-9]{5}} and ${CITY}",
        )]);
        let vars = extract_variables(&doc, &ExtractOptions::default());
        let names: Vec<&str> = vars.iter().map(|v| v.name.as_str()).collect();
        assert_eq!(names, vec!["ZIP", "CITY"]);
        match &vars[0].validation {
            Some(VariableValidation::Text(r)) => {
                assert_eq!(r.pattern.as_deref(), Some("[0-9]{5}"));
            }
            other => panic!("unexpected rules {:?}", other),
        }
    }

    #[test]
    fn test_unclosed_placeholder_skipped() {
        let p = find_placeholders("${A:TEXT:pattern={2 and ${B}");
        assert_eq!(p.len(), 1);
        assert_eq!(p[0].name, "B");
        assert_eq!(p[0].span, 24..28);

        let p = find_placeholders("${OPEN then ${NEXT}");
        assert_eq!(p.len(), 1);
        assert_eq!(p[0].name, "NEXT");
        assert_eq!(p[0].span, 12..19);

        let p = find_placeholders("x ${C:TEXT:pattern=a{1,2}b{3}} y");
        assert_eq!(p[0].property("pattern"), Some("a{1,2}b{3}"));
        assert_eq!(p[0].span, 2..30);
    }

    #[test]
    fn test_invalid_names_ignored() {
        assert!(find_placeholders("${} ${1ABC} ${ has space }").is_empty());
        assert!(find_placeholders("$NAME {NAME}").is_empty());
    }

    #[test]
    fn test_declared_list_takes_precedence() {
        let doc = Document::with_children(vec![Node::text("${A} ${B}")])
            .with_variables(vec![VariableDefinition::new("Z", VariableType::Date)]);
        let vars = extract_variables(&doc, &ExtractOptions::default());
        assert_eq!(vars.len(), 1);
        assert_eq!(vars[0].name, "Z");

        let doc = Document::with_children(vec![Node::text("${A} ${B}")]).with_variables(Vec::new());
        let vars = extract_variables(&doc, &ExtractOptions::default());
        assert_eq!(vars.len(), 2);
    }

    #[test]
    fn test_document_scan_includes_table_head() {
        let doc = Document::with_children(vec![Node::table(
            Some(Node::head_from_strings(["${HEAD_VAR}"])),
            vec![Node::row_from_strings(["${ROW_VAR}"])],
        )]);
        let names: Vec<String> = extract_variables(&doc, &ExtractOptions::default())
            .into_iter()
            .map(|v| v.name)
            .collect();
        assert_eq!(names, vec!["HEAD_VAR", "ROW_VAR"]);
    }

    #[test]
    fn test_infer_type_and_label() {
        assert_eq!(infer_type("START_DATE"), VariableType::Date);
        assert_eq!(infer_type("MOBILE"), VariableType::Phone);
        assert_eq!(infer_type("PHONE_NUMBER"), VariableType::Phone);
        assert_eq!(infer_type("TOTAL_AMOUNT"), VariableType::Number);
        assert_eq!(infer_type("COMPANY"), VariableType::Text);
        assert_eq!(label_from_name("FULL_NAME"), "Full Name");
        assert_eq!(label_from_name("dob"), "Dob");
    }
}
