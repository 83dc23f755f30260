//! Integration tests for template variables.

use pagetree::model::{Document, Node, VariableDefinition, VariableType, VariableValidation};
use pagetree::variables::{
    extract_variables, fill_document, validate, validate_all, ExtractOptions,
};
use pagetree::ValidationCode;
use std::collections::HashMap;

fn values(pairs: &[(&str, &str)]) -> HashMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn definition(doc: &Document, name: &str) -> VariableDefinition {
    extract_variables(doc, &ExtractOptions::default())
        .into_iter()
        .find(|d| d.name == name)
        .unwrap_or_else(|| panic!("no variable {}", name))
}

#[test]
fn test_extended_placeholder_properties() {
    let doc = Document::with_children(vec![Node::text(
        "Hello ${NAME:TEXT:label=Full Name:required=false}",
    )]);
    let vars = extract_variables(&doc, &ExtractOptions::default());

    assert_eq!(vars.len(), 1);
    assert_eq!(vars[0].name, "NAME");
    assert_eq!(vars[0].var_type, VariableType::Text);
    assert_eq!(vars[0].label.as_deref(), Some("Full Name"));
    assert!(!vars[0].required);
}

#[test]
fn test_first_occurrence_wins() {
    let doc = Document::with_children(vec![
        Node::heading("${PARTY:TEXT:label=Party}", 2),
        Node::text("${PARTY:TEXT:label=Other}"),
    ]);
    let vars = extract_variables(&doc, &ExtractOptions::default());
    assert_eq!(vars.len(), 1);
    assert_eq!(vars[0].label.as_deref(), Some("Party"));
}

#[test]
fn test_declared_variables_take_precedence() {
    let declared = VariableDefinition::new("TENANT", VariableType::Text).with_label("Tenant");
    let doc = Document::with_children(vec![Node::text("${LANDLORD} leases to ${TENANT}")])
        .with_variables(vec![declared.clone()]);

    assert_eq!(
        extract_variables(&doc, &ExtractOptions::default()),
        vec![declared]
    );
}

#[test]
fn test_placeholders_in_nested_nodes() {
    let doc = Document::with_children(vec![
        Node::table(
            Some(Node::head_from_strings(["${COL_A}"])),
            vec![Node::row_from_strings(["${CELL}"])],
        ),
        Node::grid(vec![Node::column(None, vec![Node::text("${SIGNER_EMAIL}")])]),
        Node::list(false, vec![Node::list_item(vec![Node::text("${DUE_DATE}")])]),
    ]);
    let vars = extract_variables(&doc, &ExtractOptions::default());
    let names: Vec<&str> = vars.iter().map(|v| v.name.as_str()).collect();

    assert_eq!(names, vec!["COL_A", "CELL", "SIGNER_EMAIL", "DUE_DATE"]);
    assert_eq!(vars[2].var_type, VariableType::Email);
    assert_eq!(vars[3].var_type, VariableType::Date);
}

#[test]
fn test_number_rules() {
    let doc = Document::with_children(vec![Node::text(
        "${AMOUNT:NUMBER:min=0:max=1,000:decimals=2}",
    )]);
    let def = definition(&doc, "AMOUNT");
    assert!(matches!(def.validation, Some(VariableValidation::Number(_))));

    assert!(validate(&def, "12.34").is_ok());
    assert_eq!(validate(&def, "1500").unwrap_err().code, ValidationCode::NumberTooLarge);
    assert_eq!(validate(&def, "-1").unwrap_err().code, ValidationCode::NumberTooSmall);
    assert_eq!(validate(&def, "12.345").unwrap_err().code, ValidationCode::InvalidNumber);
    assert_eq!(validate(&def, "twelve").unwrap_err().code, ValidationCode::InvalidNumber);
}

#[test]
fn test_email_domains() {
    let doc = Document::with_children(vec![Node::text(
        "${CONTACT:EMAIL:domains=acme.com,example.org}",
    )]);
    let def = definition(&doc, "CONTACT");

    assert!(validate(&def, "jane@Example.org").is_ok());
    assert_eq!(validate(&def, "jane@other.com").unwrap_err().code, ValidationCode::InvalidDomain);
    assert_eq!(validate(&def, "not-an-email").unwrap_err().code, ValidationCode::InvalidEmail);
}

#[test]
fn test_date_bounds() {
    let doc = Document::with_children(vec![Node::text(
        "${START:DATE:minDate=2024-01-01:maxDate=2024-12-31}",
    )]);
    let def = definition(&doc, "START");

    assert!(validate(&def, "2024-06-15").is_ok());
    assert!(validate(&def, "06/15/2024").is_ok());
    assert_eq!(validate(&def, "2023-12-31").unwrap_err().code, ValidationCode::DateTooEarly);
    assert_eq!(validate(&def, "2025-01-01").unwrap_err().code, ValidationCode::DateTooLate);
    assert_eq!(validate(&def, "someday").unwrap_err().code, ValidationCode::InvalidDate);
}

#[test]
fn test_validate_all_reports_each_failure() {
    let doc = Document::with_children(vec![Node::text(
        "${CLIENT_NAME:TEXT:minLength=3} ${CLIENT_EMAIL} ${NOTES:TEXT:required=false}",
    )]);
    let defs = extract_variables(&doc, &ExtractOptions::default());

    let errors = validate_all(&defs, &values(&[("CLIENT_NAME", "Al"), ("CLIENT_EMAIL", "")]));
    let codes: Vec<(&str, ValidationCode)> =
        errors.iter().map(|e| (e.field.as_str(), e.code)).collect();
    assert_eq!(
        codes,
        vec![
            ("CLIENT_NAME", ValidationCode::MinLength),
            ("CLIENT_EMAIL", ValidationCode::Required),
        ]
    );

    assert!(
        validate_all(&defs, &values(&[("CLIENT_NAME", "Alice"), ("CLIENT_EMAIL", "a@b.co")]))
            .is_empty()
    );
}

#[test]
fn test_fill_formats_values() {
    let doc = Document::with_children(vec![
        Node::heading("Offer for ${CANDIDATE}", 1),
        Node::text(
            "Start ${START:DATE:format=long}, call ${PHONE} about ${SALARY:NUMBER:decimals=2}.",
        ),
        Node::text("Signed: ${SIGNATURE}"),
    ]);
    let filled = fill_document(
        &doc,
        &values(&[
            ("CANDIDATE", "Ada Lovelace"),
            ("START", "2024-03-01"),
            ("PHONE", "212.555.0199"),
            ("SALARY", "95000"),
        ]),
    );

    assert_eq!(filled.children[0].content(), Some("Offer for Ada Lovelace"));
    assert_eq!(
        filled.children[1].content(),
        Some("Start March 1, 2024, call (212) 555-0199 about 95000.00.")
    );
    // No value and no default: left intact and shared with the input
    assert_eq!(filled.children[2].content(), Some("Signed: ${SIGNATURE}"));
    assert!(std::sync::Arc::ptr_eq(&doc.children[2], &filled.children[2]));
}

#[test]
fn test_fill_uses_defaults() {
    let doc = Document::with_children(vec![Node::text(
        "Governed by ${LAW:TEXT:default=Delaware} law",
    )]);
    let filled = fill_document(&doc, &HashMap::new());
    assert_eq!(filled.children[0].content(), Some("Governed by Delaware law"));
}

#[test]
fn test_braced_pattern_is_validated_and_filled() {
    let doc = Document::with_children(vec![Node::text("Zip: ${ZIP:TEXT:pattern=[0-9]{5}}")]);
    let def = definition(&doc, "ZIP");
    assert!(validate(&def, "02139").is_ok());
    assert_eq!(validate(&def, "0213").unwrap_err().code, ValidationCode::Pattern);

    let filled = fill_document(&doc, &values(&[("ZIP", "02139")]));
    assert_eq!(filled.children[0].content(), Some("Zip: 02139"));
}
