//! Integration tests for loading and validating persisted documents.

use pagetree::schema::{from_value, validate_document};
use pagetree::{parse_file, to_json, Error, JsonFormat, Node, Pagetree};
use serde_json::json;
use std::io::Write;
use tempfile::NamedTempFile;

const LEASE: &str = r#"{
    "type": "document",
    "children": [
        { "type": "heading", "level": 1, "content": "Residential Lease",
          "styles": { "bold": true, "alignment": "center" } },
        { "type": "text", "content": "This lease begins on ${START:DATE:format=long}." },
        { "type": "list", "ordered": true, "children": [
            { "type": "list_item", "children": [
                { "type": "text", "content": "Rent is due monthly." }
            ] }
        ] },
        { "type": "table",
          "head": { "type": "table_head", "children": [
              { "type": "table_column", "children": [{ "type": "text", "content": "Item" }] }
          ] },
          "children": [
              { "type": "table_row", "children": [
                  { "type": "table_column", "children": [{ "type": "text", "content": "Deposit" }] }
              ] }
          ] },
        { "type": "page_break" },
        { "type": "grid", "columns": 2, "children": [
            { "type": "column", "width": 50, "children": [
                { "type": "text", "content": "Landlord" }
            ] },
            { "type": "column", "width": 50, "children": [{ "type": "text", "content": "Tenant" }] }
        ] }
    ],
    "variables": [
        { "name": "START", "type": "DATE", "label": "Start date", "required": true }
    ]
}"#;

fn write_temp(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_parse_file() {
    let file = write_temp(LEASE);
    let doc = parse_file(file.path()).unwrap();

    assert_eq!(doc.len(), 6);
    assert_eq!(doc.declared_variables().map(|v| v.len()), Some(1));
    assert!(validate_document(&doc).is_ok());
}

#[test]
fn test_parse_file_missing() {
    let result = parse_file("/nonexistent/contract.json");
    assert!(matches!(result, Err(Error::Io(_))));
}

#[test]
fn test_persisted_form_reloads() {
    let file = write_temp(LEASE);
    let doc = parse_file(file.path()).unwrap();

    let json = to_json(&doc, JsonFormat::Compact).unwrap();
    let reloaded = pagetree::parse_json(&json).unwrap();
    assert_eq!(reloaded, doc);
}

#[test]
fn test_builder_from_file() {
    let file = write_temp(LEASE);
    let result = Pagetree::new().parse(file.path()).unwrap();

    let pages = result.paginate();
    // The explicit page break puts the signature grid on its own page
    assert_eq!(pages.len(), 2);
    assert!(matches!(pages[1].nodes[0].as_ref(), Node::Grid(_)));
    assert_eq!(result.variables()[0].label.as_deref(), Some("Start date"));
}

#[test]
fn test_rejections_name_the_location() {
    let cases = [
        (
            json!({ "children": [{ "type": "text" }] }),
            "children[0].content",
        ),
        (
            json!({ "children": [{ "type": "list", "children": [
                { "type": "text", "content": "x" }
            ] }] }),
            "children[0].children[0].type",
        ),
        (
            json!({ "children": [{ "type": "grid", "columns": 1, "children": [
                { "type": "column", "children": [{ "type": "page_break" }] }
            ] }] }),
            "children[0].children[0].children[0].type",
        ),
        (
            json!({ "children": [{ "type": "video", "src": "x" }] }),
            "children[0].type",
        ),
        (
            json!({ "children": [{ "type": "text", "content": "a" }, { "type": "PageBreak" }] }),
            "children[1].type",
        ),
        (json!({ "children": {} }), "children"),
    ];

    for (value, path) in cases {
        let err = from_value(&value).unwrap_err();
        assert_eq!(err.path, path, "{}", value);
    }
}
