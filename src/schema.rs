//! Schema validation of serialized document trees.
//!
//! Trees arriving from storage or from a generation provider are untyped
//! JSON. They are checked here before being accepted: every node must have
//! a known `type`, sit in a position its kind is allowed in, and carry
//! well-typed fields. Invalid trees are rejected with the location of the
//! first problem; nothing is coerced.
//!
//! Containment rules:
//!
//! | Position | Allowed kinds |
//! |---|---|
//! | document root | `text`, `heading`, `page_break`, `list`, `table`, `grid` |
//! | list item, table cell, grid column | same as root except `page_break` |
//! | `list.children` | `list_item` |
//! | `table.head` | `table_head` |
//! | `table.children` | `table_row` |
//! | `table_head.children`, `table_row.children` | `table_column` |
//! | `grid.children` | `column` |

use crate::error::SchemaError;
use crate::model::{Alignment, Document, FontSize, NodeKind, VariableDefinition, VariableType};
use serde_json::{Map, Value};

type SchemaResult<T> = std::result::Result<T, SchemaError>;

/// Where a node appears, which decides the kinds allowed there.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    Root,
    Block,
    ListItems,
    TableHead,
    TableRows,
    Cells,
    GridColumns,
}

impl Position {
    fn allows(self, kind: NodeKind) -> bool {
        match self {
            Position::Root => kind.is_block(),
            Position::Block => kind.is_block() && kind != NodeKind::PageBreak,
            Position::ListItems => kind == NodeKind::ListItem,
            Position::TableHead => kind == NodeKind::TableHead,
            Position::TableRows => kind == NodeKind::TableRow,
            Position::Cells => kind == NodeKind::TableColumn,
            Position::GridColumns => kind == NodeKind::Column,
        }
    }

    fn expected(self) -> &'static str {
        match self {
            Position::Root => "a block node (text, heading, page_break, list, table, grid)",
            Position::Block => "a block node (text, heading, list, table, grid)",
            Position::ListItems => "a list_item",
            Position::TableHead => "a table_head",
            Position::TableRows => "a table_row",
            Position::Cells => "a table_column",
            Position::GridColumns => "a column",
        }
    }
}

/// Validate a JSON value and convert it into a [`Document`].
///
/// # Example
///
/// ```
/// use pagetree::schema::from_value;
/// use serde_json::json;
///
/// let doc = from_value(&json!({
///     "children": [{ "type": "heading", "level": 1, "content": "Lease" }]
/// })).unwrap();
/// assert_eq!(doc.len(), 1);
///
/// let err = from_value(&json!({
///     "children": [{ "type": "heading", "level": 9, "content": "Lease" }]
/// })).unwrap_err();
/// assert_eq!(err.path, "children[0].level");
/// ```
pub fn from_value(value: &Value) -> SchemaResult<Document> {
    validate_value(value)?;
    serde_json::from_value(value.clone()).map_err(|e| SchemaError::new("$", e.to_string()))
}

/// Validate a JSON value against the document schema.
pub fn validate_value(value: &Value) -> SchemaResult<()> {
    let root = expect_object(value, "$")?;

    if let Some(kind) = root.get("type") {
        if kind.as_str() != Some("document") {
            return Err(SchemaError::new("type", "root type must be \"document\" if present"));
        }
    }

    let children = root
        .get("children")
        .ok_or_else(|| SchemaError::new("children", "missing required field"))?;
    validate_children(children, "children", Position::Root)?;

    match root.get("variables") {
        None | Some(Value::Null) => {}
        Some(Value::Array(vars)) => {
            for (i, var) in vars.iter().enumerate() {
                validate_variable(var, &format!("variables[{}]", i))?;
            }
        }
        Some(_) => return Err(SchemaError::new("variables", "expected array")),
    }

    Ok(())
}

/// Validate a typed document, e.g. one assembled in code.
pub fn validate_document(doc: &Document) -> SchemaResult<()> {
    let value = serde_json::to_value(doc).map_err(|e| SchemaError::new("$", e.to_string()))?;
    validate_value(&value)
}

fn validate_children(value: &Value, path: &str, position: Position) -> SchemaResult<()> {
    let items = value
        .as_array()
        .ok_or_else(|| SchemaError::new(path, "expected array"))?;
    for (i, item) in items.iter().enumerate() {
        validate_node(item, &format!("{}[{}]", path, i), position)?;
    }
    Ok(())
}

fn validate_node(value: &Value, path: &str, position: Position) -> SchemaResult<()> {
    let obj = expect_object(value, path)?;
    let type_path = format!("{}.type", path);
    let type_name = obj
        .get("type")
        .ok_or_else(|| SchemaError::new(&type_path, "missing required field"))?
        .as_str()
        .ok_or_else(|| SchemaError::new(&type_path, "expected string"))?;
    let kind = NodeKind::from_type_name(type_name).ok_or_else(|| {
        SchemaError::new(&type_path, format!("unknown node type \"{}\"", type_name))
    })?;

    if !position.allows(kind) {
        return Err(SchemaError::new(
            &type_path,
            format!("\"{}\" not allowed here, expected {}", type_name, position.expected()),
        ));
    }

    match kind {
        NodeKind::Text => {
            expect_string(obj, path, "content")?;
            validate_styles(obj, path)?;
        }
        NodeKind::Heading => {
            expect_int_range(obj, path, "level", 1, 6, true)?;
            expect_string(obj, path, "content")?;
            validate_styles(obj, path)?;
        }
        NodeKind::PageBreak => {}
        NodeKind::List => {
            optional_bool(obj, path, "ordered")?;
            expect_int_range(obj, path, "start", 1, u32::MAX as i64, false)?;
            validate_child_field(obj, path, Position::ListItems)?;
        }
        NodeKind::ListItem | NodeKind::TableColumn => {
            validate_child_field(obj, path, Position::Block)?;
        }
        NodeKind::Table => {
            match obj.get("head") {
                None | Some(Value::Null) => {}
                Some(head) => validate_node(head, &format!("{}.head", path), Position::TableHead)?,
            }
            validate_child_field(obj, path, Position::TableRows)?;
        }
        NodeKind::TableHead | NodeKind::TableRow => {
            validate_child_field(obj, path, Position::Cells)?;
        }
        NodeKind::Grid => {
            expect_int_range(obj, path, "columns", 1, u32::MAX as i64, true)?;
            validate_child_field(obj, path, Position::GridColumns)?;
        }
        NodeKind::Column => {
            expect_int_range(obj, path, "width", 1, 100, false)?;
            validate_child_field(obj, path, Position::Block)?;
        }
    }

    Ok(())
}

fn validate_child_field(
    obj: &Map<String, Value>,
    path: &str,
    position: Position,
) -> SchemaResult<()> {
    match obj.get("children") {
        None => Ok(()),
        Some(children) => validate_children(children, &format!("{}.children", path), position),
    }
}

fn validate_styles(obj: &Map<String, Value>, path: &str) -> SchemaResult<()> {
    let styles = match obj.get("styles") {
        None | Some(Value::Null) => return Ok(()),
        Some(s) => s,
    };
    let styles_path = format!("{}.styles", path);
    let styles = expect_object(styles, &styles_path)?;

    for flag in ["bold", "italic", "underline"] {
        optional_bool(styles, &styles_path, flag)?;
    }
    if let Some(size) = styles.get("fontSize") {
        let field = format!("{}.fontSize", styles_path);
        let token = size
            .as_str()
            .ok_or_else(|| SchemaError::new(&field, "expected string"))?;
        if !FontSize::ALL.iter().any(|s| s.as_str() == token) {
            return Err(SchemaError::new(field, format!("unknown font size \"{}\"", token)));
        }
    }
    if let Some(alignment) = styles.get("alignment") {
        let field = format!("{}.alignment", styles_path);
        let token = alignment
            .as_str()
            .ok_or_else(|| SchemaError::new(&field, "expected string"))?;
        if !Alignment::ALL.iter().any(|a| a.as_str() == token) {
            return Err(SchemaError::new(field, format!("unknown alignment \"{}\"", token)));
        }
    }
    if let Some(color) = styles.get("color") {
        if !color.is_string() {
            return Err(SchemaError::new(format!("{}.color", styles_path), "expected string"));
        }
    }
    Ok(())
}

fn validate_variable(value: &Value, path: &str) -> SchemaResult<()> {
    let obj = expect_object(value, path)?;
    let name = expect_string(obj, path, "name")?;
    if name.trim().is_empty() {
        return Err(SchemaError::new(format!("{}.name", path), "must not be empty"));
    }

    let type_field = format!("{}.type", path);
    let token = expect_string(obj, path, "type")?;
    let var_type = VariableType::parse(token)
        .filter(|t| t.as_str() == token)
        .ok_or_else(|| {
            SchemaError::new(&type_field, format!("unknown variable type \"{}\"", token))
        })?;

    if let Some(validation) = obj.get("validation").filter(|v| !v.is_null()) {
        let rules_path = format!("{}.validation", path);
        let rules = expect_object(validation, &rules_path)?;
        let rules_type = expect_string(rules, &rules_path, "type")?;
        if rules_type != var_type.as_str() {
            return Err(SchemaError::new(
                format!("{}.type", rules_path),
                format!(
                    "validation for {} does not match variable type {}",
                    rules_type, var_type
                ),
            ));
        }
    }

    serde_json::from_value::<VariableDefinition>(value.clone())
        .map(|_| ())
        .map_err(|e| SchemaError::new(path, e.to_string()))
}

fn expect_object<'a>(value: &'a Value, path: &str) -> SchemaResult<&'a Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| SchemaError::new(path, "expected object"))
}

fn expect_string<'a>(
    obj: &'a Map<String, Value>,
    path: &str,
    field: &str,
) -> SchemaResult<&'a str> {
    let field_path = format!("{}.{}", path, field);
    obj.get(field)
        .ok_or_else(|| SchemaError::new(&field_path, "missing required field"))?
        .as_str()
        .ok_or_else(|| SchemaError::new(&field_path, "expected string"))
}

fn optional_bool(obj: &Map<String, Value>, path: &str, field: &str) -> SchemaResult<()> {
    match obj.get(field) {
        None | Some(Value::Bool(_)) => Ok(()),
        Some(_) => Err(SchemaError::new(format!("{}.{}", path, field), "expected boolean")),
    }
}

fn expect_int_range(
    obj: &Map<String, Value>,
    path: &str,
    field: &str,
    min: i64,
    max: i64,
    required: bool,
) -> SchemaResult<()> {
    let field_path = format!("{}.{}", path, field);
    let value = match obj.get(field) {
        None | Some(Value::Null) if !required => return Ok(()),
        None | Some(Value::Null) => {
            return Err(SchemaError::new(field_path, "missing required field"))
        }
        Some(v) => v,
    };
    match value.as_i64() {
        Some(n) if (min..=max).contains(&n) => Ok(()),
        _ => Err(SchemaError::new(
            field_path,
            format!("expected integer {}..={}", min, max),
        )),
    }
}
