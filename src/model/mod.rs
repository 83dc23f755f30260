//! Document model types.
//!
//! This module defines the document tree handed between generation,
//! editing and pagination. The tree is format-agnostic; its serialized
//! JSON form (field names and `type` discriminants) is the persisted and
//! transmitted representation.

mod document;
mod node;
mod page;
mod style;
mod variable;

pub use document::Document;
pub use node::{
    ColumnNode, ContainerNode, GridNode, HeadingNode, ListNode, Node, NodeKind, TableNode,
    TextNode,
};
pub use page::{Page, PageSize};
pub use style::{Alignment, FontSize, TextStyles};
pub use variable::{
    DateRules, DateStyle, EmailRules, NumberRules, PhoneFormat, PhoneRules, TextRules,
    VariableDefinition, VariableType, VariableValidation,
};
