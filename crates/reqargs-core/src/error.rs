//! # Error Types
//!
//! Three error kinds, one per stage:
//!
//! - [`SchemaError`]: a schema could not be built (declaration time).
//! - [`Invalid`]: a tree of coercion failures from one validation pass.
//! - [`BadParams`]: the single boundary error handed to the web layer.
//!
//! ## Aggregation
//!
//! A validation pass never fails fast. Each failing field contributes a
//! child to the root [`Invalid`], tagged with the field's declaration index,
//! so that the caller sees every problem with the request at once.

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

/// Separator used when several messages collapse onto one path.
const MESSAGE_SEPARATOR: &str = "; ";

/// Error raised while building a [`Schema`](crate::Schema).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// Two fields of the merged sequence share a name.
    #[error("field '{0}' is declared more than once")]
    DuplicateField(String),

    /// `override_field` named a field that no base schema declares.
    #[error("cannot override undeclared field '{0}'")]
    UnknownField(String),

    /// A field was declared without a name.
    #[error("field name must not be empty")]
    EmptyName,
}

/// A validation failure for one schema node, with nested child failures.
///
/// The root node of a pass is unnamed; its children are the failing fields,
/// each carrying its declaration index in [`position`](Self::position).
/// List adapters nest element failures below the field, named by index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invalid {
    name: String,
    position: Option<usize>,
    messages: Vec<String>,
    children: Vec<Invalid>,
}

impl Invalid {
    /// A failure of node `name` with a single message.
    pub fn new(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: None,
            messages: vec![message.into()],
            children: Vec::new(),
        }
    }

    /// A message-less node that only groups child failures.
    pub fn node(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            position: None,
            messages: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Attach `child` as a failure of the sub-node at `position`.
    pub fn add(&mut self, mut child: Invalid, position: usize) {
        child.position = Some(position);
        self.children.push(child);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declaration index of this node within its parent, if attached.
    pub fn position(&self) -> Option<usize> {
        self.position
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn children(&self) -> &[Invalid] {
        &self.children
    }

    /// Find the direct child failure for the node called `name`.
    pub fn child(&self, name: &str) -> Option<&Invalid> {
        self.children.iter().find(|c| c.name == name)
    }

    /// Flatten the tree into `dotted.path -> "msg; msg"`.
    ///
    /// Every leaf contributes one entry. The key joins the non-empty node
    /// names along the path from the root; the value joins every message
    /// found along that path.
    pub fn asdict(&self) -> BTreeMap<String, String> {
        let mut out = BTreeMap::new();
        self.collect(&mut Vec::new(), &mut Vec::new(), &mut out);
        out
    }

    fn collect<'a>(
        &'a self,
        keys: &mut Vec<&'a str>,
        messages: &mut Vec<&'a str>,
        out: &mut BTreeMap<String, String>,
    ) {
        let pushed_key = !self.name.is_empty();
        if pushed_key {
            keys.push(&self.name);
        }
        let before = messages.len();
        messages.extend(self.messages.iter().map(String::as_str));

        if self.children.is_empty() {
            out.insert(keys.join("."), messages.join(MESSAGE_SEPARATOR));
        } else {
            for child in &self.children {
                child.collect(keys, messages, out);
            }
        }

        messages.truncate(before);
        if pushed_key {
            keys.pop();
        }
    }
}

impl fmt::Display for Invalid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_details(f, &self.asdict())
    }
}

impl std::error::Error for Invalid {}

/// The boundary error: a request carried bad parameters.
///
/// The web layer turns this into a client error response; see
/// [`details`](Self::details) for the structured body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BadParams {
    /// Per-field failures keyed by dotted field path.
    #[error("bad parameters: {}", DisplayDetails(.0))]
    Fields(BTreeMap<String, String>),

    /// The request as a whole was unusable (e.g. the body is not JSON).
    #[error("bad parameters: {0}")]
    Message(String),
}

impl BadParams {
    pub fn message(text: impl Into<String>) -> Self {
        Self::Message(text.into())
    }

    /// Structured per-field detail; empty for whole-request failures.
    pub fn asdict(&self) -> BTreeMap<String, String> {
        match self {
            Self::Fields(fields) => fields.clone(),
            Self::Message(_) => BTreeMap::new(),
        }
    }

    /// JSON rendering of the error detail for response bodies.
    pub fn details(&self) -> serde_json::Value {
        match self {
            Self::Fields(fields) => serde_json::Value::Object(
                fields
                    .iter()
                    .map(|(k, v)| (k.clone(), serde_json::Value::String(v.clone())))
                    .collect(),
            ),
            Self::Message(text) => serde_json::Value::String(text.clone()),
        }
    }
}

impl From<Invalid> for BadParams {
    fn from(err: Invalid) -> Self {
        Self::Fields(err.asdict())
    }
}

struct DisplayDetails<'a>(&'a BTreeMap<String, String>);

impl fmt::Display for DisplayDetails<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_details(f, self.0)
    }
}

fn write_details(f: &mut fmt::Formatter<'_>, details: &BTreeMap<String, String>) -> fmt::Result {
    for (i, (path, message)) in details.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        if path.is_empty() {
            write!(f, "(root): {message}")?;
        } else {
            write!(f, "{path}: {message}")?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_field_failure() -> Invalid {
        let mut root = Invalid::node("");
        root.add(Invalid::new("b", "Required"), 1);
        root.add(Invalid::new("c", "\"x\" is not a number"), 2);
        root
    }

    #[test]
    fn asdict_keys_by_field_name() {
        let dict = two_field_failure().asdict();
        assert_eq!(dict.len(), 2);
        assert_eq!(dict["b"], "Required");
        assert_eq!(dict["c"], "\"x\" is not a number");
    }

    #[test]
    fn children_keep_declaration_positions() {
        let root = two_field_failure();
        assert_eq!(root.child("b").and_then(Invalid::position), Some(1));
        assert_eq!(root.child("c").and_then(Invalid::position), Some(2));
        assert!(root.child("a").is_none());
    }

    #[test]
    fn nested_children_produce_dotted_paths() {
        let mut field = Invalid::node("ids");
        field.add(Invalid::new("1", "\"x\" is not a number"), 1);
        let mut root = Invalid::node("");
        root.add(field, 0);

        let dict = root.asdict();
        assert_eq!(dict.len(), 1);
        assert_eq!(dict["ids.1"], "\"x\" is not a number");
    }

    #[test]
    fn messages_along_path_are_joined() {
        let mut field = Invalid::new("ids", "bad list");
        field.add(Invalid::new("0", "bad item"), 0);
        let mut root = Invalid::node("");
        root.add(field, 0);

        assert_eq!(root.asdict()["ids.0"], "bad list; bad item");
    }

    #[test]
    fn root_failure_uses_empty_key() {
        let root = Invalid::new("", "\"[]\" is not a mapping type");
        let dict = root.asdict();
        assert_eq!(dict[""], "\"[]\" is not a mapping type");
        assert!(root.to_string().starts_with("(root): "));
    }

    #[test]
    fn bad_params_from_invalid_carries_all_fields() {
        let err = BadParams::from(two_field_failure());
        let dict = err.asdict();
        assert!(dict.contains_key("b"));
        assert!(dict.contains_key("c"));
        let text = err.to_string();
        assert!(text.contains("b: Required"), "got: {text}");
    }

    #[test]
    fn bad_params_message_has_no_field_detail() {
        let err = BadParams::message("Json required");
        assert!(err.asdict().is_empty());
        assert_eq!(err.details(), serde_json::json!("Json required"));
        assert_eq!(err.to_string(), "bad parameters: Json required");
    }

    #[test]
    fn bad_params_details_is_json_object() {
        let err = BadParams::from(two_field_failure());
        assert_eq!(
            err.details(),
            serde_json::json!({"b": "Required", "c": "\"x\" is not a number"})
        );
    }

    #[test]
    fn schema_error_display() {
        assert!(SchemaError::DuplicateField("a".into()).to_string().contains("'a'"));
        assert!(SchemaError::UnknownField("z".into()).to_string().contains("'z'"));
    }
}
