//! Selection tree nodes: plain fields and cursor-paginated connections.
//!
//! A node renders itself into the query document and merges one page of
//! server data into the accumulated output. Connections additionally own
//! their pagination state: the last consumed cursor and whether the server
//! reported more pages.

use std::collections::HashMap;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::QueryError;
use crate::variables::{VariableRef, VariableSet};

/// Fixed page size requested from every connection.
pub const PAGE_SIZE: u32 = 300;

/// Indentation step of the rendered document, in spaces.
pub(crate) const INDENT_STEP: usize = 2;

/// A filter value: either a variable reference or a literal.
///
/// Literals must be numbers, strings, or arrays thereof; anything else is
/// rejected at render time.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    /// Reference to a declared variable, rendered as `$name`.
    Variable(VariableRef),
    /// Literal value rendered inline.
    Literal(Value),
}

impl From<VariableRef> for FilterValue {
    fn from(var: VariableRef) -> Self {
        Self::Variable(var)
    }
}

impl From<&VariableRef> for FilterValue {
    fn from(var: &VariableRef) -> Self {
        Self::Variable(var.clone())
    }
}

impl From<Value> for FilterValue {
    fn from(value: Value) -> Self {
        Self::Literal(value)
    }
}

impl From<&str> for FilterValue {
    fn from(value: &str) -> Self {
        Self::Literal(Value::from(value))
    }
}

impl From<String> for FilterValue {
    fn from(value: String) -> Self {
        Self::Literal(Value::from(value))
    }
}

impl From<i64> for FilterValue {
    fn from(value: i64) -> Self {
        Self::Literal(Value::from(value))
    }
}

impl From<u64> for FilterValue {
    fn from(value: u64) -> Self {
        Self::Literal(Value::from(value))
    }
}

impl From<f64> for FilterValue {
    fn from(value: f64) -> Self {
        Self::Literal(Value::from(value))
    }
}

impl From<Vec<&str>> for FilterValue {
    fn from(values: Vec<&str>) -> Self {
        Self::Literal(Value::from(values))
    }
}

impl From<Vec<String>> for FilterValue {
    fn from(values: Vec<String>) -> Self {
        Self::Literal(Value::from(values))
    }
}

impl From<Vec<i64>> for FilterValue {
    fn from(values: Vec<i64>) -> Self {
        Self::Literal(Value::from(values))
    }
}

/// Node kind: the set of variants is closed.
#[derive(Debug, Clone, PartialEq, Eq)]
enum NodeKind {
    /// Single object or scalar field, not paginated.
    Field,
    /// Cursor-paginated list wrapped in an edges/pageInfo envelope.
    Connection {
        /// Position after the last consumed edge; `None` means start.
        cursor: Option<String>,
    },
}

/// Bookkeeping threaded alongside the output during merging.
///
/// The output handed to the caller never contains pagination bookkeeping;
/// this parallel tree carries it instead and is dropped when the walk ends.
/// Each state node corresponds to one output slot.
#[derive(Debug, Default)]
pub(crate) struct MergeState {
    /// Per-field child states (object-shaped slots).
    children: HashMap<String, MergeState>,
    /// Per-index child states (array-shaped slots).
    items: Vec<MergeState>,
    /// Connection only: edge cursor to position in the output list, so a
    /// re-fetched outer page updates the already-materialized item.
    cursor_index: HashMap<String, usize>,
}

impl MergeState {
    fn child(&mut self, name: &str) -> &mut MergeState {
        self.children.entry(name.to_string()).or_default()
    }

    fn item(&mut self, index: usize) -> &mut MergeState {
        if self.items.len() <= index {
            self.items.resize_with(index + 1, MergeState::default);
        }
        &mut self.items[index]
    }
}

/// One field in the selection tree.
///
/// Children are owned by their parent; moving a node into another parent is
/// the only way to re-parent it.
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionNode {
    name: String,
    kind: NodeKind,
    filters: IndexMap<String, FilterValue>,
    children: Vec<SelectionNode>,
    /// True until this node's own contribution is known to be exhausted.
    pending: bool,
}

impl SelectionNode {
    /// Create a plain (non-paginated) field.
    #[must_use]
    pub fn field(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Field,
            filters: IndexMap::new(),
            children: Vec::new(),
            pending: true,
        }
    }

    /// Create a cursor-paginated connection field.
    #[must_use]
    pub fn connection(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: NodeKind::Connection { cursor: None },
            filters: IndexMap::new(),
            children: Vec::new(),
            pending: true,
        }
    }

    /// Wire field name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns `true` for connection nodes.
    #[must_use]
    pub fn is_connection(&self) -> bool {
        matches!(self.kind, NodeKind::Connection { .. })
    }

    /// Returns `true` if any descendant is a connection.
    #[must_use]
    pub fn has_connection_descendant(&self) -> bool {
        self.children
            .iter()
            .any(|child| child.is_connection() || child.has_connection_descendant())
    }

    /// Append a plain child field and return it for further configuration.
    pub fn add_field(&mut self, name: impl Into<String>) -> &mut SelectionNode {
        self.add_child(SelectionNode::field(name))
    }

    /// Append a child connection and return it for further configuration.
    pub fn add_connection(&mut self, name: impl Into<String>) -> &mut SelectionNode {
        self.add_child(SelectionNode::connection(name))
    }

    /// Take ownership of a node as a child.
    pub fn add_child(&mut self, node: SelectionNode) -> &mut SelectionNode {
        self.children.push(node);
        let index = self.children.len() - 1;
        &mut self.children[index]
    }

    /// Set a filter on this field.
    pub fn set_filter(&mut self, key: impl Into<String>, value: impl Into<FilterValue>) {
        self.filters.insert(key.into(), value.into());
    }

    /// Returns `true` if a filter with the key is set.
    #[must_use]
    pub fn has_filter(&self, key: &str) -> bool {
        self.filters.contains_key(key)
    }

    /// Remove a filter by key.
    pub fn remove_filter(&mut self, key: &str) {
        self.filters.shift_remove(key);
    }

    /// Whether this node or any descendant still needs another round trip.
    #[must_use]
    pub fn needs_more(&self) -> bool {
        self.pending || self.children.iter().any(SelectionNode::needs_more)
    }

    /// Mark this node's whole subtree as exhausted.
    pub(crate) fn mark_exhausted(&mut self) {
        self.pending = false;
        for child in &mut self.children {
            child.mark_exhausted();
        }
    }

    /// Restart pagination for every connection in the subtree.
    pub(crate) fn reset_cursors(&mut self) {
        if let NodeKind::Connection { cursor } = &mut self.kind {
            *cursor = None;
            self.pending = true;
        }
        for child in &mut self.children {
            child.reset_cursors();
        }
    }

    /// Render this node into query text at the given indentation.
    pub(crate) fn render(
        &self,
        indent: usize,
        vars: &VariableSet,
        parent_path: &str,
    ) -> Result<String, QueryError> {
        let path = join_path(parent_path, &self.name);
        let pad = " ".repeat(indent);
        let filters = self.filter_clause(vars, &path)?;

        match self.kind {
            NodeKind::Field => {
                let header = format!("{pad}{}{filters}", self.name);
                if self.children.is_empty() {
                    return Ok(header);
                }
                let mut lines = vec![format!("{header} {{")];
                for child in &self.children {
                    lines.push(child.render(indent + INDENT_STEP, vars, &path)?);
                }
                lines.push(format!("{pad}}}"));
                Ok(lines.join("\n"))
            }
            NodeKind::Connection { .. } => {
                if self.children.is_empty() {
                    return Err(QueryError::MissingSelection { path });
                }
                let edges_pad = " ".repeat(indent + INDENT_STEP);
                let node_pad = " ".repeat(indent + INDENT_STEP * 2);

                let mut lines = vec![format!("{pad}{}{filters} {{", self.name)];
                lines.push(format!("{edges_pad}edges {{"));
                lines.push(format!("{node_pad}node {{"));
                for child in &self.children {
                    lines.push(child.render(indent + INDENT_STEP * 3, vars, &path)?);
                }
                lines.push(format!("{node_pad}}}"));
                if self.has_connection_descendant() {
                    // The edge cursor keys the merge index across pages.
                    lines.push(format!("{node_pad}cursor"));
                }
                lines.push(format!("{edges_pad}}}"));
                lines.push(format!("{edges_pad}pageInfo {{"));
                lines.push(format!("{node_pad}endCursor"));
                lines.push(format!("{node_pad}hasNextPage"));
                lines.push(format!("{edges_pad}}}"));
                lines.push(format!("{pad}}}"));
                Ok(lines.join("\n"))
            }
        }
    }

    fn filter_clause(&self, vars: &VariableSet, path: &str) -> Result<String, QueryError> {
        let mut items = Vec::new();
        for (key, value) in &self.filters {
            if let Some(rendered) = render_filter_value(value, vars, path, key)? {
                items.push(format!("{key}: {rendered}"));
            }
        }
        if let NodeKind::Connection { cursor } = &self.kind {
            items.push(format!("first: {PAGE_SIZE}"));
            if let Some(cursor) = cursor {
                items.push(format!("after: \"{cursor}\""));
            }
        }
        if items.is_empty() {
            Ok(String::new())
        } else {
            Ok(format!("({})", items.join(", ")))
        }
    }

    /// Merge one page of server data into the output slot.
    pub(crate) fn merge(
        &mut self,
        data: &Map<String, Value>,
        out: &mut Map<String, Value>,
        state: &mut MergeState,
        parent_path: &str,
    ) -> Result<(), QueryError> {
        let path = join_path(parent_path, &self.name);
        if self.is_connection() {
            self.merge_connection(data, out, state, &path)
        } else {
            self.merge_field(data, out, state, &path)
        }
    }

    fn merge_field(
        &mut self,
        data: &Map<String, Value>,
        out: &mut Map<String, Value>,
        state: &mut MergeState,
        path: &str,
    ) -> Result<(), QueryError> {
        self.pending = false;
        let value = match data.get(&self.name) {
            None => {
                // Feed the empty result downward so descendants stop asking
                // for more rounds.
                self.mark_exhausted();
                return Ok(());
            }
            Some(Value::Null) => {
                self.mark_exhausted();
                out.insert(self.name.clone(), Value::Null);
                return Ok(());
            }
            Some(value) => value,
        };

        if self.children.is_empty() {
            out.insert(self.name.clone(), value.clone());
            return Ok(());
        }

        match value {
            Value::Object(object) => {
                let slot = out
                    .entry(self.name.clone())
                    .or_insert_with(|| Value::Object(Map::new()));
                let Value::Object(slot) = slot else {
                    return Err(QueryError::MalformedResponse {
                        path: path.to_string(),
                        expected: "object output slot".to_string(),
                    });
                };
                let node_state = state.child(&self.name);
                for child in &mut self.children {
                    child.merge(object, slot, node_state, path)?;
                }
                Ok(())
            }
            Value::Array(items) => {
                let slot = out
                    .entry(self.name.clone())
                    .or_insert_with(|| Value::Array(Vec::new()));
                let Value::Array(slot) = slot else {
                    return Err(QueryError::MalformedResponse {
                        path: path.to_string(),
                        expected: "array output slot".to_string(),
                    });
                };
                if items.is_empty() {
                    self.mark_exhausted();
                    return Ok(());
                }
                // Plain arrays are complete in one shot; align by position.
                while slot.len() < items.len() {
                    slot.push(Value::Object(Map::new()));
                }
                let node_state = state.child(&self.name);
                for (index, item) in items.iter().enumerate() {
                    let Value::Object(item) = item else {
                        return Err(QueryError::MalformedResponse {
                            path: path.to_string(),
                            expected: "array of objects".to_string(),
                        });
                    };
                    let Some(Value::Object(slot_item)) = slot.get_mut(index) else {
                        return Err(QueryError::MalformedResponse {
                            path: path.to_string(),
                            expected: "object array slot".to_string(),
                        });
                    };
                    let item_state = node_state.item(index);
                    for child in &mut self.children {
                        child.merge(item, slot_item, item_state, path)?;
                    }
                }
                Ok(())
            }
            _ => Err(QueryError::MalformedResponse {
                path: path.to_string(),
                expected: "object or array".to_string(),
            }),
        }
    }

    fn merge_connection(
        &mut self,
        data: &Map<String, Value>,
        out: &mut Map<String, Value>,
        state: &mut MergeState,
        path: &str,
    ) -> Result<(), QueryError> {
        let handle_cursors = self.has_connection_descendant();

        let slot = out
            .entry(self.name.clone())
            .or_insert_with(|| Value::Array(Vec::new()));
        let Value::Array(list) = slot else {
            return Err(QueryError::MalformedResponse {
                path: path.to_string(),
                expected: "array output slot".to_string(),
            });
        };

        let page = match data.get(&self.name) {
            None | Some(Value::Null) => {
                self.mark_exhausted();
                return Ok(());
            }
            Some(Value::Object(page)) => page,
            Some(_) => {
                return Err(QueryError::MalformedResponse {
                    path: path.to_string(),
                    expected: "connection object".to_string(),
                });
            }
        };

        let Some(Value::Object(page_info)) = page.get("pageInfo") else {
            return Err(QueryError::MalformedResponse {
                path: path.to_string(),
                expected: "pageInfo object".to_string(),
            });
        };
        let Some(Value::Bool(has_next)) = page_info.get("hasNextPage") else {
            return Err(QueryError::MalformedResponse {
                path: path.to_string(),
                expected: "hasNextPage boolean".to_string(),
            });
        };
        let end_cursor = match page_info.get("endCursor") {
            Some(Value::String(cursor)) => Some(cursor.clone()),
            None | Some(Value::Null) => None,
            Some(_) => {
                return Err(QueryError::MalformedResponse {
                    path: path.to_string(),
                    expected: "endCursor string".to_string(),
                });
            }
        };
        let Some(Value::Array(edges)) = page.get("edges") else {
            return Err(QueryError::MalformedResponse {
                path: path.to_string(),
                expected: "edges array".to_string(),
            });
        };

        self.pending = *has_next;

        let node_state = state.child(&self.name);

        if edges.is_empty() {
            for child in &mut self.children {
                child.mark_exhausted();
            }
        }

        for edge in edges {
            let Value::Object(edge) = edge else {
                return Err(QueryError::MalformedResponse {
                    path: path.to_string(),
                    expected: "edge object".to_string(),
                });
            };
            let Some(Value::Object(node)) = edge.get("node") else {
                return Err(QueryError::MalformedResponse {
                    path: path.to_string(),
                    expected: "edge node object".to_string(),
                });
            };

            let index = if handle_cursors {
                let Some(Value::String(cursor)) = edge.get("cursor") else {
                    return Err(QueryError::MalformedResponse {
                        path: path.to_string(),
                        expected: "edge cursor string".to_string(),
                    });
                };
                // First sight of a cursor materializes a new item; a
                // re-fetched page reuses the existing slot.
                match node_state.cursor_index.get(cursor) {
                    Some(&existing) => existing,
                    None => {
                        list.push(Value::Object(Map::new()));
                        let index = list.len() - 1;
                        node_state.cursor_index.insert(cursor.clone(), index);
                        index
                    }
                }
            } else {
                list.push(Value::Object(Map::new()));
                list.len() - 1
            };

            let Some(Value::Object(item)) = list.get_mut(index) else {
                return Err(QueryError::MalformedResponse {
                    path: path.to_string(),
                    expected: "object list slot".to_string(),
                });
            };
            let item_state = node_state.item(index);
            for child in &mut self.children {
                child.merge(node, item, item_state, path)?;
            }
        }

        if self.pending {
            // The outer cursor may only advance once every inner connection
            // has drained; otherwise the same outer page is fetched again and
            // items would be skipped. When it does advance, inner walks
            // restart from their beginning for the next outer page.
            let inner_pending = self.children.iter().any(SelectionNode::needs_more);
            if !inner_pending {
                for child in &mut self.children {
                    child.reset_cursors();
                }
                if let NodeKind::Connection { cursor } = &mut self.kind {
                    *cursor = end_cursor;
                }
            }
        }

        Ok(())
    }
}

fn render_filter_value(
    value: &FilterValue,
    vars: &VariableSet,
    path: &str,
    key: &str,
) -> Result<Option<String>, QueryError> {
    match value {
        FilterValue::Variable(var) => {
            if !vars.is_declared(var.name()) {
                return Err(QueryError::UndeclaredVariable {
                    name: var.name().to_string(),
                });
            }
            if vars.value(var.name()).is_none() {
                return Ok(None);
            }
            Ok(Some(var.to_string()))
        }
        FilterValue::Literal(literal) => render_literal(literal, path, key).map(Some),
    }
}

fn render_literal(value: &Value, path: &str, key: &str) -> Result<String, QueryError> {
    match value {
        Value::Number(number) => Ok(number.to_string()),
        Value::String(string) => Ok(format!("\"{string}\"")),
        Value::Array(items) => {
            let mut parts = Vec::with_capacity(items.len());
            for item in items {
                parts.push(render_literal(item, path, key)?);
            }
            Ok(format!("[{}]", parts.join(", ")))
        }
        _ => Err(QueryError::UnsupportedFilterValue {
            path: path.to_string(),
            key: key.to_string(),
        }),
    }
}

pub(crate) fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{parent}/{name}")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn as_map(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            other => panic!("expected object, got {other:?}"),
        }
    }

    #[test]
    fn renders_scalar_field() {
        let node = SelectionNode::field("name");
        let vars = VariableSet::new();
        assert_eq!(node.render(2, &vars, "").expect("render"), "  name");
    }

    #[test]
    fn renders_connection_envelope() {
        let mut node = SelectionNode::connection("items");
        node.add_field("id");
        let vars = VariableSet::new();

        let text = node.render(2, &vars, "").expect("render");
        let expected = "  items(first: 300) {
    edges {
      node {
        id
      }
    }
    pageInfo {
      endCursor
      hasNextPage
    }
  }";
        assert_eq!(text, expected);
    }

    #[test]
    fn connection_with_cursor_renders_after_clause() {
        let mut node = SelectionNode::connection("items");
        node.add_field("id");
        let vars = VariableSet::new();

        // Walk one page so the node holds a cursor.
        let data = as_map(json!({
            "items": {
                "edges": [{"node": {"id": "a"}}],
                "pageInfo": {"endCursor": "c1", "hasNextPage": true}
            }
        }));
        let mut out = Map::new();
        let mut state = MergeState::default();
        node.merge(&data, &mut out, &mut state, "").expect("merge");

        let text = node.render(0, &vars, "").expect("render");
        assert!(text.starts_with("items(first: 300, after: \"c1\") {"));
    }

    #[test]
    fn connection_without_children_fails_to_render() {
        let node = SelectionNode::connection("items");
        let vars = VariableSet::new();
        let err = node.render(0, &vars, "project").expect_err("no children");
        assert!(matches!(err, QueryError::MissingSelection { path } if path == "project/items"));
    }

    #[test]
    fn unset_variable_filter_is_omitted() {
        let mut vars = VariableSet::new();
        let ids = vars.declare("ids", "[String!]").expect("declare");

        let mut node = SelectionNode::field("project");
        node.set_filter("ids", ids);
        node.add_field("name");

        let text = node.render(0, &vars, "").expect("render");
        assert!(text.starts_with("project {"));

        vars.set_value("ids", vec!["a"]).expect("set");
        let text = node.render(0, &vars, "").expect("render");
        assert!(text.starts_with("project(ids: $ids) {"));
    }

    #[test]
    fn undeclared_variable_filter_fails_to_render() {
        let vars = VariableSet::new();
        let mut node = SelectionNode::field("project");
        node.set_filter("name", VariableRef::new("projectName"));
        node.add_field("id");

        let err = node.render(0, &vars, "").expect_err("undeclared");
        assert!(matches!(err, QueryError::UndeclaredVariable { name } if name == "projectName"));
    }

    #[test]
    fn unsupported_filter_literal_fails_to_render() {
        let vars = VariableSet::new();
        let mut node = SelectionNode::field("project");
        node.set_filter("active", FilterValue::Literal(Value::Bool(true)));
        node.add_field("id");

        let err = node.render(0, &vars, "").expect_err("unsupported");
        assert!(
            matches!(err, QueryError::UnsupportedFilterValue { path, key }
                if path == "project" && key == "active")
        );
    }

    #[test]
    fn literal_filters_render_inline() {
        let vars = VariableSet::new();
        let mut node = SelectionNode::field("versions");
        node.set_filter("versions", vec![1_i64, 2]);
        node.set_filter("name", "main");
        node.add_field("id");

        let text = node.render(0, &vars, "").expect("render");
        assert!(text.starts_with("versions(versions: [1, 2], name: \"main\") {"));
    }

    #[test]
    fn merges_nested_object() {
        let mut node = SelectionNode::field("project");
        node.add_field("name");
        let data = node.add_field("data");
        data.add_field("group");

        let page = as_map(json!({
            "project": {"name": "proj1", "data": {"group": "characters"}}
        }));
        let mut out = Map::new();
        let mut state = MergeState::default();
        node.merge(&page, &mut out, &mut state, "").expect("merge");

        assert_eq!(
            Value::Object(out),
            json!({"project": {"name": "proj1", "data": {"group": "characters"}}})
        );
        assert!(!node.needs_more());
    }

    #[test]
    fn merges_plain_array_by_position() {
        let mut node = SelectionNode::field("tasks");
        node.add_field("name");

        let page = as_map(json!({
            "tasks": [{"name": "modeling"}, {"name": "rigging"}]
        }));
        let mut out = Map::new();
        let mut state = MergeState::default();
        node.merge(&page, &mut out, &mut state, "").expect("merge");

        assert_eq!(
            Value::Object(out),
            json!({"tasks": [{"name": "modeling"}, {"name": "rigging"}]})
        );
    }

    #[test]
    fn null_value_exhausts_subtree_and_writes_null() {
        let mut node = SelectionNode::field("project");
        let folders = node.add_connection("folders");
        folders.add_field("id");

        let page = as_map(json!({"project": null}));
        let mut out = Map::new();
        let mut state = MergeState::default();
        node.merge(&page, &mut out, &mut state, "").expect("merge");

        assert_eq!(Value::Object(out), json!({"project": null}));
        assert!(!node.needs_more());
    }

    #[test]
    fn scalar_where_object_expected_is_malformed() {
        let mut node = SelectionNode::field("project");
        node.add_field("name");

        let page = as_map(json!({"project": "proj1"}));
        let mut out = Map::new();
        let mut state = MergeState::default();
        let err = node
            .merge(&page, &mut out, &mut state, "")
            .expect_err("shape mismatch");
        assert!(matches!(err, QueryError::MalformedResponse { .. }));
    }

    #[test]
    fn connection_appends_edges_across_pages() {
        let mut node = SelectionNode::connection("items");
        node.add_field("id");
        let mut out = Map::new();
        let mut state = MergeState::default();

        let first = as_map(json!({
            "items": {
                "edges": [{"node": {"id": "a"}}],
                "pageInfo": {"endCursor": "c1", "hasNextPage": true}
            }
        }));
        node.merge(&first, &mut out, &mut state, "").expect("merge");
        assert!(node.needs_more());

        let second = as_map(json!({
            "items": {
                "edges": [{"node": {"id": "b"}}],
                "pageInfo": {"endCursor": "c2", "hasNextPage": false}
            }
        }));
        node.merge(&second, &mut out, &mut state, "").expect("merge");
        assert!(!node.needs_more());

        assert_eq!(Value::Object(out), json!({"items": [{"id": "a"}, {"id": "b"}]}));
    }

    #[test]
    fn missing_edge_cursor_with_nested_connection_is_malformed() {
        let mut node = SelectionNode::connection("folders");
        node.add_field("id");
        let tasks = node.add_connection("tasks");
        tasks.add_field("name");

        let page = as_map(json!({
            "folders": {
                "edges": [{"node": {"id": "f1", "tasks": {
                    "edges": [],
                    "pageInfo": {"endCursor": null, "hasNextPage": false}
                }}}],
                "pageInfo": {"endCursor": "c1", "hasNextPage": false}
            }
        }));
        let mut out = Map::new();
        let mut state = MergeState::default();
        let err = node
            .merge(&page, &mut out, &mut state, "")
            .expect_err("cursor required");
        assert!(
            matches!(err, QueryError::MalformedResponse { expected, .. }
                if expected == "edge cursor string")
        );
    }
}
