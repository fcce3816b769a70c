//! Query root and the incremental executor loop.

use serde_json::{Map, Value};
use tracing::debug;

use crate::connector::Connector;
use crate::error::QueryError;
use crate::selection::{FilterValue, MergeState, SelectionNode, INDENT_STEP};
use crate::variables::{VariableRef, VariableSet};

/// A full GraphQL query: variable registry plus top-level selection nodes.
///
/// Single-use: once [`run`](Self::run) has started consuming pagination
/// state, the cursors belong to that one walk and the root should not be
/// reused for an unrelated query.
#[derive(Debug, Clone)]
pub struct GraphqlQuery {
    name: String,
    variables: VariableSet,
    children: Vec<SelectionNode>,
}

impl GraphqlQuery {
    /// Create an empty query with an operation name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            variables: VariableSet::new(),
            children: Vec::new(),
        }
    }

    /// Operation name used in the document header.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declare a typed variable. Fails if the name was already declared.
    pub fn add_variable(
        &mut self,
        name: impl Into<String>,
        ty: impl Into<String>,
    ) -> Result<VariableRef, QueryError> {
        self.variables.declare(name, ty)
    }

    /// Reference to an already-declared variable.
    pub fn variable(&self, name: &str) -> Result<VariableRef, QueryError> {
        self.variables.get(name)
    }

    /// Set the current value of a declared variable.
    pub fn set_variable_value(
        &mut self,
        name: &str,
        value: impl Into<Value>,
    ) -> Result<(), QueryError> {
        self.variables.set_value(name, value)
    }

    /// Unset a variable's value, removing its filter from the query.
    pub fn clear_variable_value(&mut self, name: &str) -> Result<(), QueryError> {
        self.variables.clear_value(name)
    }

    /// Current value of a variable, if set.
    #[must_use]
    pub fn variable_value(&self, name: &str) -> Option<&Value> {
        self.variables.value(name)
    }

    /// Variable payload submitted with the query.
    #[must_use]
    pub fn effective_variables(&self) -> Map<String, Value> {
        self.variables.effective_values()
    }

    /// Add a top-level field and return it for further configuration.
    pub fn add_field(&mut self, name: impl Into<String>) -> &mut SelectionNode {
        self.add_child(SelectionNode::field(name))
    }

    /// Add a top-level connection and return it for further configuration.
    pub fn add_connection(&mut self, name: impl Into<String>) -> &mut SelectionNode {
        self.add_child(SelectionNode::connection(name))
    }

    /// Take ownership of a node as a top-level child.
    pub fn add_child(&mut self, node: SelectionNode) -> &mut SelectionNode {
        self.children.push(node);
        let index = self.children.len() - 1;
        &mut self.children[index]
    }

    /// Set a filter on a named top-level field.
    pub fn set_filter(
        &mut self,
        field: &str,
        key: impl Into<String>,
        value: impl Into<FilterValue>,
    ) -> bool {
        match self.children.iter_mut().find(|child| child.name() == field) {
            Some(child) => {
                child.set_filter(key, value);
                true
            }
            None => false,
        }
    }

    /// Whether any node in the tree still needs another round trip.
    #[must_use]
    pub fn needs_more(&self) -> bool {
        self.children.iter().any(SelectionNode::needs_more)
    }

    /// Render the full query document.
    pub fn render(&self) -> Result<String, QueryError> {
        if self.children.is_empty() {
            return Err(QueryError::NoSelection);
        }

        let declarations: Vec<String> = self
            .variables
            .effective_declarations()
            .map(|(name, ty)| format!("${name}: {ty}"))
            .collect();
        let header = if declarations.is_empty() {
            format!("query {}", self.name)
        } else {
            format!("query {}({})", self.name, declarations.join(","))
        };

        let mut lines = vec![format!("{header} {{")];
        for child in &self.children {
            lines.push(child.render(INDENT_STEP, &self.variables, "")?);
        }
        lines.push("}".to_string());
        Ok(lines.join("\n"))
    }

    /// Merge one page of response data into the accumulated output.
    pub(crate) fn merge(
        &mut self,
        data: &Map<String, Value>,
        out: &mut Map<String, Value>,
        state: &mut MergeState,
    ) -> Result<(), QueryError> {
        for child in &mut self.children {
            child.merge(data, out, state, "")?;
        }
        Ok(())
    }

    /// Drive the query against a connector until every connection in the
    /// tree has drained, merging each page into one output structure.
    ///
    /// Any failure aborts the whole walk; there is no partial output.
    pub async fn run<C>(&mut self, connector: &C) -> Result<Map<String, Value>, QueryError>
    where
        C: Connector + ?Sized,
    {
        let mut output = Map::new();
        let mut state = MergeState::default();
        let mut round_trips = 0_u32;

        while self.needs_more() {
            let document = self.render()?;
            let variables = self.variables.effective_values();
            round_trips += 1;
            debug!(
                query = %self.name,
                round_trips,
                variables = variables.len(),
                "executing query round trip"
            );

            let response = connector.execute(&document, variables).await?;
            if !response.errors.is_empty() {
                return Err(QueryError::QueryFailed {
                    errors: response.errors,
                });
            }
            let Some(Value::Object(data)) = response.data else {
                return Err(QueryError::MalformedResponse {
                    path: String::new(),
                    expected: "data object".to_string(),
                });
            };
            self.merge(&data, &mut output, &mut state)?;
        }

        debug!(query = %self.name, round_trips, "query drained");
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn render_without_fields_fails() {
        let query = GraphqlQuery::new("EmptyQuery");
        assert!(matches!(query.render(), Err(QueryError::NoSelection)));
    }

    #[test]
    fn renders_document_with_effective_variables_only() {
        let mut query = GraphqlQuery::new("ProjectQuery");
        let name_var = query.add_variable("projectName", "String!").expect("declare");
        query.add_variable("folderIds", "[String!]").expect("declare");

        let project = query.add_field("project");
        project.set_filter("name", name_var);
        project.add_field("name");

        // Unset variables are omitted from the header and the filter clause.
        let text = query.render().expect("render");
        assert_eq!(text, "query ProjectQuery {\n  project {\n    name\n  }\n}");

        query.set_variable_value("projectName", "proj1").expect("set");
        let text = query.render().expect("render");
        assert_eq!(
            text,
            "query ProjectQuery($projectName: String!) {\n  project(name: $projectName) {\n    name\n  }\n}"
        );
    }

    #[test]
    fn renders_multiple_variable_declarations_comma_joined() {
        let mut query = GraphqlQuery::new("FoldersQuery");
        query.add_variable("projectName", "String!").expect("declare");
        query.add_variable("folderIds", "[String!]").expect("declare");
        query.set_variable_value("projectName", "p").expect("set");
        query
            .set_variable_value("folderIds", vec!["f1"])
            .expect("set");

        query.add_field("project").add_field("name");

        let text = query.render().expect("render");
        assert!(text.starts_with("query FoldersQuery($projectName: String!,$folderIds: [String!]) {"));
    }

    #[test]
    fn merges_page_into_output() {
        let mut query = GraphqlQuery::new("ProjectQuery");
        let project = query.add_field("project");
        project.add_field("name");
        let data = project.add_field("data");
        data.add_field("group");

        let page = match json!({
            "project": {"name": "proj1", "data": {"group": "characters"}}
        }) {
            Value::Object(map) => map,
            _ => unreachable!(),
        };
        let mut out = Map::new();
        let mut state = MergeState::default();
        query.merge(&page, &mut out, &mut state).expect("merge");

        assert_eq!(
            Value::Object(out),
            json!({"project": {"name": "proj1", "data": {"group": "characters"}}})
        );
        assert!(!query.needs_more());
    }
}
