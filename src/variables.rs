//! Typed query variables.
//!
//! Variables are declared on the query root with a GraphQL type string
//! (e.g. `"[String!]"`, `"Boolean"`) and referenced from filter clauses as
//! `$name`. A variable whose current value is unset is treated as "not
//! filtering by this": it is omitted from the document header, from filter
//! clauses, and from the submitted variable payload.

use std::fmt;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::error::QueryError;

/// Reference to a declared variable, rendered as `$name` in filter clauses.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VariableRef {
    name: String,
}

impl VariableRef {
    /// Create a reference by name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Variable name without the `$` prefix.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for VariableRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${}", self.name)
    }
}

#[derive(Debug, Clone)]
struct Variable {
    ty: String,
    value: Option<Value>,
}

/// Registry of declared variables, owned by the query root.
#[derive(Debug, Clone, Default)]
pub struct VariableSet {
    variables: IndexMap<String, Variable>,
}

impl VariableSet {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a variable with a GraphQL type. The type string is stored
    /// verbatim and never validated locally.
    pub fn declare(
        &mut self,
        name: impl Into<String>,
        ty: impl Into<String>,
    ) -> Result<VariableRef, QueryError> {
        let name = name.into();
        if self.variables.contains_key(&name) {
            return Err(QueryError::DuplicateVariable { name });
        }
        self.variables.insert(
            name.clone(),
            Variable {
                ty: ty.into(),
                value: None,
            },
        );
        Ok(VariableRef::new(name))
    }

    /// Reference to an already-declared variable.
    pub fn get(&self, name: &str) -> Result<VariableRef, QueryError> {
        if self.variables.contains_key(name) {
            Ok(VariableRef::new(name))
        } else {
            Err(QueryError::UndeclaredVariable {
                name: name.to_string(),
            })
        }
    }

    /// Returns `true` if the name was declared.
    #[must_use]
    pub fn is_declared(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Set the current value of a declared variable.
    pub fn set_value(&mut self, name: &str, value: impl Into<Value>) -> Result<(), QueryError> {
        let variable =
            self.variables
                .get_mut(name)
                .ok_or_else(|| QueryError::UndeclaredVariable {
                    name: name.to_string(),
                })?;
        variable.value = Some(value.into());
        Ok(())
    }

    /// Unset a variable's value, removing its filter from the query.
    pub fn clear_value(&mut self, name: &str) -> Result<(), QueryError> {
        let variable =
            self.variables
                .get_mut(name)
                .ok_or_else(|| QueryError::UndeclaredVariable {
                    name: name.to_string(),
                })?;
        variable.value = None;
        Ok(())
    }

    /// Current value of a variable, if set.
    #[must_use]
    pub fn value(&self, name: &str) -> Option<&Value> {
        self.variables.get(name).and_then(|var| var.value.as_ref())
    }

    /// Variable payload submitted with the query: only entries with a value.
    #[must_use]
    pub fn effective_values(&self) -> Map<String, Value> {
        let mut out = Map::new();
        for (name, variable) in &self.variables {
            if let Some(value) = &variable.value {
                out.insert(name.clone(), value.clone());
            }
        }
        out
    }

    /// Declarations with a current value, in declaration order, as
    /// `(name, type)` pairs. These are exactly the header declarations.
    pub(crate) fn effective_declarations(&self) -> impl Iterator<Item = (&str, &str)> {
        self.variables.iter().filter_map(|(name, variable)| {
            variable
                .value
                .as_ref()
                .map(|_| (name.as_str(), variable.ty.as_str()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declare_and_reference() {
        let mut vars = VariableSet::new();
        let project = vars.declare("projectName", "String!").expect("declare");
        assert_eq!(project.to_string(), "$projectName");
        assert_eq!(vars.get("projectName").expect("get").name(), "projectName");
    }

    #[test]
    fn redeclaration_fails() {
        let mut vars = VariableSet::new();
        vars.declare("ids", "[String!]").expect("declare");
        let err = vars.declare("ids", "[String!]").expect_err("duplicate");
        assert!(matches!(err, QueryError::DuplicateVariable { name } if name == "ids"));
    }

    #[test]
    fn undeclared_lookup_fails() {
        let vars = VariableSet::new();
        let err = vars.get("missing").expect_err("undeclared");
        assert!(matches!(err, QueryError::UndeclaredVariable { name } if name == "missing"));
    }

    #[test]
    fn effective_values_skip_unset() {
        let mut vars = VariableSet::new();
        vars.declare("a", "String!").expect("declare");
        vars.declare("b", "Int").expect("declare");
        vars.set_value("b", 7).expect("set");

        let payload = vars.effective_values();
        assert_eq!(payload.len(), 1);
        assert_eq!(payload.get("b"), Some(&Value::from(7)));

        let declarations: Vec<_> = vars.effective_declarations().collect();
        assert_eq!(declarations, vec![("b", "Int")]);
    }

    #[test]
    fn clear_value_removes_from_payload() {
        let mut vars = VariableSet::new();
        vars.declare("names", "[String!]").expect("declare");
        vars.set_value("names", vec!["a", "b"]).expect("set");
        assert_eq!(vars.effective_values().len(), 1);

        vars.clear_value("names").expect("clear");
        assert!(vars.effective_values().is_empty());
    }
}
