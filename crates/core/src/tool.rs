//! Tool vocabulary shared with the backend.
//!
//! A `ToolDeclaration` advertises a capability the model may invoke; a
//! `ToolInvocation` is the model asking the host to perform one. The
//! `ToolRegistry` is a fixed, ordered set of declarations: what is
//! advertised to the backend is exactly what the classifier recognizes.

use serde::{Deserialize, Serialize};

/// A callable capability advertised to the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDeclaration {
    /// The tool name
    pub name: String,

    /// Description of what the tool does
    pub description: String,

    /// Schema describing the tool's parameters
    pub parameters: serde_json::Value,
}

impl ToolDeclaration {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters,
        }
    }

    /// Names listed under the schema's `required` key.
    pub fn required_fields(&self) -> Vec<&str> {
        self.parameters["required"]
            .as_array()
            .map(|arr| arr.iter().filter_map(|v| v.as_str()).collect())
            .unwrap_or_default()
    }
}

/// A structured request from the model to run a named tool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInvocation {
    /// Name of the tool to run
    pub name: String,

    /// Arguments as a JSON value (`Null` when the backend sent none)
    #[serde(default)]
    pub arguments: serde_json::Value,
}

impl ToolInvocation {
    pub fn new(name: impl Into<String>, arguments: serde_json::Value) -> Self {
        Self {
            name: name.into(),
            arguments,
        }
    }
}

/// A fixed, ordered set of tool declarations.
///
/// There is no way to add tools after construction.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ToolRegistry {
    tools: Vec<ToolDeclaration>,
}

impl ToolRegistry {
    /// Build a registry. Later declarations with a duplicate name are ignored.
    pub fn new(declarations: Vec<ToolDeclaration>) -> Self {
        let mut tools: Vec<ToolDeclaration> = Vec::with_capacity(declarations.len());
        for decl in declarations {
            if tools.iter().any(|t| t.name == decl.name) {
                tracing::warn!(tool = %decl.name, "Duplicate tool declaration ignored");
                continue;
            }
            tools.push(decl);
        }
        Self { tools }
    }

    /// Get a declaration by name.
    pub fn get(&self, name: &str) -> Option<&ToolDeclaration> {
        self.tools.iter().find(|t| t.name == name)
    }

    /// Whether `name` is advertised by this registry.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// All declarations, in registry order.
    pub fn declarations(&self) -> &[ToolDeclaration] {
        &self.tools
    }

    /// All tool names, in registry order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name.as_str()).collect()
    }

    /// A new registry holding only the named tools, keeping registry order.
    pub fn subset(&self, names: &[&str]) -> Self {
        Self {
            tools: self
                .tools
                .iter()
                .filter(|t| names.contains(&t.name.as_str()))
                .cloned()
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn echo() -> ToolDeclaration {
        ToolDeclaration::new(
            "echo",
            "Echoes back the input",
            serde_json::json!({
                "type": "OBJECT",
                "properties": { "text": { "type": "STRING" } },
                "required": ["text"]
            }),
        )
    }

    fn ping() -> ToolDeclaration {
        ToolDeclaration::new("ping", "Replies pong", serde_json::json!({"type": "OBJECT"}))
    }

    #[test]
    fn registry_lookup_and_order() {
        let registry = ToolRegistry::new(vec![echo(), ping()]);
        assert!(registry.contains("echo"));
        assert!(!registry.contains("nonexistent"));
        assert_eq!(registry.names(), vec!["echo", "ping"]);
    }

    #[test]
    fn duplicate_names_keep_first() {
        let mut other = echo();
        other.description = "second".into();
        let registry = ToolRegistry::new(vec![echo(), other]);
        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("echo").unwrap().description, "Echoes back the input");
    }

    #[test]
    fn subset_keeps_only_named_tools() {
        let registry = ToolRegistry::new(vec![echo(), ping()]);
        let sub = registry.subset(&["ping"]);
        assert_eq!(sub.names(), vec!["ping"]);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn required_fields_read_from_schema() {
        assert_eq!(echo().required_fields(), vec!["text"]);
        assert!(ping().required_fields().is_empty());
    }

    #[test]
    fn invocation_without_arguments_deserializes() {
        let call: ToolInvocation = serde_json::from_str(r#"{"name":"ping"}"#).unwrap();
        assert!(call.arguments.is_null());
    }
}
