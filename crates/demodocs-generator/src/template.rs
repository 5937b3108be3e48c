//! Shell page template interpolation.
//!
//! A lightweight `{{ variable }}` interpolation pass for the application
//! shell's `index.html`, instead of a heavy template engine.

use std::collections::HashMap;

use thiserror::Error;

/// Template rendering errors.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// Missing required variable.
    #[error("missing required variable: {0}")]
    MissingVariable(String),

    /// Invalid template syntax.
    #[error("invalid template syntax: {0}")]
    InvalidSyntax(String),
}

/// Result type for template operations.
pub type Result<T> = std::result::Result<T, TemplateError>;

/// Template context with variables for interpolation.
#[derive(Debug, Clone, Default)]
pub struct TemplateContext {
    variables: HashMap<String, String>,
}

impl TemplateContext {
    /// Create a new empty context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a variable into the context.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    /// Create context with initial variables.
    pub fn with_var(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    /// Get a variable value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(String::as_str)
    }
}

/// A template supporting `{{ variable }}` interpolation.
///
/// `{{ variable? }}` marks a variable optional; it renders as the empty
/// string when absent from the context.
#[derive(Debug, Clone)]
pub struct Template {
    content: String,
}

impl Template {
    /// Create a new template from its source.
    #[must_use]
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }

    /// Render the template with the given context.
    pub fn render(&self, context: &TemplateContext) -> Result<String> {
        let mut result = self.content.clone();
        let mut pos = 0;

        while let Some(start) = result[pos..].find("{{") {
            let start = pos + start;
            let end = result[start..]
                .find("}}")
                .ok_or_else(|| TemplateError::InvalidSyntax("unclosed {{ delimiter".to_string()))?;
            let end = start + end + 2;

            let var_name = result[start + 2..end - 2].trim();
            let (var_name, optional) = if let Some(stripped) = var_name.strip_suffix('?') {
                (stripped, true)
            } else {
                (var_name, false)
            };

            let value = match context.get(var_name) {
                Some(v) => v.to_string(),
                None if optional => String::new(),
                None => return Err(TemplateError::MissingVariable(var_name.to_string())),
            };

            result.replace_range(start..end, &value);
            pos = start + value.len();
        }

        Ok(result)
    }
}

/// Built-in index shell used when no app shell directory provides one.
pub const DEFAULT_INDEX_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en" ng-app="docsApp">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <base href="{{ url_path }}/">
    <title>{{ title }}</title>
    <link rel="stylesheet" href="docs.css">
</head>
<body>
    <main ng-view></main>
    <script src="docs.js"></script>
    <script src="docs-demo-scripts.js"></script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_render() {
        let template = Template::new("Hello, {{ name }}!");
        let ctx = TemplateContext::new().with_var("name", "World");
        assert_eq!(template.render(&ctx).unwrap(), "Hello, World!");
    }

    #[test]
    fn test_optional_variable() {
        let template = Template::new("Hello{{ suffix? }}!");
        assert_eq!(template.render(&TemplateContext::new()).unwrap(), "Hello!");

        let ctx = TemplateContext::new().with_var("suffix", ", World");
        assert_eq!(template.render(&ctx).unwrap(), "Hello, World!");
    }

    #[test]
    fn test_missing_required_variable() {
        let template = Template::new("Hello, {{ name }}!");
        let result = template.render(&TemplateContext::new());
        assert!(matches!(result, Err(TemplateError::MissingVariable(_))));
    }

    #[test]
    fn test_unclosed_delimiter() {
        let template = Template::new("Hello, {{ name");
        let result = template.render(&TemplateContext::new());
        assert!(matches!(result, Err(TemplateError::InvalidSyntax(_))));
    }

    #[test]
    fn test_default_index_renders() {
        let template = Template::new(DEFAULT_INDEX_TEMPLATE);
        let ctx = TemplateContext::new()
            .with_var("title", "Material Docs")
            .with_var("url_path", "/docs");

        let html = template.render(&ctx).unwrap();
        assert!(html.contains("<title>Material Docs</title>"));
        assert!(html.contains("<base href=\"/docs/\">"));
    }
}
