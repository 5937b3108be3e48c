//! Runtime constant-module generation.
//!
//! Turns JSON values into AngularJS constant modules the documentation app
//! loads at runtime (`config-data.js`, `demo-data.js`).

use serde_json::Value;

/// Emit a constant module registering each `(key, value)` pair.
///
/// Key order follows the input, so the same constants always produce the
/// same module source.
#[must_use]
pub fn constant_module(module_name: &str, constants: &[(&str, &Value)]) -> String {
    let mut out = format!("angular.module({}, [])", js_string(module_name));
    for (key, value) in constants {
        let json = serde_json::to_string_pretty(value).unwrap_or_else(|_| "null".to_string());
        out.push_str(&format!("\n  .constant({}, {})", js_string(key), json));
    }
    out.push_str(";\n");
    out
}

/// A JSON-escaped (hence JS-safe) string literal.
fn js_string(s: &str) -> String {
    serde_json::to_string(s).unwrap_or_else(|_| format!("\"{s}\""))
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_single_constant() {
        let value = json!({"title": "Docs"});
        let module = constant_module("docsApp.config-data", &[("CONFIG", &value)]);

        assert!(module.starts_with("angular.module(\"docsApp.config-data\", [])"));
        assert!(module.contains(".constant(\"CONFIG\","));
        assert!(module.contains("\"title\": \"Docs\""));
        assert!(module.ends_with(";\n"));
    }

    #[test]
    fn test_key_order_is_input_order() {
        let a = json!(1);
        let b = json!(2);
        let module = constant_module("m", &[("B", &b), ("A", &a)]);
        assert!(module.find(".constant(\"B\"").unwrap() < module.find(".constant(\"A\"").unwrap());
    }

    #[test]
    fn test_module_output_is_deterministic() {
        let value = json!({"DEMOS": []});
        let first = constant_module("docsApp.demo-data", &[("DEMOS", &value)]);
        let second = constant_module("docsApp.demo-data", &[("DEMOS", &value)]);
        assert_eq!(first, second);
    }
}
