// Resolves recorded arguments against the current bindings

use crate::ast::{ArgumentValue, Bindings, Command};
use crate::error::ResolveError;
use indexmap::IndexMap;
use serde_json::Value;

/// Plain-string arguments ready to hand to a command action.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedArgs {
    pub positional: Vec<String>,
    pub named: IndexMap<String, String>,
}

/// Render a bound value as an argument string.
///
/// Strings are passed through untouched, `null` becomes the empty string,
/// and every other value is serialized as compact JSON.
pub fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

pub fn resolve(bindings: &Bindings, command: &Command) -> Result<ResolvedArgs, ResolveError> {
    let positional = command
        .positional
        .iter()
        .map(|arg| resolve_value(bindings, arg))
        .collect::<Result<Vec<_>, _>>()?;

    let named = command
        .named
        .iter()
        .map(|(key, arg)| resolve_value(bindings, arg).map(|value| (key.clone(), value)))
        .collect::<Result<IndexMap<_, _>, _>>()?;

    Ok(ResolvedArgs { positional, named })
}

fn resolve_value(bindings: &Bindings, arg: &ArgumentValue) -> Result<String, ResolveError> {
    match arg {
        ArgumentValue::Literal(s) => Ok(s.clone()),
        ArgumentValue::VariableRef(name) => bindings
            .get(name)
            .map(render_value)
            .ok_or_else(|| ResolveError::UndefinedVariable { name: name.clone() }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use yare::parameterized;

    #[parameterized(
        string = { json!("42"), "42" },
        null = { json!(null), "" },
        number = { json!(42), "42" },
        boolean = { json!(true), "true" },
        object = { json!({"env": "prod", "n": 1}), r#"{"env":"prod","n":1}"# },
        array = { json!(["a", 1]), r#"["a",1]"# },
    )]
    fn test_render_value(value: Value, expected: &str) {
        assert_eq!(render_value(&value), expected);
    }

    #[test]
    fn test_resolve_literals_and_variables() {
        let mut bindings = Bindings::new();
        bindings.insert("x".to_string(), json!("42"));
        bindings.insert("cfg".to_string(), json!({"env": "prod"}));

        let mut command = Command::new("use");
        command.positional = vec![
            ArgumentValue::Literal("first".to_string()),
            ArgumentValue::VariableRef("x".to_string()),
        ];
        command
            .named
            .insert("config".to_string(), ArgumentValue::VariableRef("cfg".to_string()));

        let resolved = resolve(&bindings, &command).unwrap();
        assert_eq!(resolved.positional, ["first", "42"]);
        assert_eq!(resolved.named.get("config").map(String::as_str), Some(r#"{"env":"prod"}"#));
        assert_eq!(bindings.len(), 2);
    }

    #[test]
    fn test_resolve_undefined_variable() {
        let mut command = Command::new("use");
        command
            .named
            .insert("v".to_string(), ArgumentValue::VariableRef("missing".to_string()));

        let err = resolve(&Bindings::new(), &command).unwrap_err();
        assert_eq!(
            err,
            ResolveError::UndefinedVariable {
                name: "missing".to_string()
            }
        );
        assert_eq!(err.to_string(), "undefined variable: $missing");
    }
}
