//! Commands the `cmdlisp` binary registers out of the box.

use crate::config::Config;
use crate::registry::{CommandDefinition, CommandRegistry};
use anyhow::{Context, bail};
use indexmap::IndexMap;
use serde_json::Value;
use std::process::{Command, Stdio};
use std::time::Duration;

/// Register `echo`, `env`, `sh` and `sleep` into `registry`.
pub fn register_builtins(registry: &mut CommandRegistry, config: &Config) {
    registry.register(
        "echo",
        CommandDefinition::from_fn(|positional, named| {
            let line = echo_line(&positional, &named);
            println!("{}", line);
            Ok(Value::String(line))
        })
        .description("Print the positional arguments")
        .args("<words>... [sep:<separator>]"),
    );

    registry.register(
        "env",
        CommandDefinition::from_fn(|positional, named| env_var(&positional, &named))
            .description("Read an environment variable")
            .args("<name> [default:<value>]")
            .returns("string"),
    );

    let shell = config.shell.clone();
    registry.register(
        "sh",
        CommandDefinition::from_async(move |positional, _named| {
            let shell = shell.clone();
            async move {
                let line = positional.join(" ");
                tokio::task::spawn_blocking(move || run_shell(&shell, &line))
                    .await
                    .context("shell task panicked")?
            }
        })
        .description("Run a command line with the configured shell and capture stdout")
        .args("<command-line>...")
        .returns("string"),
    );

    registry.register(
        "sleep",
        CommandDefinition::from_async(|positional, named| async move {
            let millis = sleep_millis(&positional, &named)?;
            tokio::time::sleep(Duration::from_millis(millis)).await;
            anyhow::Ok(Value::Null)
        })
        .description("Wait before running the next statement")
        .args("<ms> | ms:<ms>"),
    );
}

fn echo_line(positional: &[String], named: &IndexMap<String, String>) -> String {
    let sep = named.get("sep").map(String::as_str).unwrap_or(" ");
    positional.join(sep)
}

fn env_var(positional: &[String], named: &IndexMap<String, String>) -> anyhow::Result<Value> {
    let Some(name) = positional.first().or_else(|| named.get("name")) else {
        bail!("env: missing variable name");
    };
    match std::env::var(name) {
        Ok(value) => Ok(Value::String(value)),
        Err(_) => match named.get("default") {
            Some(default) => Ok(Value::String(default.clone())),
            None => bail!("env: variable `{}` is not set", name),
        },
    }
}

fn sleep_millis(positional: &[String], named: &IndexMap<String, String>) -> anyhow::Result<u64> {
    let raw = named
        .get("ms")
        .or_else(|| positional.first())
        .context("sleep: missing duration in milliseconds")?;
    raw.parse::<u64>()
        .with_context(|| format!("sleep: invalid duration `{}`", raw))
}

fn run_shell(shell: &str, line: &str) -> anyhow::Result<Value> {
    if line.trim().is_empty() {
        bail!("sh: empty command line");
    }

    tracing::debug!(shell, line, "spawning shell");
    let output = Command::new(shell)
        .arg("-c")
        .arg(line)
        .stdin(Stdio::null())
        .stderr(Stdio::inherit())
        .output()
        .with_context(|| format!("failed to spawn `{}`", shell))?;

    if !output.status.success() {
        bail!("command `{}` failed with status: {}", line, output.status);
    }

    let stdout = String::from_utf8_lossy(&output.stdout);
    Ok(Value::String(stdout.trim_end().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn named(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_echo_line() {
        let words = vec!["a".to_string(), "b".to_string()];
        assert_eq!(echo_line(&words, &IndexMap::new()), "a b");
        assert_eq!(echo_line(&words, &named(&[("sep", ",")])), "a,b");
    }

    #[test]
    fn test_env_default() {
        let name = vec!["CMDLISP_TEST_SURELY_UNSET_VAR".to_string()];
        assert!(env_var(&name, &IndexMap::new()).is_err());
        assert_eq!(
            env_var(&name, &named(&[("default", "dev")])).unwrap(),
            Value::String("dev".into())
        );
        assert!(env_var(&[], &IndexMap::new()).is_err());
    }

    #[test]
    fn test_sleep_millis() {
        assert_eq!(sleep_millis(&["15".to_string()], &IndexMap::new()).unwrap(), 15);
        assert_eq!(sleep_millis(&[], &named(&[("ms", "3")])).unwrap(), 3);
        assert!(sleep_millis(&["soon".to_string()], &IndexMap::new()).is_err());
        assert!(sleep_millis(&[], &IndexMap::new()).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_run_shell() {
        assert_eq!(run_shell("sh", "echo hello").unwrap(), Value::String("hello".into()));
        assert!(run_shell("sh", "exit 3").is_err());
        assert!(run_shell("sh", "  ").is_err());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_builtins_through_interpreter() {
        let mut registry = CommandRegistry::new();
        let config = Config {
            shell: "sh".to_string(),
            ..Config::default()
        };
        register_builtins(&mut registry, &config);
        let interpreter = crate::Interpreter::new(registry);

        let result = interpreter
            .parse_and_run("out:(sh \"printf '%s' hi\") (sleep ms:1) (echo $out there)")
            .await
            .unwrap();
        assert_eq!(result.bindings.get("out"), Some(&Value::String("hi".into())));
    }
}
