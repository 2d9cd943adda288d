//! Named commands a host makes available to command lines.

use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt::Write as _;
use std::future::Future;
use std::sync::Arc;

/// The callable behind a registered command.
#[async_trait]
pub trait Action: Send + Sync {
    async fn call(
        &self,
        positional: Vec<String>,
        named: IndexMap<String, String>,
    ) -> anyhow::Result<Value>;
}

struct AsyncAction<F>(F);

#[async_trait]
impl<F, Fut> Action for AsyncAction<F>
where
    F: Fn(Vec<String>, IndexMap<String, String>) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
{
    async fn call(
        &self,
        positional: Vec<String>,
        named: IndexMap<String, String>,
    ) -> anyhow::Result<Value> {
        (self.0)(positional, named).await
    }
}

struct SyncAction<F>(F);

#[async_trait]
impl<F> Action for SyncAction<F>
where
    F: Fn(Vec<String>, IndexMap<String, String>) -> anyhow::Result<Value> + Send + Sync,
{
    async fn call(
        &self,
        positional: Vec<String>,
        named: IndexMap<String, String>,
    ) -> anyhow::Result<Value> {
        (self.0)(positional, named)
    }
}

#[derive(Clone)]
pub struct CommandDefinition {
    pub action: Arc<dyn Action>,
    pub description: Option<String>,
    pub args_description: Option<String>,
    /// When set, invocations must bind the result to a variable.
    pub returns: Option<String>,
}

impl CommandDefinition {
    pub fn new(action: impl Action + 'static) -> Self {
        Self {
            action: Arc::new(action),
            description: None,
            args_description: None,
            returns: None,
        }
    }

    /// Wrap an async closure.
    pub fn from_async<F, Fut>(f: F) -> Self
    where
        F: Fn(Vec<String>, IndexMap<String, String>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = anyhow::Result<Value>> + Send + 'static,
    {
        Self::new(AsyncAction(f))
    }

    /// Wrap a synchronous closure.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn(Vec<String>, IndexMap<String, String>) -> anyhow::Result<Value>
            + Send
            + Sync
            + 'static,
    {
        Self::new(SyncAction(f))
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn args(mut self, args_description: impl Into<String>) -> Self {
        self.args_description = Some(args_description.into());
        self
    }

    pub fn returns(mut self, returns: impl Into<String>) -> Self {
        self.returns = Some(returns.into());
        self
    }

    /// The declared return contract, ignoring an empty annotation.
    pub fn return_contract(&self) -> Option<&str> {
        self.returns.as_deref().filter(|r| !r.is_empty())
    }
}

impl std::fmt::Debug for CommandDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommandDefinition")
            .field("description", &self.description)
            .field("args_description", &self.args_description)
            .field("returns", &self.returns)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, Default)]
pub struct CommandRegistry {
    commands: IndexMap<String, CommandDefinition>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `definition` under `name`, replacing any earlier one.
    pub fn register(&mut self, name: impl Into<String>, definition: CommandDefinition) -> &mut Self {
        let name = name.into();
        if self.commands.insert(name.clone(), definition).is_some() {
            tracing::debug!(command = %name, "replaced existing command definition");
        }
        self
    }

    pub fn get(&self, name: &str) -> Option<&CommandDefinition> {
        self.commands.get(name)
    }

    /// All commands in registration order.
    pub fn commands(&self) -> impl Iterator<Item = (&str, &CommandDefinition)> {
        self.commands.iter().map(|(name, def)| (name.as_str(), def))
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Human-readable listing of every registered command.
    pub fn help(&self) -> String {
        if self.commands.is_empty() {
            return "No commands registered.\n".to_string();
        }

        let mut out = String::from("Available commands:\n");
        for (name, def) in &self.commands {
            let _ = write!(out, "  ({}", name);
            if let Some(args) = &def.args_description {
                let _ = write!(out, " {}", args);
            }
            out.push(')');
            if let Some(returns) = def.return_contract() {
                let _ = write!(out, " -> {}", returns);
            }
            out.push('\n');
            if let Some(description) = &def.description {
                let _ = writeln!(out, "      {}", description);
            }
        }
        out
    }
}
