// Runtime configuration resolved from the CLI and the environment

use std::path::PathBuf;

/// Environment variable overriding the shell used by the `sh` command.
pub const SHELL_ENV: &str = "RUN_SHELL";
/// Environment variable holding the log filter directive.
pub const LOG_ENV: &str = "CMDLISP_LOG";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Program used to run `sh` command lines (invoked as `<shell> -c <line>`).
    pub shell: String,
    /// Working directory for the whole run, if different from the current one.
    pub dir: Option<PathBuf>,
    /// Default log filter when `CMDLISP_LOG` is unset.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            shell: default_shell(),
            dir: None,
            log_filter: "warn".to_string(),
        }
    }
}

impl Config {
    pub fn with_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.dir = dir;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        if verbose {
            self.log_filter = "debug".to_string();
        }
        self
    }
}

/// `RUN_SHELL` if set, otherwise bash on Windows and sh elsewhere.
pub fn default_shell() -> String {
    if let Ok(custom_shell) = std::env::var(SHELL_ENV) {
        custom_shell
    } else if cfg!(target_os = "windows") {
        // Try to find bash on PATH first, fallback to Git Bash default location
        if which::which("bash").is_ok() {
            "bash".to_string()
        } else {
            r"C:\Program Files\Git\bin\bash.exe".to_string()
        }
    } else {
        "sh".to_string()
    }
}

/// Install the stderr log subscriber. `CMDLISP_LOG` wins over `config.log_filter`.
pub fn init_logging(config: &Config) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_env(LOG_ENV)
        .unwrap_or_else(|_| EnvFilter::new(&config.log_filter));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
