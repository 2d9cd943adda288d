// Small helpers shared by the interpreter and the binary

use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Format an elapsed time for log lines, e.g. `850µs`, `12ms`, `1.50s`, `2m 05s`.
pub fn format_duration(duration: Duration) -> String {
    let micros = duration.as_micros();
    if micros < 1_000 {
        format!("{}µs", micros)
    } else if micros < 1_000_000 {
        format!("{}ms", duration.as_millis())
    } else if duration.as_millis() < 59_995 {
        // Anything that would print as 60.00s rolls over to minutes
        format!("{:.2}s", duration.as_secs_f64())
    } else {
        let secs = duration.as_secs_f64().round() as u64;
        format!("{}m {:02}s", secs / 60, secs % 60)
    }
}

/// Restores the previous working directory when dropped.
struct CwdGuard {
    previous: PathBuf,
}

impl CwdGuard {
    fn enter(dir: &Path) -> io::Result<Self> {
        let previous = std::env::current_dir()?;
        std::env::set_current_dir(dir)?;
        Ok(Self { previous })
    }
}

impl Drop for CwdGuard {
    fn drop(&mut self) {
        if let Err(e) = std::env::set_current_dir(&self.previous) {
            tracing::error!(
                dir = %self.previous.display(),
                error = %e,
                "failed to restore working directory"
            );
        }
    }
}

/// Run `future` with the process working directory set to `dir`.
///
/// The previous directory is restored however the future finishes, including
/// when it returns an error or panics. The working directory is process-wide,
/// so callers must not run two of these concurrently.
pub async fn run_from_dir<F, T>(dir: impl AsRef<Path>, future: F) -> io::Result<T>
where
    F: Future<Output = T>,
{
    let _guard = CwdGuard::enter(dir.as_ref())?;
    tracing::debug!(dir = %dir.as_ref().display(), "running from directory");
    Ok(future.await)
}
