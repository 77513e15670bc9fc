use anyhow::{Context, Result};
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;

pub(crate) const ENV_LOG: &str = "BUDGET_PLANNER_LOG";
const DEFAULT_FILTER: &str = "budget_planner=info";
const LOG_FILE_PREFIX: &str = "budget-planner.log";

/// Install the global subscriber, writing to a daily file under `log_dir`.
///
/// The terminal belongs to the TUI, so nothing is logged to stdout. Keep the
/// returned guard alive until exit or buffered lines are lost.
pub(crate) fn init(log_dir: &Path) -> Result<WorkerGuard> {
    std::fs::create_dir_all(log_dir)
        .with_context(|| format!("Failed to create log directory: {}", log_dir.display()))?;
    let appender = tracing_appender::rolling::daily(log_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    // A second init (e.g. from tests) keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter_directive(std::env::var(ENV_LOG).ok()))
        .with_writer(writer)
        .with_ansi(false)
        .with_target(true)
        .try_init();
    Ok(guard)
}

fn filter_directive(from_env: Option<String>) -> String {
    from_env
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_FILTER.into())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;

    #[test]
    fn test_filter_directive_falls_back() {
        assert_eq!(filter_directive(None), DEFAULT_FILTER);
        assert_eq!(filter_directive(Some(" ".into())), DEFAULT_FILTER);
        assert_eq!(
            filter_directive(Some("budget_planner=debug".into())),
            "budget_planner=debug"
        );
    }

    #[test]
    fn test_init_creates_log_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("logs");
        let guard = init(&dir).unwrap();
        tracing::info!("hello from test");
        drop(guard);
        assert!(dir.is_dir());
    }
}
