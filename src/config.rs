use anyhow::{bail, Context, Result};
use std::path::{Path, PathBuf};

pub(crate) const ENV_API: &str = "BUDGET_PLANNER_API";
pub(crate) const ENV_DB: &str = "BUDGET_PLANNER_DB";
pub(crate) const ENV_USER: &str = "BUDGET_PLANNER_USER";

const DEFAULT_USER: &str = "demo";
const DB_FILE: &str = "budget-planner.db";
const PREFS_FILE: &str = "preferences.json";

/// Where ledger requests are served from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Backend {
    /// Local SQLite store.
    Local,
    /// A running budget service at this base URL.
    Remote(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Config {
    pub(crate) backend: Backend,
    pub(crate) db_path: PathBuf,
    pub(crate) prefs_path: PathBuf,
    pub(crate) log_dir: PathBuf,
    pub(crate) user: String,
}

impl Config {
    /// Resolve from the process environment and command-line flags.
    ///
    /// Returns the configuration plus the arguments left after removing the
    /// recognised flags (the program name is dropped).
    pub(crate) fn resolve(args: &[String]) -> Result<(Self, Vec<String>)> {
        let proj_dirs = directories::ProjectDirs::from("com", "budgetplanner", "BudgetPlanner")
            .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
        Self::resolve_with(
            args.get(1..).unwrap_or_default(),
            |key| std::env::var(key).ok(),
            proj_dirs.data_dir(),
            proj_dirs.config_dir(),
        )
    }

    /// Flags win over environment variables, which win over defaults.
    pub(crate) fn resolve_with(
        args: &[String],
        env: impl Fn(&str) -> Option<String>,
        data_dir: &Path,
        config_dir: &Path,
    ) -> Result<(Self, Vec<String>)> {
        let env = |key: &str| env(key).filter(|v| !v.trim().is_empty());

        let mut api = env(ENV_API);
        let mut db = env(ENV_DB).map(PathBuf::from);
        let mut user = env(ENV_USER);
        let mut rest = Vec::new();

        let mut iter = args.iter();
        while let Some(arg) = iter.next() {
            let (flag, inline) = match arg.split_once('=') {
                Some((flag, value)) if flag.starts_with("--") => (flag, Some(value.to_string())),
                _ => (arg.as_str(), None),
            };
            let mut value = |name: &str| -> Result<String> {
                match inline.clone().or_else(|| iter.next().cloned()) {
                    Some(v) if !v.is_empty() => Ok(v),
                    _ => bail!("Missing value for {name}"),
                }
            };
            match flag {
                "--api" => api = Some(value("--api")?),
                "--db" => db = Some(PathBuf::from(value("--db")?)),
                "--user" => user = Some(value("--user")?),
                "--local" => api = None,
                _ => rest.push(arg.clone()),
            }
        }

        let backend = match api {
            Some(url) => {
                if !url.starts_with("http://") && !url.starts_with("https://") {
                    bail!("API URL must start with http:// or https://: {url}");
                }
                Backend::Remote(url)
            }
            None => Backend::Local,
        };

        let config = Self {
            backend,
            db_path: db.unwrap_or_else(|| data_dir.join(DB_FILE)),
            prefs_path: config_dir.join(PREFS_FILE),
            log_dir: data_dir.join("logs"),
            user: user.unwrap_or_else(|| DEFAULT_USER.to_string()),
        };
        Ok((config, rest))
    }

    pub(crate) fn ensure_dirs(&self) -> Result<()> {
        for dir in [Some(self.log_dir.as_path()), self.prefs_path.parent()]
            .into_iter()
            .flatten()
        {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use std::collections::HashMap;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    fn resolve(list: &[&str], vars: &[(&str, &str)]) -> Result<(Config, Vec<String>)> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::resolve_with(
            &args(list),
            |key| vars.get(key).cloned(),
            Path::new("/data"),
            Path::new("/config"),
        )
    }

    #[test]
    fn test_defaults() {
        let (config, rest) = resolve(&[], &[]).unwrap();
        assert_eq!(config.backend, Backend::Local);
        assert_eq!(config.db_path, PathBuf::from("/data/budget-planner.db"));
        assert_eq!(config.prefs_path, PathBuf::from("/config/preferences.json"));
        assert_eq!(config.log_dir, PathBuf::from("/data/logs"));
        assert_eq!(config.user, "demo");
        assert!(rest.is_empty());
    }

    #[test]
    fn test_env_vars() {
        let (config, _) = resolve(
            &[],
            &[
                (ENV_API, "http://localhost:5000"),
                (ENV_DB, "/tmp/x.db"),
                (ENV_USER, "alice"),
            ],
        )
        .unwrap();
        assert_eq!(config.backend, Backend::Remote("http://localhost:5000".into()));
        assert_eq!(config.db_path, PathBuf::from("/tmp/x.db"));
        assert_eq!(config.user, "alice");
    }

    #[test]
    fn test_blank_env_is_ignored() {
        let (config, _) = resolve(&[], &[(ENV_API, "  "), (ENV_USER, "")]).unwrap();
        assert_eq!(config.backend, Backend::Local);
        assert_eq!(config.user, "demo");
    }

    #[test]
    fn test_flags_override_env_and_leave_command() {
        let (config, rest) = resolve(
            &["--db", "/tmp/a.db", "summary", "--user=bob", "2024-05"],
            &[(ENV_DB, "/tmp/env.db"), (ENV_USER, "alice")],
        )
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/a.db"));
        assert_eq!(config.user, "bob");
        assert_eq!(rest, args(&["summary", "2024-05"]));
    }

    #[test]
    fn test_local_flag_beats_env_api() {
        let (config, _) = resolve(&["--local"], &[(ENV_API, "http://x")]).unwrap();
        assert_eq!(config.backend, Backend::Local);
    }

    #[test]
    fn test_missing_flag_value() {
        let err = resolve(&["--api"], &[]).unwrap_err();
        assert!(err.to_string().contains("--api"));
    }

    #[test]
    fn test_rejects_non_http_api() {
        assert!(resolve(&["--api", "localhost:5000"], &[]).is_err());
    }

    #[test]
    fn test_ensure_dirs_creates_tree() {
        let tmp = tempfile::tempdir().unwrap();
        let (config, _) = Config::resolve_with(
            &[],
            |_| None,
            &tmp.path().join("data"),
            &tmp.path().join("config"),
        )
        .unwrap();
        config.ensure_dirs().unwrap();
        assert!(config.log_dir.is_dir());
        assert!(tmp.path().join("config").is_dir());
    }
}
