mod analytics;
mod http;
mod local;

pub(crate) use analytics::AnalyticsSummary;
pub(crate) use http::HttpApi;
pub(crate) use local::LocalApi;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::config::{Backend, Config};
use crate::db::{Database, SeedUser};
use crate::models::{BudgetInput, DailyExpense, ExpenseInput, MonthlyBudget};

pub(crate) type ApiResult<T> = std::result::Result<T, ApiError>;

/// Failure of a single ledger request, as surfaced to the user.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub(crate) enum ApiError {
    /// Input rejected before any request was made.
    #[error("invalid input: {0}")]
    Validation(String),
    /// The request never completed.
    #[error("request failed: {0}")]
    Network(String),
    /// The backend answered with a non-2xx status.
    #[error("server returned HTTP {status}{}", server_detail(.message))]
    Server { status: u16, message: Option<String> },
    /// The same form already has a submission in flight.
    #[error("a submission from this form is already in progress")]
    Busy,
}

impl ApiError {
    pub(crate) fn server(status: u16, message: impl Into<String>) -> Self {
        Self::Server {
            status,
            message: Some(message.into()),
        }
    }

    /// Message supplied by the backend or validator, if any.
    pub(crate) fn detail(&self) -> Option<&str> {
        match self {
            Self::Validation(msg) => Some(msg),
            Self::Server { message, .. } => message.as_deref(),
            Self::Network(_) | Self::Busy => None,
        }
    }
}

fn server_detail(message: &Option<String>) -> String {
    message
        .as_deref()
        .map(|m| format!(": {m}"))
        .unwrap_or_default()
}

/// Acknowledgement body returned by DELETE.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub(crate) struct Ack {
    #[serde(default)]
    pub(crate) message: String,
}

/// The budget service's REST surface.
pub(crate) trait LedgerApi {
    fn list_budgets(&self) -> ApiResult<Vec<MonthlyBudget>>;
    fn create_budget(&self, input: &BudgetInput) -> ApiResult<MonthlyBudget>;
    fn update_budget(&self, id: &str, input: &BudgetInput) -> ApiResult<MonthlyBudget>;
    fn delete_budget(&self, id: &str) -> ApiResult<Ack>;

    fn list_expenses(&self) -> ApiResult<Vec<DailyExpense>>;
    fn create_expense(&self, input: &ExpenseInput) -> ApiResult<DailyExpense>;
    fn update_expense(&self, id: &str, input: &ExpenseInput) -> ApiResult<DailyExpense>;
    fn delete_expense(&self, id: &str) -> ApiResult<Ack>;

    fn analytics_summary(&self) -> ApiResult<AnalyticsSummary>;

    /// Short human-readable description of where requests go.
    fn describe(&self) -> String;
}

/// Build the backend selected by the configuration.
///
/// The local backend provisions its store before returning, so nothing is
/// served from an unprovisioned database.
pub(crate) fn connect(config: &Config) -> Result<Box<dyn LedgerApi>> {
    match &config.backend {
        Backend::Remote(url) => Ok(Box::new(HttpApi::new(url))),
        Backend::Local => {
            let mut db = Database::open(&config.db_path)?;
            db.bootstrap(&SeedUser::default())?;
            let user = db
                .find_user(&config.user)?
                .with_context(|| format!("Unknown user '{}'", config.user))?;
            let user_id = user
                .id
                .ok_or_else(|| anyhow::anyhow!("User '{}' has no id", config.user))?;
            Ok(Box::new(LocalApi::new(db, user_id, &config.db_path)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_error_display_carries_message() {
        assert_eq!(
            ApiError::server(500, "Database unavailable").to_string(),
            "server returned HTTP 500: Database unavailable"
        );
        let bare = ApiError::Server {
            status: 502,
            message: None,
        };
        assert_eq!(bare.to_string(), "server returned HTTP 502");
        assert_eq!(bare.detail(), None);
    }
}
