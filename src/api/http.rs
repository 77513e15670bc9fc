use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::debug;
use ureq::http::Response;
use ureq::Body;

use super::{Ack, AnalyticsSummary, ApiError, ApiResult, LedgerApi};
use crate::models::{BudgetInput, DailyExpense, ExpenseInput, MonthlyBudget};

const BUDGETS_PATH: &str = "/api/monthly-budgets";
const EXPENSES_PATH: &str = "/api/daily-expenses";
const SUMMARY_PATH: &str = "/api/analytics/summary";

/// Failure body: `{"error": "..."}`.
#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
}

/// Talks to a running budget service over HTTP/JSON.
pub(crate) struct HttpApi {
    agent: ureq::Agent,
    base_url: String,
}

impl HttpApi {
    pub(crate) fn new(base_url: &str) -> Self {
        let agent = ureq::Agent::new_with_config(
            ureq::config::Config::builder()
                .http_status_as_error(false)
                .build(),
        );
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    fn item_url(&self, collection: &str, id: &str) -> String {
        format!("{}{collection}/{id}", self.base_url)
    }
}

fn network(err: ureq::Error) -> ApiError {
    ApiError::Network(err.to_string())
}

/// Decode a 2xx body, or turn anything else into a server error carrying the
/// service's `error` message when it sent one.
fn decode<T: DeserializeOwned>(mut response: Response<Body>) -> ApiResult<T> {
    let status = response.status().as_u16();
    if !(200..300).contains(&status) {
        let message = response
            .body_mut()
            .read_json::<ErrorBody>()
            .ok()
            .and_then(|body| body.error);
        debug!(status, ?message, "request rejected");
        return Err(ApiError::Server { status, message });
    }
    response
        .body_mut()
        .read_json::<T>()
        .map_err(|e| ApiError::Network(format!("unreadable response: {e}")))
}

impl LedgerApi for HttpApi {
    fn list_budgets(&self) -> ApiResult<Vec<MonthlyBudget>> {
        let response = self.agent.get(&self.url(BUDGETS_PATH)).call().map_err(network)?;
        decode(response)
    }

    fn create_budget(&self, input: &BudgetInput) -> ApiResult<MonthlyBudget> {
        let response = self
            .agent
            .post(&self.url(BUDGETS_PATH))
            .send_json(input)
            .map_err(network)?;
        decode(response)
    }

    fn update_budget(&self, id: &str, input: &BudgetInput) -> ApiResult<MonthlyBudget> {
        let response = self
            .agent
            .put(&self.item_url(BUDGETS_PATH, id))
            .send_json(input)
            .map_err(network)?;
        decode(response)
    }

    fn delete_budget(&self, id: &str) -> ApiResult<Ack> {
        let response = self
            .agent
            .delete(&self.item_url(BUDGETS_PATH, id))
            .call()
            .map_err(network)?;
        decode(response)
    }

    fn list_expenses(&self) -> ApiResult<Vec<DailyExpense>> {
        let response = self.agent.get(&self.url(EXPENSES_PATH)).call().map_err(network)?;
        decode(response)
    }

    fn create_expense(&self, input: &ExpenseInput) -> ApiResult<DailyExpense> {
        let response = self
            .agent
            .post(&self.url(EXPENSES_PATH))
            .send_json(input)
            .map_err(network)?;
        decode(response)
    }

    fn update_expense(&self, id: &str, input: &ExpenseInput) -> ApiResult<DailyExpense> {
        let response = self
            .agent
            .put(&self.item_url(EXPENSES_PATH, id))
            .send_json(input)
            .map_err(network)?;
        decode(response)
    }

    fn delete_expense(&self, id: &str) -> ApiResult<Ack> {
        let response = self
            .agent
            .delete(&self.item_url(EXPENSES_PATH, id))
            .call()
            .map_err(network)?;
        decode(response)
    }

    fn analytics_summary(&self) -> ApiResult<AnalyticsSummary> {
        let response = self.agent.get(&self.url(SUMMARY_PATH)).call().map_err(network)?;
        decode(response)
    }

    fn describe(&self) -> String {
        self.base_url.clone()
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::thread;

    /// Answer exactly one request with a canned response; returns the base URL.
    fn serve_once(status_line: &'static str, content_type: &'static str, body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: {content_type}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).unwrap();
        });
        format!("http://{addr}")
    }

    #[test]
    fn test_error_body_becomes_server_message() {
        let url = serve_once("404 Not Found", "application/json", r#"{"error":"Budget not found"}"#);
        let api = HttpApi::new(&url);
        assert_eq!(
            api.delete_budget("missing").unwrap_err(),
            ApiError::server(404, "Budget not found")
        );
    }

    #[test]
    fn test_non_json_error_body_has_no_message() {
        let url = serve_once("500 Internal Server Error", "text/plain", "boom");
        let api = HttpApi::new(&url);
        assert_eq!(
            api.list_expenses().unwrap_err(),
            ApiError::Server {
                status: 500,
                message: None
            }
        );
    }

    #[test]
    fn test_unreadable_success_body_is_network_error() {
        let url = serve_once("200 OK", "application/json", "not json");
        let api = HttpApi::new(&url);
        let result = api.list_budgets();
        assert!(matches!(result, Err(ApiError::Network(_))), "{result:?}");
    }

    #[test]
    fn test_success_body_decodes() {
        let url = serve_once(
            "200 OK",
            "application/json",
            r#"[{"_id":"65f1","category":"Food","amount":500.0,"month":"2024-05"}]"#,
        );
        let api = HttpApi::new(&url);
        let budgets = api.list_budgets().unwrap();
        assert_eq!(budgets.len(), 1);
        assert_eq!(budgets[0].id, "65f1");
        assert_eq!(budgets[0].category, "Food");
    }

    #[test]
    fn test_urls_follow_rest_layout() {
        let api = HttpApi::new("http://localhost:5000/");
        assert_eq!(api.url(BUDGETS_PATH), "http://localhost:5000/api/monthly-budgets");
        assert_eq!(
            api.item_url(EXPENSES_PATH, "65f1c0"),
            "http://localhost:5000/api/daily-expenses/65f1c0"
        );
        assert_eq!(api.describe(), "http://localhost:5000");
    }

    #[test]
    fn test_unreachable_service_is_network_error() {
        // Port 9 (discard) is closed on loopback in practice.
        let api = HttpApi::new("http://127.0.0.1:9");
        let result = api.list_budgets();
        assert!(matches!(result, Err(ApiError::Network(_))), "{result:?}");
    }
}
