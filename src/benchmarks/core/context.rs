use crate::client::{ResponseSummary, TodoRestClient};
use crate::config::HttpMethod;
use crate::todo::RequestBuilder;

/// State owned by one trial: the shared client, the id source and counters.
#[derive(Debug)]
pub struct TrialContext {
    pub client: TodoRestClient,
    pub requests: RequestBuilder,
    pub method: HttpMethod,
    pub path_template: String,
    pub requests_sent: u64,
    pub last_response: Option<ResponseSummary>,
}

impl TrialContext {
    pub fn new(
        client: TodoRestClient,
        requests: RequestBuilder,
        method: HttpMethod,
        path_template: &str,
    ) -> Self {
        Self {
            client,
            requests,
            method,
            path_template: path_template.to_string(),
            requests_sent: 0,
            last_response: None,
        }
    }

    pub fn record_response(&mut self, summary: ResponseSummary) {
        self.last_response = Some(summary);
    }
}
