use std::fmt;
use std::time::Duration;

use clap::ValueEnum;
use reqwest::Url;

use crate::error::{BenchError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Whether requests with this method carry the serialized todo as body.
    pub fn has_body(&self) -> bool {
        matches!(self, HttpMethod::Post | HttpMethod::Put | HttpMethod::Patch)
    }
}

impl Default for HttpMethod {
    fn default() -> Self {
        Self::Post
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
            HttpMethod::Put => write!(f, "PUT"),
            HttpMethod::Patch => write!(f, "PATCH"),
            HttpMethod::Delete => write!(f, "DELETE"),
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Patch => reqwest::Method::PATCH,
            HttpMethod::Delete => reqwest::Method::DELETE,
        }
    }
}

/// Connection settings for the todo REST API under test.
///
/// Paths are relative to `url`. A `{id}` placeholder is replaced by the id of
/// the todo being sent.
#[derive(Debug, Clone)]
pub struct RestClientConfig {
    pub url: String,
    pub todos_get_path: String,
    pub todos_post_path: String,
    pub todos_put_path: String,
    pub todos_delete_path: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    /// Idle connections kept per host by the client pool
    pub max_connections_per_route: usize,
}

impl Default for RestClientConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8080".to_string(),
            todos_get_path: "/todos".to_string(),
            todos_post_path: "/todos".to_string(),
            todos_put_path: "/todos/{id}".to_string(),
            todos_delete_path: "/todos/{id}".to_string(),
            connect_timeout: Duration::from_millis(30_000),
            request_timeout: Duration::from_millis(30_000),
            max_connections_per_route: 5,
        }
    }
}

impl RestClientConfig {
    pub fn new(url: &str) -> Self {
        Self {
            url: url.to_string(),
            ..Default::default()
        }
    }

    /// Checks the settings and returns the parsed base URL.
    pub fn validate(&self) -> Result<Url> {
        if self.url.trim().is_empty() {
            return Err(BenchError::Configuration(
                "url must not be empty".to_string(),
            ));
        }
        let base = Url::parse(&self.url)
            .map_err(|e| BenchError::Configuration(format!("invalid url '{}': {}", self.url, e)))?;
        if base.cannot_be_a_base() {
            return Err(BenchError::Configuration(format!(
                "url '{}' cannot be used as a base",
                self.url
            )));
        }

        for (name, path) in [
            ("todos_get_path", &self.todos_get_path),
            ("todos_post_path", &self.todos_post_path),
            ("todos_put_path", &self.todos_put_path),
            ("todos_delete_path", &self.todos_delete_path),
        ] {
            if path.trim().is_empty() {
                return Err(BenchError::Configuration(format!(
                    "{} must not be empty",
                    name
                )));
            }
        }

        if self.connect_timeout.is_zero() || self.request_timeout.is_zero() {
            return Err(BenchError::Configuration(
                "timeouts must be greater than zero".to_string(),
            ));
        }

        Ok(base)
    }

    /// The configured path for a method, used when no explicit target path is given.
    pub fn path_for(&self, method: HttpMethod) -> &str {
        match method {
            HttpMethod::Get => &self.todos_get_path,
            HttpMethod::Post => &self.todos_post_path,
            HttpMethod::Put | HttpMethod::Patch => &self.todos_put_path,
            HttpMethod::Delete => &self.todos_delete_path,
        }
    }
}

/// Replaces every `{id}` in a path template with `id`.
pub fn expand_path(template: &str, id: u64) -> String {
    template.replace("{id}", &id.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = RestClientConfig::default();
        let base = config.validate().unwrap();
        assert_eq!(base.as_str(), "http://localhost:8080/");
    }

    #[test]
    fn test_validate_rejects_empty_url() {
        let config = RestClientConfig::new("");
        assert!(matches!(
            config.validate(),
            Err(BenchError::Configuration(_))
        ));
    }

    #[test]
    fn test_validate_rejects_garbage_url() {
        let config = RestClientConfig::new("not a url");
        assert!(matches!(
            config.validate(),
            Err(BenchError::Configuration(_))
        ));
    }

    #[test]
    fn test_validate_rejects_empty_path() {
        let config = RestClientConfig {
            todos_delete_path: " ".to_string(),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("todos_delete_path"));
    }

    #[test]
    fn test_validate_rejects_zero_timeout() {
        let config = RestClientConfig {
            request_timeout: Duration::ZERO,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_path_for_method() {
        let config = RestClientConfig::default();
        assert_eq!(config.path_for(HttpMethod::Post), "/todos");
        assert_eq!(config.path_for(HttpMethod::Put), "/todos/{id}");
        assert_eq!(config.path_for(HttpMethod::Delete), "/todos/{id}");
    }

    #[test]
    fn test_expand_path() {
        assert_eq!(expand_path("/todos/{id}", 42), "/todos/42");
        assert_eq!(expand_path("/todos", 42), "/todos");
    }

    #[test]
    fn test_http_method_parsing() {
        assert_eq!(HttpMethod::from_str("post", false).unwrap(), HttpMethod::Post);
        assert_eq!(HttpMethod::from_str("DELETE", true).unwrap(), HttpMethod::Delete);
        assert!(HttpMethod::from_str("trace", true).is_err());
        assert_eq!(HttpMethod::Patch.to_string(), "PATCH");
        assert!(HttpMethod::Put.has_body());
        assert!(!HttpMethod::Get.has_body());
    }
}
