use crate::error::TransportError;
use crate::types::Action;
use tracing::debug;

/// Executes `Action`s produced by the client.
///
/// Hosts with their own HTTP stack can ignore this module entirely and
/// pattern-match on `Action::HttpRequest` themselves; the client core does
/// not depend on it.
pub struct Transport {
    http: reqwest::Client,
}

impl Transport {
    pub fn new() -> Self {
        Self {
            http: reqwest::Client::new(),
        }
    }

    pub fn with_client(http: reqwest::Client) -> Self {
        Self { http }
    }

    /// Perform the request and return the raw status and body for
    /// `Client::handle_response`. No timeout is applied here.
    pub async fn execute(&self, action: &Action) -> Result<(u16, String), TransportError> {
        let Action::HttpRequest {
            url,
            method,
            headers,
            body,
        } = action;

        debug!(%url, %method, "executing request");
        let mut request = match method.as_str() {
            "GET" => self.http.get(url),
            "POST" => self.http.post(url),
            "PUT" => self.http.put(url),
            "DELETE" => self.http.delete(url),
            other => return Err(TransportError::UnsupportedMethod(other.to_string())),
        };

        for (key, value) in headers {
            // Mask sensitive auth tokens in logs
            if key == "Authorization" {
                debug!(header = %key, value = %&value[..20.min(value.len())], "request header");
            } else {
                debug!(header = %key, value = %value, "request header");
            }
            request = request.header(key, value);
        }

        if let Some(body_str) = body {
            request = request.body(body_str.clone());
        }

        let response = request.send().await?;
        let status = response.status().as_u16();
        let body_text = response.text().await?;
        debug!(status, "response received");

        Ok((status, body_text))
    }
}

impl Default for Transport {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[tokio::test]
    async fn test_unsupported_method_is_rejected() {
        let transport = Transport::new();
        let action = Action::HttpRequest {
            url: "https://api.test.com/x".to_string(),
            method: "PATCH".to_string(),
            headers: HashMap::new(),
            body: None,
        };

        let err = transport.execute(&action).await.unwrap_err();
        assert!(matches!(err, TransportError::UnsupportedMethod(m) if m == "PATCH"));
    }
}
