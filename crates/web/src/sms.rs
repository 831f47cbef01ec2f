use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SmsError {
    #[error("SMS gateway request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// Delivers one-time codes to a phone number
#[async_trait]
pub trait SmsSender: Send + Sync {
    async fn send_code(&self, phone_number: &str, code: &str) -> Result<(), SmsError>;
}

fn code_message(code: &str) -> String {
    format!("Your verification code: {}", code)
}

/// Development sender: codes only go to the log
pub struct LogSmsSender;

#[async_trait]
impl SmsSender for LogSmsSender {
    async fn send_code(&self, phone_number: &str, code: &str) -> Result<(), SmsError> {
        tracing::info!("SMS gateway not configured, code for {} is {}", phone_number, code);
        Ok(())
    }
}

#[derive(Debug, Serialize)]
struct SmsRequest<'a> {
    phone_number: &'a str,
    message: String,
}

/// Posts codes as JSON to an HTTP gateway with a bearer token
pub struct HttpSmsSender {
    client: Client,
    url: String,
    token: Option<String>,
}

impl HttpSmsSender {
    pub fn new(url: String, token: Option<String>) -> Result<Self, SmsError> {
        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self { client, url, token })
    }
}

#[async_trait]
impl SmsSender for HttpSmsSender {
    async fn send_code(&self, phone_number: &str, code: &str) -> Result<(), SmsError> {
        let mut request = self.client.post(&self.url).json(&SmsRequest {
            phone_number,
            message: code_message(code),
        });

        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        request.send().await?.error_for_status()?;

        tracing::info!("Verification code sent to {}", phone_number);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_contains_code() {
        assert!(code_message("123456").ends_with("123456"));
    }

    #[tokio::test]
    async fn test_log_sender_never_fails() {
        assert!(LogSmsSender.send_code("+998901234567", "123456").await.is_ok());
    }
}
