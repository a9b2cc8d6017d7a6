use std::path::Path;
use std::time::Duration;

use log::debug;
use reqwest::blocking::{multipart, Client};
use url::Url;

use super::{Notifier, RelayError};

pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";
const MESSAGE_TIMEOUT: Duration = Duration::from_secs(20);
const PHOTO_TIMEOUT: Duration = Duration::from_secs(30);

/// Telegram Bot API client posting to a single chat
pub struct TelegramNotifier {
    client: Client,
    api_base: String,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(token: impl Into<String>, chat_id: impl Into<String>) -> Result<Self, RelayError> {
        Ok(TelegramNotifier {
            client: Client::builder().user_agent("reality-link").build()?,
            api_base: DEFAULT_API_BASE.to_string(),
            token: token.into(),
            chat_id: chat_id.into(),
        })
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// `{api_base}/bot{token}/{method}`
    fn endpoint(&self, method: &str) -> Result<Url, RelayError> {
        let mut url =
            Url::parse(&self.api_base).map_err(|e| RelayError::Endpoint(e.to_string()))?;
        url.path_segments_mut()
            .map_err(|_| RelayError::Endpoint(format!("{} cannot be a base URL", self.api_base)))?
            .pop_if_empty()
            .push(&format!("bot{}", self.token))
            .push(method);
        Ok(url)
    }

    fn check(method: &'static str, response: reqwest::blocking::Response) -> Result<(), RelayError> {
        let status = response.status();
        if status.as_u16() >= 300 {
            return Err(RelayError::Status {
                method,
                status: status.as_u16(),
            });
        }
        debug!("Telegram {} succeeded ({})", method, status);
        Ok(())
    }
}

impl Notifier for TelegramNotifier {
    fn send_message(&self, text: &str) -> Result<(), RelayError> {
        let response = self
            .client
            .post(self.endpoint("sendMessage")?)
            .timeout(MESSAGE_TIMEOUT)
            .form(&[("chat_id", self.chat_id.as_str()), ("text", text)])
            .send()
            // the URL carries the bot token
            .map_err(|e| RelayError::Http(e.without_url()))?;
        Self::check("sendMessage", response)
    }

    fn send_photo(&self, photo: &Path, caption: &str) -> Result<(), RelayError> {
        let form = multipart::Form::new()
            .text("chat_id", self.chat_id.clone())
            .text("caption", caption.to_string())
            .file("photo", photo)?;
        let response = self
            .client
            .post(self.endpoint("sendPhoto")?)
            .timeout(PHOTO_TIMEOUT)
            .multipart(form)
            .send()
            .map_err(|e| RelayError::Http(e.without_url()))?;
        Self::check("sendPhoto", response)
    }
}
