// src/deliver/telegram.rs
//
// Telegram Bot API: `sendMessage` for text, `sendPhoto` (multipart) per chart.
// Any non-2xx answer is fatal for the run.

use reqwest::blocking::{
    multipart::{Form, Part},
    Client, Response,
};

use super::{DeliveryBatch, DeliveryError, Notifier};
use crate::config::{consts::TELEGRAM_API, secrets::TelegramCredentials};
use crate::core::net;

pub struct TelegramNotifier {
    creds: TelegramCredentials,
    base_url: String,
}

impl TelegramNotifier {
    pub fn new(creds: TelegramCredentials) -> Self {
        Self { creds, base_url: s!(TELEGRAM_API) }
    }

    /// Point at another Bot API host (local bot server, test stub).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    fn endpoint(&self, method: &str) -> String {
        format!("{}/bot{}/{method}", self.base_url, self.creds.token)
    }

    fn client(&self) -> Result<Client, DeliveryError> {
        Ok(net::client()?)
    }

    /// 2xx passes; anything else becomes `Rejected` carrying the response body.
    fn check(method: &str, resp: Response) -> Result<String, DeliveryError> {
        let status = resp.status();
        let body = resp.text().unwrap_or_default();
        logd!("{method}: HTTP {} {body}", status.as_u16());
        if !status.is_success() {
            loge!("{method} rejected: HTTP {} {body}", status.as_u16());
            return Err(DeliveryError::Rejected { status: status.as_u16(), body });
        }
        Ok(body)
    }
}

impl Notifier for TelegramNotifier {
    fn name(&self) -> &str { "telegram" }

    fn send_text(&self, text: &str) -> Result<(), DeliveryError> {
        logd!("sendMessage to chat {}", self.creds.chat_id);
        let resp = self
            .client()?
            .post(self.endpoint("sendMessage"))
            .form(&[("chat_id", self.creds.chat_id.as_str()), ("text", text)])
            .send()?;
        let status = resp.status().as_u16();
        let body = Self::check("sendMessage", resp)?;
        logf!("sendMessage: HTTP {status} {body}");
        Ok(())
    }

    fn deliver(&self, batch: DeliveryBatch, subject: &str) -> Result<(), DeliveryError> {
        logf!("Telegram: sending {} chart(s) for {subject:?} to chat {}", batch.len(), self.creds.chat_id);
        let client = self.client()?;
        let url = self.endpoint("sendPhoto");

        for artifact in batch {
            let bytes = artifact.read()?;
            let photo = Part::bytes(bytes)
                .file_name(artifact.file_name.clone())
                .mime_str("image/png")?;
            let form = Form::new()
                .text("chat_id", self.creds.chat_id.clone())
                .text("caption", artifact.title.clone())
                .part("photo", photo);

            let resp = client.post(&url).multipart(form).send()?;
            Self::check("sendPhoto", resp)?;
            logf!("Sent {}", artifact.file_name);
        }
        Ok(())
    }
}
