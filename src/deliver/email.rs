// src/deliver/email.rs
//
// SMTP delivery: one message per run, every chart attached. Implicit-TLS relay
// (port 465) with username/password auth.

use lettre::{
    message::{header::ContentType, Attachment, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    Message, SmtpTransport, Transport,
};

use super::{DeliveryBatch, DeliveryError, Notifier};
use crate::config::secrets::EmailCredentials;

pub struct EmailNotifier {
    creds: EmailCredentials,
}

impl EmailNotifier {
    pub fn new(creds: EmailCredentials) -> Self {
        Self { creds }
    }

    fn mailboxes(&self) -> Result<(Mailbox, Mailbox), DeliveryError> {
        Ok((self.creds.user.parse()?, self.creds.to.parse()?))
    }

    /// Assemble the batch message without sending it.
    pub fn build_message(&self, batch: &DeliveryBatch, subject: &str) -> Result<Message, DeliveryError> {
        let (from, to) = self.mailboxes()?;
        let png = ContentType::parse("image/png").map_err(|e| DeliveryError::Build(e.to_string()))?;

        let titles: Vec<&str> = batch.iter().map(|a| a.title.as_str()).collect();
        let body = format!("Attached: {} chart(s).\n\n{}\n", batch.len(), titles.join("\n"));

        let mut parts = MultiPart::mixed().singlepart(SinglePart::plain(body));
        for artifact in batch {
            let bytes = artifact.read()?;
            parts = parts.singlepart(Attachment::new(artifact.file_name.clone()).body(bytes, png.clone()));
        }

        Ok(Message::builder().from(from).to(to).subject(subject).multipart(parts)?)
    }

    fn send(&self, message: &Message) -> Result<(), DeliveryError> {
        let mailer = SmtpTransport::relay(&self.creds.smtp_host)?
            .credentials(Credentials::new(self.creds.user.clone(), self.creds.password.clone()))
            .build();
        let resp = mailer.send(message)?;
        logd!("SMTP {}: {:?}", self.creds.smtp_host, resp.code());
        Ok(())
    }
}

impl Notifier for EmailNotifier {
    fn name(&self) -> &str { "email" }

    fn send_text(&self, text: &str) -> Result<(), DeliveryError> {
        let (from, to) = self.mailboxes()?;
        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(text)
            .header(ContentType::TEXT_PLAIN)
            .body(text.to_string())?;
        self.send(&message)?;
        logf!("Mail sent to {}", self.creds.to);
        Ok(())
    }

    fn deliver(&self, batch: DeliveryBatch, subject: &str) -> Result<(), DeliveryError> {
        logf!("Email: {} chart(s) as {subject:?}", batch.len());
        logd!("Email recipient: {}", self.creds.to);
        let message = self.build_message(&batch, subject)?;
        self.send(&message)?;
        logf!("Mail sent to {}", self.creds.to);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::deliver::RenderedArtifact;

    fn creds(user: &str) -> EmailCredentials {
        EmailCredentials { user: s!(user), password: s!("pw"), to: s!("to@example.com"), smtp_host: s!("localhost") }
    }

    #[test]
    fn message_carries_every_attachment() {
        let tmp = tempfile::tempdir().unwrap();
        let mut batch = DeliveryBatch::new();
        for name in ["gdp.png", "population.png"] {
            let p = tmp.path().join(name);
            std::fs::write(&p, b"\x89PNG fake").unwrap();
            batch.push(RenderedArtifact::new(p, name.trim_end_matches(".png")));
        }

        let msg = EmailNotifier::new(creds("me@example.com")).build_message(&batch, "Economic Data Update").unwrap();
        let raw = String::from_utf8_lossy(&msg.formatted()).into_owned();
        assert!(raw.contains("Subject: Economic Data Update"));
        assert!(raw.contains("gdp.png"));
        assert!(raw.contains("population.png"));
        assert_eq!(raw.matches("Content-Type: image/png").count(), 2);
    }

    #[test]
    fn bad_sender_is_address_error() {
        let err = EmailNotifier::new(creds("not an address")).build_message(&DeliveryBatch::new(), "x").unwrap_err();
        assert!(matches!(err, DeliveryError::Address(_)));
    }
}
