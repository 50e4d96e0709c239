// src/notify/email.rs
use anyhow::{Context, Result};
use lettre::message::{header, Mailbox, Message, MultiPart, SinglePart};
use lettre::transport::smtp::{authentication::Credentials, AsyncSmtpTransport};
use lettre::{AsyncTransport, Tokio1Executor};

use super::{build_html_body, build_subject, build_text_body, DailyPick};

pub struct EmailSender {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    to: Mailbox,
}

impl EmailSender {
    /// Build from SMTP_HOST/SMTP_USER/SMTP_PASS/EMAIL_SENDER/EMAIL_RECIPIENT.
    /// Errors here surface as "delivery failed" to the caller.
    pub fn from_env() -> Result<Self> {
        let host = std::env::var("SMTP_HOST").context("SMTP_HOST missing")?;
        let user = std::env::var("SMTP_USER").context("SMTP_USER missing")?;
        let pass = std::env::var("SMTP_PASS").context("SMTP_PASS missing")?;
        let from_addr = std::env::var("EMAIL_SENDER").context("EMAIL_SENDER missing")?;
        let to_addr = std::env::var("EMAIL_RECIPIENT").context("EMAIL_RECIPIENT missing")?;

        let creds = Credentials::new(user, pass);
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&host)
            .context("invalid SMTP_HOST")?
            .credentials(creds)
            .build();

        let from = from_addr.parse().context("invalid EMAIL_SENDER")?;
        let to = to_addr.parse().context("invalid EMAIL_RECIPIENT")?;

        Ok(Self { mailer, from, to })
    }

    /// Send the daily pick as a multipart/alternative (plain + HTML) message.
    pub async fn send_daily_pick(&self, pick: &DailyPick) -> Result<()> {
        let now = chrono::Utc::now();
        let subject = build_subject(pick);
        let text = build_text_body(pick, now);
        let html = build_html_body(pick, now);

        let msg = Message::builder()
            .from(self.from.clone())
            .to(self.to.clone())
            .subject(subject)
            .multipart(
                MultiPart::alternative()
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_PLAIN)
                            .body(text),
                    )
                    .singlepart(
                        SinglePart::builder()
                            .header(header::ContentType::TEXT_HTML)
                            .body(html),
                    ),
            )
            .context("build email")?;

        self.mailer.send(msg).await.context("send email")?;
        Ok(())
    }
}
