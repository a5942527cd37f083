use anyhow::{Context, Result};
use lettre::{
    Message, Transport,
    message::{Mailbox, header::ContentType},
    transport::smtp::SmtpTransport,
    transport::smtp::authentication::Credentials,
};
use secrecy::ExposeSecret;
use tokio::task;

use crate::WeekendFlightsError;
use crate::config::MailConfig;
use crate::models::FlightOffer;

/// Body sent when no offer passed the filter
pub const NO_OFFERS_MESSAGE: &str = "No hay ofertas hoy.";

/// Separator closing every offer block
pub const DIVIDER: &str = "------------------------";

/// Render the offers as the plain-text email body
#[must_use]
pub fn build_email(offers: &[FlightOffer]) -> String {
    if offers.is_empty() {
        return NO_OFFERS_MESSAGE.to_string();
    }

    offers
        .iter()
        .map(format_offer)
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_offer(offer: &FlightOffer) -> String {
    format!(
        "✈️ {}, {}\n\
Precio: {} €\n\
Duración vuelo: {:.1} h\n\
Link: {}\n\
{}\n",
        offer.city_to,
        offer.country_to.name,
        offer.price,
        offer.duration_hours(),
        offer.deep_link,
        DIVIDER
    )
}

/// Delivers the offers email
pub trait Mailer {
    async fn send(&self, body: String) -> Result<()>;
}

/// Sends the email from the Gmail account to itself over SMTPS
pub struct GmailMailer {
    transport: SmtpTransport,
    mailbox: Mailbox,
    subject: String,
}

impl GmailMailer {
    pub fn new(config: &MailConfig) -> Result<Self> {
        let password = config
            .password
            .as_ref()
            .ok_or_else(|| WeekendFlightsError::email("Missing Gmail password"))?;
        let credentials = Credentials::new(
            config.username.clone(),
            password.expose_secret().clone(),
        );

        let transport = SmtpTransport::relay(&config.smtp_host)?
            .port(config.smtp_port)
            .credentials(credentials)
            .build();

        let mailbox = format!("Weekend Flights <{}>", config.username)
            .parse::<Mailbox>()
            .map_err(|e| WeekendFlightsError::email(format!("Invalid Gmail address: {e}")))?;

        Ok(Self {
            transport,
            mailbox,
            subject: config.subject.clone(),
        })
    }

    fn build_message(&self, body: String) -> Result<Message> {
        let message = Message::builder()
            .from(self.mailbox.clone())
            .to(self.mailbox.clone())
            .subject(&self.subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .context("Failed to build offers email")?;
        Ok(message)
    }
}

impl Mailer for GmailMailer {
    async fn send(&self, body: String) -> Result<()> {
        let message = self.build_message(body)?;
        let transport = self.transport.clone();

        task::spawn_blocking(move || transport.send(&message))
            .await?
            .context("Failed to send email")?;

        tracing::info!("Sent offers email to {}", self.mailbox.email);

        Ok(())
    }
}
