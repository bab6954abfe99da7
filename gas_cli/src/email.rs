use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use gas_core::config::tracker_config::EmailConfig;
use gas_core::tracker::transition::CategoryChange;
use gas_core::traits::notifier::Notifier;
use gas_core::{PriceCategory, TrackerError};

/// Sends category changes by e-mail over an authenticated STARTTLS relay.
pub struct EmailNotifier {
    from: String,
    to: String,
    mailer: SmtpTransport,
}

impl EmailNotifier {
    pub fn new(conf: &EmailConfig) -> Result<Self, TrackerError> {
        let mailer = SmtpTransport::starttls_relay(&conf.smtp_host)
            .map_err(|e| {
                TrackerError::configuration(format!("bad smtp host {}: {}", conf.smtp_host, e))
            })?
            .port(conf.smtp_port)
            .credentials(Credentials::new(
                conf.from_addr.clone(),
                conf.password.clone(),
            ))
            .build();

        Ok(Self {
            from: conf.from_addr.clone(),
            to: conf.to_addr.clone(),
            mailer,
        })
    }

    fn build_message(&self, change: &CategoryChange) -> Result<Message, TrackerError> {
        Message::builder()
            .from(self.from.parse().map_err(|e| {
                TrackerError::notify(format!("bad sender address {}: {}", self.from, e))
            })?)
            .to(self.to.parse().map_err(|e| {
                TrackerError::notify(format!("bad recipient address {}: {}", self.to, e))
            })?)
            .subject(change.subject())
            .header(ContentType::TEXT_PLAIN)
            .body(change.body())
            .map_err(|e| TrackerError::notify(format!("failed to build message: {}", e)))
    }
}

impl Notifier for EmailNotifier {
    fn send(
        &self,
        new: PriceCategory,
        previous: PriceCategory,
        price: u64,
    ) -> Result<(), TrackerError> {
        let change = CategoryChange::new(new, previous, price);
        let message = self.build_message(&change)?;
        self.mailer
            .send(&message)
            .map_err(|e| TrackerError::notify(format!("while sending email to {}: {}", self.to, e)))?;
        Ok(())
    }
}
