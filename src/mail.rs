//! Contact form notifications over SMTP.

use lettre::{
	message::header::ContentType,
	transport::smtp::{authentication::Credentials, Error as SmtpError},
	AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};

use crate::{config::Config, route::message::model};

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("smtp error: {0}")]
	Smtp(#[from] SmtpError),
	#[error("failed to build message: {0}")]
	Build(#[from] lettre::error::Error),
	#[error("invalid email address: {0}")]
	Address(String),
}

/// Sends notices to the site owner.
#[derive(Clone)]
pub struct Mailer {
	transport: AsyncSmtpTransport<Tokio1Executor>,
	from: String,
	to: String,
}

impl Mailer {
	/// Builds a mailer from the SMTP settings, if all of them are present.
	///
	/// Notices go to `NOTIFY_EMAIL`, or back to the SMTP user when it is unset.
	pub fn from_config(config: &Config) -> Result<Option<Self>, Error> {
		let (Some(host), Some(username), Some(password)) = (
			config.smtp_host.as_deref(),
			config.smtp_username.as_deref(),
			config.smtp_password.as_deref(),
		) else {
			return Ok(None);
		};

		let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?
			.credentials(Credentials::new(username.to_owned(), password.to_owned()))
			.build();

		Ok(Some(Self {
			transport,
			from: username.to_owned(),
			to: config
				.notify_email
				.clone()
				.unwrap_or_else(|| username.to_owned()),
		}))
	}

	pub async fn send_contact_notice(&self, message: &model::Message) -> Result<(), Error> {
		let email = Message::builder()
			.from(
				self.from
					.parse()
					.map_err(|_| Error::Address(self.from.clone()))?,
			)
			.to(self
				.to
				.parse()
				.map_err(|_| Error::Address(self.to.clone()))?)
			.subject("New Contact Form Submission")
			.header(ContentType::TEXT_PLAIN)
			.body(contact_notice(message))?;

		self.transport.send(email).await?;

		tracing::info!(message = %message.id, to = %self.to, "contact notification sent");

		Ok(())
	}
}

fn contact_notice(message: &model::Message) -> String {
	format!(
		"You have a new message from your portfolio website:\n\nName: {}\nEmail: {}\nMessage: {}\n",
		message.name, message.email, message.message
	)
}
