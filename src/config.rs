use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "portfolio-api", about = "REST API for a personal portfolio site", version)]
pub struct Cli {
	#[command(flatten)]
	pub config: Config,

	#[command(subcommand)]
	pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
	/// Run the HTTP server (default)
	Serve,
	/// Create the admin account if none exists
	CreateAdmin {
		#[arg(long)]
		username: String,
		#[arg(long)]
		email: String,
		#[arg(long)]
		password: String,
	},
	/// Replace the admin's password
	ResetPassword {
		#[arg(long)]
		email: String,
		#[arg(long)]
		password: String,
	},
}

/// Settings shared by every command. Each flag falls back to its environment variable.
#[derive(Args, Debug, Clone)]
pub struct Config {
	/// SQLite connection string
	#[arg(long, env = "DATABASE_URL", default_value = "sqlite://portfolio.db")]
	pub database_url: String,

	/// Secret used to sign admin tokens
	#[arg(long, env = "JWT_SECRET", hide_env_values = true)]
	pub jwt_secret: String,

	/// Host to bind to
	#[arg(long, env = "HOST", default_value = "0.0.0.0")]
	pub host: String,

	/// Port to bind to
	#[arg(short, long, env = "PORT", default_value_t = 10000)]
	pub port: u16,

	/// Origins allowed to make cross-origin requests; any origin when empty
	#[arg(long, env = "ALLOWED_ORIGINS", value_delimiter = ',')]
	pub allowed_origins: Vec<String>,

	/// Where uploaded images are stored
	#[arg(long, env = "UPLOADS_DIR", default_value = "uploads")]
	pub uploads_dir: PathBuf,

	#[arg(long, env = "SMTP_HOST")]
	pub smtp_host: Option<String>,

	#[arg(long, env = "SMTP_USERNAME")]
	pub smtp_username: Option<String>,

	#[arg(long, env = "SMTP_PASSWORD", hide_env_values = true)]
	pub smtp_password: Option<String>,

	/// Recipient of contact notifications
	#[arg(long, env = "NOTIFY_EMAIL")]
	pub notify_email: Option<String>,
}
