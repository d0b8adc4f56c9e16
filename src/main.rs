mod server;

use clap::{Parser, Subcommand};
use quipu_channels::{DisabledDelivery, TwilioSender};
use quipu_core::config;
use quipu_core::traits::WelcomeDelivery;
use quipu_engine::Engine;
use quipu_rates::{Converter, FixerClient};
use quipu_store::Store;
use std::sync::Arc;

#[derive(Parser)]
#[command(
    name = "quipu",
    version,
    about = "Quipu — conversational expense tracking over WhatsApp"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the webhook server.
    Start,
    /// Check configuration and storage health.
    Status,
    /// Process one message locally and print the reply, without a server.
    Ask {
        /// Sender phone number, E.164.
        phone: String,
        /// The message body.
        #[arg(trailing_var_arg = true)]
        message: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = config::load(&cli.config)?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.quipu.log_level)),
        )
        .init();

    match cli.command {
        Commands::Start => {
            let engine = build_engine(&cfg).await?;
            println!("🪢 Quipu — Starting webhook server...");
            server::serve(engine, &cfg.server).await?;
        }
        Commands::Status => {
            println!("🪢 Quipu — Status Check\n");
            println!("Config: {}", cli.config);
            println!("Database: {}", config::shellexpand(&cfg.database.db_path));

            // Opening the store runs pending migrations, so this also
            // verifies the schema.
            match Store::new(&cfg.database).await {
                Ok(_) => println!("  storage: ok"),
                Err(e) => println!("  storage: error ({e})"),
            }

            println!(
                "  rates: {}",
                if cfg.rates.api_key.is_empty() {
                    "no API key, fallback rate only"
                } else {
                    "configured"
                }
            );
            println!(
                "  twilio: {}",
                if !cfg.twilio.enabled {
                    "disabled"
                } else if cfg.twilio.account_sid.is_empty() || cfg.twilio.auth_token.is_empty() {
                    "enabled but missing credentials"
                } else {
                    "configured"
                }
            );
        }
        Commands::Ask { phone, message } => {
            if message.is_empty() {
                anyhow::bail!("no message provided. Usage: quipu ask <phone> <message>");
            }

            let body = message.join(" ");
            let engine = build_engine(&cfg).await?;
            let reply = engine.handle_message(&phone, &body).await;
            println!("{reply}");
        }
    }

    Ok(())
}

/// Wire storage, conversion, and delivery into an engine.
async fn build_engine(cfg: &config::Config) -> anyhow::Result<Engine> {
    let store = Store::new(&cfg.database).await?;

    let source = Arc::new(FixerClient::new(&cfg.rates));
    let converter = Converter::new(source, cfg.rates.fallback_rate);

    let delivery: Arc<dyn WelcomeDelivery> = if cfg.twilio.enabled {
        if cfg.twilio.account_sid.is_empty() || cfg.twilio.auth_token.is_empty() {
            anyhow::bail!(
                "Twilio is enabled but account_sid or auth_token is empty. \
                 Set them in config.toml or the TWILIO_AUTH_TOKEN env var."
            );
        }
        Arc::new(TwilioSender::new(&cfg.twilio))
    } else {
        Arc::new(DisabledDelivery)
    };

    Ok(Engine::new(
        store,
        converter,
        delivery,
        cfg.quipu.utc_offset_minutes,
    ))
}
