use std::path::PathBuf;

use clap::Parser;
use courier::{ServerOptions, config::ServerConfig, extensions, internal};

/// Load and inspect Courier SMTP server options
#[derive(Parser, Debug)]
#[command(name = "courier")]
#[command(version)]
struct Cli {
    /// Path to the configuration file (defaults to COURIER_CONFIG, ./courier.toml,
    /// then /etc/courier/courier.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

fn join<T: ToString>(items: &[T]) -> String {
    items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

fn main() -> anyhow::Result<()> {
    courier::logging::init();

    let cli = Cli::parse();
    let path = match cli.config {
        Some(path) => path,
        None => ServerConfig::discover()?,
    };

    let options = ServerConfig::from_file(&path)?
        .apply(ServerOptions::builder())?
        .build();

    if let Some(certificate) = options.server_certificate() {
        certificate.server_config()?;
    }

    if options.endpoints().is_empty() {
        internal!(level = WARN, "{} defines no endpoints", path.display());
    }

    internal!(
        level = INFO,
        "{} ({}) listening on [{}], max message size {}",
        options.server_name(),
        path.display(),
        join(options.endpoints()),
        options.max_message_size()
    );
    internal!(
        level = INFO,
        "EHLO (plain): {}",
        join(&extensions::advertised(&*options, false))
    );
    internal!(
        level = INFO,
        "EHLO (secure): {}",
        join(&extensions::advertised(&*options, true))
    );

    Ok(())
}
