use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "replybot")]
#[command(about = "Replybot: WhatsApp webhook auto-reply relay", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show version
    Version,

    /// Run the gateway: receive provider webhooks on POST /webhook and send automatic replies.
    Serve {
        /// Config file path (default: REPLYBOT_CONFIG_PATH or ./replybot.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,

        /// HTTP port (default from config, REPLYBOT_PORT, or 8000)
        #[arg(long, short)]
        port: Option<u16>,

        /// Bind address (default from config, REPLYBOT_BIND, or 0.0.0.0)
        #[arg(long, short, value_name = "ADDR")]
        bind: Option<String>,
    },

    /// Send one text message through the provider API and print the response.
    Send {
        /// Config file path (default: REPLYBOT_CONFIG_PATH or ./replybot.json)
        #[arg(long, short, value_name = "PATH")]
        config: Option<std::path::PathBuf>,

        /// Destination number in international format without symbols, e.g. 5521971185909
        #[arg(long, value_name = "NUMBER")]
        to: String,

        /// Message text
        #[arg(long)]
        text: String,
    },
}

#[tokio::main]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            println!("replybot {}", env!("CARGO_PKG_VERSION"));
        }
        Some(Commands::Serve { config, port, bind }) => {
            if let Err(e) = run_serve(config, port, bind).await {
                log::error!("gateway failed: {:#}", e);
                std::process::exit(1);
            }
        }
        Some(Commands::Send { config, to, text }) => {
            if let Err(e) = run_send(config, &to, &text).await {
                log::error!("send failed: {:#}", e);
                std::process::exit(1);
            }
        }
        None => {
            println!("Run with --help for usage");
        }
    }
}

async fn run_serve(
    config_path: Option<std::path::PathBuf>,
    port: Option<u16>,
    bind: Option<String>,
) -> anyhow::Result<()> {
    let (mut config, path) = lib::config::load_config(config_path)?;
    if let Some(p) = port {
        config.gateway.port = p;
    }
    if let Some(b) = bind {
        config.gateway.bind = b;
    }
    log::info!(
        "starting gateway on {}:{} (config {})",
        config.gateway.bind,
        config.gateway.port,
        path.display()
    );
    lib::gateway::run_gateway(config).await
}

async fn run_send(
    config_path: Option<std::path::PathBuf>,
    to: &str,
    text: &str,
) -> anyhow::Result<()> {
    let (config, _path) = lib::config::load_config(config_path)?;
    let missing = config.provider.missing();
    if !missing.is_empty() {
        anyhow::bail!("provider not configured; set {}", missing.join(", "));
    }
    let client = lib::channels::EvolutionClient::from_config(&config);
    let response = client.send_text(Some(to), text).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}
