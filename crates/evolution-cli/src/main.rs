// Evolution CLI
// status, qrcode, send-text, labels, listen

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use evolution_client::engine::events::InboundEvent;
use evolution_client::engine::resources::extract_qr;
use evolution_client::{EvolutionClient, EvolutionConfig, EvolutionResult, Recipient, SocketExit};
use log::{error, info};
use serde_json::{json, Value};

#[derive(Parser, Debug)]
#[command(name = "evolution", version, about = "Evolution API command-line client")]
struct Cli {
    /// TOML config file; falls back to EVOLUTION_* environment variables
    #[arg(long, env = "EVOLUTION_CONFIG")]
    config: Option<PathBuf>,

    /// Instance to operate on (default: the configured default instance)
    #[arg(long, short)]
    instance: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the instance connection status
    Status,
    /// Fetch the pairing QR code
    Qrcode {
        /// Print only the base64 image instead of the full response
        #[arg(long)]
        raw: bool,
    },
    /// Send a text message
    SendText {
        number: String,
        text: String,
        /// Treat NUMBER as a group id
        #[arg(long)]
        group: bool,
    },
    /// List the instance's labels
    Labels,
    /// Stream events until interrupted
    Listen {
        /// Event names to print
        #[arg(long = "event", default_values_t = vec!["messages.upsert".to_string(), "connection.update".to_string(), "qrcode.updated".to_string()])]
        events: Vec<String>,
    },
}

fn load_config(cli: &Cli) -> EvolutionResult<EvolutionConfig> {
    match &cli.config {
        Some(path) => EvolutionConfig::from_file(path),
        None => EvolutionConfig::from_env(),
    }
}

fn print_json(value: &Value) {
    match serde_json::to_string_pretty(value) {
        Ok(s) => println!("{}", s),
        Err(_) => println!("{}", value),
    }
}

async fn run(cli: Cli) -> EvolutionResult<()> {
    let config = load_config(&cli)?;
    let mut client = EvolutionClient::new(config)?;
    if let Some(instance) = &cli.instance {
        client = client.with_instance(instance.clone());
    }

    match cli.command {
        Command::Status => {
            let status = client.instances().status().await?;
            print_json(&status);
        }
        Command::Qrcode { raw } => {
            let resp = client.qr_code().await?;
            match (raw, extract_qr(&resp)) {
                (true, Some(qr)) => println!("{}", qr),
                _ => print_json(&resp),
            }
        }
        Command::SendText { number, text, group } => {
            let resp = client.send_text(Recipient::from_flag(number, group), &text).await?;
            print_json(&resp);
        }
        Command::Labels => {
            let labels = client.labels().find_labels().await?;
            print_json(&labels);
        }
        Command::Listen { events } => listen(&client, events).await?,
    }
    Ok(())
}

async fn listen(client: &EvolutionClient, events: Vec<String>) -> EvolutionResult<()> {
    let socket = client.websockets().socket_client()?;
    for event in events {
        let name = event.clone();
        socket.on(event, move |data| match InboundEvent::from_parts(&name, &data) {
            InboundEvent::Messages(messages) => {
                for m in messages {
                    println!("[{}] {}: {}", m.remote_jid, m.push_name, m.text);
                }
            }
            InboundEvent::QrCode(_) => println!("{}", json!({"event": name, "qrcode": "updated"})),
            _ => println!("{}", json!({"event": name, "data": data})),
        });
    }

    let stopper = socket.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("[evolution] Interrupted, closing socket");
            stopper.disconnect();
        }
    });

    match socket.connect().await {
        SocketExit::Stopped => Ok(()),
        SocketExit::RetriesExhausted => {
            Err(evolution_client::EvolutionError::socket("gave up after exhausting reconnect attempts"))
        }
        SocketExit::AlreadyRunning => Ok(()),
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Cli::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
