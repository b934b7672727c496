//! leadchat CLI: chat with the scheduling assistant from the terminal

use clap::{Parser, Subcommand};
use leadchat_engine::{
    ChatMessage, Config, Conversation, ConversationService, HttpConversationService, Slot,
};
use std::error::Error;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing_subscriber::EnvFilter;

/// Terminal client for the lead qualification and scheduling assistant
#[derive(Parser)]
#[command(name = "leadchat")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Config file (default: .leadchat/config.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Backend base URL, overriding config and LEADCHAT_API_URL
    #[arg(long, global = true)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the chat TUI (default when no command specified)
    Tui,

    /// Send one message and print the assistant's reply
    Send {
        /// Message text
        text: String,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check that the backend is reachable
    Doctor,

    /// Write a default config file
    Init,
}

/// Environment variable holding the log filter.
const LOG_ENV: &str = "LEADCHAT_LOG";

type CmdResult = Result<(), Box<dyn Error>>;

fn main() {
    let cli = Cli::parse();
    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);

    let result = match cli.command {
        None | Some(Commands::Tui) => load_config(&config_path, cli.api_url).and_then(cmd_tui),
        Some(Commands::Send { text, json }) => load_config(&config_path, cli.api_url)
            .and_then(|config| cmd_send(&config, &text, json)),
        Some(Commands::Doctor) => {
            load_config(&config_path, cli.api_url).and_then(|config| cmd_doctor(&config))
        }
        Some(Commands::Init) => cmd_init(&config_path),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

/// Load config from `path` (defaults when absent), then apply env and flag overrides.
fn load_config(path: &Path, api_url: Option<String>) -> Result<Config, Box<dyn Error>> {
    let config = Config::load_or_default(path)?
        .with_env_overrides()
        .with_api_url_override(api_url);
    Ok(config)
}

fn log_filter() -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Log to a file so the alternate screen is left alone.
fn init_file_logging(path: &Path) -> CmdResult {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let file = OpenOptions::new().create(true).append(true).open(path)?;
    tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| e.to_string())?;
    Ok(())
}

fn init_stderr_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter())
        .with_writer(std::io::stderr)
        .try_init();
}

fn runtime() -> Result<tokio::runtime::Runtime, Box<dyn Error>> {
    Ok(tokio::runtime::Runtime::new()?)
}

fn cmd_tui(config: Config) -> CmdResult {
    init_file_logging(&config.log_file)?;
    tracing::info!("leadchat v{}", env!("CARGO_PKG_VERSION"));

    let service: Arc<dyn ConversationService> =
        Arc::new(HttpConversationService::from_config(&config)?);
    runtime()?.block_on(leadchat_tui::run_tui(service, &config.api_url))
}

fn cmd_send(config: &Config, text: &str, json: bool) -> CmdResult {
    init_stderr_logging();

    if text.trim().is_empty() {
        return Err("message text is empty".into());
    }

    let service = HttpConversationService::from_config(config)?;
    let mut conversation = Conversation::new();
    runtime()?.block_on(conversation.send_message(&service, text));

    // Everything after the user's own message is the reply
    let replies = conversation.messages().get(1..).unwrap_or_default();
    let slots = conversation.slots();

    if json {
        let output = serde_json::json!({
            "messages": replies,
            "slots": slots,
        });
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", render_turn(replies, slots));
    }
    Ok(())
}

/// Plain-text rendering of one turn's replies and any offered slots.
fn render_turn(replies: &[ChatMessage], slots: &[Slot]) -> String {
    let mut out = String::new();
    for message in replies {
        out.push_str(&format!("{}: {}\n", message.role.label(), message.content));
    }
    for (i, slot) in slots.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, slot.display_local()));
    }
    out
}

fn cmd_doctor(config: &Config) -> CmdResult {
    init_stderr_logging();

    println!("leadchat Doctor\n");
    println!(
        "Engine {} / TUI {}",
        leadchat_engine::engine_version(),
        leadchat_tui::tui_version()
    );
    println!("Backend: {}", config.api_url);
    println!("Timeout: {}s", config.request_timeout_seconds);
    println!("Log file: {}", config.log_file.display());
    println!();

    let service = HttpConversationService::from_config(config)?;
    match runtime()?.block_on(service.health()) {
        Ok(message) => {
            println!("  \u{2713} Backend reachable: {message}");
            Ok(())
        }
        Err(e) => {
            println!("  \u{2717} Backend unreachable");
            Err(e.into())
        }
    }
}

fn cmd_init(config_path: &Path) -> CmdResult {
    if config_path.exists() {
        println!("Config already exists at {}", config_path.display());
        return Ok(());
    }

    Config::default().save(config_path)?;
    println!("Created {}", config_path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_tui() {
        let cli = Cli::try_parse_from(["leadchat"]).unwrap();
        assert!(cli.command.is_none());
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_send_with_global_flags() {
        let cli = Cli::try_parse_from([
            "leadchat",
            "send",
            "hello there",
            "--json",
            "--api-url",
            "http://backend:9000",
        ])
        .unwrap();
        assert_eq!(cli.api_url.as_deref(), Some("http://backend:9000"));
        match cli.command {
            Some(Commands::Send { text, json }) => {
                assert_eq!(text, "hello there");
                assert!(json);
            }
            _ => panic!("expected send"),
        }
    }

    #[test]
    fn test_send_requires_text() {
        assert!(Cli::try_parse_from(["leadchat", "send"]).is_err());
    }

    #[test]
    fn test_flag_overrides_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        let saved = Config {
            api_url: "http://from-file:1".into(),
            ..Config::default()
        };
        saved.save(&path).unwrap();

        let config = load_config(&path, Some("http://from-flag:2".into())).unwrap();
        assert_eq!(config.api_url, "http://from-flag:2");
        assert_eq!(config.request_timeout_seconds, saved.request_timeout_seconds);
    }

    #[test]
    fn test_init_keeps_existing_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".leadchat").join("config.json");

        cmd_init(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap(), Config::default());

        std::fs::write(&path, r#"{"api_url":"http://custom"}"#).unwrap();
        cmd_init(&path).unwrap();
        assert_eq!(Config::load(&path).unwrap().api_url, "http://custom");
    }

    #[test]
    fn test_render_turn() {
        let slot = Slot::new("2024-01-01T10:00:00Z");
        let text = render_turn(
            &[ChatMessage::assistant("Pick a time")],
            std::slice::from_ref(&slot),
        );
        assert_eq!(text, format!("Agent: Pick a time\n  1. {}\n", slot.display_local()));
    }
}
