//! Command-line interface parsing and handling
//!
//! This module parses command-line arguments, resolves the chat session and
//! hands control to the interactive read loop.

pub mod chat;

use std::error::Error;
use std::path::PathBuf;

use clap::Parser;

use crate::cli::chat::run_chat;
use crate::core::config::Config;
use crate::core::session::{resolve_session, SessionOverrides};
use crate::core::turn::TurnController;
use crate::ui::console::Console;
use crate::ui::thinking::IndicatorConfig;
use crate::utils::logging::TranscriptLog;

#[derive(Parser, Debug)]
#[command(name = "arkchat", version)]
#[command(about = "Multi-turn streaming chat with a Volcengine Ark endpoint")]
#[command(
    long_about = "arkchat holds a multi-turn conversation with a Volcengine Ark chat \
completions endpoint, streaming each reply to the terminal as it arrives.\n\n\
Example:\n\
  arkchat --apikey sk-xxxxxx --endpoint ep-xxxxxx --timeout 180\n\n\
Commands at the prompt:\n\
  q, quit           Leave the conversation\n\
  clear             Forget the conversation context\n\n\
Optional settings (region, timeout_secs, max_tokens, temperature, base_url,\n\
assistant_label) can be stored in config.toml in the platform config directory."
)]
pub struct Args {
    /// Ark API key (required)
    #[arg(long = "apikey", visible_alias = "api-key", env = "ARK_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Ark endpoint id, sent as the model (required)
    #[arg(long, env = "ARK_ENDPOINT_ID")]
    pub endpoint: Option<String>,

    /// Ark region [default: cn-beijing]
    #[arg(long)]
    pub region: Option<String>,

    /// Request timeout in seconds; 120-180 is a good range [default: 120]
    #[arg(long, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Maximum tokens per reply [default: 2000]
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Sampling temperature [default: 0.7]
    #[arg(long)]
    pub temperature: Option<f32>,

    /// Base URL template; `{region}` is replaced with the region
    #[arg(long, value_name = "URL")]
    pub base_url: Option<String>,

    /// Append each completed exchange to this file
    #[arg(short = 'l', long, value_name = "FILE")]
    pub log: Option<PathBuf>,

    /// Read settings from this file instead of the default config.toml
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

impl Args {
    pub fn session_overrides(&self) -> SessionOverrides {
        SessionOverrides {
            api_key: self.api_key.clone(),
            endpoint: self.endpoint.clone(),
            region: self.region.clone(),
            timeout_secs: self.timeout,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            base_url: self.base_url.clone(),
        }
    }
}

pub fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    crate::logging::init_tracing();

    tokio::runtime::Runtime::new()?.block_on(async_main(args))
}

async fn async_main(args: Args) -> Result<(), Box<dyn Error>> {
    let loaded = match &args.config {
        Some(path) => Config::load_from_path(path),
        None => Config::load(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(err) => {
            eprintln!("❌ {err}");
            std::process::exit(1);
        }
    };

    let session = match resolve_session(&args.session_overrides(), &config) {
        Ok(session) => session,
        Err(err) => {
            eprintln!("{err}");
            let fixes = err.quick_fixes();
            if !fixes.is_empty() {
                eprintln!();
                eprintln!("💡 Usage:");
                for fix in fixes {
                    eprintln!("  • {fix}");
                }
            }
            std::process::exit(err.exit_code());
        }
    };

    let log = match &args.log {
        Some(path) => match TranscriptLog::open(path) {
            Ok(log) => log,
            Err(err) => {
                eprintln!("❌ Cannot write log file {}: {err}", path.display());
                std::process::exit(1);
            }
        },
        None => TranscriptLog::disabled(),
    };

    let indicator = IndicatorConfig {
        label: config.assistant_label().to_string(),
        ..IndicatorConfig::default()
    };
    let console = Console::stdout();
    let controller = TurnController::new(session, console.clone(), indicator, log);
    let stdin = tokio::io::BufReader::new(tokio::io::stdin());

    run_chat(controller, &console, stdin).await?;
    Ok(())
}
