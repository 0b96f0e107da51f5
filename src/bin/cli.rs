// CLI binary — panicking on unrecoverable errors is standard for CLI tools.
#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::process;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use serde_json::Value;

use hue_conductor::registry::{catalog, execute};
use hue_conductor::settings;
use hue_conductor::state::AppState;

// ── CLI argument parsing ─────────────────────────────────────────

#[derive(Parser)]
#[command(name = "hue-conductor-cli", about = "Drive the lighting engine from the shell", version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Bridge IP override
    #[arg(long, global = true)]
    bridge_ip: Option<String>,

    /// Application key override
    #[arg(long, global = true)]
    key: Option<String>,

    /// Output raw JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// List every tool with its description
    Tools,
    /// Call one tool by name with JSON arguments
    Call {
        /// Tool name, e.g. `light_on`, `batch_commands`
        name: String,
        /// JSON object with the tool's arguments
        #[arg(long, default_value = "{}")]
        args: String,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Tools => {
            for entry in catalog::command_registry() {
                println!("{:<28} {}", entry.name, entry.description);
            }
        }
        Commands::Call { name, args } => {
            let args: Value = match serde_json::from_str(&args) {
                Ok(value) => value,
                Err(e) => {
                    eprintln!("invalid --args JSON: {e}");
                    process::exit(2);
                }
            };
            let cmd = match catalog::deserialize_from_tool_call(&name, &args) {
                Ok(cmd) => cmd,
                Err(e) => {
                    eprintln!("{e}");
                    process::exit(2);
                }
            };

            let loaded = settings::load_settings(&settings::default_config_dir())
                .unwrap_or_default()
                .with_env_overrides()
                .with_overrides(cli.bridge_ip, cli.key);
            let state = match AppState::new(loaded) {
                Ok(state) => Arc::new(state),
                Err(e) => {
                    eprintln!("{e}");
                    process::exit(2);
                }
            };

            match execute::execute(&state, cmd).await {
                Ok(output) => {
                    if cli.json {
                        println!(
                            "{}",
                            serde_json::to_string_pretty(&output)
                                .expect("command output serializes")
                        );
                    } else {
                        println!("{}", output.message);
                    }
                    // Fire-and-forget work (async batches, sequences) runs on
                    // background tasks; give the first steps a moment before
                    // the process exits.
                    tokio::time::sleep(std::time::Duration::from_millis(200)).await;
                }
                Err(e) => {
                    eprintln!("{e}");
                    process::exit(1);
                }
            }
        }
    }
}
