//! Sheen CLI
//!
//! Inspect the preset catalog, run values through the codec, and simulate
//! applies against an in-memory design document.

mod config;

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use sheen_codec::{canonical_for, EffectControls, EffectKind};
use sheen_controller::{MemoryHost, SheenConfig, StyleController};

/// Box-shadow, text-shadow and gradient effects for design-tool style rules
#[derive(Parser)]
#[command(name = "sheen")]
#[command(author, version)]
#[command(propagate_version = true)]
#[command(after_help = "EXAMPLES:
    # List text-shadow presets
    sheen presets --kind text

    # Show the controls a value populates
    sheen parse box \"0 4px 8px rgba(0, 0, 0, 0.25)\"

    # Apply a value to an element carrying two rules
    sheen simulate --rules base,variant --kind box --value \"0 4px 8px rgba(0,0,0,.25)\" --repeat 2
")]
struct Cli {
    /// Path to sheen.toml, or the directory holding it
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List built-in presets
    Presets {
        /// Only presets of this kind (box, text, gradient)
        #[arg(long)]
        kind: Option<EffectKind>,
    },

    /// Parse a CSS value and print the controls it populates as JSON
    Parse { kind: EffectKind, value: String },

    /// Parse a CSS value and print it re-serialized as a declaration
    Format { kind: EffectKind, value: String },

    /// Print the canonical form used to detect unchanged values
    Canon { kind: EffectKind, value: String },

    /// Apply a value to an in-memory element and report what was written
    Simulate {
        /// Names of the style rules on the element, base first
        #[arg(long, value_delimiter = ',')]
        rules: Vec<String>,

        #[arg(long)]
        kind: EffectKind,

        /// CSS value to apply
        #[arg(long, conflicts_with = "preset", required_unless_present = "preset")]
        value: Option<String>,

        /// Preset id to apply instead of a value
        #[arg(long)]
        preset: Option<String>,

        /// Apply the same value this many times
        #[arg(long, default_value_t = 1)]
        repeat: u32,
    },

    /// Manage sheen.toml
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Write a default sheen.toml
    Init {
        /// Directory to write into
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Presets { kind } => cmd_presets(kind),
        Commands::Parse { kind, value } => {
            let controls = EffectControls::parse(kind, &value);
            println!("{}", serde_json::to_string_pretty(&controls)?);
            Ok(())
        }
        Commands::Format { kind, value } => {
            println!("{}", EffectControls::parse(kind, &value).css_declaration());
            Ok(())
        }
        Commands::Canon { kind, value } => {
            println!("{}", canonical_for(kind, &value));
            Ok(())
        }
        Commands::Simulate {
            rules,
            kind,
            value,
            preset,
            repeat,
        } => {
            let config = config::load(cli.config.as_deref())?;
            let value = match (value, preset) {
                (Some(value), _) => value,
                (None, Some(id)) => sheen_presets::find_preset(kind, &id)
                    .map(|preset| preset.value.to_string())
                    .with_context(|| format!("No {kind} preset named `{id}`"))?,
                (None, None) => anyhow::bail!("Either --value or --preset is required"),
            };

            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .context("Failed to start async runtime")?;
            runtime.block_on(cmd_simulate(config, rules, kind, value, repeat))
        }
        Commands::Config { action } => match action {
            ConfigAction::Init { path, force } => {
                let written = config::init(&path, force)?;
                info!(path = %written.display(), "Wrote configuration");
                println!("Created {}", written.display());
                Ok(())
            }
            ConfigAction::Show => {
                let config = config::load(cli.config.as_deref())?;
                print!("{}", config::to_toml(&config)?);
                Ok(())
            }
        },
    }
}

fn init_logging(verbose: bool) {
    let filter = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with_writer(io::stderr)
        .init();
}

fn cmd_presets(kind: Option<EffectKind>) -> Result<()> {
    let kinds = match kind {
        Some(kind) => vec![kind],
        None => EffectKind::ALL.to_vec(),
    };

    for kind in kinds {
        println!("{} ({})", kind.display_name(), kind.property());
        for preset in sheen_presets::presets(kind) {
            println!("  {:<14} {:<15} {}", preset.id, preset.name, preset.value);
        }
    }
    Ok(())
}

async fn cmd_simulate(
    config: SheenConfig,
    rules: Vec<String>,
    kind: EffectKind,
    value: String,
    repeat: u32,
) -> Result<()> {
    let host = Arc::new(MemoryHost::new());
    let names: Vec<&str> = rules.iter().map(String::as_str).collect();
    let element = host.add_selected_element(&names);
    let controller = StyleController::new(Arc::clone(&host), config.controller);

    for attempt in 1..=repeat {
        match controller.apply(kind, &value).await {
            Ok(outcome) => println!("apply #{attempt}: {outcome:?}"),
            Err(err) => println!("apply #{attempt}: failed: {err}"),
        }
    }

    println!();
    for rule in host.rule_names(element) {
        println!("{rule}");
        for (property, value) in host.properties_of(&rule).unwrap_or_default() {
            println!("  {property}: {value};");
        }
    }

    println!();
    println!("property writes: {}", host.property_writes());
    for notification in host.notifications() {
        println!("{:?}: {}", notification.kind, notification.message);
    }
    Ok(())
}
