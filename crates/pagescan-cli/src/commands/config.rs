//! Config command - manage configuration.

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;
use tracing::debug;

use pagescan_core::PagescanConfig;

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    command: ConfigCommand,
}

#[derive(Subcommand)]
enum ConfigCommand {
    /// Show current configuration
    Show,

    /// Initialize a new configuration file
    Init(InitArgs),

    /// Get a specific configuration value
    Get {
        /// Configuration key (e.g., "scan.min_chars")
        key: String,
    },

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// New value
        value: String,
    },

    /// Show configuration file path
    Path,
}

#[derive(Args)]
struct InitArgs {
    /// Output path for configuration file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Overwrite existing file
    #[arg(long)]
    force: bool,
}

pub async fn run(args: ConfigArgs, explicit: Option<&str>) -> anyhow::Result<()> {
    let source = ConfigSource::resolve(explicit);
    match args.command {
        ConfigCommand::Show => show_config(&source),
        ConfigCommand::Init(init_args) => init_config(&source, init_args),
        ConfigCommand::Get { key } => get_config(&source, &key),
        ConfigCommand::Set { key, value } => set_config(&source, &key, &value),
        ConfigCommand::Path => show_path(&source),
    }
}

fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("pagescan")
        .join("config.json")
}

/// Where the effective configuration comes from.
#[derive(Debug, PartialEq)]
enum ConfigSource {
    /// Given with `--config`; must exist when read.
    Explicit(PathBuf),
    /// The per-user file, which exists.
    UserFile(PathBuf),
    /// No file; built-in defaults. Writes go to the per-user path.
    Defaults(PathBuf),
}

impl ConfigSource {
    fn resolve(explicit: Option<&str>) -> Self {
        match explicit {
            Some(path) => Self::Explicit(PathBuf::from(path)),
            None => {
                let path = default_config_path();
                if path.exists() {
                    Self::UserFile(path)
                } else {
                    Self::Defaults(path)
                }
            }
        }
    }

    /// The file that `init` and `set` write to.
    fn target(&self) -> &Path {
        match self {
            Self::Explicit(path) | Self::UserFile(path) | Self::Defaults(path) => path,
        }
    }

    fn load(&self) -> anyhow::Result<PagescanConfig> {
        match self {
            Self::Explicit(path) | Self::UserFile(path) => {
                debug!("Loading config from {}", path.display());
                PagescanConfig::from_file(path)
                    .map_err(|e| anyhow::anyhow!("Cannot read config {}: {}", path.display(), e))
            }
            Self::Defaults(_) => Ok(PagescanConfig::default()),
        }
    }

    fn describe(&self) -> String {
        match self {
            Self::Explicit(path) => format!("{} (from --config)", path.display()),
            Self::UserFile(path) => path.display().to_string(),
            Self::Defaults(_) => "built-in defaults".to_string(),
        }
    }
}

/// Load the explicit config file, else the per-user one if present, else defaults.
pub fn load_config(explicit: Option<&str>) -> anyhow::Result<PagescanConfig> {
    ConfigSource::resolve(explicit).load()
}

/// Plain-language reading of the settings that drive a scan.
fn describe_settings(config: &PagescanConfig) -> Vec<String> {
    let backend = serde_json::to_value(config.pdf.backend)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
        .unwrap_or_else(|| format!("{:?}", config.pdf.backend));

    let progress = match config.scan.progress_interval_ms {
        0 => "Progress is reported after every page".to_string(),
        ms => format!("Progress is reported at most every {} ms", ms),
    };

    vec![
        format!(
            "A page has text when it holds at least {} characters after trimming",
            config.scan.min_chars
        ),
        format!("Text samples keep up to {} characters", config.scan.sample_chars),
        progress,
        format!(
            "Text is extracted with {}{}",
            backend,
            if config.pdf.password.is_empty() { "" } else { ", using the configured password" }
        ),
    ]
}

fn show_config(source: &ConfigSource) -> anyhow::Result<()> {
    let config = source.load()?;

    println!("{} {}", style("Configuration:").bold(), source.describe());
    for line in describe_settings(&config) {
        println!("  {}", line);
    }
    println!();
    println!("{}", serde_json::to_string_pretty(&config)?);

    Ok(())
}

fn init_config(source: &ConfigSource, args: InitArgs) -> anyhow::Result<()> {
    let output_path = args.output.unwrap_or_else(|| source.target().to_path_buf());

    if output_path.exists() && !args.force {
        anyhow::bail!(
            "{} already exists; pass --force to replace it",
            output_path.display()
        );
    }

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }

    PagescanConfig::default().save(&output_path)?;

    println!(
        "{} Wrote default scan settings to {}",
        style("✓").green(),
        output_path.display()
    );

    Ok(())
}

fn get_config(source: &ConfigSource, key: &str) -> anyhow::Result<()> {
    let json = serde_json::to_value(source.load()?)?;

    let value = lookup(&json, key)
        .ok_or_else(|| anyhow::anyhow!("Configuration key not found: {}", key))?;

    println!("{}", serde_json::to_string_pretty(value)?);

    Ok(())
}

fn set_config(source: &ConfigSource, key: &str, value: &str) -> anyhow::Result<()> {
    let config = source.load()?;
    let target = source.target();

    let parsed_value = parse_value(value);
    let json = assign(serde_json::to_value(&config)?, key, parsed_value.clone())?;

    // Round-trip through the typed config so bad values are rejected
    let config: PagescanConfig = serde_json::from_value(json)
        .map_err(|e| anyhow::anyhow!("Invalid value for {}: {}", key, e))?;

    if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
    }
    config.save(target)?;

    println!(
        "{} {} = {} in {}",
        style("✓").green(),
        key,
        serde_json::to_string(&parsed_value)?,
        target.display()
    );

    Ok(())
}

fn show_path(source: &ConfigSource) -> anyhow::Result<()> {
    let target = source.target();
    println!("{}", target.display());

    match source {
        ConfigSource::Explicit(_) if !target.exists() => {
            println!("{}", style("missing; scans with --config will fail").red());
        }
        ConfigSource::Explicit(_) => println!("{}", style("selected with --config").green()),
        ConfigSource::UserFile(_) => println!("{}", style("in use").green()),
        ConfigSource::Defaults(_) => {
            println!(
                "{}",
                style("not created; scans use built-in defaults").yellow()
            );
            println!("Run 'pagescan config init' to write it.");
        }
    }

    Ok(())
}

/// Parse a CLI value as JSON, falling back to a plain string.
fn parse_value(value: &str) -> serde_json::Value {
    serde_json::from_str(value).unwrap_or_else(|_| serde_json::Value::String(value.to_string()))
}

fn lookup<'a>(json: &'a serde_json::Value, key: &str) -> Option<&'a serde_json::Value> {
    key.split('.').try_fold(json, |current, part| current.get(part))
}

/// Set a dotted key path; every key but the last must already exist.
fn assign(
    mut json: serde_json::Value,
    key: &str,
    value: serde_json::Value,
) -> anyhow::Result<serde_json::Value> {
    let parts: Vec<&str> = key.split('.').collect();
    let (last, parents) = parts
        .split_last()
        .ok_or_else(|| anyhow::anyhow!("Empty configuration key"))?;

    let mut current = &mut json;
    for part in parents {
        current = current
            .get_mut(*part)
            .ok_or_else(|| anyhow::anyhow!("Configuration path not found: {}", key))?;
    }

    match current.as_object_mut() {
        Some(obj) if obj.contains_key(*last) => {
            obj.insert((*last).to_string(), value);
        }
        Some(_) => anyhow::bail!("Configuration key not found: {}", key),
        None => anyhow::bail!("Cannot set value at non-object path"),
    }

    Ok(json)
}
