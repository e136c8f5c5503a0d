use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use qrpad::config::{Config, ConfigError, LogFormat, LoggingConfig};
use qrpad::history::{AppendOutcome, HistoryEntry, HistoryStore};
use qrpad::kv::{FjallKv, KvError};
use qrpad::platform::{PlatformError, SystemClipboard};
use qrpad::scan::{ScanAction, ScanError, ScanResult, ScannedText};
use qrpad::{Composer, CommitError, LogicalRecord, RecordKind, codec};

/// CLI-specific errors.
#[derive(Error, Debug)]
pub enum AppError {
    /// Library error (wraps all qrpad errors)
    #[error(transparent)]
    Library(#[from] qrpad::Error),

    /// History entry not found
    #[error("No history entry with id {0}")]
    EntryNotFound(i64),

    /// Logging setup failed
    #[error("Invalid log filter: {0}")]
    LogFilter(String),

    /// JSON output failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<KvError> for AppError {
    fn from(e: KvError) -> Self {
        Self::Library(e.into())
    }
}

impl From<ConfigError> for AppError {
    fn from(e: ConfigError) -> Self {
        Self::Library(e.into())
    }
}

impl From<CommitError> for AppError {
    fn from(e: CommitError) -> Self {
        Self::Library(e.into())
    }
}

impl From<ScanError> for AppError {
    fn from(e: ScanError) -> Self {
        Self::Library(e.into())
    }
}

impl From<PlatformError> for AppError {
    fn from(e: PlatformError) -> Self {
        Self::Library(e.into())
    }
}

#[derive(Parser)]
#[command(name = "qrpad")]
#[command(about = "Encode QR payloads and keep a history of what you generated")]
struct Cli {
    /// Path to a TOML configuration file
    #[arg(long, global = true, env = "QRPAD_CONFIG")]
    config: Option<PathBuf>,

    /// Store path (overrides the config file)
    #[arg(long, global = true, env = "QRPAD_PATH")]
    path: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the payload for a record
    Encode {
        #[command(subcommand)]
        record: RecordArgs,
    },

    /// Decode a payload back into record fields
    Decode {
        /// Kind the payload was encoded as (url, text, wifi, contact)
        #[arg(short, long)]
        kind: RecordKind,

        /// Payload text
        payload: String,
    },

    /// Encode a record and add it to the history
    Commit {
        /// Also copy the payload to the system clipboard
        #[arg(long)]
        copy: bool,

        #[command(subcommand)]
        record: RecordArgs,
    },

    /// List history entries, most recent first
    History {
        /// Output as JSON
        #[arg(long)]
        json: bool,

        /// Maximum number of entries to show
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Show the record behind a history entry
    Recall {
        /// Entry id
        id: i64,
    },

    /// Delete the whole history
    Clear,

    /// Show what can be done with scanned text
    Scan {
        /// Decoded text from the scanner
        data: String,

        /// Barcode format reported by the scanner
        #[arg(long, default_value = "qr")]
        format: String,
    },
}

#[derive(Subcommand, Clone)]
enum RecordArgs {
    /// A link
    Url { text: String },

    /// Free text
    Text { text: String },

    /// Wi-Fi credentials
    Wifi(WifiArgs),

    /// Contact card
    Contact(ContactArgs),
}

#[derive(Args, Clone)]
struct WifiArgs {
    #[arg(long)]
    ssid: String,

    #[arg(long, default_value = "")]
    password: String,
}

#[derive(Args, Clone)]
struct ContactArgs {
    #[arg(long, default_value = "")]
    name: String,

    #[arg(long, default_value = "")]
    phone: String,

    #[arg(long, default_value = "")]
    email: String,
}

impl From<RecordArgs> for LogicalRecord {
    fn from(args: RecordArgs) -> Self {
        match args {
            RecordArgs::Url { text } => LogicalRecord::url(text),
            RecordArgs::Text { text } => LogicalRecord::text(text),
            RecordArgs::Wifi(w) => LogicalRecord::wifi(w.ssid, w.password),
            RecordArgs::Contact(c) => LogicalRecord::contact(c.name, c.phone, c.email),
        }
    }
}

/// Format an error for user-friendly display
fn format_error(err: &AppError) -> String {
    use std::io::IsTerminal;

    let use_colors = std::io::stderr().is_terminal();

    let (red, yellow, reset) = if use_colors {
        ("\x1b[0;31m", "\x1b[0;33m", "\x1b[0m")
    } else {
        ("", "", "")
    };

    let mut output = format!("{}Error:{} {}\n", red, reset, err);

    if let Some(hint) = get_error_hint(err) {
        output.push_str(&format!("{}Hint:{} {}\n", yellow, reset, hint));
    }

    output
}

/// Get a helpful hint for common errors
fn get_error_hint(err: &AppError) -> Option<&'static str> {
    match err {
        AppError::Library(qrpad::Error::Commit(CommitError::ValidationEmpty)) => {
            Some("Fill in the text, the SSID, or at least one contact field")
        }
        AppError::Library(qrpad::Error::Kv(KvError::InvalidFormat(_))) => {
            Some("The store was written by an incompatible version; use a different --path")
        }
        AppError::Library(qrpad::Error::Scan(ScanError::UnsupportedFormat(_))) => {
            Some("Only QR symbols are accepted; pass --format qr")
        }
        AppError::Library(qrpad::Error::Platform(PlatformError::Clipboard(_))) => {
            Some("No clipboard is available in this session; run without --copy")
        }
        AppError::EntryNotFound(_) => Some("Use 'qrpad history' to see available ids"),
        AppError::LogFilter(_) => Some("Use a RUST_LOG style directive such as 'info' or 'qrpad=debug'"),
        _ => None,
    }
}

fn init_tracing(config: &LoggingConfig) -> Result<(), AppError> {
    let filter = match std::env::var("RUST_LOG") {
        Ok(directive) => EnvFilter::try_new(directive),
        Err(_) => EnvFilter::try_new(&config.level),
    }
    .map_err(|e| AppError::LogFilter(e.to_string()))?;

    let registry = tracing_subscriber::registry().with(filter);
    match config.format {
        LogFormat::Text => registry
            .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        eprint!("{}", format_error(&err));
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    let config = match &cli.config {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    init_tracing(&config.logging)?;

    let store_path = cli.path.clone().unwrap_or_else(|| config.store.path.clone());

    match cli.command {
        Commands::Encode { record } => {
            let record = LogicalRecord::from(record);
            println!("{}", codec::encode(&record));
            Ok(())
        }
        Commands::Decode { kind, payload } => {
            print_record(&codec::decode(&payload, kind));
            Ok(())
        }
        Commands::Commit { copy, record } => {
            let history = open_history(&store_path)?;
            let record = LogicalRecord::from(record);

            let (mut composer, _payload_rx) =
                Composer::new(record.kind(), config.editor.debounce());
            composer.edit(|r| *r = record);
            composer.flush();

            let outcome = if copy {
                composer.copy(&SystemClipboard, &history).await?
            } else if composer.can_commit() {
                history.append(composer.kind(), &composer.payload()).await
            } else {
                return Err(CommitError::ValidationEmpty.into());
            };

            match outcome {
                AppendOutcome::Inserted(entry) => println!("Added entry {}", entry.id),
                AppendOutcome::SkippedDuplicate => println!("Same as the most recent entry, not added"),
                AppendOutcome::SkippedEmpty => println!("Empty record, not added"),
                AppendOutcome::PersistFailed => println!("History could not be saved"),
            }
            if copy {
                println!("Copied payload to clipboard");
            }
            Ok(())
        }
        Commands::History { json, limit } => {
            let history = open_history(&store_path)?;
            let mut entries = history.load().await;
            if let Some(limit) = limit {
                entries.truncate(limit);
            }
            if json {
                println!("{}", serde_json::to_string_pretty(&entries)?);
            } else if entries.is_empty() {
                println!("No history");
            } else {
                for entry in &entries {
                    println!("{}", summarize(entry));
                }
            }
            Ok(())
        }
        Commands::Recall { id } => {
            let history = open_history(&store_path)?;
            let entry = history.find(id).await.ok_or(AppError::EntryNotFound(id))?;
            print_record(&history.select_for_recall(&entry));
            Ok(())
        }
        Commands::Clear => {
            let history = open_history(&store_path)?;
            history.clear().await;
            println!("History cleared");
            Ok(())
        }
        Commands::Scan { data, format } => {
            let scanned = ScannedText::from_scan(ScanResult { data, format })?;
            println!("{}", scanned.text());
            let actions: Vec<&str> = scanned
                .actions()
                .into_iter()
                .map(|action| match action {
                    ScanAction::OpenLink => "open",
                    ScanAction::Copy => "copy",
                    ScanAction::Dismiss => "dismiss",
                })
                .collect();
            println!("Actions: {}", actions.join(", "));
            Ok(())
        }
    }
}

fn open_history(path: &Path) -> Result<HistoryStore, AppError> {
    let kv = FjallKv::open_or_init(path)?;
    Ok(HistoryStore::new(Arc::new(kv)))
}

fn summarize(entry: &HistoryEntry) -> String {
    let first_line = entry.payload.lines().next().unwrap_or_default();
    let preview: String = match entry.kind {
        RecordKind::Wifi | RecordKind::Contact => {
            match codec::decode(&entry.payload, entry.kind) {
                LogicalRecord::WifiCredential { ssid, .. } => ssid,
                LogicalRecord::ContactCard { name, email, .. } if name.is_empty() => email,
                LogicalRecord::ContactCard { name, .. } => name,
                _ => first_line.to_string(),
            }
        }
        RecordKind::Url | RecordKind::Text => first_line.chars().take(60).collect(),
    };
    format!("{}  {:<7}  {}  {}", entry.id, entry.kind, entry.created_at, preview)
}

fn print_record(record: &LogicalRecord) {
    match record {
        LogicalRecord::Url { text } => println!("url: {}", text),
        LogicalRecord::PlainText { text } => println!("text: {}", text),
        LogicalRecord::WifiCredential { ssid, password } => {
            println!("ssid: {}", ssid);
            println!("password: {}", password);
        }
        LogicalRecord::ContactCard { name, phone, email } => {
            println!("name: {}", name);
            println!("phone: {}", phone);
            println!("email: {}", email);
        }
    }
}
