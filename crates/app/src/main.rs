use std::fmt;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use intake_api::{ApiConfig, ApiState};
use intake_core::model::{ExportFormat, IntakeSettingsDraft};
use services::{AppServices, AutoSaver, Clock, ExportService, IntakeService, load_schema};
use tracing::info;
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

const DEFAULT_DB_URL: &str = "sqlite://mindclone.sqlite3";
const DEFAULT_BIND: &str = "127.0.0.1:3000";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    InvalidDbUrl { raw: String },
    InvalidAutosaveSecs { raw: String },
    InvalidExportFormat { raw: String },
    InvalidBind { raw: String },
    MissingImportPath,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::InvalidDbUrl { raw } => write!(f, "invalid --db value: {raw}"),
            ArgsError::InvalidAutosaveSecs { raw } => {
                write!(f, "invalid --autosave-secs value: {raw}")
            }
            ArgsError::InvalidExportFormat { raw } => {
                write!(f, "invalid --export-format value: {raw} (raw | with-questions)")
            }
            ArgsError::InvalidBind { raw } => write!(f, "invalid --bind value: {raw}"),
            ArgsError::MissingImportPath => write!(f, "import requires a file path"),
        }
    }
}

impl std::error::Error for ArgsError {}

fn require_value(
    args: &mut impl Iterator<Item = String>,
    flag: &'static str,
) -> Result<String, ArgsError> {
    args.next().ok_or(ArgsError::MissingValue { flag })
}

struct DesktopApp {
    services: AppServices,
}

impl UiApp for DesktopApp {
    fn intake(&self) -> Arc<IntakeService> {
        self.services.intake()
    }

    fn autosaver(&self) -> AutoSaver {
        self.services.autosaver()
    }

    fn exporter(&self) -> Arc<ExportService> {
        self.services.exporter()
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  cargo run -p app -- ui     [--db <sqlite_url>] [--schema <file>] [--sync-url <url>]");
    eprintln!("                             [--export-dir <dir>] [--autosave-secs <n>] [--export-format <fmt>]");
    eprintln!("  cargo run -p app -- serve  [--bind <addr>]");
    eprintln!("  cargo run -p app -- import <file> [--db <sqlite_url>] [--schema <file>]");
    eprintln!();
    eprintln!("Defaults:");
    eprintln!("  --db {DEFAULT_DB_URL}");
    eprintln!("  --export-dir ./exports");
    eprintln!("  --autosave-secs 10");
    eprintln!("  --export-format with-questions");
    eprintln!("  --bind {DEFAULT_BIND}");
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  MINDCLONE_DB_URL, MINDCLONE_SCHEMA, MINDCLONE_SYNC_URL, MINDCLONE_EXPORT_DIR,");
    eprintln!("  MINDCLONE_AUTOSAVE_SECS, MINDCLONE_EXPORT_FORMAT, MINDCLONE_BIND, RUST_LOG");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Serve,
    Import,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "serve" => Some(Self::Serve),
            "import" => Some(Self::Import),
            _ => None,
        }
    }
}

struct Args {
    db_url: String,
    schema_path: Option<PathBuf>,
    settings: IntakeSettingsDraft,
    bind: SocketAddr,
    import_path: Option<PathBuf>,
}

fn env_var(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
}

fn parse_autosave_secs(raw: String) -> Result<u32, ArgsError> {
    raw.trim()
        .parse()
        .map_err(|_| ArgsError::InvalidAutosaveSecs { raw })
}

fn parse_export_format(raw: String) -> Result<ExportFormat, ArgsError> {
    raw.parse()
        .map_err(|_| ArgsError::InvalidExportFormat { raw })
}

fn parse_bind(raw: String) -> Result<SocketAddr, ArgsError> {
    raw.trim().parse().map_err(|_| ArgsError::InvalidBind { raw })
}

impl Args {
    fn from_env() -> Result<Self, ArgsError> {
        let mut settings = IntakeSettingsDraft::new();
        settings.sync_base_url = env_var("MINDCLONE_SYNC_URL");
        settings.export_dir = env_var("MINDCLONE_EXPORT_DIR").map(PathBuf::from);
        settings.autosave_delay_secs = env_var("MINDCLONE_AUTOSAVE_SECS")
            .map(parse_autosave_secs)
            .transpose()?;
        settings.export_format = env_var("MINDCLONE_EXPORT_FORMAT")
            .map(parse_export_format)
            .transpose()?;

        Ok(Self {
            db_url: env_var("MINDCLONE_DB_URL")
                .map_or_else(|| DEFAULT_DB_URL.into(), normalize_sqlite_url),
            schema_path: env_var("MINDCLONE_SCHEMA").map(PathBuf::from),
            settings,
            bind: parse_bind(env_var("MINDCLONE_BIND").unwrap_or_else(|| DEFAULT_BIND.into()))?,
            import_path: None,
        })
    }

    fn parse(cmd: Command, args: &mut impl Iterator<Item = String>) -> Result<Self, ArgsError> {
        let mut parsed = Self::from_env()?;

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--db" => {
                    let value = require_value(args, "--db")?;
                    if value.trim().is_empty() {
                        return Err(ArgsError::InvalidDbUrl { raw: value });
                    }
                    parsed.db_url = normalize_sqlite_url(value);
                }
                "--schema" => {
                    parsed.schema_path = Some(require_value(args, "--schema")?.into());
                }
                "--sync-url" => {
                    parsed.settings.sync_base_url = Some(require_value(args, "--sync-url")?);
                }
                "--export-dir" => {
                    parsed.settings.export_dir = Some(require_value(args, "--export-dir")?.into());
                }
                "--autosave-secs" => {
                    let value = require_value(args, "--autosave-secs")?;
                    parsed.settings.autosave_delay_secs = Some(parse_autosave_secs(value)?);
                }
                "--export-format" => {
                    let value = require_value(args, "--export-format")?;
                    parsed.settings.export_format = Some(parse_export_format(value)?);
                }
                "--bind" => {
                    parsed.bind = parse_bind(require_value(args, "--bind")?)?;
                }
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ if cmd == Command::Import
                    && parsed.import_path.is_none()
                    && !arg.starts_with("--") =>
                {
                    parsed.import_path = Some(PathBuf::from(arg));
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }

        if cmd == Command::Import && parsed.import_path.is_none() {
            return Err(ArgsError::MissingImportPath);
        }
        Ok(parsed)
    }
}

fn normalize_sqlite_url(raw: String) -> String {
    if raw == "sqlite::memory:" || raw.starts_with("sqlite://") {
        return raw;
    }

    let trimmed = raw.trim().to_string();
    let path_str = trimmed
        .strip_prefix("sqlite:")
        .unwrap_or(trimmed.as_str())
        .to_string();
    let path = std::path::Path::new(&path_str);
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(path)
    };
    format!("sqlite://{}", absolute.display())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn build_services(parsed: &Args) -> Result<AppServices, Box<dyn std::error::Error>> {
    // Open + migrate SQLite at startup. Keep this in the binary glue so core/services stay pure.
    prepare_sqlite_file(&parsed.db_url)?;
    let schema = load_schema(parsed.schema_path.as_deref())?;
    let settings = parsed.settings.clone().validate()?;
    info!(
        db = %parsed.db_url,
        sections = schema.section_count(),
        questions = schema.question_count(),
        "opening intake store"
    );
    Ok(AppServices::new_sqlite(&parsed.db_url, Clock::system(), schema, &settings).await?)
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut argv: Vec<String> = std::env::args().skip(1).collect();

    // Default behavior: launching UI when no subcommand is provided.
    let cmd = match argv.first().map(String::as_str) {
        None => Command::Ui,
        Some("--help" | "-h") => {
            print_usage();
            return Ok(());
        }
        Some(first) if first.starts_with("--") => Command::Ui,
        Some(first) => Command::from_arg(first).ok_or_else(|| {
            eprintln!("unknown subcommand: {first}");
            print_usage();
            std::io::Error::new(std::io::ErrorKind::InvalidInput, "unknown subcommand")
        })?,
    };

    if !argv.is_empty() && !argv[0].starts_with("--") {
        argv.remove(0);
    }

    let mut iter = argv.into_iter();
    let parsed = Args::parse(cmd, &mut iter).map_err(|e| {
        eprintln!("{e}");
        print_usage();
        e
    })?;

    init_tracing();

    match cmd {
        Command::Ui => {
            let services = build_services(&parsed).await?;
            let app: Arc<dyn UiApp> = Arc::new(DesktopApp { services });
            let context = build_app_context(&app);
            let title = context.schema().meta().title.clone();

            // On macOS, Dioxus/tao can default to an always-on-top window in some dev setups.
            let desktop_cfg = DesktopConfig::new().with_window(
                WindowBuilder::new()
                    .with_title(title)
                    .with_always_on_top(false),
            );

            LaunchBuilder::desktop()
                .with_cfg(desktop_cfg)
                .with_context(context)
                .launch(App);
            Ok(())
        }
        Command::Serve => {
            info!("starting stub api v{}", env!("CARGO_PKG_VERSION"));
            intake_api::serve(parsed.bind, ApiState::new(ApiConfig::default())).await?;
            Ok(())
        }
        Command::Import => {
            let Some(path) = parsed.import_path.as_deref() else {
                return Err(ArgsError::MissingImportPath.into());
            };
            let services = build_services(&parsed).await?;
            let responses = services.exporter().import(path).await?;
            println!(
                "restored {} answers from {}",
                responses.answered_count(),
                path.display()
            );
            Ok(())
        }
    }
}

fn prepare_sqlite_file(db_url: &str) -> Result<(), Box<dyn std::error::Error>> {
    if db_url == "sqlite::memory:" {
        return Ok(());
    }

    let path = db_url
        .strip_prefix("sqlite://")
        .ok_or_else(|| ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        })?;
    let path = path.split('?').next().unwrap_or(path);
    if path.is_empty() {
        return Err(ArgsError::InvalidDbUrl {
            raw: db_url.to_string(),
        }
        .into());
    }

    let path = std::path::Path::new(path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    if !path.exists() {
        std::fs::OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(false)
            .open(path)?;
    }

    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
