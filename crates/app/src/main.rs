use std::fmt;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use services::{AppServices, Clock};
use storage::supabase::{ANON_KEY_ENV, SupabaseConfig, SupabaseConfigError, URL_ENV};
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

const LOG_ENV: &str = "ROLLCALL_LOG";
const DEFAULT_LOG: &str = "info";

#[derive(Debug)]
enum ArgsError {
    MissingValue { flag: &'static str },
    UnknownArg(String),
    AnonKeyWithoutUrl,
    MissingBackend,
}

impl fmt::Display for ArgsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgsError::MissingValue { flag } => write!(f, "{flag} requires a value"),
            ArgsError::UnknownArg(arg) => write!(f, "unknown argument: {arg}"),
            ArgsError::AnonKeyWithoutUrl => write!(f, "--anon-key requires --supabase-url"),
            ArgsError::MissingBackend => write!(
                f,
                "no Supabase project configured; pass --supabase-url or set {URL_ENV} \
                 (or run `app demo`)"
            ),
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

fn print_usage() {
    eprintln!("Usage:");
    eprintln!(
        "  cargo run -p app -- ui   [--supabase-url <url>] [--anon-key <key>] [--log <filter>]"
    );
    eprintln!("  cargo run -p app -- demo [--log <filter>]");
    eprintln!();
    eprintln!("The demo backend signs in with:");
    eprintln!("  {} / {}", storage::demo::DEMO_EMAIL, storage::demo::DEMO_PASSWORD);
    eprintln!();
    eprintln!("Environment:");
    eprintln!("  {URL_ENV}, {ANON_KEY_ENV}, {LOG_ENV}");
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Ui,
    Demo,
}

impl Command {
    fn from_arg(arg: &str) -> Option<Self> {
        match arg {
            "ui" => Some(Self::Ui),
            "demo" => Some(Self::Demo),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct Args {
    supabase_url: Option<String>,
    anon_key: Option<String>,
    log: Option<String>,
}

impl Args {
    fn parse(
        command: Command,
        args: &mut impl Iterator<Item = String>,
    ) -> Result<Self, ArgsError> {
        let mut parsed = Self::default();
        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--supabase-url" if command == Command::Ui => {
                    parsed.supabase_url = Some(require_value(args, "--supabase-url")?);
                }
                "--anon-key" if command == Command::Ui => {
                    parsed.anon_key = Some(require_value(args, "--anon-key")?);
                }
                "--log" => parsed.log = Some(require_value(args, "--log")?),
                "--help" | "-h" => {
                    print_usage();
                    std::process::exit(0);
                }
                _ => return Err(ArgsError::UnknownArg(arg)),
            }
        }
        if parsed.anon_key.is_some() && parsed.supabase_url.is_none() {
            return Err(ArgsError::AnonKeyWithoutUrl);
        }
        Ok(parsed)
    }

    /// Flags win over the environment; `None` means no project is configured.
    fn supabase_config(&self) -> Result<Option<SupabaseConfig>, SupabaseConfigError> {
        let Some(url) = self.supabase_url.as_deref() else {
            return SupabaseConfig::from_env();
        };
        let anon_key = self
            .anon_key
            .clone()
            .or_else(|| std::env::var(ANON_KEY_ENV).ok())
            .unwrap_or_default();
        SupabaseConfig::new(url, anon_key).map(Some)
    }
}

fn init_tracing(filter: Option<&str>) {
    let filter = filter
        .map(EnvFilter::new)
        .or_else(|| EnvFilter::try_from_env(LOG_ENV).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG));
    // A second init (e.g. under a test runner) keeps the first subscriber.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
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
            ArgsError::UnknownArg(first.to_string())
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

    init_tracing(parsed.log.as_deref());

    let clock = Clock::default_clock();
    let services = match cmd {
        Command::Ui => {
            let config = parsed.supabase_config()?.ok_or(ArgsError::MissingBackend)?;
            AppServices::supabase(config, clock)
        }
        Command::Demo => AppServices::demo(clock).await?,
    };

    let app: Arc<dyn UiApp> = Arc::new(services);
    let context = build_app_context(&app);

    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Rollcall")
            .with_always_on_top(false),
    );

    tracing::info!(command = ?cmd, "launching desktop app");
    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

#[tokio::main]
async fn main() {
    if let Err(err) = run().await {
        eprintln!("{err}");
        std::process::exit(2);
    }
}
