use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use keypad::{KeyboardView, KeypadConfig, LayoutRegistry, Mode, SessionManager, UserProfile};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::time::Instant;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "keypad", about = "Shared multi-tap keyboard editor")]
struct Args {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Edit a text interactively. Each line is a key token (`00`, `60`,
    /// `backspace`, ...) or a full button payload (`0150:1`).
    Repl {
        #[arg(long, default_value = "")]
        text: String,

        #[arg(long, default_value_t = 1)]
        user: u64,

        /// Print views as JSON instead of a plain grid
        #[arg(long)]
        json: bool,
    },
    /// Print one layer of the active layout set
    Layout {
        #[arg(long, default_value_t = 0)]
        mode: u8,
    },
    /// Validate a JSON layout file
    CheckLayout { path: PathBuf },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => KeypadConfig::load_toml(path)
            .map_err(|e| anyhow!(e))
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => KeypadConfig::default(),
    };

    match args.command {
        Command::Repl { text, user, json } => repl(&config, &text, user, json),
        Command::Layout { mode } => print_layout(&config, mode),
        Command::CheckLayout { path } => check_layout(&path),
    }
}

fn repl(config: &KeypadConfig, text: &str, user: u64, json: bool) -> Result<()> {
    let manager = keypad::open(config)
        .map_err(|e| anyhow!(e))
        .context("failed to open editor session")?;
    let profile = UserProfile::new(user, format!("user{user}"));
    let key = SessionManager::key_for(None, Some(user), Some(0))
        .context("no session key for repl user")?;

    let view = manager.create(&key, text, &profile, Instant::now())?;
    print_view(&view, json)?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("failed to read stdin")?;
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input == ":quit" {
            break;
        }

        let now = Instant::now();
        for (expired, view) in manager.expire_idle(now) {
            tracing::info!(session = expired.as_str(), "lock expired");
            print_view(&view, json)?;
        }

        let result = if keypad::ActionPayload::parse(input).is_ok() {
            manager.press(&key, input, &profile, now)
        } else {
            manager.press_token(&key, input, &profile, now)
        };
        match result {
            Ok(view) => print_view(&view, json)?,
            Err(err) => eprintln!("! {err}"),
        }
    }
    Ok(())
}

fn print_view(view: &KeyboardView, json: bool) -> Result<()> {
    let mut out = io::stdout().lock();
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(view)?)?;
    } else {
        writeln!(out, "{}", view.to_plain())?;
    }
    Ok(())
}

fn print_layout(config: &KeypadConfig, mode: u8) -> Result<()> {
    let layouts = keypad::layouts::load(config.layout_path.as_deref()).context("failed to load layouts")?;
    let mode = Mode::new(mode).with_context(|| format!("mode {mode} is not a four-bit mask"))?;
    let layout = layouts.layout(mode)?;
    let mut out = io::stdout().lock();
    writeln!(out, "mode {mode}")?;
    for (row, keys) in layout.rows().iter().enumerate() {
        let cells: Vec<String> = keys
            .iter()
            .enumerate()
            .map(|(col, key)| {
                let label = if key.is_empty() { config.blank_label.as_str() } else { key.as_str() };
                format!("{row}{col}:{label}")
            })
            .collect();
        writeln!(out, "{}", cells.join("  "))?;
    }
    Ok(())
}

fn check_layout(path: &PathBuf) -> Result<()> {
    let registry = LayoutRegistry::load_json(path)
        .with_context(|| format!("invalid layout file {}", path.display()))?;
    for mode in registry.modes() {
        let layout = registry.layout(mode)?;
        println!("mode {mode}: {}x{}", layout.row_count(), layout.col_count());
    }
    println!("{} layer(s) ok", registry.len());
    Ok(())
}
