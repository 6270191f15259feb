mod bot;
mod browser;
mod common;
mod config;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use colored::Colorize;
use skribbl_engine::{FrequencyReport, Vocabulary};
use std::fs::File;
use std::io::{BufWriter, Write, stdout};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tokio_util::sync::CancellationToken;

use bot::{BotSetup, LoopStats, SelfPlaySummary, run_self_play, run_solo};
use browser::{BrowserConfig, BrowserKind};
use common::reports;
use config::BotConfig;

const DEFAULT_WORDS: &str = include_str!("../assets/words.txt");

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RunMode {
    /// Guess from hints next to a human player
    Play,
    /// Two bots in a private room, logging every offered word
    SelfPlay,
    /// Aggregate an encounter log into a frequency report (no browser)
    Collate,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum HeadlessMode {
    /// Run browsers in headless mode
    Headless,
    /// Run browsers with visible windows
    Windowed,
}

impl HeadlessMode {
    const fn is_headless(self) -> bool {
        matches!(self, Self::Headless)
    }
}

#[derive(Debug, Parser)]
#[command(name = "skribbl-bot", version = "0.1.0")]
#[command(about = "skribbl.io bot - hint guessing, self-play word scraping and word statistics")]
struct Args {
    /// What to run
    #[arg(long, value_enum, default_value_t = RunMode::Play)]
    mode: RunMode,

    /// Newline-delimited word list (defaults to the bundled list)
    #[arg(long)]
    words: Option<PathBuf>,

    /// Invite link of a private room to join (play mode)
    #[arg(long)]
    room: Option<String>,

    /// Seed for reproducible guess choices and delays
    #[arg(long)]
    seed: Option<u64>,

    /// Polling interval in milliseconds
    #[arg(long)]
    tick_ms: Option<u64>,

    /// Encounter log written by self-play and read by collate
    #[arg(long, default_value = "word_encounters.txt")]
    encounters: PathBuf,

    /// Optional path to write the report output instead of stdout
    #[arg(long)]
    output: Option<PathBuf>,

    /// Output report format (collate mode)
    #[arg(long, default_value = "console")]
    #[arg(value_parser = ["json", "markdown", "console"])]
    report: String,

    /// Number of most frequent words listed in console and markdown reports
    #[arg(long, default_value_t = 20)]
    top: usize,

    /// Browser to drive
    #[arg(long, value_enum, default_value_t = BrowserKind::Chrome)]
    browser: BrowserKind,

    /// Connect to a Selenium Grid or a driver on a non-default port
    #[arg(long)]
    hub: Option<String>,

    /// Run headless where supported
    #[arg(long, value_enum, default_value_t = HeadlessMode::Windowed)]
    headless: HeadlessMode,

    /// JSON file overriding the default timings and room settings
    #[arg(long)]
    config: Option<PathBuf>,

    /// Artifacts directory for startup failure screenshots and DOM dumps
    #[arg(long, default_value = "target/bot-artifacts")]
    artifacts_dir: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let default_level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();

    let start_time = Instant::now();
    match args.mode {
        RunMode::Collate => write_collate_report(&args)?,
        RunMode::Play => {
            announce_banner();
            let setup = build_setup(&args)?;
            let vocabulary = Arc::new(load_vocabulary(&args)?);
            println!(
                "📚 {} words loaded, press Enter or Ctrl-C to stop",
                vocabulary.len()
            );
            let cancel = stop_token();
            let stats = run_solo(&setup, vocabulary, args.room.as_deref(), cancel).await?;
            print_loop_stats("solo", &stats);
        }
        RunMode::SelfPlay => {
            announce_banner();
            let setup = build_setup(&args)?;
            println!("🤝 Self-play, press Enter or Ctrl-C to stop");
            let cancel = stop_token();
            let summary = run_self_play(&setup, args.encounters.clone(), cancel).await?;
            print_self_play(&summary, &args);
        }
    }

    if args.mode != RunMode::Collate {
        println!("🏁 Total time: {:?}", start_time.elapsed());
    }
    Ok(())
}

fn announce_banner() {
    println!("{}", "🎨 Skribbl Bot".bright_cyan().bold());
    println!("{}", "==============".cyan());
}

fn load_config(args: &Args) -> Result<BotConfig> {
    let mut cfg = match &args.config {
        Some(path) => BotConfig::load(path)?,
        None => BotConfig::default(),
    };
    if let Some(seed) = args.seed {
        cfg.seed = Some(seed);
    }
    if let Some(tick_ms) = args.tick_ms {
        cfg.tick_ms = tick_ms;
    }
    Ok(cfg)
}

fn build_browser_config(args: &Args) -> BrowserConfig {
    BrowserConfig {
        headless: args.headless.is_headless(),
        remote_hub: args.hub.clone(),
        ..BrowserConfig::default()
    }
}

fn build_setup(args: &Args) -> Result<BotSetup> {
    Ok(BotSetup {
        kind: args.browser,
        browser: build_browser_config(args),
        bot: load_config(args)?,
        artifacts_base: args.artifacts_dir.clone(),
    })
}

fn load_vocabulary(args: &Args) -> Result<Vocabulary> {
    let vocabulary = match &args.words {
        Some(path) => Vocabulary::load(path)?,
        None => Vocabulary::parse(DEFAULT_WORDS),
    };
    anyhow::ensure!(!vocabulary.is_empty(), "word list is empty");
    Ok(vocabulary)
}

/// Cancelled by Enter on stdin or Ctrl-C.
fn stop_token() -> CancellationToken {
    let cancel = CancellationToken::new();

    let on_enter = cancel.clone();
    std::thread::spawn(move || {
        let mut line = String::new();
        // EOF means stdin is not a terminal; leave stopping to Ctrl-C.
        if matches!(std::io::stdin().read_line(&mut line), Ok(n) if n > 0) {
            on_enter.cancel();
        }
    });

    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            on_signal.cancel();
        }
    });

    cancel
}

fn print_loop_stats(role: &str, stats: &LoopStats) {
    println!(
        "{} {} ticks, {} games restarted, {} guesses, {} words chosen, {} forwarded, {} forwards submitted",
        format!("[{role}]").bold(),
        stats.ticks,
        stats.games_started,
        stats.guesses.to_string().green(),
        stats.words_chosen,
        stats.forwards_sent,
        stats.forwards_submitted
    );
}

fn print_self_play(summary: &SelfPlaySummary, args: &Args) {
    print_loop_stats("host", &summary.host);
    print_loop_stats("player", &summary.player);
    let logged = summary.host.words_logged + summary.player.words_logged;
    println!(
        "📝 {} words logged to {}",
        logged.to_string().green(),
        args.encounters.display()
    );
}

fn write_collate_report(args: &Args) -> Result<()> {
    let report = FrequencyReport::from_log(&args.encounters)
        .with_context(|| format!("failed to collate {}", args.encounters.display()))?;
    let mut output_target = OutputTarget::new(args.output.clone())?;

    match args.report.as_str() {
        "json" => reports::generate_json_report(&mut output_target, &report)?,
        "markdown" => reports::generate_markdown_report(&mut output_target, &report, args.top)?,
        _ => reports::generate_console_report(&mut output_target, &report, args.top)?,
    }

    output_target.flush_inner()?;
    Ok(())
}

enum OutputTarget {
    Stdout(BufWriter<std::io::Stdout>),
    File(BufWriter<File>),
}

impl OutputTarget {
    fn new(path: Option<PathBuf>) -> Result<Self> {
        if let Some(path) = path {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            Ok(Self::File(BufWriter::new(file)))
        } else {
            Ok(Self::Stdout(BufWriter::new(stdout())))
        }
    }

    fn writer(&mut self) -> &mut dyn Write {
        match self {
            Self::Stdout(w) => w,
            Self::File(w) => w,
        }
    }

    fn flush_inner(&mut self) -> std::io::Result<()> {
        match self {
            Self::Stdout(w) => w.flush(),
            Self::File(w) => w.flush(),
        }
    }
}

impl Write for OutputTarget {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.writer().write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.flush_inner()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skribbl_engine::OverlayRule;

    fn base_args() -> Args {
        Args {
            mode: RunMode::Play,
            words: None,
            room: None,
            seed: None,
            tick_ms: None,
            encounters: PathBuf::from("word_encounters.txt"),
            output: None,
            report: "console".to_string(),
            top: 20,
            browser: BrowserKind::Chrome,
            hub: None,
            headless: HeadlessMode::Windowed,
            config: None,
            artifacts_dir: "target/bot-artifacts".to_string(),
            verbose: false,
        }
    }

    fn temp_path(label: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "skribbl-main-{label}-{}",
            std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_nanos()
        ))
    }

    #[test]
    fn args_parse_self_play_flags() {
        let args = Args::try_parse_from([
            "skribbl-bot",
            "--mode",
            "self-play",
            "--browser",
            "firefox",
            "--headless",
            "headless",
            "--encounters",
            "log.txt",
        ])
        .unwrap();
        assert_eq!(args.mode, RunMode::SelfPlay);
        assert_eq!(args.browser, BrowserKind::Firefox);
        assert!(args.headless.is_headless());
        assert_eq!(args.encounters, PathBuf::from("log.txt"));
    }

    #[test]
    fn unknown_report_format_is_rejected() {
        let parsed = Args::try_parse_from(["skribbl-bot", "--report", "csv"]);
        assert!(parsed.is_err());
    }

    #[test]
    fn cli_overrides_beat_config_file() {
        let path = temp_path("config.json");
        std::fs::write(&path, r#"{ "tick_ms": 900, "seed": 1, "overlay_rule": "not_parked" }"#)
            .unwrap();
        let mut args = base_args();
        args.config = Some(path);
        args.seed = Some(42);

        let cfg = load_config(&args).unwrap();
        assert_eq!(cfg.seed, Some(42));
        assert_eq!(cfg.tick_ms, 900);
        assert_eq!(cfg.overlay_rule, OverlayRule::NotParked);

        args.tick_ms = Some(100);
        assert_eq!(load_config(&args).unwrap().tick_ms, 100);
    }

    #[test]
    fn browser_config_follows_flags() {
        let mut args = base_args();
        args.hub = Some("http://grid:4444".to_string());
        args.headless = HeadlessMode::Headless;
        let cfg = build_browser_config(&args);
        assert!(cfg.headless);
        assert_eq!(cfg.remote_hub.as_deref(), Some("http://grid:4444"));
        assert_eq!(cfg.implicit_wait_secs, 0);
    }

    #[test]
    fn bundled_word_list_loads() {
        let vocabulary = load_vocabulary(&base_args()).unwrap();
        assert!(vocabulary.len() > 50);
        assert!(vocabulary.iter().all(|w| w == w.to_lowercase()));
    }

    #[test]
    fn collate_writes_markdown_to_file() {
        let log = temp_path("log");
        std::fs::write(&log, "kite\nlamp\nkite\n").unwrap();
        let out = temp_path("report.md");
        let mut args = base_args();
        args.mode = RunMode::Collate;
        args.encounters = log;
        args.output = Some(out.clone());
        args.report = "markdown".to_string();
        args.top = 1;

        write_collate_report(&args).unwrap();
        let text = std::fs::read_to_string(out).unwrap();
        assert!(text.contains("| Unique words | 2 |"));
        assert!(text.contains("| 1 | kite | 2 |"));
    }
}
