// src/cli.rs
use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};

use crate::config::{
    consts::{DEFAULT_MAX_ROWS, DEFAULT_OUT_DIR, PING_TEXT},
    jobs::{self, JOBS},
    options::{NotifierKind, RunOptions},
    secrets::{ConfigError, EmailCredentials, TelegramCredentials},
};
use crate::deliver::{EmailNotifier, Notifier, NullNotifier, TelegramNotifier};
use crate::progress::LogProgress;
use crate::render::Renderer;
use crate::runner::{self, FailureKind};

/// Fetch public datasets, chart them, send the charts.
#[derive(Parser)]
#[command(name = "chartpost")]
#[command(version)]
pub struct Cli {
    /// More log output (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run one job: fetch every source, render, deliver
    Run(RunArgs),
    /// Send a test message through a notifier
    Ping(PingArgs),
    /// List built-in jobs
    Jobs,
}

#[derive(Args)]
pub struct RunArgs {
    /// Job name (see `chartpost jobs`)
    pub job: String,

    /// Delivery channel; defaults to the job's own
    #[arg(long, value_enum)]
    pub notify: Option<NotifierKind>,

    /// Where chart PNGs are written
    #[arg(long, env = "CHARTPOST_OUT_DIR", default_value = DEFAULT_OUT_DIR)]
    pub out_dir: PathBuf,

    /// Bars per chart
    #[arg(long, default_value_t = DEFAULT_MAX_ROWS)]
    pub max_rows: usize,
}

#[derive(Args)]
pub struct PingArgs {
    #[arg(long, value_enum, default_value_t = NotifierKind::Telegram)]
    pub notify: NotifierKind,
}

impl From<&RunArgs> for RunOptions {
    fn from(args: &RunArgs) -> Self {
        let opts = RunOptions::new(args.job.clone()).out_dir(&args.out_dir).max_rows(args.max_rows);
        match args.notify {
            Some(kind) => opts.notifier(kind),
            None => opts,
        }
    }
}

/// Credentials are read here, before any source is touched.
pub fn make_notifier(kind: NotifierKind) -> Result<Box<dyn Notifier>, ConfigError> {
    Ok(match kind {
        NotifierKind::Telegram => {
            let creds = TelegramCredentials::from_env()?;
            logd!("Telegram target chat: {}", creds.chat_id);
            Box::new(TelegramNotifier::new(creds))
        }
        NotifierKind::Email => {
            let creds = EmailCredentials::from_env()?;
            logd!("Email recipient: {} via {}", creds.to, creds.smtp_host);
            Box::new(EmailNotifier::new(creds))
        }
        NotifierKind::None => Box::new(NullNotifier),
    })
}

pub fn run() -> Result<()> {
    // A missing .env is fine; the real environment may carry everything.
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();
    crate::log::init(cli.verbose);

    match cli.command {
        Commands::Run(args) => run_job(&RunOptions::from(&args)),
        Commands::Ping(args) => ping(args.notify),
        Commands::Jobs => {
            for j in JOBS {
                println!("{:<12}{:<10}{}", j.name, j.notifier.as_str(), j.about);
            }
            Ok(())
        }
    }
}

fn run_job(opts: &RunOptions) -> Result<()> {
    let job = jobs::build(&opts.job, opts.max_rows)?;
    let kind = opts.notifier.unwrap_or(job.notifier);
    let notifier = make_notifier(kind).wrap_err_with(|| format!("{} notifier not configured", kind.as_str()))?;

    logf!("Job {} ({} sources) → {}", job.name, job.sources.len(), notifier.name());
    let mut renderer = Renderer::new(&opts.out_dir);
    let mut progress = LogProgress::default();
    let summary = runner::run(&job.sources, &mut renderer, notifier.as_ref(), job.subject, Some(&mut progress))
        .wrap_err_with(|| format!("delivery via {} failed", notifier.name()))?;

    let empty = summary.failures.iter().filter(|f| f.kind == FailureKind::Empty).count();
    logf!(
        "Done: {} chart(s) delivered, {} source(s) empty, {} failed",
        summary.delivered(),
        empty,
        summary.failures.len() - empty
    );
    Ok(())
}

fn ping(kind: NotifierKind) -> Result<()> {
    let notifier = make_notifier(kind).wrap_err_with(|| format!("{} notifier not configured", kind.as_str()))?;
    if kind != NotifierKind::None {
        logf!("Credentials found for {}", notifier.name());
    }
    notifier.send_text(PING_TEXT).wrap_err("connectivity check failed")?;
    logf!("Ping via {} ok", notifier.name());
    Ok(())
}
