//! piwalk - command-line driver.
//!
//! ```text
//! main() -> Args + PiwalkConfig -> Settings
//!        -> for each FILE: Program::new() -> step loop -> RunOutcome
//!                              ^   |
//!            stdin line task --+   +--> stdout (SYS_T / SYS_AT writes)
//!                                  +--> stderr (-v view, -r registers)
//! ```
//!
//! Files run one after another. A crash is reported and the batch carries on;
//! a load or syntax error stops it.

mod args;
mod view;

use std::{
    collections::VecDeque,
    env,
    fs::{self, OpenOptions},
    io::{Write, stdout},
    path::{Path, PathBuf},
    process::ExitCode,
    sync::Mutex,
    time::Duration,
};

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use piwalk_config::PiwalkConfig;
use piwalk_core::{
    InputReceiver, InputSender, OutputReceiver, PiDigits, Position, Program, RunOutcome, Step,
    input_channel, output_channel,
};

use crate::args::Args;
use crate::view::{SourceView, render_registers};

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("info"))
        .unwrap_or_else(|_| EnvFilter::try_new("warn").expect("warn filter is valid"));

    let (log_file, init_warnings) = open_log_file();

    if let Some((log_path, file)) = log_file {
        tracing_subscriber::registry()
            .with(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .with(env_filter)
            .init();

        tracing::info!(path = %log_path.display(), "Logging initialized");
        for warning in init_warnings {
            tracing::warn!("{warning}");
        }
        return;
    }

    // stdout belongs to the running program; no log file means no logs.
    tracing_subscriber::registry().with(env_filter).init();
}

fn open_log_file() -> (Option<(PathBuf, fs::File)>, Vec<String>) {
    let mut warnings = Vec::new();

    for candidate in log_file_candidates() {
        if let Some(parent) = candidate.parent()
            && let Err(e) = fs::create_dir_all(parent)
        {
            warnings.push(format!(
                "Failed to create log dir {}: {e}",
                parent.display()
            ));
            continue;
        }

        match OpenOptions::new()
            .create(true)
            .append(true)
            .open(&candidate)
        {
            Ok(file) => return (Some((candidate, file)), warnings),
            Err(e) => {
                warnings.push(format!(
                    "Failed to open log file {}: {e}",
                    candidate.display()
                ));
            }
        }
    }

    (None, warnings)
}

fn log_file_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    // Primary: ~/.piwalk/logs/piwalk.log
    if let Some(config_path) = PiwalkConfig::path()
        && let Some(config_dir) = config_path.parent()
    {
        candidates.push(config_dir.join("logs").join("piwalk.log"));
    }

    candidates.push(PathBuf::from(".piwalk").join("logs").join("piwalk.log"));

    candidates
}

/// Flags layered over the config file.
#[derive(Debug, Default)]
struct Settings {
    delay: Option<Duration>,
    view_radius: Option<u32>,
    dump_registers: bool,
    pi_file: Option<PathBuf>,
    bounds: Option<[Position; 2]>,
}

impl Settings {
    fn resolve(args: &Args, config: Option<&PiwalkConfig>) -> Self {
        let run = config.map(PiwalkConfig::run).unwrap_or_default();
        Self {
            delay: args
                .delay_ms
                .or(run.delay_ms)
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis),
            view_radius: args.view_radius.or(run.view_radius),
            dump_registers: args.dump_registers || run.dump_registers,
            pi_file: args.pi_file.clone().or_else(|| run.pi_file_path()),
            bounds: run.bounds,
        }
    }

    fn load_digits(&self) -> Result<PiDigits> {
        let Some(path) = &self.pi_file else {
            return Ok(PiDigits::default());
        };
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read pi digits from {}", path.display()))?;
        let digits = PiDigits::new(&text).with_context(|| path.display().to_string())?;
        tracing::info!(path = %path.display(), len = digits.len(), "pi digits loaded");
        Ok(digits)
    }
}

/// Serve character requests from stdin, one line at a time. An empty line
/// answers with a space. Stops at end of input, which fails later reads.
async fn serve_input(mut requests: InputReceiver) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut buffered: VecDeque<char> = VecDeque::new();

    while let Some(request) = requests.recv().await {
        if buffered.is_empty() {
            match lines.next_line().await {
                Ok(Some(line)) => buffered.extend(line.chars()),
                Ok(None) => {
                    tracing::info!("stdin closed");
                    return;
                }
                Err(err) => {
                    tracing::warn!(%err, "stdin read failed");
                    return;
                }
            }
        }
        let ch = buffered.pop_front().unwrap_or(' ');
        if request.respond(ch.to_string()).is_err() {
            tracing::debug!("input request dropped before reply");
        }
    }
}

fn flush_output(output: &mut OutputReceiver) -> Result<()> {
    let mut out = stdout().lock();
    while let Ok(text) = output.try_recv() {
        out.write_all(text.as_bytes())?;
    }
    out.flush()?;
    Ok(())
}

async fn run_file(
    path: &Path,
    settings: &Settings,
    digits: &PiDigits,
    input: &InputSender,
) -> Result<RunOutcome> {
    let source = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    tracing::info!(path = %path.display(), "running");

    let (output, mut printed) = output_channel();
    let mut program = Program::new(digits.clone(), &source)
        .with_output(output)
        .with_input(input.clone());
    if let Some([a, b]) = settings.bounds {
        program = program.with_bounds(a, b);
    }
    let view = settings
        .view_radius
        .map(|radius| (SourceView::new(&source), radius));

    loop {
        let step = program.step().await;
        flush_output(&mut printed)?;
        let step = step.with_context(|| path.display().to_string())?;

        if let Some((view, radius)) = &view {
            eprintln!("{}", view.render(program.position(), *radius));
        }
        if settings.dump_registers {
            eprintln!("{}", render_registers(&program.registers()));
        }

        match step {
            Step::Continue => {}
            Step::Exited => {
                tracing::info!(ticks = program.ticks(), "exited");
                return Ok(RunOutcome::Exited);
            }
            Step::Crashed(end) => {
                tracing::info!(ticks = program.ticks(), %end, "crashed");
                return Ok(RunOutcome::Crashed(end));
            }
        }

        if let Some(delay) = settings.delay {
            tokio::time::sleep(delay).await;
        }
    }
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    init_tracing();

    let args = match Args::parse(env::args().skip(1)) {
        Ok(args) => args,
        Err(err) => {
            eprintln!("{err:#}");
            return Ok(ExitCode::FAILURE);
        }
    };
    let config = PiwalkConfig::load().ok().flatten();
    let settings = Settings::resolve(&args, config.as_ref());
    tracing::debug!(?settings, "settings resolved");

    let digits = match settings.load_digits() {
        Ok(digits) => digits,
        Err(err) => {
            eprintln!("{err:#}");
            return Ok(ExitCode::FAILURE);
        }
    };

    let (input, requests) = input_channel(1);
    let reader = tokio::spawn(serve_input(requests));

    let mut status = ExitCode::SUCCESS;
    for path in &args.files {
        match run_file(path, &settings, &digits, &input).await {
            Ok(RunOutcome::Exited) => {}
            Ok(RunOutcome::Crashed(end)) => {
                eprintln!("\n{end}");
                status = ExitCode::FAILURE;
            }
            Err(err) => {
                eprintln!("\n{err:#}");
                status = ExitCode::FAILURE;
                break;
            }
        }
    }

    drop(input);
    reader.abort();
    Ok(status)
}
