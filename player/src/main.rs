use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use std::path::PathBuf;
use sweeptrace::{
    Control, Difficulty, HttpBackend, ProblemGenerator, ProblemSolver, Session, SessionError, Settings, TickOutcome,
    frame,
};
use tokio::io::{AsyncBufReadExt, BufReader};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// What log level to use
    #[command(flatten)]
    verbose: Verbosity<InfoLevel>,

    /// Settings file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base URL of the generator and solver service
    #[arg(long, env = "SWEEPTRACE_API_URL")]
    api_url: Option<String>,

    #[arg(short, long, value_enum)]
    difficulty: Option<Difficulty>,

    /// Problems per generation
    #[arg(short = 'n', long)]
    count: Option<u32>,

    /// Playback speed, 1 (slow) to 100 (fast)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(1..=100))]
    speed: Option<u8>,

    /// Fixed delay between moves, overrides --speed
    #[arg(long)]
    cadence_ms: Option<u64>,

    /// Fail when the solver returns a different number of results than problems
    #[arg(long)]
    strict: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate, solve, and play every problem to the end
    Run,
    /// Generate, solve, and print a single frame
    Show {
        /// Problem to show, counting from 1
        #[arg(long, default_value_t = 1)]
        problem: usize,
        /// Number of moves applied, defaults to the whole trace
        #[arg(long = "move")]
        at: Option<usize>,
    },
    /// Drive playback with commands read from stdin
    Interactive,
}

impl Args {
    fn settings(&self) -> anyhow::Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        if let Some(api_url) = &self.api_url {
            settings.api_url.clone_from(api_url);
        }
        if let Some(difficulty) = self.difficulty {
            settings.difficulty = difficulty;
        }
        if let Some(count) = self.count {
            settings.count = count;
        }
        if let Some(speed) = self.speed {
            settings.speed = speed;
        }
        if self.cadence_ms.is_some() {
            settings.cadence_ms = self.cadence_ms;
        }
        settings.strict_results |= self.strict;
        Ok(settings.normalized())
    }
}

fn init_logging(level: log::LevelFilter) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level.as_str().to_ascii_lowercase()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.verbose.log_level_filter());

    let settings = args.settings().context("Could not load settings")?;
    log::debug!("settings: {:?}", settings);
    let backend = HttpBackend::from_settings(&settings)?;
    let mut session = Session::new(backend, settings);

    match args.command.unwrap_or(Command::Run) {
        Command::Run => run(&mut session).await,
        Command::Show { problem, at } => show(&mut session, problem, at).await,
        Command::Interactive => interactive(&mut session).await,
    }
}

async fn run<B: ProblemGenerator + ProblemSolver>(session: &mut Session<B>) -> anyhow::Result<()> {
    prepare(session).await?;

    for index in 0..session.problems().len() {
        session.select_problem(index)?;
        print_frame(session);
        session.play()?;
        while let TickOutcome::Advanced(_) = session.tick().await {
            print_frame(session);
        }
    }
    Ok(())
}

async fn show<B: ProblemGenerator + ProblemSolver>(
    session: &mut Session<B>,
    problem: usize,
    at: Option<usize>,
) -> anyhow::Result<()> {
    let Some(index) = problem.checked_sub(1) else {
        bail!("Problems are numbered from 1");
    };
    prepare(session).await?;

    session.select_problem(index)?;
    let applied = at.unwrap_or(session.total_moves());
    session.seek(applied.checked_sub(1));
    print_frame(session);
    Ok(())
}

async fn interactive<B: ProblemGenerator + ProblemSolver>(session: &mut Session<B>) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    println!("type `help` for commands");

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Could not read stdin")? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                let control = match line.parse::<Control>() {
                    Ok(control) => control,
                    Err(err) => {
                        eprintln!("{err}");
                        continue;
                    }
                };
                if control == Control::Quit {
                    break;
                }
                if let Err(err) = apply(session, control).await {
                    log::error!("{}", err);
                }
            }
            outcome = session.tick() => {
                match outcome {
                    TickOutcome::Advanced(_) => print_frame(session),
                    TickOutcome::Finished => log::info!("playback finished"),
                }
            }
        }
    }

    session.pause();
    Ok(())
}

async fn apply<B: ProblemGenerator + ProblemSolver>(
    session: &mut Session<B>,
    control: Control,
) -> Result<(), SessionError> {
    match control {
        Control::Generate => {
            let report = session.generate().await?;
            for (index, err) in &report.skipped {
                log::warn!("generated problem #{} dropped: {}", index, err);
            }
            print_frame(session);
        }
        Control::Process => {
            session.generate_and_process().await?;
            print_frame(session);
        }
        Control::Play => session.play()?,
        Control::Pause => {
            if !session.pause() {
                log::info!("not playing");
            }
        }
        Control::Next => {
            if session.next().is_none() {
                log::info!("already at the last move");
            }
            print_frame(session);
        }
        Control::Previous => {
            if !session.previous() {
                log::info!("already at the initial grid");
            }
            print_frame(session);
        }
        Control::Seek(applied) => {
            session.seek(applied.checked_sub(1));
            print_frame(session);
        }
        Control::Select(problem) => {
            session.select_problem(problem - 1)?;
            print_frame(session);
        }
        Control::Speed(speed) => {
            session.set_cadence(None);
            session.set_speed(speed);
            log::info!(
                "speed {}, {} ms per move",
                session.settings().speed,
                session.settings().cadence().as_millis()
            );
        }
        Control::Difficulty(difficulty) => {
            session.set_difficulty(difficulty);
            log::info!("difficulty {}", difficulty.name());
        }
        Control::Count(count) => {
            session.set_count(count);
            log::info!("{} problem(s) per generation", session.settings().count);
        }
        Control::Show => print_frame(session),
        Control::Help => println!("{}", Control::HELP),
        Control::Quit => {}
    }
    Ok(())
}

/// Generates and solves a fresh collection.
async fn prepare<B: ProblemGenerator + ProblemSolver>(session: &mut Session<B>) -> anyhow::Result<()> {
    let settings = session.settings();
    log::info!("contacting {}", settings.api_url);
    let started = tokio::time::Instant::now();

    let (generated, processed) = session.generate_and_process().await?;
    if let Some(report) = generated {
        for (index, err) in &report.skipped {
            log::warn!("generated problem #{} dropped: {}", index, err);
        }
    }
    log::info!(
        "{} problem(s) ready in {:.1?}, {} without a trace",
        session.problems().len(),
        started.elapsed(),
        processed.padded
    );
    Ok(())
}

fn print_frame<B: ProblemGenerator + ProblemSolver>(session: &Session<B>) {
    match frame(session) {
        Some(frame) => println!("{frame}"),
        None => println!("nothing generated yet, try `generate`"),
    }
}
