//! rap-cadence - click tracks and practice log for rap cadence training
//!
//! Run with: cargo run -- session

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use anyhow::{anyhow, bail, Context, Result};
use clap::{Args, Parser, Subcommand};

use rap_cadence::scheduler::{schedule, ClickKind, PRACTICAL_DURATION_SECONDS};
use rap_cadence::session::{write_csv, write_json};
use rap_cadence::{derive_rate, Focus, PracticeState, SessionLog, TrainerConfig};
#[cfg(feature = "streaming")]
use rap_cadence::ClickPlayer;

/// Rows of the trend chart
const CHART_HEIGHT: usize = 8;

/// Bars shown by the `beats` preview
const PREVIEW_BARS: u32 = 2;

#[derive(Parser)]
#[command(name = "rap-cadence", version)]
#[command(about = "Click tracks and practice log for rap cadence training")]
struct Cli {
    /// JSON file with session defaults
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Render a click track to a WAV file ("-" writes to stdout)
    Render {
        #[command(flatten)]
        take: TakeArgs,

        /// Output WAV file
        #[arg(short, long)]
        output: PathBuf,
    },

    /// Render a click track and play it on the default audio device
    #[cfg(feature = "streaming")]
    Play {
        #[command(flatten)]
        take: TakeArgs,
    },

    /// Print the syllables-per-second rate of a tempo
    Rate {
        /// Tempo in beats per minute
        #[arg(short, long, default_value_t = 120)]
        bpm: u32,

        /// Beats per bar
        #[arg(short, long, default_value_t = 4)]
        subdivision: u32,
    },

    /// Interactive practice session
    Session {
        /// Start with a sample history instead of an empty log
        #[arg(long)]
        demo: bool,
    },
}

#[derive(Args)]
struct TakeArgs {
    /// Tempo in beats per minute (60-160)
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(60..=160))]
    bpm: Option<u32>,

    /// Take length in seconds (10-300)
    #[arg(short, long, value_parser = parse_duration)]
    duration: Option<f64>,

    /// Beats per bar
    #[arg(short, long, value_parser = clap::value_parser!(u32).range(1..))]
    subdivision: Option<u32>,

    /// Mute every fourth bar (Ghost Mode)
    #[arg(short, long)]
    ghost: bool,
}

impl TakeArgs {
    fn apply(&self, state: &mut PracticeState) -> Result<()> {
        if let Some(bpm) = self.bpm {
            state.set_bpm(bpm);
        }
        if let Some(duration) = self.duration {
            state.set_duration(duration);
        }
        if let Some(subdivision) = self.subdivision {
            state.set_subdivision(subdivision)?;
        }
        if self.ghost {
            state.set_ghost_mode(true);
        }
        Ok(())
    }
}

fn parse_duration(value: &str) -> std::result::Result<f64, String> {
    let seconds: f64 = value
        .parse()
        .map_err(|_| format!("'{}' is not a number of seconds", value))?;
    if PRACTICAL_DURATION_SECONDS.contains(&seconds) {
        Ok(seconds)
    } else {
        Err(format!(
            "duration must be between {} and {} seconds",
            PRACTICAL_DURATION_SECONDS.start(),
            PRACTICAL_DURATION_SECONDS.end()
        ))
    }
}

fn load_config(path: Option<&Path>) -> Result<TrainerConfig> {
    match path {
        Some(path) => TrainerConfig::load(path)
            .with_context(|| format!("Failed to load config '{}'", path.display())),
        None => Ok(TrainerConfig::default()),
    }
}

fn status_line(state: &PracticeState) -> String {
    format!(
        "{} BPM | {:.1} SPS | {:.0}s take | {} beats/bar | ghost {}",
        state.bpm(),
        state.rate(),
        state.duration_seconds(),
        state.subdivision(),
        if state.ghost_mode() { "on" } else { "off" }
    )
}

fn run_render(state: &PracticeState, output: &Path) -> Result<()> {
    let wav = state.render_take()?;

    if output == Path::new("-") {
        let mut stdout = io::stdout().lock();
        stdout.write_all(&wav)?;
        stdout.flush()?;
    } else {
        fs::write(output, &wav)
            .with_context(|| format!("Failed to write '{}'", output.display()))?;
    }

    eprintln!(
        "Rendered {} ({} bytes) -> {}",
        status_line(state),
        wav.len(),
        output.display()
    );
    Ok(())
}

#[cfg(feature = "streaming")]
fn run_play(state: &PracticeState) -> Result<()> {
    let wav = state.render_take()?;
    let mut player = ClickPlayer::new()?;
    println!("Playing: {}", status_line(state));
    player.play(wav)?;
    player.wait_until_end();
    Ok(())
}

#[cfg(feature = "streaming")]
struct Playback {
    player: Option<ClickPlayer>,
}

#[cfg(feature = "streaming")]
impl Playback {
    fn new() -> Self {
        Playback { player: None }
    }

    fn play(&mut self, state: &PracticeState) -> Result<()> {
        let wav = state.render_take()?;
        if self.player.is_none() {
            self.player = Some(ClickPlayer::new()?);
        }
        if let Some(player) = self.player.as_mut() {
            player.play(wav)?;
        }
        Ok(())
    }

    fn stop(&mut self) {
        if let Some(player) = self.player.as_mut() {
            player.stop();
        }
    }
}

#[cfg(not(feature = "streaming"))]
struct Playback;

#[cfg(not(feature = "streaming"))]
impl Playback {
    fn new() -> Self {
        Playback
    }

    fn play(&mut self, _state: &PracticeState) -> Result<()> {
        bail!("playback requires the \"streaming\" feature; use 'render <file>' instead")
    }

    fn stop(&mut self) {}
}

enum Flow {
    Continue,
    Quit,
}

const SESSION_HELP: &str = "\
Commands:
  bpm <n>            set tempo (60-160)
  + [n] / - [n]      nudge tempo up or down
  duration <s>       take length in seconds (10-300)
  sub <n>            beats per bar
  ghost [on|off]     toggle Ghost Mode (every 4th bar muted)
  beats              preview the first bars of the take
  render <file>      write the current take as WAV
  play / stop        play the current take (streaming feature)
  log <focus>        log a take: groove, articulation, triplet, speed, freestyle
  history            recent takes, newest first
  chart              BPM trend against the target
  csv / json         export the session log to stdout
  status             show current settings
  quit               leave the session";

fn parse_arg<T: std::str::FromStr>(args: &[&str], what: &str) -> Result<T> {
    let raw = args
        .first()
        .ok_or_else(|| anyhow!("missing {}", what))?;
    raw.parse()
        .map_err(|_| anyhow!("'{}' is not a valid {}", raw, what))
}

fn print_history(state: &PracticeState) {
    let history = state.history();
    if history.is_empty() {
        println!("No takes logged yet. Use 'log <focus>' after practising.");
        return;
    }
    println!("{:<17} {:>4} {:>5}  Focus", "Date", "BPM", "SPS");
    for entry in history {
        println!(
            "{:<17} {:>4} {:>5.1}  {}",
            entry.timestamp.format("%Y-%m-%d %H:%M"),
            entry.bpm,
            entry.rate,
            entry.focus
        );
    }
}

fn print_beats(state: &PracticeState) -> Result<()> {
    let events = schedule(&state.take_spec())?;
    for event in events.iter().take_while(|e| e.bar <= PREVIEW_BARS) {
        let mark = match event.kind {
            ClickKind::Accent => "ACCENT",
            ClickKind::Normal => "click",
            ClickKind::Silent => "(ghost)",
        };
        println!(
            "bar {:>2} beat {:>2} @ sample {:>8}  {}",
            event.bar,
            event.beat % state.subdivision() + 1,
            event.sample_offset,
            mark
        );
    }
    let ghost_beats = events.iter().filter(|e| !e.kind.is_audible()).count();
    println!(
        "{} beats in take, {} muted by Ghost Mode",
        events.len(),
        ghost_beats
    );
    Ok(())
}

fn handle_command(state: &mut PracticeState, playback: &mut Playback, line: &str) -> Result<Flow> {
    let words: Vec<&str> = line.split_whitespace().collect();
    let Some((command, args)) = words.split_first() else {
        return Ok(Flow::Continue);
    };

    match command.to_ascii_lowercase().as_str() {
        "bpm" => {
            state.set_bpm(parse_arg(args, "tempo")?);
            println!("{}", status_line(state));
        }
        "+" | "up" => {
            let step = if args.is_empty() { 1 } else { parse_arg(args, "step")? };
            state.nudge_bpm(step);
            println!("{}", status_line(state));
        }
        "-" | "down" => {
            let step: i32 = if args.is_empty() { 1 } else { parse_arg(args, "step")? };
            state.nudge_bpm(-step);
            println!("{}", status_line(state));
        }
        "duration" | "dur" => {
            state.set_duration(parse_arg(args, "duration")?);
            println!("{}", status_line(state));
        }
        "sub" | "subdivision" => {
            state.set_subdivision(parse_arg(args, "subdivision")?)?;
            println!("{}", status_line(state));
        }
        "ghost" => {
            let enabled = match args.first().map(|a| a.to_ascii_lowercase()).as_deref() {
                None => !state.ghost_mode(),
                Some("on") => true,
                Some("off") => false,
                Some(other) => bail!("expected 'on' or 'off', got '{}'", other),
            };
            state.set_ghost_mode(enabled);
            println!("{}", status_line(state));
        }
        "beats" => print_beats(state)?,
        "render" => {
            let path: PathBuf = parse_arg(args, "output path")?;
            run_render(state, &path)?;
        }
        "play" => {
            playback.play(state)?;
            println!("Playing: {}", status_line(state));
        }
        "stop" => playback.stop(),
        "log" => {
            if args.is_empty() {
                bail!("missing focus (groove, articulation, triplet, speed, freestyle)");
            }
            let focus: Focus = args.join(" ").parse()?;
            let entry = state.log_practice(focus);
            println!(
                "Logged {} BPM ({:.1} SPS) - {}",
                entry.bpm, entry.rate, entry.focus
            );
        }
        "history" => print_history(state),
        "chart" => {
            let lines = state.trend_chart(CHART_HEIGHT);
            if lines.is_empty() {
                println!("No takes logged yet.");
            }
            for line in lines {
                println!("{}", line);
            }
        }
        "csv" => write_csv(state.log().entries(), io::stdout().lock())?,
        "json" => {
            write_json(state.log().entries(), io::stdout().lock())?;
            println!();
        }
        "status" => println!("{}", status_line(state)),
        "help" | "?" => println!("{}", SESSION_HELP),
        "quit" | "exit" | "q" => return Ok(Flow::Quit),
        other => bail!("unknown command '{}' (type 'help')", other),
    }

    Ok(Flow::Continue)
}

fn run_session(config: &TrainerConfig, demo: bool) -> Result<()> {
    let log = if demo {
        SessionLog::with_demo_entries()
    } else {
        SessionLog::new()
    };
    let mut state = PracticeState::with_log(config, log);
    let mut playback = Playback::new();

    println!("Rap Cadence Trainer");
    println!("===================\n");
    println!("{}", status_line(&state));
    println!("Type 'help' for commands.\n");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    loop {
        write!(stdout, "> ")?;
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }

        match handle_command(&mut state, &mut playback, line.trim()) {
            Ok(Flow::Continue) => {}
            Ok(Flow::Quit) => break,
            Err(err) => eprintln!("error: {:#}", err),
        }
    }

    playback.stop();
    println!("\n{} takes logged this session.", state.log().len());
    Ok(())
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config = load_config(cli.config.as_deref())?;

    match cli.command {
        Command::Render { take, output } => {
            let mut state = PracticeState::new(&config);
            take.apply(&mut state)?;
            run_render(&state, &output)
        }
        #[cfg(feature = "streaming")]
        Command::Play { take } => {
            let mut state = PracticeState::new(&config);
            take.apply(&mut state)?;
            run_play(&state)
        }
        Command::Rate { bpm, subdivision } => {
            println!("{:.2}", derive_rate(bpm, subdivision));
            Ok(())
        }
        Command::Session { demo } => run_session(&config, demo),
    }
}
