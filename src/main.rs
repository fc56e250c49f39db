//! Realms - command line front end
//!
//! Matches live in snapshot files: `new` writes one, `play` appends root
//! events to it, `replay` folds it back into a state.

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use realms_engine::{
    config::GameConfig,
    core::PlayerId,
    events::{GameAction, GameEvent, LogicalClock, SystemClock},
    game::{
        compute_state_hash, format_hash, Engine, GameLogger, GameLoop, GameSnapshot, GameState, OutputFormat,
        SeededShuffler, VerbosityLevel,
    },
    loader::CardRegistry,
};
use std::path::{Path, PathBuf};

/// Verbosity level for game output (custom parser supporting both names and numbers)
#[derive(Debug, Clone, Copy)]
struct VerbosityArg(VerbosityLevel);

impl std::str::FromStr for VerbosityArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "silent" | "0" => Ok(VerbosityArg(VerbosityLevel::Silent)),
            "minimal" | "1" => Ok(VerbosityArg(VerbosityLevel::Minimal)),
            "normal" | "2" => Ok(VerbosityArg(VerbosityLevel::Normal)),
            "verbose" | "3" => Ok(VerbosityArg(VerbosityLevel::Verbose)),
            _ => Err(format!(
                "invalid verbosity level '{s}' (expected: silent/0, minimal/1, normal/2, verbose/3)"
            )),
        }
    }
}

impl From<VerbosityArg> for VerbosityLevel {
    fn from(arg: VerbosityArg) -> Self {
        arg.0
    }
}

#[derive(Debug, Clone, Copy)]
struct LogFormatArg(OutputFormat);

impl std::str::FromStr for LogFormatArg {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(LogFormatArg(OutputFormat::Text)),
            "json" => Ok(LogFormatArg(OutputFormat::Json)),
            _ => Err(format!("invalid log format '{s}' (expected: text, json)")),
        }
    }
}

/// Engine log options shared by `play` and `simulate`
#[derive(Debug, Clone, clap::Args)]
struct LogArgs {
    /// Engine log line format (text or json)
    #[arg(long, default_value = "text")]
    log_format: LogFormatArg,

    /// Buffer the engine log and print only its last N lines at the end
    #[arg(long, value_name = "N")]
    log_tail: Option<usize>,
}

impl LogArgs {
    fn logger(&self, verbosity: VerbosityLevel) -> GameLogger {
        let mut logger = GameLogger::with_verbosity(verbosity);
        logger.set_output_format(self.log_format.0);
        if self.log_tail.is_some() {
            logger.enable_capture();
        }
        logger
    }

    fn finish(&self, logger: &mut GameLogger) {
        if let Some(lines) = self.log_tail {
            logger.flush_tail(lines);
        }
    }
}

#[derive(Parser)]
#[command(name = "realms")]
#[command(about = "Realms - event-sourced deck-building rules engine", long_about = None)]
struct Cli {
    /// Card registry JSON (default: built-in base set)
    #[arg(long, global = true, value_name = "CARDS_FILE")]
    cards: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Set up a new match and save it as a snapshot
    New {
        /// Seating order, comma separated (first player goes first)
        #[arg(long, value_delimiter = ',', default_value = "Player 1,Player 2")]
        players: Vec<String>,

        /// Random seed for setup and every later reshuffle
        #[arg(long, default_value_t = 42)]
        seed: u64,

        /// Match configuration JSON
        #[arg(long, value_name = "CONFIG_FILE")]
        config: Option<PathBuf>,

        /// Output file for the snapshot
        #[arg(long, short = 'o', default_value = "game.snapshot")]
        output: PathBuf,
    },

    /// Apply root events to a saved match
    Play {
        /// Snapshot to extend (rewritten in place)
        snapshot: PathBuf,

        /// JSON file holding an array of events
        #[arg(long, value_name = "EVENTS_FILE")]
        events: Option<PathBuf>,

        /// A single event as inline JSON (repeatable)
        #[arg(long = "event", value_name = "JSON")]
        inline: Vec<String>,

        #[arg(long, default_value = "normal", short = 'v')]
        verbosity: VerbosityArg,

        #[command(flatten)]
        log: LogArgs,
    },

    /// Rebuild a saved match by pure replay and print it
    Replay {
        snapshot: PathBuf,

        /// Also print the display log
        #[arg(long)]
        log: bool,
    },

    /// List every card in the registry
    Cards,

    /// Run a scripted self-play match
    Simulate {
        #[arg(long, value_delimiter = ',', default_value = "Player 1,Player 2")]
        players: Vec<String>,

        #[arg(long, default_value_t = 42)]
        seed: u64,

        #[arg(long, default_value_t = 200)]
        max_turns: u32,

        /// Verbosity level for game output (0=silent, 1=minimal, 2=normal, 3=verbose)
        #[arg(long, default_value = "minimal", short = 'v')]
        verbosity: VerbosityArg,

        #[command(flatten)]
        log: LogArgs,

        /// Save the finished match as a snapshot
        #[arg(long, value_name = "SNAPSHOT_FILE")]
        output: Option<PathBuf>,
    },
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let loaded;
    let registry = match &cli.cards {
        Some(path) => {
            loaded = CardRegistry::load(path).with_context(|| format!("loading cards from {}", path.display()))?;
            &loaded
        }
        None => CardRegistry::standard(),
    };

    match cli.command {
        Commands::New {
            players,
            seed,
            config,
            output,
        } => run_new(registry, &players, seed, config.as_deref(), &output),
        Commands::Play {
            snapshot,
            events,
            inline,
            verbosity,
            log,
        } => run_play(registry, &snapshot, events.as_deref(), &inline, verbosity.into(), &log),
        Commands::Replay { snapshot, log } => run_replay(registry, &snapshot, log),
        Commands::Cards => {
            list_cards(registry);
            Ok(())
        }
        Commands::Simulate {
            players,
            seed,
            max_turns,
            verbosity,
            log,
            output,
        } => run_simulate(registry, &players, seed, max_turns, verbosity.into(), &log, output.as_deref()),
    }
}

fn seat(names: &[String]) -> Vec<PlayerId> {
    names.iter().map(|n| PlayerId::new(n.trim())).collect()
}

fn run_new(
    registry: &CardRegistry,
    players: &[String],
    seed: u64,
    config: Option<&Path>,
    output: &Path,
) -> anyhow::Result<()> {
    let config = match config {
        Some(path) => GameConfig::load(path).with_context(|| format!("loading config from {}", path.display()))?,
        None => GameConfig::default(),
    };

    let mut shuffler = SeededShuffler::new(seed);
    let base = {
        let mut engine = Engine::new(registry, config.clone(), Box::new(&mut shuffler));
        engine.setup(&seat(players))?
    };

    let snapshot = GameSnapshot::new(base, config).with_shuffler(shuffler);
    snapshot.save_to_file(output)?;

    println!("=== New Match ===");
    print_summary(&snapshot.base);
    println!("\nSnapshot saved to {}", output.display());
    Ok(())
}

fn read_roots(events: Option<&Path>, inline: &[String]) -> anyhow::Result<Vec<GameAction>> {
    let mut roots: Vec<GameAction> = match events {
        Some(path) => {
            let json = std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
            serde_json::from_str(&json).with_context(|| format!("parsing events in {}", path.display()))?
        }
        None => Vec::new(),
    };
    for json in inline {
        roots.push(serde_json::from_str(json).with_context(|| format!("parsing event {json}"))?);
    }
    Ok(roots)
}

fn run_play(
    registry: &CardRegistry,
    path: &Path,
    events: Option<&Path>,
    inline: &[String],
    verbosity: VerbosityLevel,
    log: &LogArgs,
) -> anyhow::Result<()> {
    let roots = read_roots(events, inline)?;
    if roots.is_empty() {
        bail!("no events given (use --events or --event)");
    }

    let mut snapshot = GameSnapshot::load_from_file(path)?;
    snapshot.validate(registry)?;
    let state = snapshot.current_state(registry)?;

    let mut clock = SystemClock::new();
    let roots: Vec<GameEvent> = roots.into_iter().map(|a| a.stamped(&mut clock)).collect();

    let mut shuffler = snapshot.shuffler.clone().unwrap_or_default();
    let step = {
        let mut engine = Engine::new(registry, snapshot.config.clone(), Box::new(&mut shuffler))
            .with_logger(log.logger(verbosity));
        let step = engine.materialize(&state, &roots)?;
        log.finish(engine.logger_mut());
        step
    };

    snapshot.append(&step);
    snapshot.shuffler = Some(shuffler);
    snapshot.save_to_file(path)?;

    println!(
        "\nApplied {} root events ({} events logged, {} ignored)",
        roots.len(),
        step.events.len(),
        step.ignored
    );
    print_summary(&step.state);
    Ok(())
}

fn run_replay(registry: &CardRegistry, path: &Path, show_log: bool) -> anyhow::Result<()> {
    let snapshot = GameSnapshot::load_from_file(path)?;
    snapshot.validate(registry)?;
    let state = snapshot.current_state(registry)?;

    println!("=== Replay ===");
    println!("Events: {}", snapshot.event_count());
    println!("State hash: {}", format_hash(compute_state_hash(&state)));
    if let Some(prompt) = snapshot.pending_prompt() {
        println!("Log awaits {} to answer {:?}", prompt.player, prompt.kind);
    }
    print_summary(&state);

    if show_log {
        println!("\n=== Log ===");
        for line in &state.log {
            println!("  [{}] {}", line.timestamp, line.message);
        }
    }
    Ok(())
}

fn list_cards(registry: &CardRegistry) {
    let mut cards = registry.cards();
    cards.sort_by(|a, b| (a.faction, a.cost, a.id.as_str()).cmp(&(b.faction, b.cost, b.id.as_str())));

    println!("{:<24} {:<28} {:>4}  {:<16} TYPE", "ID", "NAME", "COST", "FACTION");
    for card in cards {
        println!(
            "{:<24} {:<28} {:>4}  {:<16} {:?}",
            card.id.as_str(),
            card.name.as_str(),
            card.cost,
            format!("{:?}", card.faction),
            card.card_type
        );
    }
    println!("\n{} cards", registry.len());
}

fn run_simulate(
    registry: &CardRegistry,
    players: &[String],
    seed: u64,
    max_turns: u32,
    verbosity: VerbosityLevel,
    log: &LogArgs,
    output: Option<&Path>,
) -> anyhow::Result<()> {
    let config = GameConfig::default();
    let mut shuffler = SeededShuffler::new(seed);

    let (base, result) = {
        let mut engine = Engine::new(registry, config.clone(), Box::new(&mut shuffler))
            .with_logger(log.logger(verbosity));
        let base = engine.setup(&seat(players))?;
        let result = GameLoop::new(&mut engine)
            .with_max_turns(max_turns)
            .run_game(&base, &mut LogicalClock::new())?;
        log.finish(engine.logger_mut());
        (base, result)
    };

    if verbosity >= VerbosityLevel::Minimal {
        println!("\n=== Game Over ===");
        match &result.winner {
            Some(winner) => println!("Winner: {winner}"),
            None => println!("No winner"),
        }
        println!("Turns played: {}", result.turns_played);
        println!("Reason: {:?}", result.end_reason);
        println!("Events: {}", result.events.len());
        println!("\n=== Final State ===");
        print_summary(&result.state);
    }

    if let Some(path) = output {
        let mut snapshot = GameSnapshot::new(base, config).with_shuffler(shuffler);
        snapshot.events = result.events.into();
        snapshot.save_to_file(path)?;
        println!("\nSnapshot saved to {}", path.display());
    }
    Ok(())
}

fn print_summary(state: &GameState) {
    println!("Turn {} ({:?})", state.turn.turn_number, state.turn.phase);
    for id in &state.player_order {
        let Some(p) = state.player(id) else { continue };
        let marker = if state.active_player_id() == Some(id) { "*" } else { " " };
        let status = if p.is_dead { " [eliminated]" } else { "" };
        println!(
            " {marker}{id}: {} authority, {} trade, {} combat | hand {} deck {} discard {} bases {}{status}",
            p.authority,
            p.trade,
            p.combat,
            p.hand.len(),
            p.deck.len(),
            p.discard.len(),
            p.bases.len()
        );
    }

    let row: Vec<String> = state
        .row
        .iter()
        .map(|slot| slot.as_ref().map_or_else(|| "-".to_string(), |c| c.to_string()))
        .collect();
    println!("Trade row: [{}] ({} left in deck)", row.join(", "), state.trade_deck.len());

    if let Some(prompt) = &state.prompt {
        let kind = if prompt.optional { "optional" } else { "mandatory" };
        println!("Pending {kind} prompt for {}: {:?}", prompt.player, prompt.kind);
    }
    if let Some(winner) = state.winner() {
        println!("Game over: {winner} wins");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_flags_configure_logger() {
        let cli = Cli::try_parse_from(["realms", "simulate", "--log-format", "json", "--log-tail", "5"]).unwrap();
        let Commands::Simulate { log, .. } = cli.command else {
            panic!("expected simulate");
        };
        assert_eq!(log.log_tail, Some(5));
        assert!(matches!(log.log_format.0, OutputFormat::Json));

        let mut logger = log.logger(VerbosityLevel::Normal);
        assert!(logger.is_capturing());
        logger.normal("captured, not printed");
        assert_eq!(logger.logs().len(), 1);
        log.finish(&mut logger);
        assert!(logger.logs().is_empty());
    }

    #[test]
    fn test_default_log_args_print_directly() {
        let cli = Cli::try_parse_from(["realms", "play", "game.snapshot", "--event", "{}"]).unwrap();
        let Commands::Play { log, .. } = cli.command else {
            panic!("expected play");
        };
        assert_eq!(log.log_tail, None);
        assert!(!log.logger(VerbosityLevel::Normal).is_capturing());
        assert!("yaml".parse::<LogFormatArg>().is_err());
    }
}
