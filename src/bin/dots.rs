//! Dots & Boxes - command line front-end
//!
//! `play` runs an offline hot-seat match on the terminal. `simulate` runs a
//! full online match between two in-process peers and checks that both
//! replicas agree at the end.

use std::io::{self, BufRead, Write};

use anyhow::{bail, ensure, Context, Result};
use clap::{Parser, Subcommand};
use dots_boxes::core::DEFAULT_GRID_SIZE;
use dots_boxes::protocol::{MemoryEndpoint, MemoryNetwork};
use dots_boxes::{
    legal_moves, BoardSnapshot, Edge, Game, GameResult, Orientation, Player, Session,
    SessionConfig, SessionEvent, SessionPhase, SessionRng,
};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dots", version, about = "Dots & Boxes")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Offline hot-seat match on this terminal
    Play {
        /// Dots per side
        #[arg(long, default_value_t = DEFAULT_GRID_SIZE)]
        size: usize,

        /// Name of the first player
        #[arg(long, default_value = "Player 1")]
        first: String,

        /// Name of the second player
        #[arg(long, default_value = "Player 2")]
        second: String,
    },

    /// Two in-process peers play a random online match
    Simulate {
        /// Dots per side
        #[arg(long, default_value_t = DEFAULT_GRID_SIZE)]
        size: usize,

        /// Seed for room code and move choice
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Play {
            size,
            first,
            second,
        } => run_play(size, first, second),
        Command::Simulate { size, seed } => run_simulate(size, seed),
    }
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "dots_boxes=debug,dots=debug",
        _ => "dots_boxes=trace,dots=trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)))
        .with_writer(io::stderr)
        .init();
}

// =============================================================================
// Offline play
// =============================================================================

enum Input {
    Move(Edge),
    Restart,
    Quit,
}

fn parse_input(line: &str) -> Result<Input> {
    let mut parts = line.split_whitespace();
    let head = parts.next().context("empty input")?;
    let orientation = match head {
        "quit" | "q" => return Ok(Input::Quit),
        "restart" | "r" => return Ok(Input::Restart),
        "h" => Orientation::Horizontal,
        "v" => Orientation::Vertical,
        other => bail!("unknown command {other:?} (try `h ROW COL`, `v ROW COL`, `restart`, `quit`)"),
    };
    let row: usize = parts.next().context("missing row")?.parse().context("row must be a number")?;
    let col: usize = parts.next().context("missing col")?.parse().context("col must be a number")?;
    ensure!(parts.next().is_none(), "too many arguments");
    Ok(Input::Move(Edge::new(orientation, row, col)))
}

fn run_play(size: usize, first: String, second: String) -> Result<()> {
    let config = SessionConfig::offline(first, second, size);
    let mut game = Game::new(config).context("invalid match settings")?;
    info!(size, "offline match started");

    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut lines = stdin.lock().lines();

    loop {
        let snapshot = game.snapshot();
        writeln!(stdout, "{}", render(&snapshot))?;
        writeln!(stdout, "{}", scoreline(game.config(), &snapshot))?;
        if let Some(result) = snapshot.winner {
            writeln!(stdout, "{}", announce(game.config(), result))?;
            writeln!(stdout, "`restart` for a new game, `quit` to leave")?;
        } else {
            let name = game.config().name_of(snapshot.current_player);
            write!(stdout, "{name}> ")?;
        }
        stdout.flush()?;

        let Some(line) = lines.next() else {
            return Ok(());
        };
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        match parse_input(&line) {
            Ok(Input::Quit) => return Ok(()),
            Ok(Input::Restart) => game.restart(),
            Ok(Input::Move(edge)) => {
                if game.submit(edge).is_none() {
                    writeln!(stdout, "{edge} is not available")?;
                }
            }
            Err(error) => writeln!(stdout, "{error:#}")?,
        }
    }
}

// =============================================================================
// Simulated online match
// =============================================================================

fn run_simulate(size: usize, seed: Option<u64>) -> Result<()> {
    let mut rng = seed.map_or_else(SessionRng::from_entropy, SessionRng::new);
    let network = MemoryNetwork::new();

    let host_rng = seed.map_or_else(SessionRng::from_entropy, |s| SessionRng::new(s.wrapping_add(1)));
    let mut host = Session::with_rng(network.endpoint(), host_rng);
    let mut guest = Session::new(network.endpoint());

    let room = host.host("Host", size).context("could not host")?;
    guest
        .join("Guest", &room.to_string())
        .context("could not join")?;
    info!(%room, "peers connecting");

    settle(&mut host, &mut guest);
    ensure!(
        host.phase() == SessionPhase::Active && guest.phase() == SessionPhase::Active,
        "handshake did not complete (host {}, guest {})",
        host.phase(),
        guest.phase()
    );

    let mut moves = 0u32;
    loop {
        let host_turn = match (host.game(), guest.game()) {
            (Some(h), Some(_)) if h.state().is_over() => break,
            (Some(h), Some(_)) => h.can_move(),
            _ => bail!("session ended early"),
        };
        let mover = if host_turn { &mut host } else { &mut guest };
        let state = mover
            .game()
            .map(|g| g.state().clone())
            .context("mover has no game")?;
        let options = legal_moves(&state);
        let edge = *rng.choose(&options).context("no legal moves left")?;
        debug!(%edge, mover = %state.current_player(), "simulated move");
        mover.play(edge)?;
        moves += 1;
        settle(&mut host, &mut guest);
    }

    let (Some(h), Some(g)) = (host.game(), guest.game()) else {
        bail!("session ended early");
    };
    ensure!(h.state() == g.state(), "replicas diverged");

    let snapshot = h.snapshot();
    println!("{}", render(&snapshot));
    println!("{}", scoreline(h.config(), &snapshot));
    if let Some(result) = snapshot.winner {
        println!("{}", announce(h.config(), result));
    }
    println!("room {room}, {moves} moves, replicas agree");

    host.quit();
    guest.pump();
    for event in guest.drain_events() {
        debug!(?event, "guest event");
    }
    Ok(())
}

/// Pump both peers until neither has pending transport events.
fn settle(host: &mut Session<MemoryEndpoint>, guest: &mut Session<MemoryEndpoint>) {
    while host.pump() + guest.pump() > 0 {}
    for event in host.drain_events().into_iter().chain(guest.drain_events()) {
        if let SessionEvent::Status(text) = &event {
            info!(status = %text);
        }
    }
}

// =============================================================================
// Rendering
// =============================================================================

fn render(snapshot: &BoardSnapshot) -> String {
    let mut out = String::new();
    out.push_str("   ");
    for col in 0..snapshot.size {
        out.push_str(&format!("{col:<4}"));
    }
    out.push('\n');

    for row in 0..snapshot.size {
        out.push_str(&format!("{row:>2} "));
        for col in 0..snapshot.size {
            out.push('•');
            if col + 1 < snapshot.size {
                out.push_str(if snapshot.horizontal[row][col] { "───" } else { "   " });
            }
        }
        out.push('\n');

        if row + 1 < snapshot.size {
            out.push_str("   ");
            for col in 0..snapshot.size {
                out.push(if snapshot.vertical[row][col] { '│' } else { ' ' });
                if col + 1 < snapshot.size {
                    let mark = match snapshot.boxes[row][col] {
                        Some(Player::First) => " 1 ",
                        Some(Player::Second) => " 2 ",
                        None => "   ",
                    };
                    out.push_str(mark);
                }
            }
            out.push('\n');
        }
    }
    out
}

fn scoreline(config: &SessionConfig, snapshot: &BoardSnapshot) -> String {
    format!(
        "{}: {}  {}: {}",
        config.first_name,
        snapshot.scores[Player::First],
        config.second_name,
        snapshot.scores[Player::Second]
    )
}

fn announce(config: &SessionConfig, result: GameResult) -> String {
    match result {
        GameResult::Winner(player) => format!("{} wins!", config.name_of(player)),
        GameResult::Draw => "It's a draw!".to_string(),
    }
}
