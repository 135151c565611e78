use std::{
    io::{self, Read, Write},
    os::fd::AsRawFd,
    path::PathBuf,
    sync::Arc,
    time::Duration,
};

use aho_corasick::AhoCorasick;
use anyhow::Context;
use clap::Parser;
use lib_2048::{
    ai::{expectimax::ExpectimaxAi, random::RandomAi, Ai},
    config::{AiConfig, DEFAULT_BOARD_SIZE},
    game::{Game, GameStatus},
    hint::{hint_with_timeout, HintProvider, LocalProvider, ProviderChain},
    persist::{BestScoreStore, JsonFileStore},
    Board, Direction,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod render;

const HINT_TIMEOUT: Duration = Duration::from_secs(5);

/// Play 2048 in the terminal.
#[derive(Parser, Debug)]
#[command(name = "term-2048", version)]
struct Args {
    /// Board side length (4, 5 or 6).
    #[arg(long, default_value_t = DEFAULT_BOARD_SIZE)]
    size: usize,

    /// Seed for tile spawns; random when omitted.
    #[arg(long)]
    seed: Option<u64>,

    /// JSON file holding best scores per board size.
    #[arg(long, default_value = "best_scores.json")]
    store: PathBuf,

    /// JSON file with search depth and evaluation weights.
    #[arg(long)]
    weights: Option<PathBuf>,

    /// Let the expectimax AI play.
    #[arg(long, conflicts_with_all = ["random", "hint"])]
    ai: bool,

    /// Play uniformly random moves.
    #[arg(long, conflicts_with = "hint")]
    random: bool,

    /// Print the suggested move for a JSON board (`null` for empty cells) and exit.
    #[arg(long, value_name = "BOARD_JSON")]
    hint: Option<String>,
}

#[derive(Clone, Copy, Debug)]
enum Key {
    Move(Direction),
    Hint,
    Pause,
    Continue,
    Restart,
    Quit,
}

const KEYS: [(&str, Key); 9] = [
    ("\x1b[D", Key::Move(Direction::Left)),
    ("\x1b[C", Key::Move(Direction::Right)),
    ("\x1b[A", Key::Move(Direction::Up)),
    ("\x1b[B", Key::Move(Direction::Down)),
    ("h", Key::Hint),
    ("p", Key::Pause),
    ("c", Key::Continue),
    ("r", Key::Restart),
    ("q", Key::Quit),
];

fn header<S: BestScoreStore, R: Rng>(game: &Game<S, R>, message: &str) -> String {
    let status = match game.status() {
        GameStatus::Playing => message,
        GameStatus::Paused => "Paused (p to resume)",
        GameStatus::Won => "You win! (c to continue, r to restart)",
        GameStatus::Lost => "Game over (r to restart, q to quit)",
    };

    format!(
        "{} | Score: {} | Best: {} | {status}",
        game.config().name,
        game.score(),
        game.best_score()
    )
}

fn play_interactive<S: BestScoreStore, R: Rng>(
    out: &mut impl Write,
    input: &mut (impl AsRawFd + Read),
    game: &mut Game<S, R>,
    hints: &Arc<ProviderChain>,
) -> anyhow::Result<()> {
    let _raw_mode = render::RawMode::enable(input).context("failed to configure terminal")?;

    let input_searcher = AhoCorasick::new(KEYS.iter().map(|&(pattern, _)| pattern))?;

    let mut buf = [0u8; 128];
    let mut buf_len = 0;
    let mut message = String::new();

    writeln!(out, "arrows: move  h: hint  p: pause  c: continue  r: restart  q: quit")?;
    render::draw_board(out, game.board(), &header(game, &message))?;

    loop {
        let read = input.read(&mut buf[buf_len..])?;

        if read == 0 {
            break;
        }

        buf_len += read;

        let keys: Vec<Key> = input_searcher
            .find_iter(&buf[..buf_len])
            .map(|m| KEYS[m.pattern().as_usize()].1)
            .collect();

        for key in keys {
            let old_board = game.board().clone();
            message.clear();

            match key {
                Key::Move(direction) => {
                    game.apply_move(direction);
                }
                Key::Hint => {
                    let board = game.board().clone();

                    message = match hint_with_timeout(Arc::clone(hints), board, HINT_TIMEOUT) {
                        Ok(direction) => format!("Hint: {direction}"),
                        Err(err) => {
                            warn!(%err, "no hint");
                            "No hint available".to_owned()
                        }
                    };
                }
                Key::Pause if game.status() == GameStatus::Paused => game.resume(),
                Key::Pause => game.pause(),
                Key::Continue => game.continue_playing(),
                Key::Restart => game.restart(),
                Key::Quit => {
                    writeln!(out)?;
                    return Ok(());
                }
            }

            render::redraw_board(out, &old_board, game.board(), &header(game, &message))?;
        }

        // Keep a partial escape sequence for the next read.
        buf_len = match &buf[..buf_len] {
            [.., 0x1b, b'['] => {
                buf[..2].copy_from_slice(b"\x1b[");
                2
            }
            [.., 0x1b] => {
                buf[0] = 0x1b;
                1
            }
            _ => 0,
        }
    }

    Ok(())
}

fn play_ai<S: BestScoreStore, R: Rng>(
    out: &mut impl Write,
    game: &mut Game<S, R>,
    ai: &mut impl Ai,
) -> io::Result<()> {
    render::draw_board(out, game.board(), &header(game, ""))?;

    loop {
        match game.status() {
            GameStatus::Playing => {}
            // Autoplay keeps going past the winning tile.
            GameStatus::Won => game.continue_playing(),
            GameStatus::Paused | GameStatus::Lost => break,
        }

        let Some(direction) = ai.get_next_move(game.board()) else {
            break;
        };

        let old_board = game.board().clone();
        game.apply_move(direction);

        render::redraw_board(out, &old_board, game.board(), &header(game, ""))?;
    }

    info!(
        score = game.score(),
        max_tile = game.board().max_tile(),
        "autoplay finished"
    );

    writeln!(out, "Game over")
}

fn print_hint(board_json: &str, ai_config: &AiConfig) -> anyhow::Result<()> {
    let board: Board = serde_json::from_str(board_json).context("invalid board")?;

    let direction = LocalProvider::new(ai_config.search, ai_config.weights).get_hint(&board)?;

    println!("{direction}");

    Ok(())
}

fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    let ai_config = match &args.weights {
        Some(path) => AiConfig::load(path)
            .with_context(|| format!("failed to load {}", path.display()))?,
        None => AiConfig::default(),
    };

    if let Some(board_json) = &args.hint {
        return print_hint(board_json, &ai_config);
    }

    let mut rng = match args.seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_entropy(),
    };
    let ai_rng = ChaCha8Rng::seed_from_u64(rng.gen());

    let store = JsonFileStore::new(&args.store);
    let mut game = Game::with_size(args.size, store, rng)?;

    info!(size = game.size(), store = %args.store.display(), "starting game");

    let mut stdout = io::stdout().lock();

    if args.ai {
        let mut ai = ExpectimaxAi::new(ai_config.search, ai_config.weights);
        play_ai(&mut stdout, &mut game, &mut ai)?;
    } else if args.random {
        play_ai(&mut stdout, &mut game, &mut RandomAi::new(ai_rng))?;
    } else {
        let hints = Arc::new(
            ProviderChain::new()
                .with_provider(LocalProvider::new(ai_config.search, ai_config.weights)),
        );

        play_interactive(&mut stdout, &mut io::stdin().lock(), &mut game, &hints)?;
    }

    Ok(())
}
