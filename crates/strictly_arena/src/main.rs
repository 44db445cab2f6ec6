//! Strictly Arena - terminal front end.
//!
//! Plays grid games against the minimax opponent, shows stored games and
//! deletes them, using whichever store the configuration selects.

#![warn(missing_docs)]

mod cli;

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Command};
use std::io::{BufRead, Write};
use strictly_arena::{
    ArenaConfig, GameSession, GameStore, InMemoryStore, RestStore, SessionError, SqliteStore,
    StoreKind, SubmitOutcome,
};
use strictly_grids::{GameId, GameKind};
use tracing::{info, instrument, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,strictly_arena=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = resolve_config(&cli)?;
    let store = open_store(&config)?;

    match cli.command {
        Command::Play { game, game_id } => run_play(store, &config, game, game_id),
        Command::Show { game_id } => run_show(store, game_id),
        Command::Delete { game_id } => run_delete(store, game_id),
    }
}

/// Loads the config file and applies command-line overrides.
#[instrument(skip(cli), fields(config = %cli.config.display()))]
fn resolve_config(cli: &Cli) -> Result<ArenaConfig> {
    let mut config = ArenaConfig::load_or_default(&cli.config)?;
    if let Some(store) = cli.store {
        config = config.with_store(store);
    }
    if let Some(db_path) = &cli.db_path {
        config = config.with_db_path(db_path.clone());
    }
    if let Some(base_url) = &cli.base_url {
        config = config.with_base_url(base_url.clone());
    }
    if let Some(human) = cli.human {
        config = config.with_human_player(human);
    }
    if let Some(max_depth) = cli.max_depth {
        config = config.with_max_depth(max_depth);
    }
    info!(store = %config.store(), human = %config.human_player(), "Configuration resolved");
    Ok(config)
}

/// Builds the backend the configuration selects.
#[instrument(skip(config), fields(store = %config.store()))]
fn open_store(config: &ArenaConfig) -> Result<Box<dyn GameStore>> {
    Ok(match config.store() {
        StoreKind::Memory => Box::new(InMemoryStore::new()),
        StoreKind::Sqlite => Box::new(SqliteStore::open(config.db_path().clone())?),
        StoreKind::Rest => Box::new(RestStore::new(config.base_url().clone())),
    })
}

/// Interactive game loop on stdin/stdout.
#[instrument(skip(store, config))]
fn run_play(
    store: Box<dyn GameStore>,
    config: &ArenaConfig,
    game: GameKind,
    game_id: Option<GameId>,
) -> Result<()> {
    let settings = config.session_settings();
    let mut session = match game_id {
        Some(id) => GameSession::resume(store, id, settings)?,
        None => GameSession::open(store, game, settings)?,
    };
    let human = *settings.human();
    let variant = session.variant();

    println!("Game {} ({}). You play {}.", session.id(), variant.kind(), human);
    if let Some(opening) = session.moves().last().filter(|mv| *mv.player() != human) {
        println!("Computer plays {}", opening);
    }

    let stdin = std::io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("\n{}", session.render_board());
        if let Some(outcome) = session.state().outcome() {
            println!("{}", outcome);
            break;
        }

        print!("Your move ({}), or 'quit': ", variant.input_hint());
        std::io::stdout().flush()?;
        let Some(line) = lines.next().transpose()? else {
            break;
        };
        let line = line.trim();
        if line.eq_ignore_ascii_case("quit") {
            break;
        }
        let Some(target) = variant.parse_target(line) else {
            println!("Couldn't read '{}', expected {}", line, variant.input_hint());
            continue;
        };

        match session.submit_move(human, target) {
            Ok(SubmitOutcome::Continues { .. }) => {}
            Ok(SubmitOutcome::AiResponded { ai, .. }) => println!("Computer plays {}", ai),
            Ok(SubmitOutcome::Finished { ai, .. }) => {
                if let Some(ai) = ai {
                    println!("Computer plays {}", ai);
                }
            }
            Err(SessionError::IllegalMove(e)) => println!("Illegal move: {}", e),
            Err(e) => return Err(e.into()),
        }
    }

    println!("Game id: {}", session.id());
    Ok(())
}

/// Prints a stored game's board and result.
#[instrument(skip(store))]
fn run_show(store: Box<dyn GameStore>, game_id: GameId) -> Result<()> {
    let game = store.get_game(game_id)?;
    let moves = store.list_moves(game_id)?;
    let variant = game.kind().variant();
    let board = variant.reconstruct(&moves);

    println!("Game {} ({}), {} moves", game.id(), game.kind(), moves.len());
    print!("{}", variant.render(&board));
    match game.winner() {
        Some(outcome) => println!("{}", outcome),
        None => println!("In progress"),
    }
    Ok(())
}

/// Deletes a stored game.
#[instrument(skip(store))]
fn run_delete(store: Box<dyn GameStore>, game_id: GameId) -> Result<()> {
    match store.delete_game(game_id) {
        Ok(()) => {
            println!("Deleted game {}", game_id);
            Ok(())
        }
        Err(e) => {
            warn!(error = %e, "Delete failed");
            Err(e.into())
        }
    }
}
