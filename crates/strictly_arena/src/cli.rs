//! Command-line interface for strictly_arena.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use strictly_arena::StoreKind;
use strictly_grids::{GameId, GameKind, Player};

/// Strictly Arena - play tic-tac-toe and connect-four against a minimax opponent
#[derive(Parser, Debug)]
#[command(name = "strictly_arena")]
#[command(about = "Grid games against a minimax opponent", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Path to the TOML config file (defaults apply if it doesn't exist)
    #[arg(long, global = true, default_value = "strictly_arena.toml")]
    pub config: PathBuf,

    /// Backend that keeps games
    #[arg(long, global = true, value_enum)]
    pub store: Option<StoreKind>,

    /// Path to the SQLite database file
    #[arg(long, global = true)]
    pub db_path: Option<String>,

    /// Base URL of the REST game service
    #[arg(long, global = true)]
    pub base_url: Option<String>,

    /// Which mark the human plays (X moves first)
    #[arg(long, global = true)]
    pub human: Option<Player>,

    /// Limit the computer's search to this many plies
    #[arg(long, global = true)]
    pub max_depth: Option<usize>,

    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a game in the terminal
    Play {
        /// Game to start: tictactoe or connect4
        #[arg(long, default_value = "TicTacToe")]
        game: GameKind,

        /// Resume an existing game instead of starting one
        #[arg(long)]
        game_id: Option<GameId>,
    },

    /// Print a stored game's board and result
    Show {
        /// Game to show
        #[arg(long)]
        game_id: GameId,
    },

    /// Delete a stored game
    Delete {
        /// Game to delete
        #[arg(long)]
        game_id: GameId,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_play_with_overrides() {
        let cli = Cli::parse_from([
            "strictly_arena",
            "play",
            "--game",
            "connect4",
            "--store",
            "memory",
            "--human",
            "O",
            "--max-depth",
            "5",
        ]);
        assert_eq!(cli.store, Some(StoreKind::Memory));
        assert_eq!(cli.human, Some(Player::O));
        assert_eq!(cli.max_depth, Some(5));
        assert!(matches!(
            cli.command,
            Command::Play {
                game: GameKind::Connect4,
                game_id: None
            }
        ));
    }

    #[test]
    fn test_parse_show_requires_valid_id() {
        let id = GameId::new_v4();
        let cli = Cli::parse_from(["strictly_arena", "show", "--game-id", &id.to_string()]);
        assert!(matches!(cli.command, Command::Show { game_id } if game_id == id));
        assert!(Cli::try_parse_from(["strictly_arena", "show", "--game-id", "nope"]).is_err());
    }
}
