//! End-to-end properties of reconstruction, legality, evaluation and search.

use chrono::NaiveDateTime;
use strictly_grids::{
    Board, ConnectFour, GameId, GameKind, Geometry, Move, MoveError, MoveId, Outcome, Player,
    Position, SearchLimits, Square, Target, TicTacToe, Variant, best_move, evaluate, reconstruct,
};

fn log(entries: &[(Player, usize, usize)]) -> Vec<Move> {
    let game_id = GameId::new_v4();
    entries
        .iter()
        .map(|&(player, row, col)| {
            Move::new(
                MoveId::new_v4(),
                game_id,
                player,
                Position::new(row, col),
                NaiveDateTime::default(),
            )
        })
        .collect()
}

fn board_from(geometry: Geometry, rows: &[&str]) -> Board {
    let mut board = Board::new(geometry);
    for (row, line) in rows.iter().enumerate() {
        for (col, ch) in line.chars().enumerate() {
            let square = match ch {
                'X' => Square::Occupied(Player::X),
                'O' => Square::Occupied(Player::O),
                _ => continue,
            };
            board.set(Position::new(row, col), square).expect("on board");
        }
    }
    board
}

#[test]
fn test_reconstruction_is_idempotent() {
    let moves = log(&[
        (Player::X, 5, 3),
        (Player::O, 4, 3),
        (Player::X, 5, 2),
        (Player::O, 5, 2),
    ]);
    let first = reconstruct(&moves, Geometry::CONNECT_FOUR);
    let second = reconstruct(&moves, Geometry::CONNECT_FOUR);
    assert_eq!(first, second);
    assert_eq!(first.occupied(), 3);
}

#[test]
fn test_tic_tac_toe_top_row_win() {
    let moves = log(&[
        (Player::X, 0, 0),
        (Player::O, 1, 1),
        (Player::X, 0, 1),
        (Player::O, 2, 2),
        (Player::X, 0, 2),
    ]);

    for n in 1..moves.len() {
        let board = TicTacToe.reconstruct(&moves[..n]);
        assert_eq!(TicTacToe.evaluate(&board), None, "no result after {n} moves");
    }

    let board = TicTacToe.reconstruct(&moves);
    assert_eq!(TicTacToe.evaluate(&board), Some(Outcome::Winner(Player::X)));
}

#[test]
fn test_connect_four_vertical_win() {
    let moves = log(&[
        (Player::O, 5, 3),
        (Player::O, 4, 3),
        (Player::O, 3, 3),
        (Player::O, 2, 3),
    ]);
    let board = ConnectFour.reconstruct(&moves);
    assert_eq!(ConnectFour.evaluate(&board), Some(Outcome::Winner(Player::O)));
}

#[test]
fn test_connect_four_diagonal_win() {
    let moves = log(&[
        (Player::O, 5, 0),
        (Player::O, 4, 1),
        (Player::O, 3, 2),
        (Player::O, 2, 3),
    ]);
    let board = ConnectFour.reconstruct(&moves);
    assert_eq!(evaluate(&board), Some(Outcome::Winner(Player::O)));
}

#[test]
fn test_legality_requires_expected_mover() {
    // Regression: the acting player must EQUAL the expected mover.
    let board = TicTacToe.new_board();
    let target = Target::Cell(Position::new(0, 0));
    assert!(TicTacToe.is_legal(&board, Player::X, target, Player::X));
    assert!(!TicTacToe.is_legal(&board, Player::O, target, Player::X));
    assert!(TicTacToe.is_legal(&board, Player::O, target, Player::O));
    assert!(!TicTacToe.is_legal(&board, Player::X, target, Player::O));
}

#[test]
fn test_legality_occupied_and_full_column() {
    let board = TicTacToe.reconstruct(&log(&[(Player::X, 1, 1)]));
    assert_eq!(
        TicTacToe.check_move(&board, Player::O, Target::Cell(Position::new(1, 1)), Player::O),
        Err(MoveError::SquareOccupied(Position::new(1, 1)))
    );
    assert!(TicTacToe.is_legal(&board, Player::O, Target::Cell(Position::new(1, 0)), Player::O));

    let column: Vec<_> = (0..6)
        .rev()
        .enumerate()
        .map(|(i, row)| (Player::to_move_after(i), row, 2))
        .collect();
    let board = ConnectFour.reconstruct(&log(&column));
    assert_eq!(
        ConnectFour.check_move(&board, Player::X, Target::Column(2), Player::X),
        Err(MoveError::ColumnFull(2))
    );
    assert_eq!(
        ConnectFour.check_move(&board, Player::X, Target::Column(1), Player::X),
        Ok(Position::new(5, 1))
    );
}

#[test]
fn test_full_board_without_line_is_tie() {
    let board = board_from(Geometry::TIC_TAC_TOE, &["XOX", "XOO", "OXX"]);
    assert_eq!(evaluate(&board), Some(Outcome::Tie));
}

#[test]
fn test_perfect_tic_tac_toe_self_play_ties() {
    let variant = GameKind::TicTacToe.variant();
    let mut board = variant.new_board();
    let mut to_move = Player::X;

    while variant.evaluate(&board).is_none() {
        let pos = best_move(&board, to_move, to_move.opponent()).expect("moves remain");
        board
            .set(pos, Square::Occupied(to_move))
            .expect("search picks on-board cells");
        to_move = to_move.opponent();
    }

    assert_eq!(variant.evaluate(&board), Some(Outcome::Tie));
}

#[test]
fn test_connect_four_blocks_single_threat() {
    // X threatens the down-left diagonal ending at (1, 6). O has no winning
    // drop, and every column other than 6 loses.
    let board = board_from(
        Geometry::CONNECT_FOUR,
        &[
            ".X..OO.", //
            "OXOXOO.", //
            "XOXOOXO", //
            "XXXOXXX", //
            "OOXXOXX", //
            "XXOOXOO", //
        ],
    );
    assert_eq!(ConnectFour.evaluate(&board), None);

    let chosen = ConnectFour
        .best_move(&board, Player::O, Player::X, SearchLimits::EXACT)
        .expect("moves remain");
    assert_eq!(chosen, Position::new(1, 6));
    assert_eq!(ConnectFour.target_for(chosen), Target::Column(6));
}

#[test]
fn test_connect_four_blocks_last_empty_top_row() {
    let board = board_from(
        Geometry::CONNECT_FOUR,
        &[
            "X.OX..X", //
            "XOOOXXX", //
            "OXOXOOX", //
            "OXXXOXO", //
            "XOOOXOX", //
            "XOXOXOO", //
        ],
    );
    assert_eq!(
        best_move(&board, Player::O, Player::X),
        Some(Position::new(0, 5))
    );
}
