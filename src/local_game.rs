use std::time::Duration;

use anyhow::Result;
use core_mechanics::board::Board;
use tokio::sync::mpsc;
use tracing::{info, warn};

use crate::command::{Command, HELP};
use crate::oracle::{choose_ai_action, MoveOracle};
use crate::terminal::{render_board, render_standings};

#[derive(Debug, Clone, Copy)]
pub struct LocalGameOptions {
    /// How long an AI seat may think before the fallback move is played.
    pub oracle_timeout: Duration,
    /// Pause before an AI move, so humans can follow along.
    pub ai_delay: Duration,
}

impl Default for LocalGameOptions {
    fn default() -> Self {
        Self {
            oracle_timeout: Duration::from_secs(5),
            ai_delay: Duration::from_millis(600),
        }
    }
}

#[derive(Debug)]
pub enum TurnOutcome {
    Played(Board),
    Unchanged,
    Quit,
}

/// Plays one step for whoever sits at the current seat. Human seats read one
/// line from `input`; a closed input counts as quitting.
pub async fn play_turn(
    board: &Board,
    oracle: &dyn MoveOracle,
    options: &LocalGameOptions,
    input: &mut mpsc::Receiver<String>,
) -> Result<TurnOutcome> {
    let player = board.get_who_is_playing_now();

    if player.is_ai {
        tokio::time::sleep(options.ai_delay).await;
        let action = choose_ai_action(oracle, board, options.oracle_timeout).await;
        let next = board.do_action(&action)?;
        return Ok(TurnOutcome::Played(next));
    }

    println!("{}, your move:", player.display_name());
    let Some(line) = input.recv().await else {
        return Ok(TurnOutcome::Quit);
    };

    let command = match line.parse::<Command>() {
        Ok(command) => command,
        Err(error) => {
            println!("! {}", error);
            return Ok(TurnOutcome::Unchanged);
        }
    };

    match command {
        Command::Play(action) => match board.do_action(&action) {
            Ok(next) => Ok(TurnOutcome::Played(next)),
            Err(violation) => {
                println!("! {}", violation);
                Ok(TurnOutcome::Unchanged)
            }
        },
        Command::Show => {
            print!("{}", render_board(board));
            Ok(TurnOutcome::Unchanged)
        }
        Command::Help => {
            println!("{}", HELP);
            Ok(TurnOutcome::Unchanged)
        }
        Command::Join | Command::Start => {
            println!("! only available at a shared table");
            Ok(TurnOutcome::Unchanged)
        }
        Command::Quit => Ok(TurnOutcome::Quit),
    }
}

/// Runs a game on this terminal until someone wins or a human quits.
pub async fn run_local_game(
    board: Board,
    oracle: &dyn MoveOracle,
    options: LocalGameOptions,
    mut input: mpsc::Receiver<String>,
) -> Result<Board> {
    let mut board = board;
    println!("{}", HELP);
    print!("{}", render_board(&board));

    while !board.is_over() {
        match play_turn(&board, oracle, &options, &mut input).await {
            Ok(TurnOutcome::Played(next)) => {
                board = next;
                print!("{}", render_board(&board));
            }
            Ok(TurnOutcome::Unchanged) => (),
            Ok(TurnOutcome::Quit) => {
                info!(turn = board.get_turn_count(), "game abandoned");
                return Ok(board);
            }
            Err(error) => warn!(%error, "turn could not be played"),
        }
    }

    print!("{}", render_standings(&board));
    Ok(board)
}

#[cfg(test)]
mod tests {
    use core_mechanics::board::Action;
    use core_mechanics::gem::Gem;
    use core_mechanics::original_game::{get_original_game_board, new_roster};
    use core_mechanics::strategy::GreedyStrategy;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;
    use crate::oracle::HeuristicOracle;

    fn get_board(humans: &[&str], ai_players: usize) -> Board {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let names: Vec<String> = humans.iter().map(|n| n.to_string()).collect();
        get_original_game_board(new_roster(&names, ai_players), &mut rng).unwrap()
    }

    fn options() -> LocalGameOptions {
        LocalGameOptions {
            oracle_timeout: Duration::from_secs(1),
            ai_delay: Duration::ZERO,
        }
    }

    #[tokio::test]
    async fn human_turn_applies_a_typed_command() {
        let board = get_board(&["Minji", "Dohyun"], 0);
        let (tx, mut rx) = mpsc::channel(4);
        tx.send("take w u g\n".to_string()).await.unwrap();
        let oracle = HeuristicOracle::<GreedyStrategy>::default();

        let outcome = play_turn(&board, &oracle, &options(), &mut rx).await.unwrap();

        let TurnOutcome::Played(next) = outcome else {
            panic!("expected the move to be played");
        };
        let expected = board
            .do_action(&Action::CollectDifferent {
                gems: vec![Gem::White, Gem::Blue, Gem::Green],
            })
            .unwrap();
        assert_eq!(next, expected);
    }

    #[tokio::test]
    async fn illegal_or_garbled_input_keeps_the_board() {
        let board = get_board(&["Minji", "Dohyun"], 0);
        let (tx, mut rx) = mpsc::channel(4);
        tx.send("take gold w".to_string()).await.unwrap();
        tx.send("fly".to_string()).await.unwrap();
        drop(tx);
        let oracle = HeuristicOracle::<GreedyStrategy>::default();

        for _ in 0..2 {
            let outcome = play_turn(&board, &oracle, &options(), &mut rx).await.unwrap();
            assert!(matches!(outcome, TurnOutcome::Unchanged));
        }
        let outcome = play_turn(&board, &oracle, &options(), &mut rx).await.unwrap();
        assert!(matches!(outcome, TurnOutcome::Quit));
    }

    #[tokio::test]
    async fn ai_seat_plays_without_input() {
        let board = get_board(&[], 2);
        let (_tx, mut rx) = mpsc::channel(1);
        let oracle = HeuristicOracle::<GreedyStrategy>::default();

        let outcome = play_turn(&board, &oracle, &options(), &mut rx).await.unwrap();

        assert!(matches!(outcome, TurnOutcome::Played(next) if next.get_turn_count() == 1));
    }
}
