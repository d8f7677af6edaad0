use std::fmt::Write;

use anyhow::Result;
use core_mechanics::bank::Funds;
use core_mechanics::board::{Board, ProductionTier};
use core_mechanics::gem::Gem;
use core_mechanics::player::Player;
use core_mechanics::production_card::{CardId, Identifiable, ProductionCard};
use tokio::sync::mpsc;

fn short(gem: Gem) -> char {
    match gem {
        Gem::White => 'W',
        Gem::Blue => 'U',
        Gem::Green => 'G',
        Gem::Red => 'R',
        Gem::Black => 'K',
        Gem::Gold => '*',
    }
}

fn render_funds(funds: &Funds, gems: &[Gem]) -> String {
    gems.iter()
        .filter(|gem| funds.get(**gem) > 0)
        .map(|gem| format!("{}{}", funds.get(*gem), short(*gem)))
        .collect::<Vec<String>>()
        .join(" ")
}

fn render_card(card: &Identifiable<ProductionCard, CardId>) -> String {
    format!(
        "[{}] {} ({} pts, gives {}) costs {}",
        card.uid,
        card.data.name,
        card.data.points,
        card.data.produces,
        render_funds(&card.data.cost, &Gem::COLORED)
    )
}

fn render_player(player: &Player, is_current: bool) -> String {
    let mut text = String::new();
    let marker = if is_current { ">" } else { " " };
    let ai = if player.is_ai { " (AI)" } else { "" };
    let _ = writeln!(
        text,
        "{} {}{}: {} pts | tokens {} | bonus {}",
        marker,
        player.display_name(),
        ai,
        player.points,
        render_funds(&player.funds, &Gem::ALL),
        render_funds(&player.get_production(), &Gem::COLORED),
    );
    for card in &player.reserved_cards {
        let _ = writeln!(text, "    reserved {}", render_card(card));
    }
    for noble in &player.nobles {
        let _ = writeln!(text, "    noble {}", noble.name);
    }
    text
}

/// The whole table as text, tier three on top.
pub fn render_board(board: &Board) -> String {
    let mut text = String::new();
    let _ = writeln!(
        text,
        "=== turn {} | bank {} ===",
        board.get_turn_count() + 1,
        render_funds(&board.bank, &Gem::ALL)
    );
    for noble in board.get_nobles() {
        let _ = writeln!(
            text,
            "noble {} ({} pts) needs bonus {}",
            noble.name,
            noble.points,
            render_funds(&noble.requirement, &Gem::COLORED)
        );
    }
    for tier in ProductionTier::ALL.iter().rev() {
        let _ = writeln!(
            text,
            "-- {} ({} left in deck)",
            tier,
            board.get_deck(tier).len()
        );
        for card in board.get_cards_for_sale(tier) {
            let _ = writeln!(text, "  {}", render_card(card));
        }
    }
    let current = board.get_who_is_playing_now().id;
    for player in board.get_players() {
        text.push_str(&render_player(player, player.id == current && !board.is_over()));
    }
    for line in board.get_log() {
        let _ = writeln!(text, "  * {}", line);
    }
    text
}

pub fn render_standings(board: &Board) -> String {
    let mut text = String::from("=== final standings ===\n");
    for (place, player) in board.final_standings().into_iter().enumerate() {
        let _ = writeln!(
            text,
            "{}. {} with {} pts",
            place + 1,
            player.display_name(),
            player.points
        );
    }
    text
}

/// Reads stdin on its own thread and hands every line to the async side.
pub fn spawn_input_reader() -> mpsc::Receiver<String> {
    let (line_tx, line_rx) = mpsc::channel(1);
    std::thread::spawn(move || input_loop(line_tx));
    line_rx
}

fn input_loop(line_tx: mpsc::Sender<String>) -> Result<()> {
    let mut buffer = String::new();
    let stdin = std::io::stdin();
    loop {
        if stdin.read_line(&mut buffer)? == 0 {
            return Ok(());
        }
        line_tx.blocking_send(buffer.clone())?;
        buffer.clear();
    }
}

#[cfg(test)]
mod tests {
    use core_mechanics::original_game::{get_original_game_board, new_roster};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    use super::*;

    #[test]
    fn board_shows_every_face_up_card_and_player() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let board = get_original_game_board(new_roster(&["Minji".to_string()], 1), &mut rng).unwrap();

        let text = render_board(&board);

        for card in board.get_all_cards_for_sale() {
            assert!(text.contains(card.uid.as_str()));
        }
        assert!(text.contains("> Minji: 0 pts"));
        assert!(text.contains("AI Director (AI)"));
        assert!(text.contains("bank 7W 7U 7G 7R 7K 5*"));
    }

    #[test]
    fn standings_are_numbered() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let board = get_original_game_board(new_roster(&["Minji".to_string()], 1), &mut rng).unwrap();

        let text = render_standings(&board);

        assert!(text.contains("1. Minji with 0 pts"));
        assert!(text.contains("2. AI Director with 0 pts"));
    }
}
