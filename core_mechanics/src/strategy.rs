use std::cmp::Reverse;

use super::bank::MIN_PILE_SIZE_TO_COLLECT_TWO_EQUALS;
use super::board::{Action, Board, ProductionTier};
use super::gem::Gem;
use super::player::MAXIMUM_RESERVED_CARDS;
use super::production_card::{CardId, Identifiable, ProductionCard};

/// Something that picks a move for whoever is playing now.
pub trait Strategy {
    fn choose_action(&self, board: &Board) -> Action;
}

/// Buys the best card it can afford, otherwise reserves or saves up for the
/// most valuable card on the table.
#[derive(Debug, Default, Clone, Copy)]
pub struct GreedyStrategy;

impl Strategy for GreedyStrategy {
    fn choose_action(&self, board: &Board) -> Action {
        let action = self.propose(board);
        if board.do_action(&action).is_ok() {
            action
        } else {
            fallback_action(board)
        }
    }
}

impl GreedyStrategy {
    fn propose(&self, board: &Board) -> Action {
        let player = board.get_who_is_playing_now();

        let best_buy = ProductionTier::ALL
            .iter()
            .flat_map(|tier| board.get_cards_for_sale(tier))
            .chain(player.reserved_cards.iter())
            .filter(|card| player.can_afford(&card.data))
            .min_by_key(|card| (Reverse(card.data.points), card.data.total_cost()));
        if let Some(card) = best_buy {
            return Action::BuyCard {
                card_id: card.uid.clone(),
            };
        }

        let Some(target) = most_valuable_for_sale(board) else {
            return fallback_action(board);
        };

        if player.reserved_cards.len() < MAXIMUM_RESERVED_CARDS {
            return Action::ReserveCardFromBoard {
                card_id: target.uid.clone(),
            };
        }

        let production = player.get_production();
        let mut gems: Vec<Gem> = Gem::COLORED
            .into_iter()
            .filter(|gem| {
                let need = target.data.cost.get(*gem).saturating_sub(production.get(*gem));
                player.funds.get(*gem) < need && board.bank.get(*gem) > 0
            })
            .take(3)
            .collect();
        for gem in board.bank.available() {
            if gems.len() >= 2 {
                break;
            }
            if !gem.is_wildcard() && !gems.contains(&gem) {
                gems.push(gem);
            }
        }

        if gems.len() >= 2 {
            Action::CollectDifferent { gems }
        } else {
            fallback_action(board)
        }
    }
}

/// Highest points first, tier three before lower tiers on ties.
fn most_valuable_for_sale(board: &Board) -> Option<&Identifiable<ProductionCard, CardId>> {
    ProductionTier::ALL
        .iter()
        .rev()
        .flat_map(|tier| board.get_cards_for_sale(tier))
        .min_by_key(|card| Reverse(card.data.points))
}

/// A move that is always legal: collect up to three colors, or two of a
/// plentiful color, or pass.
pub fn fallback_action(board: &Board) -> Action {
    let colors: Vec<Gem> = Gem::COLORED
        .into_iter()
        .filter(|gem| board.bank.get(*gem) > 0)
        .take(3)
        .collect();
    if colors.len() >= 2 {
        return Action::CollectDifferent { gems: colors };
    }

    match Gem::COLORED
        .into_iter()
        .find(|gem| board.bank.get(*gem) >= MIN_PILE_SIZE_TO_COLLECT_TWO_EQUALS)
    {
        Some(gem) => Action::CollectTwoOfTheSame { gem },
        None => Action::PassTheTurn,
    }
}
