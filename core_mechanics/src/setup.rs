use std::collections::HashMap;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::bank::Funds;
use super::board::{Board, ProductionTier, CARDS_FOR_SALE_PER_TIER};
use super::noble::Noble;
use super::player::{Player, PlayerId};
use super::production_card::{CardId, Identifiable, ProductionCard};

pub const MIN_PLAYERS: usize = 2;
pub const MAX_PLAYERS: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum ConfigurationError {
    #[error(
        "a game needs {min} to {max} players, {0} given",
        min = MIN_PLAYERS,
        max = MAX_PLAYERS
    )]
    PlayerCount(usize),
    #[error(
        "{tier} needs at least {needed} cards, only {available} given",
        needed = CARDS_FOR_SALE_PER_TIER
    )]
    NotEnoughCards {
        tier: ProductionTier,
        available: usize,
    },
}

/// Builds a fresh game. Players are seated in list order and start with
/// nothing, whatever they carried before.
pub fn new_game<R: Rng + ?Sized>(
    players: Vec<Player>,
    decks: HashMap<ProductionTier, Vec<Identifiable<ProductionCard, CardId>>>,
    nobles: Vec<Noble>,
    rng: &mut R,
) -> Result<Board, ConfigurationError> {
    if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&players.len()) {
        return Err(ConfigurationError::PlayerCount(players.len()));
    }

    let mut decks = decks;
    for tier in ProductionTier::ALL {
        let deck = decks.entry(tier).or_default();
        if deck.len() < CARDS_FOR_SALE_PER_TIER {
            return Err(ConfigurationError::NotEnoughCards {
                tier,
                available: deck.len(),
            });
        }
        deck.shuffle(rng);
    }

    let n_of_nobles = players.len() + 1;
    let nobles: Vec<Noble> = nobles
        .choose_multiple(rng, n_of_nobles)
        .cloned()
        .collect();

    let players: Vec<Player> = players
        .into_iter()
        .enumerate()
        .map(|(seat, p)| Player {
            id: PlayerId::new(seat as u8),
            funds: Funds::empty(),
            production_cards: vec![],
            reserved_cards: vec![],
            nobles: vec![],
            points: 0,
            ..p
        })
        .collect();

    debug!(
        players = players.len(),
        nobles = nobles.len(),
        "new game set up"
    );

    Ok(Board::new(players, Funds::initial_bank(), decks, nobles))
}
