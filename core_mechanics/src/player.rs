use std::fmt;

use serde::{Deserialize, Serialize};

use super::bank;
use super::board;
use super::gem::Gem;
use super::noble::Noble;
use super::production_card;
use super::production_card::CardId;
use super::production_card::Identifiable;

pub const MAXIMUM_RESERVED_CARDS: usize = 3;

/// Seat index. Assigned when the game is set up and never reassigned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId {
    id: u8,
}

impl PlayerId {
    pub fn new(id: u8) -> Self {
        Self { id }
    }

    pub fn id(&self) -> u8 {
        self.id
    }

    pub fn seat(&self) -> usize {
        self.id as usize
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "seat {}", self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    /// Lookup key into an external identity service. Not owned data.
    pub uid: Option<String>,
    pub is_ai: bool,
    pub name: Option<String>,
    pub funds: bank::Funds,
    pub production_cards: Vec<Identifiable<production_card::ProductionCard, CardId>>,
    pub reserved_cards: Vec<Identifiable<production_card::ProductionCard, CardId>>,
    pub nobles: Vec<Noble>,
    /// Cached sum of card and noble points.
    pub points: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum ReserveOperationFail {
    #[error(
        "a player cannot hold more than {max} reserved cards",
        max = MAXIMUM_RESERVED_CARDS
    )]
    MaximumReservedCardsExceed,
    #[error("card {0} is not for sale")]
    CardNotFound(CardId),
}

#[derive(Debug)]
pub struct ReserveOperationSuccess {
    pub bank_funds: bank::Funds,
    pub player: Player,
}

impl ReserveOperationSuccess {
    pub fn new(bank_funds: bank::Funds, player: Player) -> Self {
        Self { bank_funds, player }
    }
}

impl Player {
    pub fn new(
        id: PlayerId,
        funds: bank::Funds,
        production_cards: Vec<Identifiable<production_card::ProductionCard, CardId>>,
        reserved_cards: Vec<Identifiable<production_card::ProductionCard, CardId>>,
    ) -> Self {
        let points = production_cards.iter().map(|c| c.data.points).sum();
        Self {
            id,
            uid: None,
            is_ai: false,
            name: None,
            funds,
            production_cards,
            reserved_cards,
            nobles: vec![],
            points,
        }
    }

    /// A player with nothing yet, as the roster hands it to the initializer.
    pub fn seated(id: PlayerId) -> Self {
        Self::new(id, bank::Funds::empty(), vec![], vec![])
    }

    pub fn with_name(self, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..self
        }
    }

    pub fn with_uid(self, uid: impl Into<String>) -> Self {
        Self {
            uid: Some(uid.into()),
            ..self
        }
    }

    pub fn controlled_by_ai(self) -> Self {
        Self {
            is_ai: true,
            ..self
        }
    }

    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("Player {}", self.id.id() + 1),
        }
    }

    /// Bonus count per gem, one per owned production card.
    pub fn get_production(&self) -> bank::Funds {
        Self::get_funds_from_production_cards(&self.production_cards)
    }

    pub fn get_funds_from_production_cards(
        production_cards: &[Identifiable<production_card::ProductionCard, CardId>],
    ) -> bank::Funds {
        bank::Funds::new_from_list(
            production_cards
                .iter()
                .map(|card| card.data.produces)
                .collect::<Vec<Gem>>(),
        )
    }

    /// Affordability of a card, bonuses first, then tokens, then gold.
    pub fn can_afford(&self, card: &production_card::ProductionCard) -> bool {
        production_card::ProductionCard::shortfall(self, card).total()
            <= self.funds.get(Gem::Gold) as u16
    }

    pub fn get_reserved_card(
        &self,
        card_id: &CardId,
    ) -> Option<&Identifiable<production_card::ProductionCard, CardId>> {
        self.reserved_cards.iter().find(|c| &c.uid == card_id)
    }

    pub fn reserve_card(
        board: &board::Board,
        card_id: &CardId,
    ) -> Result<ReserveOperationSuccess, ReserveOperationFail> {
        let card = board
            .get_card_from_board(card_id)
            .ok_or_else(|| ReserveOperationFail::CardNotFound(card_id.clone()))?;

        let player = board.get_who_is_playing_now();

        if player.reserved_cards.len() >= MAXIMUM_RESERVED_CARDS {
            return Result::Err(ReserveOperationFail::MaximumReservedCardsExceed);
        }

        let mut bank = board.bank.clone();
        let mut player_updated = player.clone();
        player_updated.reserved_cards.push(card);

        let bank_golden_pieces = bank.get(Gem::Gold);
        if bank_golden_pieces > 0 {
            bank.funds.insert(Gem::Gold, bank_golden_pieces - 1);
            let player_golden_quantity = player.funds.get(Gem::Gold);
            player_updated
                .funds
                .funds
                .insert(Gem::Gold, player_golden_quantity + 1);
        }

        Result::Ok(ReserveOperationSuccess::new(bank, player_updated))
    }

    /// Points recomputed from owned cards and nobles.
    pub fn total_victory_points(&self) -> u8 {
        let card_points: u8 = self.production_cards.iter().map(|c| c.data.points).sum();
        let noble_points: u8 = self.nobles.iter().map(|n| n.points).sum();
        card_points + noble_points
    }
}
