use std::collections::HashMap;
use std::fmt;
use std::slice::Iter;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::bank::CollectError;
use super::bank::CollectRequest;
use super::bank::Funds;
use super::player::Player;
use super::player::PlayerId;
use super::player::ReserveOperationFail;
use super::production_card::CardId;
use super::production_card::Identifiable;
use super::production_card::ProductionCard;
use super::setup::{MAX_PLAYERS, MIN_PLAYERS};

use super::gem::Gem;
use super::noble::Noble;
use super::player;

pub const WINNING_POINTS_THRESHOLD: u8 = 15;
pub const CARDS_FOR_SALE_PER_TIER: usize = 4;
pub const LOG_SIZE: usize = 5;
pub const WELCOME_MESSAGE: &str = "Welcome aboard. Reach 15 points to earn your vacation.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductionTier {
    One,
    Two,
    Three,
}

impl ProductionTier {
    pub const ALL: [ProductionTier; 3] =
        [ProductionTier::One, ProductionTier::Two, ProductionTier::Three];

    pub fn level(&self) -> u8 {
        match self {
            ProductionTier::One => 1,
            ProductionTier::Two => 2,
            ProductionTier::Three => 3,
        }
    }
}

impl fmt::Display for ProductionTier {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "tier {}", self.level())
    }
}

/// One player move. The serialized form is `{"type": "...", ...}` with the
/// same tags the lobby clients send.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all_fields = "camelCase")]
pub enum Action {
    #[serde(rename = "TAKE_3_DIFF")]
    CollectDifferent { gems: Vec<Gem> },
    #[serde(rename = "TAKE_2_SAME")]
    CollectTwoOfTheSame { gem: Gem },
    #[serde(rename = "RESERVE")]
    ReserveCardFromBoard { card_id: CardId },
    #[serde(rename = "BUY")]
    BuyCard { card_id: CardId },
    #[serde(rename = "PASS")]
    PassTheTurn,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum RuleViolation {
    #[error("the game is already over")]
    GameOver,
    #[error("it is {expected}'s turn, not {got}'s")]
    NotYourTurn { expected: PlayerId, got: PlayerId },
    #[error(transparent)]
    InvalidCollect(#[from] CollectError),
    #[error(transparent)]
    InvalidReserve(#[from] ReserveOperationFail),
    #[error(transparent)]
    InvalidBuyOperation(#[from] BuyOperationFail),
}

impl RuleViolation {
    pub fn kind(&self) -> &'static str {
        match self {
            RuleViolation::GameOver => "game_over",
            RuleViolation::NotYourTurn { .. } => "not_your_turn",
            RuleViolation::InvalidCollect(_) => "invalid_collect",
            RuleViolation::InvalidReserve(_) => "invalid_reserve",
            RuleViolation::InvalidBuyOperation(_) => "invalid_buy",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum BuyOperationFail {
    #[error("not enough funds, still missing {0}")]
    NotEnoughFunds(Funds),
    #[error("card {0} is neither for sale nor reserved")]
    CardNotFound(CardId),
}

/// Why a received or stored board was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    #[error(
        "a game needs {min} to {max} players, {0} given",
        min = MIN_PLAYERS,
        max = MAX_PLAYERS
    )]
    PlayerCount(usize),
    #[error("player in position {position} claims {seat}")]
    SeatMismatch { position: usize, seat: PlayerId },
    #[error("the turn points at seat {0}, which nobody occupies")]
    TurnOutOfRange(usize),
    #[error("the winner {0} is not seated at this table")]
    UnknownWinner(PlayerId),
    #[error("{tier} shows {shown} cards, at most {max} allowed", max = CARDS_FOR_SALE_PER_TIER)]
    TooManyCardsForSale { tier: ProductionTier, shown: usize },
}

/// The whole game state. Every action produces a new `Board`; the one it was
/// resolved against is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "BoardSnapshot")]
pub struct Board {
    players: Vec<player::Player>,
    player_turn: usize,
    pub bank: Funds,
    /// Draw piles. The last card is the next one drawn.
    decks: HashMap<ProductionTier, Vec<Identifiable<ProductionCard, CardId>>>,
    cards_for_sale: HashMap<ProductionTier, Vec<Identifiable<ProductionCard, CardId>>>,
    nobles: Vec<Noble>,
    winner: Option<PlayerId>,
    /// Most recent first.
    log: Vec<String>,
    turn_count: u32,
}

/// `Board` as it arrives over the wire, before the seats are checked.
#[derive(Deserialize)]
struct BoardSnapshot {
    players: Vec<player::Player>,
    player_turn: usize,
    bank: Funds,
    decks: HashMap<ProductionTier, Vec<Identifiable<ProductionCard, CardId>>>,
    cards_for_sale: HashMap<ProductionTier, Vec<Identifiable<ProductionCard, CardId>>>,
    nobles: Vec<Noble>,
    winner: Option<PlayerId>,
    log: Vec<String>,
    turn_count: u32,
}

impl TryFrom<BoardSnapshot> for Board {
    type Error = SnapshotError;

    fn try_from(snapshot: BoardSnapshot) -> Result<Self, Self::Error> {
        let seats = snapshot.players.len();
        if !(MIN_PLAYERS..=MAX_PLAYERS).contains(&seats) {
            return Err(SnapshotError::PlayerCount(seats));
        }
        if let Some((position, player)) = snapshot
            .players
            .iter()
            .enumerate()
            .find(|(position, p)| p.id.seat() != *position)
        {
            return Err(SnapshotError::SeatMismatch {
                position,
                seat: player.id,
            });
        }
        if snapshot.player_turn >= seats {
            return Err(SnapshotError::TurnOutOfRange(snapshot.player_turn));
        }
        if let Some(winner) = snapshot.winner.filter(|w| w.seat() >= seats) {
            return Err(SnapshotError::UnknownWinner(winner));
        }
        for (tier, cards) in &snapshot.cards_for_sale {
            if cards.len() > CARDS_FOR_SALE_PER_TIER {
                return Err(SnapshotError::TooManyCardsForSale {
                    tier: *tier,
                    shown: cards.len(),
                });
            }
        }

        Ok(Board {
            players: snapshot.players,
            player_turn: snapshot.player_turn,
            bank: snapshot.bank,
            decks: snapshot.decks,
            cards_for_sale: snapshot.cards_for_sale,
            nobles: snapshot.nobles,
            winner: snapshot.winner,
            log: snapshot.log,
            turn_count: snapshot.turn_count,
        })
    }
}

impl Board {
    /// Callers outside this crate go through `setup::new_game`, which checks
    /// the roster first.
    pub(crate) fn new(
        players: Vec<player::Player>,
        bank: Funds,
        decks: HashMap<ProductionTier, Vec<Identifiable<ProductionCard, CardId>>>,
        nobles: Vec<Noble>,
    ) -> Self {
        let mut new_decks = decks;
        let mut cards_for_sale = HashMap::new();
        for tier in ProductionTier::ALL {
            let prod_deck = new_decks.entry(tier).or_default();
            let mut to_sell: Vec<Identifiable<ProductionCard, CardId>> = vec![];
            for _ in 1..=CARDS_FOR_SALE_PER_TIER {
                if let Some(to_add) = prod_deck.pop() {
                    to_sell.push(to_add);
                }
            }
            cards_for_sale.insert(tier, to_sell);
        }
        Self {
            players,
            player_turn: 0,
            bank,
            decks: new_decks,
            cards_for_sale,
            nobles,
            winner: None,
            log: vec![WELCOME_MESSAGE.to_string()],
            turn_count: 0,
        }
    }

    pub fn get_deck(&self, tier: &ProductionTier) -> &[Identifiable<ProductionCard, CardId>] {
        self.decks.get(tier).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get_cards_for_sale(
        &self,
        tier: &ProductionTier,
    ) -> &[Identifiable<ProductionCard, CardId>] {
        self.cards_for_sale
            .get(tier)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn get_nobles(&self) -> &[Noble] {
        &self.nobles
    }

    pub fn get_winner(&self) -> Option<PlayerId> {
        self.winner
    }

    pub fn is_over(&self) -> bool {
        self.winner.is_some()
    }

    pub fn get_log(&self) -> &[String] {
        &self.log
    }

    pub fn get_turn_count(&self) -> u32 {
        self.turn_count
    }

    pub fn get_player_turn(&self) -> usize {
        self.player_turn
    }

    fn get_who_plays_next(&self) -> usize {
        (self.player_turn + 1) % self.players.len()
    }

    pub fn get_players(&self) -> Iter<Player> {
        self.players.iter()
    }

    pub fn get_player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    pub fn get_card_from_board(
        &self,
        card_id: &CardId,
    ) -> Option<Identifiable<ProductionCard, CardId>> {
        for cards in self.cards_for_sale.values() {
            for card in cards {
                if &card.uid == card_id {
                    return Some(card.clone());
                }
            }
        }
        None
    }

    /// Every face-up card, tier three first.
    pub fn get_all_cards_for_sale(&self) -> Vec<&Identifiable<ProductionCard, CardId>> {
        ProductionTier::ALL
            .iter()
            .rev()
            .flat_map(|tier| self.get_cards_for_sale(tier))
            .collect()
    }

    pub fn get_who_is_playing_now(&self) -> &player::Player {
        &self.players[self.player_turn]
    }

    /// Bank plus every player's funds. Constant over a whole game.
    pub fn get_total_funds(&self) -> Funds {
        self.players
            .iter()
            .fold(self.bank.clone(), |total, p| total + p.funds.clone())
    }

    /// Players by descending points, ties kept in seat order.
    pub fn final_standings(&self) -> Vec<&Player> {
        let mut standings: Vec<&Player> = self.players.iter().collect();
        standings.sort_by(|a, b| b.points.cmp(&a.points));
        standings
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn from_json(json: &str) -> serde_json::Result<Board> {
        serde_json::from_str(json)
    }

    /// Removes a face-up card and refills its slot from the deck, or shrinks
    /// the window when the deck is empty.
    fn take_card_from_board(
        &mut self,
        card_id: &CardId,
    ) -> Option<Identifiable<ProductionCard, CardId>> {
        for tier in ProductionTier::ALL {
            let cards = self.cards_for_sale.entry(tier).or_default();
            if let Some(index) = cards.iter().position(|c| &c.uid == card_id) {
                let deck = self.decks.entry(tier).or_default();
                let card = match deck.pop() {
                    Some(card_drawn) => std::mem::replace(&mut cards[index], card_drawn),
                    None => cards.remove(index),
                };
                return Some(card);
            }
        }
        None
    }

    fn push_log(&mut self, entry: String) {
        self.log.insert(0, entry);
        self.log.truncate(LOG_SIZE);
    }

    fn action_buy_production_card(&self, card_id: &CardId) -> Result<Board, RuleViolation> {
        let mut player = self.get_who_is_playing_now().clone();
        let (card, from_reserve) = match player.get_reserved_card(card_id) {
            Some(card) => (card.clone(), true),
            None => (
                self.get_card_from_board(card_id)
                    .ok_or_else(|| BuyOperationFail::CardNotFound(card_id.clone()))?,
                false,
            ),
        };

        let used_coins = ProductionCard::buy(&player, &card.data)?;
        player.funds = (player.funds.clone() - used_coins.clone())
            .map_err(|_| BuyOperationFail::NotEnoughFunds(used_coins.clone()))?;

        let mut new_board_state = self.clone();
        if from_reserve {
            player.reserved_cards.retain(|c| &c.uid != card_id);
        } else {
            new_board_state.take_card_from_board(card_id);
        }

        new_board_state.push_log(format!(
            "{}: bought [{}] (+{})",
            player.display_name(),
            card.data.name,
            card.data.points
        ));
        player.points += card.data.points;
        player.production_cards.push(card);

        new_board_state.players[self.player_turn] = player;
        new_board_state.bank = new_board_state.bank + used_coins;

        new_board_state.grant_noble();

        Ok(new_board_state)
    }

    /// Gives the current player the first noble, in pool order, whose
    /// requirement their bonuses meet. At most one per call.
    fn grant_noble(&mut self) {
        let player = &self.players[self.player_turn];
        let production = player.get_production();
        let Some(index) = self
            .nobles
            .iter()
            .position(|noble| noble.is_satisfied_by(&production))
        else {
            return;
        };

        let noble = self.nobles.remove(index);
        let entry = format!(
            "{} earned {} (+{})",
            player.display_name(),
            noble.name,
            noble.points
        );
        let player = &mut self.players[self.player_turn];
        player.points += noble.points;
        player.nobles.push(noble);
        self.push_log(entry);
    }

    fn action_collect_pieces(&self, collect_request: CollectRequest) -> Result<Board, RuleViolation> {
        let result = Funds::collect(collect_request)?;

        let mut new_board_state = self.clone();
        new_board_state.bank = result.bank_funds;
        new_board_state.players[self.player_turn].funds = result.player_funds;

        Ok(new_board_state)
    }

    fn action_reserve_card(&self, card_id: &CardId) -> Result<Board, RuleViolation> {
        let success = player::Player::reserve_card(self, card_id)?;
        let mut new_board = self.clone();
        new_board.take_card_from_board(card_id);
        new_board.bank = success.bank_funds;
        new_board.players[new_board.player_turn] = success.player;
        Ok(new_board)
    }

    /// Resolves an action for whoever is playing now.
    pub fn do_action(&self, action: &Action) -> Result<Board, RuleViolation> {
        if self.winner.is_some() {
            return Err(RuleViolation::GameOver);
        }

        let current_player = self.get_who_is_playing_now();
        let name = current_player.display_name();
        let player_funds = current_player.funds.clone();

        let mut new_board_state = match action {
            Action::PassTheTurn => {
                let mut new_board_state = self.clone();
                new_board_state.push_log(format!("{}: passed", name));
                new_board_state
            }
            Action::CollectDifferent { gems } => {
                let request = CollectRequest::different(self.bank.clone(), player_funds, gems.clone());
                let mut new_board_state = self.action_collect_pieces(request)?;
                let gems: Vec<String> = gems.iter().map(Gem::to_string).collect();
                new_board_state.push_log(format!("{}: took {}", name, gems.join(", ")));
                new_board_state
            }
            Action::CollectTwoOfTheSame { gem } => {
                let request = CollectRequest::two_of_the_same(self.bank.clone(), player_funds, *gem);
                let mut new_board_state = self.action_collect_pieces(request)?;
                new_board_state.push_log(format!("{}: took two {}", name, gem));
                new_board_state
            }
            Action::ReserveCardFromBoard { card_id } => {
                let mut new_board_state = self.action_reserve_card(card_id)?;
                new_board_state.push_log(format!("{}: reserved a card", name));
                new_board_state
            }
            Action::BuyCard { card_id } => self.action_buy_production_card(card_id)?,
        };

        new_board_state.turn_count += 1;

        let acting_player = &new_board_state.players[self.player_turn];
        if acting_player.points >= WINNING_POINTS_THRESHOLD {
            info!(
                winner = %acting_player.id,
                points = acting_player.points,
                turn = new_board_state.turn_count,
                "game over"
            );
            new_board_state.winner = Some(acting_player.id);
        } else {
            new_board_state.player_turn = self.get_who_plays_next();
        }

        debug!(
            turn = new_board_state.turn_count,
            player = %name,
            ?action,
            "action resolved"
        );

        Ok(new_board_state)
    }

    /// Like `do_action`, but rejects the move when `player_id` is not the one
    /// whose turn it is.
    pub fn do_action_as(&self, player_id: PlayerId, action: &Action) -> Result<Board, RuleViolation> {
        if self.winner.is_some() {
            return Err(RuleViolation::GameOver);
        }
        let expected = self.get_who_is_playing_now().id;
        if expected != player_id {
            return Err(RuleViolation::NotYourTurn {
                expected,
                got: player_id,
            });
        }
        self.do_action(action)
    }
}
