use std::fmt;
use std::{collections::HashMap, ops::Add, ops::Sub};

use serde::{Deserialize, Serialize};

use super::gem::Gem;

pub const MIN_PILE_SIZE_TO_COLLECT_TWO_EQUALS: u8 = 4;
pub const INITIAL_COLORED_PIECES: u8 = 7;
pub const INITIAL_GOLDEN_PIECES: u8 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
pub enum CollectError {
    #[error("gold can only be obtained by reserving a card")]
    CollectedGolden,
    #[error("must collect 2 or 3 different gems, {0} given")]
    WrongAmountOfDifferentPieces(usize),
    #[error("{0} was requested more than once")]
    RepeatedPiece(Gem),
    #[error("the bank has no {0} left")]
    NotEnoughAtTheBank(Gem),
    #[error(
        "cannot collect two {0} when fewer than {min} are left",
        min = MIN_PILE_SIZE_TO_COLLECT_TWO_EQUALS
    )]
    CannotCollect2WhenResourceIsAlmostEmpty(Gem),
}

#[derive(Debug, PartialEq, Eq)]
pub struct CollectSuccess {
    pub bank_funds: Funds,
    pub player_funds: Funds,
}

impl CollectSuccess {
    fn new(bank_funds: Funds, player_funds: Funds) -> Self {
        Self {
            bank_funds,
            player_funds,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectKind {
    Different,
    TwoOfTheSame,
}

#[derive(Debug, Clone)]
pub struct CollectRequest {
    bank_funds: Funds,
    player_funds: Funds,
    want_to_collect: Vec<Gem>,
    kind: CollectKind,
}

impl CollectRequest {
    pub fn different(bank_funds: Funds, player_funds: Funds, want_to_collect: Vec<Gem>) -> Self {
        Self {
            bank_funds,
            player_funds,
            want_to_collect,
            kind: CollectKind::Different,
        }
    }

    pub fn two_of_the_same(bank_funds: Funds, player_funds: Funds, gem: Gem) -> Self {
        Self {
            bank_funds,
            player_funds,
            want_to_collect: vec![gem, gem],
            kind: CollectKind::TwoOfTheSame,
        }
    }
}

/// A token pool. Always holds an entry for each of the six gems.
#[derive(Debug, PartialEq, Eq, Clone, Serialize, Deserialize)]
pub struct Funds {
    pub funds: HashMap<Gem, u8>,
}

impl Default for Funds {
    fn default() -> Self {
        Self::empty()
    }
}

impl Funds {
    pub fn new(white: u8, blue: u8, green: u8, red: u8, black: u8, gold: u8) -> Self {
        Self {
            funds: HashMap::from([
                (Gem::White, white),
                (Gem::Blue, blue),
                (Gem::Green, green),
                (Gem::Red, red),
                (Gem::Black, black),
                (Gem::Gold, gold),
            ]),
        }
    }

    pub fn empty() -> Self {
        Self::new(0, 0, 0, 0, 0, 0)
    }

    /// The bank every game starts with. Does not scale with the player count.
    pub fn initial_bank() -> Self {
        Self::new(
            INITIAL_COLORED_PIECES,
            INITIAL_COLORED_PIECES,
            INITIAL_COLORED_PIECES,
            INITIAL_COLORED_PIECES,
            INITIAL_COLORED_PIECES,
            INITIAL_GOLDEN_PIECES,
        )
    }

    pub fn new_from(funds: HashMap<Gem, u8>) -> Self {
        let mut new_funds = Self::empty();
        for gem in Gem::ALL {
            new_funds
                .funds
                .insert(gem, *funds.get(&gem).unwrap_or(&0));
        }
        new_funds
    }

    pub fn new_from_list(funds: Vec<Gem>) -> Self {
        let mut new_funds = Self::empty();
        for g in funds {
            new_funds.funds.insert(g, new_funds.get(g) + 1);
        }
        new_funds
    }

    pub fn get(&self, gem: Gem) -> u8 {
        *self.funds.get(&gem).unwrap_or(&0)
    }

    pub fn total(&self) -> u16 {
        self.funds.values().map(|q| *q as u16).sum()
    }

    /// Gems with at least one piece, in `Gem::ALL` order.
    pub fn available(&self) -> Vec<Gem> {
        Gem::ALL.into_iter().filter(|g| self.get(*g) > 0).collect()
    }

    pub fn collect(collect_request: CollectRequest) -> Result<CollectSuccess, CollectError> {
        if collect_request.want_to_collect.contains(&Gem::Gold) {
            return Err(CollectError::CollectedGolden);
        }

        let player_request_as_funds = Funds::new_from_list(collect_request.want_to_collect.clone());

        match collect_request.kind {
            CollectKind::Different => {
                let total_amount_of_pieces = collect_request.want_to_collect.len();
                if !(2..=3).contains(&total_amount_of_pieces) {
                    return Err(CollectError::WrongAmountOfDifferentPieces(
                        total_amount_of_pieces,
                    ));
                }
                for gem in Gem::COLORED {
                    if player_request_as_funds.get(gem) >= 2 {
                        return Err(CollectError::RepeatedPiece(gem));
                    }
                }
            }
            CollectKind::TwoOfTheSame => {
                let gem = collect_request.want_to_collect[0];
                if collect_request.bank_funds.get(gem) < MIN_PILE_SIZE_TO_COLLECT_TWO_EQUALS {
                    return Err(CollectError::CannotCollect2WhenResourceIsAlmostEmpty(gem));
                }
            }
        }

        let result_bank_funds = (collect_request.bank_funds - player_request_as_funds.clone())
            .map_err(|err| match err {
                FundsSubtractionError::NotEnoughFunds(gem_missing) => {
                    CollectError::NotEnoughAtTheBank(gem_missing)
                }
            })?;

        let new_player_funds = collect_request.player_funds + player_request_as_funds;

        Ok(CollectSuccess::new(result_bank_funds, new_player_funds))
    }
}

impl fmt::Display for Funds {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let parts: Vec<String> = Gem::ALL
            .iter()
            .map(|g| format!("{}:{}", g, self.get(*g)))
            .collect();
        write!(f, "{}", parts.join(" "))
    }
}

impl From<Funds> for Vec<Gem> {
    fn from(funds: Funds) -> Self {
        let mut pieces: Vec<Gem> = vec![];

        for color in Gem::ALL {
            for _ in 0..funds.get(color) {
                pieces.push(color)
            }
        }

        pieces
    }
}

#[derive(Debug)]
pub enum FundsSubtractionError {
    NotEnoughFunds(Gem),
}

impl Sub<Funds> for Funds {
    type Output = Result<Self, FundsSubtractionError>;

    fn sub(self, rhs: Funds) -> Self::Output {
        let mut funds_remaining = self.clone();

        for (gem, quantity) in rhs.funds {
            let current_amount = self.get(gem);
            if quantity > current_amount {
                return Err(FundsSubtractionError::NotEnoughFunds(gem));
            }
            funds_remaining
                .funds
                .insert(gem, current_amount - quantity);
        }

        Ok(funds_remaining)
    }
}

impl Add<Funds> for Funds {
    type Output = Funds;

    fn add(self, rhs: Funds) -> Self::Output {
        let mut new_funds = self.clone();

        for (gem, quantity) in rhs.funds {
            new_funds.funds.insert(gem, self.get(gem) + quantity);
        }

        new_funds
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_default_funds() -> Funds {
        Funds::new(8, 8, 8, 8, 8, 8)
    }

    #[test]
    fn can_collect_3_pieces() {
        let collect_request = CollectRequest::different(
            get_default_funds(),
            Funds::empty(),
            vec![Gem::Blue, Gem::Red, Gem::White],
        );
        let response = Funds::collect(collect_request).unwrap();

        let expected_bank_funds = Funds::new(7, 7, 8, 7, 8, 8);
        assert_eq!(response.bank_funds, expected_bank_funds);

        let expected_player_funds = Funds::new(1, 1, 0, 1, 0, 0);
        assert_eq!(response.player_funds, expected_player_funds);
    }

    #[test]
    fn can_collect_only_2_different_pieces() {
        let collect_request = CollectRequest::different(
            Funds::new(0, 0, 0, 1, 1, 5),
            Funds::empty(),
            vec![Gem::Red, Gem::Black],
        );
        let response = Funds::collect(collect_request).unwrap();
        assert_eq!(response.bank_funds, Funds::new(0, 0, 0, 0, 0, 5));
        assert_eq!(response.player_funds, Funds::new(0, 0, 0, 1, 1, 0));
    }

    #[test]
    fn cannot_collect_golden() {
        let collect_request = CollectRequest::different(
            get_default_funds(),
            Funds::empty(),
            vec![Gem::Blue, Gem::Red, Gem::Gold],
        );
        let response = Funds::collect(collect_request);
        assert_eq!(response, Err(CollectError::CollectedGolden));

        let collect_request =
            CollectRequest::two_of_the_same(get_default_funds(), Funds::empty(), Gem::Gold);
        let response = Funds::collect(collect_request);
        assert_eq!(response, Err(CollectError::CollectedGolden));
    }

    #[test]
    fn cannot_collect_the_same_piece_twice_when_taking_different() {
        let collect_request = CollectRequest::different(
            get_default_funds(),
            Funds::empty(),
            vec![Gem::Blue, Gem::Blue, Gem::Red],
        );
        let response = Funds::collect(collect_request);
        assert_eq!(response, Err(CollectError::RepeatedPiece(Gem::Blue)));
    }

    #[test]
    fn cannot_collect_more_than_three_or_less_than_two_different() {
        let collect_request = CollectRequest::different(
            get_default_funds(),
            Funds::empty(),
            vec![Gem::Red, Gem::Green, Gem::Blue, Gem::White],
        );
        let response = Funds::collect(collect_request);
        assert_eq!(
            response,
            Err(CollectError::WrongAmountOfDifferentPieces(4))
        );

        let collect_request =
            CollectRequest::different(get_default_funds(), Funds::empty(), vec![Gem::Red]);
        let response = Funds::collect(collect_request);
        assert_eq!(
            response,
            Err(CollectError::WrongAmountOfDifferentPieces(1))
        );
    }

    #[test]
    fn can_collect_2_of_the_same() {
        let collect_request =
            CollectRequest::two_of_the_same(get_default_funds(), Funds::new(1, 1, 1, 1, 1, 1), Gem::Blue);
        let response = Funds::collect(collect_request).unwrap();
        assert_eq!(response.player_funds, Funds::new(1, 3, 1, 1, 1, 1));
        assert_eq!(response.bank_funds, Funds::new(8, 6, 8, 8, 8, 8));
    }

    #[test]
    fn cannot_collect_when_there_is_not_enough_at_the_bank() {
        let collect_request = CollectRequest::different(
            Funds::new(1, 0, 1, 1, 1, 1),
            Funds::empty(),
            vec![Gem::Blue, Gem::Red],
        );
        let response = Funds::collect(collect_request);
        assert_eq!(response, Err(CollectError::NotEnoughAtTheBank(Gem::Blue)));
    }

    #[test]
    fn cannot_collect_2_of_the_same_when_the_stack_is_almost_empty() {
        let collect_request = CollectRequest::two_of_the_same(
            Funds::new(1, MIN_PILE_SIZE_TO_COLLECT_TWO_EQUALS - 1, 1, 1, 1, 1),
            Funds::empty(),
            Gem::Blue,
        );
        let response = Funds::collect(collect_request);
        assert_eq!(
            response,
            Err(CollectError::CannotCollect2WhenResourceIsAlmostEmpty(
                Gem::Blue
            ))
        );

        let collect_request = CollectRequest::two_of_the_same(
            Funds::new(1, MIN_PILE_SIZE_TO_COLLECT_TWO_EQUALS, 1, 1, 1, 1),
            Funds::empty(),
            Gem::Blue,
        );
        let response = Funds::collect(collect_request).unwrap();
        assert_eq!(response.player_funds, Funds::new(0, 2, 0, 0, 0, 0));

        let expected_bank_funds =
            Funds::new(1, MIN_PILE_SIZE_TO_COLLECT_TWO_EQUALS - 2, 1, 1, 1, 1);
        assert_eq!(response.bank_funds, expected_bank_funds);
    }

    #[test]
    fn correctly_convert_from_funds_to_vec_of_pieces() {
        let funds = Funds::new(1, 2, 3, 4, 5, 6);
        let pieces = Vec::<Gem>::from(funds.clone());

        assert_eq!(pieces.iter().filter(|p| **p == Gem::White).count(), 1);
        assert_eq!(pieces.iter().filter(|p| **p == Gem::Blue).count(), 2);
        assert_eq!(pieces.iter().filter(|p| **p == Gem::Green).count(), 3);
        assert_eq!(pieces.iter().filter(|p| **p == Gem::Red).count(), 4);
        assert_eq!(pieces.iter().filter(|p| **p == Gem::Black).count(), 5);
        assert_eq!(pieces.iter().filter(|p| **p == Gem::Gold).count(), 6);

        let new_funds = Funds::new_from_list(pieces);
        assert_eq!(funds, new_funds);
    }

    #[test]
    fn new_from_fills_missing_gems_with_zero() {
        let funds = Funds::new_from(HashMap::from([(Gem::Red, 2)]));
        assert_eq!(funds, Funds::new(0, 0, 0, 2, 0, 0));
        assert_eq!(funds.available(), vec![Gem::Red]);
        assert_eq!(funds.total(), 2);
    }

    #[test]
    fn initial_bank_has_seven_of_each_color_and_five_gold() {
        assert_eq!(Funds::initial_bank(), Funds::new(7, 7, 7, 7, 7, 5));
    }
}
