use std::fmt;

use serde::{Deserialize, Serialize};

use super::bank;
use super::board::{BuyOperationFail, ProductionTier};
use super::gem::Gem;
use super::player;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionCard {
    pub tier: ProductionTier,
    pub name: String,
    pub points: u8,
    pub produces: Gem,
    /// Colored gems only. The gold entry is always zero.
    pub cost: bank::Funds,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId {
    id: String,
}

impl CardId {
    pub fn new(id: impl Into<String>) -> Self {
        Self { id: id.into() }
    }

    pub fn as_str(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for CardId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identifiable<T, IdType = u8> {
    pub uid: IdType,
    pub data: T,
}

impl Identifiable<ProductionCard, CardId> {
    pub fn new(card: ProductionCard, uid: CardId) -> Self {
        Self { uid, data: card }
    }
}

impl ProductionCard {
    pub fn new(
        tier: ProductionTier,
        name: impl Into<String>,
        cost: bank::Funds,
        produces: Gem,
        points: u8,
    ) -> Self {
        let mut cost = cost;
        cost.funds.insert(Gem::Gold, 0);
        Self {
            tier,
            name: name.into(),
            points,
            produces,
            cost,
        }
    }

    pub fn total_cost(&self) -> u16 {
        self.cost.total()
    }

    /// Per gem, the part of the cost that neither bonuses nor tokens of that
    /// gem cover. Its total is the gold the player has to spend.
    pub fn shortfall(player: &player::Player, prod_card: &ProductionCard) -> bank::Funds {
        let production_funds = player.get_production();
        let mut shortfall = bank::Funds::empty();

        for gem in Gem::COLORED {
            let cost = prod_card.cost.get(gem);
            let need = cost.saturating_sub(production_funds.get(gem));
            let owned = player.funds.get(gem);
            if need > owned {
                shortfall.funds.insert(gem, need - owned);
            }
        }

        shortfall
    }

    /// Tokens the player hands to the bank to buy this card, gold included.
    pub fn buy(
        player: &player::Player,
        prod_card: &ProductionCard,
    ) -> Result<bank::Funds, BuyOperationFail> {
        let production_funds = player.get_production();
        let shortfall = Self::shortfall(player, prod_card);
        let goldens = player.funds.get(Gem::Gold);

        if shortfall.total() > goldens as u16 {
            let mut goldens_left = goldens;
            let mut new_missing_funds = bank::Funds::empty();
            for gem in Gem::COLORED {
                let missing = shortfall.get(gem);
                let covered = missing.min(goldens_left);
                goldens_left -= covered;
                new_missing_funds.funds.insert(gem, missing - covered);
            }
            return Err(BuyOperationFail::NotEnoughFunds(new_missing_funds));
        }

        let mut payment = bank::Funds::empty();
        for gem in Gem::COLORED {
            let need = prod_card.cost.get(gem).saturating_sub(production_funds.get(gem));
            payment.funds.insert(gem, need - shortfall.get(gem));
        }
        payment.funds.insert(Gem::Gold, shortfall.total() as u8);

        Ok(payment)
    }
}

#[cfg(test)]
mod tests {

    use crate::bank::Funds;
    use crate::player::PlayerId;

    use super::*;

    fn get_card(id: &str, produces: Gem) -> Identifiable<ProductionCard, CardId> {
        Identifiable::new(
            ProductionCard::new(ProductionTier::One, id, get_default_cost(), produces, 0),
            CardId::new(id),
        )
    }

    fn get_default_production() -> Vec<Identifiable<ProductionCard, CardId>> {
        vec![get_card("T1-010", Gem::Green), get_card("T1-020", Gem::Blue)]
    }

    fn get_default_cost() -> bank::Funds {
        bank::Funds::new(0, 1, 2, 1, 1, 0)
    }

    fn get_player(funds: Funds, production: Vec<Identifiable<ProductionCard, CardId>>) -> player::Player {
        player::Player::new(PlayerId::new(0), funds, production, vec![])
    }

    fn get_default_card() -> ProductionCard {
        ProductionCard::new(ProductionTier::One, "card", get_default_cost(), Gem::Red, 0)
    }

    #[test]
    fn can_buy_card() {
        let player = get_player(Funds::new(3, 2, 3, 1, 1, 1), vec![]);

        let result = ProductionCard::buy(&player, &get_default_card());

        assert_eq!(result.unwrap(), Funds::new(0, 1, 2, 1, 1, 0));
    }

    #[test]
    fn cannot_buy_if_there_is_not_enough_funds() {
        let player = get_player(Funds::new(0, 0, 1, 1, 1, 0), vec![]);

        let result = ProductionCard::buy(&player, &get_default_card());

        assert_eq!(
            result.unwrap_err(),
            BuyOperationFail::NotEnoughFunds(Funds::new(0, 1, 1, 0, 0, 0))
        );
        assert!(!player.can_afford(&get_default_card()));
    }

    #[test]
    fn can_buy_using_golden_piece_when_needed() {
        let player = get_player(Funds::new(0, 0, 1, 2, 1, 2), vec![]);

        let result = ProductionCard::buy(&player, &get_default_card());

        // one blue and one green are paid with gold
        assert_eq!(result.unwrap(), Funds::new(0, 0, 1, 1, 1, 2));
    }

    #[test]
    fn prioritize_production_card_over_pieces() {
        let player = get_player(Funds::new(0, 1, 2, 2, 1, 0), get_default_production());

        let result = ProductionCard::buy(&player, &get_default_card());

        // blue and one green come from the bonuses
        assert_eq!(result.unwrap(), Funds::new(0, 0, 1, 1, 1, 0));
    }

    #[test]
    fn use_production_card_with_pieces_and_golden_pieces() {
        let player = get_player(Funds::new(0, 0, 0, 1, 0, 2), get_default_production());

        let result = ProductionCard::buy(&player, &get_default_card());

        assert_eq!(result.unwrap(), Funds::new(0, 0, 0, 1, 0, 2));

        let prod_card = ProductionCard::new(
            ProductionTier::One,
            "card",
            Funds::new(0, 2, 2, 1, 1, 0),
            Gem::Red,
            0,
        );
        let player = get_player(Funds::new(0, 0, 0, 1, 0, 1), get_default_production());

        assert!(ProductionCard::buy(&player, &prod_card).is_err());
        assert!(!player.can_afford(&prod_card));
    }

    #[test]
    fn red_bonus_and_gold_cover_a_white_shortfall() {
        let red = Identifiable::new(
            ProductionCard::new(ProductionTier::One, "red", Funds::empty(), Gem::Red, 0),
            CardId::new("red-1"),
        );
        let other_red = Identifiable::new(red.data.clone(), CardId::new("red-2"));
        let player = get_player(Funds::new(1, 0, 0, 0, 0, 1), vec![red, other_red]);
        let card = ProductionCard::new(
            ProductionTier::One,
            "target",
            Funds::new(2, 0, 0, 1, 0, 0),
            Gem::Blue,
            1,
        );

        assert!(player.can_afford(&card));
        assert_eq!(
            ProductionCard::shortfall(&player, &card),
            Funds::new(1, 0, 0, 0, 0, 0)
        );
        assert_eq!(
            ProductionCard::buy(&player, &card).unwrap(),
            Funds::new(1, 0, 0, 0, 0, 1)
        );
    }

    #[test]
    fn gold_is_never_part_of_a_cost() {
        let card = ProductionCard::new(
            ProductionTier::Two,
            "card",
            Funds::new(1, 0, 0, 0, 0, 3),
            Gem::Red,
            1,
        );
        assert_eq!(card.cost, Funds::new(1, 0, 0, 0, 0, 0));
        assert_eq!(card.total_cost(), 1);
    }
}
