//! Whole-game properties, checked over random games mixing greedy and
//! arbitrary (often illegal) moves.

use std::collections::{HashMap, HashSet};

use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::bank::Funds;
use crate::board::{Action, Board, ProductionTier, RuleViolation};
use crate::gem::Gem;
use crate::noble::{Noble, NobleId};
use crate::player::{Player, PlayerId, MAXIMUM_RESERVED_CARDS};
use crate::production_card::{CardId, Identifiable, ProductionCard};
use crate::setup;
use crate::strategy::{GreedyStrategy, Strategy};

fn get_decks() -> HashMap<ProductionTier, Vec<Identifiable<ProductionCard, CardId>>> {
    ProductionTier::ALL
        .into_iter()
        .map(|tier| {
            let level = tier.level() as usize;
            let cards = (0..12)
                .map(|n| {
                    let mut cost = [0u8; 5];
                    cost[n % 5] = (level + 1 + n % 2) as u8;
                    cost[(n + level) % 5] += level as u8;
                    let id = format!("T{}-{:03}", level, n + 1);
                    let card = ProductionCard::new(
                        tier,
                        &id,
                        Funds::new(cost[0], cost[1], cost[2], cost[3], cost[4], 0),
                        Gem::COLORED[(n + 2) % 5],
                        (level as u8 - 1) * 2 + (n % 3) as u8,
                    );
                    Identifiable::new(card, CardId::new(id))
                })
                .collect();
            (tier, cards)
        })
        .collect()
}

fn get_nobles() -> Vec<Noble> {
    (0..5)
        .map(|n| {
            let mut requirement = [0u8; 5];
            requirement[n] = 3;
            requirement[(n + 1) % 5] = 3;
            Noble::new(
                NobleId::new(format!("R-{:02}", n + 1)),
                "noble",
                Funds::new(
                    requirement[0],
                    requirement[1],
                    requirement[2],
                    requirement[3],
                    requirement[4],
                    0,
                ),
            )
        })
        .collect()
}

fn new_board(n_of_players: u8, seed: u64) -> Board {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let players = (0..n_of_players)
        .map(|n| Player::seated(PlayerId::new(n)))
        .collect();
    setup::new_game(players, get_decks(), get_nobles(), &mut rng)
        .expect("valid configuration")
}

/// Turns a pair of random bytes into a move. Greedy moves keep games going,
/// the rest probes the resolver with whatever the bytes describe.
fn pick_action(board: &Board, kind: u8, param: u8) -> Action {
    let gem = Gem::ALL[param as usize % Gem::ALL.len()];
    let visible: Vec<CardId> = board
        .get_all_cards_for_sale()
        .into_iter()
        .map(|c| c.uid.clone())
        .collect();
    let reserved: Vec<CardId> = board
        .get_who_is_playing_now()
        .reserved_cards
        .iter()
        .map(|c| c.uid.clone())
        .collect();
    let card_id = |ids: &[CardId]| {
        ids.get(param as usize % ids.len().max(1))
            .cloned()
            .unwrap_or_else(|| CardId::new("T9-999"))
    };

    match kind % 8 {
        0 => Action::CollectDifferent {
            gems: (0..=(param % 4))
                .map(|n| Gem::ALL[(param as usize + n as usize * 2) % Gem::ALL.len()])
                .collect(),
        },
        1 => Action::CollectTwoOfTheSame { gem },
        2 => Action::ReserveCardFromBoard {
            card_id: card_id(&visible),
        },
        3 => Action::BuyCard {
            card_id: card_id(&visible),
        },
        4 => Action::BuyCard {
            card_id: card_id(&reserved),
        },
        5 => Action::PassTheTurn,
        _ => GreedyStrategy.choose_action(board),
    }
}

fn noble_ids(board: &Board) -> Vec<NobleId> {
    board
        .get_nobles()
        .iter()
        .chain(board.get_players().flat_map(|p| p.nobles.iter()))
        .map(|n| n.id.clone())
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn game_rules_hold_after_every_move(
        n_of_players in 2u8..=4,
        seed in any::<u64>(),
        moves in prop::collection::vec((any::<u8>(), any::<u8>()), 1..200),
    ) {
        let mut board = new_board(n_of_players, seed);
        let initial_funds = board.get_total_funds();
        let initial_nobles: HashSet<NobleId> = noble_ids(&board).into_iter().collect();

        for (kind, param) in moves {
            let action = pick_action(&board, kind, param);
            match board.do_action(&action) {
                Ok(next) => {
                    prop_assert_eq!(next.get_turn_count(), board.get_turn_count() + 1);
                    board = next;
                }
                Err(violation) => {
                    prop_assert_ne!(violation.kind(), "not_your_turn");
                    if board.is_over() {
                        prop_assert_eq!(violation, RuleViolation::GameOver);
                    }
                    continue;
                }
            }

            prop_assert_eq!(board.get_total_funds(), initial_funds.clone());

            for player in board.get_players() {
                prop_assert!(player.reserved_cards.len() <= MAXIMUM_RESERVED_CARDS);
                prop_assert_eq!(player.points, player.total_victory_points());
            }

            let nobles = noble_ids(&board);
            let unique: HashSet<NobleId> = nobles.iter().cloned().collect();
            prop_assert_eq!(nobles.len(), unique.len());
            prop_assert_eq!(&unique, &initial_nobles);

            for tier in ProductionTier::ALL {
                prop_assert!(board.get_cards_for_sale(&tier).len() <= 4);
            }
        }
    }

    #[test]
    fn affordability_agrees_with_buying(
        seed in any::<u64>(),
        greedy_moves in 0usize..60,
    ) {
        let mut board = new_board(2, seed);
        for _ in 0..greedy_moves {
            if board.is_over() {
                break;
            }
            board = board.do_action(&GreedyStrategy.choose_action(&board)).expect("greedy moves are legal");
        }
        prop_assume!(!board.is_over());

        let player = board.get_who_is_playing_now();
        for card in board.get_all_cards_for_sale() {
            let affordable = player.can_afford(&card.data);
            prop_assert_eq!(affordable, player.can_afford(&card.data));
            let bought = board.do_action(&Action::BuyCard { card_id: card.uid.clone() });
            prop_assert_eq!(affordable, bought.is_ok());
        }
        for card in &player.reserved_cards {
            let bought = board.do_action(&Action::BuyCard { card_id: card.uid.clone() });
            prop_assert_eq!(player.can_afford(&card.data), bought.is_ok());
        }
    }

    #[test]
    fn json_round_trip_resolves_identically(
        seed in any::<u64>(),
        greedy_moves in 0usize..40,
    ) {
        let mut board = new_board(3, seed);
        for _ in 0..greedy_moves {
            if board.is_over() {
                break;
            }
            board = board.do_action(&GreedyStrategy.choose_action(&board)).expect("greedy moves are legal");
        }

        let restored = Board::from_json(&board.to_json().expect("serializable")).expect("deserializable");
        prop_assert_eq!(&restored, &board);

        let action = GreedyStrategy.choose_action(&board);
        prop_assert_eq!(restored.do_action(&action), board.do_action(&action));
    }
}

#[test]
fn greedy_players_finish_a_game() {
    let mut board = new_board(2, 2024);
    for _ in 0..1000 {
        if board.is_over() {
            break;
        }
        let action = GreedyStrategy.choose_action(&board);
        board = board.do_action(&action).expect("greedy moves are legal");
    }

    assert!(board.is_over());
    let winner = board.get_winner().unwrap();

    // A finished game stays finished
    assert_eq!(board.get_who_is_playing_now().id, winner);
    assert!(board.get_player(winner).map(|p| p.points >= 15).unwrap_or(false));
    assert_eq!(
        board.do_action(&Action::PassTheTurn),
        Err(RuleViolation::GameOver)
    );
    assert_eq!(board.final_standings()[0].id, winner);
}
