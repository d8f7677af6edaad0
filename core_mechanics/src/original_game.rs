use std::collections::HashMap;

use rand::Rng;

use crate::bank::Funds;
use crate::board::Board;
use crate::board::ProductionTier;
use crate::gem::Gem;
use crate::noble::Noble;
use crate::noble::NobleId;
use crate::player::Player;
use crate::player::PlayerId;
use crate::production_card::CardId;
use crate::production_card::Identifiable;
use crate::production_card::ProductionCard;
use crate::setup::{self, ConfigurationError};

pub const AI_PLAYER_NAME: &str = "AI Director";

/// Deals a game with the office card set.
pub fn get_original_game_board<R: Rng + ?Sized>(
    players: Vec<Player>,
    rng: &mut R,
) -> Result<Board, ConfigurationError> {
    setup::new_game(players, get_decks(), get_nobles(), rng)
}

/// Humans first, in the given order, then `ai_players` computer seats.
pub fn new_roster(names: &[String], ai_players: usize) -> Vec<Player> {
    let humans = names.iter().cloned();
    let bots = (1..=ai_players).map(|n| {
        if ai_players == 1 {
            AI_PLAYER_NAME.to_string()
        } else {
            format!("{} {}", AI_PLAYER_NAME, n)
        }
    });
    let n_of_humans = names.len();

    humans
        .chain(bots)
        .enumerate()
        .map(|(seat, name)| {
            let player = Player::seated(PlayerId::new(seat as u8)).with_name(name);
            if seat >= n_of_humans {
                player.controlled_by_ai()
            } else {
                player
            }
        })
        .collect()
}

pub fn get_decks() -> HashMap<ProductionTier, Vec<Identifiable<ProductionCard, CardId>>> {
    HashMap::from([
        (ProductionTier::One, get_tier_one_cards()),
        (ProductionTier::Two, get_tier_two_cards()),
        (ProductionTier::Three, get_tier_three_cards()),
    ])
}

fn card(
    tier: ProductionTier,
    id: &str,
    name: &str,
    cost: Funds,
    produces: Gem,
    points: u8,
) -> Identifiable<ProductionCard, CardId> {
    Identifiable::new(
        ProductionCard::new(tier, name, cost, produces, points),
        CardId::new(id),
    )
}

fn noble(id: &str, name: &str, requirement: Funds) -> Noble {
    Noble::new(NobleId::new(id), name, requirement)
}

fn get_tier_one_cards() -> Vec<Identifiable<ProductionCard, CardId>> {
    let tier = ProductionTier::One;
    vec![
        card(tier, "T1-001", "Fix attendance check-in", Funds::new(0, 0, 0, 0, 4, 0), Gem::Red, 1),
        card(tier, "T1-002", "Confirm meeting room booking", Funds::new(4, 0, 0, 0, 0, 0), Gem::Green, 1),
        card(tier, "T1-003", "Tidy email subject rules", Funds::new(0, 0, 0, 4, 0, 0), Gem::Blue, 1),
        card(tier, "T1-004", "Check for missing signatures", Funds::new(0, 0, 4, 0, 0, 0), Gem::Black, 1),
        card(tier, "T1-005", "Virus-scan attachments", Funds::new(0, 4, 0, 0, 0, 0), Gem::White, 1),
        card(tier, "T1-006", "Scan travel receipts", Funds::new(1, 0, 2, 0, 0, 0), Gem::Red, 0),
        card(tier, "T1-007", "Draft weekly report", Funds::new(1, 0, 0, 0, 2, 0), Gem::Green, 0),
        card(tier, "T1-008", "Reorganize document folders", Funds::new(0, 0, 1, 2, 0, 0), Gem::Blue, 0),
        card(tier, "T1-009", "Apply file naming standard", Funds::new(0, 2, 0, 1, 0, 0), Gem::Black, 0),
        card(tier, "T1-010", "Summarize meeting minutes", Funds::new(0, 0, 0, 2, 1, 0), Gem::White, 0),
        card(tier, "T1-011", "File a work request ticket", Funds::new(1, 1, 1, 0, 1, 0), Gem::Red, 0),
        card(tier, "T1-012", "Quick QA check", Funds::new(1, 1, 0, 1, 1, 0), Gem::Green, 0),
        card(tier, "T1-013", "Inventory checklist", Funds::new(1, 0, 1, 1, 1, 0), Gem::Blue, 0),
        card(tier, "T1-014", "Tag customer inquiries", Funds::new(1, 1, 1, 1, 0, 0), Gem::Black, 0),
        card(tier, "T1-015", "Draft internal notice", Funds::new(0, 1, 1, 1, 1, 0), Gem::White, 0),
        card(tier, "T1-016", "Write access request", Funds::new(1, 1, 2, 0, 0, 0), Gem::Red, 0),
        card(tier, "T1-017", "Assist with voucher entry", Funds::new(0, 2, 0, 1, 1, 0), Gem::Green, 0),
        card(tier, "T1-018", "Write quote request", Funds::new(2, 0, 2, 1, 0, 0), Gem::Blue, 0),
        card(tier, "T1-019", "Add events to calendar", Funds::new(1, 2, 0, 2, 0, 0), Gem::Black, 0),
        card(tier, "T1-020", "List vendors and materials", Funds::new(0, 0, 2, 2, 1, 0), Gem::White, 0),
        card(tier, "T1-021", "Apply document template", Funds::new(0, 0, 2, 0, 3, 0), Gem::Red, 0),
        card(tier, "T1-022", "Convert to standard format", Funds::new(3, 0, 0, 2, 0, 0), Gem::Green, 0),
        card(tier, "T1-023", "Tidy work log", Funds::new(2, 0, 0, 0, 3, 0), Gem::Blue, 0),
        card(tier, "T1-024", "Register sample shipment", Funds::new(0, 0, 3, 2, 0, 0), Gem::Black, 0),
        card(tier, "T1-025", "Check inspection sheet", Funds::new(0, 3, 0, 2, 0, 0), Gem::White, 0),
        card(tier, "T1-026", "Write risk checklist", Funds::new(2, 0, 2, 0, 2, 0), Gem::Red, 0),
        card(tier, "T1-027", "Unify version labels", Funds::new(2, 0, 0, 2, 2, 0), Gem::Green, 0),
        card(tier, "T1-028", "Answer data request", Funds::new(2, 0, 2, 2, 0, 0), Gem::Blue, 0),
        card(tier, "T1-029", "Print meeting handouts", Funds::new(0, 3, 0, 3, 0, 0), Gem::Black, 0),
        card(tier, "T1-030", "Update attendance sheet", Funds::new(0, 0, 0, 3, 3, 0), Gem::White, 0),
        card(tier, "T1-031", "Sort and dedupe data", Funds::new(1, 1, 0, 0, 2, 0), Gem::Red, 0),
        card(tier, "T1-032", "Resize images", Funds::new(0, 1, 0, 1, 2, 0), Gem::Green, 0),
        card(tier, "T1-033", "Take backup snapshot", Funds::new(2, 0, 0, 1, 2, 0), Gem::Blue, 0),
        card(tier, "T1-034", "Verify approval chain", Funds::new(2, 0, 2, 2, 0, 0), Gem::Black, 0),
        card(tier, "T1-035", "Log phone memos", Funds::new(0, 2, 1, 0, 1, 0), Gem::White, 0),
        card(tier, "T1-036", "Sort important mail", Funds::new(0, 2, 2, 0, 2, 0), Gem::Red, 0),
        card(tier, "T1-037", "Refresh project status sheet", Funds::new(1, 0, 0, 1, 2, 0), Gem::Green, 0),
        card(tier, "T1-038", "Apply a simple macro", Funds::new(2, 0, 2, 1, 0, 0), Gem::Blue, 0),
        card(tier, "T1-039", "Scan and file documents", Funds::new(2, 2, 0, 0, 0, 0), Gem::Black, 0),
        card(tier, "T1-040", "Final checklist review", Funds::new(0, 0, 2, 1, 2, 0), Gem::White, 0),
    ]
}

fn get_tier_two_cards() -> Vec<Identifiable<ProductionCard, CardId>> {
    let tier = ProductionTier::Two;
    vec![
        card(tier, "T2-001", "Draft process improvement", Funds::new(0, 0, 0, 0, 5, 0), Gem::Red, 2),
        card(tier, "T2-002", "Collaboration tool rollout report", Funds::new(5, 0, 0, 0, 0, 0), Gem::Green, 2),
        card(tier, "T2-003", "Cross-team schedule plan", Funds::new(0, 0, 0, 5, 0, 0), Gem::Blue, 2),
        card(tier, "T2-004", "Customer feedback analysis", Funds::new(0, 0, 5, 0, 0, 0), Gem::Black, 2),
        card(tier, "T2-005", "Monthly results summary", Funds::new(0, 5, 0, 0, 0, 0), Gem::White, 2),
        card(tier, "T2-006", "Cost analysis sheet", Funds::new(6, 0, 0, 0, 0, 0), Gem::Red, 3),
        card(tier, "T2-007", "Delivery risk report", Funds::new(0, 0, 0, 0, 6, 0), Gem::Green, 3),
        card(tier, "T2-008", "Quality issue response plan", Funds::new(0, 0, 6, 0, 0, 0), Gem::Blue, 3),
        card(tier, "T2-009", "New supplier review", Funds::new(0, 6, 0, 0, 0, 0), Gem::Black, 3),
        card(tier, "T2-010", "Contract terms comparison", Funds::new(0, 0, 0, 6, 0, 0), Gem::White, 3),
        card(tier, "T2-011", "Write project WBS", Funds::new(1, 2, 2, 0, 1, 0), Gem::Red, 1),
        card(tier, "T2-012", "Test plan", Funds::new(1, 2, 0, 2, 2, 0), Gem::Green, 2),
        card(tier, "T2-013", "Release checklist v2", Funds::new(2, 0, 2, 2, 2, 0), Gem::Blue, 2),
        card(tier, "T2-014", "Security audit report", Funds::new(2, 2, 2, 1, 0, 0), Gem::Black, 2),
        card(tier, "T2-015", "Infra cost reduction plan", Funds::new(0, 2, 1, 2, 1, 0), Gem::White, 1),
        card(tier, "T2-016", "Onboarding training material", Funds::new(2, 3, 2, 0, 0, 0), Gem::Red, 2),
        card(tier, "T2-017", "Update product brochure", Funds::new(0, 1, 0, 1, 4, 0), Gem::Green, 2),
        card(tier, "T2-018", "Weekly QA report", Funds::new(3, 0, 0, 3, 0, 0), Gem::Blue, 1),
        card(tier, "T2-019", "Draft external communication", Funds::new(2, 3, 0, 2, 0, 0), Gem::Black, 2),
        card(tier, "T2-020", "Claim handling report", Funds::new(0, 0, 3, 2, 3, 0), Gem::White, 2),
        card(tier, "T2-021", "Sales forecast model", Funds::new(0, 2, 3, 0, 3, 0), Gem::Red, 3),
        card(tier, "T2-022", "Staffing plan", Funds::new(4, 0, 0, 2, 1, 0), Gem::Green, 2),
        card(tier, "T2-023", "Purchase request package", Funds::new(2, 0, 0, 0, 3, 0), Gem::Blue, 2),
        card(tier, "T2-024", "Revise inspection standards", Funds::new(0, 0, 3, 2, 0, 0), Gem::Black, 1),
        card(tier, "T2-025", "Outage retrospective", Funds::new(0, 3, 2, 2, 0, 0), Gem::White, 2),
        card(tier, "T2-026", "Draft client proposal", Funds::new(2, 0, 2, 0, 2, 0), Gem::Red, 2),
        card(tier, "T2-027", "Design OKRs", Funds::new(2, 0, 0, 1, 2, 0), Gem::Green, 1),
        card(tier, "T2-028", "Document automation script", Funds::new(0, 0, 4, 4, 0, 0), Gem::Blue, 3),
        card(tier, "T2-029", "Draft data dashboard", Funds::new(0, 2, 2, 2, 0, 0), Gem::Black, 2),
        card(tier, "T2-030", "Establish review process", Funds::new(0, 0, 0, 3, 3, 0), Gem::White, 1),
    ]
}

fn get_tier_three_cards() -> Vec<Identifiable<ProductionCard, CardId>> {
    let tier = ProductionTier::Three;
    vec![
        card(tier, "T3-001", "Company-wide KPI report", Funds::new(0, 0, 7, 0, 3, 0), Gem::Red, 5),
        card(tier, "T3-002", "Major deal closing report", Funds::new(3, 7, 0, 0, 0, 0), Gem::Green, 5),
        card(tier, "T3-003", "Executive briefing deck", Funds::new(0, 0, 0, 3, 7, 0), Gem::Blue, 5),
        card(tier, "T3-004", "Annual strategy roadmap", Funds::new(7, 0, 3, 0, 0, 0), Gem::Black, 5),
        card(tier, "T3-005", "Final audit response", Funds::new(0, 3, 0, 7, 0, 0), Gem::White, 5),
        card(tier, "T3-006", "New business feasibility study", Funds::new(0, 0, 0, 0, 7, 0), Gem::Red, 4),
        card(tier, "T3-007", "Company process standardization", Funds::new(7, 0, 0, 0, 0, 0), Gem::Green, 4),
        card(tier, "T3-008", "Conference talk deck", Funds::new(0, 0, 0, 7, 0, 0), Gem::Blue, 4),
        card(tier, "T3-009", "Key account retention strategy", Funds::new(3, 3, 3, 0, 3, 0), Gem::Black, 3),
        card(tier, "T3-010", "Crisis response manual", Funds::new(0, 3, 3, 3, 3, 0), Gem::White, 4),
        card(tier, "T3-011", "Cost structure overhaul", Funds::new(2, 3, 3, 0, 2, 0), Gem::Red, 3),
        card(tier, "T3-012", "M&A due diligence report", Funds::new(2, 3, 0, 3, 3, 0), Gem::Green, 4),
        card(tier, "T3-013", "Global launch checklist", Funds::new(3, 0, 3, 2, 3, 0), Gem::Blue, 3),
        card(tier, "T3-014", "Security certification package", Funds::new(6, 0, 0, 6, 0, 0), Gem::Black, 4),
        card(tier, "T3-015", "Company data governance", Funds::new(4, 0, 4, 0, 4, 0), Gem::White, 3),
        card(tier, "T3-016", "Large-scale outage prevention design", Funds::new(0, 0, 3, 5, 3, 0), Gem::Red, 4),
        card(tier, "T3-017", "AI automation transition report", Funds::new(2, 5, 0, 3, 0, 0), Gem::Green, 3),
        card(tier, "T3-018", "Workforce efficiency plan", Funds::new(0, 3, 5, 0, 3, 0), Gem::Blue, 4),
        card(tier, "T3-019", "Board of directors report", Funds::new(4, 4, 0, 4, 0, 0), Gem::Black, 3),
        card(tier, "T3-020", "Year-end performance review", Funds::new(3, 0, 3, 0, 4, 0), Gem::White, 4),
    ]
}

pub fn get_nobles() -> Vec<Noble> {
    vec![
        noble("R-01", "Director Kim's recommendation", Funds::new(0, 2, 0, 4, 2, 0)),
        noble("R-02", "Director Na's recommendation", Funds::new(2, 0, 4, 0, 2, 0)),
        noble("R-03", "Director Park's recommendation", Funds::new(0, 4, 2, 2, 0, 0)),
        noble("R-04", "Director Lee's recommendation", Funds::new(2, 0, 0, 2, 4, 0)),
        noble("R-05", "Director Ha's recommendation", Funds::new(4, 2, 2, 0, 0, 0)),
        noble("R-06", "Principal researcher's recommendation", Funds::new(0, 3, 3, 3, 0, 0)),
        noble("R-07", "Managing director's recommendation", Funds::new(3, 0, 0, 3, 3, 0)),
        noble("R-08", "Senior managing director's recommendation", Funds::new(0, 4, 0, 0, 4, 0)),
        noble("R-09", "Vice president's recommendation", Funds::new(4, 0, 4, 0, 0, 0)),
        noble("R-10", "HR lead's recommendation", Funds::new(2, 2, 2, 2, 2, 0)),
    ]
}
