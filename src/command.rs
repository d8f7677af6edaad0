use std::str::FromStr;

use core_mechanics::board::Action;
use core_mechanics::gem::{Gem, UnknownGem};
use core_mechanics::production_card::CardId;

pub const HELP: &str = "\
commands:
  take <gem> <gem> [gem]   collect two or three different gems
  double <gem>             collect two gems of the same color
  reserve <card-id>        reserve a face-up card and get a gold
  buy <card-id>            buy a face-up or reserved card
  pass                     end your turn doing nothing
  show                     print the table again
  join                     sit at a shared table
  start                    deal the cards at a shared table
  quit                     leave
gems: white (w), blue (u), green (g), red (r), black (k)";

/// One line typed at the terminal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Play(Action),
    Show,
    Help,
    Join,
    Start,
    Quit,
}

#[derive(Debug, PartialEq, Eq, thiserror::Error)]
pub enum CommandError {
    #[error("type a command, or 'help' to list them")]
    Empty,
    #[error("unknown command '{0}', type 'help' to list them")]
    Unknown(String),
    #[error("'{command}' needs {expected}")]
    MissingArgument {
        command: &'static str,
        expected: &'static str,
    },
    #[error(transparent)]
    InvalidGem(#[from] UnknownGem),
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut words = line.split_whitespace();
        let Some(verb) = words.next() else {
            return Err(CommandError::Empty);
        };
        let args: Vec<&str> = words.collect();

        let command = match verb.to_ascii_lowercase().as_str() {
            "take" => {
                if args.is_empty() {
                    return Err(CommandError::MissingArgument {
                        command: "take",
                        expected: "two or three gems",
                    });
                }
                let gems = args
                    .iter()
                    .map(|arg| arg.parse::<Gem>())
                    .collect::<Result<Vec<Gem>, UnknownGem>>()?;
                Command::Play(Action::CollectDifferent { gems })
            }
            "double" => {
                let gem = args.first().ok_or(CommandError::MissingArgument {
                    command: "double",
                    expected: "a gem",
                })?;
                Command::Play(Action::CollectTwoOfTheSame { gem: gem.parse::<Gem>()? })
            }
            "reserve" => Command::Play(Action::ReserveCardFromBoard {
                card_id: card_id_argument("reserve", &args)?,
            }),
            "buy" => Command::Play(Action::BuyCard {
                card_id: card_id_argument("buy", &args)?,
            }),
            "pass" => Command::Play(Action::PassTheTurn),
            "show" => Command::Show,
            "help" | "?" => Command::Help,
            "join" => Command::Join,
            "start" => Command::Start,
            "quit" | "exit" => Command::Quit,
            other => return Err(CommandError::Unknown(other.to_string())),
        };

        Ok(command)
    }
}

/// Card ids are printed upper case, but typing them in lower case is fine.
fn card_id_argument(command: &'static str, args: &[&str]) -> Result<CardId, CommandError> {
    args.first()
        .map(|id| CardId::new(id.to_ascii_uppercase()))
        .ok_or(CommandError::MissingArgument {
            command,
            expected: "a card id",
        })
}
