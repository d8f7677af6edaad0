use std::sync::Arc;

use anyhow::Result;
use core_mechanics::board::Board;
use core_mechanics::original_game::get_original_game_board;
use core_mechanics::player::{Player, PlayerId};
use core_mechanics::setup::MAX_PLAYERS;
use futures_lite::StreamExt;
use iroh::PublicKey;
use iroh_gossip::net::{Event, GossipEvent, GossipReceiver, GossipSender};
use rand_chacha::ChaCha8Rng;
use tokio::sync::{watch, Mutex};
use tracing::{debug, info, warn};

use crate::network_message::Message;
use crate::terminal::{render_board, render_standings};

#[derive(Debug, Clone)]
struct Seat {
    node: PublicKey,
    name: String,
}

/// The authoritative side of a shared table. It keeps the seats, resolves
/// every move one at a time and says what everyone else should hear.
pub struct Table {
    my_id: PublicKey,
    seats: Vec<Seat>,
    board: Option<Board>,
    rng: ChaCha8Rng,
}

impl Table {
    /// The host sits down first.
    pub fn new(my_id: PublicKey, my_name: impl Into<String>, rng: ChaCha8Rng) -> Self {
        Self {
            my_id,
            seats: vec![Seat {
                node: my_id,
                name: my_name.into(),
            }],
            board: None,
            rng,
        }
    }

    pub fn board(&self) -> Option<&Board> {
        self.board.as_ref()
    }

    fn is_game_running(&self) -> bool {
        self.board.as_ref().is_some_and(|b| !b.is_over())
    }

    fn announce(&self, text: impl Into<String>) -> Message {
        Message::announcement(self.my_id, text)
    }

    /// Handles one incoming message and returns what to broadcast.
    pub fn handle(&mut self, message: Message) -> Vec<Message> {
        match message {
            Message::JoinTable { from, name, .. } => self.join(from, name),
            Message::StartGame { .. } => self.start(),
            Message::Action { from, action, .. } => {
                let Some(board) = self.board.as_ref().filter(|b| !b.is_over()) else {
                    return vec![self.announce("The game hasn't started yet")];
                };
                let Some(seat) = self.seats.iter().position(|s| s.node == from) else {
                    return vec![self.announce(format!("{} is not seated at this table", from.fmt_short()))];
                };

                match board.do_action_as(PlayerId::new(seat as u8), &action) {
                    Ok(new_board_state) => {
                        debug!(seat, ?action, "move accepted");
                        let mut replies = vec![Message::board_state_updated(
                            self.my_id,
                            new_board_state.clone(),
                        )];
                        if let Some(winner) = new_board_state.get_winner() {
                            let name = &self.seats[winner.seat()].name;
                            info!(%winner, "shared game finished");
                            replies.push(self.announce(format!(
                                "{} earned the vacation!\n{}",
                                name,
                                render_standings(&new_board_state)
                            )));
                        }
                        self.board = Some(new_board_state);
                        replies
                    }
                    Err(violation) => {
                        vec![self.announce(format!(
                            "{}: {} ({})",
                            self.seats[seat].name,
                            violation,
                            violation.kind()
                        ))]
                    }
                }
            }
            Message::Announcement { .. } | Message::BoardStateUpdated { .. } => vec![],
        }
    }

    fn join(&mut self, from: PublicKey, name: String) -> Vec<Message> {
        if self.is_game_running() {
            return vec![self.announce("Game is already running")];
        }
        if self.seats.iter().any(|s| s.node == from) {
            return vec![self.announce(format!("{} is already seated", name))];
        }
        if self.seats.len() >= MAX_PLAYERS {
            return vec![self.announce("The table is full")];
        }
        self.seats.push(Seat { node: from, name });
        let seat = self.seats.len() - 1;
        vec![self.announce(format!(
            "{} sat down at seat {}",
            self.seats[seat].name,
            seat + 1
        ))]
    }

    fn start(&mut self) -> Vec<Message> {
        if self.is_game_running() {
            return vec![self.announce("Game is already running")];
        }

        let roster: Vec<Player> = self
            .seats
            .iter()
            .enumerate()
            .map(|(n, seat)| {
                Player::seated(PlayerId::new(n as u8))
                    .with_name(seat.name.clone())
                    .with_uid(seat.node.to_string())
            })
            .collect();

        match get_original_game_board(roster, &mut self.rng) {
            Ok(board) => {
                info!(players = self.seats.len(), "shared game started");
                let first = board.get_who_is_playing_now().display_name();
                self.board = Some(board.clone());
                vec![
                    self.announce(format!(
                        "Starting a new game with {} players, {} goes first",
                        self.seats.len(),
                        first
                    )),
                    Message::board_state_updated(self.my_id, board),
                ]
            }
            Err(error) => vec![self.announce(error.to_string())],
        }
    }
}

/// Prints what a message means to the person at this terminal.
pub fn report(message: &Message) {
    match message {
        Message::JoinTable { from, name, .. } => {
            println!("> {} ({}) wants to sit down", name, from.fmt_short());
        }
        Message::StartGame { from, .. } => {
            println!("> {} wants to start the game", from.fmt_short());
        }
        Message::Action { from, action, .. } => {
            println!("> {} plays {:?}", from.fmt_short(), action);
        }
        Message::Announcement { message, .. } => {
            println!(">>> Host: {}", message);
        }
        Message::BoardStateUpdated { board, .. } => {
            print!("{}", render_board(board));
        }
    }
}

/// Shows and broadcasts the host's replies.
pub async fn publish(sender: &GossipSender, messages: Vec<Message>) -> Result<()> {
    for message in messages {
        report(&message);
        sender.broadcast(message.to_vec()?.into()).await?;
    }
    Ok(())
}

pub async fn subscribe_server_loop(
    mut receiver: GossipReceiver,
    sender: GossipSender,
    table: Arc<Mutex<Table>>,
) -> Result<()> {
    println!(">>> I WILL KEEP TRACK OF THE GAME (I'M THE HOST)");

    while let Some(event) = receiver.try_next().await? {
        if let Event::Gossip(GossipEvent::Received(msg)) = event {
            let message = match Message::from_bytes(&msg.content) {
                Ok(message) => message,
                Err(error) => {
                    warn!(%error, from = %msg.delivered_from.fmt_short(), "dropping malformed message");
                    continue;
                }
            };
            report(&message);
            let replies = table.lock().await.handle(message);
            if let Err(error) = publish(&sender, replies).await {
                warn!(%error, "could not reach the other players");
            }
        }
    }
    Ok(())
}

pub async fn subscribe_client_loop(
    mut receiver: GossipReceiver,
    latest_board: watch::Sender<Option<Board>>,
) -> Result<()> {
    println!(">>> I WILL JUST PLAY THE GAME (I'M A GUEST)");

    while let Some(event) = receiver.try_next().await? {
        if let Event::Gossip(GossipEvent::Received(msg)) = event {
            match Message::from_bytes(&msg.content) {
                Ok(message) => {
                    report(&message);
                    if let Message::BoardStateUpdated { board, .. } = message {
                        latest_board.send_replace(Some(board));
                    }
                }
                Err(error) => {
                    warn!(%error, "dropping malformed message");
                }
            }
        }
    }
    Ok(())
}
