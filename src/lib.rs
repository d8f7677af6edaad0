pub mod command;
pub mod local_game;
pub mod network_message;
pub mod network_subscribe;
pub mod oracle;
pub mod terminal;
pub mod ticket;
