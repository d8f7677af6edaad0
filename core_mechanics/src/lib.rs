pub mod bank;
pub mod board;
pub mod gem;
pub mod noble;
pub mod player;
pub mod production_card;
pub mod setup;
pub mod strategy;

#[cfg(feature = "original-game")]
pub mod original_game;

#[cfg(test)]
mod properties;
