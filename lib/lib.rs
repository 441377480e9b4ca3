/// Chess domain types.
pub mod chess;
/// Countdown clock for timed games.
pub mod clock;
/// A game session between two players.
pub mod game;
/// Message passing with the other player.
pub mod remote;
/// Runtime configuration.
pub mod settings;
