//! Hackjack rules: cards and the shoe, dealers, hacks, action cards, the shop and the
//! snapshot state machine that ties a run together.

pub mod action_cards;
pub mod cards;
pub mod config;
pub mod dealers;
pub mod events;
pub mod hacks;
pub mod hand;
pub mod machine;
pub mod rng;
pub mod shoe;
pub mod shop;
pub mod state;

pub use action_cards::*;
pub use cards::*;
pub use config::*;
pub use dealers::*;
pub use events::*;
pub use hacks::*;
pub use hand::*;
pub use machine::*;
pub use rng::*;
pub use shoe::*;
pub use shop::*;
pub use state::*;
