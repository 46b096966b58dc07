use crate::{Card, Rank, RngState, Suit};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};
use thiserror::Error;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum ShoeError {
    #[error("shoe exhausted")]
    Exhausted,
}

/// The 52-card baseline, ids `1..=52`.
pub fn create_standard_deck() -> Vec<Card> {
    let mut cards = Vec::with_capacity(52);
    let mut next_id = 1u32;
    for suit in Suit::ALL {
        for rank in Rank::ALL {
            cards.push(Card::standard(suit, rank).with_id(next_id));
            next_id += 1;
        }
    }
    cards
}

pub fn shuffle_deck(cards: &mut [Card], rng: &mut RngState) {
    rng.shuffle(cards);
}

/// Draw pile. Cards leave from the front and come back at the back.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shoe {
    cards: VecDeque<Card>,
}

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoeComposition {
    pub ranks: BTreeMap<Rank, usize>,
    pub glitches: usize,
}

impl ShoeComposition {
    pub fn total(&self) -> usize {
        self.ranks.values().sum::<usize>() + self.glitches
    }

    pub fn count(&self, rank: Rank) -> usize {
        self.ranks.get(&rank).copied().unwrap_or(0)
    }
}

impl Shoe {
    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self {
            cards: cards.into(),
        }
    }

    pub fn standard52() -> Self {
        Self::from_cards(create_standard_deck())
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Card> + '_ {
        self.cards.iter()
    }

    pub fn peek(&self) -> Option<&Card> {
        self.cards.front()
    }

    pub fn shuffle(&mut self, rng: &mut RngState) {
        rng.shuffle(self.cards.make_contiguous());
    }

    pub fn draw_card(&mut self) -> Result<Card, ShoeError> {
        self.cards.pop_front().ok_or(ShoeError::Exhausted)
    }

    pub fn draw_cards(&mut self, count: usize) -> Result<Vec<Card>, ShoeError> {
        if self.cards.len() < count {
            return Err(ShoeError::Exhausted);
        }
        Ok(self.cards.drain(..count).collect())
    }

    /// Removes the front card from circulation. The caller keeps it on its burned pile.
    pub fn burn_card(&mut self) -> Result<Card, ShoeError> {
        self.draw_card()
    }

    pub fn return_card(&mut self, card: Card) {
        self.cards.push_back(card);
    }

    pub fn return_cards(&mut self, cards: impl IntoIterator<Item = Card>) {
        self.cards.extend(cards);
    }

    pub fn composition(&self) -> ShoeComposition {
        let mut composition = ShoeComposition::default();
        for card in &self.cards {
            if card.is_glitch {
                composition.glitches += 1;
            } else {
                *composition.ranks.entry(card.rank).or_insert(0) += 1;
            }
        }
        composition
    }
}
