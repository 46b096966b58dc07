use crate::{create_standard_deck, Card, Rank, RngState, RunConfig, Shoe, Suit};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Boss,
}

impl Rarity {
    pub const ALL: [Rarity; 4] = [Rarity::Common, Rarity::Uncommon, Rarity::Rare, Rarity::Boss];
}

/// Declaration order is the application order when the shoe is rebuilt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ShoeHackId {
    Add2Aces,
    AddGlitchCard,
    BiasTensUp,
    Remove4Low,
    Remove4Tens,
}

/// What one stack of a hack does to the shoe. Interpreted by [`apply_hack_effect`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HackEffect {
    AddCards(&'static [(Suit, Rank)]),
    AddGlitchCards(u8),
    /// Removes up to `count` matching cards, scanning from the back of the shoe.
    RemoveFromBack {
        ranks: &'static [Rank],
        count: u8,
    },
}

#[derive(Debug, Clone, Copy)]
pub struct ShoeHackDef {
    pub id: ShoeHackId,
    pub name: &'static str,
    pub description: &'static str,
    pub rarity: Rarity,
    pub base_cost: u32,
    pub max_stacks: u8,
    pub effect: HackEffect,
}

const TEN_VALUED: &[Rank] = &[Rank::Ten, Rank::Jack, Rank::Queen, Rank::King];

const SHOE_HACKS: &[ShoeHackDef] = &[
    ShoeHackDef {
        id: ShoeHackId::Add2Aces,
        name: "Ace Injection",
        description: "Add 2 extra aces to the shoe",
        rarity: Rarity::Uncommon,
        base_cost: 50,
        max_stacks: 3,
        effect: HackEffect::AddCards(&[(Suit::Hearts, Rank::Ace), (Suit::Diamonds, Rank::Ace)]),
    },
    ShoeHackDef {
        id: ShoeHackId::AddGlitchCard,
        name: "Glitch Card",
        description: "Add a special Glitch card (counts as any value 1-11)",
        rarity: Rarity::Rare,
        base_cost: 75,
        max_stacks: 2,
        effect: HackEffect::AddGlitchCards(1),
    },
    ShoeHackDef {
        id: ShoeHackId::BiasTensUp,
        name: "Ten Bias",
        description: "Increase probability of drawing 10/J/Q/K",
        rarity: Rarity::Common,
        base_cost: 60,
        max_stacks: 3,
        effect: HackEffect::AddCards(&[
            (Suit::Hearts, Rank::Ten),
            (Suit::Diamonds, Rank::Jack),
            (Suit::Clubs, Rank::Queen),
            (Suit::Spades, Rank::King),
        ]),
    },
    ShoeHackDef {
        id: ShoeHackId::Remove4Low,
        name: "Low Card Removal",
        description: "Remove 4 low cards (2s and 3s) from shoe",
        rarity: Rarity::Common,
        base_cost: 40,
        max_stacks: 2,
        effect: HackEffect::RemoveFromBack {
            ranks: &[Rank::Two, Rank::Three],
            count: 4,
        },
    },
    ShoeHackDef {
        id: ShoeHackId::Remove4Tens,
        name: "Ten Removal",
        description: "Remove 4 tens from shoe (hard mode, grants strategy advantage)",
        rarity: Rarity::Common,
        base_cost: 30,
        max_stacks: 2,
        effect: HackEffect::RemoveFromBack {
            ranks: TEN_VALUED,
            count: 4,
        },
    },
];

pub fn all_shoe_hacks() -> &'static [ShoeHackDef] {
    SHOE_HACKS
}

pub fn shoe_hack(id: ShoeHackId) -> ShoeHackDef {
    // Catalog rows are kept in the enum's declaration order.
    SHOE_HACKS[id as usize]
}

pub fn hack_stacks(owned: &BTreeMap<ShoeHackId, u8>, id: ShoeHackId) -> u8 {
    owned.get(&id).copied().unwrap_or(0)
}

pub fn is_hack_maxed(owned: &BTreeMap<ShoeHackId, u8>, id: ShoeHackId) -> bool {
    hack_stacks(owned, id) >= shoe_hack(id).max_stacks
}

/// Price of the next stack: base grows by `growth_percent` per stack already owned,
/// then the run's difficulty applies.
pub fn hack_cost(
    id: ShoeHackId,
    owned_stacks: u8,
    growth_percent: u32,
    config: &RunConfig,
) -> u32 {
    let base = shoe_hack(id).base_cost;
    let grown = base * (100 + growth_percent * u32::from(owned_stacks)) / 100;
    config.scale(grown)
}

/// Applies one stack. New cards take ids from `next_id`, which is advanced.
pub fn apply_hack_effect(cards: &mut Vec<Card>, effect: HackEffect, next_id: &mut u32) {
    match effect {
        HackEffect::AddCards(added) => {
            for (suit, rank) in added {
                cards.push(Card::standard(*suit, *rank).with_id(*next_id));
                *next_id += 1;
            }
        }
        HackEffect::AddGlitchCards(count) => {
            for _ in 0..count {
                cards.push(Card::glitch(*next_id));
                *next_id += 1;
            }
        }
        HackEffect::RemoveFromBack { ranks, count } => {
            let mut removed = 0u8;
            let mut idx = cards.len();
            while idx > 0 && removed < count {
                idx -= 1;
                let card = cards[idx];
                if !card.is_glitch && ranks.contains(&card.rank) {
                    cards.remove(idx);
                    removed += 1;
                }
            }
        }
    }
}

/// The unshuffled card list for an owned-hack map: a fresh standard deck, then every
/// stack in key order.
pub fn hacked_deck(owned: &BTreeMap<ShoeHackId, u8>) -> Vec<Card> {
    let mut cards = create_standard_deck();
    let mut next_id = cards.len() as u32 + 1;
    for (id, stacks) in owned {
        let def = shoe_hack(*id);
        for _ in 0..(*stacks).min(def.max_stacks) {
            apply_hack_effect(&mut cards, def.effect, &mut next_id);
        }
    }
    cards
}

/// Always starts from scratch, so rebuilding twice never double-applies a hack.
pub fn rebuild_shoe(owned: &BTreeMap<ShoeHackId, u8>, rng: &mut RngState) -> Shoe {
    let mut shoe = Shoe::from_cards(hacked_deck(owned));
    shoe.shuffle(rng);
    shoe
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(entries: &[(ShoeHackId, u8)]) -> BTreeMap<ShoeHackId, u8> {
        entries.iter().copied().collect()
    }

    #[test]
    fn catalog_rows_match_ids() {
        for (idx, hack) in all_shoe_hacks().iter().enumerate() {
            assert_eq!(hack.id as usize, idx);
            assert_eq!(shoe_hack(hack.id).name, hack.name);
        }
    }

    #[test]
    fn additions_and_removals_change_composition() {
        let deck = hacked_deck(&owned(&[
            (ShoeHackId::Add2Aces, 2),
            (ShoeHackId::Remove4Low, 1),
            (ShoeHackId::AddGlitchCard, 1),
        ]));
        let shoe = Shoe::from_cards(deck);
        let composition = shoe.composition();
        assert_eq!(composition.count(Rank::Ace), 8);
        assert_eq!(composition.glitches, 1);
        assert_eq!(composition.count(Rank::Two) + composition.count(Rank::Three), 4);
        assert_eq!(shoe.len(), 52 + 4 + 1 - 4);
    }

    #[test]
    fn removal_stops_when_nothing_matches() {
        let deck = hacked_deck(&owned(&[(ShoeHackId::Remove4Low, 2)]));
        let composition = Shoe::from_cards(deck).composition();
        assert_eq!(composition.count(Rank::Two) + composition.count(Rank::Three), 0);
        let ten_removal = hacked_deck(&owned(&[(ShoeHackId::Remove4Tens, 2)]));
        let composition = Shoe::from_cards(ten_removal).composition();
        let tens: usize = TEN_VALUED.iter().map(|rank| composition.count(*rank)).sum();
        assert_eq!(tens, 8);
    }

    #[test]
    fn new_cards_get_fresh_ids() {
        let deck = hacked_deck(&owned(&[(ShoeHackId::BiasTensUp, 1), (ShoeHackId::Add2Aces, 1)]));
        let mut ids: Vec<u32> = deck.iter().map(|card| card.id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), deck.len());
        assert_eq!(ids.last(), Some(&58));
    }

    #[test]
    fn rebuild_is_idempotent_in_composition() {
        let hacks = owned(&[(ShoeHackId::BiasTensUp, 3), (ShoeHackId::Remove4Tens, 1)]);
        let mut rng = RngState::from_seed(8);
        let first = rebuild_shoe(&hacks, &mut rng);
        let second = rebuild_shoe(&hacks, &mut rng);
        assert_eq!(first.len(), second.len());
        assert_eq!(first.composition(), second.composition());
    }

    #[test]
    fn cost_grows_with_stacks_and_difficulty() {
        let base = RunConfig::stage(0);
        assert_eq!(hack_cost(ShoeHackId::Add2Aces, 0, 50, &base), 50);
        assert_eq!(hack_cost(ShoeHackId::Add2Aces, 1, 50, &base), 75);
        assert_eq!(hack_cost(ShoeHackId::Add2Aces, 2, 50, &base), 100);
        assert_eq!(hack_cost(ShoeHackId::Remove4Tens, 1, 50, &RunConfig::stage(2)), 54);
    }

    #[test]
    fn maxed_hacks_are_detected() {
        let hacks = owned(&[(ShoeHackId::AddGlitchCard, 2)]);
        assert!(is_hack_maxed(&hacks, ShoeHackId::AddGlitchCard));
        assert!(!is_hack_maxed(&hacks, ShoeHackId::Add2Aces));
    }
}
