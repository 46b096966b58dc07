use crate::{
    ActionCardId, BalanceConfig, Card, RunConfig, RunMode, Shoe, ShoeHackId, ShopItem,
    STARTING_ACTION_DECK,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Phase {
    Menu,
    WaveIntro,
    EmergencyChips,
    Betting,
    Hand,
    HandResolution,
    Shop,
    GameOver,
    Victory,
}

impl Phase {
    pub fn is_terminal(self) -> bool {
        matches!(self, Phase::GameOver | Phase::Victory)
    }
}

/// Progression record for one playthrough.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameRun {
    pub wave: u32,
    pub chips: u32,
    pub lives: u32,
    pub score: u32,
    pub current_bet: u32,
    /// Seeds shop generation together with `shop_index`.
    pub seed: u64,
    pub shop_index: u32,
    pub shoe: Shoe,
    #[serde(default)]
    pub burned_cards: Vec<Card>,
    #[serde(default)]
    pub last_burned_card: Option<Card>,
    #[serde(default)]
    pub owned_hacks: BTreeMap<ShoeHackId, u8>,
    #[serde(default)]
    pub action_deck: Vec<ActionCardId>,
    #[serde(default)]
    pub action_hand: Vec<ActionCardId>,
    #[serde(default)]
    pub action_discard: Vec<ActionCardId>,
    #[serde(default)]
    pub shop: Vec<ShopItem>,
    pub config: RunConfig,
}

impl GameRun {
    /// Fresh record. The shoe is left empty and the action deck unshuffled; the state
    /// machine rebuilds and shuffles both when the run starts.
    pub fn new(config: RunConfig, balance: &BalanceConfig, seed: u64) -> Self {
        Self {
            wave: 1,
            chips: config.scale(balance.starting_chips),
            lives: config.starting_lives,
            score: 0,
            current_bet: 0,
            seed,
            shop_index: 0,
            shoe: Shoe::default(),
            burned_cards: Vec::new(),
            last_burned_card: None,
            owned_hacks: BTreeMap::new(),
            action_deck: STARTING_ACTION_DECK.to_vec(),
            action_hand: Vec::new(),
            action_discard: Vec::new(),
            shop: Vec::new(),
            config,
        }
    }

    pub fn mode(&self) -> RunMode {
        self.config.mode
    }

    /// Every action card the player owns, wherever it currently sits.
    pub fn owned_action_cards(&self) -> impl Iterator<Item = &ActionCardId> + '_ {
        self.action_deck
            .iter()
            .chain(self.action_hand.iter())
            .chain(self.action_discard.iter())
    }

    pub fn owned_action_card_count(&self) -> usize {
        self.action_deck.len() + self.action_hand.len() + self.action_discard.len()
    }

    /// Removes the `index`-th card of [`GameRun::owned_action_cards`].
    pub fn remove_owned_action_card(&mut self, index: usize) -> Option<ActionCardId> {
        let mut index = index;
        for pile in [
            &mut self.action_deck,
            &mut self.action_hand,
            &mut self.action_discard,
        ] {
            if index < pile.len() {
                return Some(pile.remove(index));
            }
            index -= pile.len();
        }
        None
    }

    pub fn compute_score(&self) -> u32 {
        match self.config.mode {
            RunMode::Stage => self.wave * 10 + self.lives * 5 + self.chips / 10,
            RunMode::Survival => self.wave,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_run_scales_chips() {
        let balance = BalanceConfig::default();
        let run = GameRun::new(RunConfig::stage(2), &balance, 1);
        assert_eq!(run.chips, 120);
        assert_eq!(run.lives, 3);
        assert_eq!(run.wave, 1);
        assert_eq!(run.action_deck.len(), 4);
    }

    #[test]
    fn score_by_mode() {
        let balance = BalanceConfig::default();
        let mut stage = GameRun::new(RunConfig::stage(0), &balance, 1);
        stage.wave = 4;
        stage.chips = 255;
        assert_eq!(stage.compute_score(), 40 + 15 + 25);
        let mut survival = GameRun::new(RunConfig::survival(0), &balance, 1);
        survival.wave = 13;
        assert_eq!(survival.compute_score(), 13);
    }

    #[test]
    fn removal_walks_every_pile() {
        let balance = BalanceConfig::default();
        let mut run = GameRun::new(RunConfig::stage(0), &balance, 1);
        run.action_hand = vec![ActionCardId::Overclock];
        run.action_discard = vec![ActionCardId::Patch];
        assert_eq!(run.remove_owned_action_card(5), Some(ActionCardId::Patch));
        assert_eq!(run.remove_owned_action_card(4), Some(ActionCardId::Overclock));
        assert_eq!(run.remove_owned_action_card(4), None);
        assert_eq!(run.owned_action_card_count(), 4);
    }
}
