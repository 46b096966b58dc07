use super::*;
use crate::{hand_value, rebuild_shoe, DealerAbility, BLACKJACK};
use tracing::info;

// Separates the table stream from the shop stream derived from the same run seed.
const TABLE_STREAM: u64 = 0x9e37_79b9_7f4a_7c15;

pub(super) fn table_rng(seed: u64) -> RngState {
    RngState::from_seed(seed ^ TABLE_STREAM)
}

impl GameStateMachine {
    pub(super) fn dealer_abilities(&self) -> &[DealerAbility] {
        self.dealer
            .as_ref()
            .map(|dealer| dealer.abilities.as_slice())
            .unwrap_or(&[])
    }

    pub(super) fn compute_rules(&self) -> HandRules {
        HandRules::from_abilities(self.dealer_abilities(), self.effects.patched, &self.balance)
    }

    /// Wave minimum, doubled when the dealer raises the stakes.
    pub(super) fn compute_min_bet(&self) -> u32 {
        let base = self.balance.min_bet_for_wave(self.run.wave, &self.run.config);
        if self.dealer_abilities().contains(&DealerAbility::DoubleMinBet) {
            base * 2
        } else {
            base
        }
    }

    pub(super) fn rebuild_shoe(&mut self) {
        self.run.shoe = rebuild_shoe(&self.run.owned_hacks, &mut self.rng);
    }

    /// Clears everything scoped to a single hand.
    pub(super) fn reset_hand_state(&mut self) {
        self.player_hands.clear();
        self.active_hand = 0;
        self.dealer_hand = Hand::default();
        self.dealer_hole_card_revealed = false;
        self.hit_count = 0;
        self.effects = HandEffects::default();
        self.pending = None;
        self.rules = self.compute_rules();
    }

    /// Sends the player to betting, or to the emergency screen when chips cannot cover
    /// the minimum bet.
    pub(super) fn route_to_betting(&mut self) {
        self.phase = if self.run.chips < self.min_bet {
            Phase::EmergencyChips
        } else {
            Phase::Betting
        };
    }

    pub(super) fn finish_run(&mut self, phase: Phase) {
        self.run.score = self.run.compute_score();
        self.phase = phase;
        info!(
            outcome = ?phase,
            wave = self.run.wave,
            chips = self.run.chips,
            lives = self.run.lives,
            score = self.run.score,
            "run ended"
        );
    }

    pub(super) fn active_hand_index(&self, hand_index: usize) -> Result<usize, TransitionError> {
        if !self.is_dealt() {
            return Err(TransitionError::NotDealt);
        }
        if hand_index >= self.player_hands.len() {
            return Err(TransitionError::InvalidHandIndex(hand_index));
        }
        if hand_index != self.active_hand {
            return Err(TransitionError::HandNotActive(hand_index));
        }
        Ok(hand_index)
    }

    pub(super) fn ensure_not_blocked(&self) -> Result<(), TransitionError> {
        match self.pending {
            Some(pending) if pending.blocks_play() => Err(TransitionError::InteractionPending),
            _ => Ok(()),
        }
    }

    /// Moves play to the next hand; running off the last one plays out the dealer.
    pub(super) fn advance_hand(&mut self) -> Result<(), TransitionError> {
        self.active_hand += 1;
        self.hit_count = 0;
        if self.active_hand >= self.player_hands.len() {
            self.play_dealer()?;
        }
        Ok(())
    }

    /// Called after a card lands in the active hand from a hit.
    pub(super) fn after_hit(&mut self) -> Result<(), TransitionError> {
        let value = hand_value(&self.player_hands[self.active_hand]);
        if value >= BLACKJACK {
            self.advance_hand()?;
        }
        Ok(())
    }

    pub(super) fn count_hit(&mut self) {
        if self.player_hands[self.active_hand].is_ace_split {
            return;
        }
        if self.effects.free_hits > 0 {
            self.effects.free_hits -= 1;
        } else {
            self.hit_count += 1;
        }
    }

    pub(super) fn hit_limit_error(&self, hand_index: usize) -> Option<TransitionError> {
        let hand = &self.player_hands[hand_index];
        if hand.is_ace_split || self.effects.free_hits > 0 {
            return None;
        }
        let cap = self.rules.hit_cap? + self.effects.extra_hit_cap;
        (self.hit_count >= cap).then_some(TransitionError::HitCapReached(cap))
    }
}
