use super::*;
use crate::{can_split, hand_value, BLACKJACK};

impl GameStateMachine {
    pub fn active_player_hand(&self) -> Option<&Hand> {
        self.player_hands.get(self.active_hand)
    }

    /// True once no player hand can take another card.
    pub fn all_hands_done(&self) -> bool {
        self.is_dealt()
            && self
                .player_hands
                .iter()
                .all(|hand| hand_value(hand) >= BLACKJACK)
    }

    pub fn can_hit(&self, hand_index: usize) -> bool {
        self.phase == Phase::Hand
            && self.active_hand_index(hand_index).is_ok()
            && self.ensure_not_blocked().is_ok()
            && hand_value(&self.player_hands[hand_index]) < BLACKJACK
            && self.hit_limit_error(hand_index).is_none()
    }

    pub fn can_stand(&self, hand_index: usize) -> bool {
        if self.phase != Phase::Hand
            || self.active_hand_index(hand_index).is_err()
            || self.ensure_not_blocked().is_err()
        {
            return false;
        }
        match self.rules.forced_hit_threshold {
            Some(threshold) => {
                hand_value(&self.player_hands[hand_index]) >= threshold
                    || self.hit_limit_error(hand_index).is_some()
            }
            None => true,
        }
    }

    pub fn can_split_hand(&self, hand_index: usize) -> bool {
        self.phase == Phase::Hand
            && self.active_hand_index(hand_index).is_ok()
            && self.ensure_not_blocked().is_ok()
            && self.rules.split_allowed
            && can_split(&self.player_hands[hand_index])
            && self.run.chips >= self.run.current_bet
    }

    /// `None` while the dealer hides the total.
    pub fn visible_player_total(&self, hand_index: usize) -> Option<u32> {
        if self.rules.hide_player_total {
            return None;
        }
        self.player_hands.get(hand_index).map(hand_value)
    }

    /// `None` entries are face-down cards.
    pub fn visible_player_cards(&self, hand_index: usize) -> Vec<Option<Card>> {
        let Some(hand) = self.player_hands.get(hand_index) else {
            return Vec::new();
        };
        hand.cards
            .iter()
            .map(|card| (!self.rules.hide_player_cards).then_some(*card))
            .collect()
    }

    /// Dealer cards in order; index 0 is the upcard, index 1 the hole card.
    pub fn visible_dealer_cards(&self) -> Vec<Option<Card>> {
        let revealed = self.dealer_hole_card_revealed;
        self.dealer_hand
            .cards
            .iter()
            .enumerate()
            .map(|(idx, card)| {
                let visible = match idx {
                    0 => revealed || !self.rules.hide_dealer_upcard,
                    1 => revealed || self.effects.hole_card_peeked,
                    _ => true,
                };
                visible.then_some(*card)
            })
            .collect()
    }

    /// Remaining hits on the active hand, `None` when uncapped.
    pub fn hits_remaining(&self) -> Option<u32> {
        let hand = self.active_player_hand()?;
        if hand.is_ace_split {
            return None;
        }
        let cap = self.rules.hit_cap? + self.effects.extra_hit_cap + self.effects.free_hits;
        Some(cap.saturating_sub(self.hit_count))
    }

    pub fn action_cards_remaining(&self) -> u32 {
        self.balance
            .max_action_cards_per_hand
            .saturating_sub(self.effects.action_cards_used)
    }
}
