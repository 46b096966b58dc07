use super::*;
use crate::{cards_value, hand_value, is_soft, BLACKJACK};

impl GameStateMachine {
    /// Plays out the dealer. With a hand still live this is a stand on the last hand, so
    /// the forced-hit rule applies and unplayed split hands are rejected.
    pub fn resolve_dealer_hand(&self) -> Self {
        self.settle("resolve_dealer_hand", self.try_resolve_dealer_hand())
    }

    pub fn try_resolve_dealer_hand(&self) -> Result<Self, TransitionError> {
        self.expect_phase(Phase::Hand)?;
        if !self.is_dealt() {
            return Err(TransitionError::NotDealt);
        }
        self.ensure_not_blocked()?;
        if !self.all_hands_done() {
            let remaining = self.player_hands.len().saturating_sub(self.active_hand);
            if remaining > 1 {
                return Err(TransitionError::HandsRemaining(remaining));
            }
            return self.try_player_stand(self.active_hand);
        }
        let mut next = self.clone();
        next.play_dealer()?;
        Ok(next)
    }

    pub(super) fn play_dealer(&mut self) -> Result<(), TransitionError> {
        self.dealer_hole_card_revealed = true;
        if self.rules.dealer_draws_three {
            self.dealer_draw_three()?;
        } else {
            while self.dealer_should_hit() {
                let card = self.run.shoe.draw_card()?;
                self.dealer_hand.cards.push(card);
            }
        }
        self.active_hand = self.player_hands.len();
        self.phase = Phase::HandResolution;
        Ok(())
    }

    fn dealer_should_hit(&self) -> bool {
        let value = hand_value(&self.dealer_hand);
        let threshold = self.rules.dealer_stand_threshold;
        if value < threshold {
            return true;
        }
        value == 17
            && threshold == 17
            && self.rules.dealer_hits_soft_17
            && is_soft(&self.dealer_hand)
    }

    /// Three one-card extensions; the best total at or under 21 is kept, or the lowest if
    /// all three bust. The other two go to the back of the shoe.
    fn dealer_draw_three(&mut self) -> Result<(), TransitionError> {
        let candidates = self.run.shoe.draw_cards(3)?;
        let value_with = |card: &Card| {
            let mut cards = self.dealer_hand.cards.clone();
            cards.push(*card);
            cards_value(&cards)
        };
        let values: Vec<u32> = candidates.iter().map(value_with).collect();
        let mut chosen = 0;
        let any_valid = values.iter().any(|value| *value <= BLACKJACK);
        for (idx, value) in values.iter().enumerate() {
            let best = values[chosen];
            let better = if any_valid {
                *value <= BLACKJACK && (best > BLACKJACK || *value > best)
            } else {
                *value < best
            };
            if better {
                chosen = idx;
            }
        }
        for (idx, card) in candidates.into_iter().enumerate() {
            if idx == chosen {
                self.dealer_hand.cards.push(card);
            } else {
                self.run.shoe.return_card(card);
            }
        }
        Ok(())
    }
}
