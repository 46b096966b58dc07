use super::*;
use crate::{can_split, hand_value, BLACKJACK};

impl GameStateMachine {
    pub fn player_hit(&self, hand_index: usize) -> Self {
        self.settle("player_hit", self.try_player_hit(hand_index))
    }

    pub fn try_player_hit(&self, hand_index: usize) -> Result<Self, TransitionError> {
        self.expect_phase(Phase::Hand)?;
        let index = self.active_hand_index(hand_index)?;
        self.ensure_not_blocked()?;
        if hand_value(&self.player_hands[index]) >= BLACKJACK {
            return Err(TransitionError::HandFinished);
        }
        if let Some(err) = self.hit_limit_error(index) {
            return Err(err);
        }

        let mut next = self.clone();
        if next.rules.burn_on_hit {
            let burned = next.run.shoe.burn_card()?;
            next.run.burned_cards.push(burned);
            next.run.last_burned_card = Some(burned);
        }
        let card = match next.pending.take() {
            Some(PendingInteraction::GlitchHitArmed) => {
                let options = [next.run.shoe.draw_card()?, next.run.shoe.draw_card()?];
                // The hit is counted once a card is chosen.
                next.pending = Some(PendingInteraction::GlitchHitChoice { options });
                return Ok(next);
            }
            Some(PendingInteraction::DoubleVision { card }) => card,
            other => {
                next.pending = other;
                next.run.shoe.draw_card()?
            }
        };
        next.player_hands[index].cards.push(card);
        next.count_hit();
        next.after_hit()?;
        Ok(next)
    }

    pub fn choose_glitch_hit_card(&self, choice: usize) -> Self {
        self.settle("choose_glitch_hit_card", self.try_choose_glitch_hit_card(choice))
    }

    pub fn try_choose_glitch_hit_card(&self, choice: usize) -> Result<Self, TransitionError> {
        self.expect_phase(Phase::Hand)?;
        let Some(PendingInteraction::GlitchHitChoice { options }) = self.pending else {
            return Err(TransitionError::NoGlitchChoice);
        };
        if choice > 1 {
            return Err(TransitionError::InvalidChoice(choice));
        }
        let mut next = self.clone();
        next.pending = None;
        let active = next.active_hand;
        next.player_hands[active].cards.push(options[choice]);
        next.run.shoe.return_card(options[1 - choice]);
        next.count_hit();
        next.after_hit()?;
        Ok(next)
    }

    pub fn player_stand(&self, hand_index: usize) -> Self {
        self.settle("player_stand", self.try_player_stand(hand_index))
    }

    pub fn try_player_stand(&self, hand_index: usize) -> Result<Self, TransitionError> {
        self.expect_phase(Phase::Hand)?;
        let index = self.active_hand_index(hand_index)?;
        self.ensure_not_blocked()?;
        if let Some(threshold) = self.rules.forced_hit_threshold {
            let value = hand_value(&self.player_hands[index]);
            // A capped hand that cannot hit again may always stand.
            if value < threshold && self.hit_limit_error(index).is_none() {
                return Err(TransitionError::MustHit { value, threshold });
            }
        }
        let mut next = self.clone();
        next.advance_hand()?;
        Ok(next)
    }

    pub fn player_split(&self, hand_index: usize) -> Self {
        self.settle("player_split", self.try_player_split(hand_index))
    }

    pub fn try_player_split(&self, hand_index: usize) -> Result<Self, TransitionError> {
        self.expect_phase(Phase::Hand)?;
        let index = self.active_hand_index(hand_index)?;
        self.ensure_not_blocked()?;
        if !self.rules.split_allowed {
            return Err(TransitionError::SplitNotAllowed);
        }
        let hand = &self.player_hands[index];
        if !can_split(hand) {
            return Err(TransitionError::NotSplittable);
        }
        let bet = self.run.current_bet;
        if self.run.chips < bet {
            return Err(TransitionError::NotEnoughChips {
                needed: bet,
                available: self.run.chips,
            });
        }

        let mut next = self.clone();
        next.run.chips -= bet;
        let aces = hand.cards.iter().all(Card::is_ace);
        let first = vec![hand.cards[0], next.run.shoe.draw_card()?];
        let second = vec![hand.cards[1], next.run.shoe.draw_card()?];
        next.player_hands[index] = Hand::split_from(first, aces);
        next.player_hands.insert(index + 1, Hand::split_from(second, aces));
        next.hit_count = 0;
        Ok(next)
    }
}
