use super::*;

impl GameStateMachine {
    pub fn place_bet(&self, amount: u32) -> Self {
        self.settle("place_bet", self.try_place_bet(amount))
    }

    /// Takes the wager and opens a fresh hand. Cards are dealt separately.
    pub fn try_place_bet(&self, amount: u32) -> Result<Self, TransitionError> {
        self.expect_phase(Phase::Betting)?;
        if amount < self.min_bet || amount > self.run.chips {
            return Err(TransitionError::BetOutOfRange {
                amount,
                min: self.min_bet,
                max: self.run.chips,
            });
        }
        let mut next = self.clone();
        next.run.chips -= amount;
        next.run.current_bet = amount;
        next.run.burned_cards.clear();
        next.run.last_burned_card = None;
        next.last_outcomes.clear();
        next.reset_hand_state();
        next.phase = Phase::Hand;
        Ok(next)
    }

    pub fn deal_initial_hands(&self) -> Self {
        self.settle("deal_initial_hands", self.try_deal_initial_hands())
    }

    pub fn try_deal_initial_hands(&self) -> Result<Self, TransitionError> {
        self.expect_phase(Phase::Hand)?;
        if self.is_dealt() {
            return Err(TransitionError::AlreadyDealt);
        }
        let mut next = self.clone();
        next.rebuild_shoe();
        next.draw_action_cards();

        let mut player = Vec::with_capacity(2);
        let mut dealer = Vec::with_capacity(2);
        for round in 0..2 {
            if round < next.rules.starting_cards {
                player.push(next.run.shoe.draw_card()?);
            }
            dealer.push(next.run.shoe.draw_card()?);
        }
        next.player_hands = vec![Hand::new(player)];
        next.dealer_hand = Hand::new(dealer);
        next.active_hand = 0;
        Ok(next)
    }

    /// Discards what is left of the action hand and draws a fresh one, recycling the
    /// discard pile when the deck runs out.
    fn draw_action_cards(&mut self) {
        let leftover = std::mem::take(&mut self.run.action_hand);
        self.run.action_discard.extend(leftover);
        for _ in 0..self.balance.action_cards_per_hand {
            if self.run.action_deck.is_empty() {
                if self.run.action_discard.is_empty() {
                    break;
                }
                let mut recycled = std::mem::take(&mut self.run.action_discard);
                self.rng.shuffle(&mut recycled);
                self.run.action_deck = recycled;
            }
            let card = self.run.action_deck.remove(0);
            self.run.action_hand.push(card);
        }
    }
}
