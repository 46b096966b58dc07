use super::*;
use crate::{action_card, ActionEffect, ActionTiming};

impl GameStateMachine {
    pub fn use_action_card(&self, card: ActionCardId, hand_index: usize) -> Self {
        self.settle("use_action_card", self.try_use_action_card(card, hand_index))
    }

    pub fn try_use_action_card(
        &self,
        card: ActionCardId,
        hand_index: usize,
    ) -> Result<Self, TransitionError> {
        self.expect_phase(Phase::Hand)?;
        let def = action_card(card);
        // Before-deal cards may be played from the held hand between the bet and the deal.
        let index = if !self.is_dealt() && def.timing == ActionTiming::BeforeDeal {
            hand_index
        } else {
            self.active_hand_index(hand_index)?
        };
        let slot = self
            .run
            .action_hand
            .iter()
            .position(|held| *held == card)
            .ok_or(TransitionError::CardNotInHand(card))?;
        let limit = self.balance.max_action_cards_per_hand;
        if self.effects.action_cards_used >= limit {
            return Err(TransitionError::ActionQuotaExhausted(limit));
        }
        let effect = def.effect;
        match self.pending {
            Some(pending) if pending.blocks_play() => {
                return Err(TransitionError::InteractionPending)
            }
            Some(_) if effect.stages_interaction() => {
                return Err(TransitionError::InteractionPending)
            }
            _ => {}
        }
        let patch_target = if effect == ActionEffect::SuppressDealerAbility {
            Some(self.patch_target()?)
        } else {
            None
        };

        let mut next = self.clone();
        next.run.action_hand.remove(slot);
        next.run.action_discard.push(card);
        next.effects.action_cards_used += 1;
        match effect {
            ActionEffect::RevealHoleCard => next.effects.hole_card_peeked = true,
            ActionEffect::RedealPlayerHand => next.redeal(index)?,
            ActionEffect::StageSwap => {
                next.pending = Some(PendingInteraction::Swap {
                    selected_card: None,
                })
            }
            ActionEffect::StageGlitchHit => {
                next.pending = Some(PendingInteraction::GlitchHitArmed)
            }
            ActionEffect::ArmFirewall => next.effects.firewall = true,
            ActionEffect::ArmInsurance => next.effects.insurance = true,
            ActionEffect::RaiseHitCap(amount) => next.effects.extra_hit_cap += amount,
            ActionEffect::GrantFreeHits(amount) => next.effects.free_hits += amount,
            ActionEffect::ShuffleShoe => next.run.shoe.shuffle(&mut next.rng),
            ActionEffect::PeekNextCard => {
                let card = next.run.shoe.draw_card()?;
                next.pending = Some(PendingInteraction::DoubleVision { card });
            }
            ActionEffect::SuppressDealerAbility => {
                next.effects.patched = patch_target;
                next.rules = next.compute_rules();
            }
        }
        Ok(next)
    }

    /// First dealer ability a patch can still switch off this hand.
    fn patch_target(&self) -> Result<DealerAbility, TransitionError> {
        if self.effects.patched.is_some() {
            return Err(TransitionError::NothingToPatch);
        }
        let dealt = self.is_dealt();
        self.dealer_abilities()
            .iter()
            .copied()
            .find(|ability| ability.is_patchable() && !(dealt && ability.applies_at_deal()))
            .ok_or(TransitionError::NothingToPatch)
    }

    /// The hand's cards go back into the shoe, the shoe is shuffled and two fresh cards
    /// are dealt in their place. Hits already taken still count against the cap.
    fn redeal(&mut self, index: usize) -> Result<(), TransitionError> {
        let old = std::mem::take(&mut self.player_hands[index].cards);
        self.run.shoe.return_cards(old);
        self.run.shoe.shuffle(&mut self.rng);
        let fresh = self.run.shoe.draw_cards(2)?;
        self.player_hands[index].cards = fresh;
        Ok(())
    }

    pub fn select_player_card_for_swap(&self, card_index: usize) -> Self {
        self.settle(
            "select_player_card_for_swap",
            self.try_select_player_card_for_swap(card_index),
        )
    }

    pub fn try_select_player_card_for_swap(
        &self,
        card_index: usize,
    ) -> Result<Self, TransitionError> {
        self.expect_phase(Phase::Hand)?;
        let Some(PendingInteraction::Swap { .. }) = self.pending else {
            return Err(TransitionError::NoSwapPending);
        };
        let hand = self
            .player_hands
            .get(self.active_hand)
            .ok_or(TransitionError::InvalidHandIndex(self.active_hand))?;
        if card_index >= hand.cards.len() {
            return Err(TransitionError::InvalidCardIndex(card_index));
        }
        let mut next = self.clone();
        next.pending = Some(PendingInteraction::Swap {
            selected_card: Some(card_index),
        });
        Ok(next)
    }

    pub fn execute_swap(&self) -> Self {
        self.settle("execute_swap", self.try_execute_swap())
    }

    /// Exchanges the pinned player card with the dealer's upcard.
    pub fn try_execute_swap(&self) -> Result<Self, TransitionError> {
        self.expect_phase(Phase::Hand)?;
        let card_index = match self.pending {
            Some(PendingInteraction::Swap {
                selected_card: Some(card_index),
            }) => card_index,
            Some(PendingInteraction::Swap {
                selected_card: None,
            }) => return Err(TransitionError::NoSwapSelection),
            _ => return Err(TransitionError::NoSwapPending),
        };
        if self.dealer_hand.cards.is_empty() {
            return Err(TransitionError::NotDealt);
        }
        let mut next = self.clone();
        let active = next.active_hand;
        std::mem::swap(
            &mut next.player_hands[active].cards[card_index],
            &mut next.dealer_hand.cards[0],
        );
        next.pending = None;
        Ok(next)
    }

    pub fn cancel_swap(&self) -> Self {
        self.settle("cancel_swap", self.try_cancel_swap())
    }

    /// Closes the swap without exchanging anything. The card stays spent.
    pub fn try_cancel_swap(&self) -> Result<Self, TransitionError> {
        self.expect_phase(Phase::Hand)?;
        let Some(PendingInteraction::Swap { .. }) = self.pending else {
            return Err(TransitionError::NoSwapPending);
        };
        let mut next = self.clone();
        next.pending = None;
        Ok(next)
    }
}
