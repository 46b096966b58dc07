use super::*;
use crate::{
    calculate_payout, generate_shop_items, is_blackjack, is_bust, resolve_totals, HandTotal,
    RunMode, BLACKJACK,
};
use tracing::info;

impl GameStateMachine {
    pub fn resolve_hand_results(&self) -> Self {
        self.settle("resolve_hand_results", self.try_resolve_hand_results())
    }

    /// Pays out every hand, returns the cards to the shoe and routes to the next phase.
    pub fn try_resolve_hand_results(&self) -> Result<Self, TransitionError> {
        self.expect_phase(Phase::HandResolution)?;
        let mut next = self.clone();
        let dealer_total = HandTotal::of(&next.dealer_hand);
        let bet = next.run.current_bet;
        let rules = next.rules;
        let dealer_natural = is_blackjack(&next.dealer_hand);

        let mut outcomes = Vec::with_capacity(next.player_hands.len());
        let mut firewall = next.effects.firewall;
        let mut insurance = next.effects.insurance;
        for (hand_index, hand) in next.player_hands.iter().enumerate() {
            let mut firewall_used = false;
            let player_total = if firewall && is_bust(hand) {
                firewall = false;
                firewall_used = true;
                HandTotal {
                    value: BLACKJACK,
                    natural: false,
                }
            } else {
                HandTotal::of(hand)
            };
            let result = resolve_totals(player_total, dealer_total, rules.dealer_wins_on_22);
            let mut insurance_used = false;
            let payout = if insurance && result == HandResult::Loss && dealer_natural {
                insurance = false;
                insurance_used = true;
                bet
            } else {
                calculate_payout(result, bet, rules.blackjack_pays_1_to_1)
            };
            outcomes.push(HandOutcome {
                hand_index,
                result,
                bet,
                payout,
                firewall_used,
                insurance_used,
            });
        }
        next.effects.firewall = firewall;
        next.effects.insurance = insurance;

        let total_payout: u32 = outcomes.iter().map(|outcome| outcome.payout).sum();
        next.run.chips += total_payout;
        let won = outcomes.iter().any(|outcome| outcome.result.is_win());

        if let Some(PendingInteraction::DoubleVision { card }) = next.pending.take() {
            next.run.burned_cards.push(card);
        }
        next.return_cards_to_shoe();
        next.run.score = next.run.compute_score();
        info!(
            wave = next.run.wave,
            hands = outcomes.len(),
            payout = total_payout,
            chips = next.run.chips,
            won,
            "hand resolved"
        );
        next.last_outcomes = outcomes;

        let final_wave = next.run.mode() == RunMode::Stage
            && next.run.wave >= next.balance.stage_final_wave;
        if final_wave && won {
            next.finish_run(Phase::Victory);
        } else if next.run.lives == 0 && next.run.chips < next.min_bet {
            next.finish_run(Phase::GameOver);
        } else if !won {
            next.reset_hand_state();
            next.route_to_betting();
        } else {
            next.reset_hand_state();
            next.run.shop = generate_shop_items(&next.run, &next.balance);
            next.run.shop_index += 1;
            next.phase = Phase::Shop;
        }
        Ok(next)
    }

    /// Hands and dealer cards go back into the shoe, which is reshuffled in place.
    fn return_cards_to_shoe(&mut self) {
        let hands = std::mem::take(&mut self.player_hands);
        for hand in hands {
            self.run.shoe.return_cards(hand.cards);
        }
        let dealer = std::mem::take(&mut self.dealer_hand);
        self.run.shoe.return_cards(dealer.cards);
        self.run.shoe.shuffle(&mut self.rng);
    }
}
