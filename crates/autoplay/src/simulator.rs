use crate::{AutoAction, AutoplayConfig, AutoplayError, EvalMetrics};
use hackjack_core::{
    action_card, diff_snapshots, BalanceConfig, EventBus, GameEvent, GameStateMachine,
    PendingInteraction, Phase, RunConfig, TransitionError,
};

#[derive(Debug)]
pub struct Simulator {
    pub state: GameStateMachine,
    pub events: EventBus,
}

impl Simulator {
    pub fn new(state: GameStateMachine) -> Self {
        Self {
            state,
            events: EventBus::default(),
        }
    }

    /// Seeded run already sitting on its first wave intro.
    pub fn start(config: RunConfig, balance: BalanceConfig, seed: u64) -> Self {
        let state = GameStateMachine::with_balance(balance).start_new_run_seeded(config, seed);
        Self::new(state)
    }

    pub fn metrics(&self) -> EvalMetrics {
        metrics_of(&self.state)
    }

    pub fn phase_name(&self) -> String {
        phase_label(self.state.phase).to_string()
    }

    pub fn dealer_name(&self) -> Option<String> {
        self.state.dealer.as_ref().map(|dealer| dealer.name.clone())
    }

    pub fn describe_action(&self, action: &AutoAction) -> Option<String> {
        let state = &self.state;
        match action {
            AutoAction::PlaceBet { amount } => Some(format!(
                "bet {amount} of {} chips (min {})",
                state.run.chips, state.min_bet
            )),
            AutoAction::Hit { hand } | AutoAction::Stand { hand } | AutoAction::Split { hand } => {
                let total = state
                    .visible_player_total(*hand)
                    .map(|total| total.to_string())
                    .unwrap_or_else(|| "??".to_string());
                let upcard = state
                    .visible_dealer_cards()
                    .first()
                    .copied()
                    .flatten()
                    .map(|card| card.to_string())
                    .unwrap_or_else(|| "??".to_string());
                Some(format!("hand {hand} total {total} vs upcard {upcard}"))
            }
            AutoAction::UseActionCard { card, .. } => {
                let def = action_card(*card);
                Some(format!("{}: {}", def.name, def.description))
            }
            AutoAction::Buy { index } => {
                let item = state.run.shop.get(*index)?;
                Some(format!(
                    "{} for {} ({} chips)",
                    item.label(),
                    item.cost(),
                    state.run.chips
                ))
            }
            AutoAction::NextWave => Some(format!("leave shop for wave {}", state.run.wave + 1)),
            _ => None,
        }
    }

    /// Applies one action, returning the events derived from the snapshot change.
    pub fn apply_action(&mut self, action: &AutoAction) -> Result<Vec<GameEvent>, AutoplayError> {
        let next = transition(&self.state, action)?;
        self.events.extend(diff_snapshots(&self.state, &next));
        self.state = next;
        Ok(self.events.drain().collect())
    }

    /// Actions the state machine accepts right now, in stable key order.
    pub fn legal_actions(&self, cfg: &AutoplayConfig) -> Vec<AutoAction> {
        let mut actions: Vec<AutoAction> = candidate_actions(&self.state, cfg)
            .into_iter()
            .filter(|action| transition(&self.state, action).is_ok())
            .collect();
        actions.sort_by_key(|item| item.stable_key());
        actions.dedup_by_key(|item| item.stable_key());
        actions
    }
}

pub fn metrics_of(state: &GameStateMachine) -> EvalMetrics {
    EvalMetrics {
        wave: state.run.wave,
        chips: state.run.chips,
        lives: state.run.lives,
        score: state.run.score,
        victory: state.phase == Phase::Victory,
        game_over: state.phase == Phase::GameOver,
    }
}

/// Maps an action onto the matching `try_*` transition.
pub fn transition(
    state: &GameStateMachine,
    action: &AutoAction,
) -> Result<GameStateMachine, TransitionError> {
    match *action {
        AutoAction::ProceedToBetting => state.try_proceed_to_betting(),
        AutoAction::PlaceBet { amount } => state.try_place_bet(amount),
        AutoAction::Deal => state.try_deal_initial_hands(),
        AutoAction::Hit { hand } => state.try_player_hit(hand),
        AutoAction::Stand { hand } => state.try_player_stand(hand),
        AutoAction::Split { hand } => state.try_player_split(hand),
        AutoAction::UseActionCard { card, hand } => state.try_use_action_card(card, hand),
        AutoAction::SelectSwapCard { index } => state.try_select_player_card_for_swap(index),
        AutoAction::ExecuteSwap => state.try_execute_swap(),
        AutoAction::CancelSwap => state.try_cancel_swap(),
        AutoAction::ChooseGlitchCard { choice } => state.try_choose_glitch_hit_card(choice),
        AutoAction::ResolveDealer => state.try_resolve_dealer_hand(),
        AutoAction::ResolveResults => state.try_resolve_hand_results(),
        AutoAction::AcceptEmergencyChips => state.try_accept_emergency_chips(),
        AutoAction::DeclineEmergencyChips => state.try_decline_emergency_chips(),
        AutoAction::SellLife => state.try_sell_life_for_chips(),
        AutoAction::Buy { index } => state.try_buy_shop_item(index),
        AutoAction::NextWave => state.try_proceed_to_next_wave(),
    }
}

pub fn bet_amount(state: &GameStateMachine, cfg: &AutoplayConfig) -> u32 {
    let sized = state.run.chips * cfg.bet_percent / 100;
    sized.max(state.min_bet).min(state.run.chips)
}

fn candidate_actions(state: &GameStateMachine, cfg: &AutoplayConfig) -> Vec<AutoAction> {
    let mut actions = Vec::new();
    match state.phase {
        Phase::Menu | Phase::GameOver | Phase::Victory => {}
        Phase::WaveIntro => {
            actions.push(AutoAction::ProceedToBetting);
            actions.push(AutoAction::SellLife);
        }
        Phase::EmergencyChips => {
            actions.push(AutoAction::AcceptEmergencyChips);
            actions.push(AutoAction::DeclineEmergencyChips);
            actions.push(AutoAction::SellLife);
        }
        Phase::Betting => {
            actions.push(AutoAction::PlaceBet {
                amount: state.min_bet,
            });
            actions.push(AutoAction::PlaceBet {
                amount: bet_amount(state, cfg),
            });
            actions.push(AutoAction::SellLife);
        }
        Phase::Hand if !state.is_dealt() => actions.push(AutoAction::Deal),
        Phase::Hand => actions.extend(hand_candidates(state)),
        Phase::HandResolution => actions.push(AutoAction::ResolveResults),
        Phase::Shop => {
            actions.extend((0..state.run.shop.len()).map(|index| AutoAction::Buy { index }));
            actions.push(AutoAction::NextWave);
            actions.push(AutoAction::SellLife);
        }
    }
    actions
}

fn hand_candidates(state: &GameStateMachine) -> Vec<AutoAction> {
    let hand = state.active_hand;
    match state.pending {
        Some(PendingInteraction::Swap {
            selected_card: None,
        }) => {
            let cards = state.player_hands.get(hand).map_or(0, |h| h.cards.len());
            let mut actions: Vec<AutoAction> = (0..cards)
                .map(|index| AutoAction::SelectSwapCard { index })
                .collect();
            actions.push(AutoAction::CancelSwap);
            return actions;
        }
        Some(PendingInteraction::Swap { .. }) => {
            return vec![AutoAction::ExecuteSwap, AutoAction::CancelSwap];
        }
        Some(PendingInteraction::GlitchHitChoice { .. }) => {
            return vec![
                AutoAction::ChooseGlitchCard { choice: 0 },
                AutoAction::ChooseGlitchCard { choice: 1 },
            ];
        }
        _ => {}
    }
    let mut actions = vec![
        AutoAction::Hit { hand },
        AutoAction::Stand { hand },
        AutoAction::Split { hand },
        AutoAction::ResolveDealer,
    ];
    actions.extend(
        state
            .run
            .action_hand
            .iter()
            .map(|card| AutoAction::UseActionCard { card: *card, hand }),
    );
    actions
}

pub fn phase_label(phase: Phase) -> &'static str {
    match phase {
        Phase::Menu => "Menu",
        Phase::WaveIntro => "WaveIntro",
        Phase::EmergencyChips => "EmergencyChips",
        Phase::Betting => "Betting",
        Phase::Hand => "Hand",
        Phase::HandResolution => "HandResolution",
        Phase::Shop => "Shop",
        Phase::GameOver => "GameOver",
        Phase::Victory => "Victory",
    }
}
