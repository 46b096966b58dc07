use crate::{
    bet_amount, metrics_of, target_reached, transition, weighted_score, AutoAction,
    AutoplayConfig, AutoplayError, AutoplayResult, FinalMetrics, ObjectiveWeights, RunStatus,
    Simulator, StepRecord, SummaryStats, TargetConfig,
};
use hackjack_core::{
    cards_value, is_soft, ActionCardId, Card, GameEvent, GameStateMachine, Hand,
    PendingInteraction, Phase, Rank, RngState, ShoeHackId, ShopItem, BLACKJACK,
};
use std::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct AutoplayRequest {
    pub config: AutoplayConfig,
    pub targets: TargetConfig,
    pub weights: ObjectiveWeights,
}

pub fn run_autoplay(
    initial: &GameStateMachine,
    request: &AutoplayRequest,
) -> Result<AutoplayResult, AutoplayError> {
    let started_at = Instant::now();
    let cfg = &request.config;
    let mut sim = Simulator::new(initial.clone());
    let mut rng = RngState::from_seed(cfg.seed);
    let mut records: Vec<StepRecord> = Vec::new();
    let mut summary = SummaryStats::default();
    let mut status = None;

    for step in 0..cfg.max_steps {
        match sim.state.phase {
            Phase::Victory => {
                status = Some(RunStatus::Victory);
                break;
            }
            Phase::GameOver => {
                status = Some(RunStatus::GameOver);
                break;
            }
            _ => {}
        }
        if target_reached(sim.metrics(), request.targets) {
            status = Some(RunStatus::TargetReached);
            break;
        }
        let legal = sim.legal_actions(cfg);
        if legal.is_empty() {
            status = Some(RunStatus::NoLegalAction);
            break;
        }

        let (action, rollouts) = if sim.state.phase == Phase::Shop && cfg.rollouts > 0 {
            select_shop_action(&sim.state, &legal, request, &mut rng)
        } else {
            (heuristic_action(&sim.state, &legal, cfg), 0)
        };
        summary.rollouts += u64::from(rollouts);

        let before = sim.metrics();
        let phase_before = sim.phase_name();
        let action_detail = sim.describe_action(&action);
        let events = sim.apply_action(&action)?;
        for event in &events {
            if let GameEvent::HandResolved { results, .. } = event {
                summary.hands_played += results.len() as u32;
                let won = results.iter().filter(|result| result.is_win()).count();
                summary.hands_won += won as u32;
            }
        }
        let after = sim.metrics();
        records.push(StepRecord {
            step,
            phase_before,
            wave_before: before.wave,
            chips_before: before.chips,
            lives_before: before.lives,
            action,
            action_detail,
            phase_after: sim.phase_name(),
            wave_after: after.wave,
            chips_after: after.chips,
            lives_after: after.lives,
            score_after: after.score,
            events,
        });
    }

    let status = status.unwrap_or(match sim.state.phase {
        Phase::Victory => RunStatus::Victory,
        Phase::GameOver => RunStatus::GameOver,
        _ => RunStatus::MaxSteps,
    });
    let metrics = sim.metrics();
    summary.steps = records.len() as u32;
    summary.wall_time_ms = started_at.elapsed().as_millis() as u64;
    Ok(AutoplayResult {
        status,
        seed: sim.state.run.seed,
        mode: sim.state.run.mode(),
        final_metrics: FinalMetrics {
            phase: sim.phase_name(),
            wave: metrics.wave,
            chips: metrics.chips,
            lives: metrics.lives,
            score: metrics.score,
            dealer: sim.dealer_name(),
        },
        steps: records,
        summary,
    })
}

/// Picks the policy's preferred action, falling back to the first legal one.
pub fn heuristic_action(
    state: &GameStateMachine,
    legal: &[AutoAction],
    cfg: &AutoplayConfig,
) -> AutoAction {
    preferred_action(state, cfg)
        .filter(|action| legal.contains(action))
        .or_else(|| legal.first().copied())
        .unwrap_or(AutoAction::NextWave)
}

fn preferred_action(state: &GameStateMachine, cfg: &AutoplayConfig) -> Option<AutoAction> {
    match state.phase {
        Phase::Menu | Phase::GameOver | Phase::Victory => None,
        Phase::WaveIntro => Some(AutoAction::ProceedToBetting),
        Phase::EmergencyChips if state.run.lives > 0 => Some(AutoAction::AcceptEmergencyChips),
        Phase::EmergencyChips => Some(AutoAction::DeclineEmergencyChips),
        Phase::Betting => Some(AutoAction::PlaceBet {
            amount: bet_amount(state, cfg),
        }),
        Phase::Hand if !state.is_dealt() => Some(AutoAction::Deal),
        Phase::Hand => Some(hand_action(state, cfg)),
        Phase::HandResolution => Some(AutoAction::ResolveResults),
        Phase::Shop => Some(shop_action(state, cfg)),
    }
}

/// Total and softness as the player can see them. Hidden totals are recounted from the
/// visible cards; hidden cards leave the shown total with unknown softness.
pub fn perceived_total(state: &GameStateMachine, hand: usize) -> (u32, bool) {
    let shown: Vec<Card> = state
        .visible_player_cards(hand)
        .into_iter()
        .flatten()
        .collect();
    let cards_visible = state
        .player_hands
        .get(hand)
        .is_some_and(|held| held.cards.len() == shown.len());
    let soft = cards_visible && is_soft(&Hand::new(shown.clone()));
    let total = state
        .visible_player_total(hand)
        .unwrap_or_else(|| cards_value(&shown));
    (total, soft)
}

/// Upcard value with aces and glitches as 11; a hidden upcard is assumed to be a ten.
pub fn dealer_upcard_value(state: &GameStateMachine) -> u32 {
    match state.visible_dealer_cards().first().copied().flatten() {
        Some(card) if card.is_glitch || card.is_ace() => 11,
        Some(card) => card.rank.low_value(),
        None => 10,
    }
}

/// Simplified basic strategy.
pub fn basic_strategy_hits(total: u32, soft: bool, upcard: u32) -> bool {
    if total <= 11 {
        return true;
    }
    if soft {
        return total <= 17 || (total == 18 && upcard >= 9);
    }
    match total {
        12 => upcard <= 3 || upcard >= 7,
        13..=16 => upcard >= 7,
        _ => false,
    }
}

fn hand_action(state: &GameStateMachine, cfg: &AutoplayConfig) -> AutoAction {
    let hand = state.active_hand;
    match state.pending {
        Some(PendingInteraction::GlitchHitChoice { options }) => {
            return AutoAction::ChooseGlitchCard {
                choice: best_glitch_choice(state, options),
            };
        }
        Some(PendingInteraction::Swap {
            selected_card: Some(_),
        }) => return AutoAction::ExecuteSwap,
        Some(PendingInteraction::Swap {
            selected_card: None,
        }) => {
            return match best_swap_index(state) {
                Some(index) => AutoAction::SelectSwapCard { index },
                None => AutoAction::CancelSwap,
            };
        }
        _ => {}
    }

    let (total, soft) = perceived_total(state, hand);
    let upcard = dealer_upcard_value(state);
    let wants_hit = basic_strategy_hits(total, soft, upcard) || !state.can_stand(hand);

    if cfg.use_action_cards {
        if let Some(card) = action_card_to_play(state, total, upcard, wants_hit) {
            return AutoAction::UseActionCard { card, hand };
        }
    }
    if wants_split(state, hand) {
        return AutoAction::Split { hand };
    }
    if wants_hit && state.can_hit(hand) {
        AutoAction::Hit { hand }
    } else {
        AutoAction::Stand { hand }
    }
}

fn holds(state: &GameStateMachine, card: ActionCardId) -> bool {
    state.run.action_hand.contains(&card)
}

fn action_card_to_play(
    state: &GameStateMachine,
    total: u32,
    upcard: u32,
    wants_hit: bool,
) -> Option<ActionCardId> {
    if state.action_cards_remaining() == 0 {
        return None;
    }
    let effects = &state.effects;
    let idle = state.pending.is_none();
    let patchable = state
        .dealer
        .as_ref()
        .is_some_and(|dealer| dealer.abilities.iter().any(|ability| ability.is_patchable()));

    if holds(state, ActionCardId::Patch) && patchable && effects.patched.is_none() {
        return Some(ActionCardId::Patch);
    }
    if holds(state, ActionCardId::PeekHoleCard)
        && !effects.hole_card_peeked
        && !state.dealer_hole_card_revealed
    {
        return Some(ActionCardId::PeekHoleCard);
    }
    if holds(state, ActionCardId::Insurance) && !effects.insurance && upcard >= 10 {
        return Some(ActionCardId::Insurance);
    }
    if idle && holds(state, ActionCardId::SwapWithDealer) && best_swap_index(state).is_some() {
        return Some(ActionCardId::SwapWithDealer);
    }
    if !wants_hit {
        return None;
    }
    if (13..=16).contains(&total) && state.hit_count == 0 && holds(state, ActionCardId::RedealHand)
    {
        return Some(ActionCardId::RedealHand);
    }
    if !state.can_hit(state.active_hand) {
        return [ActionCardId::Overclock, ActionCardId::FreeHit]
            .into_iter()
            .find(|card| holds(state, *card));
    }
    if total >= 12 && !effects.firewall && holds(state, ActionCardId::Firewall) {
        return Some(ActionCardId::Firewall);
    }
    if idle {
        return [ActionCardId::GlitchHit, ActionCardId::DoubleVision]
            .into_iter()
            .find(|card| holds(state, *card));
    }
    None
}

fn wants_split(state: &GameStateMachine, hand: usize) -> bool {
    if !state.can_split_hand(hand) {
        return false;
    }
    let shown: Vec<Card> = state
        .visible_player_cards(hand)
        .into_iter()
        .flatten()
        .collect();
    match shown.as_slice() {
        [first, second] => {
            first.rank == second.rank && (first.is_ace() || first.rank == Rank::Eight)
        }
        _ => false,
    }
}

fn best_glitch_choice(state: &GameStateMachine, options: [Card; 2]) -> usize {
    let Some(hand) = state.active_player_hand() else {
        return 0;
    };
    let value_with = |card: Card| {
        let mut cards = hand.cards.clone();
        cards.push(card);
        cards_value(&cards)
    };
    let (first, second) = (value_with(options[0]), value_with(options[1]));
    let better_second = match (first <= BLACKJACK, second <= BLACKJACK) {
        (true, true) => second > first,
        (false, true) => true,
        (true, false) => false,
        (false, false) => second < first,
    };
    usize::from(better_second)
}

/// Player card whose exchange with the visible upcard most improves the active total.
fn best_swap_index(state: &GameStateMachine) -> Option<usize> {
    let upcard = state.visible_dealer_cards().first().copied().flatten()?;
    let hand = state.active_player_hand()?;
    if state.rules.hide_player_cards {
        return None;
    }
    let current = cards_value(&hand.cards);
    let current = if current > BLACKJACK { 0 } else { current };
    let mut best: Option<(usize, u32)> = None;
    for index in 0..hand.cards.len() {
        let mut cards = hand.cards.clone();
        cards[index] = upcard;
        let value = cards_value(&cards);
        if value > BLACKJACK || value <= current {
            continue;
        }
        if best.map_or(true, |(_, top)| value > top) {
            best = Some((index, value));
        }
    }
    best.map(|(index, _)| index)
}

/// Preference for a shop offer; zero means never worth buying.
pub fn offer_preference(item: &ShopItem) -> u32 {
    match item {
        ShopItem::ShoeHack { id, .. } => match id {
            ShoeHackId::Add2Aces => 5,
            ShoeHackId::BiasTensUp | ShoeHackId::Remove4Low => 4,
            ShoeHackId::AddGlitchCard => 3,
            ShoeHackId::Remove4Tens => 0,
        },
        ShopItem::ActionCard { id, .. } => match id {
            ActionCardId::Firewall => 4,
            ActionCardId::Insurance
            | ActionCardId::GlitchHit
            | ActionCardId::DoubleVision
            | ActionCardId::Patch => 3,
            ActionCardId::Overclock | ActionCardId::FreeHit | ActionCardId::SwapWithDealer => 2,
            ActionCardId::PeekHoleCard | ActionCardId::RedealHand => 1,
            ActionCardId::Scramble => 0,
        },
        ShopItem::RerollShop { .. } | ShopItem::RemoveActionCard { .. } => 0,
    }
}

fn affordable_with_reserve(
    state: &GameStateMachine,
    item: &ShopItem,
    cfg: &AutoplayConfig,
) -> bool {
    let reserve = state.min_bet * cfg.shop_reserve_bets;
    state.run.chips >= item.cost() + reserve
}

fn shop_action(state: &GameStateMachine, cfg: &AutoplayConfig) -> AutoAction {
    state
        .run
        .shop
        .iter()
        .enumerate()
        .filter(|(_, item)| offer_preference(item) > 0 && affordable_with_reserve(state, item, cfg))
        .max_by_key(|(index, item)| (offer_preference(item), std::cmp::Reverse(*index)))
        .map(|(index, _)| AutoAction::Buy { index })
        .unwrap_or(AutoAction::NextWave)
}

/// Scores each worthwhile purchase and leaving the shop by heuristic playouts on
/// reseeded copies of the snapshot. Returns the pick and the number of playouts run.
pub fn select_shop_action(
    state: &GameStateMachine,
    legal: &[AutoAction],
    request: &AutoplayRequest,
    rng: &mut RngState,
) -> (AutoAction, u32) {
    let cfg = &request.config;
    let candidates: Vec<AutoAction> = legal
        .iter()
        .copied()
        .filter(|action| match action {
            AutoAction::Buy { index } => state.run.shop.get(*index).is_some_and(|item| {
                offer_preference(item) > 0 && affordable_with_reserve(state, item, cfg)
            }),
            AutoAction::NextWave => true,
            _ => false,
        })
        .collect();
    if candidates.len() <= 1 {
        return (heuristic_action(state, legal, cfg), 0);
    }

    let mut playouts = 0;
    let mut best: Option<(AutoAction, f64)> = None;
    for candidate in candidates {
        let Ok(next) = transition(state, &candidate) else {
            continue;
        };
        let mut total = 0.0;
        for _ in 0..cfg.rollouts {
            let mut branch = next.clone();
            branch.rng = RngState::from_seed(rng.next_u64());
            let (end, steps) = playout(branch, cfg);
            total += weighted_score(metrics_of(&end), request.weights, steps);
            playouts += 1;
        }
        let mean = total / f64::from(cfg.rollouts);
        if best.map_or(true, |(_, top)| mean > top) {
            best = Some((candidate, mean));
        }
    }
    let action = best
        .map(|(action, _)| action)
        .unwrap_or_else(|| heuristic_action(state, legal, cfg));
    (action, playouts)
}

fn playout(mut state: GameStateMachine, cfg: &AutoplayConfig) -> (GameStateMachine, u32) {
    let mut steps = 0;
    while steps < cfg.rollout_depth && !state.phase.is_terminal() {
        let Some(action) = preferred_action(&state, cfg) else {
            break;
        };
        match transition(&state, &action) {
            Ok(next) => state = next,
            Err(_) => break,
        }
        steps += 1;
    }
    (state, steps)
}
