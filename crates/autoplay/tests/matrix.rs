use hackjack_autoplay::{
    basic_strategy_hits, offer_preference, run_autoplay, target_reached, weighted_score,
    write_json, AutoAction, AutoplayConfig, AutoplayRequest, AutoplayResult, EvalMetrics,
    ObjectiveWeights, RunStatus, Simulator, TargetConfig,
};
use hackjack_core::{
    ActionCardId, BalanceConfig, GameEvent, GameStateMachine, Phase, Rarity, RunConfig,
    ShoeHackId, ShopItem,
};

fn metrics(wave: u32, chips: u32, score: u32) -> EvalMetrics {
    EvalMetrics {
        wave,
        chips,
        lives: 3,
        score,
        victory: false,
        game_over: false,
    }
}

macro_rules! target_case {
    (
        $name:ident,
        $wave:expr,
        $chips:expr,
        $score:expr,
        $t_wave:expr,
        $t_chips:expr,
        $t_score:expr,
        $expected:expr
    ) => {
        #[test]
        fn $name() {
            let target = TargetConfig {
                target_wave: $t_wave,
                target_chips: $t_chips,
                target_score: $t_score,
            };
            assert_eq!(target_reached(metrics($wave, $chips, $score), target), $expected);
        }
    };
}

target_case!(target_none_configured, 10, 500, 100, None, None, None, false);
target_case!(target_wave_met, 5, 0, 0, Some(5), None, None, true);
target_case!(target_wave_short, 4, 0, 0, Some(5), None, None, false);
target_case!(target_chips_met, 1, 200, 0, None, Some(200), None, true);
target_case!(target_chips_short, 1, 199, 0, None, Some(200), None, false);
target_case!(target_score_met, 1, 0, 60, None, None, Some(60), true);
target_case!(
    target_all_met,
    6,
    300,
    90,
    Some(6),
    Some(300),
    Some(90),
    true
);
target_case!(
    target_one_of_three_short,
    6,
    299,
    90,
    Some(6),
    Some(300),
    Some(90),
    false
);

#[test]
fn weighted_score_prefers_progress_and_victory() {
    let weights = ObjectiveWeights::default();
    let early = weighted_score(metrics(2, 100, 0), weights, 10);
    let later = weighted_score(metrics(5, 100, 0), weights, 10);
    assert!(later > early);

    let mut won = metrics(5, 100, 0);
    won.victory = true;
    let mut lost = metrics(5, 100, 0);
    lost.game_over = true;
    assert!(weighted_score(won, weights, 10) > later);
    assert!(weighted_score(lost, weights, 10) < later);
    assert!(weighted_score(metrics(5, 100, 0), weights, 500) < later);
}

macro_rules! key_case {
    ($name:ident, $action:expr, $key:expr) => {
        #[test]
        fn $name() {
            assert_eq!($action.stable_key(), $key);
        }
    };
}

key_case!(key_deal, AutoAction::Deal, "deal");
key_case!(key_bet_sorts_numerically, AutoAction::PlaceBet { amount: 15 }, "place_bet:000015");
key_case!(key_hit, AutoAction::Hit { hand: 1 }, "hit:1");
key_case!(
    key_card,
    AutoAction::UseActionCard {
        card: ActionCardId::Firewall,
        hand: 0
    },
    "use_card:Firewall:0"
);
key_case!(key_glitch, AutoAction::ChooseGlitchCard { choice: 1 }, "choose_glitch:1");
key_case!(key_buy, AutoAction::Buy { index: 3 }, "buy:3");
key_case!(key_next_wave, AutoAction::NextWave, "next_wave");

macro_rules! strategy_case {
    ($name:ident, $total:expr, $soft:expr, $upcard:expr, $hits:expr) => {
        #[test]
        fn $name() {
            assert_eq!(basic_strategy_hits($total, $soft, $upcard), $hits);
        }
    };
}

strategy_case!(strategy_always_hit_eleven, 11, false, 10, true);
strategy_case!(strategy_twelve_vs_two, 12, false, 2, true);
strategy_case!(strategy_twelve_vs_five, 12, false, 5, false);
strategy_case!(strategy_sixteen_vs_ten, 16, false, 10, true);
strategy_case!(strategy_sixteen_vs_six, 16, false, 6, false);
strategy_case!(strategy_hard_seventeen, 17, false, 11, false);
strategy_case!(strategy_soft_seventeen, 17, true, 2, true);
strategy_case!(strategy_soft_eighteen_vs_ace, 18, true, 11, true);
strategy_case!(strategy_soft_eighteen_vs_eight, 18, true, 8, false);
strategy_case!(strategy_soft_nineteen, 19, true, 10, false);

#[test]
fn offer_preferences() {
    let aces = ShopItem::ShoeHack {
        id: ShoeHackId::Add2Aces,
        cost: 50,
        rarity: Rarity::Uncommon,
    };
    let scramble = ShopItem::ActionCard {
        id: ActionCardId::Scramble,
        cost: 20,
        rarity: Rarity::Common,
    };
    assert!(offer_preference(&aces) > offer_preference(&scramble));
    assert_eq!(offer_preference(&ShopItem::RerollShop { cost: 50 }), 0);
}

#[test]
fn legal_actions_follow_the_phase() {
    let cfg = AutoplayConfig::default();
    let sim = Simulator::start(RunConfig::stage(0), BalanceConfig::default(), 3);
    assert_eq!(
        sim.legal_actions(&cfg),
        vec![AutoAction::ProceedToBetting, AutoAction::SellLife]
    );

    let mut sim = sim;
    sim.apply_action(&AutoAction::ProceedToBetting)
        .expect("proceed");
    let betting = sim.legal_actions(&cfg);
    assert!(betting.contains(&AutoAction::PlaceBet { amount: 10 }));
    assert!(betting.contains(&AutoAction::SellLife));

    let events = sim
        .apply_action(&AutoAction::PlaceBet { amount: 10 })
        .expect("bet");
    assert!(events.contains(&GameEvent::BetPlaced {
        amount: 10,
        chips: 90
    }));
    assert_eq!(sim.legal_actions(&cfg), vec![AutoAction::Deal]);

    sim.apply_action(&AutoAction::Deal).expect("deal");
    let hand = sim.legal_actions(&cfg);
    assert!(hand.contains(&AutoAction::Stand { hand: 0 }));
    assert!(hand.iter().all(|action| !matches!(action, AutoAction::Buy { .. })));
}

#[test]
fn rejected_action_reports_the_transition_error() {
    let mut sim = Simulator::start(RunConfig::stage(0), BalanceConfig::default(), 3);
    let err = sim
        .apply_action(&AutoAction::Deal)
        .expect_err("deal before betting");
    assert!(err.to_string().contains("invalid phase"));
    assert_eq!(sim.state.phase, Phase::WaveIntro);
}

fn quick_request(seed: u64) -> AutoplayRequest {
    AutoplayRequest {
        config: AutoplayConfig {
            seed,
            max_steps: 400,
            rollouts: 1,
            rollout_depth: 20,
            ..AutoplayConfig::default()
        },
        ..AutoplayRequest::default()
    }
}

fn quick_run(seed: u64) -> AutoplayResult {
    let initial = GameStateMachine::new().start_new_run_seeded(RunConfig::stage(0), seed);
    run_autoplay(&initial, &quick_request(seed)).expect("autoplay")
}

#[test]
fn autoplay_is_deterministic_per_seed() {
    let first = quick_run(11);
    let second = quick_run(11);
    assert_eq!(first.status, second.status);
    assert_eq!(first.steps.len(), second.steps.len());
    let actions = |result: &AutoplayResult| {
        result
            .steps
            .iter()
            .map(|step| step.action)
            .collect::<Vec<_>>()
    };
    assert_eq!(actions(&first), actions(&second));
    assert_eq!(first.final_metrics.chips, second.final_metrics.chips);
}

#[test]
fn autoplay_plays_hands_and_keeps_records_consistent() {
    let result = quick_run(5);
    assert!(result.summary.hands_played > 0);
    assert!(result.summary.hands_won <= result.summary.hands_played);
    assert_eq!(result.summary.steps as usize, result.steps.len());
    for pair in result.steps.windows(2) {
        assert_eq!(pair[0].phase_after, pair[1].phase_before);
        assert_eq!(pair[0].chips_after, pair[1].chips_before);
    }
    if result.status == RunStatus::MaxSteps {
        assert_eq!(result.steps.len(), 400);
    }
}

#[test]
fn target_stops_the_run_early() {
    let initial = GameStateMachine::new().start_new_run_seeded(RunConfig::stage(0), 8);
    let mut request = quick_request(8);
    request.targets.target_wave = Some(1);
    let result = run_autoplay(&initial, &request).expect("autoplay");
    assert_eq!(result.status, RunStatus::TargetReached);
    assert!(result.steps.is_empty());
}

#[test]
fn finished_run_has_no_legal_actions() {
    let initial = GameStateMachine::new()
        .start_new_run_seeded(RunConfig::survival(0), 2)
        .proceed_to_betting();
    let mut over = initial.clone();
    over.phase = Phase::GameOver;
    let result = run_autoplay(&over, &quick_request(2)).expect("autoplay");
    assert_eq!(result.status, RunStatus::GameOver);
    let sim = Simulator::new(over);
    assert!(sim.legal_actions(&AutoplayConfig::default()).is_empty());
}

#[test]
fn trace_writes_json() {
    let result = quick_run(4);
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("nested").join("trace.json");
    write_json(&path, &result).expect("write trace");
    let raw = std::fs::read_to_string(&path).expect("read trace");
    let parsed: AutoplayResult = serde_json::from_str(&raw).expect("parse trace");
    assert_eq!(parsed.steps.len(), result.steps.len());
    assert_eq!(parsed.status, result.status);
    assert!(result.to_text_report().starts_with("status: "));
}
