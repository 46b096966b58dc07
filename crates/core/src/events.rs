use crate::{GameStateMachine, HandResult, Phase, ShopItemKind};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum GameEvent {
    PhaseChanged {
        from: Phase,
        to: Phase,
    },
    RunStarted {
        seed: u64,
        chips: u32,
        lives: u32,
    },
    WaveStarted {
        wave: u32,
        dealer: String,
        is_boss: bool,
        min_bet: u32,
    },
    BetPlaced {
        amount: u32,
        chips: u32,
    },
    CardsDealt {
        player: usize,
        dealer: usize,
    },
    CardBurned {
        card: String,
    },
    HandSplit {
        hands: usize,
    },
    ActionCardPlayed {
        card: String,
    },
    HandResolved {
        results: Vec<HandResult>,
        chip_delta: i64,
        chips: u32,
    },
    ShopGenerated {
        shop_index: u32,
        offers: Vec<ShopItemKind>,
    },
    ShopPurchased {
        offers_left: usize,
        cost: u32,
        chips: u32,
    },
    LifeSold {
        lives: u32,
        chips: u32,
    },
    RunEnded {
        phase: Phase,
        wave: u32,
        score: u32,
    },
}

#[derive(Debug, Default)]
pub struct EventBus {
    queue: Vec<GameEvent>,
}

impl EventBus {
    pub fn push(&mut self, event: GameEvent) {
        self.queue.push(event);
    }

    pub fn extend(&mut self, events: impl IntoIterator<Item = GameEvent>) {
        self.queue.extend(events);
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn drain(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.queue.drain(..)
    }
}

/// Events explaining how `next` differs from `prev`. The core never emits events itself;
/// callers diff the snapshots they hold.
pub fn diff_snapshots(prev: &GameStateMachine, next: &GameStateMachine) -> Vec<GameEvent> {
    let mut events = Vec::new();
    let (before, after) = (&prev.run, &next.run);

    if prev.phase != next.phase {
        events.push(GameEvent::PhaseChanged {
            from: prev.phase,
            to: next.phase,
        });
    }
    let restarted = next.phase == Phase::WaveIntro
        && (prev.phase == Phase::Menu || prev.phase.is_terminal() || after.seed != before.seed);
    if restarted {
        events.push(GameEvent::RunStarted {
            seed: after.seed,
            chips: after.chips,
            lives: after.lives,
        });
    }
    if next.phase == Phase::WaveIntro && (restarted || after.wave != before.wave) {
        if let Some(dealer) = &next.dealer {
            events.push(GameEvent::WaveStarted {
                wave: after.wave,
                dealer: dealer.name.clone(),
                is_boss: dealer.is_boss,
                min_bet: next.min_bet,
            });
        }
    }
    if prev.phase == Phase::Betting && next.phase == Phase::Hand {
        events.push(GameEvent::BetPlaced {
            amount: after.current_bet,
            chips: after.chips,
        });
    }
    if !prev.is_dealt() && next.is_dealt() {
        events.push(GameEvent::CardsDealt {
            player: next.player_hands.iter().map(|hand| hand.cards.len()).sum(),
            dealer: next.dealer_hand.cards.len(),
        });
    }
    if after.burned_cards.len() > before.burned_cards.len() && next.phase == Phase::Hand {
        if let Some(card) = after.last_burned_card {
            events.push(GameEvent::CardBurned {
                card: card.to_string(),
            });
        }
    }
    if next.is_dealt() && next.player_hands.len() > prev.player_hands.len() && prev.is_dealt() {
        events.push(GameEvent::HandSplit {
            hands: next.player_hands.len(),
        });
    }
    if after.action_discard.len() > before.action_discard.len() && next.phase == Phase::Hand {
        if let Some(card) = after.action_discard.last() {
            events.push(GameEvent::ActionCardPlayed {
                card: format!("{card:?}"),
            });
        }
    }
    if prev.phase == Phase::HandResolution && next.phase != Phase::HandResolution {
        let paid: u32 = next.last_outcomes.iter().map(|outcome| outcome.payout).sum();
        let staked: u32 = next.last_outcomes.iter().map(|outcome| outcome.bet).sum();
        events.push(GameEvent::HandResolved {
            results: next.last_outcomes.iter().map(|outcome| outcome.result).collect(),
            chip_delta: i64::from(paid) - i64::from(staked),
            chips: after.chips,
        });
    }
    if next.phase == Phase::Shop && after.shop_index != before.shop_index {
        events.push(GameEvent::ShopGenerated {
            shop_index: after.shop_index,
            offers: after.shop.iter().map(|item| item.kind()).collect(),
        });
    }
    if prev.phase == Phase::Shop && next.phase == Phase::Shop && after.chips < before.chips {
        events.push(GameEvent::ShopPurchased {
            offers_left: after.shop.len(),
            cost: before.chips - after.chips,
            chips: after.chips,
        });
    }
    if after.lives < before.lives && !restarted {
        events.push(GameEvent::LifeSold {
            lives: after.lives,
            chips: after.chips,
        });
    }
    if next.phase.is_terminal() && !prev.phase.is_terminal() {
        events.push(GameEvent::RunEnded {
            phase: next.phase,
            wave: after.wave,
            score: after.score,
        });
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RunConfig;

    #[test]
    fn start_and_bet_are_reported() {
        let menu = GameStateMachine::new();
        let intro = menu.start_new_run_seeded(RunConfig::stage(0), 42);
        let events = diff_snapshots(&menu, &intro);
        assert!(events.contains(&GameEvent::PhaseChanged {
            from: Phase::Menu,
            to: Phase::WaveIntro
        }));
        assert!(events
            .iter()
            .any(|event| matches!(event, GameEvent::RunStarted { seed: 42, .. })));
        assert!(events
            .iter()
            .any(|event| matches!(event, GameEvent::WaveStarted { wave: 1, .. })));

        let betting = intro.proceed_to_betting();
        let hand = betting.place_bet(10);
        let events = diff_snapshots(&betting, &hand);
        assert!(events.contains(&GameEvent::BetPlaced {
            amount: 10,
            chips: 90
        }));
    }

    #[test]
    fn rejected_transition_has_no_events() {
        let intro = GameStateMachine::new().start_new_run_seeded(RunConfig::stage(0), 1);
        let same = intro.place_bet(10);
        assert!(diff_snapshots(&intro, &same).is_empty());
    }

    #[test]
    fn bus_drains_in_order() {
        let mut bus = EventBus::default();
        bus.push(GameEvent::CardsDealt {
            player: 2,
            dealer: 2,
        });
        bus.extend([GameEvent::HandSplit { hands: 2 }]);
        assert_eq!(bus.len(), 2);
        let drained: Vec<GameEvent> = bus.drain().collect();
        assert_eq!(drained.len(), 2);
        assert!(bus.is_empty());
    }
}
