use crate::{
    action_card, all_action_cards, all_shoe_hacks, hack_cost, hack_stacks, is_hack_maxed,
    shop_seed, ActionCardId, BalanceConfig, GameRun, Rarity, RarityWeights, RngState, RunMode,
    ShoeHackId,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShopItem {
    ShoeHack {
        id: ShoeHackId,
        cost: u32,
        rarity: Rarity,
    },
    ActionCard {
        id: ActionCardId,
        cost: u32,
        rarity: Rarity,
    },
    RerollShop {
        cost: u32,
    },
    RemoveActionCard {
        cost: u32,
    },
}

impl ShopItem {
    pub fn cost(&self) -> u32 {
        match self {
            ShopItem::ShoeHack { cost, .. }
            | ShopItem::ActionCard { cost, .. }
            | ShopItem::RerollShop { cost }
            | ShopItem::RemoveActionCard { cost } => *cost,
        }
    }

    pub fn kind(&self) -> ShopItemKind {
        match self {
            ShopItem::ShoeHack { .. } => ShopItemKind::ShoeHack,
            ShopItem::ActionCard { .. } => ShopItemKind::ActionCard,
            ShopItem::RerollShop { .. } => ShopItemKind::RerollShop,
            ShopItem::RemoveActionCard { .. } => ShopItemKind::RemoveActionCard,
        }
    }

    pub fn label(&self) -> String {
        match self {
            ShopItem::ShoeHack { id, .. } => crate::shoe_hack(*id).name.to_string(),
            ShopItem::ActionCard { id, .. } => action_card(*id).name.to_string(),
            ShopItem::RerollShop { .. } => "Reroll Shop".to_string(),
            ShopItem::RemoveActionCard { .. } => "Remove Action Card".to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShopItemKind {
    ShoeHack,
    ActionCard,
    RerollShop,
    RemoveActionCard,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SlotTarget {
    Hack,
    Action,
    Utility,
}

const SLOT_TARGETS: [SlotTarget; 5] = [
    SlotTarget::Hack,
    SlotTarget::Hack,
    SlotTarget::Action,
    SlotTarget::Action,
    SlotTarget::Utility,
];

fn slot_target(slot: usize) -> SlotTarget {
    match SLOT_TARGETS.get(slot) {
        Some(target) => *target,
        None if slot % 2 == 0 => SlotTarget::Hack,
        None => SlotTarget::Action,
    }
}

/// Stage uses the base weights; survival shifts toward rarer items until wave 10.
pub fn shop_weights(wave: u32, mode: RunMode, balance: &BalanceConfig) -> RarityWeights {
    let mut weights = match mode {
        RunMode::Stage => balance.rarity_weights,
        RunMode::Survival => {
            let progress = (f64::from(wave) / 10.0).min(1.0);
            balance.shifted_weights(progress)
        }
    };
    weights.boss = 0.0;
    weights
}

fn roll_rarity(rng: &mut RngState, weights: RarityWeights) -> Rarity {
    let table = [
        (Rarity::Common, weights.common),
        (Rarity::Uncommon, weights.uncommon),
        (Rarity::Rare, weights.rare),
        (Rarity::Boss, weights.boss),
    ];
    rng.weighted_choice(&table).unwrap_or(Rarity::Common)
}

/// Picks from the rolled rarity, or from everything on offer when that rarity is empty.
fn pick_by_rarity<T: Copy>(
    rng: &mut RngState,
    pool: &[(T, Rarity)],
    rarity: Rarity,
) -> Option<(T, Rarity)> {
    let matching: Vec<(T, Rarity)> = pool
        .iter()
        .copied()
        .filter(|(_, item_rarity)| *item_rarity == rarity)
        .collect();
    if matching.is_empty() {
        rng.choose(pool).copied()
    } else {
        rng.choose(&matching).copied()
    }
}

fn hack_offer(
    rng: &mut RngState,
    run: &GameRun,
    balance: &BalanceConfig,
    weights: RarityWeights,
) -> Option<ShopItem> {
    let available: Vec<(ShoeHackId, Rarity)> = all_shoe_hacks()
        .iter()
        .filter(|hack| !is_hack_maxed(&run.owned_hacks, hack.id))
        .map(|hack| (hack.id, hack.rarity))
        .collect();
    if available.is_empty() {
        return None;
    }
    let rarity = roll_rarity(rng, weights);
    let (id, rarity) = pick_by_rarity(rng, &available, rarity)?;
    let stacks = hack_stacks(&run.owned_hacks, id);
    Some(ShopItem::ShoeHack {
        id,
        cost: hack_cost(id, stacks, balance.hack_cost_growth_percent, &run.config),
        rarity,
    })
}

fn action_offer(rng: &mut RngState, run: &GameRun, weights: RarityWeights) -> Option<ShopItem> {
    let available: Vec<(ActionCardId, Rarity)> = all_action_cards()
        .iter()
        .map(|card| (card.id, card.rarity))
        .collect();
    let rarity = roll_rarity(rng, weights);
    let (id, rarity) = pick_by_rarity(rng, &available, rarity)?;
    Some(ShopItem::ActionCard {
        id,
        cost: action_card(id).cost(&run.config),
        rarity,
    })
}

fn utility_offer(rng: &mut RngState, run: &GameRun, balance: &BalanceConfig) -> ShopItem {
    if rng.next_float() < 0.5 && run.owned_action_card_count() > 0 {
        ShopItem::RemoveActionCard {
            cost: run.config.scale(balance.remove_card_cost),
        }
    } else {
        ShopItem::RerollShop {
            cost: run.config.scale(balance.reroll_cost),
        }
    }
}

/// Offer list for `run.shop_index`. Pure function of the run's seed, shop index, wave,
/// owned hacks and costs.
pub fn generate_shop_items(run: &GameRun, balance: &BalanceConfig) -> Vec<ShopItem> {
    let mut rng = RngState::for_shop(run.seed, run.shop_index);
    let weights = shop_weights(run.wave, run.config.mode, balance);
    let mut items = Vec::with_capacity(balance.shop_slots);
    for slot in 0..balance.shop_slots {
        let item = match slot_target(slot) {
            SlotTarget::Hack => hack_offer(&mut rng, run, balance, weights)
                .or_else(|| action_offer(&mut rng, run, weights)),
            SlotTarget::Action => action_offer(&mut rng, run, weights)
                .or_else(|| hack_offer(&mut rng, run, balance, weights)),
            SlotTarget::Utility => Some(utility_offer(&mut rng, run, balance)),
        };
        if let Some(item) = item {
            items.push(item);
        }
    }
    items
}

/// Refreshes hack prices against the stacks owned now. Other offers keep their price.
pub fn reprice_hack_offers(items: &mut [ShopItem], run: &GameRun, balance: &BalanceConfig) {
    for item in items.iter_mut() {
        if let ShopItem::ShoeHack { id, cost, .. } = item {
            let stacks = hack_stacks(&run.owned_hacks, *id);
            *cost = hack_cost(*id, stacks, balance.hack_cost_growth_percent, &run.config);
        }
    }
}

/// Generator for the removal utility bought at `item_index`.
pub fn removal_rng(run_seed: u64, shop_index: u32, item_index: usize) -> RngState {
    RngState::from_seed(shop_seed(run_seed, shop_index).wrapping_add(item_index as u64 + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RunConfig;

    fn run_with_seed(seed: u64) -> GameRun {
        GameRun::new(RunConfig::stage(0), &BalanceConfig::default(), seed)
    }

    #[test]
    fn same_seed_and_index_same_offer() {
        let balance = BalanceConfig::default();
        let run = run_with_seed(1234);
        assert_eq!(
            generate_shop_items(&run, &balance),
            generate_shop_items(&run, &balance)
        );
    }

    #[test]
    fn composition_is_two_hacks_two_cards_one_utility() {
        let balance = BalanceConfig::default();
        for seed in 0..20 {
            let items = generate_shop_items(&run_with_seed(seed), &balance);
            let kinds: Vec<ShopItemKind> = items.iter().map(ShopItem::kind).collect();
            assert_eq!(kinds.len(), 5);
            assert_eq!(&kinds[..2], &[ShopItemKind::ShoeHack, ShopItemKind::ShoeHack]);
            assert_eq!(&kinds[2..4], &[ShopItemKind::ActionCard, ShopItemKind::ActionCard]);
            assert!(matches!(
                kinds[4],
                ShopItemKind::RerollShop | ShopItemKind::RemoveActionCard
            ));
        }
    }

    #[test]
    fn maxed_hacks_fall_back_to_action_cards() {
        let balance = BalanceConfig::default();
        let mut run = run_with_seed(5);
        for hack in all_shoe_hacks() {
            run.owned_hacks.insert(hack.id, hack.max_stacks);
        }
        let items = generate_shop_items(&run, &balance);
        assert_eq!(items.len(), 5);
        assert!(items
            .iter()
            .all(|item| item.kind() != ShopItemKind::ShoeHack));
    }

    #[test]
    fn boss_weight_is_always_zero() {
        let balance = BalanceConfig::default();
        let weights = shop_weights(40, RunMode::Survival, &balance);
        assert_eq!(weights.boss, 0.0);
        assert_eq!(weights.common, 50.0);
        assert_eq!(weights.uncommon, 35.0);
        assert_eq!(weights.rare, 15.0);
        let half = shop_weights(5, RunMode::Survival, &balance);
        assert_eq!(half.common, 60.0);
        assert_eq!(shop_weights(40, RunMode::Stage, &balance).common, 70.0);
    }

    #[test]
    fn removal_utility_needs_owned_cards() {
        let balance = BalanceConfig::default();
        let mut run = run_with_seed(77);
        run.action_deck.clear();
        run.action_hand.clear();
        run.action_discard.clear();
        for seed in 0..30 {
            run.seed = seed;
            let items = generate_shop_items(&run, &balance);
            assert!(items
                .iter()
                .all(|item| item.kind() != ShopItemKind::RemoveActionCard));
        }
    }

    #[test]
    fn hack_cost_reflects_owned_stacks() {
        let balance = BalanceConfig::default();
        let mut run = run_with_seed(9);
        run.owned_hacks.insert(ShoeHackId::Add2Aces, 2);
        run.owned_hacks.insert(ShoeHackId::AddGlitchCard, 1);
        for seed in 0..30 {
            run.seed = seed;
            for item in generate_shop_items(&run, &balance) {
                match item {
                    ShopItem::ShoeHack {
                        id: ShoeHackId::Add2Aces,
                        cost,
                        ..
                    } => assert_eq!(cost, 100),
                    ShopItem::ShoeHack {
                        id: ShoeHackId::AddGlitchCard,
                        cost,
                        ..
                    } => assert_eq!(cost, 112),
                    _ => {}
                }
            }
        }
    }
}
