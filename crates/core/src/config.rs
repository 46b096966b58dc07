use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MAX_ASCENSION: u8 = 10;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum RunMode {
    /// Finite run ending at the final wave.
    Stage,
    /// Endless run.
    Survival,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct RunConfig {
    pub mode: RunMode,
    pub ascension_level: u8,
    /// Difficulty multiplier in percent: `100 + 10 * ascension_level`.
    pub difficulty_percent: u32,
    pub starting_lives: u32,
    pub emergency_chip_value: u32,
}

impl RunConfig {
    pub fn new(mode: RunMode, ascension_level: u8, balance: &BalanceConfig) -> Self {
        let ascension_level = ascension_level.min(MAX_ASCENSION);
        let difficulty_percent = 100 + 10 * u32::from(ascension_level);
        Self {
            mode,
            ascension_level,
            difficulty_percent,
            starting_lives: balance.starting_lives,
            // Divided, not reduced linearly: ascension 1 gives 90, ascension 10 gives 50.
            emergency_chip_value: balance.emergency_chips * 100 / difficulty_percent,
        }
    }

    pub fn stage(ascension_level: u8) -> Self {
        Self::new(RunMode::Stage, ascension_level, &BalanceConfig::default())
    }

    pub fn survival(ascension_level: u8) -> Self {
        Self::new(RunMode::Survival, ascension_level, &BalanceConfig::default())
    }

    pub fn difficulty_multiplier(&self) -> f64 {
        f64::from(self.difficulty_percent) / 100.0
    }

    /// `floor(value * multiplier)` without float rounding drift.
    pub fn scale(&self, value: u32) -> u32 {
        value * self.difficulty_percent / 100
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self::stage(0)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct RarityWeights {
    pub common: f64,
    pub uncommon: f64,
    pub rare: f64,
    pub boss: f64,
}

impl Default for RarityWeights {
    fn default() -> Self {
        Self {
            common: 70.0,
            uncommon: 25.0,
            rare: 5.0,
            boss: 0.0,
        }
    }
}

/// Tunable numbers. Defaults are the shipped balance; `assets/balance.json` may override
/// any subset.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct BalanceConfig {
    pub starting_chips: u32,
    pub starting_lives: u32,
    pub emergency_chips: u32,
    pub base_min_bet: u32,
    pub min_bet_step: u32,
    pub stage_final_wave: u32,
    pub stage_boss_interval: u32,
    pub survival_boss_interval: u32,
    pub action_cards_per_hand: usize,
    pub max_action_cards_per_hand: u32,
    pub limited_hit_cap: u32,
    pub forced_hit_threshold: u32,
    pub dealer_stand_threshold: u32,
    pub dealer_early_stand_threshold: u32,
    pub dealer_hits_soft_17: bool,
    pub shop_slots: usize,
    pub rarity_weights: RarityWeights,
    /// Survival shift applied at full strength from wave 10 on.
    pub survival_rarity_shift: RarityWeights,
    pub reroll_cost: u32,
    pub remove_card_cost: u32,
    pub hack_cost_growth_percent: u32,
}

impl Default for BalanceConfig {
    fn default() -> Self {
        Self {
            starting_chips: 100,
            starting_lives: 3,
            emergency_chips: 100,
            base_min_bet: 10,
            min_bet_step: 5,
            stage_final_wave: 25,
            stage_boss_interval: 5,
            survival_boss_interval: 10,
            action_cards_per_hand: 2,
            max_action_cards_per_hand: 2,
            limited_hit_cap: 2,
            forced_hit_threshold: 12,
            dealer_stand_threshold: 17,
            dealer_early_stand_threshold: 16,
            dealer_hits_soft_17: false,
            shop_slots: 5,
            rarity_weights: RarityWeights::default(),
            survival_rarity_shift: RarityWeights {
                common: -20.0,
                uncommon: 10.0,
                rare: 10.0,
                boss: 0.0,
            },
            reroll_cost: 50,
            remove_card_cost: 30,
            hack_cost_growth_percent: 50,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("stage final wave {0} must be at least one boss interval")]
    FinalWaveTooShort(u32),
    #[error("rarity weight {0} is negative")]
    NegativeWeight(&'static str),
    #[error("rarity weights sum to zero")]
    ZeroWeights,
    #[error("boss rarity must not drop from regular shop slots")]
    BossWeight,
    #[error("{0} must be greater than zero")]
    Zero(&'static str),
}

impl BalanceConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.stage_boss_interval == 0 || self.survival_boss_interval == 0 {
            return Err(ConfigError::Zero("boss interval"));
        }
        if self.stage_final_wave < self.stage_boss_interval {
            return Err(ConfigError::FinalWaveTooShort(self.stage_final_wave));
        }
        if self.base_min_bet == 0 {
            return Err(ConfigError::Zero("base_min_bet"));
        }
        if self.shop_slots == 0 {
            return Err(ConfigError::Zero("shop_slots"));
        }
        if self.dealer_stand_threshold == 0 || self.dealer_early_stand_threshold == 0 {
            return Err(ConfigError::Zero("dealer stand threshold"));
        }
        for weights in [self.rarity_weights, self.shifted_weights(1.0)] {
            for (name, value) in [
                ("common", weights.common),
                ("uncommon", weights.uncommon),
                ("rare", weights.rare),
                ("boss", weights.boss),
            ] {
                if value < 0.0 {
                    return Err(ConfigError::NegativeWeight(name));
                }
            }
            if weights.boss > 0.0 {
                return Err(ConfigError::BossWeight);
            }
            if weights.common + weights.uncommon + weights.rare <= 0.0 {
                return Err(ConfigError::ZeroWeights);
            }
        }
        Ok(())
    }

    /// Base weights plus `progress` (0..=1) of the survival shift.
    pub fn shifted_weights(&self, progress: f64) -> RarityWeights {
        let base = self.rarity_weights;
        let shift = self.survival_rarity_shift;
        RarityWeights {
            common: base.common + shift.common * progress,
            uncommon: base.uncommon + shift.uncommon * progress,
            rare: base.rare + shift.rare * progress,
            boss: base.boss + shift.boss * progress,
        }
    }

    /// Waves between bosses for `mode`.
    pub fn boss_interval(&self, mode: RunMode) -> u32 {
        match mode {
            RunMode::Stage => self.stage_boss_interval,
            RunMode::Survival => self.survival_boss_interval,
        }
    }

    pub fn min_bet_for_wave(&self, wave: u32, config: &RunConfig) -> u32 {
        let base = self.base_min_bet + wave.saturating_sub(1) * self.min_bet_step;
        config.scale(base)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascension_scaling() {
        let base = RunConfig::stage(0);
        assert_eq!(base.difficulty_percent, 100);
        assert_eq!(base.emergency_chip_value, 100);

        let one = RunConfig::stage(1);
        assert_eq!(one.scale(100), 110);
        assert_eq!(one.emergency_chip_value, 90);

        let ten = RunConfig::survival(10);
        assert_eq!(ten.scale(100), 200);
        assert_eq!(ten.emergency_chip_value, 50);
        assert_eq!(ten.mode, RunMode::Survival);
    }

    #[test]
    fn ascension_is_clamped() {
        assert_eq!(RunConfig::stage(42).ascension_level, MAX_ASCENSION);
    }

    #[test]
    fn min_bet_grows_per_wave() {
        let balance = BalanceConfig::default();
        let config = RunConfig::stage(3);
        assert_eq!(balance.min_bet_for_wave(1, &config), 13);
        assert_eq!(balance.min_bet_for_wave(3, &RunConfig::stage(0)), 20);
    }

    #[test]
    fn default_balance_is_valid() {
        assert_eq!(BalanceConfig::default().validate(), Ok(()));
    }

    #[test]
    fn boss_intervals_come_from_balance() {
        let mut balance = BalanceConfig::default();
        assert_eq!(balance.boss_interval(RunMode::Stage), 5);
        assert_eq!(balance.boss_interval(RunMode::Survival), 10);
        balance.survival_boss_interval = 0;
        assert_eq!(balance.validate(), Err(ConfigError::Zero("boss interval")));
        balance.survival_boss_interval = 10;
        balance.stage_boss_interval = 30;
        assert_eq!(balance.validate(), Err(ConfigError::FinalWaveTooShort(25)));
    }

    #[test]
    fn boss_weight_is_rejected() {
        let mut balance = BalanceConfig::default();
        balance.rarity_weights.boss = 2.0;
        assert_eq!(balance.validate(), Err(ConfigError::BossWeight));
    }
}
