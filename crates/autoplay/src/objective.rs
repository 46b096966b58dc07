use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct TargetConfig {
    pub target_wave: Option<u32>,
    pub target_chips: Option<u32>,
    pub target_score: Option<u32>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct ObjectiveWeights {
    pub wave: f64,
    pub chips: f64,
    pub lives: f64,
    /// Applied as +1 on victory and -1 on game over.
    pub outcome: f64,
    pub steps_penalty: f64,
}

impl Default for ObjectiveWeights {
    fn default() -> Self {
        Self {
            wave: 2.0,
            chips: 0.8,
            lives: 1.0,
            outcome: 5.0,
            steps_penalty: 0.01,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvalMetrics {
    pub wave: u32,
    pub chips: u32,
    pub lives: u32,
    pub score: u32,
    pub victory: bool,
    pub game_over: bool,
}

/// True when every configured target is met and at least one target is configured.
pub fn target_reached(metrics: EvalMetrics, targets: TargetConfig) -> bool {
    if let Some(target) = targets.target_wave {
        if metrics.wave < target {
            return false;
        }
    }
    if let Some(target) = targets.target_chips {
        if metrics.chips < target {
            return false;
        }
    }
    if let Some(target) = targets.target_score {
        if metrics.score < target {
            return false;
        }
    }
    targets.target_wave.is_some()
        || targets.target_chips.is_some()
        || targets.target_score.is_some()
}

pub fn weighted_score(metrics: EvalMetrics, weights: ObjectiveWeights, total_steps: u32) -> f64 {
    let outcome = if metrics.victory {
        1.0
    } else if metrics.game_over {
        -1.0
    } else {
        0.0
    };
    weights.wave * f64::from(metrics.wave)
        + weights.chips * f64::from(metrics.chips) / 100.0
        + weights.lives * f64::from(metrics.lives)
        + weights.outcome * outcome
        - weights.steps_penalty * f64::from(total_steps)
}
