#[derive(Debug, Clone)]
pub struct AutoplayConfig {
    pub seed: u64,
    pub max_steps: u32,
    /// Bet size as a percentage of chips, never below the table minimum.
    pub bet_percent: u32,
    /// Minimum bets kept in hand after any shop purchase.
    pub shop_reserve_bets: u32,
    pub use_action_cards: bool,
    /// Playouts per shop candidate; zero buys by preference only.
    pub rollouts: u32,
    pub rollout_depth: u32,
}

impl Default for AutoplayConfig {
    fn default() -> Self {
        Self {
            seed: 0xC0FFEE,
            max_steps: 2000,
            bet_percent: 10,
            shop_reserve_bets: 3,
            use_action_cards: true,
            rollouts: 4,
            rollout_depth: 60,
        }
    }
}
