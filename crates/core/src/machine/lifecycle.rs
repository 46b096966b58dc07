use super::helpers::table_rng;
use super::*;
use crate::dealer_for_wave;
use tracing::info;

impl GameStateMachine {
    /// Fresh run on an entropy seed.
    pub fn start_new_run(&self, config: RunConfig) -> Self {
        self.start_new_run_seeded(config, RngState::from_entropy().seed())
    }

    pub fn start_new_run_seeded(&self, config: RunConfig, seed: u64) -> Self {
        let mut next = Self::with_balance(self.balance.clone());
        next.rng = table_rng(seed);
        next.run = GameRun::new(config, &next.balance, seed);
        next.rng.shuffle(&mut next.run.action_deck);
        next.enter_wave();
        info!(
            seed,
            mode = ?config.mode,
            ascension = config.ascension_level,
            chips = next.run.chips,
            "run started"
        );
        next
    }

    /// Selects the wave's dealer, rebuilds the shoe and lands on the wave intro.
    fn enter_wave(&mut self) {
        let config = self.run.config;
        self.dealer = Some(dealer_for_wave(
            self.run.wave,
            config.mode,
            config.ascension_level,
            self.balance.boss_interval(config.mode),
        ));
        self.min_bet = self.compute_min_bet();
        self.rebuild_shoe();
        self.run.burned_cards.clear();
        self.run.last_burned_card = None;
        self.run.shop.clear();
        self.reset_hand_state();
        self.last_outcomes.clear();
        self.phase = Phase::WaveIntro;
        info!(
            wave = self.run.wave,
            dealer = self.dealer.as_ref().map(|dealer| dealer.name.as_str()),
            min_bet = self.min_bet,
            "wave started"
        );
    }

    pub fn proceed_to_betting(&self) -> Self {
        self.settle("proceed_to_betting", self.try_proceed_to_betting())
    }

    pub fn try_proceed_to_betting(&self) -> Result<Self, TransitionError> {
        self.expect_phase(Phase::WaveIntro)?;
        let mut next = self.clone();
        next.route_to_betting();
        Ok(next)
    }

    pub fn accept_emergency_chips(&self) -> Self {
        self.settle("accept_emergency_chips", self.try_accept_emergency_chips())
    }

    pub fn try_accept_emergency_chips(&self) -> Result<Self, TransitionError> {
        self.expect_phase(Phase::EmergencyChips)?;
        let mut next = self.clone();
        if next.run.lives == 0 {
            next.finish_run(Phase::GameOver);
            return Ok(next);
        }
        next.take_emergency_chips();
        next.route_to_betting();
        Ok(next)
    }

    pub fn decline_emergency_chips(&self) -> Self {
        self.settle("decline_emergency_chips", self.try_decline_emergency_chips())
    }

    pub fn try_decline_emergency_chips(&self) -> Result<Self, TransitionError> {
        self.expect_phase(Phase::EmergencyChips)?;
        let mut next = self.clone();
        next.finish_run(Phase::GameOver);
        Ok(next)
    }

    pub fn sell_life_for_chips(&self) -> Self {
        self.settle("sell_life_for_chips", self.try_sell_life_for_chips())
    }

    pub fn try_sell_life_for_chips(&self) -> Result<Self, TransitionError> {
        match self.phase {
            Phase::Betting | Phase::Shop | Phase::WaveIntro | Phase::EmergencyChips => {}
            other => return Err(TransitionError::InvalidPhase(other)),
        }
        if self.run.lives == 0 {
            return Err(TransitionError::NoLives);
        }
        let mut next = self.clone();
        next.take_emergency_chips();
        if next.phase == Phase::EmergencyChips {
            next.route_to_betting();
        }
        Ok(next)
    }

    fn take_emergency_chips(&mut self) {
        self.run.chips += self.run.config.emergency_chip_value;
        self.run.lives -= 1;
    }

    pub fn proceed_to_next_wave(&self) -> Self {
        self.settle("proceed_to_next_wave", self.try_proceed_to_next_wave())
    }

    pub fn try_proceed_to_next_wave(&self) -> Result<Self, TransitionError> {
        self.expect_phase(Phase::Shop)?;
        let mut next = self.clone();
        next.run.wave += 1;
        if next.run.mode() == crate::RunMode::Stage && next.run.wave > next.balance.stage_final_wave
        {
            next.finish_run(Phase::Victory);
            return Ok(next);
        }
        next.enter_wave();
        next.run.score = next.run.compute_score();
        Ok(next)
    }
}
