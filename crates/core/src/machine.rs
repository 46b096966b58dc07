use crate::{
    ActionCardId, BalanceConfig, Card, Dealer, DealerAbility, GameRun, Hand, HandResult,
    HandRules, Phase, RngState, RunConfig, ShoeError, ShoeHackId,
};
use thiserror::Error;
use tracing::{debug, error};

mod actions;
mod betting;
mod dealer;
mod helpers;
mod lifecycle;
mod play;
mod resolution;
mod shop;
mod view;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TransitionError {
    #[error("invalid phase: {0:?}")]
    InvalidPhase(Phase),
    #[error("bet {amount} outside [{min}, {max}]")]
    BetOutOfRange { amount: u32, min: u32, max: u32 },
    #[error("hands already dealt")]
    AlreadyDealt,
    #[error("hands not dealt")]
    NotDealt,
    #[error("invalid hand index {0}")]
    InvalidHandIndex(usize),
    #[error("hand {0} is not the active hand")]
    HandNotActive(usize),
    #[error("hand is finished")]
    HandFinished,
    #[error("{0} player hands still to play")]
    HandsRemaining(usize),
    #[error("hit cap {0} reached")]
    HitCapReached(u32),
    #[error("must hit below {threshold} (total {value})")]
    MustHit { value: u32, threshold: u32 },
    #[error("dealer forbids splitting")]
    SplitNotAllowed,
    #[error("hand cannot be split")]
    NotSplittable,
    #[error("not enough chips: need {needed}, have {available}")]
    NotEnoughChips { needed: u32, available: u32 },
    #[error("invalid shop offer index {0}")]
    InvalidOfferIndex(usize),
    #[error("{0:?} is at its stack cap")]
    StackCapReached(ShoeHackId),
    #[error("no action cards to remove")]
    NoActionCardsToRemove,
    #[error("{0:?} is not in the action hand")]
    CardNotInHand(ActionCardId),
    #[error("action card limit {0} reached this hand")]
    ActionQuotaExhausted(u32),
    #[error("another interaction is pending")]
    InteractionPending,
    #[error("no dealer ability left to patch")]
    NothingToPatch,
    #[error("no swap in progress")]
    NoSwapPending,
    #[error("no card selected for swap")]
    NoSwapSelection,
    #[error("invalid card index {0}")]
    InvalidCardIndex(usize),
    #[error("no glitch hit choice pending")]
    NoGlitchChoice,
    #[error("invalid glitch hit choice {0}")]
    InvalidChoice(usize),
    #[error("no lives left")]
    NoLives,
    #[error("shoe exhausted")]
    ShoeExhausted,
}

impl TransitionError {
    /// Invariant violations rather than rejected input.
    pub fn is_fatal(&self) -> bool {
        matches!(self, TransitionError::ShoeExhausted)
    }
}

impl From<ShoeError> for TransitionError {
    fn from(err: ShoeError) -> Self {
        match err {
            ShoeError::Exhausted => TransitionError::ShoeExhausted,
        }
    }
}

/// Action-card effects staged for the current hand only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandEffects {
    pub firewall: bool,
    pub insurance: bool,
    pub free_hits: u32,
    pub extra_hit_cap: u32,
    pub hole_card_peeked: bool,
    pub patched: Option<DealerAbility>,
    pub action_cards_used: u32,
}

/// The one micro-interaction that may be open at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PendingInteraction {
    Swap { selected_card: Option<usize> },
    /// The next hit draws two cards instead of one.
    GlitchHitArmed,
    GlitchHitChoice { options: [Card; 2] },
    /// Taken off the top of the shoe; the next hit receives it.
    DoubleVision { card: Card },
}

impl PendingInteraction {
    /// Interactions that must be finished before the hand can move on.
    pub fn blocks_play(&self) -> bool {
        matches!(
            self,
            PendingInteraction::Swap { .. } | PendingInteraction::GlitchHitChoice { .. }
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandOutcome {
    pub hand_index: usize,
    pub result: HandResult,
    pub bet: u32,
    pub payout: u32,
    pub firewall_used: bool,
    pub insurance_used: bool,
}

/// Whole-game snapshot. Every transition takes `&self` and returns a new snapshot, so
/// any earlier snapshot stays valid.
#[derive(Debug, Clone, PartialEq)]
pub struct GameStateMachine {
    pub phase: Phase,
    pub run: GameRun,
    pub dealer: Option<Dealer>,
    pub player_hands: Vec<Hand>,
    pub active_hand: usize,
    pub dealer_hand: Hand,
    pub dealer_hole_card_revealed: bool,
    /// Hits taken on the active hand.
    pub hit_count: u32,
    pub min_bet: u32,
    pub rules: HandRules,
    pub effects: HandEffects,
    pub pending: Option<PendingInteraction>,
    pub last_outcomes: Vec<HandOutcome>,
    pub balance: BalanceConfig,
    pub rng: RngState,
}

impl Default for GameStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStateMachine {
    pub fn new() -> Self {
        Self::with_balance(BalanceConfig::default())
    }

    pub fn with_balance(balance: BalanceConfig) -> Self {
        let config = RunConfig::new(crate::RunMode::Stage, 0, &balance);
        Self {
            phase: Phase::Menu,
            run: GameRun::new(config, &balance, 0),
            dealer: None,
            player_hands: Vec::new(),
            active_hand: 0,
            dealer_hand: Hand::default(),
            dealer_hole_card_revealed: false,
            hit_count: 0,
            min_bet: 0,
            rules: HandRules::from_abilities(&[], None, &balance),
            effects: HandEffects::default(),
            pending: None,
            last_outcomes: Vec::new(),
            rng: RngState::from_seed(0),
            balance,
        }
    }

    /// Unwraps a `try_*` result under the no-op contract: a rejection hands back an
    /// unchanged copy, a fatal error panics.
    fn settle(&self, op: &'static str, result: Result<Self, TransitionError>) -> Self {
        match result {
            Ok(next) => next,
            Err(err) if err.is_fatal() => {
                error!(op, %err, phase = ?self.phase, "invariant violated");
                panic!("{op}: {err}");
            }
            Err(err) => {
                debug!(op, %err, phase = ?self.phase, "transition rejected");
                self.clone()
            }
        }
    }

    fn expect_phase(&self, phase: Phase) -> Result<(), TransitionError> {
        if self.phase == phase {
            Ok(())
        } else {
            Err(TransitionError::InvalidPhase(self.phase))
        }
    }

    pub fn is_dealt(&self) -> bool {
        !self.player_hands.is_empty()
    }
}
