use hackjack_core::ActionCardId;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum AutoAction {
    ProceedToBetting,
    PlaceBet { amount: u32 },
    Deal,
    Hit { hand: usize },
    Stand { hand: usize },
    Split { hand: usize },
    UseActionCard { card: ActionCardId, hand: usize },
    SelectSwapCard { index: usize },
    ExecuteSwap,
    CancelSwap,
    ChooseGlitchCard { choice: usize },
    ResolveDealer,
    ResolveResults,
    AcceptEmergencyChips,
    DeclineEmergencyChips,
    SellLife,
    Buy { index: usize },
    NextWave,
}

impl AutoAction {
    pub fn stable_key(&self) -> String {
        match self {
            Self::ProceedToBetting => "proceed_to_betting".to_string(),
            Self::PlaceBet { amount } => format!("place_bet:{amount:06}"),
            Self::Deal => "deal".to_string(),
            Self::Hit { hand } => format!("hit:{hand}"),
            Self::Stand { hand } => format!("stand:{hand}"),
            Self::Split { hand } => format!("split:{hand}"),
            Self::UseActionCard { card, hand } => format!("use_card:{card:?}:{hand}"),
            Self::SelectSwapCard { index } => format!("select_swap:{index}"),
            Self::ExecuteSwap => "execute_swap".to_string(),
            Self::CancelSwap => "cancel_swap".to_string(),
            Self::ChooseGlitchCard { choice } => format!("choose_glitch:{choice}"),
            Self::ResolveDealer => "resolve_dealer".to_string(),
            Self::ResolveResults => "resolve_results".to_string(),
            Self::AcceptEmergencyChips => "accept_emergency".to_string(),
            Self::DeclineEmergencyChips => "decline_emergency".to_string(),
            Self::SellLife => "sell_life".to_string(),
            Self::Buy { index } => format!("buy:{index}"),
            Self::NextWave => "next_wave".to_string(),
        }
    }

    pub fn short_label(&self) -> String {
        match self {
            Self::ProceedToBetting => "proceed".to_string(),
            Self::PlaceBet { amount } => format!("bet {amount}"),
            Self::Deal => "deal".to_string(),
            Self::Hit { hand } => format!("hit {hand}"),
            Self::Stand { hand } => format!("stand {hand}"),
            Self::Split { hand } => format!("split {hand}"),
            Self::UseActionCard { card, hand } => format!("use {card:?} on {hand}"),
            Self::SelectSwapCard { index } => format!("swap pick {index}"),
            Self::ExecuteSwap => "swap".to_string(),
            Self::CancelSwap => "cancel swap".to_string(),
            Self::ChooseGlitchCard { choice } => format!("glitch pick {choice}"),
            Self::ResolveDealer => "dealer".to_string(),
            Self::ResolveResults => "resolve".to_string(),
            Self::AcceptEmergencyChips => "accept emergency".to_string(),
            Self::DeclineEmergencyChips => "decline emergency".to_string(),
            Self::SellLife => "sell life".to_string(),
            Self::Buy { index } => format!("buy {index}"),
            Self::NextWave => "next wave".to_string(),
        }
    }
}
