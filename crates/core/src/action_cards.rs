use crate::{Rarity, RunConfig};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionCardId {
    PeekHoleCard,
    RedealHand,
    SwapWithDealer,
    GlitchHit,
    Firewall,
    Insurance,
    Overclock,
    FreeHit,
    Scramble,
    DoubleVision,
    Patch,
}

impl ActionCardId {
    pub const ALL: [ActionCardId; 11] = [
        ActionCardId::PeekHoleCard,
        ActionCardId::RedealHand,
        ActionCardId::SwapWithDealer,
        ActionCardId::GlitchHit,
        ActionCardId::Firewall,
        ActionCardId::Insurance,
        ActionCardId::Overclock,
        ActionCardId::FreeHit,
        ActionCardId::Scramble,
        ActionCardId::DoubleVision,
        ActionCardId::Patch,
    ];
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ActionTiming {
    BeforeDeal,
    AfterDeal,
    DuringDecision,
    AfterReveal,
}

/// Effect tag the state machine interprets when a card is played.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionEffect {
    RevealHoleCard,
    RedealPlayerHand,
    StageSwap,
    StageGlitchHit,
    ArmFirewall,
    ArmInsurance,
    RaiseHitCap(u32),
    GrantFreeHits(u32),
    ShuffleShoe,
    PeekNextCard,
    SuppressDealerAbility,
}

impl ActionEffect {
    /// Effects that open a [`crate::PendingInteraction`].
    pub fn stages_interaction(self) -> bool {
        matches!(
            self,
            ActionEffect::StageSwap | ActionEffect::StageGlitchHit | ActionEffect::PeekNextCard
        )
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ActionCardDef {
    pub id: ActionCardId,
    pub name: &'static str,
    pub description: &'static str,
    pub timing: ActionTiming,
    pub rarity: Rarity,
    pub base_cost: u32,
    pub effect: ActionEffect,
}

impl ActionCardDef {
    pub fn cost(&self, config: &RunConfig) -> u32 {
        config.scale(self.base_cost)
    }
}

const ACTION_CARDS: &[ActionCardDef] = &[
    ActionCardDef {
        id: ActionCardId::PeekHoleCard,
        name: "Peek",
        description: "Reveal dealer hole card this hand",
        timing: ActionTiming::AfterDeal,
        rarity: Rarity::Common,
        base_cost: 20,
        effect: ActionEffect::RevealHoleCard,
    },
    ActionCardDef {
        id: ActionCardId::RedealHand,
        name: "Redeal",
        description: "Discard your hand and draw a new two-card hand",
        timing: ActionTiming::AfterDeal,
        rarity: Rarity::Common,
        base_cost: 25,
        effect: ActionEffect::RedealPlayerHand,
    },
    ActionCardDef {
        id: ActionCardId::SwapWithDealer,
        name: "Swap",
        description: "Swap one of your cards with dealer upcard",
        timing: ActionTiming::DuringDecision,
        rarity: Rarity::Rare,
        base_cost: 55,
        effect: ActionEffect::StageSwap,
    },
    ActionCardDef {
        id: ActionCardId::GlitchHit,
        name: "Glitch Hit",
        description: "Next hit draws two cards; choose one to keep",
        timing: ActionTiming::DuringDecision,
        rarity: Rarity::Uncommon,
        base_cost: 35,
        effect: ActionEffect::StageGlitchHit,
    },
    ActionCardDef {
        id: ActionCardId::Firewall,
        name: "Firewall",
        description: "Prevent bust once this hand (set total to 21 if you would bust)",
        timing: ActionTiming::DuringDecision,
        rarity: Rarity::Rare,
        base_cost: 60,
        effect: ActionEffect::ArmFirewall,
    },
    ActionCardDef {
        id: ActionCardId::Insurance,
        name: "Insurance",
        description: "Refund your bet if the dealer beats you with a blackjack",
        timing: ActionTiming::AfterDeal,
        rarity: Rarity::Uncommon,
        base_cost: 40,
        effect: ActionEffect::ArmInsurance,
    },
    ActionCardDef {
        id: ActionCardId::Overclock,
        name: "Overclock",
        description: "Take one extra action beyond limits",
        timing: ActionTiming::DuringDecision,
        rarity: Rarity::Common,
        base_cost: 25,
        effect: ActionEffect::RaiseHitCap(1),
    },
    ActionCardDef {
        id: ActionCardId::FreeHit,
        name: "Free Hit",
        description: "Your next hit does not count toward the hit limit",
        timing: ActionTiming::DuringDecision,
        rarity: Rarity::Uncommon,
        base_cost: 30,
        effect: ActionEffect::GrantFreeHits(1),
    },
    ActionCardDef {
        id: ActionCardId::Scramble,
        name: "Scramble",
        description: "Shuffle remaining shoe",
        timing: ActionTiming::DuringDecision,
        rarity: Rarity::Common,
        base_cost: 15,
        effect: ActionEffect::ShuffleShoe,
    },
    ActionCardDef {
        id: ActionCardId::DoubleVision,
        name: "Double Vision",
        description: "See the next card in the shoe; your next hit takes it",
        timing: ActionTiming::DuringDecision,
        rarity: Rarity::Uncommon,
        base_cost: 30,
        effect: ActionEffect::PeekNextCard,
    },
    ActionCardDef {
        id: ActionCardId::Patch,
        name: "Patch",
        description: "Remove one negative dealer modifier for this hand only",
        timing: ActionTiming::BeforeDeal,
        rarity: Rarity::Rare,
        base_cost: 50,
        effect: ActionEffect::SuppressDealerAbility,
    },
];

pub const STARTING_ACTION_DECK: [ActionCardId; 4] = [
    ActionCardId::PeekHoleCard,
    ActionCardId::Scramble,
    ActionCardId::RedealHand,
    ActionCardId::Firewall,
];

pub fn all_action_cards() -> &'static [ActionCardDef] {
    ACTION_CARDS
}

pub fn action_card(id: ActionCardId) -> ActionCardDef {
    // Catalog rows are kept in the enum's declaration order.
    ACTION_CARDS[id as usize]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_rows_match_ids() {
        assert_eq!(all_action_cards().len(), ActionCardId::ALL.len());
        for id in ActionCardId::ALL {
            assert_eq!(action_card(id).id, id);
        }
    }

    #[test]
    fn costs_scale_with_difficulty() {
        let firewall = action_card(ActionCardId::Firewall);
        assert_eq!(firewall.cost(&RunConfig::stage(0)), 60);
        assert_eq!(firewall.cost(&RunConfig::stage(5)), 90);
    }

    #[test]
    fn staging_cards_are_flagged() {
        let staged: Vec<ActionCardId> = all_action_cards()
            .iter()
            .filter(|card| card.effect.stages_interaction())
            .map(|card| card.id)
            .collect();
        assert_eq!(
            staged,
            vec![
                ActionCardId::SwapWithDealer,
                ActionCardId::GlitchHit,
                ActionCardId::DoubleVision
            ]
        );
    }
}
