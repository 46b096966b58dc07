use crate::{BalanceConfig, RunMode};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DealerAbility {
    DealerWinsOn22,
    HidePlayerTotal,
    HideDealerUpcard,
    ForcedHitUnder12,
    OneLessAction,
    BurnTopCardOnHit,
    HideAllPlayerCards,
    BlackjackPays1To1,
    DealerDraws3ChoosesBest,
    DoubleMinBet,
    NoSplit,
    DealerStandsOn16,
    PlayerStartsWithOneCard,
}

impl DealerAbility {
    pub const ALL: [DealerAbility; 13] = [
        DealerAbility::DealerWinsOn22,
        DealerAbility::HidePlayerTotal,
        DealerAbility::HideDealerUpcard,
        DealerAbility::ForcedHitUnder12,
        DealerAbility::OneLessAction,
        DealerAbility::BurnTopCardOnHit,
        DealerAbility::HideAllPlayerCards,
        DealerAbility::BlackjackPays1To1,
        DealerAbility::DealerDraws3ChoosesBest,
        DealerAbility::DoubleMinBet,
        DealerAbility::NoSplit,
        DealerAbility::DealerStandsOn16,
        DealerAbility::PlayerStartsWithOneCard,
    ];

    pub fn id(self) -> &'static str {
        match self {
            DealerAbility::DealerWinsOn22 => "dealer_wins_on_22",
            DealerAbility::HidePlayerTotal => "hide_player_total",
            DealerAbility::HideDealerUpcard => "hide_dealer_upcard",
            DealerAbility::ForcedHitUnder12 => "forced_hit_under_12",
            DealerAbility::OneLessAction => "one_less_action",
            DealerAbility::BurnTopCardOnHit => "burn_top_card_on_hit",
            DealerAbility::HideAllPlayerCards => "hide_all_player_cards",
            DealerAbility::BlackjackPays1To1 => "blackjack_pays_1_to_1",
            DealerAbility::DealerDraws3ChoosesBest => "dealer_draws_3_chooses_best",
            DealerAbility::DoubleMinBet => "double_min_bet",
            DealerAbility::NoSplit => "no_split",
            DealerAbility::DealerStandsOn16 => "dealer_stands_on_16",
            DealerAbility::PlayerStartsWithOneCard => "player_starts_with_one_card",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            DealerAbility::DealerWinsOn22 => "House Edge",
            DealerAbility::HidePlayerTotal => "Data Scramble",
            DealerAbility::HideDealerUpcard => "Encrypted Upcard",
            DealerAbility::ForcedHitUnder12 => "Compulsion Protocol",
            DealerAbility::OneLessAction => "Action Limit",
            DealerAbility::BurnTopCardOnHit => "Card Burn",
            DealerAbility::HideAllPlayerCards => "Total Blackout",
            DealerAbility::BlackjackPays1To1 => "Reduced Payout",
            DealerAbility::DealerDraws3ChoosesBest => "Optimal Draw",
            DealerAbility::DoubleMinBet => "High Stakes",
            DealerAbility::NoSplit => "No Splits",
            DealerAbility::DealerStandsOn16 => "Early Stand",
            DealerAbility::PlayerStartsWithOneCard => "Handicap",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            DealerAbility::DealerWinsOn22 => "Dealer wins on 22 instead of busting",
            DealerAbility::HidePlayerTotal => "Your hand total is hidden (cards still visible)",
            DealerAbility::HideDealerUpcard => "Dealer upcard is hidden until reveal",
            DealerAbility::ForcedHitUnder12 => "You must hit if your total is under 12",
            DealerAbility::OneLessAction => "You can only hit twice per hand",
            DealerAbility::BurnTopCardOnHit => "Each hit burns the top card before drawing",
            DealerAbility::HideAllPlayerCards => "All your cards are hidden (only count visible)",
            DealerAbility::BlackjackPays1To1 => "Blackjack pays 1:1 instead of 3:2",
            DealerAbility::DealerDraws3ChoosesBest => {
                "Dealer draws 3 cards and chooses the best hand"
            }
            DealerAbility::DoubleMinBet => "Minimum bet is doubled",
            DealerAbility::NoSplit => "You cannot split pairs",
            DealerAbility::DealerStandsOn16 => "Dealer stands on 16 instead of 17",
            DealerAbility::PlayerStartsWithOneCard => "You start with only one card",
        }
    }

    /// The bet has already been sized by the time a patch can be played.
    pub fn is_patchable(self) -> bool {
        self != DealerAbility::DoubleMinBet
    }

    /// Spent once the cards are out; a patch after the deal cannot undo it.
    pub fn applies_at_deal(self) -> bool {
        self == DealerAbility::PlayerStartsWithOneCard
    }
}

/// Guarantees the player keeps at least one signal: hidden cards force the total visible.
/// Returns `(hide_total, hide_cards)`.
pub fn resolve_visibility(hide_total: bool, hide_cards: bool) -> (bool, bool) {
    if hide_total && hide_cards {
        return (false, true);
    }
    (hide_total, hide_cards)
}

/// Capabilities for one hand, computed from the dealer's abilities when the bet is placed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HandRules {
    pub hide_player_total: bool,
    pub hide_player_cards: bool,
    pub hide_dealer_upcard: bool,
    pub hit_cap: Option<u32>,
    pub forced_hit_threshold: Option<u32>,
    pub split_allowed: bool,
    pub starting_cards: usize,
    pub burn_on_hit: bool,
    pub dealer_stand_threshold: u32,
    pub dealer_hits_soft_17: bool,
    pub dealer_draws_three: bool,
    pub dealer_wins_on_22: bool,
    pub blackjack_pays_1_to_1: bool,
    pub double_min_bet: bool,
}

impl Default for HandRules {
    fn default() -> Self {
        Self::from_abilities(&[], None, &BalanceConfig::default())
    }
}

impl HandRules {
    pub fn from_abilities(
        abilities: &[DealerAbility],
        suppressed: Option<DealerAbility>,
        balance: &BalanceConfig,
    ) -> Self {
        let has = |ability: DealerAbility| {
            suppressed != Some(ability) && abilities.contains(&ability)
        };
        let (hide_player_total, hide_player_cards) = resolve_visibility(
            has(DealerAbility::HidePlayerTotal),
            has(DealerAbility::HideAllPlayerCards),
        );
        Self {
            hide_player_total,
            hide_player_cards,
            hide_dealer_upcard: has(DealerAbility::HideDealerUpcard),
            hit_cap: has(DealerAbility::OneLessAction).then_some(balance.limited_hit_cap),
            forced_hit_threshold: has(DealerAbility::ForcedHitUnder12)
                .then_some(balance.forced_hit_threshold),
            split_allowed: !has(DealerAbility::NoSplit),
            starting_cards: if has(DealerAbility::PlayerStartsWithOneCard) {
                1
            } else {
                2
            },
            burn_on_hit: has(DealerAbility::BurnTopCardOnHit),
            dealer_stand_threshold: if has(DealerAbility::DealerStandsOn16) {
                balance.dealer_early_stand_threshold
            } else {
                balance.dealer_stand_threshold
            },
            dealer_hits_soft_17: balance.dealer_hits_soft_17,
            dealer_draws_three: has(DealerAbility::DealerDraws3ChoosesBest),
            dealer_wins_on_22: has(DealerAbility::DealerWinsOn22),
            blackjack_pays_1_to_1: has(DealerAbility::BlackjackPays1To1),
            double_min_bet: has(DealerAbility::DoubleMinBet),
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct DealerDef {
    pub id: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub abilities: &'static [DealerAbility],
    pub is_boss: bool,
}

const DEALERS: &[DealerDef] = &[
    DealerDef {
        id: "dealer_1",
        name: "Chip",
        description: "A basic dealer with minimal interference",
        abilities: &[],
        is_boss: false,
    },
    DealerDef {
        id: "dealer_2",
        name: "Glitch",
        description: "Hides information to confuse players",
        abilities: &[DealerAbility::HidePlayerTotal],
        is_boss: false,
    },
    DealerDef {
        id: "dealer_3",
        name: "Burn",
        description: "Burns cards on every hit",
        abilities: &[DealerAbility::BurnTopCardOnHit],
        is_boss: false,
    },
    DealerDef {
        id: "dealer_4",
        name: "Compulse",
        description: "Forces aggressive play",
        abilities: &[DealerAbility::ForcedHitUnder12, DealerAbility::HideDealerUpcard],
        is_boss: false,
    },
    DealerDef {
        id: "dealer_5",
        name: "Limit",
        description: "Restricts your actions",
        abilities: &[DealerAbility::OneLessAction, DealerAbility::HidePlayerTotal],
        is_boss: false,
    },
    DealerDef {
        id: "boss_1",
        name: "THE HOUSE",
        description: "The ultimate dealer with unfair advantages",
        abilities: &[
            DealerAbility::DealerWinsOn22,
            DealerAbility::HideDealerUpcard,
            DealerAbility::OneLessAction,
        ],
        is_boss: true,
    },
    DealerDef {
        id: "boss_2",
        name: "THE VOID",
        description: "A dealer that hides everything from you",
        abilities: &[
            DealerAbility::HideAllPlayerCards,
            DealerAbility::HideDealerUpcard,
            DealerAbility::BlackjackPays1To1,
        ],
        is_boss: true,
    },
    DealerDef {
        id: "boss_3",
        name: "THE OPTIMIZER",
        description: "Uses perfect strategy against you",
        abilities: &[
            DealerAbility::DealerDraws3ChoosesBest,
            DealerAbility::DealerStandsOn16,
            DealerAbility::DoubleMinBet,
        ],
        is_boss: true,
    },
    DealerDef {
        id: "boss_4",
        name: "THE HANDICAPPER",
        description: "Stacks the deck against you from the start",
        abilities: &[
            DealerAbility::PlayerStartsWithOneCard,
            DealerAbility::NoSplit,
            DealerAbility::ForcedHitUnder12,
            DealerAbility::OneLessAction,
        ],
        is_boss: true,
    },
    DealerDef {
        id: "boss_5",
        name: "THE COLLECTOR",
        description: "Takes everything and gives nothing back",
        abilities: &[
            DealerAbility::BlackjackPays1To1,
            DealerAbility::DoubleMinBet,
            DealerAbility::BurnTopCardOnHit,
            DealerAbility::DealerWinsOn22,
        ],
        is_boss: true,
    },
];

pub fn all_dealers() -> &'static [DealerDef] {
    DEALERS
}

pub fn dealer_by_id(id: &str) -> Option<DealerDef> {
    DEALERS.iter().copied().find(|dealer| dealer.id == id)
}

fn regular_dealers() -> impl Iterator<Item = &'static DealerDef> {
    DEALERS.iter().filter(|dealer| !dealer.is_boss)
}

fn boss_dealers() -> impl Iterator<Item = &'static DealerDef> {
    DEALERS.iter().filter(|dealer| dealer.is_boss)
}

/// Dealer facing the player on one wave, with any survival extras folded in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dealer {
    pub id: String,
    pub name: String,
    pub description: String,
    pub abilities: Vec<DealerAbility>,
    pub is_boss: bool,
}

impl Dealer {
    pub fn has(&self, ability: DealerAbility) -> bool {
        self.abilities.contains(&ability)
    }

    fn add_ability(&mut self, ability: DealerAbility) {
        if !self.has(ability) {
            self.abilities.push(ability);
        }
    }
}

impl From<DealerDef> for Dealer {
    fn from(def: DealerDef) -> Self {
        Self {
            id: def.id.to_string(),
            name: def.name.to_string(),
            description: def.description.to_string(),
            abilities: def.abilities.to_vec(),
            is_boss: def.is_boss,
        }
    }
}

const SURVIVAL_TIERS: [(u32, DealerAbility); 3] = [
    (1, DealerAbility::HidePlayerTotal),
    (2, DealerAbility::OneLessAction),
    (3, DealerAbility::BurnTopCardOnHit),
];

/// Dealer for `wave` under the shipped boss intervals. No randomness is involved.
pub fn get_dealer_for_wave(wave: u32, mode: RunMode, ascension_level: u8) -> Dealer {
    let interval = BalanceConfig::default().boss_interval(mode);
    dealer_for_wave(wave, mode, ascension_level, interval)
}

/// Boss every `interval` waves, regular dealers in rotation between them.
pub fn dealer_for_wave(wave: u32, mode: RunMode, ascension_level: u8, interval: u32) -> Dealer {
    let wave = wave.max(1);
    let interval = interval.max(1);
    if wave % interval == 0 {
        let bosses: Vec<&DealerDef> = boss_dealers().collect();
        let index = (wave / interval - 1) as usize % bosses.len();
        return Dealer::from(*bosses[index]);
    }
    let regulars: Vec<&DealerDef> = regular_dealers().collect();
    let mut dealer = Dealer::from(*regulars[(wave - 1) as usize % regulars.len()]);
    if mode == RunMode::Survival && (wave > interval || ascension_level > 0) {
        let tier = wave / 5 + u32::from(ascension_level);
        for (threshold, ability) in SURVIVAL_TIERS {
            if tier >= threshold {
                dealer.add_ability(ability);
            }
        }
    }
    dealer
}
