use crate::Card;
use serde::{Deserialize, Serialize};

pub const BLACKJACK: u32 = 21;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hand {
    pub cards: Vec<Card>,
    #[serde(default)]
    pub is_split: bool,
    /// Set when the hand came from splitting aces; lifts the hit cap for good.
    #[serde(default)]
    pub is_ace_split: bool,
}

impl Hand {
    pub fn new(cards: Vec<Card>) -> Self {
        Self {
            cards,
            is_split: false,
            is_ace_split: false,
        }
    }

    pub fn split_from(cards: Vec<Card>, aces: bool) -> Self {
        Self {
            cards,
            is_split: true,
            is_ace_split: aces,
        }
    }

    pub fn value(&self) -> u32 {
        hand_value(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandResult {
    Loss,
    Win,
    Push,
    BlackjackWin,
}

impl HandResult {
    pub fn is_win(self) -> bool {
        matches!(self, HandResult::Win | HandResult::BlackjackWin)
    }
}

/// What resolution compares: a total and whether it is a two-card natural.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandTotal {
    pub value: u32,
    pub natural: bool,
}

impl HandTotal {
    pub fn of(hand: &Hand) -> Self {
        Self {
            value: hand_value(hand),
            natural: is_blackjack(hand),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Totals {
    minimum: u32,
    best: Option<u32>,
}

// Aces contribute 1 or 11 and glitches anything in 1..=11, so the reachable flexible
// sums are `aces + 10*j + g` for j high aces and g in glitches..=11*glitches.
fn totals(cards: &[Card]) -> Totals {
    let mut fixed = 0u32;
    let mut aces = 0u32;
    let mut glitches = 0u32;
    for card in cards {
        if card.is_glitch {
            glitches += 1;
        } else if card.is_ace() {
            aces += 1;
        } else {
            fixed += card.rank.low_value();
        }
    }
    let minimum = fixed + aces + glitches;
    let mut best = None;
    for high_aces in 0..=aces {
        let base = minimum + 10 * high_aces;
        if base > BLACKJACK {
            break;
        }
        let headroom = BLACKJACK - base;
        let total = base + headroom.min(10 * glitches);
        if best.map_or(true, |current| total > current) {
            best = Some(total);
        }
    }
    Totals { minimum, best }
}

pub fn cards_value(cards: &[Card]) -> u32 {
    let totals = totals(cards);
    totals.best.unwrap_or(totals.minimum)
}

/// Best total not over 21, or the all-low total when every assignment busts.
pub fn hand_value(hand: &Hand) -> u32 {
    cards_value(&hand.cards)
}

/// True when the best total relies on an ace or glitch counted above its minimum.
pub fn is_soft(hand: &Hand) -> bool {
    let totals = totals(&hand.cards);
    matches!(totals.best, Some(best) if best > totals.minimum)
}

pub fn is_blackjack(hand: &Hand) -> bool {
    hand.cards.len() == 2 && hand_value(hand) == BLACKJACK
}

pub fn is_bust(hand: &Hand) -> bool {
    hand_value(hand) > BLACKJACK
}

pub fn can_split(hand: &Hand) -> bool {
    if hand.cards.len() != 2 || hand.is_split {
        return false;
    }
    hand.cards[0].low_value() == hand.cards[1].low_value()
}

pub fn resolve_hand(player: &Hand, dealer: &Hand, dealer_wins_on_22: bool) -> HandResult {
    resolve_totals(HandTotal::of(player), HandTotal::of(dealer), dealer_wins_on_22)
}

pub fn resolve_totals(
    player: HandTotal,
    dealer: HandTotal,
    dealer_wins_on_22: bool,
) -> HandResult {
    if player.value > BLACKJACK {
        return HandResult::Loss;
    }
    if dealer.value > BLACKJACK {
        if dealer_wins_on_22 && dealer.value == 22 {
            return HandResult::Loss;
        }
        return if player.natural {
            HandResult::BlackjackWin
        } else {
            HandResult::Win
        };
    }
    if player.natural && !dealer.natural {
        return HandResult::BlackjackWin;
    }
    if dealer.natural && !player.natural {
        return HandResult::Loss;
    }
    if player.value > dealer.value {
        // Any winning 21 pays the bonus rate, naturals or not.
        return if player.value == BLACKJACK {
            HandResult::BlackjackWin
        } else {
            HandResult::Win
        };
    }
    if player.value < dealer.value {
        return HandResult::Loss;
    }
    HandResult::Push
}

/// Chips handed back for a hand whose bet was already taken at wager time.
pub fn calculate_payout(result: HandResult, bet: u32, blackjack_pays_1_to_1: bool) -> u32 {
    match result {
        HandResult::BlackjackWin if blackjack_pays_1_to_1 => bet + bet,
        HandResult::BlackjackWin => bet + bet * 3 / 2,
        HandResult::Win => bet + bet,
        HandResult::Loss => 0,
        HandResult::Push => bet,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Rank, Suit};

    fn hand(ranks: &[Rank]) -> Hand {
        Hand::new(
            ranks
                .iter()
                .map(|rank| Card::standard(Suit::Clubs, *rank))
                .collect(),
        )
    }

    #[test]
    fn two_aces_and_nine_make_twenty_one() {
        assert_eq!(hand_value(&hand(&[Rank::Ace, Rank::Ace, Rank::Nine])), 21);
    }

    #[test]
    fn bust_reports_minimum_total() {
        assert_eq!(hand_value(&hand(&[Rank::King, Rank::Queen, Rank::Ace, Rank::Five])), 26);
        assert_eq!(hand_value(&hand(&[Rank::Ten, Rank::Nine, Rank::Five])), 24);
    }

    #[test]
    fn glitch_fills_the_gap() {
        let mut cards = hand(&[Rank::Seven, Rank::Four]);
        cards.cards.push(Card::glitch(99));
        assert_eq!(hand_value(&cards), 21);
        cards.cards.push(Card::standard(Suit::Hearts, Rank::King));
        assert_eq!(hand_value(&cards), 22);
    }

    #[test]
    fn softness() {
        assert!(is_soft(&hand(&[Rank::Ace, Rank::Six])));
        assert!(!is_soft(&hand(&[Rank::Ten, Rank::Seven])));
        assert!(!is_soft(&hand(&[Rank::Ace, Rank::Six, Rank::Ten])));
    }

    #[test]
    fn payout_table() {
        assert_eq!(calculate_payout(HandResult::BlackjackWin, 100, false), 250);
        assert_eq!(calculate_payout(HandResult::BlackjackWin, 100, true), 200);
        assert_eq!(calculate_payout(HandResult::BlackjackWin, 15, false), 37);
        assert_eq!(calculate_payout(HandResult::Win, 100, false), 200);
        assert_eq!(calculate_payout(HandResult::Loss, 100, false), 0);
        assert_eq!(calculate_payout(HandResult::Push, 100, false), 100);
    }

    #[test]
    fn split_eligibility_uses_low_values() {
        assert!(can_split(&hand(&[Rank::King, Rank::Ten])));
        assert!(can_split(&hand(&[Rank::Ace, Rank::Ace])));
        assert!(!can_split(&hand(&[Rank::Eight, Rank::Nine])));
        let mut glitch_pair = hand(&[Rank::Ace]);
        glitch_pair.cards.push(Card::glitch(7));
        assert!(can_split(&glitch_pair));
    }
}
