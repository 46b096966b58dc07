use hackjack_core::{
    calculate_payout, can_split, hand_value, is_blackjack, is_soft, resolve_hand, Card, Hand,
    HandResult, Rank, Suit,
};
use proptest::prelude::*;
use Rank::*;

fn hand_of(ranks: &[Rank], glitches: u32) -> Hand {
    let mut cards: Vec<Card> = ranks
        .iter()
        .map(|rank| Card::standard(Suit::Hearts, *rank))
        .collect();
    cards.extend((0..glitches).map(|id| Card::glitch(100 + id)));
    Hand::new(cards)
}

macro_rules! value_case {
    ($name:ident, [$($rank:expr),*], $glitches:expr, $expected:expr) => {
        #[test]
        fn $name() {
            assert_eq!(hand_value(&hand_of(&[$($rank),*], $glitches)), $expected);
        }
    };
}

value_case!(value_empty, [], 0, 0);
value_case!(value_two_tens, [Ten, King], 0, 20);
value_case!(value_natural, [Ace, King], 0, 21);
value_case!(value_pair_of_aces, [Ace, Ace], 0, 12);
value_case!(value_aces_and_nine, [Ace, Ace, Nine], 0, 21);
value_case!(value_three_aces_eight, [Ace, Ace, Ace, Eight], 0, 21);
value_case!(value_soft_seventeen, [Ace, Six], 0, 17);
value_case!(value_hard_seventeen, [Ace, Six, Ten], 0, 17);
value_case!(value_bust_reports_minimum, [Ten, Six, King], 0, 26);
value_case!(value_lone_glitch, [], 1, 11);
value_case!(value_glitch_ten, [Ten], 1, 21);
value_case!(value_glitch_fills_gap, [Ten, Five], 1, 21);
value_case!(value_glitch_counts_low, [King, Queen], 1, 21);
value_case!(value_glitch_bust, [King, Queen, Five], 1, 26);
value_case!(value_two_glitches, [], 2, 21);
value_case!(value_glitch_and_ace, [Ace, Nine], 1, 21);

macro_rules! result_case {
    ($name:ident, [$($p:expr),*], [$($d:expr),*], $on_22:expr, $expected:expr) => {
        #[test]
        fn $name() {
            let player = hand_of(&[$($p),*], 0);
            let dealer = hand_of(&[$($d),*], 0);
            assert_eq!(resolve_hand(&player, &dealer, $on_22), $expected);
        }
    };
}

result_case!(result_higher_wins, [Ten, King], [Ten, Nine], false, HandResult::Win);
result_case!(result_lower_loses, [Ten, Nine], [Ten, King], false, HandResult::Loss);
result_case!(result_tie_pushes, [Ten, Eight], [Nine, Nine], false, HandResult::Push);
result_case!(
    result_natural_beats_three_card_21,
    [Ace, King],
    [Seven, Seven, Seven],
    false,
    HandResult::BlackjackWin
);
result_case!(
    result_three_card_21_loses_to_natural,
    [Seven, Seven, Seven],
    [Ace, Queen],
    false,
    HandResult::Loss
);
result_case!(
    result_naturals_push,
    [Ace, King],
    [Ace, Jack],
    false,
    HandResult::Push
);
result_case!(
    result_winning_21_pays_bonus,
    [Five, Six, Ten],
    [Ten, Nine],
    false,
    HandResult::BlackjackWin
);
result_case!(
    result_player_bust_loses_first,
    [Ten, Six, Nine],
    [Ten, Six, Eight],
    false,
    HandResult::Loss
);
result_case!(
    result_dealer_bust_pays,
    [Ten, Eight],
    [Ten, Six, Six],
    false,
    HandResult::Win
);
result_case!(
    result_dealer_22_wins_under_rule,
    [Ten, Eight],
    [Ten, Six, Six],
    true,
    HandResult::Loss
);
result_case!(
    result_dealer_23_still_busts_under_rule,
    [Ten, Eight],
    [Ten, Six, Seven],
    true,
    HandResult::Win
);

macro_rules! payout_case {
    ($name:ident, $result:expr, $bet:expr, $one_to_one:expr, $expected:expr) => {
        #[test]
        fn $name() {
            assert_eq!(calculate_payout($result, $bet, $one_to_one), $expected);
        }
    };
}

payout_case!(payout_win, HandResult::Win, 10, false, 20);
payout_case!(payout_push, HandResult::Push, 10, false, 10);
payout_case!(payout_loss, HandResult::Loss, 10, false, 0);
payout_case!(payout_blackjack, HandResult::BlackjackWin, 10, false, 25);
payout_case!(payout_blackjack_floors, HandResult::BlackjackWin, 15, false, 37);
payout_case!(payout_blackjack_one_to_one, HandResult::BlackjackWin, 10, true, 20);
payout_case!(payout_win_ignores_one_to_one, HandResult::Win, 10, true, 20);

macro_rules! split_case {
    ($name:ident, $hand:expr, $expected:expr) => {
        #[test]
        fn $name() {
            assert_eq!(can_split(&$hand), $expected);
        }
    };
}

split_case!(split_pair, hand_of(&[Eight, Eight], 0), true);
split_case!(split_mixed_tens, hand_of(&[King, Ten], 0), true);
split_case!(split_aces, hand_of(&[Ace, Ace], 0), true);
split_case!(split_unpaired, hand_of(&[Eight, Nine], 0), false);
split_case!(split_three_cards, hand_of(&[Four, Four, Four], 0), false);
split_case!(
    split_already_split,
    Hand::split_from(hand_of(&[Eight, Eight], 0).cards, false),
    false
);

#[test]
fn soft_and_natural_flags() {
    assert!(is_soft(&hand_of(&[Ace, Six], 0)));
    assert!(!is_soft(&hand_of(&[Ace, Six, Ten], 0)));
    assert!(is_soft(&hand_of(&[Five], 1)));
    assert!(is_blackjack(&hand_of(&[Ace, Queen], 0)));
    assert!(!is_blackjack(&hand_of(&[Seven, Seven, Seven], 0)));
}

fn brute_force_value(cards: &[Card]) -> u32 {
    let mut reachable = vec![0u32];
    for card in cards {
        let options: Vec<u32> = if card.is_glitch {
            (1..=11).collect()
        } else if card.is_ace() {
            vec![1, 11]
        } else {
            vec![card.rank.low_value()]
        };
        reachable = reachable
            .iter()
            .flat_map(|sum| options.iter().map(move |value| sum + value))
            .collect();
        reachable.sort_unstable();
        reachable.dedup();
    }
    reachable
        .iter()
        .copied()
        .filter(|sum| *sum <= 21)
        .max()
        .unwrap_or_else(|| reachable.iter().copied().min().unwrap_or(0))
}

fn card_strategy() -> impl Strategy<Value = Card> {
    (0usize..13, prop::bool::weighted(0.15)).prop_map(|(rank, glitch)| {
        if glitch {
            Card::glitch(1)
        } else {
            Card::standard(Suit::Spades, Rank::ALL[rank])
        }
    })
}

proptest! {
    #[test]
    fn hand_value_matches_brute_force(cards in prop::collection::vec(card_strategy(), 0..7)) {
        let hand = Hand::new(cards.clone());
        prop_assert_eq!(hand_value(&hand), brute_force_value(&cards));
    }

    #[test]
    fn adding_a_card_never_lowers_the_minimum(
        cards in prop::collection::vec(card_strategy(), 1..7),
    ) {
        let full = hand_value(&Hand::new(cards.clone()));
        let fewer = hand_value(&Hand::new(cards[..cards.len() - 1].to_vec()));
        if fewer > 21 {
            prop_assert!(full > 21);
        }
    }
}
