use super::*;
use crate::{generate_shop_items, is_hack_maxed, removal_rng, reprice_hack_offers, ShopItem};
use tracing::debug;

impl GameStateMachine {
    pub fn buy_shop_item(&self, index: usize) -> Self {
        self.settle("buy_shop_item", self.try_buy_shop_item(index))
    }

    pub fn try_buy_shop_item(&self, index: usize) -> Result<Self, TransitionError> {
        self.expect_phase(Phase::Shop)?;
        let item = *self
            .run
            .shop
            .get(index)
            .ok_or(TransitionError::InvalidOfferIndex(index))?;
        let cost = item.cost();
        if self.run.chips < cost {
            return Err(TransitionError::NotEnoughChips {
                needed: cost,
                available: self.run.chips,
            });
        }
        match item {
            ShopItem::ShoeHack { id, .. } if is_hack_maxed(&self.run.owned_hacks, id) => {
                return Err(TransitionError::StackCapReached(id));
            }
            ShopItem::RemoveActionCard { .. } if self.run.owned_action_card_count() == 0 => {
                return Err(TransitionError::NoActionCardsToRemove);
            }
            _ => {}
        }

        let mut next = self.clone();
        next.run.chips -= cost;
        match item {
            ShopItem::ShoeHack { id, .. } => {
                *next.run.owned_hacks.entry(id).or_insert(0) += 1;
                next.rebuild_shoe();
                next.run.shop.remove(index);
                let mut offers = std::mem::take(&mut next.run.shop);
                reprice_hack_offers(&mut offers, &next.run, &next.balance);
                next.run.shop = offers;
            }
            ShopItem::ActionCard { id, .. } => {
                next.run.action_deck.push(id);
                next.run.shop.remove(index);
            }
            ShopItem::RerollShop { .. } => {
                next.run.shop = generate_shop_items(&next.run, &next.balance);
                next.run.shop_index += 1;
            }
            ShopItem::RemoveActionCard { .. } => {
                let mut rng = removal_rng(next.run.seed, next.run.shop_index, index);
                let owned = next.run.owned_action_card_count() as u32;
                let pick = rng.next_int(0, owned) as usize;
                let removed = next.run.remove_owned_action_card(pick);
                debug!(?removed, "action card removed");
                next.run.shop.remove(index);
            }
        }
        debug!(item = %item.label(), cost, chips = next.run.chips, "shop purchase");
        Ok(next)
    }
}
