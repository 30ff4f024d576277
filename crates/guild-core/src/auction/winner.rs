//! Winner selection: highest amount per bidder, earliest submission breaks ties

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::entities::LootTabBid;

/// Submission order: creation time, then id (ids are time-ordered)
fn earlier(a: &LootTabBid, b: &LootTabBid) -> Ordering {
    a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id))
}

/// Rank two bids: higher amount first, then earlier submission
fn outranks(a: &LootTabBid, b: &LootTabBid) -> bool {
    match a.amount.cmp(&b.amount) {
        Ordering::Greater => true,
        Ordering::Less => false,
        Ordering::Equal => earlier(a, b) == Ordering::Less,
    }
}

/// Best bid of each distinct bidder, strongest first
///
/// Storage order is never trusted; the result is fully determined by amount
/// and submission order.
pub fn leading_bids(bids: &[LootTabBid]) -> Vec<&LootTabBid> {
    let mut best: HashMap<_, &LootTabBid> = HashMap::new();
    for bid in bids {
        best.entry(bid.user_id)
            .and_modify(|current| {
                if outranks(bid, current) {
                    *current = bid;
                }
            })
            .or_insert(bid);
    }

    let mut leaders: Vec<_> = best.into_values().collect();
    leaders.sort_by(|a, b| b.amount.cmp(&a.amount).then_with(|| earlier(a, b)));
    leaders
}

/// The winning bid, or `None` when the sale has no bids
pub fn select_winner(bids: &[LootTabBid]) -> Option<&LootTabBid> {
    leading_bids(bids).into_iter().next()
}
