//! Deterministic view merge.

use std::collections::HashMap;

use critter_core::{AccountId, Balance, Dna, KittyId, KittyView};

/// Fold the latest three field snapshots into an ordered view sequence.
///
/// Pure: the output depends only on the arguments, so re-running with
/// unchanged inputs yields byte-identical output no matter how the three
/// subscriptions interleaved their pushes. Per id, ascending:
///
/// - no DNA yet ⇒ the kitty is omitted (it has not fully arrived);
/// - `is_owned` compares the owner snapshot against the viewer's address;
/// - `price` is taken from the price snapshot verbatim — absent means "not
///   for sale" and is never coerced to zero.
///
/// This runs on every push from any subscription, so it stays allocation-
/// light: one pass over the id list, map lookups only.
pub fn merge_views(
    ids: &[KittyId],
    dnas: &HashMap<KittyId, Dna>,
    owners: &HashMap<KittyId, AccountId>,
    prices: &HashMap<KittyId, Balance>,
    viewer: &AccountId,
) -> Vec<KittyView> {
    let mut ordered: Vec<KittyId> = ids.to_vec();
    ordered.sort_unstable();
    ordered.dedup();

    ordered
        .into_iter()
        .filter_map(|id| {
            let dna = *dnas.get(&id)?;
            let owner = owners.get(&id).cloned().unwrap_or_default();
            let is_owned = &owner == viewer;
            Some(KittyView {
                id,
                dna,
                owner,
                is_owned,
                price: prices.get(&id).copied(),
            })
        })
        .collect()
}
