// fastcart/core/src/normalize.rs

//! Collapses duplicate product references of one order request.

use crate::model::{ProductId, RequestedItem};
use std::collections::HashMap;

/// Merges entries that reference the same product into a single line.
///
/// Quantities of duplicates are summed in `i64`, so the merged total is exact
/// for any request whose lines fit an `i32`. Output order is the order in
/// which each product id was first seen. Already-normalized input comes back
/// unchanged.
pub fn normalize_items(items: Vec<RequestedItem>) -> Vec<RequestedItem> {
  let mut position_of: HashMap<ProductId, usize> = HashMap::with_capacity(items.len());
  let mut normalized: Vec<RequestedItem> = Vec::with_capacity(items.len());

  for item in items {
    match position_of.get(&item.product_id) {
      Some(&idx) => {
        let existing = &mut normalized[idx];
        existing.quantity = existing.quantity.saturating_add(item.quantity);
      }
      None => {
        position_of.insert(item.product_id, normalized.len());
        normalized.push(item);
      }
    }
  }

  normalized
}

#[cfg(test)]
mod tests {
  use super::*;

  fn item(product_id: ProductId, quantity: i64) -> RequestedItem {
    RequestedItem::new(product_id, quantity)
  }

  #[test]
  fn duplicates_are_summed_in_first_seen_order() {
    let out = normalize_items(vec![item(7, 3), item(2, 1), item(7, 4), item(2, 5), item(9, 1)]);
    assert_eq!(out, vec![item(7, 7), item(2, 6), item(9, 1)]);
  }

  #[test]
  fn empty_input_stays_empty() {
    assert!(normalize_items(Vec::new()).is_empty());
  }

  #[test]
  fn quantities_past_i32_keep_their_true_sum() {
    let max = i64::from(i32::MAX);
    let out = normalize_items(vec![item(1, max), item(1, 10)]);
    assert_eq!(out, vec![item(1, max + 10)]);
  }
}
