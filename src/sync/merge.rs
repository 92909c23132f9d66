use crate::models::{CatalogRecord, ListingRecord, MergedRow};
use std::collections::{HashMap, HashSet};
use tracing::{debug, instrument, warn};

/// Join listings with the inventory catalog on `offer_id == product_code`.
///
/// Produces exactly one row per listing, in input order. A listing without a
/// catalog entry keeps its prices and gets empty metadata. Repeated offer ids
/// within a cabinet are kept as separate rows.
#[instrument(name = "Merging listings", skip_all, fields(listings = listings.len()))]
pub fn merge_listings(
    listings: &[ListingRecord],
    catalog: &HashMap<String, CatalogRecord>,
) -> Vec<MergedRow> {
    let mut seen = HashSet::new();
    let mut unmatched = 0;

    let rows = listings
        .iter()
        .map(|listing| {
            if !seen.insert((listing.cabinet_label.as_str(), listing.offer_id.as_str())) {
                warn!(
                    cabinet = %listing.cabinet_label,
                    offer_id = %listing.offer_id,
                    "Duplicate offer_id in cabinet, keeping both rows"
                );
            }

            let entry = catalog.get(&listing.offer_id);
            if entry.is_none() {
                unmatched += 1;
            }
            merge_one(listing, entry)
        })
        .collect();

    debug!(unmatched, "Listings without catalog entry");

    rows
}

fn merge_one(listing: &ListingRecord, entry: Option<&CatalogRecord>) -> MergedRow {
    let (category, product_type, product_name, purchase_price) = match entry {
        Some(entry) => (
            entry.category_bottom_level.clone(),
            entry.product_type.clone(),
            entry.product_name.clone(),
            entry.purchase_price,
        ),
        None => (String::new(), String::new(), String::new(), None),
    };

    MergedRow {
        cabinet: listing.cabinet_label.clone(),
        category,
        product_type,
        product_name,
        offer_id: listing.offer_id.clone(),
        purchase_price,
        price_before_discount: listing.price_before_discount,
        min_price: listing.min_price,
        seller_price: listing.seller_marketing_price,
        customer_price: listing.customer_price,
    }
}
