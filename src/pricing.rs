// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Build the per-marketplace price catalog from listings/versions/points; memoize one catalog per marketplace per run
// role: core/pricing
// inputs: CommerceApi backend, marketplace id, product id
// outputs: Option<PriceCatalog> (None when no listed listing with an active pricelist exists)
// invariants:
// - zero-price points are excluded by construction
// - st1p is required on every retained point; its absence is fatal
// - the cache memoizes the absent case and is owned by exactly one generation run
// errors: Remote failures and missing required attributes propagate with context
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{Context, Result};
use std::collections::HashMap;

use crate::api::{CommerceApi, Filter};
use crate::model::{CatalogEntry, PriceCatalog};

const POINT_PAGE: usize = 100;

/// Build the price lookup for one (marketplace, product) pair.
///
/// Returns `None` when the product has no "listed" listing on the
/// marketplace, the listing carries no pricelist, or the pricelist is not
/// active. Those assets still get a row, just an unpriced one.
pub fn build_catalog(api: &dyn CommerceApi, marketplace_id: &str, product_id: &str) -> Result<Option<PriceCatalog>> {
  let listing_filter = Filter::new()
    .eq("marketplace.id", marketplace_id)
    .eq("product.id", product_id)
    .eq("status", "listed");

  let listing = match api.find_listing(&listing_filter)? {
    Some(l) => l,
    None => return Ok(None),
  };

  let pricelist = match listing.pricelist {
    Some(p) => p,
    None => return Ok(None),
  };

  if pricelist.status != "active" {
    return Ok(None);
  }

  let version_filter = Filter::new().eq("pricelist.id", &pricelist.id).eq("status", "active");
  let version = api
    .find_pricelist_version(&version_filter)?
    .with_context(|| format!("pricelist {} has no active version", pricelist.id))?;

  let mut by_point: HashMap<String, CatalogEntry> = HashMap::new();
  let mut offset = 0;

  loop {
    let page = api.list_price_points(&version.id, POINT_PAGE, offset)?;
    let page_len = page.len();

    for point in page {
      // A zero list price marks the point as not applicable, not free.
      if point.attributes.price.is_zero() {
        continue;
      }

      let msrp = point
        .attributes
        .st1p
        .with_context(|| format!("price point {} has no st1p attribute", point.id))?;

      by_point.insert(
        point.id,
        CatalogEntry {
          cost: point.attributes.price,
          reseller_cost: point.attributes.st0p.unwrap_or_default(),
          msrp,
        },
      );
    }

    if page_len < POINT_PAGE {
      break;
    }
    offset += page_len;
  }

  let mut points = HashMap::new();
  points.insert(product_id.to_string(), by_point);

  Ok(Some(PriceCatalog {
    currency: version.pricelist.currency,
    points,
  }))
}

/// Per-run catalog memoization keyed by marketplace id. The absent case is
/// cached too, so a marketplace without pricing is probed exactly once.
#[derive(Default)]
pub struct CatalogCache {
  by_marketplace: HashMap<String, Option<PriceCatalog>>,
}

impl CatalogCache {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn resolve(
    &mut self,
    api: &dyn CommerceApi,
    marketplace_id: &str,
    product_id: &str,
  ) -> Result<Option<&PriceCatalog>> {
    if !self.by_marketplace.contains_key(marketplace_id) {
      let built = build_catalog(api, marketplace_id, product_id)?;
      self.by_marketplace.insert(marketplace_id.to_string(), built);
    }

    Ok(self.by_marketplace.get(marketplace_id).and_then(Option::as_ref))
  }
}
