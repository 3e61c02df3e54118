// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Derive asset type, currency, money totals, and seat count from line items and the marketplace catalog
// role: core/classification
// inputs: ordered line items, optional PriceCatalog, product id
// outputs: Financials (type, currency, cost, reseller cost, msrp, seats)
// invariants:
// - absent catalog yields exactly ("-", "-", 0, 0, 0, 0)
// - type progression is order-dependent: a non-Enterprise item after "enterprise" rewrites it to "team"
// - quantities <= 0 contribute to neither seats nor money totals
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use rust_decimal::Decimal;

use crate::model::{LineItem, PriceCatalog};

#[derive(Debug, Clone, PartialEq)]
pub struct Financials {
  pub asset_type: String,
  pub currency: String,
  pub cost: Decimal,
  pub reseller_cost: Decimal,
  pub msrp: Decimal,
  pub seats: i64,
}

impl Financials {
  fn unpriced() -> Self {
    Self {
      asset_type: "-".into(),
      currency: "-".into(),
      cost: Decimal::ZERO,
      reseller_cost: Decimal::ZERO,
      msrp: Decimal::ZERO,
      seats: 0,
    }
  }
}

/// Classify an asset's line items and total its seats and money figures.
///
/// The type progression is deliberately non-commutative: "Enterprise" in a
/// display name promotes "-" to "enterprise" and "team" to "both", while
/// every other case (including an Enterprise item once the type is already
/// "enterprise" or "both") lands on "team". Reordering line items changes
/// the result, which mirrors how the report has always behaved.
pub fn classify(items: &[LineItem], catalog: Option<&PriceCatalog>, product_id: &str) -> Financials {
  let catalog = match catalog {
    Some(c) => c,
    None => return Financials::unpriced(),
  };

  let mut out = Financials::unpriced();
  out.currency = catalog.currency.clone();

  for item in items {
    let enterprise = item.display_name.contains("Enterprise");

    if enterprise && out.asset_type == "-" {
      out.asset_type = "enterprise".into();
    } else if enterprise && out.asset_type == "team" {
      out.asset_type = "both".into();
    } else {
      out.asset_type = "team".into();
    }

    if item.quantity > 0 {
      out.seats += item.quantity;

      if let Some(entry) = catalog.lookup(product_id, &item.global_id) {
        let qty = Decimal::from(item.quantity);
        out.cost += qty * entry.cost;
        out.msrp += qty * entry.msrp;
        out.reseller_cost += qty * entry.reseller_cost;
      }
    }
  }

  out
}
