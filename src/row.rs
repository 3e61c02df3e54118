// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Assemble the fixed 21-column report row for one asset
// role: core/row-assembly
// inputs: Asset, optional PriceCatalog for its marketplace, injected "now"
// outputs: Row ([String; 21]) in HEADERS order
// invariants:
// - column order matches HEADERS exactly; money fields carry two decimals
// - createdAt renders as %Y-%m-%d %H:%M:%S UTC; renewalDate at day granularity
// - absent party references render "-"; absent optional parameters render empty
// errors: Date parsing/derivation failures propagate with the asset id attached
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};

use crate::classify;
use crate::dates;
use crate::model::{Asset, NamedRef, PriceCatalog};
use crate::params;
use crate::util::parse_rfc3339_utc;

pub const HEADERS: [&str; 21] = [
  "assetId",
  "productId",
  "providerId",
  "providerName",
  "marketplaceId",
  "marketplaceName",
  "resellerId",
  "resellerName",
  "createdAt",
  "customerId",
  "customerName",
  "seamlessMove",
  "discountGroup",
  "action",
  "renewalDate",
  "type",
  "currency",
  "cost",
  "msrp",
  "resellerCost",
  "seats",
];

pub type Row = [String; 21];

pub fn header_row() -> Row {
  HEADERS.map(str::to_string)
}

fn id_of(party: Option<&NamedRef>) -> String {
  party.and_then(|p| p.id.clone()).unwrap_or_else(|| "-".into())
}

fn name_of(party: Option<&NamedRef>) -> String {
  party.and_then(|p| p.name.clone()).unwrap_or_else(|| "-".into())
}

fn money(value: Decimal) -> String {
  // Half-even, matching how the report has always rendered its totals.
  format!("{:.2}", value.round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven))
}

/// Build the report row for one asset against its marketplace catalog.
pub fn build_row(asset: &Asset, catalog: Option<&PriceCatalog>, now: DateTime<Utc>) -> Result<Row> {
  let extracted = params::extract(&asset.params);

  let renewal = dates::renewal_date(
    extracted.action.as_deref(),
    extracted.renewal_date.as_deref(),
    &asset.events.created.at,
    now,
  )
  .with_context(|| format!("computing renewal date for asset {}", asset.id))?;

  let financials = classify::classify(&asset.items, catalog, &asset.product.id);

  let created_at = parse_rfc3339_utc(&asset.events.created.at)
    .with_context(|| format!("asset {} creation date", asset.id))?
    .format("%Y-%m-%d %H:%M:%S")
    .to_string();

  Ok([
    asset.id.clone(),
    asset.product.id.clone(),
    id_of(asset.connection.provider.as_ref()),
    name_of(asset.connection.provider.as_ref()),
    asset.marketplace.id.clone(),
    asset.marketplace.name.clone().unwrap_or_else(|| "-".into()),
    id_of(asset.tiers.tier1.as_ref()),
    name_of(asset.tiers.tier1.as_ref()),
    created_at,
    id_of(asset.tiers.customer.as_ref()),
    name_of(asset.tiers.customer.as_ref()),
    extracted.seamless_move.unwrap_or_default(),
    extracted.discount.unwrap_or_default(),
    extracted.action.unwrap_or_default(),
    renewal.format("%Y-%m-%d").to_string(),
    financials.asset_type,
    financials.currency,
    money(financials.cost),
    money(financials.msrp),
    money(financials.reseller_cost),
    financials.seats.to_string(),
  ])
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::CatalogEntry;
  use chrono::TimeZone;
  use std::collections::HashMap;

  fn sample_asset() -> Asset {
    serde_json::from_value(serde_json::json!({
      "id": "AS-0001-0001",
      "product": { "id": "PRD-001" },
      "connection": {
        "type": "production",
        "provider": { "id": "PA-1", "name": "Provider One" }
      },
      "marketplace": { "id": "MP-1", "name": "EMEA" },
      "tiers": {
        "tier1": { "id": "TA-100", "name": "Reseller GmbH" },
        "customer": { "id": "TA-200", "name": "Acme Corp" }
      },
      "events": { "created": { "at": "2023-01-15T10:23:44+00:00" } },
      "params": [
        { "id": "seamless_move", "value": "yes" },
        { "id": "discount_group", "value": "02A12" },
        { "id": "action_type", "value": "purchase" }
      ],
      "items": [
        { "display_name": "Team Seat", "quantity": "3", "global_id": "PRD-001-0001" }
      ]
    }))
    .unwrap()
  }

  fn sample_catalog() -> PriceCatalog {
    let mut by_point = HashMap::new();
    by_point.insert(
      "PRD-001-0001".to_string(),
      CatalogEntry {
        cost: Decimal::new(105, 1),  // 10.5
        reseller_cost: Decimal::new(8, 0),
        msrp: Decimal::new(155, 1), // 15.5
      },
    );
    let mut points = HashMap::new();
    points.insert("PRD-001".to_string(), by_point);
    PriceCatalog { currency: "EUR".into(), points }
  }

  #[test]
  fn assembles_all_columns_in_header_order() {
    let now = Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap();
    let catalog = sample_catalog();
    let row = build_row(&sample_asset(), Some(&catalog), now).unwrap();

    assert_eq!(row.len(), HEADERS.len());
    assert_eq!(row[0], "AS-0001-0001");
    assert_eq!(row[1], "PRD-001");
    assert_eq!(row[2], "PA-1");
    assert_eq!(row[3], "Provider One");
    assert_eq!(row[4], "MP-1");
    assert_eq!(row[5], "EMEA");
    assert_eq!(row[6], "TA-100");
    assert_eq!(row[7], "Reseller GmbH");
    assert_eq!(row[8], "2023-01-15 10:23:44");
    assert_eq!(row[9], "TA-200");
    assert_eq!(row[10], "Acme Corp");
    assert_eq!(row[11], "yes");
    assert_eq!(row[12], "Level 2");
    assert_eq!(row[13], "purchase");
    assert_eq!(row[14], "2024-01-15"); // created + 365d, day granularity
    assert_eq!(row[15], "team");
    assert_eq!(row[16], "EUR");
    assert_eq!(row[17], "31.50"); // 3 x 10.5
    assert_eq!(row[18], "46.50"); // 3 x 15.5
    assert_eq!(row[19], "24.00"); // 3 x 8
    assert_eq!(row[20], "3");
  }

  #[test]
  fn missing_parties_render_dashes_and_missing_params_render_empty() {
    let now = Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap();
    let mut asset = sample_asset();
    asset.connection.provider = None;
    asset.tiers.tier1 = None;
    asset.params.retain(|p| p.id == "action_type");

    let row = build_row(&asset, None, now).unwrap();
    assert_eq!(row[2], "-");
    assert_eq!(row[3], "-");
    assert_eq!(row[6], "-");
    assert_eq!(row[7], "-");
    assert_eq!(row[11], "");
    assert_eq!(row[12], "");
    assert_eq!(row[15], "-");
    assert_eq!(row[16], "-");
    assert_eq!(row[17], "0.00");
    assert_eq!(row[20], "0");
  }

  #[test]
  fn transfer_without_renewal_parameter_names_the_asset() {
    let now = Utc.with_ymd_and_hms(2023, 6, 1, 0, 0, 0).unwrap();
    let mut asset = sample_asset();
    for p in &mut asset.params {
      if p.id == "action_type" {
        p.value = "transfer".into();
      }
    }

    let err = build_row(&asset, None, now).unwrap_err();
    assert!(format!("{:#}", err).contains("AS-0001-0001"));
  }

  #[test]
  fn money_pads_and_rounds_half_even() {
    assert_eq!(money(Decimal::new(12345, 1)), "1234.50");
    assert_eq!(money(Decimal::ZERO), "0.00");
    assert_eq!(money(Decimal::new(999, 3)), "1.00"); // 0.999 rounds up
    assert_eq!(money(Decimal::new(125, 3)), "0.12"); // 0.125 rounds to even
    assert_eq!(money(Decimal::new(135, 3)), "0.14"); // 0.135 rounds to even
  }
}
