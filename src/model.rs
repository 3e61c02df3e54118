// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Define the typed wire models for platform payloads (assets, listings, price points) and the derived catalog
// role: model/types
// inputs: JSON collections returned by the commerce API backends
// outputs: Deserializable structs with stable field names; PriceCatalog lookup table
// invariants: Required keys absent on the wire fail deserialization (fatal); quantity/price accept number-or-string
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer};
use std::collections::HashMap;

/// A party reference whose id/name may be absent on older records.
/// Missing halves render as "-" in the report.
#[derive(Debug, Clone, Deserialize)]
pub struct NamedRef {
  pub id: Option<String>,
  pub name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductRef {
  pub id: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Marketplace {
  pub id: String,
  pub name: Option<String>,
}

/// Only the provider matters to the report; the connection type is a query
/// predicate handled server-side.
#[derive(Debug, Clone, Deserialize)]
pub struct Connection {
  pub provider: Option<NamedRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Tiers {
  pub tier1: Option<NamedRef>,
  pub customer: Option<NamedRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EventStamp {
  pub at: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Events {
  pub created: EventStamp,
}

/// Ordered id/value parameter attached to an asset. Values are free-form
/// strings; an empty string is meaningful (see the discount mapping).
#[derive(Debug, Clone, Deserialize)]
pub struct AssetParam {
  pub id: String,
  #[serde(default)]
  pub value: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LineItem {
  pub display_name: String,
  #[serde(deserialize_with = "de_int_lenient")]
  pub quantity: i64,
  pub global_id: String,
}

/// One active subscription record as returned by the asset collection.
#[derive(Debug, Clone, Deserialize)]
pub struct Asset {
  pub id: String,
  pub product: ProductRef,
  pub connection: Connection,
  pub marketplace: Marketplace,
  pub tiers: Tiers,
  pub events: Events,
  #[serde(default)]
  pub params: Vec<AssetParam>,
  #[serde(default)]
  pub items: Vec<LineItem>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PricelistRef {
  pub id: String,
  pub status: String,
}

/// A product's placement on a marketplace; carries the pricelist handle.
#[derive(Debug, Clone, Deserialize)]
pub struct Listing {
  pub pricelist: Option<PricelistRef>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct VersionPricelist {
  pub currency: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PriceListVersion {
  pub id: String,
  pub pricelist: VersionPricelist,
}

/// The platform serializes money attributes as strings ("12.34") but older
/// versions emit bare numbers; Decimal's deserializer accepts both.
#[derive(Debug, Clone, Deserialize)]
pub struct PriceAttributes {
  pub price: Decimal,
  pub st0p: Option<Decimal>,
  pub st1p: Option<Decimal>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PricePoint {
  pub id: String,
  pub attributes: PriceAttributes,
}

/// Unit prices retained for one price point.
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
  pub cost: Decimal,
  pub reseller_cost: Decimal,
  pub msrp: Decimal,
}

/// In-memory price lookup for one marketplace, built once per run.
/// Indexed product-id first, then price-point global id. Points with a zero
/// list price are excluded by construction.
#[derive(Debug, Clone)]
pub struct PriceCatalog {
  pub currency: String,
  pub points: HashMap<String, HashMap<String, CatalogEntry>>,
}

impl PriceCatalog {
  pub fn lookup(&self, product_id: &str, global_id: &str) -> Option<&CatalogEntry> {
    self.points.get(product_id).and_then(|by_point| by_point.get(global_id))
  }
}

fn de_int_lenient<'de, D>(de: D) -> Result<i64, D::Error>
where
  D: Deserializer<'de>,
{
  let v = serde_json::Value::deserialize(de)?;

  match &v {
    serde_json::Value::Number(n) => n
      .as_i64()
      .ok_or_else(|| serde::de::Error::custom(format!("quantity {} is not an integer", n))),
    serde_json::Value::String(s) => s
      .trim()
      .parse::<i64>()
      .map_err(|e| serde::de::Error::custom(format!("quantity {:?}: {}", s, e))),
    other => Err(serde::de::Error::custom(format!(
      "quantity must be a number or numeric string, got {}",
      other
    ))),
  }
}
