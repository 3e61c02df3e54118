use assert_cmd::Command;

pub const NOW: &str = "2023-06-01T00:00:00+00:00";

#[allow(dead_code)]
pub fn bin() -> Command {
  Command::cargo_bin("active-assets-report").unwrap()
}

/// Asset fixtures: two priced assets on MP-1, one on a product without
/// price points, one on an unlisted marketplace, and one terminated asset
/// the status filter must drop.
pub fn assets_json() -> String {
  serde_json::json!([
    {
      "id": "AS-1", "status": "active",
      "product": { "id": "PRD-001" },
      "connection": { "type": "production", "provider": { "id": "PA-1", "name": "Provider One" } },
      "marketplace": { "id": "MP-1", "name": "EMEA" },
      "tiers": {
        "tier1": { "id": "TA-100", "name": "Reseller GmbH" },
        "customer": { "id": "TA-200", "name": "Acme Corp" }
      },
      "events": { "created": { "at": "2023-01-15T10:23:44+00:00" } },
      "params": [
        { "id": "seamless_move", "value": "no" },
        { "id": "discount_group", "value": "02A12" },
        { "id": "action_type", "value": "purchase" }
      ],
      "items": [
        { "display_name": "Team Seat", "quantity": "3", "global_id": "PRD-001-0001" },
        { "display_name": "Enterprise Pack", "quantity": 2, "global_id": "PRD-001-0002" }
      ]
    },
    {
      "id": "AS-2", "status": "active",
      "product": { "id": "PRD-001" },
      "connection": { "type": "production", "provider": { "id": "PA-1", "name": "Provider One" } },
      "marketplace": { "id": "MP-1", "name": "EMEA" },
      "tiers": { "customer": { "id": "TA-300", "name": "Globex" } },
      "events": { "created": { "at": "2022-11-20T08:00:00+00:00" } },
      "params": [
        { "id": "action_type", "value": "transfer" },
        { "id": "renewal_date", "value": "01/02/2023" }
      ],
      "items": [
        { "display_name": "Enterprise Suite", "quantity": 1, "global_id": "PRD-001-0002" }
      ]
    },
    {
      "id": "AS-3", "status": "terminated",
      "product": { "id": "PRD-001" },
      "connection": { "type": "production" },
      "marketplace": { "id": "MP-1", "name": "EMEA" },
      "tiers": {},
      "events": { "created": { "at": "2022-01-01T00:00:00+00:00" } },
      "params": [{ "id": "action_type", "value": "purchase" }],
      "items": []
    },
    {
      "id": "AS-4", "status": "active",
      "product": { "id": "PRD-999" },
      "connection": { "type": "production" },
      "marketplace": { "id": "MP-1", "name": "EMEA" },
      "tiers": {},
      "events": { "created": { "at": "2023-03-01T00:00:00+00:00" } },
      "params": [{ "id": "action_type", "value": "purchase" }],
      "items": []
    },
    {
      "id": "AS-5", "status": "active",
      "product": { "id": "PRD-001" },
      "connection": { "type": "production" },
      "marketplace": { "id": "MP-2", "name": "APAC" },
      "tiers": {},
      "events": { "created": { "at": "2023-04-10T09:30:00+00:00" } },
      "params": [{ "id": "action_type", "value": "purchase" }],
      "items": []
    }
  ])
  .to_string()
}

pub fn listings_json() -> String {
  serde_json::json!([
    {
      "marketplace": { "id": "MP-1" },
      "product": { "id": "PRD-001" },
      "status": "listed",
      "pricelist": { "id": "PL-1", "status": "active" }
    }
  ])
  .to_string()
}

pub fn versions_json() -> String {
  serde_json::json!([
    {
      "id": "PLV-1",
      "status": "active",
      "pricelist": { "id": "PL-1", "currency": "EUR" }
    }
  ])
  .to_string()
}

pub fn points_json() -> String {
  serde_json::json!({
    "PLV-1": [
      { "id": "PRD-001-0001", "attributes": { "price": "10.50", "st0p": "8.00", "st1p": "15.00" } },
      { "id": "PRD-001-0002", "attributes": { "price": "100.00", "st1p": "120.00" } },
      { "id": "PRD-001-9999", "attributes": { "price": "0", "st1p": "1.00" } }
    ]
  })
  .to_string()
}

/// A command wired to the env-backed API with the standard fixture set and a
/// pinned "now".
pub fn fixture_cmd() -> Command {
  let mut cmd = bin();
  cmd
    .env("AAR_TEST_ASSETS_JSON", assets_json())
    .env("AAR_TEST_LISTINGS_JSON", listings_json())
    .env("AAR_TEST_VERSIONS_JSON", versions_json())
    .env("AAR_TEST_POINTS_JSON", points_json())
    .args(["--now-override", NOW]);
  cmd
}
