// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Compute an asset's renewal date under the purchase and transfer business rules
// role: core/date-math
// inputs: action value, raw renewal-date parameter, asset creation timestamp, injected "now" (UTC)
// outputs: timezone-aware UTC instant; callers format at day granularity
// invariants:
// - purchase bases on the creation instant; transfer bases on the renewal_date parameter
// - within 365 days of base the renewal is base+365d; afterwards the base's year becomes now.year+1
// - transfer without a renewal_date parameter is a required-field violation, not a default
// errors: Malformed date strings and invalid year substitutions (Feb 29) are fatal for the run
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveDateTime, Utc};
use once_cell::sync::Lazy;

use crate::util::parse_rfc3339_utc;

static SLASH_DATE: Lazy<regex::Regex> = Lazy::new(|| regex::Regex::new(r"^(.*)/(.*)/(.*)$").unwrap());

/// Compute the renewal date for one asset.
///
/// `action == Some("purchase")` means a net-new subscription whose dates are
/// set by the asset itself; anything else is a transfer carrying its renewal
/// date in the `renewal_date` parameter.
pub fn renewal_date(
  action: Option<&str>,
  renewal_param: Option<&str>,
  created_at: &str,
  now: DateTime<Utc>,
) -> Result<DateTime<Utc>> {
  let base = if action == Some("purchase") {
    parse_rfc3339_utc(created_at).context("parsing asset creation date")?
  } else {
    let raw = match renewal_param {
      Some(v) => v,
      None => bail!("transfer asset has no renewal_date parameter"),
    };
    parse_renewal_param(raw)?
  };

  roll_forward(base, now)
}

/// Apply the shared renewal rule: within 365 days of base the renewal is
/// base+365d; afterwards the base keeps its month/day but jumps to next
/// year relative to now. The substitution is exactly one year rewrite, not
/// repeated +365d.
fn roll_forward(base: DateTime<Utc>, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
  let first_anniversary = base + Duration::days(365);

  if now < first_anniversary {
    return Ok(first_anniversary);
  }

  let target_year = now.year() + 1;

  match base.with_year(target_year) {
    Some(renewed) => Ok(renewed),
    None => bail!(
      "renewal date {}-{:02} does not exist in {}",
      base.month(),
      base.day(),
      target_year
    ),
  }
}

/// Parse the transfer renewal-date parameter.
///
/// Accepts ISO `YYYY-MM-DD` (optionally with a time or offset) or a
/// slash-separated three-group form that is reordered day-last to day-first
/// before parsing. Date-only input normalizes to UTC midnight.
fn parse_renewal_param(raw: &str) -> Result<DateTime<Utc>> {
  let normalized = match SLASH_DATE.captures(raw) {
    Some(c) => format!("{}-{}-{}", &c[3], &c[2], &c[1]),
    None => raw.to_string(),
  };

  if let Ok(d) = NaiveDate::parse_from_str(&normalized, "%Y-%m-%d") {
    return Ok(DateTime::from_naive_utc_and_offset(d.and_hms_opt(0, 0, 0).unwrap(), Utc));
  }

  if let Ok(dt) = NaiveDateTime::parse_from_str(&normalized, "%Y-%m-%dT%H:%M:%S") {
    return Ok(DateTime::from_naive_utc_and_offset(dt, Utc));
  }

  if let Ok(dt) = DateTime::parse_from_rfc3339(&normalized) {
    return Ok(dt.with_timezone(&Utc));
  }

  bail!("unrecognized renewal_date parameter {:?}", raw)
}
