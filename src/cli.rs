use anyhow::{Result, bail};
use chrono::{DateTime, Utc};
use clap::Parser;

use crate::report::{ProductSelection, RendererType, ReportParameters};
use crate::util;

#[derive(Parser, Debug)]
#[command(
    name = "active-assets-report",
    version,
    about = "Export active assets with pricing, seats, and renewal dates (CSV or JSON)",
    long_about = None
)]
pub struct Cli {
  /// Base URL of the platform's public API
  #[arg(long, default_value = "https://api.example.com/public/v1")]
  pub base_url: String,

  /// API key; falls back to the AAR_API_KEY environment variable
  #[arg(long)]
  pub token: Option<String>,

  /// Restrict the report to a product id (repeatable)
  #[arg(long = "product")]
  pub products: Vec<String>,

  /// Report on every product (the default when no --product is given)
  #[arg(long)]
  pub all_products: bool,

  /// Output format
  #[arg(long, value_enum, default_value_t = RendererType::Csv)]
  pub format: RendererType,

  /// Output file path (default stdout "-")
  #[arg(long, default_value = "-")]
  pub out: String,

  /// Print row progress to stderr
  #[arg(long)]
  pub verbose: bool,

  /// Emit a troff man page to stdout (internal; for packaging)
  #[arg(long, hide = true)]
  pub gen_man: bool,

  /// Override the "now" instant for renewal-date math (hidden; tests only)
  #[arg(long = "now-override", hide = true)]
  pub now_override: Option<String>,
}

#[derive(Debug)]
pub struct EffectiveConfig {
  pub base_url: String,
  pub token: Option<String>,
  pub parameters: ReportParameters,
  pub format: RendererType,
  pub out: String,
  pub verbose: bool,
  pub now: DateTime<Utc>,
}

pub fn normalize(cli: Cli) -> Result<EffectiveConfig> {
  // Validate product selection
  if cli.all_products && !cli.products.is_empty() {
    bail!("Ambiguous product selection: choose only one of --all-products | --product");
  }

  let product = ProductSelection {
    all: cli.products.is_empty(),
    choices: cli.products,
  };

  let token = cli
    .token
    .or_else(|| std::env::var("AAR_API_KEY").ok().filter(|t| !t.trim().is_empty()));

  let now = match cli.now_override.as_deref() {
    Some(s) => util::parse_rfc3339_utc(s)?,
    None => Utc::now(),
  };

  Ok(EffectiveConfig {
    base_url: cli.base_url,
    token,
    parameters: ReportParameters { product },
    format: cli.format,
    out: cli.out,
    verbose: cli.verbose,
    now,
  })
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::Datelike;
  use serial_test::serial;

  fn base_cli() -> Cli {
    Cli {
      base_url: "https://api.example.com/public/v1".into(),
      token: None,
      products: Vec::new(),
      all_products: false,
      format: RendererType::Csv,
      out: "-".into(),
      verbose: false,
      gen_man: false,
      now_override: None,
    }
  }

  #[test]
  fn no_products_means_all() {
    let cfg = normalize(base_cli()).unwrap();
    assert!(cfg.parameters.product.all);
    assert!(cfg.parameters.product.choices.is_empty());
  }

  #[test]
  fn product_list_disables_all() {
    let mut cli = base_cli();
    cli.products = vec!["PRD-1".into()];
    let cfg = normalize(cli).unwrap();
    assert!(!cfg.parameters.product.all);
    assert_eq!(cfg.parameters.product.choices, vec!["PRD-1".to_string()]);
  }

  #[test]
  fn all_products_with_explicit_products_is_ambiguous() {
    let mut cli = base_cli();
    cli.all_products = true;
    cli.products = vec!["PRD-1".into()];
    assert!(normalize(cli).is_err());
  }

  #[test]
  fn now_override_is_parsed_as_utc() {
    let mut cli = base_cli();
    cli.now_override = Some("2023-06-01T00:00:00+00:00".into());
    let cfg = normalize(cli).unwrap();
    assert_eq!(cfg.now.year(), 2023);

    let mut bad = base_cli();
    bad.now_override = Some("yesterday".into());
    assert!(normalize(bad).is_err());
  }

  #[test]
  #[serial]
  fn token_falls_back_to_env() {
    std::env::set_var("AAR_API_KEY", "from-env");
    let cfg = normalize(base_cli()).unwrap();
    assert_eq!(cfg.token.as_deref(), Some("from-env"));

    let mut cli = base_cli();
    cli.token = Some("explicit".into());
    let cfg = normalize(cli).unwrap();
    assert_eq!(cfg.token.as_deref(), Some("explicit"));

    std::env::set_var("AAR_API_KEY", "   ");
    let cfg = normalize(base_cli()).unwrap();
    assert_eq!(cfg.token, None);

    std::env::remove_var("AAR_API_KEY");
  }
}
