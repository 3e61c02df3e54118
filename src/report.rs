// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Orchestrate report generation: filtered asset paging, per-marketplace catalog resolution, lazy row stream
// role: processing/orchestrator
// inputs: CommerceApi backend, ReportParameters (product selection), progress callback, renderer type, "now"
// outputs: Iterator of Result<Row>; CSV renderers get the header tuple as the first item
// invariants:
// - rows are produced lazily, one asset at a time; re-invoking generate re-issues all queries
// - progress fires after every row, plus once for the CSV header before the first data row
// - the first error fuses the stream; there is no partial-success mode
// errors: Remote failures and per-asset derivation failures end the run immediately
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::ValueEnum;

use crate::api::{CommerceApi, Filter};
use crate::model::Asset;
use crate::pricing::CatalogCache;
use crate::row::{self, Row};

const ASSET_PAGE: usize = 100;

#[derive(Copy, Clone, Eq, PartialEq, Debug, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum RendererType {
  Csv,
  Json,
}

#[derive(Debug, Clone)]
pub struct ProductSelection {
  pub all: bool,
  pub choices: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ReportParameters {
  pub product: ProductSelection,
}

/// The fixed asset predicate: active, production connection, optionally
/// restricted to a product allowlist.
pub fn asset_filter(parameters: &ReportParameters) -> Filter {
  let mut filter = Filter::new();

  if !parameters.product.all {
    filter = filter.one_of("product.id", &parameters.product.choices);
  }

  filter
    .one_of("status", &["active".to_string()])
    .eq("connection.type", "production")
}

/// Lazy, finite, non-restartable row stream. Owns the per-run catalog cache.
pub struct ReportStream<'a> {
  api: &'a dyn CommerceApi,
  filter: Filter,
  progress: Box<dyn FnMut(usize, usize) + 'a>,
  now: DateTime<Utc>,
  cache: CatalogCache,
  page: std::vec::IntoIter<Asset>,
  offset: usize,
  exhausted: bool,
  header_pending: bool,
  current: usize,
  total: usize,
  done: bool,
}

/// Start a report run. Counts the filtered assets up front (the CSV header
/// adds one progress unit), then yields rows as the caller pulls them.
pub fn generate<'a>(
  api: &'a dyn CommerceApi,
  parameters: &ReportParameters,
  progress: impl FnMut(usize, usize) + 'a,
  renderer_type: RendererType,
  now: DateTime<Utc>,
) -> Result<ReportStream<'a>> {
  let filter = asset_filter(parameters);
  let mut total = api.count_assets(&filter)?;

  let header_pending = renderer_type == RendererType::Csv;
  if header_pending {
    total += 1;
  }

  Ok(ReportStream {
    api,
    filter,
    progress: Box::new(progress),
    now,
    cache: CatalogCache::new(),
    page: Vec::new().into_iter(),
    offset: 0,
    exhausted: false,
    header_pending,
    current: 0,
    total,
    done: false,
  })
}

impl ReportStream<'_> {
  fn emit(&mut self, asset: &Asset) -> Result<Row> {
    let catalog = self.cache.resolve(self.api, &asset.marketplace.id, &asset.product.id)?;
    let built = row::build_row(asset, catalog, self.now)?;

    self.current += 1;
    (self.progress)(self.current, self.total);

    Ok(built)
  }
}

impl Iterator for ReportStream<'_> {
  type Item = Result<Row>;

  fn next(&mut self) -> Option<Self::Item> {
    if self.done {
      return None;
    }

    if self.header_pending {
      self.header_pending = false;
      self.current += 1;
      (self.progress)(self.current, self.total);
      return Some(Ok(row::header_row()));
    }

    loop {
      if let Some(asset) = self.page.next() {
        return match self.emit(&asset) {
          Ok(built) => Some(Ok(built)),
          Err(e) => {
            self.done = true;
            Some(Err(e))
          }
        };
      }

      if self.exhausted {
        self.done = true;
        return None;
      }

      match self.api.list_assets(&self.filter, ASSET_PAGE, self.offset) {
        Ok(batch) => {
          if batch.len() < ASSET_PAGE {
            self.exhausted = true;
          }
          if batch.is_empty() {
            self.done = true;
            return None;
          }
          self.offset += batch.len();
          self.page = batch.into_iter();
        }
        Err(e) => {
          self.done = true;
          return Some(Err(e));
        }
      }
    }
  }
}
