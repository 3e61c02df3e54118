use anyhow::Result;
use clap::Parser;

mod api;
mod classify;
mod cli;
mod dates;
mod ext;
mod model;
mod params;
mod pricing;
mod render;
mod report;
mod row;
mod util;

use crate::cli::{Cli, normalize};

fn main() -> Result<()> {
  let cli = Cli::parse();

  if cli.gen_man {
    let page = util::render_man_page::<Cli>()?;
    print!("{}", page);
    return Ok(());
  }

  // Phase 1: normalize CLI
  let cfg = normalize(cli)?;

  // Phase 2: select the API backend (env fixtures take precedence over HTTP)
  let api = api::build_api(&cfg.base_url, cfg.token.clone())?;

  // Phase 3: stream rows into the renderer
  let verbose = cfg.verbose;
  let progress = move |current: usize, total: usize| {
    if verbose {
      eprintln!("[progress] {}/{}", current, total);
    }
  };

  let rows = report::generate(api.as_ref(), &cfg.parameters, progress, cfg.format, cfg.now)?;
  render::render(rows, cfg.format, &cfg.out)
}
