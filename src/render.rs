use anyhow::{Context, Result};
use std::io::Write;

use crate::report::RendererType;
use crate::row::{HEADERS, Row};

/// Drain the row stream into the requested renderer. The CSV path streams
/// row by row; the JSON path collects into one array of keyed objects.
pub fn render<I>(rows: I, renderer_type: RendererType, out: &str) -> Result<()>
where
  I: Iterator<Item = Result<Row>>,
{
  let writer = open_out(out)?;

  match renderer_type {
    RendererType::Csv => render_csv(rows, writer),
    RendererType::Json => render_json(rows, writer),
  }
}

fn open_out(out: &str) -> Result<Box<dyn Write>> {
  if out == "-" {
    return Ok(Box::new(std::io::stdout()));
  }

  let file = std::fs::File::create(out).with_context(|| format!("creating output file {}", out))?;
  Ok(Box::new(file))
}

fn render_csv<I, W>(rows: I, writer: W) -> Result<()>
where
  I: Iterator<Item = Result<Row>>,
  W: Write,
{
  let mut wtr = csv::Writer::from_writer(writer);

  for row in rows {
    wtr.write_record(&row?)?;
  }

  wtr.flush()?;
  Ok(())
}

fn render_json<I, W>(rows: I, mut writer: W) -> Result<()>
where
  I: Iterator<Item = Result<Row>>,
  W: Write,
{
  let mut records: Vec<serde_json::Value> = Vec::new();

  for row in rows {
    let row = row?;
    let record: serde_json::Map<String, serde_json::Value> = HEADERS
      .iter()
      .zip(row.iter())
      .map(|(key, value)| (key.to_string(), serde_json::Value::String(value.clone())))
      .collect();
    records.push(serde_json::Value::Object(record));
  }

  serde_json::to_writer_pretty(&mut writer, &serde_json::Value::Array(records))?;
  writeln!(writer)?;
  Ok(())
}
