use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::CommandFactory;

/// Parse an RFC 3339 timestamp into a UTC instant.
///
/// The platform serializes every event timestamp with an explicit offset;
/// anything else is malformed input and surfaces as an error.
pub fn parse_rfc3339_utc(s: &str) -> Result<DateTime<Utc>> {
  let dt = DateTime::parse_from_rfc3339(s).with_context(|| format!("parsing timestamp {:?}", s))?;

  Ok(dt.with_timezone(&Utc))
}

/// Render a section-1 man page for a clap `CommandFactory` implementor.
/// Returns the troff content as a UTF-8 string.
pub fn render_man_page<T: CommandFactory>() -> Result<String> {
  let cmd = T::command();
  let man = clap_mangen::Man::new(cmd);
  let mut buf: Vec<u8> = Vec::new();

  man.render(&mut buf)?;

  Ok(String::from_utf8_lossy(&buf).to_string())
}
