// === Module Header (agents-tooling) START ===
// header: Parsed by scripts/check_module_headers.sh for purpose/role presence; keep keys on single-line entries.
// purpose: Provide dotted-path lookup and scalar coercion over serde_json::Value for filter matching
// role: extension/serde_json
// outputs: JsonPluck trait (nested fetch) and scalar_str (string form of JSON scalars)
// invariants: No panics; missing paths yield None; non-scalar values coerce to None
// tie_breakers: contracts > orchestration > correctness > performance > minimal_diffs
// === Module Header END ===

/// Extension to fetch nested values via dotted paths like "marketplace.id".
pub trait JsonPluck {
  fn pluck(&self, path: &str) -> Option<&serde_json::Value>;
}

impl JsonPluck for serde_json::Value {
  fn pluck(&self, path: &str) -> Option<&serde_json::Value> {
    if path.is_empty() {
      return Some(self);
    }

    let mut cur = self;

    for key in path.split('.') {
      cur = cur.get(key)?;
    }

    Some(cur)
  }
}

/// Render a JSON scalar in the string form used for filter comparisons.
///
/// Remote collections are loosely typed: ids arrive as strings but numeric
/// fields may arrive as bare numbers. Comparing through a common string form
/// keeps the env-backed backend's matching aligned with the RQL the HTTP
/// backend serializes.
pub fn scalar_str(v: &serde_json::Value) -> Option<String> {
  match v {
    serde_json::Value::String(s) => Some(s.clone()),
    serde_json::Value::Number(n) => Some(n.to_string()),
    serde_json::Value::Bool(b) => Some(b.to_string()),
    _ => None,
  }
}
