use crate::model::AssetParam;

/// The named parameters the report reads off an asset, in raw form.
/// Absent parameters stay `None`; downstream decides what that means.
#[derive(Debug, Default, PartialEq)]
pub struct ExtractedParams {
  pub seamless_move: Option<String>,
  pub discount: Option<String>,
  pub action: Option<String>,
  pub renewal_date: Option<String>,
}

/// Map a raw discount-group code to its report label.
///
/// Only the four known level codes and the empty string are meaningful;
/// anything else is bucketed as "Other".
fn discount_label(code: &str) -> &'static str {
  match code {
    "01A12" => "Level 1",
    "02A12" => "Level 2",
    "03A12" => "Level 3",
    "04A12" => "Level 4",
    "" => "Empty",
    _ => "Other",
  }
}

/// Scan an asset's parameter list once, in order. Duplicate ids are not
/// expected, but when present the last occurrence wins.
pub fn extract(params: &[AssetParam]) -> ExtractedParams {
  let mut out = ExtractedParams::default();

  for param in params {
    match param.id.as_str() {
      "seamless_move" => out.seamless_move = Some(param.value.clone()),
      "discount_group" => out.discount = Some(discount_label(&param.value).to_string()),
      "action_type" => out.action = Some(param.value.clone()),
      "renewal_date" => out.renewal_date = Some(param.value.clone()),
      _ => {}
    }
  }

  out
}
