use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Deserializer};

#[derive(Clone, Debug, Deserialize)]
pub(super) struct RawNode {
    pub(super) name: String,
    #[serde(default)]
    pub(super) size: Option<f64>,
    #[serde(default)]
    pub(super) author_count: Option<u32>,
    #[serde(default, deserialize_with = "number_or_numeric_string")]
    pub(super) fraction_of_lines_older_6_months: Option<f64>,
    #[serde(default)]
    pub(super) authors: Option<String>,
    #[serde(default)]
    pub(super) children: Option<Vec<RawNode>>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LooseNumber {
    Number(f64),
    Text(String),
}

/// Accepts `0.25` as well as `"0.25"` or `"  0.25"`. Text that is not a number
/// reads as missing.
fn number_or_numeric_string<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<LooseNumber>::deserialize(deserializer)?;
    Ok(match value {
        Some(LooseNumber::Number(number)) => Some(number),
        Some(LooseNumber::Text(text)) => text.trim().parse::<f64>().ok(),
        None => None,
    }
    .filter(|number| number.is_finite()))
}

impl RawNode {
    pub(super) fn has_children(&self) -> bool {
        self.children
            .as_ref()
            .is_some_and(|children| !children.is_empty())
    }
}

pub(super) fn parse_flare_json(raw: &str) -> Result<RawNode> {
    let root: RawNode = serde_json::from_str(raw).context("invalid hierarchy JSON")?;
    if root.name.is_empty() && !root.has_children() && root.size.is_none() {
        return Err(anyhow!("hierarchy JSON describes an empty root node"));
    }
    Ok(root)
}
