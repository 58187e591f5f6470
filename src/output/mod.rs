// Output formatting — terminal display and JSON emission of the model table.

pub mod terminal;

use anyhow::Result;

use crate::model::builder::ModelOutput;

/// Serialize a finished model as pretty JSON.
///
/// Undefined weights (NaN from a zero-denominator normalization) come out
/// as JSON null — the flag survives serialization instead of becoming a
/// fake number.
pub fn to_json(output: &ModelOutput) -> Result<String> {
    Ok(serde_json::to_string_pretty(output)?)
}
