use serde::Deserialize;
use serde_json::{Map, Value};

/// Tabular payload accepted by the write endpoint. The shape is decided at
/// the serde boundary: a list of row arrays is a raw grid, a list of objects
/// is a record set keyed by column name.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TableData {
    Grid(Vec<Vec<Value>>),
    Records(Vec<Map<String, Value>>),
}

impl TableData {
    pub fn is_empty(&self) -> bool {
        match self {
            TableData::Grid(rows) => rows.is_empty(),
            TableData::Records(rows) => rows.is_empty(),
        }
    }

    /// Normalize to the 2D grid written to the sheet. Grids pass through
    /// unmodified; records become a header row derived from the first
    /// record's keys (first-seen order) followed by one stringified row per
    /// record, with missing keys filled by the empty string.
    pub fn into_grid(self) -> Vec<Vec<Value>> {
        match self {
            TableData::Grid(rows) => rows,
            TableData::Records(rows) => records_to_grid(rows),
        }
    }
}

fn records_to_grid(rows: Vec<Map<String, Value>>) -> Vec<Vec<Value>> {
    let headers: Vec<String> = match rows.first() {
        Some(first) => first.keys().cloned().collect(),
        None => return Vec::new(),
    };

    let mut grid = Vec::with_capacity(rows.len() + 1);
    grid.push(headers.iter().map(|h| Value::String(h.clone())).collect());
    for row in &rows {
        grid.push(
            headers
                .iter()
                .map(|h| Value::String(cell_text(row.get(h))))
                .collect(),
        );
    }
    grid
}

fn cell_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
