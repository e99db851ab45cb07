use serde_json::Value as JsonValue;
use tracing::{info, warn};

use crate::session::Row;

/// Rows rendered as a JSON array, cut back to whole rows when over `max_bytes`.
///
/// At least one row is always kept; dropped rows are reported in a trailing note.
pub fn render_rows(tool_name: &str, rows: &[Row], max_bytes: usize) -> String {
    let rendered: Vec<String> = rows
        .iter()
        .map(|row| JsonValue::Object(row.clone()).to_string())
        .collect();

    // brackets plus separators
    let total_bytes = rendered.iter().map(String::len).sum::<usize>() + rendered.len().max(1) + 1;
    if total_bytes <= max_bytes {
        return format!("[{}]", rendered.join(","));
    }

    let mut used = 2;
    let mut keep = 0;
    for row in &rendered {
        let cost = row.len() + usize::from(keep > 0);
        if keep > 0 && used + cost > max_bytes {
            break;
        }
        used += cost;
        keep += 1;
    }
    let truncated = rendered.len() - keep;

    warn!(
        tool = tool_name,
        result_bytes = total_bytes,
        max_bytes = max_bytes,
        "Tool result exceeds max_result_bytes limit, truncating"
    );
    info!(
        tool = tool_name,
        original_rows = rendered.len(),
        kept_rows = keep,
        truncated_rows = truncated,
        "Truncated result rows"
    );

    format!(
        "[{}]\n(... {} more rows truncated)",
        rendered[..keep].join(","),
        truncated
    )
}
