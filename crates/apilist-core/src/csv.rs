//! CSV rendering for flat listing rows.
//!
//! RFC 4180 quoting: fields containing a comma, quote, or line break are
//! wrapped in quotes and embedded quotes double. Header text and column
//! order are frozen; downstream diffs depend on them byte for byte.

use apilist_types::ApiRow;

/// Header row of the published listing.
pub const CSV_HEADER: &str = "interface,name,entity_type,arguments,idl_type,syntactic_form,use_counter,secure_context,high_entropy,source_file,source_line";

/// Render rows to CSV: header first, one `\n`-terminated line per row.
pub fn render_csv(rows: &[ApiRow]) -> String {
    let mut out = String::new();
    out.push_str(CSV_HEADER);
    out.push('\n');
    for row in rows {
        out.push_str(&render_csv_row(row));
    }
    out
}

fn render_csv_row(row: &ApiRow) -> String {
    let cells = [
        row.interface.as_str(),
        row.name.as_deref().unwrap_or(""),
        row.entity_type.as_str(),
        row.arguments.as_deref().unwrap_or(""),
        row.idl_type.as_deref().unwrap_or(""),
        row.syntactic_form.as_deref().unwrap_or(""),
        row.use_counter.as_deref().unwrap_or(""),
        row.secure_context.as_deref().unwrap_or(""),
        row.high_entropy.as_deref().unwrap_or(""),
        row.source_file.as_deref().unwrap_or(""),
        row.source_line.as_deref().unwrap_or(""),
    ];
    let mut line = String::new();
    for (i, cell) in cells.iter().enumerate() {
        if i > 0 {
            line.push(',');
        }
        line.push_str(&escape_csv_field(cell));
    }
    line.push('\n');
    line
}

fn escape_csv_field(s: &str) -> String {
    let needs_quoting = s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r');
    if needs_quoting {
        let escaped = s.replace('"', "\"\"");
        format!("\"{}\"", escaped)
    } else {
        s.to_string()
    }
}
