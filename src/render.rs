use crate::aggregate::ColumnSums;
use crate::dom::{Cell, Document, Row, TableId};

/// Inline style carried by every injected footer cell. Part of the
/// observable contract: the summary row must be visually distinguishable
/// from data rows.
pub const FOOTER_CELL_STYLE: &str = "font-weight: bold; background: #f6f7fb; padding: 8px;";

/// Formats column sums and (re)writes a table's footer row.
pub struct FooterRenderer;

impl FooterRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Fixed two fraction digits with a grouped integer part: `1,234.50`.
    pub fn format_sum(&self, value: f64) -> String {
        group_thousands(&format!("{:.2}", value))
    }

    /// Replace the footer row with one cell per sum slot.
    ///
    /// Absent slots render empty, present slots formatted. A vector with
    /// nothing to show (empty, or no numeric column at all) leaves the
    /// table untouched, footer included. The write is destructive-replace
    /// and idempotent: identical sums produce identical footer content,
    /// which the document recognizes as a silent no-op.
    pub fn render(&self, doc: &mut Document, id: TableId, sums: &ColumnSums) {
        if sums.iter().all(|slot| slot.is_none()) {
            return;
        }

        let cells = sums
            .iter()
            .map(|slot| match slot {
                Some(value) => Cell::data(self.format_sum(*value)),
                None => Cell::data(""),
            })
            .collect();

        doc.set_footer(id, Row { cells });
    }
}

impl Default for FooterRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Insert grouping commas into the integer part of a formatted number.
fn group_thousands(s: &str) -> String {
    let (integer_part, decimal_part) = match s.split_once('.') {
        Some((int, dec)) => (int, Some(dec)),
        None => (s, None),
    };

    let negative = integer_part.starts_with('-');
    let digits = if negative {
        &integer_part[1..]
    } else {
        integer_part
    };

    let mut result = String::with_capacity(s.len() + digits.len() / 3);
    if negative {
        result.push('-');
    }

    let len = digits.len();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            result.push(',');
        }
        result.push(c);
    }

    if let Some(dec) = decimal_part {
        result.push('.');
        result.push_str(dec);
    }

    result
}
