use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};

use crate::config::ColsumConfig;
use crate::dom::{Cell, Document, Row, Table};
use crate::error::{ColsumError, ColsumResult};
use crate::render::FOOTER_CELL_STYLE;
use crate::runtime::Runtime;

/// Reads `<table>` elements out of page markup into the document model.
pub struct HtmlTableReader {
    tables: Selector,
    body_rows: Selector,
    cells: Selector,
}

impl HtmlTableReader {
    pub fn new() -> ColsumResult<Self> {
        Ok(Self {
            tables: parse_selector("table")?,
            body_rows: parse_selector("tbody tr")?,
            cells: parse_selector("td, th")?,
        })
    }

    /// Build a [`Document`] holding every table on the page, in document
    /// order. Any pre-existing footer rows are not read back as data.
    pub fn read_document(&self, html: &str) -> Document {
        let parsed = Html::parse_document(html);
        let mut doc = Document::new();
        for table_el in parsed.select(&self.tables) {
            doc.insert_table(self.read_table(table_el));
        }
        doc.take_mutations();
        doc
    }

    fn read_table(&self, table_el: ElementRef) -> Table {
        let mut table = Table::default();
        for row_el in table_el.select(&self.body_rows) {
            let mut row = Row::default();
            for cell_el in row_el.select(&self.cells) {
                let text = cell_el.text().collect::<String>().trim().to_string();
                row.cells.push(Cell {
                    text,
                    header: cell_el.value().name() == "th",
                });
            }
            table.body.push(row);
        }
        table
    }
}

/// Splices rendered footer markup back into the original page text.
///
/// Each `<table>…</table>` region is located in the source, any existing
/// `<tfoot>` sections are dropped, and the fresh footer is inserted just
/// before the closing tag. Working on the raw text keeps everything else
/// on the page byte-for-byte intact, and re-running on the output is
/// byte-identical. Assumes non-nested tables, matching the flat rendered
/// grids this targets.
///
/// Regions starting inside comments or raw-text elements (script, style,
/// textarea) are skipped: the parser never produces table elements there,
/// and counting them would pair each computed footer with the wrong
/// source region.
pub struct FooterInjector {
    table_region: Regex,
    tfoot_region: Regex,
    opaque_region: Regex,
}

impl FooterInjector {
    pub fn new() -> Self {
        Self {
            table_region: Regex::new(r"(?is)<table\b.*?</table>").unwrap(),
            tfoot_region: Regex::new(r"(?is)<tfoot\b.*?</tfoot>").unwrap(),
            opaque_region: Regex::new(
                r"(?is)<!--.*?-->|<script\b.*?</script>|<style\b.*?</style>|<textarea\b.*?</textarea>",
            )
            .unwrap(),
        }
    }

    /// `footers[i]` is the markup for the i-th table in document order;
    /// `None` leaves that table untouched.
    pub fn inject(&self, html: &str, footers: &[Option<String>]) -> String {
        let opaque = self.opaque_spans(html);

        let mut out = String::with_capacity(html.len());
        let mut copied_to = 0;
        let mut index = 0;
        for m in self.table_region.find_iter(html) {
            if opaque
                .iter()
                .any(|&(start, end)| m.start() >= start && m.start() < end)
            {
                continue;
            }
            out.push_str(&html[copied_to..m.start()]);
            match footers.get(index).and_then(|f| f.as_deref()) {
                Some(markup) => out.push_str(&self.replace_footer(m.as_str(), markup)),
                None => out.push_str(m.as_str()),
            }
            copied_to = m.end();
            index += 1;
        }
        out.push_str(&html[copied_to..]);
        out
    }

    fn opaque_spans(&self, html: &str) -> Vec<(usize, usize)> {
        self.opaque_region
            .find_iter(html)
            .map(|m| (m.start(), m.end()))
            .collect()
    }

    fn replace_footer(&self, table_block: &str, footer_markup: &str) -> String {
        let cleared = self.tfoot_region.replace_all(table_block, "");
        // The region match guarantees an 8-byte "</table>" suffix,
        // whatever its casing.
        let insert_at = cleared.len() - "</table>".len();
        format!(
            "{}{}{}",
            &cleared[..insert_at],
            footer_markup,
            &cleared[insert_at..]
        )
    }
}

impl Default for FooterInjector {
    fn default() -> Self {
        Self::new()
    }
}

/// Serialize a footer row as a styled `<tfoot>` section.
pub fn footer_markup(footer: &Row) -> String {
    let mut out = String::from("<tfoot><tr>");
    for cell in &footer.cells {
        out.push_str(&format!(
            "<td style=\"{}\">{}</td>",
            FOOTER_CELL_STYLE, cell.text
        ));
    }
    out.push_str("</tr></tfoot>");
    out
}

/// Counters reported after a page has been processed.
#[derive(Debug, Default)]
pub struct PageStats {
    pub tables: usize,
    pub footers_written: usize,
    pub passes: u64,
}

impl PageStats {
    pub fn summary(&self) -> String {
        format!(
            "Processed {} tables: {} footers written in {} passes.",
            self.tables, self.footers_written, self.passes
        )
    }
}

/// Run the whole pipeline over a page: read tables, compute sums to
/// convergence, splice the footers back in.
pub fn summarize_html(html: &str, config: &ColsumConfig) -> ColsumResult<(String, PageStats)> {
    let reader = HtmlTableReader::new()?;
    let doc = reader.read_document(html);

    let mut runtime = Runtime::with_delays(doc, config.recompute_delay_ms, config.rescan_delay_ms);
    runtime.start();
    let cycles = runtime.settle();
    debug!(cycles, "page settled");

    let footers: Vec<Option<String>> = runtime
        .doc()
        .tables()
        .map(|(_, table)| table.footer.as_ref().map(footer_markup))
        .collect();

    let stats = PageStats {
        tables: footers.len(),
        footers_written: footers.iter().filter(|f| f.is_some()).count(),
        passes: runtime.engine().passes(),
    };
    info!("{}", stats.summary());

    let injector = FooterInjector::new();
    Ok((injector.inject(html, &footers), stats))
}

fn parse_selector(selector: &str) -> ColsumResult<Selector> {
    Selector::parse(selector)
        .map_err(|e| ColsumError::selector(format!("invalid selector {:?}: {:?}", selector, e)))
}
