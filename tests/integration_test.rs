use colsum::config::ColsumConfig;
use colsum::dom::{Document, Row, Table};
use colsum::html::summarize_html;
use colsum::runtime::Runtime;

const REPORT_PAGE: &str = r#"<!DOCTYPE html>
<html><body>
<h1>Quarterly report</h1>
<table class="MuiTable-root">
  <tbody>
    <tr><td>10</td><td>2.5</td></tr>
    <tr><td>20</td><td>1,5</td></tr>
  </tbody>
</table>
<table>
  <tbody>
    <tr><td>Widget</td><td>1.234,56</td></tr>
    <tr><td>Gadget</td><td>765,44</td></tr>
  </tbody>
</table>
</body></html>"#;

#[test]
fn test_end_to_end_page_summing() {
    let config = ColsumConfig::default();
    let (out, stats) = summarize_html(REPORT_PAGE, &config).unwrap();

    assert_eq!(stats.tables, 2);
    assert_eq!(stats.footers_written, 2);

    // First table: plain and comma-decimal cells
    assert!(out.contains("30.00"));
    assert!(out.contains("4.00"));

    // Second table: dual-separator cells, first column stays empty
    assert!(out.contains("2,000.00"));

    // Page chrome untouched
    assert!(out.contains("<h1>Quarterly report</h1>"));
    assert!(out.contains("class=\"MuiTable-root\""));
}

#[test]
fn test_footer_styling_is_present() {
    let config = ColsumConfig::default();
    let (out, _) = summarize_html(REPORT_PAGE, &config).unwrap();

    assert!(out.contains("font-weight: bold"));
    assert!(out.contains("background: #f6f7fb"));
    assert!(out.contains("padding: 8px"));
}

#[test]
fn test_running_twice_is_byte_identical() {
    let config = ColsumConfig::default();
    let (first, _) = summarize_html(REPORT_PAGE, &config).unwrap();
    let (second, stats) = summarize_html(&first, &config).unwrap();

    assert_eq!(first, second);
    assert_eq!(stats.footers_written, 2);
}

#[test]
fn test_live_document_converges_after_edits() {
    let mut doc = Document::new();
    let id = doc.insert_table(Table::from_rows(&[&["10", "2.5"], &["20", "1,5"]]));
    let mut runtime = Runtime::new(doc);
    runtime.start();
    runtime.settle();

    // A burst of edits coalesces into one recompute plus one settle pass
    let before = runtime.engine().passes();
    runtime.doc_mut().set_cell_text(id, 0, 0, "15");
    runtime.doc_mut().set_cell_text(id, 1, 0, "25");
    runtime.doc_mut().push_row(id, Row::from_texts(&["60", "0"]));
    runtime.settle();

    assert_eq!(runtime.engine().passes(), before + 2);
    assert!(runtime.is_settled());

    let footer = runtime
        .doc()
        .table(id)
        .unwrap()
        .footer
        .as_ref()
        .unwrap()
        .cells
        .iter()
        .map(|c| c.text.clone())
        .collect::<Vec<_>>();
    assert_eq!(footer, vec!["100.00", "4.00"]);
}

#[test]
fn test_table_added_after_load_is_summed() {
    let reader_input = "<html><body><p>empty page</p></body></html>";
    let config = ColsumConfig::default();

    // Nothing to do on a page without tables
    let (out, stats) = summarize_html(reader_input, &config).unwrap();
    assert_eq!(stats.tables, 0);
    assert_eq!(out, reader_input);

    // A table inserted into a live document is discovered on rescan
    let mut runtime = Runtime::new(Document::new());
    runtime.start();
    runtime.settle();

    let id = runtime
        .doc_mut()
        .insert_table(Table::from_rows(&[&["1", "2"], &["3", "4"]]));
    runtime.settle();

    assert!(runtime.engine().is_observing(id));
    let footer = runtime.doc().table(id).unwrap().footer.as_ref().unwrap();
    assert_eq!(footer.cells[0].text, "4.00");
    assert_eq!(footer.cells[1].text, "6.00");
}

#[test]
fn test_absent_column_renders_empty_not_zero() {
    let html = r#"<table><tbody>
<tr><td>desc</td><td>10</td></tr>
<tr><td>more</td><td>20</td></tr>
</tbody></table>"#;
    let config = ColsumConfig::default();
    let (out, _) = summarize_html(html, &config).unwrap();

    assert!(out.contains("30.00"));
    // The description column renders as an empty cell, not "0.00"
    assert!(out.contains("padding: 8px;\"></td>"));
    assert_eq!(out.matches("0.00").count(), 1);
}
