use std::path::Path;

use tempfile::tempdir;

use twstock_reshaper::batch::{convert_file, run_batch};
use twstock_reshaper::config::{BatchConfig, FileSpec};
use twstock_reshaper::pipeline::{CoercionMode, HeaderStrategy};
use twstock_reshaper::reader::{self, InMemorySource};
use twstock_reshaper::table::{Cell, LongRecord, LongTable, WideTable};
use twstock_reshaper::writer;

fn price_table() -> WideTable {
    WideTable::new(
        vec!["年/月".into(), "1101 台泥".into(), "1102 亞泥".into()],
        vec![
            vec![
                Cell::Text("2020-01-02".into()),
                Cell::Number(43.5),
                Cell::Text("-".into()),
            ],
            vec![
                Cell::Text("2020-01-03".into()),
                Cell::Number(43.9),
                Cell::Number(7.8),
            ],
        ],
    )
}

fn spec(file: &str, value_label: &str) -> FileSpec {
    FileSpec {
        file: file.to_string(),
        suffix: "_test".to_string(),
        value_label: value_label.to_string(),
        description: format!("{value_label} test data"),
        coercion: CoercionMode::Thresholded,
        header: HeaderStrategy::Positional,
        fixed_output: None,
    }
}

#[test]
fn convert_write_reload_round_trip() {
    let dir = tempdir().unwrap();
    let mut source = InMemorySource::new();
    source.insert("prices.xlsx", price_table());

    let output = convert_file(&spec("prices.xlsx", "Price"), dir.path(), &source).unwrap();
    assert_eq!(output.table.len(), 3);
    assert_eq!(
        output.output_path.file_name().unwrap().to_str().unwrap(),
        "prices_test_long_format.csv"
    );

    let reloaded = reader::load_long_csv(&output.output_path).unwrap();
    assert_eq!(reloaded.value_label, "Price");
    assert_eq!(reloaded.len(), output.table.len());
    let tuples = |t: &LongTable| -> Vec<(String, String, String)> {
        t.records
            .iter()
            .map(|r| (r.date.clone(), r.stock.clone(), r.value.render()))
            .collect()
    };
    assert_eq!(tuples(&reloaded), tuples(&output.table));
}

#[test]
fn offset_corrected_conversion_uses_fixed_output_name() {
    let dir = tempdir().unwrap();
    let mut source = InMemorySource::new();
    // quarterly layout: the real header rides in as the first data row
    source.insert(
        "book value.xlsx",
        WideTable::new(
            vec!["Unnamed: 0".into(), "Unnamed: 1".into(), "Unnamed: 2".into()],
            vec![
                vec![
                    Cell::Text("年/月".into()),
                    Cell::Text("1101 台泥".into()),
                    Cell::Text("1102 亞泥".into()),
                ],
                vec![
                    Cell::Text("2020Q1".into()),
                    Cell::Text("25,100".into()),
                    Cell::Text("-".into()),
                ],
                vec![
                    Cell::Text("2020Q2".into()),
                    Cell::Text("25,400".into()),
                    Cell::Text("not a number".into()),
                ],
            ],
        ),
    );

    let spec = FileSpec {
        file: "book value.xlsx".to_string(),
        suffix: String::new(),
        value_label: "BookValue".to_string(),
        description: "Book Values (fixed)".to_string(),
        coercion: CoercionMode::Unconditional,
        header: HeaderStrategy::OffsetCorrected,
        fixed_output: Some("book_values_fixed.csv".to_string()),
    };
    let output = convert_file(&spec, dir.path(), &source).unwrap();

    assert_eq!(
        output.output_path.file_name().unwrap().to_str().unwrap(),
        "book_values_fixed.csv"
    );
    // 2 periods × 2 stocks = 4, minus one dash, minus one unparseable
    assert_eq!(output.stats.records_before_filter, 4);
    assert_eq!(output.stats.sentinel_removed, 1);
    assert_eq!(output.stats.coercion_dropped, 1);
    assert_eq!(output.table.len(), 2);
    assert!(output
        .table
        .records
        .iter()
        .all(|r| r.value.as_number().is_some()));
    assert_eq!(output.table.records[0].value, Cell::Number(25100.0));
    assert_eq!(output.table.records[0].stock, "1101 台泥");
}

#[test]
fn batch_continues_past_missing_files() {
    let dir = tempdir().unwrap();
    let mut source = InMemorySource::new();
    source.insert("a.xlsx", price_table());
    source.insert("c.xlsx", price_table());
    source.insert("e.xlsx", price_table());

    let config = BatchConfig {
        entries: vec![
            spec("a.xlsx", "Price"),
            spec("b.xlsx", "Volume"),
            spec("c.xlsx", "MarketCap"),
            spec("d.xlsx", "BookValue"),
            spec("e.xlsx", "AnnouncementDate"),
        ],
    };
    let report = run_batch(&config, dir.path(), &source);

    assert_eq!(report.total, 5);
    assert_eq!(report.successful, 3);
    assert_eq!(report.total_rows, 9);

    let missing: Vec<&str> = report
        .results
        .iter()
        .filter(|r| !r.success)
        .map(|r| r.original_file.as_str())
        .collect();
    assert_eq!(missing, vec!["b.xlsx", "d.xlsx"]);
    for result in report.results.iter().filter(|r| !r.success) {
        assert_eq!(result.row_count, 0);
        assert!(result.output_file.is_none());
    }
    // results stay in configured order
    let order: Vec<&str> = report
        .results
        .iter()
        .map(|r| r.original_file.as_str())
        .collect();
    assert_eq!(order, vec!["a.xlsx", "b.xlsx", "c.xlsx", "d.xlsx", "e.xlsx"]);
}

#[test]
fn abandoned_coercion_survives_the_round_trip_as_text() {
    let dir = tempdir().unwrap();
    let mut source = InMemorySource::new();
    // announcement dates: mostly unparseable text, coercion must abandon
    source.insert(
        "announcemnet date.xlsx",
        WideTable::new(
            vec!["年/月".into(), "1101 台泥".into()],
            vec![
                vec![Cell::Text("2020Q1".into()), Cell::Text("Mar-20".into())],
                vec![Cell::Text("2020Q2".into()), Cell::Text("May-20".into())],
                vec![Cell::Text("2020Q3".into()), Cell::Text("Aug-20".into())],
            ],
        ),
    );

    let output = convert_file(
        &spec("announcemnet date.xlsx", "AnnouncementDate"),
        dir.path(),
        &source,
    )
    .unwrap();
    assert_eq!(output.table.len(), 3);
    assert!(output
        .table
        .records
        .iter()
        .all(|r| matches!(r.value, Cell::Text(_))));

    let reloaded = reader::load_long_csv(&output.output_path).unwrap();
    assert_eq!(reloaded.records[0].value, Cell::Text("Mar-20".into()));
}

#[test]
fn written_csv_has_the_contracted_header_row() {
    let dir = tempdir().unwrap();
    let table = LongTable {
        value_label: "MarketCap".into(),
        records: vec![LongRecord {
            date: "2020-01-02".into(),
            stock: "2330 台積電".into(),
            value: Cell::Number(63292145.0),
        }],
    };
    let path = dir.path().join("out.csv");
    writer::write_long_csv(&table, &path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some("Date,Stock,MarketCap"));
    assert_eq!(lines.next(), Some("2020-01-02,2330 台積電,63292145"));
    assert_eq!(lines.next(), None);
}

#[test]
fn rerunning_a_conversion_overwrites_the_output() {
    let dir = tempdir().unwrap();
    let mut source = InMemorySource::new();
    source.insert("prices.xlsx", price_table());

    let first = convert_file(&spec("prices.xlsx", "Price"), dir.path(), &source).unwrap();

    let mut shrunk = price_table();
    shrunk.rows.truncate(1);
    let mut source = InMemorySource::new();
    source.insert("prices.xlsx", shrunk);
    let second = convert_file(&spec("prices.xlsx", "Price"), dir.path(), &source).unwrap();

    assert_eq!(first.output_path, second.output_path);
    let reloaded = reader::load_long_csv(&second.output_path).unwrap();
    assert_eq!(reloaded.len(), second.table.len());
    assert!(reloaded.len() < first.table.len());
}

#[test]
fn missing_single_file_propagates_an_error() {
    let dir = tempdir().unwrap();
    let source = InMemorySource::new();
    let err = convert_file(&spec("nope.xlsx", "Price"), dir.path(), &source).unwrap_err();
    assert!(err.to_string().contains("nope.xlsx"));
}

#[test]
fn batch_report_json_is_written_next_to_outputs() {
    let dir = tempdir().unwrap();
    let mut source = InMemorySource::new();
    source.insert("a.xlsx", price_table());

    let config = BatchConfig {
        entries: vec![spec("a.xlsx", "Price")],
    };
    let report = run_batch(&config, dir.path(), &source);
    let path = twstock_reshaper::batch::persist_report(&report, dir.path()).unwrap();

    assert!(path.starts_with(dir.path()));
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(json["successful"], 1);
    assert_eq!(json["total"], 1);
    assert_eq!(json["results"][0]["success"], true);
}

#[test]
fn verify_reports_stats_for_a_written_output() {
    let dir = tempdir().unwrap();
    let mut source = InMemorySource::new();
    source.insert("prices.xlsx", price_table());
    let output = convert_file(&spec("prices.xlsx", "Price"), dir.path(), &source).unwrap();

    let report = twstock_reshaper::verify::verify_output(&output.output_path).unwrap();
    assert_eq!(report.summary.total_rows, 3);
    assert_eq!(report.summary.unique_stocks, 2);
    assert_eq!(report.summary.unique_dates, 2);
    assert_eq!(
        report.columns,
        vec!["Date".to_string(), "Stock".to_string(), "Price".to_string()]
    );
    let (top, _) = &report.top_stocks[0];
    assert_eq!(top, "1101 台泥");
}

#[test]
fn verify_on_a_missing_file_is_a_missing_input_error() {
    let err = twstock_reshaper::verify::verify_output(Path::new("does_not_exist.csv")).unwrap_err();
    assert!(matches!(
        err,
        twstock_reshaper::error::ReshapeError::MissingInput(_)
    ));
}
