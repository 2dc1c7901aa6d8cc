//! End-to-end encoder behaviour over the format dispatcher.

use ataps::{
    application::{encode::dispatch, format::ResponseFormat},
    domain::{ResultSet, Value},
};
use fitsio_pure::{
    bintable::{BinaryColumnData, read_binary_column},
    hdu::{Hdu, HduInfo, parse_fits},
    value::Value as CardValue,
};

const BLOCK: usize = 2880;

fn people() -> ResultSet {
    ResultSet::from_records(vec![
        vec![("name", Value::from("Alice")), ("age", Value::Long(30))],
        vec![("name", Value::from("Bob")), ("age", Value::Long(25))],
    ])
}

fn body(result: &ResultSet, format: &str) -> Vec<u8> {
    dispatch(result, format).expect("payload").body.to_vec()
}

fn text(result: &ResultSet, format: &str) -> String {
    String::from_utf8(body(result, format)).expect("utf-8 payload")
}

/// Primary HDU plus the single binary-table extension of a FITS payload.
fn read_fits(bytes: &[u8]) -> (Hdu, Hdu) {
    let fits = parse_fits(bytes).expect("valid fits");
    assert_eq!(fits.len(), 2);
    (fits.primary().clone(), fits.get(1).expect("extension").clone())
}

fn card<'a>(hdu: &'a Hdu, keyword: &str) -> &'a CardValue {
    hdu.cards
        .iter()
        .find(|card| card.keyword_str() == keyword)
        .and_then(|card| card.value.as_ref())
        .unwrap_or_else(|| panic!("missing card {keyword}"))
}

fn string_card(hdu: &Hdu, keyword: &str) -> String {
    match card(hdu, keyword) {
        CardValue::String(value) => value.trim_end().to_string(),
        other => panic!("{keyword} is not a string: {other:?}"),
    }
}

#[test]
fn csv_scenario_orders_age_before_name() {
    assert_eq!(text(&people(), "csv"), "age,name\n30,Alice\n25,Bob\n");
}

#[test]
fn votable_scenario_has_two_fields_and_two_rows() {
    let xml = text(&people(), "votable");
    assert_eq!(xml.matches("<FIELD ").count(), 2);
    assert!(xml.contains("<FIELD name=\"age\" datatype=\"long\"></FIELD>"));
    assert!(xml.contains("<FIELD name=\"name\" datatype=\"char\" arraysize=\"6*\"></FIELD>"));
    assert_eq!(xml.matches("<TR>").count(), 2);
    let first_row = xml.find("<TD>30</TD>").expect("age cell");
    let first_name = xml.find("<TD>Alice</TD>").expect("name cell");
    assert!(first_row < first_name);
}

#[test]
fn delimited_output_reads_back_as_stringified_values() {
    let result = ResultSet::from_records(vec![
        vec![
            ("comment", Value::from("comma, \"quoted\"\nand newline")),
            ("flag", Value::Boolean(true)),
            ("ratio", Value::Double(0.25)),
        ],
        vec![("flag", Value::Boolean(false)), ("ratio", Value::Null)],
    ]);

    for (format, delimiter) in [("csv", b','), ("tsv", b'\t')] {
        let payload = body(&result, format);
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .from_reader(payload.as_slice());

        let headers: Vec<String> = reader
            .headers()
            .expect("header row")
            .iter()
            .map(str::to_string)
            .collect();
        assert_eq!(headers, result.columns());

        let records: Vec<Vec<String>> = reader
            .records()
            .map(|record| {
                record
                    .expect("record")
                    .iter()
                    .map(str::to_string)
                    .collect()
            })
            .collect();
        let expected: Vec<Vec<String>> = result
            .rows()
            .iter()
            .map(|row| row.iter().map(ToString::to_string).collect())
            .collect();
        assert_eq!(records, expected, "format {format}");
    }
}

#[test]
fn every_format_agrees_on_column_order() {
    let result = ResultSet::from_records(vec![
        vec![("zeta", Value::Int(1)), ("alpha", Value::Int(2))],
        vec![("mid", Value::Int(3))],
    ]);

    assert!(text(&result, "csv").starts_with("alpha,mid,zeta\n"));
    assert!(text(&result, "tsv").starts_with("alpha\tmid\tzeta\n"));
    assert!(text(&result, "text").contains("# alpha | mid | zeta\n"));

    let html = text(&result, "html");
    let positions: Vec<usize> = ["<th>alpha</th>", "<th>mid</th>", "<th>zeta</th>"]
        .iter()
        .map(|cell| html.find(cell).expect("header cell"))
        .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));

    let xml = text(&result, "votable");
    let positions: Vec<usize> = ["name=\"alpha\"", "name=\"mid\"", "name=\"zeta\""]
        .iter()
        .map(|field| xml.find(field).expect("field"))
        .collect();
    assert!(positions.windows(2).all(|pair| pair[0] < pair[1]));

    let fits = body(&result, "fits");
    let (_, table) = read_fits(&fits);
    assert_eq!(string_card(&table, "TTYPE1"), "alpha");
    assert_eq!(string_card(&table, "TTYPE2"), "mid");
    assert_eq!(string_card(&table, "TTYPE3"), "zeta");
}

#[test]
fn text_output_snapshot() {
    let output = text(&people(), "text");
    insta::assert_snapshot!(output.trim_end(), @r"
    # Results:
    #
    # Headers:
    # age | name
    30 | Alice
    25 | Bob
    ");
}

#[test]
fn fits_binary_table_reads_back() {
    let fits = body(&people(), "fits");
    assert_eq!(fits.len() % BLOCK, 0);

    let (primary, table) = read_fits(&fits);
    assert_eq!(card(&primary, "SIMPLE"), &CardValue::Logical(true));
    assert_eq!(card(&primary, "NAXIS"), &CardValue::Integer(0));
    assert_eq!(card(&primary, "EXTEND"), &CardValue::Logical(true));

    assert!(matches!(
        table.info,
        HduInfo::BinaryTable { naxis1: 14, naxis2: 2, tfields: 2, .. }
    ));
    assert_eq!(string_card(&table, "EXTNAME"), "results");
    assert_eq!(string_card(&table, "TTYPE1"), "age");
    assert_eq!(string_card(&table, "TFORM1"), "1K");
    assert_eq!(string_card(&table, "TTYPE2"), "name");
    assert_eq!(string_card(&table, "TFORM2"), "6A");

    assert_eq!(
        read_binary_column(&fits, &table, 0).expect("age"),
        BinaryColumnData::Long(vec![30, 25])
    );
    assert_eq!(
        read_binary_column(&fits, &table, 1).expect("name"),
        BinaryColumnData::Ascii(vec!["Alice".into(), "Bob".into()])
    );
    assert_eq!(&fits[table.data_start + 8..table.data_start + 14], b"Alice ");
}

#[test]
fn fits_nulls_take_the_zero_value_of_their_format() {
    let result = ResultSet::from_records(vec![
        vec![
            ("flag", Value::Boolean(true)),
            ("n", Value::Int(7)),
            ("s", Value::from("xy")),
        ],
        Vec::new(),
    ]);
    let fits = body(&result, "fits");
    let (_, table) = read_fits(&fits);
    assert_eq!(string_card(&table, "TFORM1"), "1L");
    assert_eq!(string_card(&table, "TFORM2"), "1J");
    assert_eq!(string_card(&table, "TFORM3"), "3A");
    assert!(matches!(table.info, HduInfo::BinaryTable { naxis1: 8, .. }));

    assert_eq!(
        read_binary_column(&fits, &table, 0).expect("flag"),
        BinaryColumnData::Logical(vec![true, false])
    );
    assert_eq!(
        read_binary_column(&fits, &table, 1).expect("n"),
        BinaryColumnData::Int(vec![7, 0])
    );
    let second_row = table.data_start + 8;
    assert_eq!(&fits[second_row + 5..second_row + 8], b"   ");
}

#[test]
fn null_only_column_is_double_everywhere() {
    let result = ResultSet::from_records(vec![vec![("missing", Value::Null)]]);

    let xml = text(&result, "votable");
    assert!(xml.contains("<FIELD name=\"missing\" datatype=\"double\"></FIELD>"));
    assert!(xml.contains("<TD></TD>"));

    let fits = body(&result, "fits");
    let (_, table) = read_fits(&fits);
    assert_eq!(string_card(&table, "TFORM1"), "1D");
    assert_eq!(
        read_binary_column(&fits, &table, 0).expect("missing"),
        BinaryColumnData::Double(vec![0.0])
    );
}

#[test]
fn empty_result_is_structurally_valid() {
    let empty = ResultSet::empty();

    let xml = text(&empty, "votable");
    assert!(xml.contains("<INFO name=\"QUERY_STATUS\" value=\"OK\"></INFO>"));
    assert_eq!(xml.matches("<FIELD").count(), 0);
    assert_eq!(xml.matches("<TR>").count(), 0);

    let fits = body(&empty, "fits");
    let (_, table) = read_fits(&fits);
    assert!(matches!(
        table.info,
        HduInfo::BinaryTable { naxis2: 0, tfields: 0, .. }
    ));

    assert!(body(&empty, "csv").is_empty());
}

#[test]
fn content_types_match_formats() {
    for format in ResponseFormat::ALL {
        let payload = dispatch(&people(), format.as_str()).expect("payload");
        assert_eq!(payload.content_type, format.content_type());
    }
}
