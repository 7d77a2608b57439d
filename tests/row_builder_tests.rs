// tests/row_builder_tests.rs - row production protocol over mixed exporter
// sets

use chrono::{TimeZone, Utc};
use logrow::{
    AppLogExporter, FieldExporter, FieldType, FieldValue, LogLine, LogRecord, RequestInfoExporter,
    RowBuilder, Schema, Severity, TimestampExporter,
};

fn full_builder() -> RowBuilder {
    let schema = Schema::new(vec![
        ("accountId".to_string(), FieldType::String),
        ("playerId".to_string(), FieldType::Integer),
    ])
    .unwrap();
    RowBuilder::new(vec![
        Box::new(TimestampExporter::new()) as Box<dyn FieldExporter>,
        Box::new(RequestInfoExporter::new()),
        Box::new(AppLogExporter::new("login", schema)),
    ])
    .unwrap()
}

fn login_record(players: &[i64]) -> LogRecord {
    let mut record = LogRecord::new(Utc.with_ymd_and_hms(2024, 3, 1, 10, 0, 0).unwrap());
    record.method = Some("POST".to_string());
    record.resource = Some("/v1/session".to_string());
    record.status = Some(200);
    record.lines = players
        .iter()
        .map(|p| {
            LogLine::new(
                format!(
                    "gw AppLog\t{{\"type\":\"login\",\"data\":{{\"accountId\":\"a{}\",\"playerId\":{}}}}}",
                    p, p
                ),
                Severity::Info,
            )
        })
        .collect();
    record
}

#[test]
fn test_merged_schema_wire_contract() {
    let builder = full_builder();
    let pairs: Vec<(String, &str)> = builder
        .schema()
        .iter()
        .map(|(name, ty)| (name.to_string(), ty.as_str()))
        .collect();

    assert_eq!(
        pairs,
        vec![
            ("timestamp".to_string(), "integer"),
            ("method".to_string(), "string"),
            ("resource".to_string(), "string"),
            ("status".to_string(), "integer"),
            ("accountId".to_string(), "string"),
            ("playerId".to_string(), "integer"),
        ]
    );
}

#[test]
fn test_one_row_per_matched_line_with_repeated_metadata() {
    let mut builder = full_builder();
    let rows = builder.process(&login_record(&[7, 8, 9]));

    assert_eq!(rows.len(), 3);
    for (i, row) in rows.iter().enumerate() {
        assert_eq!(row.len(), 6);
        // request metadata identical on every row
        assert_eq!(row.values()[1], FieldValue::Str("POST".to_string()));
        assert_eq!(row.values()[3], FieldValue::Integer(200));
        // line-derived column varies per row
        assert_eq!(row.values()[5], FieldValue::Integer(7 + i as i64));
    }
}

#[test]
fn test_record_without_matches_yields_no_rows() {
    let mut builder = full_builder();
    let rows = builder.process(&login_record(&[]));
    assert!(rows.is_empty());
}

#[test]
fn test_sequential_records_do_not_leak() {
    let mut builder = full_builder();

    let rows = builder.process(&login_record(&[1, 2]));
    assert_eq!(rows.len(), 2);

    // second record has different metadata and a single line
    let mut second = login_record(&[42]);
    second.method = Some("GET".to_string());
    let rows = builder.process(&second);

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].values()[1], FieldValue::Str("GET".to_string()));
    assert_eq!(rows[0].values()[5], FieldValue::Integer(42));
}

#[test]
fn test_metadata_only_builder() {
    let mut builder = RowBuilder::new(vec![
        Box::new(TimestampExporter::new()) as Box<dyn FieldExporter>
    ])
    .unwrap();

    // even a record with unmatched lines yields exactly one row
    let rows = builder.process(&login_record(&[1, 2, 3]));
    assert_eq!(rows.len(), 1);
    assert_eq!(
        rows[0].values()[0],
        FieldValue::Integer(1_709_287_200_000_000)
    );
}

#[test]
fn test_empty_exporter_set_rejected() {
    assert!(RowBuilder::new(Vec::new()).is_err());
}
