use hnstats::analysis::*;
use hnstats::testing::*;
use hnstats::{Error, Record, Value, from_vec};

fn text_points() -> Record {
    Record::new([
        ("objectID", Value::from("42")),
        ("created_at_i", Value::Int(10)),
        ("points", Value::from("many")),
    ])
}

#[test]
fn non_numeric_points_is_invalid_record() {
    let p = TestPipeline::new();
    let ds = from_vec(&p, vec![story(0, 5, None), text_points()]);

    match get_score_per_hour(&ds).collect() {
        Err(Error::InvalidRecord {
            attribute,
            record,
            expected,
            found,
        }) => {
            assert_eq!(attribute, "points");
            assert_eq!(record, "objectID=42");
            assert_eq!(expected, "number");
            assert_eq!(found, "text");
        }
        other => panic!("expected InvalidRecord, got {other:?}"),
    }
}

#[test]
fn bad_records_fail_at_the_action_not_the_transform() {
    let p = TestPipeline::new();
    let ds = from_vec(&p, vec![text_points()]);

    // building the chain never touches the data
    let per_hour = get_proportion_of_scores(&ds);
    let buckets = get_number_of_posts_per_bucket(&ds, extract_time(0).unwrap(), extract_time(10).unwrap());

    assert!(matches!(per_hour.count(), Err(Error::InvalidRecord { .. })));
    // buckets only read created_at_i
    assert_eq!(buckets.count().unwrap(), 1);
}

#[test]
fn null_timestamp_is_missing() {
    let p = TestPipeline::new();
    let rec = Record::new([("created_at_i", Value::Absent), ("points", Value::Int(1))]);
    let ds = from_vec(&p, vec![rec]);
    assert!(matches!(
        get_number_of_posts_per_hour(&ds).collect(),
        Err(Error::MissingAttribute { .. })
    ));
}

#[test]
fn out_of_range_timestamp() {
    assert!(matches!(
        extract_time(i64::MAX),
        Err(Error::InvalidTimestamp { seconds: i64::MAX })
    ));
}

#[test]
fn non_text_title_is_invalid() {
    let p = TestPipeline::new();
    let rec = Record::new([
        ("created_at_i", Value::Int(0)),
        ("points", Value::Int(1)),
        ("title", Value::Int(3)),
    ]);
    let ds = from_vec(&p, vec![rec]);
    assert!(matches!(
        get_title_length_distribution(&ds).collect(),
        Err(Error::InvalidRecord { .. })
    ));
}

#[test]
fn error_messages_name_the_record() {
    let err = text_points().int("points").unwrap_err();
    assert_eq!(
        err.to_string(),
        "attribute `points` of record objectID=42: expected integer, found text"
    );

    let err = Record::new([("points", 1i64)]).int("created_at_i").unwrap_err();
    assert_eq!(err.to_string(), "record {points} has no attribute `created_at_i`");
}

#[test]
fn bucket_offset_overflow_is_invalid_record() {
    let far = story(i64::MIN, 1, None);
    match get_bucket(&far, 10, 20) {
        Err(Error::InvalidRecord {
            attribute, found, ..
        }) => {
            assert_eq!(attribute, "created_at_i");
            assert_eq!(found, i64::MIN.to_string());
        }
        other => panic!("expected InvalidRecord, got {other:?}"),
    }
    assert!(matches!(
        get_bucket(&story(0, 1, None), i64::MIN, i64::MAX),
        Err(Error::InvalidTimestamp { .. })
    ));

    let p = TestPipeline::new();
    let ds = from_vec(&p, vec![story(15, 1, None), far]);
    let (min, max) = (extract_time(10).unwrap(), extract_time(20).unwrap());
    assert!(matches!(
        get_number_of_posts_per_bucket(&ds, min, max).collect(),
        Err(Error::InvalidRecord { .. })
    ));
}
