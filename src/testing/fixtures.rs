//! Record builders and sample submissions.

use crate::record::{CREATED_AT, OBJECT_ID, POINTS, Record, TITLE, Value};

/// A story with the attributes every analysis reads.
#[must_use]
pub fn story(created_at: i64, points: i64, title: Option<&str>) -> Record {
    let mut pairs: Vec<(&str, Value)> = vec![
        (CREATED_AT, Value::Int(created_at)),
        (POINTS, Value::Int(points)),
    ];
    if let Some(t) = title {
        pairs.push((TITLE, Value::from(t)));
    }
    Record::new(pairs)
}

/// Submissions spread over two days, shaped like the public Hacker News dump.
///
/// | objectID | created (UTC)       | points | title words |
/// |----------|---------------------|--------|-------------|
/// | 1        | 2014-01-01 00:10:00 | 250    | 4           |
/// | 2        | 2014-01-01 00:50:00 | 12     | 2           |
/// | 3        | 2014-01-01 13:00:00 | 480    | 4           |
/// | 4        | 2014-01-01 13:30:00 | 3      | 0 (no title)|
/// | 5        | 2014-01-02 00:05:00 | 201    | 2           |
/// | 6        | 2014-01-02 23:59:59 | 200    | 6           |
#[must_use]
pub fn sample_stories() -> Vec<Record> {
    const DAY: i64 = 1_388_534_400; // 2014-01-01T00:00:00Z
    let rows: [(&str, i64, i64, Option<&str>); 6] = [
        ("1", DAY + 600, 250, Some("Show HN: Rust engine")),
        ("2", DAY + 3_000, 12, Some("Ask HN")),
        ("3", DAY + 13 * 3_600, 480, Some("Why Rust is great")),
        ("4", DAY + 13 * 3_600 + 1_800, 3, None),
        ("5", DAY + 86_400 + 300, 201, Some("Hello, world!")),
        ("6", DAY + 2 * 86_400 - 1, 200, Some("a b c d e f")),
    ];
    rows.iter()
        .map(|(id, created, points, title)| {
            let mut pairs: Vec<(&str, Value)> = vec![
                (OBJECT_ID, Value::from(*id)),
                (CREATED_AT, Value::Int(*created)),
                (POINTS, Value::Int(*points)),
                ("author", Value::from("pg")),
            ];
            if let Some(t) = title {
                pairs.push((TITLE, Value::from(*t)));
            }
            Record::new(pairs)
        })
        .collect()
}
