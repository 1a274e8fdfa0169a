#![cfg(feature = "io-jsonl")]

use hnstats::analysis::*;
use hnstats::testing::*;
use hnstats::*;
use std::fs;
use tempfile::tempdir;

const DUMP: &str = r#"{"objectID":"1","created_at_i":0,"points":300,"title":"Show HN: a b","author":"pg"}

{"objectID":"2","created_at_i":3599,"points":100,"title":null,"author":"sama"}
"#;

#[test]
fn reads_records_and_skips_blank_lines() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("stories.json");
    fs::write(&path, DUMP)?;

    let records = read_records_jsonl(&path)?;
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].int("points")?, 300);
    assert_eq!(records[0].text("title")?, Some("Show HN: a b"));
    assert!(records[1].get("title").is_some_and(Value::is_absent));
    assert_eq!(records[1].text("title")?, None);
    Ok(())
}

#[test]
fn loaded_dataset_feeds_the_analyses() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("stories.json");
    fs::write(&path, DUMP)?;

    let p = TestPipeline::new();
    let posts = get_elements_with_same_attributes(&read_jsonl(&p, &path)?)?;
    assert_eq!(count_elements_in_dataset(&posts)?, 2);
    assert_kv_collections_equal(get_score_per_hour(&posts).collect()?, vec![(0, 200.0)]);
    assert_kv_collections_equal(get_title_length_distribution(&posts).collect()?, vec![(0, 1), (4, 1)]);
    Ok(())
}

#[test]
fn parse_error_reports_line_number() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("bad.json");
    fs::write(&path, "{\"points\":1}\n\n{not json}\n")?;

    match read_records_jsonl(&path) {
        Err(Error::Parse { line, .. }) => assert_eq!(line, 3),
        other => panic!("expected Parse error, got {other:?}"),
    }
    Ok(())
}

#[test]
fn missing_file_is_io_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("nope.json");
    assert!(matches!(read_records_jsonl(&path), Err(Error::Io { .. })));
}

#[test]
fn write_then_read_keeps_records() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("out").join("sample.jsonl");

    let stories = sample_stories();
    assert_eq!(write_jsonl_vec(&path, &stories)?, stories.len());
    assert_eq!(read_records_jsonl(&path)?, stories);
    Ok(())
}

#[test]
fn shards_become_partitions() -> anyhow::Result<()> {
    let dir = tempdir()?;
    let stories = sample_stories();
    let paths: Vec<_> = stories
        .chunks(2)
        .enumerate()
        .map(|(i, chunk)| -> anyhow::Result<_> {
            let path = dir.path().join(format!("part-{i}.jsonl"));
            write_jsonl_vec(&path, chunk)?;
            Ok(path)
        })
        .collect::<anyhow::Result<_>>()?;

    let p = TestPipeline::new();
    let ds = read_jsonl_shards(&p, &paths)?;
    let parts = ds.collect_partitions()?;
    assert_eq!(parts.len(), 3);
    assert!(parts.iter().all(|part| part.len() == 2));
    assert_eq!(ds.first()?, stories[0]);
    Ok(())
}

#[cfg(feature = "compression-gzip")]
#[test]
fn reads_gzip_by_extension_and_magic() -> anyhow::Result<()> {
    use flate2::Compression;
    use flate2::write::GzEncoder;
    use std::io::Write;

    let dir = tempdir()?;
    let mut enc = GzEncoder::new(Vec::new(), Compression::default());
    enc.write_all(DUMP.as_bytes())?;
    let bytes = enc.finish()?;

    let gz = dir.path().join("stories.json.gz");
    let bare = dir.path().join("stories.bin");
    fs::write(&gz, &bytes)?;
    fs::write(&bare, &bytes)?;

    assert_eq!(read_records_jsonl(&gz)?.len(), 2);
    assert_eq!(read_records_jsonl(&bare)?, read_records_jsonl(&gz)?);
    Ok(())
}
