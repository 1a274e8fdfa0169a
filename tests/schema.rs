use hnstats::analysis::*;
use hnstats::testing::*;
use hnstats::{AttributeSet, Error, Record, from_vec};

fn names(items: &[&str]) -> AttributeSet {
    items.iter().map(|s| s.to_string()).collect()
}

#[test]
fn same_attributes_is_exact_match() {
    let ab = Record::new([("a", 1i64), ("b", 2i64)]);
    assert!(same_attributes(&names(&["a", "b"]), &ab));
    assert!(!same_attributes(&names(&["a"]), &ab));
    assert!(!same_attributes(&names(&["a", "b", "c"]), &ab));
}

#[test]
fn keeps_only_records_matching_the_first() -> anyhow::Result<()> {
    let p = TestPipeline::new();
    let first = Record::new([("a", 1i64), ("b", 2i64)]);
    let wider = Record::new([("a", 1i64), ("b", 2i64), ("c", 3i64)]);
    let ds = from_vec(&p, vec![first.clone(), wider]);

    let kept = get_elements_with_same_attributes(&ds)?.collect()?;
    assert_eq!(kept, vec![first]);
    Ok(())
}

#[test]
fn null_valued_attributes_still_count_as_present() -> anyhow::Result<()> {
    let p = TestPipeline::new();
    let with_null = Record::new([("a", hnstats::Value::Int(1)), ("b", hnstats::Value::Absent)]);
    let without = Record::new([("a", 1i64)]);
    let ds = from_vec(&p, vec![with_null.clone(), without, with_null.clone()]);

    assert_eq!(get_elements_with_same_attributes(&ds)?.count()?, 2);
    Ok(())
}

#[test]
fn filtering_is_idempotent() -> anyhow::Result<()> {
    let p = TestPipeline::new();
    let ds = from_vec(&p, sample_stories());

    let once = get_elements_with_same_attributes(&ds)?;
    let twice = get_elements_with_same_attributes(&once)?;
    assert_eq!(once.collect()?, twice.collect()?);
    // story 4 has no title
    assert_eq!(once.count()?, 5);
    Ok(())
}

#[test]
fn empty_dataset_propagates_empty_error() {
    let p = TestPipeline::new();
    let ds = from_vec(&p, Vec::<Record>::new());
    assert!(matches!(
        get_elements_with_same_attributes(&ds),
        Err(Error::EmptyDataset { .. })
    ));
}

#[test]
fn counts_first_and_attribute_union() -> anyhow::Result<()> {
    let p = TestPipeline::new();
    let stories = sample_stories();
    let ds = from_vec(&p, stories.clone());

    assert_eq!(count_elements_in_dataset(&ds)?, 6);
    assert_eq!(get_first_element(&ds)?, stories[0]);
    assert_eq!(
        get_all_attributes(&ds)?,
        vec!["author", "created_at_i", "objectID", "points", "title"]
    );
    Ok(())
}
