use hnstats::testing::*;
use hnstats::{Error, Pipeline, Runner, from_iter, from_partitions, from_vec};

#[test]
fn map_filter_flat_map_chain() -> anyhow::Result<()> {
    let p = TestPipeline::new();
    let lines = from_vec(
        &p,
        vec![
            "The quick brown fox".to_string(),
            "jumps over the lazy dog".to_string(),
        ],
    );

    let words = lines.flat_map(|s: &String| {
        s.split_whitespace()
            .map(str::to_lowercase)
            .collect::<Vec<_>>()
    });
    let long = words.filter(|w: &String| w.len() >= 4).map(|w: &String| w.len());

    // each source line lands in its own partition, so order is preserved
    assert_eq!(long.collect()?, vec![5, 5, 5, 4, 4]);
    Ok(())
}

#[test]
fn source_is_reusable_after_transform() -> anyhow::Result<()> {
    let p = TestPipeline::new();
    let nums = from_vec(&p, (1..=10).collect::<Vec<u32>>());
    let evens = nums.filter(|n: &u32| n % 2 == 0);

    assert_eq!(evens.count()?, 5);
    assert_eq!(nums.count()?, 10);
    assert_eq!(nums.collect()?, (1..=10).collect::<Vec<_>>());
    Ok(())
}

#[test]
fn count_sums_every_partition() -> anyhow::Result<()> {
    let p = Pipeline::default();
    let parts = vec![vec![1u8, 2], vec![], vec![3, 4, 5], vec![6]];
    let ds = from_partitions(&p, parts);
    assert_eq!(ds.count()?, 6);
    assert_eq!(ds.collect_partitions()?.len(), 4);
    Ok(())
}

#[test]
fn first_follows_partition_order() -> anyhow::Result<()> {
    let p = TestPipeline::new();
    let ds = from_partitions(&p, vec![vec![], vec![7u32, 8], vec![1]]);
    assert_eq!(ds.first()?, 7);
    assert_eq!(ds.filter(|n: &u32| *n < 5).first()?, 1);
    Ok(())
}

#[test]
fn first_on_empty_dataset_fails() {
    let p = TestPipeline::new();
    let ds = from_vec(&p, Vec::<u32>::new());
    assert!(matches!(
        ds.first(),
        Err(Error::EmptyDataset { action: "first" })
    ));

    let filtered = from_vec(&p, vec![1u32, 2, 3]).filter(|_| false);
    assert!(matches!(filtered.first(), Err(Error::EmptyDataset { .. })));
}

#[test]
fn first_after_barrier_sees_reduced_output() -> anyhow::Result<()> {
    let p = TestPipeline::new();
    let ds = from_vec(&p, vec![("a", 1u32), ("a", 2)]).reduce_by_key(|a, b| a + b);
    assert_eq!(ds.first()?, ("a", 3));
    Ok(())
}

#[test]
fn preset_partitions_ignore_runner_count() -> anyhow::Result<()> {
    let p = Pipeline::with_runner(Runner::sequential(8));
    let ds = from_partitions(&p, vec![vec!["x"], vec!["y", "z"]]);
    let parts = ds.map(|s: &&str| s.to_uppercase()).collect_partitions()?;
    assert_eq!(parts, vec![vec!["X".to_string()], vec!["Y".to_string(), "Z".to_string()]]);
    Ok(())
}

#[test]
fn flat_sources_use_runner_partition_count() -> anyhow::Result<()> {
    let p = TestPipeline::with_partitions(4);
    let parts = from_vec(&p, (0..10u32).collect()).collect_partitions()?;
    assert_eq!(parts.len(), 4);
    assert_eq!(parts.concat(), (0..10).collect::<Vec<_>>());
    Ok(())
}

#[test]
fn explain_fuses_element_wise_ops() -> anyhow::Result<()> {
    let p = TestPipeline::new();
    let ds = from_vec(&p, vec![1u32, 2, 3])
        .map(|n: &u32| n * 2)
        .filter(|n: &u32| *n > 2)
        .map(|n: &u32| (n % 2, 1u64))
        .reduce_by_key(|a, b| a + b)
        .map(|kv: &(u32, u64)| kv.1);
    let plan = ds.explain()?;
    assert!(plan.starts_with("source("), "{plan}");
    assert!(plan.ends_with("| map -> filter -> map | reduce_by_key | map"), "{plan}");
    Ok(())
}

#[test]
fn parallel_and_sequential_agree() -> anyhow::Result<()> {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let data: Vec<u64> = (0..1_000).collect();
    let seq = Pipeline::with_runner(Runner::sequential(5));
    let par = Pipeline::with_runner(Runner::parallel(Some(3), Some(7)));

    let run = |p: &Pipeline| -> hnstats::Result<Vec<(u64, u64)>> {
        from_vec(p, data.clone())
            .map(|n: &u64| (n % 10, *n))
            .reduce_by_key(|a, b| a + b)
            .collect_sorted()
    };
    assert_eq!(run(&seq)?, run(&par)?);
    assert_eq!(from_vec(&par, data.clone()).collect()?, data);
    Ok(())
}

#[test]
fn from_iter_collects_any_iterator() -> anyhow::Result<()> {
    let p = TestPipeline::new();
    let squares = from_iter(&p, (1..=4u64).map(|n| n * n));
    assert_eq!(squares.reduce(|a, b| a + b)?, 30);
    assert_eq!(squares.collect()?, vec![1, 4, 9, 16]);
    Ok(())
}

#[test]
fn explicit_runner_overrides_pipeline_runner() -> anyhow::Result<()> {
    let p = TestPipeline::new();
    let ds = from_vec(&p, (0..100u32).collect())
        .filter(|n: &u32| n % 3 == 0)
        .map(|n: &u32| n * 2);
    let override_runner = Runner::parallel(Some(2), Some(6));

    assert_eq!(ds.count_with(&override_runner)?, ds.count()?);
    assert_eq!(ds.collect_with(&override_runner)?, ds.collect()?);

    let keyed = ds.map(|n: &u32| (n % 4, 1u64)).reduce_by_key(|a, b| a + b);
    let mut with_override = keyed.collect_with(&override_runner)?;
    with_override.sort();
    assert_eq!(with_override, keyed.collect_sorted()?);
    Ok(())
}
