//! 分片规划测试：区间边界、余数处理、退化输入，以及覆盖性质的 proptest。

use std::path::Path;

use proptest::prelude::*;

use crate::split_download::structs::{ByteRange, DownloadPlan, plan_ranges};

fn ranges(pairs: &[(u64, u64)]) -> Vec<ByteRange> {
    pairs
        .iter()
        .map(|&(start, end)| ByteRange { start, end })
        .collect()
}

#[test]
fn even_split_of_one_million_bytes() {
    let got = plan_ranges(1_000_000, 5);
    assert_eq!(
        got,
        ranges(&[
            (0, 199_999),
            (200_000, 399_999),
            (400_000, 599_999),
            (600_000, 799_999),
            (800_000, 999_999),
        ])
    );
}

#[test]
fn last_segment_absorbs_remainder() {
    let got = plan_ranges(10, 3);
    assert_eq!(got, ranges(&[(0, 2), (3, 5), (6, 9)]));
}

#[test]
fn single_division_covers_everything() {
    assert_eq!(plan_ranges(1234, 1), ranges(&[(0, 1233)]));
}

#[test]
fn fewer_bytes_than_divisions_gives_one_byte_segments() {
    assert_eq!(plan_ranges(3, 5), ranges(&[(0, 0), (1, 1), (2, 2)]));
}

#[test]
fn zero_length_resource_has_no_segments() {
    assert!(plan_ranges(0, 5).is_empty());
}

#[test]
fn zero_division_is_treated_as_one() {
    assert_eq!(plan_ranges(8, 0), ranges(&[(0, 7)]));
}

#[test]
fn plan_assigns_distinct_storage_paths() {
    let dir = Path::new("/tmp/split-dl-test");
    let plan = DownloadPlan::build(100, 4, dir, "data.bin");

    assert_eq!(plan.len(), 4);
    assert_eq!(plan.total_length(), 100);
    for (i, segment) in plan.segments().iter().enumerate() {
        assert_eq!(segment.index, i);
        assert_eq!(segment.storage_path, dir.join(format!("{}_data.bin", i)));
        assert_eq!(segment.byte_len(), 25);
    }
}

#[test]
fn empty_plan_reports_empty() {
    let plan = DownloadPlan::build(0, 3, Path::new("/tmp"), "x");
    assert!(plan.is_empty());
    assert_eq!(plan.total_length(), 0);
}

proptest! {
    #[test]
    fn ranges_tile_the_resource(total in 1u64..5_000_000, division in 1usize..64) {
        let got = plan_ranges(total, division);
        let expected_count = (division as u64).min(total) as usize;

        prop_assert_eq!(got.len(), expected_count);
        prop_assert_eq!(got[0].start, 0);
        prop_assert_eq!(got[got.len() - 1].end, total - 1);

        for pair in got.windows(2) {
            prop_assert_eq!(pair[0].end + 1, pair[1].start);
        }
        for r in &got {
            prop_assert!(r.start <= r.end);
        }

        let sum: u64 = got.iter().map(|r| r.end - r.start + 1).sum();
        prop_assert_eq!(sum, total);
    }
}
