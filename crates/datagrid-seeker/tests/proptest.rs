//! Property-based tests for seeker using proptest.

use datagrid_seeker::{compare_scalars, Dir, LikePattern, MemoryQuery, Record, RecordQuery, Scalar};
use proptest::prelude::*;

fn record_strategy() -> impl Strategy<Value = Record> {
    (any::<i64>(), "[a-zA-Z .()+*?]{0,12}").prop_map(|(n, name)| {
        Record::new().with("t_value", n).with("t_name", name)
    })
}

fn scalar_strategy() -> impl Strategy<Value = Scalar> {
    prop_oneof![
        Just(Scalar::Null),
        any::<bool>().prop_map(Scalar::from),
        any::<i64>().prop_map(Scalar::from),
        any::<u64>().prop_map(Scalar::from),
        (-1.0e20f64..1.0e20).prop_map(Scalar::from),
        "-?[0-9]{1,3}(\\.[0-9])?".prop_map(Scalar::from),
        "[0-9]{1,3}[a-z]{0,2}".prop_map(Scalar::from),
        "[a-z]{0,4}".prop_map(Scalar::from),
    ]
}

proptest! {
    /// Scalar comparison is a total order, whatever the mix of kinds.
    #[test]
    fn scalar_order_is_transitive(
        a in scalar_strategy(),
        b in scalar_strategy(),
        c in scalar_strategy(),
    ) {
        use std::cmp::Ordering::*;
        let ab = compare_scalars(&a, &b);
        let bc = compare_scalars(&b, &c);
        let ac = compare_scalars(&a, &c);
        prop_assert_eq!(compare_scalars(&b, &a), ab.reverse());
        if ab != Greater && bc != Greater {
            prop_assert_ne!(ac, Greater);
        }
        if ab == Equal && bc == Equal {
            prop_assert_eq!(ac, Equal);
        }
        if ab == Less && bc != Greater {
            prop_assert_eq!(ac, Less);
        }
    }

    /// Sorting a column that mixes numbers and text never fails.
    #[test]
    fn mixed_column_sorts(values in prop::collection::vec(scalar_strategy(), 0..200)) {
        let rows: Vec<Record> = values.into_iter().map(|v| Record::new().with("t_code", v)).collect();
        let mut backend = MemoryQuery::new(rows);
        backend.add_order_by("t.code", Dir::Asc);
        let sorted = backend.execute().unwrap();
        let null = Scalar::Null;
        for pair in sorted.windows(2) {
            let a = pair[0].lookup("t.code").unwrap_or(&null);
            let b = pair[1].lookup("t.code").unwrap_or(&null);
            prop_assert_ne!(compare_scalars(a, b), std::cmp::Ordering::Greater);
        }
    }

    /// Wrapping any text in `%` matches every string containing it.
    #[test]
    fn contains_pattern_matches_superstrings(
        prefix in "[a-z .()+*?]{0,8}",
        needle in "[a-z .()+*?]{0,8}",
        suffix in "[a-z .()+*?]{0,8}",
    ) {
        let pattern = LikePattern::new(&format!("%{}%", needle)).unwrap();
        let haystack = format!("{}{}{}", prefix, needle.to_uppercase(), suffix);
        prop_assert!(pattern.is_match(&haystack));
    }

    /// A pattern without wildcards matches exactly its own text.
    #[test]
    fn literal_pattern_matches_itself(text in "[a-z .()+*?]{0,16}") {
        let pattern = LikePattern::new(&text).unwrap();
        prop_assert!(pattern.is_match(&text));
        let longer = format!("{}x", text);
        prop_assert!(!pattern.is_match(&longer));
    }

    /// Paging never yields more than the limit, and count ignores paging.
    #[test]
    fn paging_is_bounded(
        rows in prop::collection::vec(record_strategy(), 0..40),
        limit in 1usize..10,
        offset in 0usize..50,
    ) {
        let total = rows.len();
        let mut backend = MemoryQuery::new(rows);
        backend.set_limit(limit);
        backend.set_offset(offset);

        let page = backend.execute().unwrap();
        prop_assert!(page.len() <= limit);
        prop_assert_eq!(page.len(), total.saturating_sub(offset).min(limit));
        prop_assert_eq!(backend.count().unwrap(), total);
    }

    /// Ascending order yields a non-decreasing sequence.
    #[test]
    fn ascending_order_is_sorted(rows in prop::collection::vec(record_strategy(), 0..40)) {
        let mut backend = MemoryQuery::new(rows);
        backend.add_order_by("t.value", Dir::Asc);
        let sorted = backend.execute().unwrap();
        let null = Scalar::Null;
        for pair in sorted.windows(2) {
            let a = pair[0].lookup("t.value").unwrap_or(&null);
            let b = pair[1].lookup("t.value").unwrap_or(&null);
            prop_assert_ne!(compare_scalars(a, b), std::cmp::Ordering::Greater);
        }
    }
}
