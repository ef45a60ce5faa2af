//! Property-based tests for the line classifier and record parsers

use proptest::prelude::*;
use tracedeltas::{classify, record};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    // Any "<k> ns" delta line parses back to exactly k nanoseconds.
    #[test]
    fn prop_delta_token_round_trips(
        value in 0u64..=u32::MAX as u64,
        line in 1u32..10_000,
    ) {
        let text = format!("src.c +{line} . some_fn {value} ns");
        let rec = record::parse_summary_delta(&text).unwrap();
        prop_assert_eq!(rec.t_delta_ns(), Some(value));
        prop_assert_eq!(rec.location, format!("src.c+{line}"));
        prop_assert_eq!(rec.message, "some_fn");
    }

    // The filter's own output shape recovers location/message/duration.
    #[test]
    fn prop_filter_output_round_trips(
        file in "[a-z]{1,8}",
        line in 1u32..10_000,
        message in "[a-z_]{1,12}( [a-z_]{1,8})?",
        value in 0u64..1_000_000_000,
    ) {
        let rendered = format!("block/{file}.c+{line}\t{message}\tt_delta: {value} ns");
        let rec = record::parse_filter_delta(&rendered).unwrap();
        prop_assert_eq!(&rec.location, &format!("block/{file}.c+{line}"));
        prop_assert_eq!(&rec.message, &message);
        prop_assert_eq!(rec.t_delta_ns(), Some(value));
    }

    // Kernel lines with padded and unpadded line numbers parse to the
    // same joined location.
    #[test]
    fn prop_padded_location_joins(
        line in 1u32..10_000,
        value in 0u64..1_000_000_000,
    ) {
        let padded = format!("block/bfq.c + {line} work t_delta: {value} ns");
        let joined = format!("block/bfq.c +{line} work t_delta: {value} ns");
        let a = record::parse_kernel_delta(&padded).unwrap();
        let b = record::parse_kernel_delta(&joined).unwrap();
        prop_assert_eq!(&a.location, &format!("block/bfq.c+{line}"));
        prop_assert_eq!(&a.location, &b.location);
        prop_assert_eq!(a.t_delta_ns(), b.t_delta_ns());
    }

    // Classification never panics on arbitrary input.
    #[test]
    fn prop_classifier_never_panics(text in ".{0,120}") {
        if let Some(normalized) = classify::normalize(&text) {
            let _ = classify::classify(normalized);
        }
        let _ = classify::is_summary_candidate(&text);
        let _ = classify::with_percent(&text);
    }
}
