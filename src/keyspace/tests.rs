//! Keyspace Module Tests
//!
//! ## Test Scopes
//! - **Alphabet**: Presets, validation of custom symbol sets, wire representation.
//! - **Enumerator**: Mixed-radix encoding, inverse decoding, keyspace sizing.
//! - **Partitioner**: Coverage, balance and layout of `split` for nodes and workers.

#[cfg(test)]
mod tests {
    use crate::error::SearchError;
    use crate::keyspace::enumerator::{MAX_PASSWORD_LENGTH, size};
    use crate::keyspace::{Alphabet, Keyspace, SearchRange, node_range, split, split_range};
    use proptest::prelude::*;

    // ============================================================
    // ALPHABET TESTS
    // ============================================================

    #[test]
    fn test_printable_alphabet_has_94_symbols() {
        let alphabet = Alphabet::printable();

        assert_eq!(alphabet.len(), 94);
        assert_eq!(alphabet.symbol(0), b'!');
        assert_eq!(alphabet.symbol(93), b'~');
    }

    #[test]
    fn test_lower_alphanumeric_order() {
        let alphabet = Alphabet::lower_alphanumeric();

        assert_eq!(alphabet.len(), 36);
        assert_eq!(alphabet.digit_of(b'a'), Some(0));
        assert_eq!(alphabet.digit_of(b'z'), Some(25));
        assert_eq!(alphabet.digit_of(b'0'), Some(26));
        assert_eq!(alphabet.digit_of(b'A'), None);
    }

    #[test]
    fn test_alphabet_rejects_duplicates() {
        let result = Alphabet::new(b"abca");

        assert!(matches!(result, Err(SearchError::InvalidInput(_))));
    }

    #[test]
    fn test_alphabet_rejects_non_printable_and_tiny() {
        assert!(Alphabet::new(b"ab c").is_err(), "space is not printable");
        assert!(Alphabet::new(b"a").is_err());
        assert!(Alphabet::new(b"").is_err());
    }

    #[test]
    fn test_alphabet_from_str_presets_and_literal() {
        assert_eq!("printable".parse::<Alphabet>().unwrap(), Alphabet::printable());
        assert_eq!("lower-alnum".parse::<Alphabet>().unwrap().len(), 36);
        assert_eq!("xyz".parse::<Alphabet>().unwrap().symbols(), b"xyz");
    }

    #[test]
    fn test_alphabet_serializes_as_symbol_string() {
        let json = serde_json::to_string(&Alphabet::digits()).unwrap();
        assert_eq!(json, "\"0123456789\"");

        let back: Alphabet = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Alphabet::digits());

        let bad: Result<Alphabet, _> = serde_json::from_str("\"aa\"");
        assert!(bad.is_err());
    }

    // ============================================================
    // ENUMERATOR TESTS
    // ============================================================

    #[test]
    fn test_size_uses_integer_exponentiation() {
        assert_eq!(size(94, 1), Some(94));
        assert_eq!(size(94, 6), Some(689_869_781_056));
        assert_eq!(size(94, 9), Some(572_994_802_228_616_704));
        assert_eq!(size(94, 10), None, "94^10 overflows u64");
    }

    #[test]
    fn test_keyspace_rejects_bad_lengths() {
        assert!(Keyspace::new(Alphabet::printable(), 0).is_err());
        assert!(Keyspace::new(Alphabet::printable(), MAX_PASSWORD_LENGTH + 1).is_err());
        // Fits the length bound but not 64 bits.
        assert!(Keyspace::new(Alphabet::printable(), 10).is_err());
        assert!(Keyspace::new(Alphabet::digits(), 10).is_ok());
    }

    #[test]
    fn test_encode_first_and_last_index() {
        let keyspace = Keyspace::new(Alphabet::printable(), 3).unwrap();

        assert_eq!(keyspace.encode(0).unwrap(), b"!!!");
        assert_eq!(keyspace.encode(keyspace.size() - 1).unwrap(), b"~~~");
    }

    #[test]
    fn test_encode_leading_symbol_is_high_digit() {
        // Leading symbol = index / radix^(length-1).
        let keyspace = Keyspace::new(Alphabet::lower_alphanumeric(), 3).unwrap();
        let index = 2 * 36 * 36 + 5 * 36 + 7;

        assert_eq!(keyspace.encode(index).unwrap(), b"cfh");
    }

    #[test]
    fn test_encode_out_of_range_is_error() {
        let keyspace = Keyspace::new(Alphabet::digits(), 2).unwrap();

        assert!(keyspace.encode(99).is_ok());
        assert!(keyspace.encode(100).is_err());
    }

    #[test]
    fn test_encode_into_rejects_wrong_buffer() {
        let keyspace = Keyspace::new(Alphabet::digits(), 3).unwrap();
        let mut buf = [0u8; 2];

        assert!(keyspace.encode_into(5, &mut buf).is_err());
    }

    #[test]
    fn test_decode_known_candidate() {
        let keyspace = Keyspace::new(Alphabet::digits(), 4).unwrap();

        assert_eq!(keyspace.decode(b"0042").unwrap(), 42);
        assert_eq!(keyspace.decode(b"9999").unwrap(), 9999);
    }

    #[test]
    fn test_decode_rejects_foreign_symbols_and_length() {
        let keyspace = Keyspace::new(Alphabet::lowercase(), 3).unwrap();

        assert!(keyspace.decode(b"aB c").is_err());
        assert!(keyspace.decode(b"aBc").is_err());
        assert!(keyspace.decode(b"ab").is_err());
    }

    #[test]
    fn test_encode_decode_exhaustive_small_keyspace() {
        let keyspace = Keyspace::new(Alphabet::lowercase(), 2).unwrap();

        for index in 0..keyspace.size() {
            let candidate = keyspace.encode(index).unwrap();
            assert_eq!(keyspace.decode(&candidate).unwrap(), index);
        }
    }

    // ============================================================
    // PARTITIONER TESTS
    // ============================================================

    #[test]
    fn test_split_distributes_remainder_first() {
        let ranges = split(10, 3).unwrap();

        assert_eq!(
            ranges,
            vec![
                SearchRange::new(0, 4),
                SearchRange::new(4, 7),
                SearchRange::new(7, 10),
            ]
        );
    }

    #[test]
    fn test_split_more_parts_than_indices() {
        // Five workers over a range of three indices.
        let ranges = split_range(SearchRange::new(100, 103), 5).unwrap();

        assert_eq!(ranges.len(), 5);
        assert_eq!(ranges[0], SearchRange::new(100, 101));
        assert_eq!(ranges[2], SearchRange::new(102, 103));
        assert!(ranges[3].is_empty());
        assert!(ranges[4].is_empty());
    }

    #[test]
    fn test_split_zero_parts_is_error() {
        assert!(split(10, 0).is_err());
    }

    #[test]
    fn test_split_empty_total() {
        let ranges = split(0, 4).unwrap();

        assert_eq!(ranges.len(), 4);
        assert!(ranges.iter().all(SearchRange::is_empty));
    }

    #[test]
    fn test_node_range_matches_split() {
        let size = 36u64.pow(3);

        let node0 = node_range(size, 2, 0).unwrap();
        let node1 = node_range(size, 2, 1).unwrap();

        assert_eq!(node0, SearchRange::new(0, size / 2));
        assert_eq!(node1, SearchRange::new(size / 2, size));
        assert!(node_range(size, 2, 2).is_err());
    }

    #[test]
    fn test_node_range_huge_node_count_does_not_allocate() {
        // ARRANGE: far more nodes than indices, far more than could ever be materialized.
        let size = 94u64.pow(3);
        let total_nodes = 1usize << 40;

        // ACT
        let first = node_range(size, total_nodes, 0).unwrap();
        let last = node_range(size, total_nodes, total_nodes - 1).unwrap();

        // ASSERT
        assert_eq!(first, SearchRange::new(0, 1));
        assert!(last.is_empty());
        assert_eq!(last.start, size);
        assert!(node_range(size, 0, 0).is_err());
    }

    // ============================================================
    // PROPERTIES
    // ============================================================

    proptest! {
        #[test]
        fn prop_node_range_matches_split(total in 0u64..100_000, n in 1usize..64) {
            let ranges = split(total, n).unwrap();
            for (index, expected) in ranges.iter().enumerate() {
                prop_assert_eq!(node_range(total, n, index).unwrap(), *expected);
            }
        }

        #[test]
        fn prop_split_covers_exactly_once(total in 0u64..100_000, n in 1usize..64) {
            let ranges = split(total, n).unwrap();

            prop_assert_eq!(ranges.len(), n);
            let mut expected_start = 0;
            for range in &ranges {
                prop_assert_eq!(range.start, expected_start);
                expected_start = range.end;
            }
            prop_assert_eq!(expected_start, total);

            let max = ranges.iter().map(SearchRange::len).max().unwrap();
            let min = ranges.iter().map(SearchRange::len).min().unwrap();
            prop_assert!(max - min <= 1);
        }

        #[test]
        fn prop_decode_inverts_encode(length in 1usize..=6, seed in any::<u64>()) {
            let keyspace = Keyspace::new(Alphabet::printable(), length).unwrap();
            let index = seed % keyspace.size();

            let candidate = keyspace.encode(index).unwrap();
            prop_assert_eq!(keyspace.decode(&candidate).unwrap(), index);
        }
    }
}
