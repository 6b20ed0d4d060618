use proptest::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use range_coder::{
    pack_i16, BinarySearch, CumFreqTable, Error, Frequency, RangeDecoder, RangeEncoder, Simd256,
    SymbolDecoder, SymbolEncoder, SymbolSearch,
};

fn encode(input: &[usize], table: &CumFreqTable) -> Vec<u8> {
    let mut encoder = SymbolEncoder::new(Vec::new());
    encoder.encode(input, table).unwrap();
    encoder.finish().unwrap()
}

fn decode(bytes: &[u8], count: usize, table: &CumFreqTable) -> Vec<usize> {
    SymbolDecoder::new(bytes)
        .unwrap()
        .decode(count, table)
        .unwrap()
}

/// Draw `n` symbols distributed according to `table`.
fn sample(rng: &mut StdRng, table: &CumFreqTable, n: usize) -> Vec<usize> {
    let search = BinarySearch::<u32>::new();
    (0..n)
        .map(|_| search.find(table.as_slice(), rng.gen_range(0..table.total())))
        .collect()
}

#[test]
fn test_end_to_end_alternating() {
    let table = CumFreqTable::new(vec![0, 1, 2]).unwrap();
    let input = vec![0, 1, 0, 1, 0, 1, 0, 1];
    let bytes = encode(&input, &table);
    assert_eq!(bytes, vec![0x54]);
    assert_eq!(decode(&bytes, 8, &table), input);
}

#[test]
fn test_reference_vector() {
    let table = CumFreqTable::new(vec![0, 4, 6, 8]).unwrap();
    let input: Vec<usize> = [0, 0, 0, 0, 1, 2].repeat(17);
    let bytes = encode(&input, &table);

    assert_eq!(bytes.len(), 17);
    assert_eq!(&bytes[..4], &[0x0b, 0x0b, 0x0b, 0x01]);
    assert!(bytes[4..].iter().all(|&b| b == 0x0b));
    assert_eq!(decode(&bytes, input.len(), &table), input);
}

#[test]
fn test_carry_across_held_ff_bytes() {
    let table = CumFreqTable::new(vec![0, 1, 255, 256]).unwrap();
    let input = vec![0, 2, 0, 0, 2, 1];
    let bytes = encode(&input, &table);
    assert_eq!(bytes, vec![0x00, 0xff, 0x00, 0x00, 0x00, 0x00]);
    assert_eq!(decode(&bytes, input.len(), &table), input);
}

#[test]
fn test_alphabet_sizes() {
    let mut rng = StdRng::seed_from_u64(7);
    for symbols in [1usize, 2, 256, 1024] {
        let freqs: Vec<u32> = (0..symbols).map(|_| rng.gen_range(1..=64)).collect();
        let table = CumFreqTable::from_frequencies(&freqs).unwrap();
        let input = sample(&mut rng, &table, 3000);
        let bytes = encode(&input, &table);
        assert_eq!(decode(&bytes, input.len(), &table), input, "M = {symbols}");
    }
}

#[test]
fn test_skewed_table_with_rare_symbols() {
    let mut freqs = vec![1u32; 16];
    freqs[3] = (1 << 24) - 15;
    let table = CumFreqTable::from_frequencies(&freqs).unwrap();
    assert_eq!(table.total(), 1 << 24);

    let mut input = vec![3usize; 500];
    for i in (0..500).step_by(37) {
        input[i] = i % 16;
    }
    let bytes = encode(&input, &table);
    assert_eq!(decode(&bytes, input.len(), &table), input);
}

#[test]
fn test_deterministic_output() {
    let mut rng = StdRng::seed_from_u64(11);
    let table = CumFreqTable::from_frequencies(&[5, 1, 9, 30, 2]).unwrap();
    let input = sample(&mut rng, &table, 5000);
    assert_eq!(encode(&input, &table), encode(&input, &table));
}

#[test]
fn test_output_close_to_entropy() {
    let mut rng = StdRng::seed_from_u64(1234);
    let table = CumFreqTable::from_frequencies(&[1, 3, 12, 48, 192]).unwrap();
    let input = sample(&mut rng, &table, 20_000);

    let total = f64::from(table.total());
    let ideal_bits: f64 = input
        .iter()
        .map(|&s| -(f64::from(table.frequency(s).unwrap()) / total).log2())
        .sum();
    let actual_bits = (encode(&input, &table).len() * 8) as f64;

    assert!(actual_bits <= ideal_bits * 1.01 + 64.0, "{actual_bits} vs {ideal_bits}");
    assert!(actual_bits >= ideal_bits - 64.0, "{actual_bits} vs {ideal_bits}");
}

#[test]
fn test_rejections() {
    let mut encoder = SymbolEncoder::new(Vec::new());
    let zero = CumFreqTable::new(vec![0, 0, 5]).unwrap();
    assert!(matches!(
        encoder.encode(&[0], &zero),
        Err(Error::ZeroFrequency { symbol: 0 })
    ));
    assert!(matches!(
        CumFreqTable::new(vec![1, 2, 3]),
        Err(Error::NonZeroStart(1))
    ));
    assert!(matches!(
        CumFreqTable::new(vec![0, 5, 4]),
        Err(Error::Decreasing { index: 2 })
    ));
    assert!(matches!(
        CumFreqTable::new(vec![0, 5, 1 << 25]),
        Err(Error::ResolutionTooLarge { .. })
    ));
    assert!(matches!(
        CumFreqTable::new(vec![0, u32::MAX]),
        Err(Error::ResolutionTooLarge { .. })
    ));
}

#[test]
fn test_decoding_more_than_encoded() {
    let table = CumFreqTable::new(vec![0, 2, 5, 7, 10, 14]).unwrap();
    let input = vec![4, 0, 3];
    let bytes = encode(&input, &table);
    let decoded = decode(&bytes, 1000, &table);
    assert_eq!(decoded.len(), 1000);
    assert_eq!(&decoded[..3], &input[..]);
}

#[test]
fn test_search_equivalence_random_tables() {
    let mut rng = StdRng::seed_from_u64(99);
    let simd = Simd256::new();
    let binary = BinarySearch::<u32>::new();
    for _ in 0..16 {
        let freqs: Vec<u32> = (0..256)
            .map(|_| if rng.gen_bool(0.2) { 0 } else { rng.gen_range(1..200) })
            .collect();
        let table = CumFreqTable::from_frequencies(&freqs).unwrap();
        let packed = pack_i16(&table, i16::MIN).unwrap();
        for pos in 0..table.total() {
            assert_eq!(
                simd.find(&packed, i16::from_position(pos, simd.base())),
                binary.find(table.as_slice(), pos)
            );
        }
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn prop_roundtrip(
        freqs in prop::collection::vec(0u32..5000, 1..40),
        picks in prop::collection::vec(any::<prop::sample::Index>(), 0..300),
    ) {
        prop_assume!(freqs.iter().any(|&f| f > 0));
        let table = CumFreqTable::from_frequencies(&freqs).unwrap();
        let live: Vec<usize> = (0..freqs.len()).filter(|&s| freqs[s] > 0).collect();
        let input: Vec<usize> = picks.iter().map(|i| live[i.index(live.len())]).collect();

        let bytes = encode(&input, &table);
        prop_assert_eq!(decode(&bytes, input.len(), &table), input);
    }

    #[test]
    fn prop_roundtrip_simd_and_binary_decoders(
        freqs in prop::collection::vec(1u32..255, 256),
        picks in prop::collection::vec(0usize..256, 1..400),
    ) {
        let table = CumFreqTable::from_frequencies(&freqs).unwrap();
        let bytes = encode(&picks, &table);
        let packed = pack_i16(&table, i16::MIN).unwrap();

        let mut simd = RangeDecoder::with_search(&bytes[..], Simd256::new()).unwrap();
        let mut binary: RangeDecoder<&[u8]> = RangeDecoder::new(&bytes[..]).unwrap();
        for &s in &picks {
            prop_assert_eq!(simd.decode(table.total(), &packed).unwrap(), s);
            prop_assert_eq!(binary.decode(table.total(), table.as_slice()).unwrap(), s);
        }
    }

    #[test]
    fn prop_core_matches_stream_layer(
        picks in prop::collection::vec(0usize..4, 0..200),
    ) {
        let table = CumFreqTable::new(vec![0, 7, 8, 100, 101]).unwrap();
        let cf = table.as_slice();
        let mut core = RangeEncoder::new(Vec::new());
        for &s in &picks {
            core.encode(cf[s], cf[s + 1], table.total()).unwrap();
        }
        prop_assert_eq!(core.finish().unwrap(), encode(&picks, &table));
    }
}
