use range_coder::{pack_i16, CumFreqTable, RangeDecoder, RangeEncoder, Simd256};

fn main() {
    let freqs: Vec<u32> = (0..256u32).map(|i| 1 + (255 - i) * (255 - i) / 128).collect();
    let table = CumFreqTable::from_frequencies(&freqs).expect("valid table");
    let packed = pack_i16(&table, i16::MIN).expect("fits in i16");
    let cum_freq = table.as_slice();
    let total = table.total();
    let input = (0..100_000usize)
        .map(|i| (i * 7 + i / 3) % 256)
        .collect::<Vec<_>>();

    for _ in 0..100 {
        let mut encoder = RangeEncoder::new(Vec::with_capacity(input.len()));
        for &s in &input {
            encoder
                .encode(cum_freq[s], cum_freq[s + 1], total)
                .expect("vec sink");
        }
        let bytes = encoder.finish().expect("vec sink");

        let mut decoder =
            RangeDecoder::with_search(&bytes[..], Simd256::new()).expect("slice source");
        for &s in &input {
            let decoded = decoder.decode(total, &packed).expect("slice source");
            assert_eq!(decoded, s);
        }
    }
}
