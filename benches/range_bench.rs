use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use range_coder::{pack_i16, BinarySearch, CumFreqTable, RangeDecoder, RangeEncoder, Simd256};

fn skewed_table() -> CumFreqTable {
    let freqs: Vec<u32> = (0..256u32).map(|i| 1 + (255 - i) * (255 - i) / 128).collect();
    CumFreqTable::from_frequencies(&freqs).unwrap()
}

fn encode(input: &[usize], table: &CumFreqTable) -> Vec<u8> {
    let cum_freq = table.as_slice();
    let mut encoder = RangeEncoder::new(Vec::with_capacity(input.len()));
    for &s in input {
        encoder
            .encode(cum_freq[s], cum_freq[s + 1], table.total())
            .unwrap();
    }
    encoder.finish().unwrap()
}

fn bench_range_coder(c: &mut Criterion) {
    let mut group = c.benchmark_group("range_coder");
    let table = skewed_table();
    let input = (0..10_000usize)
        .map(|i| (i * i + i / 3) % 256)
        .collect::<Vec<_>>();
    group.throughput(Throughput::Elements(input.len() as u64));

    group.bench_function("encode", |b| b.iter(|| encode(&input, &table)));

    let bytes = encode(&input, &table);

    group.bench_function("decode_binary", |b| {
        b.iter(|| {
            let mut decoder: RangeDecoder<&[u8]> = RangeDecoder::new(&bytes[..]).unwrap();
            for _ in 0..input.len() {
                decoder.decode(table.total(), table.as_slice()).unwrap();
            }
        })
    });

    let packed = pack_i16(&table, i16::MIN).unwrap();
    group.bench_function("decode_simd256", |b| {
        b.iter(|| {
            let mut decoder = RangeDecoder::with_search(&bytes[..], Simd256::new()).unwrap();
            for _ in 0..input.len() {
                decoder.decode(table.total(), &packed).unwrap();
            }
        })
    });

    group.bench_function("decode_binary_i16", |b| {
        let search = BinarySearch::<i16>::with_base(i32::from(i16::MIN));
        b.iter(|| {
            let mut decoder = RangeDecoder::with_search(&bytes[..], search).unwrap();
            for _ in 0..input.len() {
                decoder.decode(table.total(), &packed).unwrap();
            }
        })
    });
}

fn bench_alphabet_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("alphabet_size");
    for symbols in [2usize, 16, 256, 1024] {
        let table = CumFreqTable::from_frequencies(&vec![3; symbols]).unwrap();
        let input = (0..10_000usize)
            .map(|i| (i * 7 + i / 5) % symbols)
            .collect::<Vec<_>>();
        let bytes = encode(&input, &table);
        group.throughput(Throughput::Elements(input.len() as u64));

        group.bench_with_input(BenchmarkId::new("encode", symbols), &input, |b, input| {
            b.iter(|| encode(input, &table))
        });
        group.bench_with_input(BenchmarkId::new("decode", symbols), &bytes, |b, bytes| {
            b.iter(|| {
                let mut decoder: RangeDecoder<&[u8]> = RangeDecoder::new(&bytes[..]).unwrap();
                for _ in 0..input.len() {
                    decoder.decode(table.total(), table.as_slice()).unwrap();
                }
            })
        });
    }
}

criterion_group!(benches, bench_range_coder, bench_alphabet_size);
criterion_main!(benches);
