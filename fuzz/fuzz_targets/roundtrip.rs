#![no_main]
use libfuzzer_sys::fuzz_target;
use range_coder::{CumFreqTable, RangeDecoder, SymbolDecoder, SymbolEncoder};

fuzz_target!(|data: (Vec<u8>, Vec<u16>, Vec<u8>)| {
    let (input_bytes, freqs, stream) = data;
    let freqs: Vec<u32> = freqs.iter().take(64).map(|&f| u32::from(f)).collect();
    let table = match CumFreqTable::from_frequencies(&freqs) {
        Ok(table) => table,
        Err(_) => return,
    };

    // Arbitrary bytes must decode without faulting.
    let mut decoder: RangeDecoder<&[u8]> = RangeDecoder::new(&stream[..]).unwrap();
    for _ in 0..stream.len() + 8 {
        let s = decoder.decode(table.total(), table.as_slice()).unwrap();
        assert!(table.frequency(s).unwrap() > 0);
    }

    let input: Vec<usize> = input_bytes
        .iter()
        .map(|&b| b as usize % table.symbols())
        .filter(|&s| table.frequency(s).unwrap() > 0)
        .collect();

    let mut encoder = SymbolEncoder::new(Vec::new());
    encoder.encode(&input, &table).unwrap();
    let bytes = encoder.finish().unwrap();

    let mut decoder = SymbolDecoder::new(&bytes[..]).unwrap();
    assert_eq!(decoder.decode(input.len(), &table).unwrap(), input);
});
