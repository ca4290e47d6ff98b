#![no_main]
use arbitrary::Arbitrary;
use bson_stream::{Decoder, DocumentBuf};
use libfuzzer_sys::fuzz_target;

#[derive(Debug, Arbitrary)]
struct Input {
    bytes: Vec<u8>,
    split: usize,
}

fuzz_target!(|input: Input| {
    let split = input.split % (input.bytes.len() + 1);

    let mut whole = Vec::new();
    let mut decoder = Decoder::new(|d: DocumentBuf| whole.push(d));
    let whole_result = decoder.feed_many(&input.bytes).map(|_| ()).map_err(|e| e.offset);
    drop(decoder);

    let mut parts = Vec::new();
    let mut decoder = Decoder::new(|d: DocumentBuf| parts.push(d));
    let parts_result = decoder
        .feed_many(&input.bytes[..split])
        .and_then(|_| decoder.feed_many(&input.bytes[split..]))
        .map(|_| ())
        .map_err(|e| e.offset);
    drop(decoder);

    assert_eq!(whole_result, parts_result);
    assert_eq!(whole, parts);
});
