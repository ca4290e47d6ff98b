#![no_main]
#[macro_use] extern crate libfuzzer_sys;
extern crate bson_stream;
use bson_stream::{Decoder, DecoderOptions, DocumentBuf};

fuzz_target!(|buf: &[u8]| {
    if buf.len() >= 4 {
        // Focus on length prefix manipulation with a small ceiling
        let options = DecoderOptions::builder().max_document_size(4096).build();
        let mut decoder = Decoder::with_options(
            |doc: DocumentBuf| assert_eq!(doc.len(), doc.declared_len() as usize),
            options,
        );
        let _ = decoder.feed_many(buf);
    }
});
