use std::io::Cursor;

use assert_matches::assert_matches;
use bson::{doc, Document};
use bson_stream::{
    decode_from_reader,
    Decoder,
    DecoderOptions,
    DocumentBuf,
    ErrorKind,
    MIN_BSON_DOCUMENT_SIZE,
};
use pretty_assertions::assert_eq;

use crate::{sample_documents, to_bytes};

const A_ONE: [u8; 12] = [
    0x0C, 0x00, 0x00, 0x00, 0x10, 0x61, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00,
];

#[test]
fn a_equals_one_encodes_as_expected() {
    assert_eq!(to_bytes(&doc! { "a": 1 }), A_ONE.to_vec());
}

#[test]
fn single_document() {
    let mut docs = Vec::new();
    let mut decoder = Decoder::new(|doc: DocumentBuf| docs.push(doc));
    assert_eq!(decoder.feed_many(&A_ONE).unwrap(), 12);
    drop(decoder);

    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].as_bytes(), &A_ONE[..]);
}

#[test]
fn back_to_back_documents() {
    let reference = doc! { "a": 1 };
    let mut count = 0;
    let mut decoder = Decoder::new(|doc: DocumentBuf| {
        count += 1;
        let parsed = Document::from_reader(doc.reader()).unwrap();
        assert_eq!(parsed, reference);
    });

    let mut input = A_ONE.to_vec();
    input.extend_from_slice(&A_ONE);
    decoder.feed_many(&input).unwrap();
    assert!(decoder.is_idle());
    drop(decoder);

    assert_eq!(count, 2);
}

#[test]
fn every_sample_survives_bulk_and_bytewise_feeding() {
    for doc in sample_documents() {
        let bytes = to_bytes(&doc);

        let mut bulk = Vec::new();
        let mut decoder = Decoder::new(|d: DocumentBuf| bulk.push(d));
        decoder.feed_many(&bytes).unwrap();
        drop(decoder);

        let mut bytewise = Vec::new();
        let mut decoder = Decoder::new(|d: DocumentBuf| bytewise.push(d));
        for byte in &bytes {
            decoder.feed(*byte).unwrap();
        }
        drop(decoder);

        assert_eq!(bulk, bytewise);
        assert_eq!(bulk.len(), 1);
        assert_eq!(bulk[0].as_bytes(), bytes.as_slice());

        let raw = bulk.remove(0).into_bytes();
        assert_eq!(Document::from_reader(raw.as_slice()).unwrap(), doc);
    }
}

#[test]
fn handler_runs_only_on_the_final_byte() {
    let bytes = to_bytes(&doc! { "a": 1, "b": [1, 2, 3], "c": { "a": 1 } });
    let (last, rest) = bytes.split_last().unwrap();

    let mut count = 0;
    let mut decoder = Decoder::new(|_: DocumentBuf| count += 1);
    decoder.feed_many(rest).unwrap();
    assert_eq!(decoder.documents_decoded(), 0);
    assert_eq!(decoder.bytes_read() as usize, rest.len());

    decoder.feed(*last).unwrap();
    assert_eq!(decoder.documents_decoded(), 1);
    drop(decoder);
    assert_eq!(count, 1);
}

#[test]
fn empty_document() {
    let bytes = to_bytes(&doc! {});
    assert_eq!(bytes.len() as u32, MIN_BSON_DOCUMENT_SIZE);

    let mut docs = Vec::new();
    let mut decoder = Decoder::new(|doc: DocumentBuf| docs.push(doc));
    decoder.feed_many(&bytes).unwrap();
    drop(decoder);
    assert_eq!(docs, vec![bytes]);
}

#[test]
fn oversized_document_never_reaches_handler() {
    let bytes = to_bytes(&sample_documents()[4]);
    let options = DecoderOptions::builder().max_document_size(64 * 1024).build();

    let mut count = 0;
    let mut decoder = Decoder::with_options(|_: DocumentBuf| count += 1, options);
    decoder.feed_many(&A_ONE).unwrap();

    let err = decoder.feed_many(&bytes).unwrap_err();
    assert_matches!(
        err.kind,
        ErrorKind::DocumentTooLarge { max, .. } if max == 64 * 1024
    );
    assert_eq!(err.offset, Some(12 + 3));
    assert!(decoder.is_poisoned());
    assert_matches!(
        decoder.feed(0).unwrap_err().kind,
        ErrorKind::Poisoned
    );
    drop(decoder);

    assert_eq!(count, 1);
}

#[test]
fn fresh_decoder_after_failure() {
    let mut decoder = Decoder::new(Sink { docs: Vec::new() });
    decoder.feed_int(300).unwrap_err();
    assert!(decoder.is_poisoned());

    let mut decoder = Decoder::new(decoder.into_handler());
    decoder.feed_many(&A_ONE).unwrap();
    assert_eq!(decoder.handler().docs.len(), 1);
}

#[test]
fn reader_driven_decoding() {
    let docs = sample_documents();
    let mut input = Vec::new();
    for doc in &docs {
        input.extend(to_bytes(doc));
    }

    let mut seen = Vec::new();
    let count = decode_from_reader(Cursor::new(&input), |doc: DocumentBuf| {
        seen.push(Document::from_reader(doc.reader()).unwrap())
    })
    .unwrap();

    assert_eq!(count, docs.len() as u64);
    assert_eq!(seen, docs);
}

#[test]
fn truncated_stream_discards_partial_document() {
    let mut input = A_ONE.to_vec();
    input.extend_from_slice(&A_ONE[..7]);

    let mut count = 0;
    let mut decoder = Decoder::new(|_: DocumentBuf| count += 1);
    assert_eq!(decoder.feed_reader(input.as_slice()).unwrap(), 1);
    assert!(!decoder.is_idle());
    assert_eq!(decoder.bytes_read(), 7);
    assert_eq!(decoder.declared_len(), 12);
    drop(decoder);

    assert_eq!(count, 1);
    assert_eq!(decode_from_reader(&A_ONE[..7], |_: DocumentBuf| {}).unwrap(), 0);
}

struct Sink {
    docs: Vec<DocumentBuf>,
}

impl bson_stream::DocumentHandler for Sink {
    fn handle_document(&mut self, document: DocumentBuf) {
        self.docs.push(document);
    }
}
