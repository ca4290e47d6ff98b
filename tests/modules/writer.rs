use std::io::{BufWriter, Read, Seek, SeekFrom, Write};

use bson::{doc, Document};
use bson_stream::{DocumentBuf, DocumentReader, DocumentWriter, Error, ErrorKind};
use pretty_assertions::assert_eq;

use crate::{sample_documents, to_bytes};

#[test]
fn documents_written_through_a_stream() {
    let docs = sample_documents();
    let mut seen = Vec::new();

    {
        let sink = DocumentWriter::new(|doc: DocumentBuf| {
            seen.push(Document::from_reader(doc.reader()).unwrap())
        });
        let mut writer = BufWriter::with_capacity(7, sink);
        for doc in &docs {
            doc.to_writer(&mut writer).unwrap();
        }
        writer.flush().unwrap();
    }

    assert_eq!(seen, docs);
}

#[test]
fn copy_between_reader_and_writer() {
    let bytes = to_bytes(&doc! { "a": 1, "b": [1, 2, 3], "c": { "a": 1 } });
    let mut copies: Vec<DocumentBuf> = Vec::new();

    let mut writer = DocumentWriter::new(|doc: DocumentBuf| copies.push(doc));
    for _ in 0..2 {
        let mut reader = DocumentReader::new(&bytes);
        std::io::copy(&mut reader, &mut writer).unwrap();
    }
    assert!(writer.get_ref().is_idle());
    drop(writer);

    assert_eq!(copies.len(), 2);
    for copy in &copies {
        assert_eq!(copy.as_bytes(), bytes.as_slice());
    }

    // round trip the first copy through its own reader
    let mut reader = copies[0].reader();
    reader.seek(SeekFrom::Start(4)).unwrap();
    let mut body = Vec::new();
    reader.read_to_end(&mut body).unwrap();
    assert_eq!(body, copies[0].body());
}

#[test]
fn write_reports_oversized_prefix() {
    let mut writer = DocumentWriter::new(|_: DocumentBuf| {});
    let err = writer
        .write_all(&(32 * 1024 * 1024u32).to_le_bytes())
        .unwrap_err();
    assert_eq!(err.kind(), std::io::ErrorKind::InvalidData);

    let inner = err.into_inner().unwrap().downcast::<Error>().unwrap();
    assert!(matches!(inner.kind, ErrorKind::DocumentTooLarge { .. }));
    assert_eq!(inner.offset, Some(3));
}
