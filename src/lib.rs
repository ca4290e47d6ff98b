//! Streaming reconstruction of BSON documents from an arbitrarily chunked byte stream.
//!
//! BSON documents are self-delimiting: the first four bytes of every document hold its total
//! length, little-endian, prefix included. A stream of documents is simply those documents
//! concatenated with no separators. A [`Decoder`] consumes such a stream one byte or one chunk at
//! a time, however the bytes happen to be split up, and hands each completed document to a
//! caller-supplied handler as an owned [`DocumentBuf`].
//!
//! The decoder only frames documents. It does not validate their contents; the handler (which
//! might insert the document into a collection, parse it with the `bson` crate, or forward it to
//! another stream) is responsible for that.
//!
//! ## Basic usage
//!
//! ```rust
//! use bson_stream::{Decoder, DocumentBuf};
//!
//! // { "a": 1 }
//! let doc = b"\x0c\x00\x00\x00\x10a\x00\x01\x00\x00\x00\x00";
//!
//! let mut docs = Vec::new();
//! let mut decoder = Decoder::new(|doc: DocumentBuf| docs.push(doc));
//! decoder.feed_many(doc)?;
//! decoder.feed_many(doc)?;
//! drop(decoder);
//!
//! assert_eq!(docs.len(), 2);
//! assert_eq!(docs[0].as_bytes(), doc);
//! # Ok::<(), bson_stream::Error>(())
//! ```
//!
//! ## Stream adapters
//!
//! [`DocumentWriter`] exposes a decoder as a [`std::io::Write`] sink, and [`DocumentReader`]
//! exposes a document's bytes as a [`std::io::Read`] source, so documents can be piped through
//! existing IO code:
//!
//! ```rust
//! use bson_stream::{DocumentBuf, DocumentReader, DocumentWriter};
//!
//! let doc = b"\x05\x00\x00\x00\x00";
//! let mut copies = 0;
//! let mut writer = DocumentWriter::new(|d: DocumentBuf| {
//!     assert_eq!(d.as_bytes(), doc);
//!     copies += 1;
//! });
//! std::io::copy(&mut DocumentReader::new(doc), &mut writer)?;
//! drop(writer);
//! assert_eq!(copies, 1);
//! # Ok::<(), std::io::Error>(())
//! ```
//!
//! ## Errors
//!
//! A length prefix larger than [`DecoderOptions::max_document_size`] (16 MiB by default) or
//! smaller than the prefix itself is rejected as soon as its fourth byte arrives. Errors are
//! fatal to the decoder that raised them: framing state is lost, so construct a new decoder to
//! continue.

pub mod decoder;
mod document;
pub mod error;
mod reader;
mod writer;

pub use self::{
    decoder::{decode_from_reader, Decoder, DecoderOptions, DocumentHandler},
    document::DocumentBuf,
    error::{Error, ErrorKind, Result},
    reader::DocumentReader,
    writer::DocumentWriter,
};

/// The largest document, in bytes, accepted by default.
pub const MAX_BSON_SIZE: u32 = 16 * 1024 * 1024;

/// The size of the little-endian length prefix that begins every BSON document.
pub const LENGTH_PREFIX_SIZE: usize = 4;

/// The smallest well-formed BSON document: a length prefix and a terminating null byte.
///
/// The decoder itself only requires [`LENGTH_PREFIX_SIZE`] bytes.
pub const MIN_BSON_DOCUMENT_SIZE: u32 = 5;
