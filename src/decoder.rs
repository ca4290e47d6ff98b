//! The streaming decoder that frames BSON documents out of a byte stream.

mod options;

use std::io::Read;

use tracing::{debug, trace, warn};

pub use self::options::{DecoderOptions, DecoderOptionsBuilder};
use crate::{
    document::DocumentBuf,
    error::{Error, Result},
    LENGTH_PREFIX_SIZE,
};

const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Receives each document completed by a [`Decoder`].
///
/// The handler is called synchronously from within the `feed` call that supplied the final byte
/// of a document, and is handed ownership of that document's buffer. Any `FnMut(DocumentBuf)`
/// closure is a handler.
pub trait DocumentHandler {
    /// Take ownership of a completed document.
    fn handle_document(&mut self, document: DocumentBuf);
}

impl<F> DocumentHandler for F
where
    F: FnMut(DocumentBuf),
{
    fn handle_document(&mut self, document: DocumentBuf) {
        self(document)
    }
}

#[derive(Debug)]
enum Phase {
    /// Fewer than four bytes of the length prefix have arrived.
    Length,

    /// The prefix is known and the document's buffer has been allocated.
    Body(Vec<u8>),

    /// A fatal error was returned; no further input is accepted.
    Failed,
}

/// A one-pass decoder that reconstructs BSON documents from an arbitrarily chunked stream of
/// bytes.
///
/// Each document is framed purely by its four byte little-endian length prefix. Once all of the
/// declared bytes have arrived, the document is moved into the [`DocumentHandler`] and the
/// decoder re-arms for the next document, so documents may follow each other with no gap.
///
/// ```
/// use bson_stream::{Decoder, DocumentBuf};
///
/// let doc = b"\x0c\x00\x00\x00\x10a\x00\x01\x00\x00\x00\x00";
///
/// let mut seen = Vec::new();
/// let mut decoder = Decoder::new(|doc: DocumentBuf| seen.push(doc));
///
/// // the chunking of the input does not matter
/// decoder.feed_many(&doc[..3])?;
/// decoder.feed_many(&doc[3..])?;
/// for byte in doc {
///     decoder.feed(*byte)?;
/// }
/// drop(decoder);
///
/// assert_eq!(seen.len(), 2);
/// assert!(seen.iter().all(|d| d.as_bytes() == doc));
/// # Ok::<(), bson_stream::Error>(())
/// ```
///
/// A stream that ends partway through a document leaves that document pending; it is discarded
/// along with the decoder. Use [`Decoder::is_idle`] to detect truncated input.
///
/// After any error other than [`ErrorKind::Io`](crate::ErrorKind::Io) the decoder is poisoned and
/// every subsequent call returns [`ErrorKind::Poisoned`](crate::ErrorKind::Poisoned); no attempt
/// is made to find the next document boundary.
pub struct Decoder<H> {
    handler: H,
    options: DecoderOptions,
    phase: Phase,

    /// The declared length, assembled from the prefix as it arrives.
    len: u32,

    /// Bytes of the current document received so far.
    bytes_read: u32,

    /// Bytes accepted over the decoder's lifetime.
    offset: u64,

    documents_decoded: u64,
}

impl<H: DocumentHandler> Decoder<H> {
    /// Construct a decoder with the default [`DecoderOptions`].
    pub fn new(handler: H) -> Self {
        Self::with_options(handler, DecoderOptions::default())
    }

    /// Construct a decoder with the given options.
    pub fn with_options(handler: H, options: DecoderOptions) -> Self {
        Self {
            handler,
            options,
            phase: Phase::Length,
            len: 0,
            bytes_read: 0,
            offset: 0,
            documents_decoded: 0,
        }
    }

    /// Feed a single byte. If it completes a document, the handler is invoked before this
    /// returns.
    pub fn feed(&mut self, byte: u8) -> Result<()> {
        self.ensure_usable()?;
        let position = self.offset;
        self.offset += 1;
        match self.insert(byte) {
            Ok(()) => Ok(()),
            Err(e) => {
                self.offset = position;
                Err(self.fail(e, position))
            }
        }
    }

    /// Feed a byte supplied as an integer, as produced by stream interfaces that reserve values
    /// outside of a byte for signaling.
    ///
    /// A value outside of `0..=255` is a contract violation: it returns
    /// [`ErrorKind::InvalidByte`](crate::ErrorKind::InvalidByte) and poisons the decoder without
    /// advancing its counters.
    pub fn feed_int(&mut self, value: i32) -> Result<()> {
        self.ensure_usable()?;
        match u8::try_from(value) {
            Ok(byte) => self.feed(byte),
            Err(_) => Err(self.fail(Error::invalid_byte(value), self.offset)),
        }
    }

    /// Feed a run of bytes in order, returning the number of bytes consumed.
    ///
    /// This is observably identical to calling [`Decoder::feed`] for every byte: handlers are
    /// invoked in arrival order, and an error is reported at the exact byte that caused it. On
    /// error, `bytes[..k]` has been consumed, where `k` is the error's
    /// [`offset`](crate::Error::offset) minus [`Decoder::offset`] before the call.
    pub fn feed_many(&mut self, bytes: &[u8]) -> Result<usize> {
        self.ensure_usable()?;

        let mut consumed = 0;
        while consumed < bytes.len() {
            if let Phase::Body(ref mut data) = self.phase {
                let remaining = (self.len - self.bytes_read) as usize;
                let take = remaining.min(bytes.len() - consumed);
                data.extend_from_slice(&bytes[consumed..consumed + take]);

                self.bytes_read += take as u32;
                self.offset += take as u64;
                consumed += take;

                if self.bytes_read == self.len {
                    self.complete();
                }
            } else {
                self.feed(bytes[consumed])?;
                consumed += 1;
            }
        }

        Ok(consumed)
    }

    /// Read `reader` to its end, feeding everything it yields. Returns the number of documents
    /// completed during this call.
    ///
    /// A trailing partial document is left pending rather than reported as an error.
    pub fn feed_reader<R: Read>(&mut self, mut reader: R) -> Result<u64> {
        let before = self.documents_decoded;
        let mut chunk = vec![0u8; READ_CHUNK_SIZE];

        loop {
            let n = match reader.read(&mut chunk) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(Error::from(e).with_offset(self.offset)),
            };
            self.feed_many(&chunk[..n])?;
        }

        Ok(self.documents_decoded - before)
    }

    /// Folds one byte into the state machine. The caller has already counted the byte in
    /// `offset`.
    fn insert(&mut self, byte: u8) -> Result<()> {
        self.bytes_read += 1;

        if self.bytes_read as usize <= LENGTH_PREFIX_SIZE {
            self.len |= u32::from(byte) << (8 * (self.bytes_read - 1));

            if self.bytes_read as usize == LENGTH_PREFIX_SIZE {
                self.allocate()?;
            }
        } else {
            if self.bytes_read > self.len {
                return Err(Error::overrun(self.bytes_read, self.len));
            }
            match self.phase {
                Phase::Body(ref mut data) => data.push(byte),
                _ => return Err(Error::overrun(self.bytes_read, self.len)),
            }
        }

        if self.bytes_read as usize >= LENGTH_PREFIX_SIZE && self.bytes_read == self.len {
            self.complete();
        }

        Ok(())
    }

    fn allocate(&mut self) -> Result<()> {
        let max = self.options.max_document_size;
        if self.len > max {
            return Err(Error::too_large(self.len, max));
        }
        if (self.len as usize) < LENGTH_PREFIX_SIZE {
            return Err(Error::too_small(self.len));
        }

        debug!(length = self.len, "allocating document buffer");
        let mut data = Vec::with_capacity(self.len as usize);
        data.extend_from_slice(&self.len.to_le_bytes());
        self.phase = Phase::Body(data);
        Ok(())
    }

    fn complete(&mut self) {
        let phase = std::mem::replace(&mut self.phase, Phase::Length);
        if let Phase::Body(data) = phase {
            self.documents_decoded += 1;
            trace!(
                length = self.len,
                offset = self.offset,
                documents = self.documents_decoded,
                "document complete"
            );
            self.handler.handle_document(DocumentBuf::from_framed(data));
        }
        self.len = 0;
        self.bytes_read = 0;
    }

    fn ensure_usable(&self) -> Result<()> {
        match self.phase {
            Phase::Failed => Err(Error::poisoned().with_offset(self.offset)),
            _ => Ok(()),
        }
    }

    fn fail(&mut self, error: Error, position: u64) -> Error {
        warn!(offset = position, error = %error.kind, "decoder failed");
        self.phase = Phase::Failed;
        error.with_offset(position)
    }
}

impl<H> Decoder<H> {
    /// Whether the decoder sits on a document boundary with no partial document pending.
    pub fn is_idle(&self) -> bool {
        self.bytes_read == 0 && matches!(self.phase, Phase::Length)
    }

    /// Whether a previous error has made this decoder unusable.
    pub fn is_poisoned(&self) -> bool {
        matches!(self.phase, Phase::Failed)
    }

    /// Bytes of the pending document received so far, including any of its length prefix.
    pub fn bytes_read(&self) -> u32 {
        self.bytes_read
    }

    /// The pending document's declared length. Only meaningful once four bytes of it have been
    /// read; before that it holds the prefix assembled so far.
    pub fn declared_len(&self) -> u32 {
        self.len
    }

    /// Bytes accepted over the lifetime of the decoder.
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Documents handed to the handler over the lifetime of the decoder.
    pub fn documents_decoded(&self) -> u64 {
        self.documents_decoded
    }

    /// The options this decoder was constructed with.
    pub fn options(&self) -> &DecoderOptions {
        &self.options
    }

    /// The handler completed documents are passed to.
    pub fn handler(&self) -> &H {
        &self.handler
    }

    /// Mutable access to the handler, e.g. to drain documents it has collected.
    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Consume the decoder, dropping any pending document, and return its handler.
    pub fn into_handler(self) -> H {
        self.handler
    }
}

impl<H> std::fmt::Debug for Decoder<H> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Decoder")
            .field("options", &self.options)
            .field("len", &self.len)
            .field("bytes_read", &self.bytes_read)
            .field("offset", &self.offset)
            .field("poisoned", &self.is_poisoned())
            .finish()
    }
}

/// Decode every document that `reader` yields, handing each to `handler`. Returns the number of
/// documents decoded.
///
/// ```
/// use bson_stream::DocumentBuf;
///
/// let mut input = Vec::new();
/// input.extend_from_slice(b"\x05\x00\x00\x00\x00");
/// input.extend_from_slice(b"\x05\x00\x00\x00\x00");
///
/// let mut lengths = Vec::new();
/// let count = bson_stream::decode_from_reader(input.as_slice(), |doc: DocumentBuf| {
///     lengths.push(doc.len())
/// })?;
/// assert_eq!(count, 2);
/// assert_eq!(lengths, vec![5, 5]);
/// # Ok::<(), bson_stream::Error>(())
/// ```
pub fn decode_from_reader<R, H>(reader: R, handler: H) -> Result<u64>
where
    R: Read,
    H: DocumentHandler,
{
    let mut decoder = Decoder::new(handler);
    let count = decoder.feed_reader(reader)?;
    if !decoder.is_idle() {
        debug!(
            bytes_read = decoder.bytes_read(),
            length = decoder.declared_len(),
            "discarding trailing partial document"
        );
    }
    Ok(count)
}
