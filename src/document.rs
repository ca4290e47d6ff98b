use std::ops::Deref;

use crate::LENGTH_PREFIX_SIZE;

/// An owned BSON document produced by a [`Decoder`](crate::Decoder), backed by exactly the bytes
/// that were framed by its length prefix.
///
/// No validation of the contents is performed; the only guarantee is that the first four bytes
/// hold the little-endian length that the buffer was framed with. Parsing the elements is left to
/// whichever consumer the document is handed to.
///
/// ```
/// use bson_stream::{Decoder, DocumentBuf};
///
/// let mut docs = Vec::new();
/// let mut decoder = Decoder::new(|doc: DocumentBuf| docs.push(doc));
/// decoder.feed_many(b"\x0c\x00\x00\x00\x10a\x00\x01\x00\x00\x00\x00")?;
/// drop(decoder);
///
/// assert_eq!(docs.len(), 1);
/// assert_eq!(docs[0].declared_len(), 12);
/// assert_eq!(docs[0].as_bytes()[4], 0x10);
/// # Ok::<(), bson_stream::Error>(())
/// ```
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct DocumentBuf {
    data: Vec<u8>,
}

impl DocumentBuf {
    pub(crate) fn from_framed(data: Vec<u8>) -> Self {
        debug_assert!(data.len() >= LENGTH_PREFIX_SIZE);
        Self { data }
    }

    /// The length declared by the document's prefix. Always equal to [`DocumentBuf::len`].
    pub fn declared_len(&self) -> u32 {
        u32::from_le_bytes([self.data[0], self.data[1], self.data[2], self.data[3]])
    }

    /// The total number of bytes in the document, including the length prefix.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Always false: a framed document holds at least its length prefix.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// The document's raw bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// The bytes following the length prefix.
    pub fn body(&self) -> &[u8] {
        &self.data[LENGTH_PREFIX_SIZE..]
    }

    /// Return the contained data as a `Vec<u8>`.
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// A reader over the document's bytes, for handing the document to anything that consumes
    /// [`std::io::Read`].
    pub fn reader(&self) -> crate::DocumentReader<'_> {
        crate::DocumentReader::new(&self.data)
    }
}

impl std::fmt::Debug for DocumentBuf {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocumentBuf")
            .field("data", &hex::encode(&self.data))
            .finish()
    }
}

impl Deref for DocumentBuf {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.data
    }
}

impl AsRef<[u8]> for DocumentBuf {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl From<DocumentBuf> for Vec<u8> {
    fn from(doc: DocumentBuf) -> Self {
        doc.data
    }
}

impl PartialEq<[u8]> for DocumentBuf {
    fn eq(&self, other: &[u8]) -> bool {
        self.data == other
    }
}

impl PartialEq<&[u8]> for DocumentBuf {
    fn eq(&self, other: &&[u8]) -> bool {
        self.data == *other
    }
}

impl PartialEq<Vec<u8>> for DocumentBuf {
    fn eq(&self, other: &Vec<u8>) -> bool {
        &self.data == other
    }
}
