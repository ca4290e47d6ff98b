use std::io::{self, BufRead, Read, Seek, SeekFrom};

/// A reader over the bytes of a single document, used to feed a document back into stream
/// plumbing.
///
/// Unlike [`std::io::Cursor`], seeking never fails and never moves past either end of the
/// document: the target position is clamped into `0..=len`.
///
/// ```
/// use std::io::{Read, Seek, SeekFrom};
///
/// use bson_stream::DocumentReader;
///
/// let mut reader = DocumentReader::new(b"\x05\x00\x00\x00\x00");
/// assert_eq!(reader.seek(SeekFrom::End(10))?, 5);
/// assert_eq!(reader.seek(SeekFrom::Current(-100))?, 0);
///
/// let mut bytes = Vec::new();
/// reader.read_to_end(&mut bytes)?;
/// assert_eq!(bytes, b"\x05\x00\x00\x00\x00");
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Clone, Debug)]
pub struct DocumentReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> DocumentReader<'a> {
    /// Construct a reader positioned at the start of `data`.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// The current read position.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// The bytes that have not been read yet.
    pub fn remaining(&self) -> &'a [u8] {
        &self.data[self.pos..]
    }

    /// All of the underlying bytes, regardless of position.
    pub fn get_ref(&self) -> &'a [u8] {
        self.data
    }

    fn clamp(&self, target: i128) -> usize {
        target.clamp(0, self.data.len() as i128) as usize
    }
}

impl Read for DocumentReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.remaining().read(buf)?;
        self.pos += n;
        Ok(n)
    }
}

impl BufRead for DocumentReader<'_> {
    fn fill_buf(&mut self) -> io::Result<&[u8]> {
        Ok(self.remaining())
    }

    fn consume(&mut self, amt: usize) {
        self.pos = self.pos.saturating_add(amt).min(self.data.len());
    }
}

impl Seek for DocumentReader<'_> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(n) => i128::from(n),
            SeekFrom::Current(off) => self.pos as i128 + i128::from(off),
            SeekFrom::End(off) => self.data.len() as i128 + i128::from(off),
        };
        self.pos = self.clamp(target);
        Ok(self.pos as u64)
    }

    fn stream_position(&mut self) -> io::Result<u64> {
        Ok(self.pos as u64)
    }
}
