use std::io::{self, Write};

use crate::{
    decoder::{Decoder, DecoderOptions, DocumentHandler},
    error::Error,
};

/// A [`Write`] sink that frames everything written to it into BSON documents.
///
/// This lets ordinary stream plumbing, e.g. [`std::io::copy`] or a `BufWriter`, drive a
/// [`Decoder`]. Decoder errors surface as [`io::ErrorKind::InvalidData`] errors wrapping a
/// [`crate::Error`].
///
/// When a buffer fails partway through, `write` reports the bytes the decoder consumed before the
/// failing byte as written, and the error is returned by the next call to `write`.
///
/// ```
/// use std::io::Write;
///
/// use bson_stream::{DocumentBuf, DocumentWriter};
///
/// let mut count = 0;
/// let mut writer = DocumentWriter::new(|_: DocumentBuf| count += 1);
/// writer.write_all(b"\x05\x00\x00")?;
/// writer.write_all(b"\x00\x00\x05\x00\x00\x00\x00")?;
/// drop(writer);
///
/// assert_eq!(count, 2);
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug)]
pub struct DocumentWriter<H> {
    decoder: Decoder<H>,

    /// An error hit after part of a buffer was accepted, held for the next `write`.
    deferred: Option<Error>,
}

impl<H: DocumentHandler> DocumentWriter<H> {
    /// Construct a writer over a new decoder with the default [`DecoderOptions`].
    pub fn new(handler: H) -> Self {
        Decoder::new(handler).into()
    }

    /// Construct a writer over a new decoder with the given options.
    pub fn with_options(handler: H, options: DecoderOptions) -> Self {
        Decoder::with_options(handler, options).into()
    }
}

impl<H> DocumentWriter<H> {
    /// The underlying decoder.
    pub fn get_ref(&self) -> &Decoder<H> {
        &self.decoder
    }

    /// Mutable access to the underlying decoder.
    pub fn get_mut(&mut self) -> &mut Decoder<H> {
        &mut self.decoder
    }

    /// Unwrap the underlying decoder, discarding any error not yet returned by `write`.
    pub fn into_inner(self) -> Decoder<H> {
        self.decoder
    }
}

impl<H> From<Decoder<H>> for DocumentWriter<H> {
    fn from(decoder: Decoder<H>) -> Self {
        Self {
            decoder,
            deferred: None,
        }
    }
}

impl<H: DocumentHandler> Write for DocumentWriter<H> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(e) = self.deferred.take() {
            return Err(e.into());
        }

        let start = self.decoder.offset();
        match self.decoder.feed_many(buf) {
            Ok(n) => Ok(n),
            Err(e) => {
                let accepted = e.offset.map_or(0, |offset| offset.saturating_sub(start)) as usize;
                if accepted == 0 {
                    return Err(e.into());
                }
                self.deferred = Some(e);
                Ok(accepted)
            }
        }
    }

    /// Documents are handed off as soon as they complete, so there is never anything to flush. A
    /// partially written document stays pending.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
