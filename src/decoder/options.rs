use crate::MAX_BSON_SIZE;

/// Options used to configure a [`Decoder`](crate::Decoder).
///
/// ```
/// use bson_stream::DecoderOptions;
///
/// let options = DecoderOptions::builder().max_document_size(1024).build();
/// assert_eq!(options.max_document_size, 1024);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase", default))]
#[non_exhaustive]
pub struct DecoderOptions {
    /// The largest length prefix, in bytes, that will be accepted. Defaults to
    /// [`MAX_BSON_SIZE`].
    pub max_document_size: u32,
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            max_document_size: MAX_BSON_SIZE,
        }
    }
}

impl DecoderOptions {
    /// Create a builder used to construct a new [`DecoderOptions`].
    pub fn builder() -> DecoderOptionsBuilder {
        DecoderOptionsBuilder {
            options: Default::default(),
        }
    }
}

/// A builder used to construct new [`DecoderOptions`] structs.
#[derive(Clone, Debug)]
pub struct DecoderOptionsBuilder {
    options: DecoderOptions,
}

impl DecoderOptionsBuilder {
    /// Set the largest document, in bytes, the decoder will allocate a buffer for. Length
    /// prefixes above this value are rejected as soon as the fourth byte arrives.
    pub fn max_document_size(mut self, max: u32) -> Self {
        self.options.max_document_size = max;
        self
    }

    /// Consume this builder and produce a [`DecoderOptions`].
    pub fn build(self) -> DecoderOptions {
        self.options
    }
}
