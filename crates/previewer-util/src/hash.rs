/// Compute the BLAKE3 hash of a byte slice, returning the hex-encoded digest.
#[must_use]
pub fn blake3_bytes(data: &[u8]) -> String {
    blake3::hash(data).to_hex().to_string()
}

/// Incremental hasher over a sequence of labelled fields.
///
/// Every field is length-prefixed, so `("ab", "c")` and `("a", "bc")`
/// never produce the same digest.
#[derive(Debug, Default, Clone)]
pub struct ContentHasher {
    inner: blake3::Hasher,
}

impl ContentHasher {
    /// Create an empty hasher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one string field.
    pub fn field(&mut self, value: &str) -> &mut Self {
        self.bytes(value.as_bytes())
    }

    /// Feed one raw byte field.
    pub fn bytes(&mut self, value: &[u8]) -> &mut Self {
        self.inner.update(&(value.len() as u64).to_le_bytes());
        self.inner.update(value);
        self
    }

    /// Feed a boolean flag.
    pub fn flag(&mut self, value: bool) -> &mut Self {
        self.inner.update(&[u8::from(value)]);
        self
    }

    /// Hex-encoded digest of everything fed so far.
    #[must_use]
    pub fn finish(&self) -> String {
        self.inner.finalize().to_hex().to_string()
    }
}
