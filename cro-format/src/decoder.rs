//! Raw file bytes to plaintext stream bytes
//!
//! Cronos files are usually obfuscated with a per-database substitution key.
//! Key recovery and the substitution itself live outside this crate; callers
//! plug them in through [`StreamDecoder`].

/// Turns on-disk bytes into the plaintext consumed by the scanner and codec
pub trait StreamDecoder {
    fn decode(&self, raw: &[u8]) -> Vec<u8>;
}

/// Input that is already plaintext
#[derive(Debug, Clone, Copy, Default)]
pub struct Plaintext;

impl StreamDecoder for Plaintext {
    fn decode(&self, raw: &[u8]) -> Vec<u8> {
        raw.to_vec()
    }
}

impl<F> StreamDecoder for F
where
    F: Fn(&[u8]) -> Vec<u8>,
{
    fn decode(&self, raw: &[u8]) -> Vec<u8> {
        self(raw)
    }
}
