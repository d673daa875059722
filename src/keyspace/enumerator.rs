use super::alphabet::Alphabet;
use super::partitioner::SearchRange;
use crate::error::SearchError;

/// Longest candidate the system accepts.
pub const MAX_PASSWORD_LENGTH: usize = 10;

/// `radix^length` using integer exponentiation.
///
/// Returns `None` when the result does not fit a `u64`.
pub fn size(radix: u64, length: usize) -> Option<u64> {
    let exp = u32::try_from(length).ok()?;
    radix.checked_pow(exp)
}

/// All strings of exactly `length` symbols over one alphabet.
///
/// Index `i` maps to the candidate whose base-`radix` digits (most significant
/// first) are the digits of `i`, each replaced by the alphabet symbol at that
/// position.
#[derive(Debug, Clone)]
pub struct Keyspace {
    alphabet: Alphabet,
    length: usize,
    size: u64,
}

impl Keyspace {
    pub fn new(alphabet: Alphabet, length: usize) -> Result<Self, SearchError> {
        if length == 0 || length > MAX_PASSWORD_LENGTH {
            return Err(SearchError::invalid(format!(
                "password length must be between 1 and {}, got {}",
                MAX_PASSWORD_LENGTH, length
            )));
        }

        let size = size(alphabet.radix(), length).ok_or_else(|| {
            SearchError::invalid(format!(
                "keyspace of {} symbols at length {} does not fit in 64 bits",
                alphabet.len(),
                length
            ))
        })?;

        Ok(Self {
            alphabet,
            length,
            size,
        })
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Number of candidates in the keyspace.
    pub fn size(&self) -> u64 {
        self.size
    }

    /// The full index interval `[0, size)`.
    pub fn full_range(&self) -> SearchRange {
        SearchRange::new(0, self.size)
    }

    /// Writes the candidate for `index` into `out`.
    ///
    /// `out` must be exactly `length` bytes long. This is the hot-loop variant:
    /// it never allocates.
    #[inline]
    pub fn encode_into(&self, index: u64, out: &mut [u8]) -> Result<(), SearchError> {
        if index >= self.size {
            return Err(SearchError::invalid(format!(
                "index {} is outside keyspace of size {}",
                index, self.size
            )));
        }
        if out.len() != self.length {
            return Err(SearchError::invalid(format!(
                "output buffer holds {} bytes, expected {}",
                out.len(),
                self.length
            )));
        }

        let radix = self.alphabet.radix();
        let mut rest = index;
        for slot in out.iter_mut().rev() {
            *slot = self.alphabet.symbol((rest % radix) as usize);
            rest /= radix;
        }
        Ok(())
    }

    pub fn encode(&self, index: u64) -> Result<Vec<u8>, SearchError> {
        let mut out = vec![0u8; self.length];
        self.encode_into(index, &mut out)?;
        Ok(out)
    }

    /// Inverse of [`Keyspace::encode`] for candidates of this keyspace's length.
    pub fn decode(&self, candidate: &[u8]) -> Result<u64, SearchError> {
        if candidate.len() != self.length {
            return Err(SearchError::invalid(format!(
                "candidate has length {}, keyspace length is {}",
                candidate.len(),
                self.length
            )));
        }

        let radix = self.alphabet.radix();
        candidate.iter().try_fold(0u64, |acc, &symbol| {
            let digit = self.alphabet.digit_of(symbol).ok_or_else(|| {
                SearchError::invalid(format!(
                    "symbol '{}' is not part of the alphabet",
                    char::from(symbol)
                ))
            })?;
            // Cannot overflow: acc < radix^(length-1) and size fits u64.
            Ok(acc * radix + digit)
        })
    }
}
