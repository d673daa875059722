use crate::error::SearchError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// First code point of the reference alphabet (`!`).
pub const PRINTABLE_FIRST: u8 = 33;
/// Last code point of the reference alphabet (`~`).
pub const PRINTABLE_LAST: u8 = 126;

const NOT_IN_ALPHABET: u8 = u8::MAX;

/// Ordered set of single-byte symbols that candidates are built from.
///
/// The position of a symbol is its digit value during enumeration. A reverse
/// lookup table keeps `digit_of` a single array read so decoding stays cheap.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Alphabet {
    symbols: Vec<u8>,
    digits: [u8; 256],
}

impl Alphabet {
    /// Builds an alphabet from an explicit symbol list.
    ///
    /// Symbols must be printable ASCII (33..=126) and unique; at least two are
    /// required so every index has a distinct representation.
    pub fn new(symbols: &[u8]) -> Result<Self, SearchError> {
        if symbols.len() < 2 {
            return Err(SearchError::invalid(
                "alphabet must contain at least two symbols",
            ));
        }
        if symbols.len() >= usize::from(NOT_IN_ALPHABET) {
            return Err(SearchError::invalid("alphabet is too large"));
        }

        let mut digits = [NOT_IN_ALPHABET; 256];
        for (position, &symbol) in symbols.iter().enumerate() {
            if !(PRINTABLE_FIRST..=PRINTABLE_LAST).contains(&symbol) {
                return Err(SearchError::invalid(format!(
                    "alphabet symbol {:#04x} is not printable ASCII",
                    symbol
                )));
            }
            if digits[usize::from(symbol)] != NOT_IN_ALPHABET {
                return Err(SearchError::invalid(format!(
                    "alphabet symbol '{}' appears more than once",
                    char::from(symbol)
                )));
            }
            digits[usize::from(symbol)] = position as u8;
        }

        Ok(Self {
            symbols: symbols.to_vec(),
            digits,
        })
    }

    /// The 94 printable ASCII characters `!`..=`~`.
    pub fn printable() -> Self {
        let symbols: Vec<u8> = (PRINTABLE_FIRST..=PRINTABLE_LAST).collect();
        Self::from_trusted(symbols)
    }

    /// `a-z` followed by `0-9` (36 symbols).
    pub fn lower_alphanumeric() -> Self {
        let symbols: Vec<u8> = (b'a'..=b'z').chain(b'0'..=b'9').collect();
        Self::from_trusted(symbols)
    }

    pub fn lowercase() -> Self {
        Self::from_trusted((b'a'..=b'z').collect())
    }

    pub fn digits() -> Self {
        Self::from_trusted((b'0'..=b'9').collect())
    }

    fn from_trusted(symbols: Vec<u8>) -> Self {
        let mut digits = [NOT_IN_ALPHABET; 256];
        for (position, &symbol) in symbols.iter().enumerate() {
            digits[usize::from(symbol)] = position as u8;
        }
        Self { symbols, digits }
    }

    /// Number of symbols, i.e. the radix of the enumeration.
    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    pub fn radix(&self) -> u64 {
        self.symbols.len() as u64
    }

    #[inline]
    pub fn symbol(&self, digit: usize) -> u8 {
        self.symbols[digit]
    }

    /// Digit value of `symbol`, or `None` when it is not part of the alphabet.
    #[inline]
    pub fn digit_of(&self, symbol: u8) -> Option<u64> {
        match self.digits[usize::from(symbol)] {
            NOT_IN_ALPHABET => None,
            digit => Some(u64::from(digit)),
        }
    }

    pub fn contains(&self, symbol: u8) -> bool {
        self.digit_of(symbol).is_some()
    }

    pub fn symbols(&self) -> &[u8] {
        &self.symbols
    }
}

impl Default for Alphabet {
    fn default() -> Self {
        Self::printable()
    }
}

impl fmt::Debug for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Alphabet")
            .field("symbols", &String::from_utf8_lossy(&self.symbols))
            .field("len", &self.symbols.len())
            .finish()
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Symbols are validated printable ASCII.
        f.write_str(&String::from_utf8_lossy(&self.symbols))
    }
}

/// Accepts a preset name (`printable`, `lower-alnum`, `lower`, `digits`) or a
/// literal symbol string.
impl FromStr for Alphabet {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "printable" => Ok(Self::printable()),
            "lower-alnum" => Ok(Self::lower_alphanumeric()),
            "lower" => Ok(Self::lowercase()),
            "digits" => Ok(Self::digits()),
            literal => Self::new(literal.as_bytes()),
        }
    }
}

impl TryFrom<String> for Alphabet {
    type Error = SearchError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value.as_bytes())
    }
}

impl From<Alphabet> for String {
    fn from(alphabet: Alphabet) -> Self {
        alphabet.to_string()
    }
}
