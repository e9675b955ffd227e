use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::Display;
use std::ops::Add;

/// An amount of tokens, in the token's smallest unit.
///
/// On the wire, amounts are 256-bit big-endian words. Amounts are stored as `u128`, which covers every realistic
/// token supply, and reading a word that does not fit is a decoding error. Serialized as a decimal string.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TokenAmount {
    amount: u128,
}

impl TokenAmount {
    pub const ZERO: TokenAmount = TokenAmount { amount: 0 };

    pub const fn new(amount: u128) -> Self {
        TokenAmount { amount }
    }

    pub const fn value(&self) -> u128 {
        self.amount
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    pub fn checked_add(&self, other: TokenAmount) -> Option<TokenAmount> {
        self.amount.checked_add(other.amount).map(TokenAmount::new)
    }

    pub fn checked_sub(&self, other: TokenAmount) -> Option<TokenAmount> {
        self.amount.checked_sub(other.amount).map(TokenAmount::new)
    }

    pub fn saturating_add(&self, other: TokenAmount) -> TokenAmount {
        TokenAmount::new(self.amount.saturating_add(other.amount))
    }

    /// The amount as a 32-byte big-endian word.
    pub fn to_be_word(&self) -> [u8; 32] {
        let mut word = [0u8; 32];
        word[16..].copy_from_slice(&self.amount.to_be_bytes());
        word
    }

    /// Reads a 32-byte big-endian word. Returns `None` if the value does not fit in 128 bits.
    pub fn from_be_word(word: &[u8; 32]) -> Option<Self> {
        if word[..16].iter().any(|b| *b != 0) {
            return None;
        }
        let mut low = [0u8; 16];
        low.copy_from_slice(&word[16..]);
        Some(TokenAmount::new(u128::from_be_bytes(low)))
    }
}

impl From<u128> for TokenAmount {
    fn from(amount: u128) -> Self {
        TokenAmount { amount }
    }
}

impl From<u64> for TokenAmount {
    fn from(amount: u64) -> Self {
        TokenAmount { amount: amount as u128 }
    }
}

impl Add for TokenAmount {
    type Output = TokenAmount;

    fn add(self, rhs: Self) -> Self::Output {
        TokenAmount { amount: self.amount + rhs.amount }
    }
}

impl Serialize for TokenAmount {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        self.amount.to_string().serialize(s)
    }
}

impl<'de> Deserialize<'de> for TokenAmount {
    fn deserialize<D: Deserializer<'de>>(de: D) -> Result<Self, D::Error> {
        let s = String::deserialize(de)?;
        let amount = s.parse::<u128>().map_err(|e| serde::de::Error::custom(format!("Invalid token amount: {e}")))?;
        Ok(TokenAmount { amount })
    }
}

impl Display for TokenAmount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.amount)
    }
}
