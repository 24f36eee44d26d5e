use crate::utils::error::{MarketError, Result};
use std::fmt;
use std::str::FromStr;

pub const PUBKEY_BYTES: usize = 32;

/// A Solana account address.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pubkey([u8; PUBKEY_BYTES]);

/// `11111111111111111111111111111111`
pub const SYSTEM_PROGRAM_ID: Pubkey = Pubkey([0; PUBKEY_BYTES]);

impl Pubkey {
    pub const fn new(bytes: [u8; PUBKEY_BYTES]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; PUBKEY_BYTES] {
        &self.0
    }
}

impl FromStr for Pubkey {
    type Err = MarketError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = |reason: String| MarketError::InvalidAddress {
            value: s.to_string(),
            reason,
        };

        // base58 of 32 bytes is never longer than 44 characters
        if s.is_empty() || s.len() > 44 {
            return Err(invalid(format!("unexpected length {}", s.len())));
        }

        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| invalid(e.to_string()))?;
        let bytes: [u8; PUBKEY_BYTES] = bytes
            .try_into()
            .map_err(|v: Vec<u8>| invalid(format!("decoded to {} bytes, expected 32", v.len())))?;
        Ok(Self(bytes))
    }
}

impl fmt::Display for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&bs58::encode(self.0).into_string())
    }
}

impl fmt::Debug for Pubkey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pubkey({})", self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_program_id_text_form() {
        assert_eq!(
            SYSTEM_PROGRAM_ID.to_string(),
            "11111111111111111111111111111111"
        );
        let parsed: Pubkey = "11111111111111111111111111111111".parse().unwrap();
        assert_eq!(parsed, SYSTEM_PROGRAM_ID);
    }

    #[test]
    fn test_parse_round_trips_display() {
        let key = Pubkey::new([7; PUBKEY_BYTES]);
        let parsed: Pubkey = key.to_string().parse().unwrap();
        assert_eq!(parsed, key);
    }

    #[test]
    fn test_rejects_bad_addresses() {
        assert!("".parse::<Pubkey>().is_err());
        assert!("not-base58-0OIl".parse::<Pubkey>().is_err());
        // valid base58 but too short
        assert!("3yZe7d".parse::<Pubkey>().is_err());
    }
}
