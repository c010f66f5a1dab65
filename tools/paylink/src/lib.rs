//! Payment links
//!
//! A payment link packs a deposit identifier and its passphrase into one
//! URL-safe token, so a depositor can hand a claim to someone in a single
//! string: `base64url("<0x-hex id>|<passphrase>")`, without padding.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use types::errors::TypeError;
use types::ids::DepositId;

/// Separator between identifier and passphrase.
pub const SEPARATOR: char = '|';

#[derive(Error, Debug)]
pub enum PayLinkError {
    #[error("Invalid base64 token: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Token is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("Token has no '|' separator")]
    MissingSeparator,

    #[error("Invalid deposit id: {0}")]
    InvalidId(#[source] TypeError),
}

/// Decoded payment link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PayLink {
    pub deposit_id: DepositId,
    pub passphrase: String,
}

impl PayLink {
    pub fn new(deposit_id: DepositId, passphrase: impl Into<String>) -> Self {
        Self {
            deposit_id,
            passphrase: passphrase.into(),
        }
    }

    pub fn encode(&self) -> String {
        encode(&self.deposit_id, &self.passphrase)
    }
}

pub fn encode(id: &DepositId, passphrase: &str) -> String {
    URL_SAFE_NO_PAD.encode(format!("{id}{SEPARATOR}{passphrase}"))
}

/// Decode a token. Trailing `=` padding is tolerated.
///
/// Splits on the first separator only, so passphrases may contain `|`.
pub fn decode(token: &str) -> Result<PayLink, PayLinkError> {
    let bytes = URL_SAFE_NO_PAD.decode(token.trim().trim_end_matches('='))?;
    let text = String::from_utf8(bytes)?;
    let (id, passphrase) = text
        .split_once(SEPARATOR)
        .ok_or(PayLinkError::MissingSeparator)?;
    let deposit_id = id.parse().map_err(PayLinkError::InvalidId)?;
    Ok(PayLink::new(deposit_id, passphrase))
}

#[cfg(test)]
mod tests {
    use super::*;
    use types::ids::Hash32;

    fn id() -> DepositId {
        DepositId::from_hash(Hash32::from_bytes([0xab; 32]))
    }

    #[test]
    fn test_encode_is_url_safe() {
        // Passphrase chosen so the standard alphabet would emit '+' or '/'.
        let token = encode(&id(), "??>>??~~");
        assert!(!token.contains('+'));
        assert!(!token.contains('/'));
        assert!(!token.contains('='));
    }

    #[test]
    fn test_decode_recovers_link() {
        let token = encode(&id(), "securepassword");
        let link = decode(&token).unwrap();
        assert_eq!(link, PayLink::new(id(), "securepassword"));
    }

    #[test]
    fn test_decode_splits_on_first_separator() {
        let token = encode(&id(), "a|b|c");
        assert_eq!(decode(&token).unwrap().passphrase, "a|b|c");
    }

    #[test]
    fn test_decode_tolerates_padding() {
        let token = format!("{}==", encode(&id(), "x"));
        assert_eq!(decode(&token).unwrap().passphrase, "x");
    }

    #[test]
    fn test_decode_missing_separator() {
        let token = URL_SAFE_NO_PAD.encode("no-separator-here");
        assert!(matches!(decode(&token), Err(PayLinkError::MissingSeparator)));
    }

    #[test]
    fn test_decode_invalid_id() {
        let token = URL_SAFE_NO_PAD.encode("0x1234|pass");
        assert!(matches!(decode(&token), Err(PayLinkError::InvalidId(_))));
    }

    #[test]
    fn test_decode_invalid_base64() {
        assert!(matches!(decode("***"), Err(PayLinkError::Base64(_))));
    }

    #[test]
    fn test_decode_invalid_utf8() {
        let token = URL_SAFE_NO_PAD.encode([0xff, 0xfe, b'|']);
        assert!(matches!(decode(&token), Err(PayLinkError::Utf8(_))));
    }

    mod fuzz {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn fuzz_any_passphrase_survives_link(bytes in any::<[u8; 32]>(), passphrase in ".*") {
                let id = DepositId::from_hash(Hash32::from_bytes(bytes));
                let link = decode(&encode(&id, &passphrase)).unwrap();
                prop_assert_eq!(link.deposit_id, id);
                prop_assert_eq!(link.passphrase, passphrase);
            }
        }
    }
}
