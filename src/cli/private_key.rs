use std::fmt;
use std::str::FromStr;

use ethers::prelude::k256::SecretKey;
use ethers::signers::{LocalWallet, Signer};
use ethers::types::Address;

#[derive(Debug, Clone)]
pub struct PrivateKey {
    pub key: SecretKey,
}

impl PrivateKey {
    pub fn address(&self) -> Address {
        LocalWallet::from(self.key.clone()).address()
    }
}

impl FromStr for PrivateKey {
    type Err = eyre::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().trim_start_matches("0x");

        let bytes = hex::decode(s)?;

        let key = SecretKey::from_slice(&bytes)?;

        Ok(Self { key })
    }
}

/// `{}` only shows the signer address, `{:#}` renders the raw key.
impl fmt::Display for PrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if f.alternate() {
            write!(f, "{}", hex::encode(self.key.to_bytes()))
        } else {
            write!(f, "<key for {:?}>", self.address())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const KEY: &str =
        "ac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn parses_with_and_without_prefix() -> eyre::Result<()> {
        let plain: PrivateKey = KEY.parse()?;
        let prefixed: PrivateKey = format!("0x{KEY}").parse()?;

        assert_eq!(plain.key.to_bytes(), prefixed.key.to_bytes());

        Ok(())
    }

    #[test]
    fn display_hides_the_key() -> eyre::Result<()> {
        let key: PrivateKey = KEY.parse()?;

        let shown = key.to_string();
        assert!(!shown.contains(KEY));
        assert!(shown.contains(&format!("{:?}", key.address())));

        assert_eq!(format!("{key:#}"), KEY);

        Ok(())
    }

    #[test]
    fn rejects_invalid_keys() {
        assert!("0xzz".parse::<PrivateKey>().is_err());
        assert!("0x".parse::<PrivateKey>().is_err());
    }
}
