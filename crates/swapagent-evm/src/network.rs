use std::fmt::{Display, Formatter};

use serde::{Deserialize, Deserializer, Serialize};

use crate::Error;

/// Represent the EVM chains on which swaps can be routed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChainID {
    Ethereum,
    Polygon,
    Optimism,
    Arbitrum,
    Base,
    Bsc,
}

impl ChainID {
    /// Convert a numeric chain id into a ChainID
    ///
    /// If the chain is not supported, return an error
    pub fn from_id(id: u64) -> Result<Self, Error> {
        match id {
            1 => Ok(Self::Ethereum),
            10 => Ok(Self::Optimism),
            56 => Ok(Self::Bsc),
            137 => Ok(Self::Polygon),
            8453 => Ok(Self::Base),
            42161 => Ok(Self::Arbitrum),
            _ => Err(Error::UnsupportedChain(id.to_string())),
        }
    }

    pub fn as_id(&self) -> u64 {
        match self {
            Self::Ethereum => 1,
            Self::Optimism => 10,
            Self::Bsc => 56,
            Self::Polygon => 137,
            Self::Base => 8453,
            Self::Arbitrum => 42161,
        }
    }

    /// Convert a chain name into a ChainID
    /// - ethereum, mainnet -> ChainID::Ethereum
    /// - arbitrum, arbitrum-one -> ChainID::Arbitrum
    /// - bsc, bnb -> ChainID::Bsc
    ///
    /// Matching is case insensitive. If the conversion fail, return an error
    pub fn from_string(s: &str) -> Result<Self, Error> {
        match s.to_lowercase().as_str() {
            "ethereum" | "mainnet" | "eth" => Ok(Self::Ethereum),
            "polygon" | "matic" => Ok(Self::Polygon),
            "optimism" | "op" => Ok(Self::Optimism),
            "arbitrum" | "arbitrum-one" => Ok(Self::Arbitrum),
            "base" => Ok(Self::Base),
            "bsc" | "bnb" => Ok(Self::Bsc),
            _ => Err(Error::UnsupportedChain(s.to_string())),
        }
    }
}

/// Accept either a chain name (with its aliases) or a numeric chain id
impl<'de> Deserialize<'de> for ChainID {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Identifier {
            Id(u64),
            Name(String),
        }

        match Identifier::deserialize(deserializer)? {
            Identifier::Id(id) => Self::from_id(id),
            Identifier::Name(name) => Self::from_string(&name),
        }
        .map_err(serde::de::Error::custom)
    }
}

impl Display for ChainID {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_id())
    }
}
