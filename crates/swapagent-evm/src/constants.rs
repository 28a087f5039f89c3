use alloy_primitives::{address, Address};

use crate::ChainID;

/// Decimals assumed for a token whose `decimals()` could not be read
pub const DEFAULT_DECIMALS: u8 = 18;

/// Default slippage tolerance, in percent
pub const DEFAULT_SLIPPAGE: f64 = 0.1;

/// Contract addresses shared by every supported network
pub struct Contract;

impl Contract {
    /// 1inch aggregation router v6, spender of the swapped token
    pub const ONE_INCH_ROUTER: Address = address!("111111125421cA6dc452d289314280a0f8842A65");
    /// ERC-4337 EntryPoint v0.6
    pub const ENTRY_POINT_V06: Address = address!("5FF137D4b0FDCD49DcA30c7CF57E578a026d2789");
}

pub struct Token {
    pub symbol: &'static str,
    pub decimals: u8,
    pub address: Address,
}

impl Token {
    /// Pseudo address standing for the chain's base asset
    pub const NATIVE_ADDRESS: Address = address!("EeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE");

    /// Return true if `address` designates the native asset. Addresses are compared
    /// as bytes so the checksum casing of the input does not matter.
    pub fn is_native(address: &Address) -> bool {
        *address == Self::NATIVE_ADDRESS
    }

    pub const fn usdc(chain_id: &ChainID) -> Token {
        match chain_id {
            ChainID::Ethereum => Token {
                symbol: "USDC",
                decimals: 6,
                address: address!("A0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48"),
            },
            ChainID::Polygon => Token {
                symbol: "USDC",
                decimals: 6,
                address: address!("3c499c542cEF5E3811e1192ce70d8cC03d5c3359"),
            },
            ChainID::Optimism => Token {
                symbol: "USDC",
                decimals: 6,
                address: address!("0b2C639c533813f4Aa9D7837CAf62653d097Ff85"),
            },
            ChainID::Arbitrum => Token {
                symbol: "USDC",
                decimals: 6,
                address: address!("af88d065e77c8cC2239327C5EDb3A432268e5831"),
            },
            ChainID::Base => Token {
                symbol: "USDC",
                decimals: 6,
                address: address!("833589fCD6eDb6E08f4c7C32D4f71b54bdA02913"),
            },
            ChainID::Bsc => Token {
                symbol: "USDC",
                decimals: 18,
                address: address!("8AC76a51cc950d9822D68b83fE1Ad97B32Cd580d"),
            },
        }
    }
}
