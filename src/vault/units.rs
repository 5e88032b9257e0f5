use alloy::primitives::U256;
use bigdecimal::BigDecimal;
use num_bigint::{BigInt, Sign};

/// Exact `raw / 10^decimals`.
pub fn scale_units(raw: U256, decimals: u8) -> BigDecimal {
    let int = BigInt::from_bytes_be(Sign::Plus, &raw.to_be_bytes::<32>());
    BigDecimal::new(int, i64::from(decimals))
}

/// `10^decimals` as a raw on-chain amount, i.e. one whole token or share.
pub fn one_unit(decimals: u8) -> U256 {
    U256::from(10u64).pow(U256::from(decimals))
}
