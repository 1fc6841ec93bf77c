pub const BPS_DENOMINATOR: u128 = 10_000;
pub const MAX_FEE_BPS: u32 = 10_000;
pub const SCALE_1E6: u128 = 1_000_000u128;
/// Amount sentinel meaning "the whole balance/debt".
pub const MAX_AMOUNT: u128 = u128::MAX;
/// Amount sentinel meaning "the output of the previous step".
pub const CHAINED_AMOUNT: u128 = 0;
pub const MAX_STEPS: u32 = 16;
pub const MAX_BASKET_LEN: u32 = 8;
pub const TTL_THRESHOLD: u32 = 100_000_000;
pub const TTL_EXTEND_TO: u32 = 200_000_000;
