use soroban_sdk::contracterror;

#[contracterror]
#[derive(Copy, Clone, Debug, Eq, PartialEq, PartialOrd, Ord)]
#[repr(u32)]
pub enum Error {
    Unauthorized = 1,
    AlreadySet = 2,
    UnknownConnector = 3,
    InsufficientRepayment = 4,
    ZeroAddress = 5,
    RouteUnavailable = 6,
    NotSet = 7,
    AlreadyInitialized = 8,
    NotInitialized = 9,
    InvalidInput = 10,
    LengthMismatch = 11,
    PositionNotFound = 12,
    PositionNotOpen = 13,
    OperationInFlight = 14,
    CallbackMismatch = 15,
    CallbackNotReceived = 16,
    AccountMismatch = 17,
    PositionNotUnwound = 18,
    InvalidFee = 19,
    AssetInUse = 20,
}
