//Numerical constants shared across the crate

pub const LN_TWO_PI : f64 = 1.8378770664093453f64;

//Default comparison threshold for tests
pub const DEFAULT_TEST_THRESH : f64 = 0.0001f64;

//Looser threshold for tests which compare against sample moments
pub const SAMPLING_TEST_THRESH : f64 = 0.05f64;

pub const TEST_BASE_SEED : u64 = 0xfa57;
