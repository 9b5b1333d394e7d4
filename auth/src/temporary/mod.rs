pub mod generator;

pub use generator::constant_time_eq;
pub use generator::TemporaryToken;
pub use generator::TemporaryTokenGenerator;
