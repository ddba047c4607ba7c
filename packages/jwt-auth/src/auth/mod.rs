pub mod algorithm;
pub mod claims;
pub mod token;

pub use algorithm::SigningAlgorithm;
pub use claims::{Claims, RESERVED_CLAIMS};
pub use token::{decode_token, encode_token};
