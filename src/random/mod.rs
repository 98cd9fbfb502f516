pub mod hash_code;
pub mod weights;

pub use hash_code::{gen_hash_code, gen_hash_code_with};
pub use weights::MapWeights;
