pub mod lsh;
pub mod minhash;
pub mod normalize;
pub mod shingle;
pub mod similarity;
