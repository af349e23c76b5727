pub mod collection_name;
pub mod distance;
pub mod filter;
pub mod include;
pub mod metadata;
