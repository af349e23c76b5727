pub mod hashing;
pub mod openai;
mod remote;
pub mod voyage;
