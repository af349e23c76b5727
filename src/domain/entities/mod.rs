pub mod collection;
pub mod document;
pub mod results;
