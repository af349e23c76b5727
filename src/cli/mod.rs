pub mod commands;
pub mod demo;
pub mod parse;
