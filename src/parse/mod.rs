pub mod import_parser;

pub use import_parser::*;
