pub mod charts;
pub mod fetch;
pub mod grid;
pub mod output;
pub mod page;
pub mod parser;
