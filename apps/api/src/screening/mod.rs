pub mod evaluator;
pub mod handlers;
pub mod parser;
pub mod store;
