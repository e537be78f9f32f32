pub mod account;
pub mod evaluation;
pub mod solution;
