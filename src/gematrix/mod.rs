// Gematria results site — page retrieval and results-table parsing.

pub mod client;
pub mod parse;
