//! Typo-tolerant guest/party lookup: tokenizer, relevance scorer, and the
//! ranked directory search engine.

pub mod engine;
pub mod scorer;
pub mod tokenizer;

pub use engine::{ScoredParty, SearchEngine, SearchOutcome, SearchTicket, rank};
pub use scorer::{EXACT_PHRASE_THRESHOLD, score};
pub use tokenizer::tokenize;
