pub mod tokenizer;

pub use tokenizer::{tokenize, TokenizeError, Tokenizer, TokenizerOptions};
