pub mod huggingface;
pub mod lexicon;
pub mod price_provider;
pub mod sentiment_model;
pub mod yahoofinance;
