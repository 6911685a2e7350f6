pub mod auth_service;
pub mod corpus_service;
pub mod failure_cache;
pub mod history_service;
pub mod indicators;
pub mod price_service;
pub mod recommendation_service;
pub mod relevance_service;
pub mod report_service;
pub mod sentiment_service;
pub mod similarity_service;
pub mod stopwords;
pub mod technical_service;
pub mod tfidf;
