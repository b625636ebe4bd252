// Semantic core — deterministic embedding, similarity, clustering, labels.

pub mod cluster;
pub mod embed;
pub mod label;
pub mod similarity;
pub mod tokenize;
pub mod traits;
