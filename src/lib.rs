// Kindling: semantic engine for collaborative idea boards
//
// This is the library root. The semantic module is the numeric core
// (embedding, similarity, clustering, labels); the engine composes it
// with storage and the text-generation provider.

pub mod config;
pub mod engine;
pub mod generate;
pub mod output;
pub mod semantic;
pub mod store;
