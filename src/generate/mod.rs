// Text generation — suggestions, board insights, and mood classification.

pub mod groq;
pub mod template;
pub mod traits;
