//! Collaborator traits for the voice query pipeline
//!
//! Every external capability the orchestrator depends on sits behind one of
//! these traits so backends can be swapped by configuration and replaced by
//! fakes in tests.
//!
//! ```text
//! Speech:      SpeechToText  - audio -> transcript
//! Text:        Translator    - source language -> working language
//! Retrieval:   WebSearch     - query -> ranked web passages
//!              Embedder      - passages -> fixed-dimension vectors
//! Generation:  LanguageModel - grounded prompt -> answer text
//! ```

mod embedding;
mod llm;
mod search;
mod speech;
mod text_processing;

pub use embedding::Embedder;
pub use llm::LanguageModel;
pub use search::WebSearch;
pub use speech::SpeechToText;
pub use text_processing::Translator;
