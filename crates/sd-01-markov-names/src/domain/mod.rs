//! Domain Layer - Pure business logic
//!
//! This layer contains:
//! - The character n-gram model and weighted draws
//! - Label splitting, training windows and label generation
//! - The suffix registry generated labels are attached to
//! - Configuration
//!
//! RULES:
//! - No I/O operations
//! - No async code

pub mod config;
pub mod label;
pub mod ngram;
pub mod registry;

pub use config::MarkovConfig;
pub use label::{clean_name, generate_label, split_name, training_ngrams};
pub use ngram::{NgramModel, Transition, SENTINEL, TERMINATOR};
pub use registry::SuffixRegistry;
