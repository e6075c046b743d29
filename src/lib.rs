pub mod alignment;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod response;
pub mod styling;
pub mod types;

pub use alignment::report::aggregate;
pub use alignment::segmentation::segment;
pub use alignment::tokenization::normalize;
pub use alignment::word_alignment::{align, align_with_mode};
pub use config::{AlignmentMode, FeedbackConfig};
pub use error::FeedbackError;
pub use pipeline::builder::FeedbackEngineBuilder;
pub use pipeline::runtime::FeedbackEngine;
pub use pipeline::traits::{PhonemeSegmenter, Tokenizer, WordAligner};
pub use response::ForcedAlignmentResponse;
pub use styling::StyleTable;
pub use types::{
    AlignmentReport, CharSegment, ComparisonStatus, Phoneme, PhonemeGroup, RecognizedWord,
    Recognition, Severity, Token, WordComparison, WordScoreType,
};
