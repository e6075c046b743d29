pub mod report;
pub mod segmentation;
pub mod tokenization;
pub mod word_alignment;
