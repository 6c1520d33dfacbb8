//! Training pipeline: labeled corpus in, serving artifacts out.

mod corpus;
mod pipeline;

pub use corpus::{load_corpus, load_corpus_path, LabeledUrl};
pub use pipeline::{TrainedModel, TrainingPipeline, TrainingReport};
