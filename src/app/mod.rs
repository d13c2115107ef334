pub mod pipelines;

pub use pipelines::mention_pipeline::MentionPipeline;
