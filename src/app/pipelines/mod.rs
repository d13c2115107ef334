pub mod mention_pipeline;
