pub mod analysis_queries;
