pub mod agent;
pub mod api;
pub mod config;
pub mod data_models;
pub mod error;
pub mod extractor;
pub mod fetcher;
pub mod mock_data;
pub mod normalizer;
pub mod search;
