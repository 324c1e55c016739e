//! Lead Quality Engine Library
//!
//! Scores uploaded sales leads with a fixed rule set, drafts follow-up
//! messages through an LLM with template fallback, and aggregates dashboard
//! statistics.
//!
//! # Modules
//!
//! - `aggregator`: Dashboard statistics over scored leads.
//! - `circuit_breaker`: Circuit breaker guarding the LLM provider.
//! - `composer`: Prompt building and follow-up message composition.
//! - `config`: Configuration management.
//! - `db`: Database connection and schema setup.
//! - `errors`: Error handling types.
//! - `generator`: Text-generation capability trait.
//! - `handlers`: HTTP request handlers.
//! - `ingestion`: CSV upload parsing and validation.
//! - `lead_store`: Lead storage (in memory or PostgreSQL).
//! - `llm_client`: OpenAI-compatible chat completion client.
//! - `models`: Core data models.
//! - `reply_parser`: Section extraction from generated replies.
//! - `routes`: Router assembly and CORS.
//! - `scoring`: Rule-based lead scoring.
//! - `templates`: Fallback message copy.
//! - `timestamp`: Lenient lead timestamp parsing.

pub mod aggregator;
pub mod circuit_breaker;
pub mod composer;
pub mod config;
pub mod db;
pub mod errors;
pub mod generator;
pub mod handlers;
pub mod ingestion;
pub mod lead_store;
pub mod llm_client;
pub mod models;
pub mod reply_parser;
pub mod routes;
pub mod scoring;
pub mod templates;
pub mod timestamp;
