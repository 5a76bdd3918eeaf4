//! Move-method dataset extraction.
//!
//! Builds a labeled training corpus for a move-method refactoring
//! classifier from a snapshot of a Java project:
//! - Entity arena for classes and methods
//! - Eligibility filter pipelines
//! - Candidate generation (method x target-class search space)
//! - Labeled bipartite graph assembly with dense integer IDs
//! - Context-path extractor seam
//! - CSV serialization of the three joinable output tables

pub mod context;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod graph;
pub mod model;
pub mod pipeline;
pub mod serialize;
