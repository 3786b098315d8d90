//! Claim scoring, vulnerability mapping and the end-to-end report.

pub mod handlers;
pub mod models;
pub mod pipeline;
pub mod vulnerability;

pub use models::{AnalysisReport, Claim};
pub use pipeline::{analyze_resume, score_claims};
pub use vulnerability::{map_vulnerabilities, Vulnerability, VulnerabilityMap};
