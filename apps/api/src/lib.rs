//! Résumé claim analysis: segments résumé text into sections, extracts
//! accomplishment claims, scores how well each would survive interview
//! scrutiny and rolls the results up into a readiness report.

pub mod analysis;
pub mod config;
pub mod errors;
pub mod ml;
pub mod nlp;
pub mod parsing;
pub mod routes;
pub mod state;
pub mod util;
