//! Text signals computed per claim: vocabulary lists, clarity, token counts,
//! technology keywords with the implied-skill graph, and job-description
//! relevance.

pub mod clarity;
pub mod cross_reference;
pub mod keywords;
pub mod ontology;
pub mod relevance;
pub mod tokenizer;
pub mod vocabulary;
