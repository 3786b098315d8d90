use std::collections::{BTreeSet, VecDeque};

/// Directed "knowing X implies knowing Y" edges over canonical skill names.
const SKILL_GRAPH: &[(&str, &[&str])] = &[
    // Frameworks
    ("django", &["python", "backend"]),
    ("flask", &["python", "backend"]),
    ("fastapi", &["python", "backend", "api"]),
    ("react", &["javascript", "frontend"]),
    ("angular", &["javascript", "typescript", "frontend"]),
    ("spring", &["java", "backend"]),
    ("spring boot", &["java", "backend"]),
    ("next.js", &["react", "javascript", "frontend"]),
    ("node.js", &["javascript", "backend"]),
    ("pandas", &["python", "data"]),
    // APIs
    ("api", &["http", "rest"]),
    ("rest", &["http methods", "status codes", "idempotency"]),
    ("rest api", &["api", "rest"]),
    ("graphql", &["api", "http"]),
    ("microservices", &["distributed systems", "api"]),
    // Backend
    ("backend", &["database design", "authentication", "caching"]),
    // Databases
    ("postgresql", &["sql", "indexes", "transactions"]),
    ("mysql", &["sql", "indexes", "transactions"]),
    ("mongodb", &["nosql", "indexing"]),
    // DevOps
    ("docker", &["containers"]),
    ("kubernetes", &["docker", "devops", "cloud", "containers", "orchestration"]),
    ("terraform", &["devops", "cloud"]),
    // ML
    ("pytorch", &["python", "machine learning", "neural networks"]),
    ("tensorflow", &["python", "machine learning", "neural networks"]),
    ("scikit-learn", &["python", "machine learning"]),
    ("machine learning", &["supervised learning", "overfitting", "evaluation metrics"]),
];

fn direct_implications(skill: &str) -> &'static [&'static str] {
    SKILL_GRAPH
        .iter()
        .find(|(name, _)| *name == skill)
        .map(|(_, implied)| *implied)
        .unwrap_or(&[])
}

/// Transitive closure of `explicit` over the skill graph. The result always
/// contains the input, and applying it twice changes nothing.
pub fn implied_skills(explicit: &BTreeSet<String>) -> BTreeSet<String> {
    let mut expanded = explicit.clone();
    let mut queue: VecDeque<String> = explicit.iter().cloned().collect();

    while let Some(skill) = queue.pop_front() {
        for implied in direct_implications(&skill) {
            if expanded.insert((*implied).to_string()) {
                queue.push_back((*implied).to_string());
            }
        }
    }

    expanded
}
