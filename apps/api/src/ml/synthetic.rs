//! Synthetic labeled claims and résumés.
//!
//! Claims are drawn from template pools grouped by how well they hold up in
//! an interview, filled from word pools, then roughened with the casing,
//! punctuation and wording noise real résumés have. Everything is driven by
//! a seeded `ChaCha8Rng`, so a seed always reproduces the same corpus.

use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

use crate::parsing::ExtractedClaim;
use crate::util::round_to;

// ────────────────────────────────────────────────────────────────────────────
// Template pools
// ────────────────────────────────────────────────────────────────────────────

const STRONG_WITH_METRICS: &[&str] = &[
    "Led a team of {n} engineers to redesign the {system}, reducing {metric} by {pct}%",
    "Built a {system} processing {n}+ requests per second using {tech}",
    "Implemented {tech} integration reducing deployment time from {n} days to {n2} hours",
    "Optimized {system} queries improving response time by {pct}%",
    "Developed REST APIs serving {n},000 daily users using {tech}",
    "Automated {system} using {tech}, cutting manual effort by {pct}%",
    "Migrated {system} to {tech}, reducing infrastructure costs by {pct}%",
    "Achieved {pct}% test coverage for {system} using {tech}",
    "Scaled {system} from {n} to {n2}00 concurrent users using {tech}",
    "Reduced {system} downtime by {pct}% through {tech} monitoring",
];

const SHORT_STRONG_CLAIMS: &[&str] = &[
    "Reduced latency by 40%",
    "Automated deployments using Docker",
    "Optimized SQL queries improving performance",
    "Built REST API using FastAPI",
    "Scaled service to 50k users",
    "Implemented caching with Redis",
    "Improved response time by 3x",
    "Deployed application on AWS",
    "Designed database schema for PostgreSQL",
    "Wrote unit tests achieving 90% coverage",
];

const STRONG_NO_METRICS: &[&str] = &[
    "Designed caching strategy for {system} using Redis",
    "Refactored authentication service improving maintainability",
    "Implemented retry logic and circuit breaker pattern in {system}",
    "Wrote comprehensive integration tests for {system}",
    "Migrated backend service from Flask to FastAPI",
    "Introduced structured logging across all microservices",
    "Containerized entire application stack using Docker Compose",
    "Designed normalized database schema for {system}",
    "Implemented event-driven architecture using Kafka for {system}",
    "Set up automated CI pipeline with GitHub Actions for {system}",
    "Built real-time notification service using WebSockets",
    "Implemented role-based access control for {system}",
    "Created reusable component library for frontend dashboard",
    "Architected data pipeline for ETL processing using {tech}",
    "Implemented caching layer using Redis for {system}",
];

const WEAK_CLAIMS: &[&str] = &[
    "Responsible for {system} maintenance",
    "Helped with {tech} related tasks",
    "Worked on various {system} projects",
    "Assisted in {system} development",
    "Involved in {tech} implementation",
    "Participated in {system} activities",
    "Contributed to {system} efforts",
    "Supported the team with {system} work",
    "Handled {system} duties",
    "Managed {system} responsibilities",
    "Tasked with {system} operations",
    "Part of the team working on {system}",
];

const BUZZWORD_CLAIMS: &[&str] = &[
    "Worked on scalable microservices architecture using {tech} and Docker",
    "Implemented distributed system using cloud native technologies and {tech}",
    "Built highly scalable platform leveraging modern DevOps tools",
    "Designed enterprise level solution using best practices and {tech}",
    "Developed AI powered system using machine learning and big data",
    "Utilized cutting edge technologies including {tech} and {tech2}",
    "Leveraged agile methodologies to deliver {system} solutions",
    "Employed industry standard frameworks for {system} development",
    "Applied best-in-class {tech} solutions for {system}",
    "Spearheaded transformational initiatives across {system}",
];

const MEDIUM_CLAIMS: &[&str] = &[
    "Developed {system} using {tech}",
    "Built {tool} for {system} automation",
    "Created {system} module using {tech} and {tech2}",
    "Designed {system} architecture for {tool}",
    "Implemented {tech} solution for {system}",
    "Integrated {tech} with {system}",
    "Added {tech} support to existing {system}",
    "Updated {system} backend to use {tech}",
];

const BELIEVABLE_CLAIMS: &[&str] = &[
    "Implemented REST API using FastAPI and PostgreSQL",
    "Built authentication service using JWT tokens",
    "Created dashboard using React and Chart.js",
    "Integrated Stripe payment gateway",
    "Developed backend endpoints for order management",
    "Designed database schema for inventory system",
    "Added Redis caching layer to API",
    "Containerized application with Docker",
    "Wrote unit tests using PyTest",
    "Set up logging and monitoring for services",
];

// ────────────────────────────────────────────────────────────────────────────
// Word pools
// ────────────────────────────────────────────────────────────────────────────

const TECHS: &[&str] = &[
    "Python", "FastAPI", "React", "Docker", "PostgreSQL", "Redis", "AWS", "Kubernetes", "Flask",
    "TensorFlow", "Django", "Node.js", "TypeScript", "MongoDB",
];

const SYSTEMS: &[&str] = &[
    "payment processing",
    "authentication service",
    "data pipeline",
    "API gateway",
    "search engine",
    "recommendation system",
    "analytics dashboard",
    "notification service",
    "order management",
    "inventory tracking",
];

const TOOLS: &[&str] = &[
    "CI/CD", "monitoring", "logging", "caching", "deployment", "alerting", "backup", "testing",
];

const METRICS: &[&str] = &["latency", "errors", "failures", "processing time", "response time"];

const SECTIONS: &[&str] = &["experience", "projects"];

const SYNONYMS: &[(&str, [&str; 3])] = &[
    ("Built", ["Created", "Developed", "Implemented"]),
    ("Led", ["Managed", "Directed", "Oversaw"]),
    ("Reduced", ["Decreased", "Lowered", "Cut"]),
    ("Improved", ["Enhanced", "Optimized", "Boosted"]),
    ("Designed", ["Architected", "Planned", "Engineered"]),
];

/// Share of (strong, medium, weak, buzzword) claims in a synthetic résumé,
/// from all-strong down to mostly weak.
const QUALITY_PROFILES: [[f64; 4]; 8] = [
    [1.00, 0.00, 0.00, 0.00],
    [0.85, 0.15, 0.00, 0.00],
    [0.70, 0.20, 0.10, 0.00],
    [0.55, 0.25, 0.15, 0.05],
    [0.35, 0.30, 0.25, 0.10],
    [0.15, 0.20, 0.45, 0.20],
    [0.05, 0.10, 0.55, 0.30],
    [0.00, 0.05, 0.60, 0.35],
];

const MIN_RESUME_CLAIMS: usize = 4;
const MAX_RESUME_CLAIMS: usize = 14;
const MAX_DEPTH_BONUS: f64 = 5.0;
const SCORE_NOISE: f64 = 4.0;

// ────────────────────────────────────────────────────────────────────────────
// Output types
// ────────────────────────────────────────────────────────────────────────────

/// Label 0 is a claim that holds up, 1 one that will not.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LabeledClaim {
    pub claim: ExtractedClaim,
    pub label: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClaimQuality {
    Strong,
    Medium,
    Weak,
    Buzzword,
}

/// Per-claim contribution to a synthetic résumé's target score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityWeights {
    pub strong: f64,
    pub medium: f64,
    pub weak: f64,
    pub buzzword: f64,
}

impl Default for QualityWeights {
    fn default() -> Self {
        QualityWeights {
            strong: 1.0,
            medium: 0.5,
            weak: -0.3,
            buzzword: -0.5,
        }
    }
}

impl QualityWeights {
    pub fn weight(&self, quality: ClaimQuality) -> f64 {
        match quality {
            ClaimQuality::Strong => self.strong,
            ClaimQuality::Medium => self.medium,
            ClaimQuality::Weak => self.weak,
            ClaimQuality::Buzzword => self.buzzword,
        }
    }

    fn lowest(&self) -> f64 {
        self.strong.min(self.medium).min(self.weak).min(self.buzzword)
    }

    fn highest(&self) -> f64 {
        self.strong.max(self.medium).max(self.weak).max(self.buzzword)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticResume {
    pub claims: Vec<ExtractedClaim>,
    /// Target readiness score on [0, 100], 1dp.
    pub score: f64,
}

// ────────────────────────────────────────────────────────────────────────────
// Generator
// ────────────────────────────────────────────────────────────────────────────

pub struct SyntheticGenerator {
    rng: ChaCha8Rng,
}

impl SyntheticGenerator {
    pub fn new(seed: u64) -> Self {
        SyntheticGenerator {
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    fn pick(&mut self, pool: &[&'static str]) -> &'static str {
        pool.choose(&mut self.rng).copied().unwrap_or_default()
    }

    fn chance(&mut self, p: f64) -> bool {
        self.rng.gen::<f64>() < p
    }

    fn section(&mut self) -> String {
        self.pick(SECTIONS).to_string()
    }

    /// Lowercasing, dropped commas, "using" → "with", dropped trailing
    /// period and doubled spaces, each with its own probability.
    fn add_noise(&mut self, text: &str) -> String {
        let mut text = text.to_string();
        if self.chance(0.15) {
            text = text.to_lowercase();
        }
        if self.chance(0.15) {
            text = text.replace(',', "");
        }
        if self.chance(0.20) {
            text = text.replace(" using ", " with ");
        }
        if self.chance(0.15) {
            text = text.trim_end_matches('.').to_string();
        }
        if self.chance(0.10) {
            text = text.replace(' ', "  ");
        }
        text
    }

    fn vary_verbs(&mut self, text: &str) -> String {
        let mut text = text.to_string();
        for (verb, alternatives) in SYNONYMS {
            let replacement = self.pick(alternatives);
            if self.chance(0.4) {
                text = text.replace(verb, replacement);
            }
        }
        text
    }

    /// Fills every placeholder, drawing all values up front so a template's
    /// shape never changes how many numbers the generator consumes.
    fn fill(&mut self, template: &str) -> String {
        let n = self.rng.gen_range(3..=20).to_string();
        let n2 = self.rng.gen_range(1..=5).to_string();
        let pct = self.rng.gen_range(15..=80).to_string();
        let tech = self.pick(TECHS);
        let tech2 = self.pick(TECHS);
        let system = self.pick(SYSTEMS);
        let tool = self.pick(TOOLS);
        let metric = self.pick(METRICS);

        let text = template
            .replace("{n2}", &n2)
            .replace("{n}", &n)
            .replace("{pct}", &pct)
            .replace("{tech2}", tech2)
            .replace("{tech}", tech)
            .replace("{system}", system)
            .replace("{tool}", tool)
            .replace("{metric}", metric);
        let noisy = self.add_noise(&text);
        self.vary_verbs(&noisy)
    }

    fn claim_text(&mut self, quality: ClaimQuality) -> String {
        match quality {
            ClaimQuality::Strong => {
                if self.chance(0.5) {
                    let template = self.pick(STRONG_WITH_METRICS);
                    self.fill(template)
                } else {
                    let pool: Vec<&'static str> = STRONG_NO_METRICS
                        .iter()
                        .chain(SHORT_STRONG_CLAIMS)
                        .copied()
                        .collect();
                    let template = self.pick(&pool);
                    self.fill(template)
                }
            }
            ClaimQuality::Medium => {
                let pool: Vec<&'static str> = MEDIUM_CLAIMS
                    .iter()
                    .chain(BELIEVABLE_CLAIMS)
                    .copied()
                    .collect();
                let template = self.pick(&pool);
                self.fill(template)
            }
            ClaimQuality::Weak => {
                let template = self.pick(WEAK_CLAIMS);
                self.fill(template)
            }
            ClaimQuality::Buzzword => {
                let template = self.pick(BUZZWORD_CLAIMS);
                self.fill(template)
            }
        }
    }

    /// A random claim of the given quality in a random section.
    pub fn claim(&mut self, quality: ClaimQuality) -> ExtractedClaim {
        let section = self.section();
        let text = self.claim_text(quality);
        ExtractedClaim::new(text, section)
    }

    /// Labeled claims for the risk classifier: four rows per unit (strong,
    /// risky, medium with a 60/40 label split, short strong), shuffled.
    pub fn claim_dataset(&mut self, units: usize) -> Vec<LabeledClaim> {
        let mut rows = Vec::with_capacity(units * 4);

        for _ in 0..units {
            let section = self.section();

            let strong = if self.chance(0.5) {
                let template = self.pick(STRONG_WITH_METRICS);
                self.fill(template)
            } else {
                let template = self.pick(STRONG_NO_METRICS);
                self.fill(template)
            };
            rows.push(LabeledClaim {
                claim: ExtractedClaim::new(strong, section.clone()),
                label: 0,
            });

            let risky = if self.chance(0.6) {
                let template = self.pick(WEAK_CLAIMS);
                self.fill(template)
            } else {
                let template = self.pick(BUZZWORD_CLAIMS);
                self.fill(template)
            };
            rows.push(LabeledClaim {
                claim: ExtractedClaim::new(risky, section.clone()),
                label: 1,
            });

            let medium = if self.chance(0.5) {
                let template = self.pick(MEDIUM_CLAIMS);
                self.fill(template)
            } else {
                let text = self.pick(BELIEVABLE_CLAIMS);
                self.add_noise(text)
            };
            let medium_label = if self.chance(0.6) { 0 } else { 1 };
            rows.push(LabeledClaim {
                claim: ExtractedClaim::new(medium, section),
                label: medium_label,
            });

            let short = self.pick(SHORT_STRONG_CLAIMS).to_string();
            let short_section = self.section();
            rows.push(LabeledClaim {
                claim: ExtractedClaim::new(short, short_section),
                label: 0,
            });
        }

        rows.shuffle(&mut self.rng);
        rows
    }

    /// Synthetic résumés with a target score derived from claim quality.
    ///
    /// `score = clamp(((avg_weight − lowest) / (highest − lowest))·100 +
    /// min(5, (n − 4)·0.5) ± 4, 0, 100)`; with the default weights the
    /// normalization is `(avg + 0.5) / 1.5`.
    pub fn resume_dataset(&mut self, count: usize, weights: &QualityWeights) -> Vec<SyntheticResume> {
        let per_profile = count / QUALITY_PROFILES.len();
        let span = (weights.highest() - weights.lowest()).max(f64::EPSILON);
        let mut resumes = Vec::with_capacity(per_profile * QUALITY_PROFILES.len());

        for [strong, medium, weak, _buzzword] in QUALITY_PROFILES {
            for _ in 0..per_profile {
                let n_claims = self.rng.gen_range(MIN_RESUME_CLAIMS..=MAX_RESUME_CLAIMS);
                let mut claims = Vec::with_capacity(n_claims);
                let mut total = 0.0;

                for _ in 0..n_claims {
                    let r: f64 = self.rng.gen();
                    let quality = if r < strong {
                        ClaimQuality::Strong
                    } else if r < strong + medium {
                        ClaimQuality::Medium
                    } else if r < strong + medium + weak {
                        ClaimQuality::Weak
                    } else {
                        ClaimQuality::Buzzword
                    };
                    claims.push(self.claim(quality));
                    total += weights.weight(quality);
                }

                let avg = total / n_claims as f64;
                let raw = (avg - weights.lowest()) / span * 100.0;
                let depth_bonus = MAX_DEPTH_BONUS.min((n_claims - MIN_RESUME_CLAIMS) as f64 * 0.5);
                let noise = self.rng.gen_range(-SCORE_NOISE..=SCORE_NOISE);
                let score = (raw + depth_bonus + noise).clamp(0.0, 100.0);

                resumes.push(SyntheticResume {
                    claims,
                    score: round_to(score, 1),
                });
            }
        }

        resumes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_dataset_shape() {
        let rows = SyntheticGenerator::new(42).claim_dataset(50);
        assert_eq!(rows.len(), 200);
        let positives = rows.iter().filter(|r| r.label == 1).count();
        // 50 risky rows plus roughly 40% of 50 medium rows
        assert!((55..=95).contains(&positives), "positives = {positives}");
        assert!(rows
            .iter()
            .all(|r| r.claim.section == "experience" || r.claim.section == "projects"));
    }

    #[test]
    fn test_same_seed_same_corpus() {
        let a = SyntheticGenerator::new(7).claim_dataset(20);
        let b = SyntheticGenerator::new(7).claim_dataset(20);
        assert_eq!(a, b);
        let c = SyntheticGenerator::new(8).claim_dataset(20);
        assert_ne!(a, c);
    }

    #[test]
    fn test_templates_are_fully_filled() {
        let mut generator = SyntheticGenerator::new(1);
        for row in generator.claim_dataset(100) {
            assert!(!row.claim.text.contains('{'), "unfilled template: {}", row.claim.text);
        }
    }

    #[test]
    fn test_resume_scores_follow_quality() {
        let mut generator = SyntheticGenerator::new(42);
        let resumes = generator.resume_dataset(80, &QualityWeights::default());
        assert_eq!(resumes.len(), 80);
        for r in &resumes {
            assert!((MIN_RESUME_CLAIMS..=MAX_RESUME_CLAIMS).contains(&r.claims.len()));
            assert!((0.0..=100.0).contains(&r.score));
        }
        let mean = |rs: &[SyntheticResume]| rs.iter().map(|r| r.score).sum::<f64>() / rs.len() as f64;
        // first profile is all strong, last is mostly weak
        assert!(mean(&resumes[..10]) > 90.0);
        assert!(mean(&resumes[70..]) < 25.0);
    }

    #[test]
    fn test_default_weights() {
        let w = QualityWeights::default();
        assert_eq!(w.weight(ClaimQuality::Strong), 1.0);
        assert_eq!(w.weight(ClaimQuality::Buzzword), -0.5);
    }
}
