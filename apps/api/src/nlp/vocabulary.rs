//! Fixed word lists used across claim extraction, feature building and the
//! vulnerability mapper.

/// Verbs that count as a strong opening for the clarity and feature scores.
/// Kept deliberately small: the trained model's weights depend on this set.
pub const CLARITY_ACTION_VERBS: &[&str] = &[
    "led",
    "built",
    "created",
    "designed",
    "developed",
    "implemented",
    "optimized",
    "reduced",
    "increased",
];

/// Broad accomplishment-verb list used to tell real claims from role headers
/// and title fragments.
pub const CLAIM_ACTION_VERBS: &[&str] = &[
    "achieved", "added", "analyzed", "architected", "automated", "boosted", "built",
    "championed", "coached", "collaborated", "configured", "contributed", "converted",
    "coordinated", "created", "cut", "debugged", "decreased", "defined", "delivered",
    "deployed", "designed", "developed", "directed", "drove", "eliminated", "enabled",
    "engineered", "enhanced", "established", "expanded", "founded", "generated", "grew",
    "handled", "headed", "identified", "implemented", "improved", "increased",
    "initiated", "integrated", "introduced", "launched", "led", "lowered", "maintained",
    "managed", "mentored", "migrated", "modernized", "monitored", "negotiated",
    "optimized", "orchestrated", "organized", "oversaw", "owned", "partnered",
    "pioneered", "planned", "presented", "produced", "published", "rebuilt", "redesigned",
    "reduced", "refactored", "released", "replaced", "researched", "resolved",
    "restructured", "saved", "scaled", "secured", "shipped", "simplified", "spearheaded",
    "streamlined", "supported", "taught", "tested", "trained", "transformed", "tuned",
    "upgraded", "wrote",
];

/// Phrases that signal the writer is describing a duty, not an outcome.
pub const WEAK_LANGUAGE_PHRASES: &[&str] = &[
    "responsible for",
    "helped with",
    "assisted in",
    "involved in",
    "worked on",
];

/// Words that mark a before/after comparison.
pub const COMPARISON_WORDS: &[&str] = &[
    "improved",
    "reduced",
    "increased",
    "compared",
    "faster",
    "better",
];

/// Filler phrases that inflate a claim without adding anything checkable.
pub const BUZZWORD_PHRASES: &[&str] = &[
    "best practices",
    "best-in-class",
    "big data",
    "cloud native",
    "cutting edge",
    "cutting-edge",
    "enterprise level",
    "enterprise-level",
    "highly scalable",
    "industry standard",
    "leveraged",
    "leveraging",
    "modern devops",
    "next-generation",
    "ai powered",
    "ai-powered",
    "synergy",
    "transformational",
    "utilized",
    "world-class",
];

/// English stop words removed before TF-IDF relevance scoring.
pub const STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "also", "am", "an", "and",
    "any", "are", "as", "at", "be", "because", "been", "before", "being", "below",
    "between", "both", "but", "by", "can", "could", "did", "do", "does", "doing", "down",
    "during", "each", "etc", "few", "for", "from", "further", "had", "has", "have",
    "having", "he", "her", "here", "hers", "him", "his", "how", "i", "if", "in", "into",
    "is", "it", "its", "itself", "just", "may", "me", "more", "most", "must", "my", "no",
    "nor", "not", "now", "of", "off", "on", "once", "only", "or", "other", "our", "ours",
    "out", "over", "own", "per", "same", "she", "should", "so", "some", "such", "than",
    "that", "the", "their", "theirs", "them", "then", "there", "these", "they", "this",
    "those", "through", "to", "too", "under", "until", "up", "us", "very", "was", "we",
    "were", "what", "when", "where", "which", "while", "who", "whom", "why", "will",
    "with", "within", "would", "you", "your", "yours",
];

pub fn is_clarity_verb(word: &str) -> bool {
    CLARITY_ACTION_VERBS.contains(&word)
}

/// True if `word` (any case, surrounding punctuation ignored) is an
/// accomplishment verb.
pub fn is_action_verb(word: &str) -> bool {
    let w = word
        .trim_matches(|c: char| !c.is_alphanumeric())
        .to_lowercase();
    CLAIM_ACTION_VERBS.contains(&w.as_str())
}

/// True if any word of `text` is an accomplishment verb.
pub fn contains_action_verb(text: &str) -> bool {
    text.split_whitespace().any(is_action_verb)
}

pub fn has_weak_language(lower: &str) -> bool {
    WEAK_LANGUAGE_PHRASES.iter().any(|p| lower.contains(p))
}

pub fn count_buzzwords(lower: &str) -> usize {
    BUZZWORD_PHRASES.iter().filter(|p| lower.contains(*p)).count()
}

pub fn is_stop_word(word: &str) -> bool {
    STOP_WORDS.contains(&word)
}
