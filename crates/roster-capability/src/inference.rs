//! Lexical inference of capability facets from prose.
//!
//! Every table is a static ordered list of `(tag, matcher)` pairs. Matchers
//! are case-insensitive and word-boundary anchored; a tag is emitted at most
//! once no matter how many of its variants appear.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

/// Specialization tag → alternation of terms that imply it.
const SPECIALIZATION_PATTERNS: &[(&str, &str)] = &[
    ("api_design", r"REST|GraphQL|gRPC|API design|API development"),
    ("database", r"database|SQL|NoSQL|PostgreSQL|MongoDB|Redis"),
    ("frontend", r"React|Vue|Angular|frontend|UI|user interface"),
    ("backend", r"backend|server|Node\.js|Python|microservices"),
    ("security", r"security|authentication|authorization|encryption|OWASP"),
    ("performance", r"performance|optimization|caching|scalability"),
    ("testing", r"testing|QA|quality assurance|test automation"),
    ("devops", r"DevOps|CI/CD|deployment|infrastructure|Docker|Kubernetes"),
    ("ml_ai", r"machine learning|ML|AI|neural networks|NLP|computer vision"),
    ("data_engineering", r"data pipeline|ETL|data processing|Apache Spark"),
];

/// Closed technology vocabulary.
const TECHNOLOGIES: &[&str] = &[
    "JavaScript", "TypeScript", "Python", "Java", "Go", "Rust", "Ruby",
    "Node.js", "React", "Vue", "Angular", "Django", "Flask", "Express",
    "PostgreSQL", "MySQL", "MongoDB", "Redis", "Elasticsearch",
    "Docker", "Kubernetes", "AWS", "Azure", "GCP",
    "REST", "GraphQL", "gRPC", "WebSocket",
    "Git", "GitHub", "GitLab", "Jenkins", "CircleCI",
];

/// Words never kept as keywords.
const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from",
    "has", "he", "in", "is", "it", "its", "of", "on", "that", "the",
    "to", "was", "will", "with", "this", "but", "they", "have",
];

static SPECIALIZATION_MATCHERS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    SPECIALIZATION_PATTERNS
        .iter()
        .map(|(tag, terms)| (*tag, word_matcher(terms)))
        .collect()
});

static TECHNOLOGY_MATCHERS: LazyLock<Vec<(&'static str, Regex)>> = LazyLock::new(|| {
    TECHNOLOGIES
        .iter()
        .map(|tech| (*tech, word_matcher(&regex::escape(tech))))
        .collect()
});

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").expect("static regex"));

fn word_matcher(alternation: &str) -> Regex {
    Regex::new(&format!(r"(?i)\b(?:{alternation})\b")).expect("static inference pattern")
}

/// Specialization tags implied by `content`, in table order.
pub fn infer_specializations(content: &str) -> Vec<String> {
    SPECIALIZATION_MATCHERS
        .iter()
        .filter(|(_, matcher)| matcher.is_match(content))
        .map(|(tag, _)| tag.to_string())
        .collect()
}

/// Technologies from the fixed vocabulary mentioned in `content`.
pub fn infer_technologies(content: &str) -> Vec<String> {
    TECHNOLOGY_MATCHERS
        .iter()
        .filter(|(_, matcher)| matcher.is_match(content))
        .map(|(tech, _)| tech.to_string())
        .collect()
}

/// Lower-cased word tokens of `text`, in order, duplicates kept.
pub fn word_tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    WORD.find_iter(text).map(|m| m.as_str().to_lowercase())
}

/// Keywords used for fuzzy matching: tokens longer than three characters
/// that are not stop words.
pub fn extract_keywords(description: &str) -> BTreeSet<String> {
    word_tokens(description)
        .filter(|w| w.chars().count() > 3 && !STOP_WORDS.contains(&w.as_str()))
        .collect()
}
