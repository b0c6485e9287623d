//! Pattern and vocabulary tables read by the text normalizer and the query
//! classifier.
//!
//! Built-in defaults cover the storefront this bot was written for. A YAML
//! file may override any subset of the tables; omitted keys keep their
//! defaults.

use std::collections::HashSet;
use std::path::Path;

use regex::{Regex, RegexBuilder};
use serde::Deserialize;

use crate::ConfigError;

const DEFAULT_NOISE_PATTERNS: &[&str] = &[
    r"skip to content",
    r"your cart is empty",
    r"continue shopping",
    r"have an account\?",
    r"log in to check out",
    r"estimated total",
    r"taxes.*calculated at checkout",
    r"check out",
    r"loading\.\.\.",
    r"add to cart",
    r"view cart",
    r"home.*clearance sale",
    r"co-ord sets.*elegant floral",
    r"cart.*loading",
    r"Rs \d+\.\d+",
];

const DEFAULT_PRICE_PATTERN: &str = r"Rs\.?(\d+(?:,\d{3})*(?:\.\d{2})?)";
const DEFAULT_PRICE_LINE_PATTERN: &str = r"Price:\s*([^\n]+)";

const DEFAULT_NAVIGATION_TERMS: &[&str] =
    &["home", "cart", "checkout", "log in", "login", "sign up", "signup"];

const DEFAULT_URDU_TOKENS: &[&str] = &[
    "mujhe", "kaun", "kon", "kaha", "dikhao", "dikho", "kya", "kaise", "batao", "chahiye", "hai",
    "ki", "ap",
];

const DEFAULT_PRICE_KEYWORDS: &[&str] =
    &["sasta", "cheap", "mehnga", "expensive", "price", "budget"];

const DEFAULT_CHEAP_KEYWORDS: &[&str] = &["sasta", "cheap", "budget", "affordable"];

const DEFAULT_COLORS: &[&str] = &[
    "red", "blue", "green", "black", "white", "pink", "yellow", "purple",
];

const DEFAULT_CATEGORIES: &[&str] = &["dress", "saree", "suit", "kurta", "shirt", "pant", "dupatta"];

/// One ordered noise-removal step: every case-insensitive match of `pattern`
/// is replaced with `replacement`.
#[derive(Debug, Clone)]
pub struct NoiseRule {
    pub pattern: Regex,
    pub replacement: String,
}

impl NoiseRule {
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if `pattern` is not a valid regex.
    pub fn new(pattern: &str, replacement: &str) -> Result<Self, ConfigError> {
        let compiled = RegexBuilder::new(pattern)
            .case_insensitive(true)
            .build()
            .map_err(|e| {
                ConfigError::Validation(format!("invalid noise pattern '{pattern}': {e}"))
            })?;
        Ok(Self {
            pattern: compiled,
            replacement: replacement.to_string(),
        })
    }
}

#[derive(Debug, Clone)]
pub struct Lexicon {
    pub noise_rules: Vec<NoiseRule>,
    /// First capture group is the numeric price, possibly with thousands commas.
    pub price_pattern: Regex,
    /// First capture group is the rest of a `Price:` line.
    pub price_line_pattern: Regex,
    pub navigation_terms: Vec<String>,
    pub urdu_tokens: Vec<String>,
    pub price_keywords: Vec<String>,
    pub cheap_keywords: Vec<String>,
    pub colors: Vec<String>,
    pub categories: Vec<String>,
}

impl Default for Lexicon {
    fn default() -> Self {
        // The built-in tables are constants; an empty override file cannot fail.
        Self::from_file(LexiconFile::default()).unwrap_or_else(|e| {
            unreachable!("built-in lexicon failed validation: {e}");
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NoisePatternEntry {
    pub pattern: String,
    #[serde(default)]
    pub replacement: String,
}

/// On-disk shape of a lexicon override. Every key is optional.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LexiconFile {
    pub noise_patterns: Option<Vec<NoisePatternEntry>>,
    pub price_pattern: Option<String>,
    pub price_line_pattern: Option<String>,
    pub navigation_terms: Option<Vec<String>>,
    pub urdu_tokens: Option<Vec<String>>,
    pub price_keywords: Option<Vec<String>>,
    pub cheap_keywords: Option<Vec<String>>,
    pub colors: Option<Vec<String>>,
    pub categories: Option<Vec<String>>,
}

impl Lexicon {
    /// Parses a YAML override and merges it over the defaults.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the YAML is malformed or fails validation.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let file: LexiconFile = serde_yaml::from_str(yaml).map_err(ConfigError::LexiconFileParse)?;
        Self::from_file(file)
    }

    fn from_file(file: LexiconFile) -> Result<Self, ConfigError> {
        let noise_rules = match file.noise_patterns {
            Some(entries) => entries
                .iter()
                .map(|e| NoiseRule::new(&e.pattern, &e.replacement))
                .collect::<Result<Vec<_>, _>>()?,
            None => DEFAULT_NOISE_PATTERNS
                .iter()
                .map(|p| NoiseRule::new(p, ""))
                .collect::<Result<Vec<_>, _>>()?,
        };

        let price_pattern = compile_capturing(
            "price_pattern",
            file.price_pattern.as_deref().unwrap_or(DEFAULT_PRICE_PATTERN),
        )?;
        let price_line_pattern = compile_capturing(
            "price_line_pattern",
            file.price_line_pattern
                .as_deref()
                .unwrap_or(DEFAULT_PRICE_LINE_PATTERN),
        )?;

        Ok(Self {
            noise_rules,
            price_pattern,
            price_line_pattern,
            navigation_terms: vocabulary(
                "navigation_terms",
                file.navigation_terms,
                DEFAULT_NAVIGATION_TERMS,
            )?,
            urdu_tokens: vocabulary("urdu_tokens", file.urdu_tokens, DEFAULT_URDU_TOKENS)?,
            price_keywords: vocabulary(
                "price_keywords",
                file.price_keywords,
                DEFAULT_PRICE_KEYWORDS,
            )?,
            cheap_keywords: vocabulary(
                "cheap_keywords",
                file.cheap_keywords,
                DEFAULT_CHEAP_KEYWORDS,
            )?,
            colors: vocabulary("colors", file.colors, DEFAULT_COLORS)?,
            categories: vocabulary("categories", file.categories, DEFAULT_CATEGORIES)?,
        })
    }
}

/// Load and validate a lexicon override from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_lexicon(path: &Path) -> Result<Lexicon, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::LexiconFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    Lexicon::from_yaml_str(&content)
}

fn compile_capturing(name: &str, pattern: &str) -> Result<Regex, ConfigError> {
    let regex = Regex::new(pattern)
        .map_err(|e| ConfigError::Validation(format!("invalid {name} '{pattern}': {e}")))?;
    if regex.captures_len() < 2 {
        return Err(ConfigError::Validation(format!(
            "{name} '{pattern}' must contain a capture group"
        )));
    }
    Ok(regex)
}

/// Lower-cases and de-duplicates a vocabulary, rejecting blank entries.
fn vocabulary(
    name: &str,
    supplied: Option<Vec<String>>,
    defaults: &[&str],
) -> Result<Vec<String>, ConfigError> {
    let words: Vec<String> = match supplied {
        Some(words) => words,
        None => defaults.iter().map(|w| (*w).to_string()).collect(),
    };

    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(words.len());
    for word in words {
        let normalized = word.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(ConfigError::Validation(format!(
                "{name} must not contain blank entries"
            )));
        }
        if seen.insert(normalized.clone()) {
            out.push(normalized);
        }
    }
    Ok(out)
}
