//! Static term lists used by the specificity analyzer.

use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Words signalling the user wants to be surprised.
pub static VAGUE_CUES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "something",
        "anything",
        "whatever",
        "maybe",
        "some",
        "surprise",
        "random",
        "kinda",
        "sorta",
        "vibes",
        "ideas",
        "inspiration",
    ]
    .into_iter()
    .collect()
});

/// Words signalling the user knows exactly what they want.
pub static PRECISE_CUES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "must",
        "must-have",
        "exactly",
        "specifically",
        "precise",
        "precisely",
        "required",
        "need",
        "needs",
        "only",
        "strictly",
    ]
    .into_iter()
    .collect()
});

/// Named fabrics and construction terms; using one signals domain fluency.
static TECHNICAL_TERMS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        // Fabrics
        "cashmere",
        "tweed",
        "organza",
        "chiffon",
        "taffeta",
        "jacquard",
        "brocade",
        "gabardine",
        "crepe",
        "poplin",
        "seersucker",
        "velvet",
        "satin",
        "charmeuse",
        "boucle",
        "merino",
        // Construction
        "bias-cut",
        "raglan",
        "dolman",
        "peplum",
        "empire-waist",
        "princess-seam",
        "drop-shoulder",
        "double-breasted",
        "pintuck",
        "godet",
    ]
    .into_iter()
    .collect()
});

/// True if the descriptor value names (or contains) a technical term.
pub fn is_technical_term(value: &str) -> bool {
    let normalized = value.trim().to_lowercase();
    if TECHNICAL_TERMS.contains(normalized.as_str()) {
        return true;
    }
    normalized
        .split_whitespace()
        .any(|word| TECHNICAL_TERMS.contains(word))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_fabric_terms() {
        assert!(is_technical_term("cashmere"));
        assert!(is_technical_term("Tweed"));
    }

    #[test]
    fn recognizes_terms_inside_phrases() {
        assert!(is_technical_term("brushed cashmere"));
        assert!(is_technical_term("bias-cut skirt"));
    }

    #[test]
    fn rejects_plain_descriptors() {
        assert!(!is_technical_term("red"));
        assert!(!is_technical_term("sporty chic"));
    }
}
