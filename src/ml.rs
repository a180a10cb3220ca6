//! Keyword-based sentiment and aspect tagging for Hindi, Marathi and English reviews.
//!
//! Used when a review source hands over raw text without a classifier score or
//! without an aspect label. No model weights, just word lists.

use once_cell::sync::Lazy;
use std::collections::HashSet;

// Positive cues, Devanagari and Latin script mixed as reviewers write them
static POSITIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    vec![
        // Hindi
        "बढ़िया", "अच्छा", "अच्छी", "अच्छे", "शानदार", "बेहतरीन", "जबरदस्त", "उत्तम",
        "लाजवाब", "मजबूत", "अद्भुत", "तेज",
        // Marathi
        "छान", "सुंदर", "चांगला", "चांगली", "उत्कृष्ट", "मस्त", "भारी",
        // English
        "good", "great", "excellent", "amazing", "awesome", "perfect", "best", "love",
        "superb", "fantastic", "smooth", "premium", "solid", "fast", "recommended",
        "worth", "brilliant", "impressive", "reliable",
    ]
    .into_iter()
    .collect()
});

// Negative cues
static NEGATIVE_WORDS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    vec![
        // Hindi
        "खराब", "बुरा", "बुरी", "नहीं", "बेकार", "धीमा", "महंगा", "समस्या",
        // Marathi
        "वाईट", "नाही", "महाग", "कमी", "वाया",
        // English
        "bad", "poor", "waste", "worst", "terrible", "awful", "not", "slow", "lag",
        "heating", "expensive", "overpriced", "disappointed", "disappointing", "broken",
        "issue", "issues", "problem", "average",
    ]
    .into_iter()
    .collect()
});

/// Aspect label assigned when no keyword matches.
pub const FALLBACK_ASPECT: &str = "overall";

// Aspect label -> trigger keywords (matched as lowercase substrings)
static ASPECT_KEYWORDS: &[(&str, &[&str])] = &[
    ("Camera", &["कैमरा", "कॅमेरा", "फोटो", "चित्र", "camera", "picture", "photo", "selfie", "video"]),
    ("Battery", &["बैटरी", "बॅटरी", "बैकअप", "battery", "backup", "charging", "charge", "power", "mah"]),
    ("Performance", &["परफॉर्मेंस", "परफॉर्मन्स", "स्पीड", "performance", "speed", "fast", "slow", "lag", "gaming", "processor", "ram"]),
    ("Display", &["डिस्प्ले", "डिस्पले", "स्क्रीन", "display", "screen", "brightness", "amoled", "oled", "refresh"]),
    ("Value", &["कीमत", "किंमत", "दाम", "पैसा", "महाग", "price", "value", "money", "worth", "costly", "cheap", "budget"]),
    ("Build Quality", &["बिल्ड", "डिज़ाइन", "गुणवत्ता", "क्वालिटी", "build", "quality", "design", "body", "material", "finish"]),
    ("Sound", &["साउंड", "आवाज", "स्पीकर", "sound", "audio", "speaker"]),
];

/// Three-way verdict from the lexicon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SentimentLabel {
    Positive,
    Neutral,
    Negative,
}

/// Result of sentiment analysis
#[derive(Debug, Clone)]
pub struct SentimentResult {
    pub label: SentimentLabel,
    /// Positive share of the matched cue words, `0.5` when nothing matched.
    pub score: f64,
    pub positive_count: usize,
    pub negative_count: usize,
}

fn tokenize(text: &str) -> Vec<String> {
    text.to_lowercase()
        .split(|c: char| c.is_whitespace() || c.is_ascii_punctuation() || c == '।' || c == '॥')
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// Scores `text` on the `[0, 1]` scale by counting cue words.
pub fn analyze_sentiment(text: &str) -> SentimentResult {
    let words = tokenize(text);

    let positive_count = words.iter().filter(|w| POSITIVE_WORDS.contains(w.as_str())).count();
    let negative_count = words.iter().filter(|w| NEGATIVE_WORDS.contains(w.as_str())).count();

    let total = positive_count + negative_count;
    let score = if total == 0 {
        0.5
    } else {
        positive_count as f64 / total as f64
    };

    let label = if score > 0.6 {
        SentimentLabel::Positive
    } else if score < 0.4 {
        SentimentLabel::Negative
    } else {
        SentimentLabel::Neutral
    };

    tracing::debug!(
        "🧠 Sentiment: {} words, {} positive, {} negative",
        words.len(),
        positive_count,
        negative_count
    );

    SentimentResult {
        label,
        score,
        positive_count,
        negative_count,
    }
}

/// Aspects mentioned in `text`, in catalogue order. Falls back to [`FALLBACK_ASPECT`].
pub fn extract_aspects(text: &str) -> Vec<&'static str> {
    let lowered = text.to_lowercase();
    let found: Vec<&'static str> = ASPECT_KEYWORDS
        .iter()
        .filter(|(_, keywords)| keywords.iter().any(|k| lowered.contains(k)))
        .map(|(aspect, _)| *aspect)
        .collect();

    if found.is_empty() {
        vec![FALLBACK_ASPECT]
    } else {
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positive_sentiment() {
        let result = analyze_sentiment("कैमरा बहुत बढ़िया है, फोटो शानदार आती है!");
        assert_eq!(result.label, SentimentLabel::Positive);
        assert!(result.score > 0.6);
    }

    #[test]
    fn test_negative_sentiment() {
        let result = analyze_sentiment("Battery backup खराब है, heating issue भी है. Waste of money.");
        assert_eq!(result.label, SentimentLabel::Negative);
        assert!(result.negative_count >= 3);
    }

    #[test]
    fn test_marathi_and_neutral() {
        let result = analyze_sentiment("कॅमेरा छान आहे");
        assert_eq!(result.label, SentimentLabel::Positive);

        let neutral = analyze_sentiment("The phone arrived on Tuesday.");
        assert_eq!(neutral.label, SentimentLabel::Neutral);
        assert_eq!(neutral.score, 0.5);
    }

    #[test]
    fn test_intensifiers_carry_no_polarity() {
        let result = analyze_sentiment("बहुत खराब");
        assert_eq!(result.label, SentimentLabel::Negative);
        assert_eq!(result.positive_count, 0);

        let result = analyze_sentiment("कम कीमत में बढ़िया");
        assert_eq!(result.negative_count, 0);
        assert_eq!(result.label, SentimentLabel::Positive);
    }

    #[test]
    fn test_substrings_do_not_count_as_words() {
        // "nothing" contains "not" but is not a negation
        let result = analyze_sentiment("Nothing Phone 2");
        assert_eq!(result.negative_count, 0);
    }

    #[test]
    fn test_extract_aspects() {
        assert_eq!(
            extract_aspects("बैटरी बैकअप अच्छा है पर कैमरा average"),
            vec!["Camera", "Battery"]
        );
        assert_eq!(extract_aspects("AMOLED screen is crisp"), vec!["Display"]);
        assert_eq!(extract_aspects("Delivered on time"), vec![FALLBACK_ASPECT]);
    }
}
