//! Decides whether a search hit really documents the named person.
//!
//! Two tiers, first satisfied accepts:
//! 1. the full name (lowercased) occurs anywhere in `title + " " + snippet`;
//! 2. first and last name tokens both occur, and their first whole-word
//!    occurrences are at most `window` words apart.
//!
//! Presence tests are plain substring tests, so very short tokens can match
//! inside unrelated words; the positional check is what filters most of those.

use tracing::{debug, trace};

pub const DEFAULT_PROXIMITY_WINDOW: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    ExactName,
    NameProximity { distance: usize },
    Rejected(Rejection),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Verdict::Rejected(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Name was empty or whitespace.
    EmptyName,
    /// Full name absent and the name has a single token.
    SingleTokenNotFound,
    /// First or last token absent from the text.
    TokensMissing,
    /// Both tokens occur, but not as whole words.
    TokensNotPositioned,
    TooFarApart { distance: usize },
}

#[derive(Debug, Clone, Copy)]
pub struct AttributionValidator {
    window: usize,
}

impl Default for AttributionValidator {
    fn default() -> Self {
        Self::new(DEFAULT_PROXIMITY_WINDOW)
    }
}

impl AttributionValidator {
    pub fn new(window: usize) -> Self {
        Self { window }
    }

    pub fn window(&self) -> usize {
        self.window
    }

    pub fn validate(&self, person_name: &str, title: &str, snippet: &str) -> bool {
        self.assess(person_name, title, snippet).is_accepted()
    }

    pub fn assess(&self, person_name: &str, title: &str, snippet: &str) -> Verdict {
        let verdict = self.decide(person_name, title, snippet);
        match verdict {
            Verdict::Rejected(reason) => trace!(
                person = person_name,
                title = %preview(title),
                ?reason,
                "attribution rejected"
            ),
            accepted => debug!(
                person = person_name,
                title = %preview(title),
                verdict = ?accepted,
                "attribution accepted"
            ),
        }
        verdict
    }

    fn decide(&self, person_name: &str, title: &str, snippet: &str) -> Verdict {
        let name_tokens: Vec<String> = person_name
            .split_whitespace()
            .map(str::to_lowercase)
            .collect();
        if name_tokens.is_empty() {
            return Verdict::Rejected(Rejection::EmptyName);
        }

        let text = format!("{} {}", title, snippet).to_lowercase();
        if text.contains(&name_tokens.join(" ")) {
            return Verdict::ExactName;
        }

        if name_tokens.len() < 2 {
            return Verdict::Rejected(Rejection::SingleTokenNotFound);
        }
        let first = &name_tokens[0];
        let last = &name_tokens[name_tokens.len() - 1];

        if !(text.contains(first.as_str()) && text.contains(last.as_str())) {
            return Verdict::Rejected(Rejection::TokensMissing);
        }

        let words: Vec<&str> = text.split_whitespace().map(trim_word).collect();
        let position = |token: &str| {
            let token = trim_word(token);
            if token.is_empty() {
                None
            } else {
                words.iter().position(|w| *w == token)
            }
        };

        match (position(first), position(last)) {
            (Some(first_pos), Some(last_pos)) => {
                let distance = first_pos.abs_diff(last_pos);
                if distance <= self.window {
                    Verdict::NameProximity { distance }
                } else {
                    Verdict::Rejected(Rejection::TooFarApart { distance })
                }
            }
            _ => Verdict::Rejected(Rejection::TokensNotPositioned),
        }
    }
}

/// Strips leading/trailing punctuation so `Cole,` and `(Cole)` count as `cole`.
fn trim_word(word: &str) -> &str {
    word.trim_matches(|c: char| !c.is_alphanumeric())
}

fn preview(text: &str) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(60).collect();
    if chars.next().is_some() {
        format!("{}...", head)
    } else {
        head
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validator() -> AttributionValidator {
        AttributionValidator::default()
    }

    #[test]
    fn test_exact_name_accepts() {
        assert!(validator().validate("Juan Cole", "Juan Cole on Gaza", "..."));
        assert_eq!(
            validator().assess("Juan Cole", "", "an essay by JUAN COLE"),
            Verdict::ExactName
        );
    }

    #[test]
    fn test_proximity_accepts_middle_initial() {
        let verdict = validator().assess(
            "Juan Cole",
            "An interview with Juan M. Cole about Gaza",
            "",
        );
        assert_eq!(verdict, Verdict::NameProximity { distance: 2 });
    }

    #[test]
    fn test_proximity_rejects_distant_tokens() {
        let title = "Juan discusses regional politics while Professor Cole of a different \
                     department comments elsewhere in an unrelated long paragraph";
        assert!(!validator().validate("Juan Cole", title, ""));
        assert_eq!(
            validator().assess("Juan Cole", title, ""),
            Verdict::Rejected(Rejection::TooFarApart { distance: 6 })
        );
    }

    #[test]
    fn test_unrelated_person_rejected() {
        assert!(!validator().validate(
            "Nausheen Husain",
            "Ghada Ageel writes on Gaza schools",
            "Opinion piece by Ageel"
        ));
    }

    #[test]
    fn test_middle_names_are_ignored_for_proximity() {
        assert!(validator().validate(
            "Alexander A. Reinert",
            "Reinert, Alexander: why the court got it wrong",
            ""
        ));
    }

    #[test]
    fn test_punctuation_does_not_hide_position() {
        assert!(validator().validate("Noura Erakat", "Noura (Rutgers) Erakat, speaking", ""));
    }

    #[test]
    fn test_substring_inside_word_is_not_positioned() {
        assert_eq!(
            validator().assess("Ali Dahi", "Dahiya Alibaba report", ""),
            Verdict::Rejected(Rejection::TokensNotPositioned)
        );
    }

    #[test]
    fn test_single_token_names_need_exact_match() {
        assert!(validator().validate("Cher", "Cher sings", ""));
        assert_eq!(
            validator().assess("Cher", "A singer", ""),
            Verdict::Rejected(Rejection::SingleTokenNotFound)
        );
    }

    #[test]
    fn test_empty_name_never_matches() {
        assert_eq!(
            validator().assess("", "anything at all", "really"),
            Verdict::Rejected(Rejection::EmptyName)
        );
        assert!(!validator().validate("   ", "   ", ""));
    }

    #[test]
    fn test_default_window_boundary() {
        assert_eq!(
            validator().assess("Juan Cole", "Juan spoke with the panel Cole", ""),
            Verdict::NameProximity { distance: 5 }
        );
        assert_eq!(
            validator().assess("Juan Cole", "Juan spoke with the whole panel Cole", ""),
            Verdict::Rejected(Rejection::TooFarApart { distance: 6 })
        );
    }

    #[test]
    fn test_window_spans_title_and_snippet() {
        assert_eq!(
            validator().assess("Juan Cole", "Juan spoke with the", "panel Cole"),
            Verdict::NameProximity { distance: 5 }
        );
        assert!(!validator().validate("Juan Cole", "Juan spoke with the whole", "panel Cole"));
    }

    #[test]
    fn test_window_is_configurable() {
        let title = "Juan said one two three Cole";
        assert!(AttributionValidator::new(5).validate("Juan Cole", title, ""));
        assert!(!AttributionValidator::new(3).validate("Juan Cole", title, ""));
    }

    #[test]
    fn test_decision_is_pure() {
        let v = validator();
        let a = v.assess("Juan Cole", "Juan talks, then Cole responds", "snippet");
        let b = v.assess("Juan Cole", "Juan talks, then Cole responds", "snippet");
        assert_eq!(a, b);
    }
}
