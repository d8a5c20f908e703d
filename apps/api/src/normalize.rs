//! Résumé text normalization: an ordered list of cleaning steps that turns extracted text
//! into the lowercase, single-spaced ASCII token stream the vectorizer was trained on.
//!
//! Order matters: URLs go before mentions so `http://x/@y` is dropped whole, and the
//! punctuation sweep runs after the token-shaped patterns that rely on `@`, `#` and `/`.
//! Every removal substitutes a space so neighbouring words never fuse.
//!
//! The URL prefix matches case-insensitively and `RT`/`cc` only at word starts, unlike a plain
//! substring cleaner that would cut `ARTS` or `accounting`; artifacts must be trained on text
//! cleaned by these same rules or they will see different tokens.

use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

static URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)http\S+").unwrap());
// Whole token containing `@`, so e-mail addresses leave no local-part fragment behind.
static MENTION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S*@\S+").unwrap());
static HASHTAG: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"#\S+").unwrap());
static RETWEET: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bRT\b|\bcc\S+").unwrap());

const SPECIAL_CHARACTERS: &[char] = &[
    '"', '!', '#', '$', '%', '^', '&', '*', '(', ')', '+', '_', '=', '{', '}', '[', ']', ':', ';',
    '\'', '<', '>', ',', '.', '?', '/', '|', '\\', '`', '~',
];

/// A single named transformation in the cleaning pipeline.
pub struct CleaningStep {
    pub name: &'static str,
    pub apply: fn(&str) -> String,
}

/// The cleaning steps, in the order they must run.
pub const CLEANING_STEPS: [CleaningStep; 8] = [
    CleaningStep {
        name: "urls",
        apply: remove_urls,
    },
    CleaningStep {
        name: "mentions",
        apply: remove_mentions,
    },
    CleaningStep {
        name: "hashtags",
        apply: remove_hashtags,
    },
    CleaningStep {
        name: "retweet_markers",
        apply: remove_retweet_markers,
    },
    CleaningStep {
        name: "special_characters",
        apply: remove_special_characters,
    },
    CleaningStep {
        name: "non_printable",
        apply: remove_non_printable,
    },
    CleaningStep {
        name: "whitespace",
        apply: collapse_whitespace,
    },
    CleaningStep {
        name: "lowercase",
        apply: lowercase,
    },
];

/// Cleans extracted text into its canonical form.
///
/// The steps are re-run until a pass changes nothing, which makes the result a fixed point:
/// `normalize(&normalize(t)) == normalize(t)`. Later steps can expose new matches for earlier
/// ones (lowercasing `CCNA`, or splitting `x_ccna` on the underscore), so a single pass is
/// not enough. Each extra pass removes at least one character, so the loop is bounded.
pub fn normalize(text: &str) -> String {
    let mut current = run_steps(text);
    loop {
        let next = run_steps(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}

fn run_steps(text: &str) -> String {
    CLEANING_STEPS.iter().fold(text.to_string(), |acc, step| {
        let out = (step.apply)(&acc);
        trace!(step = step.name, before = acc.len(), after = out.len(), "Cleaning step");
        out
    })
}

pub fn remove_urls(text: &str) -> String {
    URL.replace_all(text, " ").into_owned()
}

pub fn remove_mentions(text: &str) -> String {
    MENTION.replace_all(text, " ").into_owned()
}

pub fn remove_hashtags(text: &str) -> String {
    HASHTAG.replace_all(text, " ").into_owned()
}

/// `RT` as a whole word, or a word starting with `cc` (`cc:`, `cc@team`).
pub fn remove_retweet_markers(text: &str) -> String {
    RETWEET.replace_all(text, " ").into_owned()
}

pub fn remove_special_characters(text: &str) -> String {
    text.replace(SPECIAL_CHARACTERS, " ")
}

/// Blanks everything outside printable ASCII. ASCII whitespace survives for the next step.
pub fn remove_non_printable(text: &str) -> String {
    text.chars()
        .map(|c| {
            if c.is_ascii_graphic() || c.is_ascii_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect()
}

pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

pub fn lowercase(text: &str) -> String {
    text.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const TRICKY_INPUTS: &[&str] = &[
        "",
        "   \n\t  ",
        "Experienced Java Developer. Contact: dev@example.com #hiring http://example.com",
        "HTTP://EXAMPLE.COM/Resume",
        "Certified CCNA_cc2 engineer",
        "x_ccna y",
        "RT @recruiter: great candidate!! cc:hr",
        "Skills: C++, C#, .NET, Node.js",
        "Ingénieur — Zürich, 5+ years 💼",
        "bell\u{7}char and\u{0}nul",
        "tabs\tand\r\nnewlines\u{b}vertical",
        "a.b.c http:x @ # ##tag @@@",
        "PORTFOLIO ARTS accounting success",
        "_http://x",
        "#_RT_ rt RT_x",
    ];

    #[test]
    fn test_end_to_end_scenario() {
        let raw = "Experienced Java Developer. Contact: dev@example.com #hiring http://example.com";
        assert_eq!(normalize(raw), "experienced java developer contact");
    }

    #[test]
    fn test_empty_stays_empty() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize(" \n\t "), "");
    }

    /// Fragments the cleaning steps react to, mixed with plain words, non-ASCII and control
    /// characters so generated strings hit the step interactions.
    const FRAGMENTS: &[&str] = &[
        "http", "HTTP", "://", "@", "#", "RT", "rt", "cc", "CC", "_", ".", ":", "/", " ", "  ",
        "\t", "\n", "\r\n", "\u{0}", "\u{7}", "\u{7f}", "é", "ß", "—", "💼", "java", "Dev", "x1",
        "a", "Z",
    ];

    fn marker_heavy_text() -> impl Strategy<Value = String> {
        prop::collection::vec(prop::sample::select(FRAGMENTS), 0..48)
            .prop_map(|parts| parts.concat())
    }

    fn assert_idempotent(input: &str) {
        let once = normalize(input);
        let twice = normalize(&once);
        assert_eq!(once, twice, "normalize is not idempotent for {input:?}");
    }

    fn assert_clean_output(input: &str) {
        let out = normalize(input);
        assert!(
            out.chars().all(|c| c.is_ascii_graphic() || c == ' '),
            "non-printable output {out:?} for {input:?}"
        );
        assert!(!out.chars().any(|c| c.is_ascii_uppercase()), "{out:?}");
        assert!(!out.contains("  "), "double space in {out:?}");
        assert_eq!(out.trim(), out, "untrimmed {out:?}");
    }

    #[test]
    fn test_tricky_inputs_hold_output_properties() {
        for input in TRICKY_INPUTS {
            assert_idempotent(input);
            assert_clean_output(input);
        }
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(1024))]

        #[test]
        fn test_idempotent_for_any_string(input in any::<String>()) {
            assert_idempotent(&input);
        }

        #[test]
        fn test_idempotent_for_marker_heavy_text(input in marker_heavy_text()) {
            assert_idempotent(&input);
        }

        #[test]
        fn test_output_is_lowercase_printable_single_spaced(input in any::<String>()) {
            assert_clean_output(&input);
        }

        #[test]
        fn test_marker_heavy_output_is_lowercase_printable_single_spaced(
            input in marker_heavy_text()
        ) {
            assert_clean_output(&input);
        }
    }

    #[test]
    fn test_uppercase_url_scheme_is_removed() {
        assert_eq!(normalize("see HTTP://EXAMPLE.COM/Resume now"), "see now");
    }

    #[test]
    fn test_words_containing_marker_letters_survive() {
        assert_eq!(
            normalize("PORTFOLIO ARTS accounting success"),
            "portfolio arts accounting success"
        );
    }

    #[test]
    fn test_steps_replace_with_space_not_delete() {
        assert_eq!(remove_special_characters("Java/Python"), "Java Python");
        assert_eq!(normalize("Java/Python,SQL"), "java python sql");
    }

    #[test]
    fn test_step_order() {
        let names: Vec<_> = CLEANING_STEPS.iter().map(|s| s.name).collect();
        assert_eq!(
            names,
            [
                "urls",
                "mentions",
                "hashtags",
                "retweet_markers",
                "special_characters",
                "non_printable",
                "whitespace",
                "lowercase"
            ]
        );
    }

    #[test]
    fn test_remove_urls() {
        assert_eq!(remove_urls("site https://a.io/x end"), "site   end");
        assert_eq!(remove_urls("http"), "http");
    }

    #[test]
    fn test_remove_mentions() {
        assert_eq!(remove_mentions("ping @bob now"), "ping   now");
        assert_eq!(remove_mentions("mail jane.doe@corp.com"), "mail  ");
        assert_eq!(remove_mentions("lone @ sign"), "lone @ sign");
    }

    #[test]
    fn test_remove_hashtags() {
        assert_eq!(remove_hashtags("#hiring now #rust"), "  now  ");
    }

    #[test]
    fn test_remove_retweet_markers() {
        assert_eq!(remove_retweet_markers("RT great"), "  great");
        assert_eq!(remove_retweet_markers("cc:hr team"), "  team");
        assert_eq!(remove_retweet_markers("ARTS success cc"), "ARTS success cc");
    }

    #[test]
    fn test_remove_special_characters() {
        assert_eq!(
            remove_special_characters(r#"a"b!c#d$e%f^g&h*i(j)k+l_m=n{o}p[q]r:s;t'u<v>w,x.y?z/1|2\3`4~5"#),
            "a b c d e f g h i j k l m n o p q r s t u v w x y z 1 2 3 4 5"
        );
        assert_eq!(remove_special_characters("full-stack @ 9"), "full-stack @ 9");
    }

    #[test]
    fn test_remove_non_printable() {
        assert_eq!(remove_non_printable("Zürich\u{7}"), "Z rich ");
        assert_eq!(remove_non_printable("a\tb\nc"), "a\tb\nc");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \t\n b  "), "a b");
    }

    #[test]
    fn test_non_ascii_separates_words() {
        assert_eq!(normalize("Data—Science"), "data science");
    }
}
