//! Word tokenization
//!
//! Splits text into word tokens with byte offsets. Punctuation is not
//! emitted as tokens; instead it marks a boundary on the following word,
//! which is where RAKE and the entity heuristics stop a phrase.

/// A word token borrowed from the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    /// Surface form, as written
    pub text: &'a str,
    /// Byte offset of the first character
    pub start: usize,
    /// Byte offset one past the last character
    pub end: usize,
    /// Sentence index (sentences split on `.`, `!`, `?`)
    pub sentence_idx: usize,
    /// Punctuation separates this token from the previous one
    pub boundary_before: bool,
}

impl<'a> Token<'a> {
    /// Whether the token starts with an uppercase letter.
    pub fn is_capitalized(&self) -> bool {
        self.text.chars().next().is_some_and(char::is_uppercase)
    }

    /// Whether the token is made only of ASCII digits.
    pub fn is_numeric(&self) -> bool {
        !self.text.is_empty() && self.text.bytes().all(|b| b.is_ascii_digit())
    }

    pub fn lowercase(&self) -> String {
        self.text.to_lowercase()
    }
}

fn is_sentence_terminator(c: char) -> bool {
    matches!(c, '.' | '!' | '?')
}

fn is_word_joiner(c: char) -> bool {
    matches!(c, '\'' | '\u{2019}' | '-')
}

/// Tokenize `text` into words.
///
/// Apostrophes and hyphens between letters stay inside the word, so
/// "don't" and "well-known" are single tokens.
pub fn tokenize(text: &str) -> Vec<Token<'_>> {
    let mut tokens: Vec<Token<'_>> = Vec::new();
    let mut sentence_idx = 0;
    let mut boundary = false;
    let mut sentence_break = false;
    let mut word_start: Option<usize> = None;

    let mut chars = text.char_indices().peekable();
    loop {
        let next = chars.next();
        let in_word = match next {
            Some((_, c)) if c.is_alphanumeric() => true,
            Some((_, c)) => {
                is_word_joiner(c)
                    && word_start.is_some()
                    && chars.peek().is_some_and(|&(_, after)| after.is_alphanumeric())
            }
            None => false,
        };

        if in_word {
            if let Some((i, _)) = next {
                word_start.get_or_insert(i);
            }
            continue;
        }

        let end = next.map_or(text.len(), |(i, _)| i);
        if let Some(start) = word_start.take() {
            if sentence_break && !tokens.is_empty() {
                sentence_idx += 1;
            }
            tokens.push(Token {
                text: &text[start..end],
                start,
                end,
                sentence_idx,
                boundary_before: boundary || sentence_break,
            });
            boundary = false;
            sentence_break = false;
        }

        match next {
            Some((_, c)) if !c.is_whitespace() => {
                boundary = true;
                if is_sentence_terminator(c) {
                    sentence_break = true;
                }
            }
            Some(_) => {}
            None => break,
        }
    }

    tokens
}

/// Count whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts<'a>(tokens: &[Token<'a>]) -> Vec<&'a str> {
        tokens.iter().map(|t| t.text).collect()
    }

    #[test]
    fn test_basic_words() {
        let tokens = tokenize("Frodo must destroy the ring");
        assert_eq!(texts(&tokens), vec!["Frodo", "must", "destroy", "the", "ring"]);
        assert!(tokens.iter().all(|t| t.sentence_idx == 0));
        assert!(tokens.iter().all(|t| !t.boundary_before));
    }

    #[test]
    fn test_offsets_slice_source() {
        let text = "  Lord of  the Rings ";
        for token in tokenize(text) {
            assert_eq!(&text[token.start..token.end], token.text);
        }
    }

    #[test]
    fn test_punctuation_marks_boundary() {
        let tokens = tokenize("dragons, elves and dwarves");
        assert_eq!(texts(&tokens), vec!["dragons", "elves", "and", "dwarves"]);
        assert!(!tokens[0].boundary_before);
        assert!(tokens[1].boundary_before);
        assert!(!tokens[2].boundary_before);
    }

    #[test]
    fn test_sentence_split() {
        let tokens = tokenize("A hobbit lives. He travels! Why?");
        let sentences: Vec<_> = tokens.iter().map(|t| t.sentence_idx).collect();
        assert_eq!(sentences, vec![0, 0, 0, 1, 1, 2]);
    }

    #[test]
    fn test_repeated_terminators_count_once() {
        let tokens = tokenize("Wait... what?! Yes.");
        let sentences: Vec<_> = tokens.iter().map(|t| t.sentence_idx).collect();
        assert_eq!(sentences, vec![0, 1, 2]);
    }

    #[test]
    fn test_joiners_inside_words() {
        let tokens = tokenize("a well-known don't -dash trailing-");
        assert_eq!(
            texts(&tokens),
            vec!["a", "well-known", "don't", "dash", "trailing"]
        );
    }

    #[test]
    fn test_unicode_words() {
        let tokens = tokenize("Éowyn rides to Minas Tirith");
        assert_eq!(tokens[0].text, "Éowyn");
        assert!(tokens[0].is_capitalized());
        assert_eq!(tokens[0].end, "Éowyn".len());
    }

    #[test]
    fn test_empty_and_whitespace() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \n\t").is_empty());
        assert!(tokenize("?!...").is_empty());
    }

    #[test]
    fn test_numeric() {
        let tokens = tokenize("In 1954 it sold 3x");
        assert!(tokens[1].is_numeric());
        assert!(!tokens[4].is_numeric());
    }

    #[test]
    fn test_word_count() {
        assert_eq!(word_count("ok"), 1);
        assert_eq!(word_count("  two   words "), 2);
        assert_eq!(word_count(""), 0);
    }
}
