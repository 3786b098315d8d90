//! Token counts in the `cl100k_base` encoding, the one GPT-4 class models
//! use. The count feeds `sem_token_count`.

use std::sync::LazyLock;

use tiktoken_rs::CoreBPE;

static CL100K: LazyLock<CoreBPE> =
    LazyLock::new(|| tiktoken_rs::cl100k_base().expect("bundled cl100k_base ranks"));

pub fn count_tokens(text: &str) -> usize {
    if text.is_empty() {
        return 0;
    }
    CL100K.encode_ordinary(text).len()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_text_has_no_tokens() {
        assert_eq!(count_tokens(""), 0);
    }

    #[test]
    fn test_common_words_are_single_tokens() {
        assert_eq!(count_tokens("Led a team"), 3);
        assert_eq!(count_tokens("hello world"), 2);
    }

    #[test]
    fn test_punctuation_is_split_off() {
        assert_eq!(count_tokens("Hello, world!"), 4);
    }

    #[test]
    fn test_longer_text_costs_more() {
        let short = count_tokens("Reduced latency");
        let long = count_tokens("Reduced p99 latency by 40% using Redis caching.");
        assert!(long > short);
    }
}
