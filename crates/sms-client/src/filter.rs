//! Regular expression filter over message bodies.

use crate::error::FilterError;
use crate::types::Message;
use regex::Regex;

/// A compiled body filter.
#[derive(Debug, Clone)]
pub struct MessageFilter {
    regex: Regex,
}

impl MessageFilter {
    /// Compile `pattern`. The empty pattern matches every body.
    pub fn new(pattern: &str) -> Result<Self, FilterError> {
        let regex = Regex::new(pattern).map_err(|source| FilterError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?;
        Ok(Self { regex })
    }

    /// Whether the pattern occurs anywhere in the message body.
    pub fn matches(&self, message: &Message) -> bool {
        self.regex.is_match(&message.body)
    }

    /// Keep matching messages, in their original order.
    pub fn apply(&self, messages: &[Message]) -> Vec<Message> {
        messages
            .iter()
            .filter(|m| self.matches(m))
            .cloned()
            .collect()
    }
}

/// Compile `pattern` and apply it to `messages`.
pub fn filter(pattern: &str, messages: &[Message]) -> Result<Vec<Message>, FilterError> {
    Ok(MessageFilter::new(pattern)?.apply(messages))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vec<Message> {
        vec![
            Message::new("Google", "Your code is 1234", "t1"),
            Message::new("Friend", "Hello", "t2"),
            Message::new("1234", "Use 9876 to log in", "t3"),
        ]
    }

    #[test]
    fn test_digits_pattern() {
        let messages = vec![
            Message::new("a", "Your code is 1234", "t1"),
            Message::new("b", "Hello", "t2"),
        ];

        let filtered = filter(r"\d+", &messages).unwrap();
        assert_eq!(filtered, vec![messages[0].clone()]);
    }

    #[test]
    fn test_match_all_keeps_everything() {
        let messages = sample();
        assert_eq!(filter(".*", &messages).unwrap(), messages);
        assert_eq!(filter("", &messages).unwrap(), messages);
    }

    #[test]
    fn test_empty_input() {
        assert!(filter("code", &[]).unwrap().is_empty());
        assert!(filter(".*", &[]).unwrap().is_empty());
    }

    #[test]
    fn test_idempotent() {
        let messages = sample();
        let filter = MessageFilter::new(r"\d{4}").unwrap();

        let once = filter.apply(&messages);
        let twice = filter.apply(&once);
        assert_eq!(once, twice);
        assert_eq!(once.len(), 2);
    }

    #[test]
    fn test_only_body_is_searched() {
        let messages = sample();

        // "Google" appears only as an originator.
        assert!(filter("Google", &messages).unwrap().is_empty());
        // "t1" appears only as a timestamp.
        assert!(filter("t1", &messages).unwrap().is_empty());
    }

    #[test]
    fn test_unanchored_search() {
        let messages = sample();
        let filtered = filter("log", &messages).unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].body, "Use 9876 to log in");
    }

    #[test]
    fn test_preserves_order_and_input() {
        let messages = sample();
        let before = messages.clone();

        let filtered = filter("o", &messages).unwrap();
        assert_eq!(messages, before);
        assert_eq!(filtered[0].originator, "Google");
        assert_eq!(filtered[1].originator, "Friend");
    }

    #[test]
    fn test_invalid_pattern() {
        let result = MessageFilter::new("(unclosed");
        assert!(matches!(
            result,
            Err(FilterError::InvalidPattern { ref pattern, .. }) if pattern == "(unclosed"
        ));
    }
}
