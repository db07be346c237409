use crate::settings::ChatInputSettings;

/// Resolves the configured limit; absent or negative means unlimited.
pub fn effective_character_limit(configured: Option<i64>) -> Option<usize> {
    configured
        .filter(|limit| *limit >= 0)
        .map(|limit| usize::try_from(limit).unwrap_or(usize::MAX))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Normalized {
    pub value: String,
    pub truncated: bool,
}

/// Applies newline and length policy to one incoming value.
///
/// Newlines are collapsed before the limit is measured. Lengths count Unicode
/// scalar values, so truncation never splits a character.
pub fn normalize_input(raw: &str, settings: &ChatInputSettings) -> Normalized {
    let value = if settings.allow_newline {
        raw.to_string()
    } else {
        raw.replace('\n', " ")
    };

    match effective_character_limit(settings.character_limit) {
        Some(limit) => match value.char_indices().nth(limit) {
            Some((cut, _)) => Normalized {
                value: value[..cut].to_string(),
                truncated: true,
            },
            None => Normalized {
                value,
                truncated: false,
            },
        },
        None => Normalized {
            value,
            truncated: false,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(allow_newline: bool, character_limit: Option<i64>) -> ChatInputSettings {
        ChatInputSettings {
            allow_newline,
            character_limit,
            ..ChatInputSettings::default()
        }
    }

    #[test]
    fn negative_or_missing_limit_is_unlimited() {
        assert_eq!(effective_character_limit(None), None);
        assert_eq!(effective_character_limit(Some(-1)), None);
        assert_eq!(effective_character_limit(Some(0)), Some(0));
        assert_eq!(effective_character_limit(Some(5)), Some(5));
    }

    #[test]
    fn newlines_collapse_before_the_limit_applies() {
        let normalized = normalize_input("a\nb\n\nc", &settings(false, None));
        assert_eq!(normalized.value, "a b  c");

        let normalized = normalize_input("he\nllo world", &settings(false, Some(5)));
        assert_eq!(normalized.value, "he ll");
        assert!(normalized.truncated);
    }

    #[test]
    fn truncates_to_exactly_the_limit() {
        let normalized = normalize_input("hello world", &settings(true, Some(5)));
        assert_eq!(normalized.value, "hello");
        assert_eq!(normalized.value.chars().count(), 5);

        let normalized = normalize_input("hi", &settings(true, Some(5)));
        assert_eq!(normalized.value, "hi");
        assert!(!normalized.truncated);
    }

    #[test]
    fn keeps_newlines_when_allowed() {
        let normalized = normalize_input("line one\nline two", &settings(true, Some(-1)));
        assert_eq!(normalized.value, "line one\nline two");
    }

    #[test]
    fn truncation_respects_character_boundaries() {
        let normalized = normalize_input("héllo wörld", &settings(true, Some(2)));
        assert_eq!(normalized.value, "hé");
    }
}
