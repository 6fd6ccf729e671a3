//! IAFD cross-referencing: film confirmation and cast/director identity.

pub mod parse;
pub mod resolver;

pub(crate) const BASE_URL: &str = "https://www.iafd.com";

/// The search engine rejects long query strings; titles are truncated at
/// a word boundary to at most this many characters.
const MAX_SEARCH_LEN: usize = 72;

pub(crate) fn film_search_url(title: &str) -> String {
    format!(
        "{}/results.asp?searchtype=comprehensive&searchstring={}",
        BASE_URL,
        urlencoding::encode(&search_string(title))
    )
}

pub(crate) fn person_search_url(name: &str) -> String {
    format!(
        "{}/results.asp?searchtype=comprehensive&searchstring={}",
        BASE_URL,
        urlencoding::encode(&search_string(name))
    )
}

/// Sanitize a title or name for the search box: punctuation to spaces,
/// whitespace collapsed, truncated at a word boundary
pub(crate) fn search_string(text: &str) -> String {
    let cleaned: String = text
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    if collapsed.len() <= MAX_SEARCH_LEN {
        return collapsed;
    }
    match collapsed[..MAX_SEARCH_LEN].rfind(' ') {
        Some(cut) => collapsed[..cut].to_string(),
        None => collapsed[..MAX_SEARCH_LEN].to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn search_string_strips_punctuation() {
        assert_eq!(search_string("Wet Heat: Director's Cut"), "Wet Heat Director s Cut");
    }

    #[test]
    fn search_string_truncates_at_word_boundary() {
        let long = "word ".repeat(30);
        let result = search_string(&long);
        assert!(result.len() <= 72);
        assert!(!result.ends_with(' '));
        assert!(result.split(' ').all(|w| w == "word"));
    }

    #[test]
    fn short_titles_pass_through() {
        assert_eq!(search_string("Wet Heat"), "Wet Heat");
    }
}
