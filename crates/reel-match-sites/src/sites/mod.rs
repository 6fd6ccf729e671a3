pub mod aebn;
pub mod gayhotmovies;
pub mod queerclick;

use scraper::ElementRef;

/// Element text with whitespace collapsed to single spaces
pub(crate) fn text_of(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<String>()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Resolve a possibly relative href against the site base
pub(crate) fn absolute(base: &str, href: &str) -> String {
    if href.starts_with("http://") || href.starts_with("https://") {
        href.to_string()
    } else if let Some(rest) = href.strip_prefix("//") {
        format!("https://{}", rest)
    } else {
        format!("{}/{}", base.trim_end_matches('/'), href.trim_start_matches('/'))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_resolves_relative_and_protocol_relative_hrefs() {
        assert_eq!(
            absolute("https://example.com", "/movies/1"),
            "https://example.com/movies/1"
        );
        assert_eq!(
            absolute("https://example.com/", "//cdn.example.com/a.jpg"),
            "https://cdn.example.com/a.jpg"
        );
        assert_eq!(
            absolute("https://example.com", "https://other.com/x"),
            "https://other.com/x"
        );
    }
}
