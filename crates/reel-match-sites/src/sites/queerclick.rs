//! QueerClick scraper. Blog-style source: article body as synopsis,
//! tags as cast, inline images as posters. No durations, genres, or
//! scene data; those fields are explicit empties.

use crate::client::PacedClient;
use crate::error::SiteError;
use crate::sites::{absolute, text_of};
use crate::traits::SiteScraper;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reel_match_matching::parse_site_date;
use reel_match_models::{FilmRecord, SearchCandidate, SiteDetails};
use scraper::{Html, Selector};
use std::sync::Arc;
use tracing::debug;

const BASE_URL: &str = "https://queerclick.com";

static SEL_ARTICLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("article.post").expect("static selector"));
static SEL_ARTICLE_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h2.entry-title a").expect("static selector"));
static SEL_ARTICLE_DATE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("time.entry-date").expect("static selector"));
static SEL_BODY_TEXT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.entry-content p").expect("static selector"));
static SEL_TAG: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a[rel=\"tag\"]").expect("static selector"));
static SEL_IMAGE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.entry-content img").expect("static selector"));

pub struct QueerClick {
    client: Arc<PacedClient>,
    max_pages: usize,
}

impl QueerClick {
    pub fn new(client: Arc<PacedClient>, max_pages: usize) -> Self {
        Self { client, max_pages }
    }

    fn search_url(query: &str, page: usize) -> String {
        format!(
            "{}/page/{}?s={}",
            BASE_URL,
            page,
            urlencoding::encode(query)
        )
    }
}

#[async_trait]
impl SiteScraper for QueerClick {
    fn site_id(&self) -> &'static str {
        "queerclick"
    }

    fn site_name(&self) -> &'static str {
        "QueerClick"
    }

    async fn search(&self, film: &FilmRecord) -> Result<Vec<SearchCandidate>, SiteError> {
        let mut candidates = Vec::new();
        for page in 1..=self.max_pages {
            let url = Self::search_url(&film.title, page);
            let body = self.client.fetch_text(&url).await?;
            let page_candidates = parse_search(&body);
            debug!(page, count = page_candidates.len(), "queerclick search page");
            if page_candidates.is_empty() {
                break;
            }
            candidates.extend(page_candidates);
        }
        Ok(candidates)
    }

    async fn details(&self, url: &str) -> Result<SiteDetails, SiteError> {
        let body = self.client.fetch_text(url).await?;
        Ok(parse_details(&body))
    }
}

fn parse_search(body: &str) -> Vec<SearchCandidate> {
    let document = Html::parse_document(body);
    let mut candidates = Vec::new();
    for article in document.select(&SEL_ARTICLE) {
        let Some(link) = article.select(&SEL_ARTICLE_LINK).next() else {
            continue;
        };
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let release_date = article
            .select(&SEL_ARTICLE_DATE)
            .next()
            .and_then(|time| {
                time.value()
                    .attr("datetime")
                    .map(|dt| dt.chars().take(10).collect::<String>())
            })
            .and_then(|dt| parse_site_date(&dt));
        candidates.push(SearchCandidate {
            site: "queerclick".to_string(),
            title: text_of(link),
            url: absolute(BASE_URL, href),
            studio: None,
            release_date,
            duration_mins: None,
        });
    }
    candidates
}

fn parse_details(body: &str) -> SiteDetails {
    let document = Html::parse_document(body);
    let mut details = SiteDetails::default();

    details.synopsis = document
        .select(&SEL_BODY_TEXT)
        .map(text_of)
        .filter(|p| !p.is_empty())
        .collect::<Vec<_>>()
        .join("\n");
    details.cast = document.select(&SEL_TAG).map(text_of).collect();
    details.release_date = document
        .select(&SEL_ARTICLE_DATE)
        .next()
        .and_then(|time| {
            time.value()
                .attr("datetime")
                .map(|dt| dt.chars().take(10).collect::<String>())
        })
        .and_then(|dt| parse_site_date(&dt));
    details.poster = document
        .select(&SEL_IMAGE)
        .filter_map(|img| img.value().attr("src"))
        .map(|src| absolute(BASE_URL, src))
        .collect();
    // articles offer no art of their own: reuse the inline images
    details.art = details.poster.clone();

    details
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const SEARCH_PAGE: &str = r#"
        <article class="post">
          <h2 class="entry-title"><a href="/2021/05/wet-heat">CockyBoys: Wet Heat</a></h2>
          <time class="entry-date" datetime="2021-05-04T10:00:00+00:00">May 4, 2021</time>
        </article>"#;

    const DETAIL_PAGE: &str = r#"
        <article class="post">
          <time class="entry-date" datetime="2021-05-04T10:00:00+00:00">May 4, 2021</time>
          <div class="entry-content">
            <p>A scorcher from the mountains.</p>
            <p></p>
            <img src="//img.queerclick.com/1.jpg"/>
          </div>
          <a rel="tag" href="/tag/dario">Dario Beck</a>
          <a rel="tag" href="/tag/jessy">Jessy Ares</a>
        </article>"#;

    #[test]
    fn search_articles_become_candidates() {
        let candidates = parse_search(SEARCH_PAGE);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].title, "CockyBoys: Wet Heat");
        assert_eq!(
            candidates[0].release_date,
            NaiveDate::from_ymd_opt(2021, 5, 4)
        );
        assert_eq!(candidates[0].studio, None);
    }

    #[test]
    fn detail_extraction_leaves_unexposed_fields_empty() {
        let details = parse_details(DETAIL_PAGE);
        assert_eq!(details.synopsis, "A scorcher from the mountains.");
        assert_eq!(details.cast, vec!["Dario Beck", "Jessy Ares"]);
        assert_eq!(details.release_date, NaiveDate::from_ymd_opt(2021, 5, 4));
        assert_eq!(details.poster, vec!["https://img.queerclick.com/1.jpg"]);
        assert_eq!(details.art, details.poster);
        assert!(details.genres.is_empty());
        assert!(details.directors.is_empty());
        assert_eq!(details.duration_mins, None);
        assert!(details.scenes.is_empty());
        assert!(!details.compilation);
    }
}
