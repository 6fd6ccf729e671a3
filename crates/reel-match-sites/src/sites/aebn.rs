//! AEBN (gay theatre) scraper.
//!
//! The richest of the supported sites: full synopsis, cast, categories,
//! scene breakdowns with start timecodes, and front/back box art.

use crate::client::PacedClient;
use crate::error::SiteError;
use crate::sites::{absolute, text_of};
use crate::traits::SiteScraper;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reel_match_matching::{parse_duration_mins, parse_site_date};
use reel_match_models::{Chapter, FilmRecord, SceneReview, SearchCandidate, SiteDetails};
use scraper::{Html, Selector};
use std::sync::Arc;
use tracing::debug;

const BASE_URL: &str = "https://gay.aebn.com";

static SEL_RESULT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.grid-item").expect("static selector"));
static SEL_RESULT_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.movie-title").expect("static selector"));
static SEL_RESULT_STUDIO: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.studio a").expect("static selector"));
static SEL_RESULT_DATE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.release-date").expect("static selector"));
static SEL_SYNOPSIS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.synopsis-content p").expect("static selector"));
static SEL_CAST: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.cast-list a.actor-name").expect("static selector"));
static SEL_DIRECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.director a").expect("static selector"));
static SEL_CATEGORY: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.categories a.category").expect("static selector"));
static SEL_SERIES: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.series a").expect("static selector"));
static SEL_DETAIL_ROW: Lazy<Selector> =
    Lazy::new(|| Selector::parse("ul.movie-details li").expect("static selector"));
static SEL_ROW_LABEL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.label").expect("static selector"));
static SEL_ROW_VALUE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.value").expect("static selector"));
static SEL_SCENE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.scene-list div.scene").expect("static selector"));
static SEL_SCENE_TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.scene-title").expect("static selector"));
static SEL_SCENE_TEXT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.scene-description").expect("static selector"));
static SEL_POSTER: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.boxcover img.front").expect("static selector"));
static SEL_ART: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.boxcover img.back").expect("static selector"));

pub struct Aebn {
    client: Arc<PacedClient>,
    max_pages: usize,
}

impl Aebn {
    pub fn new(client: Arc<PacedClient>, max_pages: usize) -> Self {
        Self { client, max_pages }
    }

    fn search_url(query: &str, page: usize) -> String {
        format!(
            "{}/gay/search/movies/page/{}?queryType=Free+Form&query={}",
            BASE_URL,
            page,
            urlencoding::encode(query)
        )
    }
}

#[async_trait]
impl SiteScraper for Aebn {
    fn site_id(&self) -> &'static str {
        "aebn"
    }

    fn site_name(&self) -> &'static str {
        "AEBN"
    }

    async fn search(&self, film: &FilmRecord) -> Result<Vec<SearchCandidate>, SiteError> {
        let mut candidates = Vec::new();
        for page in 1..=self.max_pages {
            let url = Self::search_url(&film.title, page);
            let body = self.client.fetch_text(&url).await?;
            let page_candidates = parse_search(&body);
            debug!(page, count = page_candidates.len(), "aebn search page");
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
    for result in document.select(&SEL_RESULT) {
        let Some(link) = result.select(&SEL_RESULT_LINK).next() else {
            continue;
        };
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        candidates.push(SearchCandidate {
            site: "aebn".to_string(),
            title: text_of(link),
            url: absolute(BASE_URL, href),
            studio: result.select(&SEL_RESULT_STUDIO).next().map(text_of),
            release_date: result
                .select(&SEL_RESULT_DATE)
                .next()
                .and_then(|d| parse_site_date(&text_of(d))),
            duration_mins: None,
        });
    }
    candidates
}

fn parse_details(body: &str) -> SiteDetails {
    let document = Html::parse_document(body);
    let mut details = SiteDetails::default();

    details.synopsis = document
        .select(&SEL_SYNOPSIS)
        .map(text_of)
        .collect::<Vec<_>>()
        .join("\n");
    details.cast = document.select(&SEL_CAST).map(text_of).collect();
    details.directors = document.select(&SEL_DIRECTOR).map(text_of).collect();
    details.genres = document.select(&SEL_CATEGORY).map(text_of).collect();
    details.collections = document.select(&SEL_SERIES).map(text_of).collect();
    details.compilation = details.genres.iter().any(|g| g.eq_ignore_ascii_case("compilation"));

    for row in document.select(&SEL_DETAIL_ROW) {
        let label = row.select(&SEL_ROW_LABEL).next().map(text_of).unwrap_or_default();
        let value = row.select(&SEL_ROW_VALUE).next().map(text_of).unwrap_or_default();
        match label.trim_end_matches(':').to_lowercase().as_str() {
            "released" => details.release_date = parse_site_date(&value),
            "running time" => details.duration_mins = parse_duration_mins(&value),
            _ => {}
        }
    }

    for scene in document.select(&SEL_SCENE) {
        let heading = scene
            .select(&SEL_SCENE_TITLE)
            .next()
            .map(text_of)
            .unwrap_or_else(|| format!("Scene {}", details.scenes.len() + 1));
        let text = scene.select(&SEL_SCENE_TEXT).next().map(text_of).unwrap_or_default();
        // start timecodes come as data attributes in seconds
        let start_secs: Option<i64> = scene
            .value()
            .attr("data-time-start")
            .and_then(|v| v.parse().ok());
        let end_secs: Option<i64> = scene
            .value()
            .attr("data-time-end")
            .and_then(|v| v.parse().ok());
        if let (Some(start), Some(end)) = (start_secs, end_secs) {
            details.chapters.push(Chapter {
                title: heading.clone(),
                start_ms: start * 1000,
                end_ms: end * 1000,
            });
        }
        let duration_mins = match (start_secs, end_secs) {
            (Some(start), Some(end)) if end > start => Some((end - start) / 60),
            _ => None,
        };
        details.scenes.push(SceneReview {
            heading,
            text,
            duration_mins,
        });
    }

    details.poster = document
        .select(&SEL_POSTER)
        .filter_map(|img| img.value().attr("src"))
        .map(|src| absolute(BASE_URL, src))
        .collect();
    details.art = document
        .select(&SEL_ART)
        .filter_map(|img| img.value().attr("src"))
        .map(|src| absolute(BASE_URL, src))
        .collect();

    details
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const SEARCH_PAGE: &str = r#"
        <html><body>
          <div class="grid-item">
            <a class="movie-title" href="/gay/movies/12345/wet-heat">Wet Heat</a>
            <div class="studio"><a href="/gay/studio/9">Titan Men</a></div>
            <div class="release-date">Jun 12, 2015</div>
          </div>
          <div class="grid-item">
            <a class="movie-title" href="/gay/movies/99/other">Other Title</a>
          </div>
          <div class="grid-item"><span>no link, skipped</span></div>
        </body></html>"#;

    const DETAIL_PAGE: &str = r#"
        <html><body>
          <div class="synopsis-content"><p>Steam rises.</p><p>Heat builds.</p></div>
          <div class="cast-list">
            <a class="actor-name" href="/a/1">Dario Beck</a>
            <a class="actor-name" href="/a/2">Jessy Ares</a>
          </div>
          <div class="director"><a href="/d/1">Brian Mills</a></div>
          <div class="categories">
            <a class="category" href="/c/1">Muscles</a>
            <a class="category" href="/c/2">Outdoor</a>
          </div>
          <div class="series"><a href="/s/1">Heat</a></div>
          <ul class="movie-details">
            <li><span class="label">Released:</span> <span class="value">Jun 12, 2015</span></li>
            <li><span class="label">Running Time:</span> <span class="value">1:35:10</span></li>
          </ul>
          <div class="scene-list">
            <div class="scene" data-time-start="0" data-time-end="1800">
              <span class="scene-title">Scene 1</span>
              <div class="scene-description">Opening scene.</div>
            </div>
            <div class="scene" data-time-start="1800" data-time-end="4500">
              <span class="scene-title">Scene 2</span>
              <div class="scene-description">Second scene.</div>
            </div>
          </div>
          <div class="boxcover">
            <img class="front" src="//img.aebn.com/front.jpg"/>
            <img class="back" src="//img.aebn.com/back.jpg"/>
          </div>
        </body></html>"#;

    #[test]
    fn search_rows_become_candidates() {
        let candidates = parse_search(SEARCH_PAGE);
        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].title, "Wet Heat");
        assert_eq!(candidates[0].url, "https://gay.aebn.com/gay/movies/12345/wet-heat");
        assert_eq!(candidates[0].studio.as_deref(), Some("Titan Men"));
        assert_eq!(
            candidates[0].release_date,
            NaiveDate::from_ymd_opt(2015, 6, 12)
        );
        // a row without a date still yields a candidate
        assert_eq!(candidates[1].release_date, None);
    }

    #[test]
    fn detail_page_fills_every_field() {
        let details = parse_details(DETAIL_PAGE);
        assert_eq!(details.synopsis, "Steam rises.\nHeat builds.");
        assert_eq!(details.cast, vec!["Dario Beck", "Jessy Ares"]);
        assert_eq!(details.directors, vec!["Brian Mills"]);
        assert!(details.genres.contains("Muscles"));
        assert!(details.collections.contains("Heat"));
        assert_eq!(details.release_date, NaiveDate::from_ymd_opt(2015, 6, 12));
        assert_eq!(details.duration_mins, Some(95));
        assert_eq!(details.scenes.len(), 2);
        assert_eq!(details.scenes[0].duration_mins, Some(30));
        assert_eq!(details.chapters.len(), 2);
        assert_eq!(details.chapters[1].start_ms, 1_800_000);
        assert_eq!(details.poster, vec!["https://img.aebn.com/front.jpg"]);
        assert_eq!(details.art, vec!["https://img.aebn.com/back.jpg"]);
        assert!(!details.compilation);
        // fields AEBN does not expose stay explicit empties
        assert!(details.countries.is_empty());
        assert_eq!(details.rating, None);
    }

    #[test]
    fn compilation_flag_follows_category() {
        let page = r#"<div class="categories"><a class="category">Compilation</a></div>"#;
        assert!(parse_details(page).compilation);
    }
}
