//! GayHotMovies scraper. Mid-weight source: synopsis, cast, categories,
//! star rating, and scene listings without timecodes.

use crate::client::PacedClient;
use crate::error::SiteError;
use crate::sites::{absolute, text_of};
use crate::traits::SiteScraper;
use async_trait::async_trait;
use once_cell::sync::Lazy;
use reel_match_matching::{parse_duration_mins, parse_site_date};
use reel_match_models::{FilmRecord, SceneReview, SearchCandidate, SiteDetails};
use scraper::{Html, Selector};
use std::sync::Arc;
use tracing::debug;

const BASE_URL: &str = "https://www.gayhotmovies.com";

static SEL_RESULT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.product-item").expect("static selector"));
static SEL_RESULT_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a.product-title").expect("static selector"));
static SEL_RESULT_STUDIO: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.studio-name").expect("static selector"));
static SEL_RESULT_YEAR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.release-year").expect("static selector"));
static SEL_SYNOPSIS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.video-description").expect("static selector"));
static SEL_CAST: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.star-list a.star-name").expect("static selector"));
static SEL_DIRECTOR: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.director-name a").expect("static selector"));
static SEL_CATEGORY: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.category-listing a").expect("static selector"));
static SEL_SERIES: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.series-link a").expect("static selector"));
static SEL_SPEC_ROW: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table.spec-table tr").expect("static selector"));
static SEL_SPEC_CELL: Lazy<Selector> =
    Lazy::new(|| Selector::parse("td").expect("static selector"));
static SEL_RATING: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.avg-rating").expect("static selector"));
static SEL_SCENE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.scene-block").expect("static selector"));
static SEL_SCENE_TITLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("h4.scene-head").expect("static selector"));
static SEL_SCENE_TEXT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p.scene-notes").expect("static selector"));
static SEL_COVER_FRONT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a#front-cover img").expect("static selector"));
static SEL_COVER_BACK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("a#back-cover img").expect("static selector"));

pub struct GayHotMovies {
    client: Arc<PacedClient>,
    max_pages: usize,
}

impl GayHotMovies {
    pub fn new(client: Arc<PacedClient>, max_pages: usize) -> Self {
        Self { client, max_pages }
    }

    fn search_url(query: &str, page: usize) -> String {
        format!(
            "{}/search.php?num_per_page=48&page_sort=relevance&search_string={}&page={}",
            BASE_URL,
            urlencoding::encode(query),
            page
        )
    }
}

#[async_trait]
impl SiteScraper for GayHotMovies {
    fn site_id(&self) -> &'static str {
        "gayhotmovies"
    }

    fn site_name(&self) -> &'static str {
        "GayHotMovies"
    }

    async fn search(&self, film: &FilmRecord) -> Result<Vec<SearchCandidate>, SiteError> {
        let mut candidates = Vec::new();
        for page in 1..=self.max_pages {
            let url = Self::search_url(&film.title, page);
            let body = self.client.fetch_text(&url).await?;
            let page_candidates = parse_search(&body);
            debug!(page, count = page_candidates.len(), "gayhotmovies search page");
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
            site: "gayhotmovies".to_string(),
            title: text_of(link),
            url: absolute(BASE_URL, href),
            studio: result.select(&SEL_RESULT_STUDIO).next().map(text_of),
            release_date: result
                .select(&SEL_RESULT_YEAR)
                .next()
                .and_then(|y| parse_site_date(&text_of(y))),
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
        .next()
        .map(text_of)
        .unwrap_or_default();
    details.cast = document.select(&SEL_CAST).map(text_of).collect();
    details.directors = document.select(&SEL_DIRECTOR).map(text_of).collect();
    details.genres = document.select(&SEL_CATEGORY).map(text_of).collect();
    details.collections = document.select(&SEL_SERIES).map(text_of).collect();
    details.compilation = details
        .genres
        .iter()
        .any(|g| g.eq_ignore_ascii_case("compilation"));

    for row in document.select(&SEL_SPEC_ROW) {
        let cells: Vec<String> = row.select(&SEL_SPEC_CELL).map(text_of).collect();
        let [label, value] = cells.as_slice() else {
            continue;
        };
        match label.trim_end_matches(':').to_lowercase().as_str() {
            "released" => details.release_date = parse_site_date(value),
            "run time" => details.duration_mins = parse_duration_mins(value),
            "country" => {
                details.countries.insert(value.clone());
            }
            _ => {}
        }
    }

    details.rating = document
        .select(&SEL_RATING)
        .next()
        .and_then(|r| text_of(r).parse::<f32>().ok())
        // site ratings are out of 5, the host scale is out of 10
        .map(|r| (r * 2.0).min(10.0));

    for scene in document.select(&SEL_SCENE) {
        let heading = scene
            .select(&SEL_SCENE_TITLE)
            .next()
            .map(text_of)
            .unwrap_or_else(|| format!("Scene {}", details.scenes.len() + 1));
        let text = scene
            .select(&SEL_SCENE_TEXT)
            .next()
            .map(text_of)
            .unwrap_or_default();
        details.scenes.push(SceneReview {
            heading,
            text,
            duration_mins: None,
        });
    }

    details.poster = document
        .select(&SEL_COVER_FRONT)
        .filter_map(|img| img.value().attr("src"))
        .map(|src| absolute(BASE_URL, src))
        .collect();
    details.art = document
        .select(&SEL_COVER_BACK)
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
        <div class="product-item">
          <a class="product-title" href="/video/4711/aspen">The Other Side of Aspen</a>
          <span class="studio-name">Falcon Studios</span>
          <span class="release-year">1984</span>
        </div>"#;

    const DETAIL_PAGE: &str = r#"
        <div class="video-description">Classic mountain getaway.</div>
        <div class="star-list"><a class="star-name">Al Parker</a><a class="star-name">Dick Fisk</a></div>
        <span class="director-name"><a>Steve Scott</a></span>
        <div class="category-listing"><a>Classic</a><a>Outdoor</a></div>
        <table class="spec-table">
          <tr><td>Released:</td><td>1984</td></tr>
          <tr><td>Run Time:</td><td>85 min</td></tr>
          <tr><td>Country:</td><td>USA</td></tr>
          <tr><td>single cell row ignored</td></tr>
        </table>
        <span class="avg-rating">4.5</span>
        <div class="scene-block"><h4 class="scene-head">Fireside</h4><p class="scene-notes">First scene.</p></div>
        <a id="front-cover"><img src="/covers/front.jpg"/></a>
        <a id="back-cover"><img src="/covers/back.jpg"/></a>"#;

    #[test]
    fn search_rows_become_candidates() {
        let candidates = parse_search(SEARCH_PAGE);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].title, "The Other Side of Aspen");
        assert_eq!(candidates[0].studio.as_deref(), Some("Falcon Studios"));
        // year-only dates default to Dec 31
        assert_eq!(
            candidates[0].release_date,
            NaiveDate::from_ymd_opt(1984, 12, 31)
        );
    }

    #[test]
    fn detail_page_extraction() {
        let details = parse_details(DETAIL_PAGE);
        assert_eq!(details.synopsis, "Classic mountain getaway.");
        assert_eq!(details.cast, vec!["Al Parker", "Dick Fisk"]);
        assert_eq!(details.directors, vec!["Steve Scott"]);
        assert_eq!(details.duration_mins, Some(85));
        assert!(details.countries.contains("USA"));
        assert_eq!(details.rating, Some(9.0));
        assert_eq!(details.scenes.len(), 1);
        assert_eq!(details.scenes[0].heading, "Fireside");
        assert_eq!(details.poster, vec!["https://www.gayhotmovies.com/covers/front.jpg"]);
        // no timecodes on this site: chapters stay empty
        assert!(details.chapters.is_empty());
    }
}
