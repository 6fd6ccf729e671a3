//! Sync extraction from IAFD pages. All functions take page bodies so
//! they can be exercised against fixtures without the network.

use crate::iafd::BASE_URL;
use crate::sites::{absolute, text_of};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use reel_match_matching::{parse_duration_mins, parse_site_date};
use reel_match_models::FilmographyEntry;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;

static SEL_TITLE_ROW: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table#titleresult tbody tr").expect("static selector"));
static SEL_PERSON_ROW: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table#tblMal tbody tr, table#tblFem tbody tr").expect("static selector"));
static SEL_CELL: Lazy<Selector> = Lazy::new(|| Selector::parse("td").expect("static selector"));
static SEL_LINK: Lazy<Selector> = Lazy::new(|| Selector::parse("a").expect("static selector"));
static SEL_BIOHEADING: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p.bioheading").expect("static selector"));
static SEL_CASTBOX: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div.castbox").expect("static selector"));
static SEL_CREDIT_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p b a").expect("static selector"));
static SEL_CREDIT_ROLE: Lazy<Selector> =
    Lazy::new(|| Selector::parse("span.credit-role").expect("static selector"));
static SEL_CREDIT_ALIAS: Lazy<Selector> =
    Lazy::new(|| Selector::parse("i.alias").expect("static selector"));
static SEL_DIRECTOR_LINK: Lazy<Selector> =
    Lazy::new(|| Selector::parse("p.director a").expect("static selector"));
static SEL_HEADSHOT: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div#headshot img").expect("static selector"));
static SEL_FILMOGRAPHY_ROW: Lazy<Selector> =
    Lazy::new(|| Selector::parse("table#personal tbody tr").expect("static selector"));
static SEL_AWARD: Lazy<Selector> =
    Lazy::new(|| Selector::parse("div#awards li").expect("static selector"));

static RE_AKA: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\(as ([^)]+)\)").unwrap());

/// One row from a film search-results page
#[derive(Debug, Clone)]
pub struct FilmRow {
    pub title: String,
    pub url: String,
    pub year: Option<i32>,
    pub distributor: Option<String>,
}

/// One row from a person search-results page
#[derive(Debug, Clone)]
pub struct PersonRow {
    pub name: String,
    pub url: String,
    pub aliases: Vec<String>,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
}

/// A credit scraped from a film page's cast boxes
#[derive(Debug, Clone)]
pub struct FilmCredit {
    pub name: String,
    pub url: String,
    pub role: String,
    /// "(as X)" billing alias, when present
    pub alias: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct FilmPage {
    pub duration_mins: Option<i64>,
    pub release_date: Option<NaiveDate>,
    pub distributor: Option<String>,
    pub studio: Option<String>,
    pub compilation: bool,
    pub cast: Vec<FilmCredit>,
    pub directors: Vec<FilmCredit>,
}

#[derive(Debug, Clone, Default)]
pub struct PersonPage {
    pub photo: Option<String>,
    pub nationality: Option<String>,
    pub bio: BTreeMap<String, String>,
    pub awards: Vec<String>,
    pub films: Vec<FilmographyEntry>,
}

pub fn parse_film_rows(body: &str) -> Vec<FilmRow> {
    let document = Html::parse_document(body);
    let mut rows = Vec::new();
    for row in document.select(&SEL_TITLE_ROW) {
        let cells: Vec<ElementRef<'_>> = row.select(&SEL_CELL).collect();
        let Some(first) = cells.first() else { continue };
        let Some(link) = first.select(&SEL_LINK).next() else {
            continue;
        };
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        rows.push(FilmRow {
            title: text_of(link),
            url: absolute(BASE_URL, href),
            year: cells.get(1).and_then(|c| text_of(*c).parse().ok()),
            distributor: cells.get(2).map(|c| text_of(*c)).filter(|s| !s.is_empty()),
        });
    }
    rows
}

pub fn parse_person_rows(body: &str) -> Vec<PersonRow> {
    let document = Html::parse_document(body);
    let mut rows = Vec::new();
    for row in document.select(&SEL_PERSON_ROW) {
        let cells: Vec<ElementRef<'_>> = row.select(&SEL_CELL).collect();
        let Some(first) = cells.first() else { continue };
        let Some(link) = first.select(&SEL_LINK).next() else {
            continue;
        };
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let aliases = cells
            .get(1)
            .map(|c| {
                text_of(*c)
                    .split(',')
                    .map(str::trim)
                    .filter(|a| !a.is_empty() && *a != "No known aliases")
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        rows.push(PersonRow {
            name: text_of(link),
            url: absolute(BASE_URL, href),
            aliases,
            start_year: cells.get(2).and_then(|c| text_of(*c).parse().ok()),
            end_year: cells.get(3).and_then(|c| text_of(*c).parse().ok()),
        });
    }
    rows
}

pub fn parse_film_page(body: &str) -> FilmPage {
    let document = Html::parse_document(body);
    let mut page = FilmPage::default();

    for (heading, value) in bio_pairs(&document) {
        match heading.trim_end_matches(':').to_lowercase().as_str() {
            "minutes" => page.duration_mins = parse_duration_mins(&value),
            "release date" => page.release_date = parse_site_date(&value),
            "distributor" => page.distributor = non_empty(value),
            "studio" => page.studio = non_empty(value),
            "compilation" => page.compilation = value.eq_ignore_ascii_case("yes"),
            _ => {}
        }
    }

    for castbox in document.select(&SEL_CASTBOX) {
        let Some(link) = castbox.select(&SEL_CREDIT_LINK).next() else {
            continue;
        };
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        let role = castbox
            .select(&SEL_CREDIT_ROLE)
            .next()
            .map(text_of)
            .unwrap_or_default();
        let alias = castbox
            .select(&SEL_CREDIT_ALIAS)
            .next()
            .and_then(|i| RE_AKA.captures(&text_of(i)).map(|c| c[1].trim().to_string()));
        page.cast.push(FilmCredit {
            name: text_of(link),
            url: absolute(BASE_URL, href),
            role,
            alias,
        });
    }

    for link in document.select(&SEL_DIRECTOR_LINK) {
        let Some(href) = link.value().attr("href") else {
            continue;
        };
        page.directors.push(FilmCredit {
            name: text_of(link),
            url: absolute(BASE_URL, href),
            role: String::new(),
            alias: None,
        });
    }

    page
}

pub fn parse_person_page(body: &str) -> PersonPage {
    let document = Html::parse_document(body);
    let mut page = PersonPage::default();

    page.photo = document
        .select(&SEL_HEADSHOT)
        .next()
        .and_then(|img| img.value().attr("src"))
        .filter(|src| !src.contains("nophoto"))
        .map(|src| absolute(BASE_URL, src));

    for (heading, value) in bio_pairs(&document) {
        let key = heading.trim_end_matches(':').to_string();
        if key.eq_ignore_ascii_case("nationality") {
            page.nationality = non_empty(value.clone());
        }
        if let Some(value) = non_empty(value) {
            page.bio.insert(key, value);
        }
    }

    page.awards = document.select(&SEL_AWARD).map(text_of).collect();

    for row in document.select(&SEL_FILMOGRAPHY_ROW) {
        let cells: Vec<ElementRef<'_>> = row.select(&SEL_CELL).collect();
        let Some(first) = cells.first() else { continue };
        let title = match first.select(&SEL_LINK).next() {
            Some(link) => text_of(link),
            None => text_of(*first),
        };
        if title.is_empty() {
            continue;
        }
        let categories = cells
            .get(3)
            .map(|c| {
                text_of(*c)
                    .split(',')
                    .map(str::trim)
                    .filter(|s| !s.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();
        page.films.push(FilmographyEntry {
            title,
            year: cells.get(2).and_then(|c| text_of(*c).parse().ok()),
            studio: cells.get(1).map(|c| text_of(*c)).filter(|s| !s.is_empty()),
            categories,
        });
    }

    page
}

/// Pair each `p.bioheading` with the `p.biodata` that follows it
fn bio_pairs(document: &Html) -> Vec<(String, String)> {
    let mut pairs = Vec::new();
    for heading in document.select(&SEL_BIOHEADING) {
        let value = heading
            .next_siblings()
            .filter_map(ElementRef::wrap)
            .find(|el| el.value().classes().any(|c| c == "biodata"))
            .map(text_of)
            .unwrap_or_default();
        pairs.push((text_of(heading), value));
    }
    pairs
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    const FILM_RESULTS: &str = r#"
        <table id="titleresult"><tbody>
          <tr>
            <td><a href="/title.rme/id=1/wet-heat.htm">Wet Heat</a></td>
            <td>2015</td>
            <td>Titan Media</td>
          </tr>
          <tr>
            <td><a href="/title.rme/id=2/wet-heat-2.htm">Wet Heat 2</a></td>
            <td>2017</td>
            <td></td>
          </tr>
        </tbody></table>"#;

    const PERSON_RESULTS: &str = r#"
        <table id="tblMal"><tbody>
          <tr>
            <td><a href="/person.rme/id=77/dario-beck.htm">Dario Beck</a></td>
            <td>Dario B, Dario</td>
            <td>2010</td>
            <td>2018</td>
          </tr>
          <tr>
            <td><a href="/person.rme/id=88/other.htm">Other Guy</a></td>
            <td>No known aliases</td>
            <td>1995</td>
            <td>1999</td>
          </tr>
        </tbody></table>"#;

    const FILM_PAGE: &str = r#"
        <p class="bioheading">Minutes</p><p class="biodata">95</p>
        <p class="bioheading">Release Date</p><p class="biodata">Jun 12, 2015</p>
        <p class="bioheading">Distributor</p><p class="biodata">Titan Media</p>
        <p class="bioheading">Studio</p><p class="biodata">Titan Men</p>
        <p class="bioheading">Compilation</p><p class="biodata">No</p>
        <div class="castbox">
          <p><b><a href="/person.rme/id=77/dario-beck.htm">Dario Beck</a></b></p>
          <span class="credit-role">Top</span>
        </div>
        <div class="castbox">
          <p><b><a href="/person.rme/id=99/jessy.htm">Jessy Ares</a></b></p>
          <i class="alias">(as Jessy A)</i>
        </div>
        <p class="director"><a href="/person.rme/id=55/brian-mills.htm">Brian Mills</a></p>"#;

    const PERSON_PAGE: &str = r#"
        <div id="headshot"><img src="/graphics/headshots/dario.jpg"/></div>
        <p class="bioheading">Nationality</p><p class="biodata">Spain</p>
        <p class="bioheading">Hair Color</p><p class="biodata">Brown</p>
        <p class="bioheading">Height</p><p class="biodata"></p>
        <div id="awards"><ul><li>2013 Hustlaball Award</li></ul></div>
        <table id="personal"><tbody>
          <tr>
            <td><a href="/title.rme/id=1">Wet Heat</a></td>
            <td>Titan Media</td>
            <td>2015</td>
            <td>Gay</td>
          </tr>
          <tr>
            <td><a href="/title.rme/id=3">Some Other Film</a></td>
            <td>Acme</td>
            <td>2016</td>
            <td>NonSex</td>
          </tr>
        </tbody></table>"#;

    #[test]
    fn film_rows_are_extracted_in_order() {
        let rows = parse_film_rows(FILM_RESULTS);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].title, "Wet Heat");
        assert_eq!(rows[0].year, Some(2015));
        assert_eq!(rows[0].distributor.as_deref(), Some("Titan Media"));
        assert_eq!(rows[0].url, "https://www.iafd.com/title.rme/id=1/wet-heat.htm");
        // empty distributor cell becomes None
        assert_eq!(rows[1].distributor, None);
    }

    #[test]
    fn person_rows_carry_aliases_and_career_years() {
        let rows = parse_person_rows(PERSON_RESULTS);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].name, "Dario Beck");
        assert_eq!(rows[0].aliases, vec!["Dario B", "Dario"]);
        assert_eq!(rows[0].start_year, Some(2010));
        assert_eq!(rows[0].end_year, Some(2018));
        // the "No known aliases" placeholder is dropped
        assert!(rows[1].aliases.is_empty());
    }

    #[test]
    fn film_page_bio_and_credits() {
        let page = parse_film_page(FILM_PAGE);
        assert_eq!(page.duration_mins, Some(95));
        assert_eq!(page.release_date, NaiveDate::from_ymd_opt(2015, 6, 12));
        assert_eq!(page.distributor.as_deref(), Some("Titan Media"));
        assert_eq!(page.studio.as_deref(), Some("Titan Men"));
        assert!(!page.compilation);
        assert_eq!(page.cast.len(), 2);
        assert_eq!(page.cast[0].name, "Dario Beck");
        assert_eq!(page.cast[0].role, "Top");
        assert_eq!(page.cast[1].alias.as_deref(), Some("Jessy A"));
        assert_eq!(page.directors.len(), 1);
        assert_eq!(page.directors[0].name, "Brian Mills");
    }

    #[test]
    fn person_page_bio_filmography_and_awards() {
        let page = parse_person_page(PERSON_PAGE);
        assert_eq!(
            page.photo.as_deref(),
            Some("https://www.iafd.com/graphics/headshots/dario.jpg")
        );
        assert_eq!(page.nationality.as_deref(), Some("Spain"));
        assert_eq!(page.bio.get("Hair Color").map(String::as_str), Some("Brown"));
        // empty biodata rows are dropped
        assert!(!page.bio.contains_key("Height"));
        assert_eq!(page.awards, vec!["2013 Hustlaball Award"]);
        assert_eq!(page.films.len(), 2);
        assert_eq!(page.films[0].categories, vec!["Gay"]);
        assert_eq!(page.films[1].categories, vec!["NonSex"]);
    }
}
