use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Working record for a single library title
///
/// Built once by the filename parser, then progressively confirmed and
/// enriched as each pipeline stage runs. Between the search and update
/// phases it travels as an opaque JSON identifier (the host may re-invoke
/// the update phase in a fresh process), so every field must round-trip
/// through serde.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FilmRecord {
    /// On-disk filename this record was parsed from (without directory)
    pub file_name: String,
    pub studio: String,
    /// Secondary studio name used by IAFD when the billing studio differs
    /// from the content owner (the `;`-separated form in the filename)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iafd_studio: Option<String>,
    pub title: String,
    /// Title with series/episode numbering stripped
    pub short_title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Canonical-key variants accepted during title matching.
    /// Never empty after a successful parse: it always holds at least the
    /// keys of the full title and the short title.
    pub compare_titles: Vec<String>,
    /// Series-name fragments, in filename order
    #[serde(default)]
    pub series: Vec<String>,
    /// Series fragments with their episode number still attached
    #[serde(default)]
    pub episodes: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scene_id: Option<String>,
    /// Duration probed from the media file, in minutes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_mins: Option<i64>,
    /// Duration IAFD reports for the matched film, in minutes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iafd_duration_mins: Option<i64>,
    /// Cast list embedded in the filename; when present it preempts
    /// site-scraped cast entirely
    #[serde(default)]
    pub filename_cast: Vec<String>,
    /// Best known release date. Starts as Dec 31 of the filename year and
    /// is tightened whenever a site supplies a more precise date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub compare_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site_url: Option<String>,
    /// Site id the record was confirmed against
    #[serde(skip_serializing_if = "Option::is_none")]
    pub site: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iafd_film_url: Option<String>,
    #[serde(default)]
    pub found_on_iafd: bool,
    #[serde(default)]
    pub compilation: bool,
    /// Release split across multiple files (cd/disc/part markers)
    #[serde(default)]
    pub stacked: bool,
    /// 1-based part number when stacked
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stack_part: Option<u8>,
}

impl FilmRecord {
    /// Date used for release-date comparisons, defaulting to Dec 31 of the
    /// filename year when no site has supplied anything more precise
    pub fn comparison_date(&self) -> Option<NaiveDate> {
        self.compare_date
            .or_else(|| self.year.and_then(|y| NaiveDate::from_ymd_opt(y, 12, 31)))
    }

    /// Serialize into the opaque identifier passed between the search and
    /// update phases
    pub fn to_identifier(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Reconstruct a record from the identifier produced by the search phase
    pub fn from_identifier(id: &str) -> serde_json::Result<Self> {
        serde_json::from_str(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> FilmRecord {
        FilmRecord {
            file_name: "(Titan Men) - Wet Heat (2015).mp4".to_string(),
            studio: "Titan Men".to_string(),
            iafd_studio: None,
            title: "Wet Heat".to_string(),
            short_title: "Wet Heat".to_string(),
            year: Some(2015),
            compare_titles: vec!["wetheat".to_string()],
            series: Vec::new(),
            episodes: Vec::new(),
            scene_id: None,
            duration_mins: Some(95),
            iafd_duration_mins: None,
            filename_cast: Vec::new(),
            compare_date: None,
            site_url: None,
            site: None,
            iafd_film_url: None,
            found_on_iafd: false,
            compilation: false,
            stacked: false,
            stack_part: None,
        }
    }

    #[test]
    fn identifier_round_trips_dates_and_title_variants() {
        let mut record = sample_record();
        record.compare_date = NaiveDate::from_ymd_opt(2015, 6, 12);
        record.compare_titles.push("heatwet".to_string());

        let id = record.to_identifier().unwrap();
        let restored = FilmRecord::from_identifier(&id).unwrap();
        assert_eq!(restored, record);
    }

    #[test]
    fn comparison_date_defaults_to_year_end() {
        let record = sample_record();
        assert_eq!(
            record.comparison_date(),
            NaiveDate::from_ymd_opt(2015, 12, 31)
        );
    }

    #[test]
    fn comparison_date_prefers_site_supplied_date() {
        let mut record = sample_record();
        record.compare_date = NaiveDate::from_ymd_opt(2015, 3, 2);
        assert_eq!(record.comparison_date(), NaiveDate::from_ymd_opt(2015, 3, 2));
    }
}
