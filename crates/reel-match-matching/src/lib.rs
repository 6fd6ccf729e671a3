pub mod error;
pub mod filename;
pub mod matcher;
pub mod normalize;
pub mod parse;
pub mod soundex;

pub use error::{MatchError, ParseError};
pub use filename::parse_filename;
pub use matcher::{levenshtein_name_match, soundex_name_match, Matcher};
pub use normalize::{normalise, normalise_words, sort_alpha_chars};
pub use parse::{parse_duration_mins, parse_site_date};
pub use soundex::soundex;
