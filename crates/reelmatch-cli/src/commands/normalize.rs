use crate::output::Output;
use color_eyre::Result;
use reel_match_matching::{normalise, sort_alpha_chars};
use serde_json::json;

pub fn run(out: &Output, text: &str) -> Result<()> {
    let key = normalise(text);
    let sorted = sort_alpha_chars(&key);
    out.info(format!("canonical: {}", key));
    out.info(format!("sorted:    {}", sorted));
    out.result(&json!({
        "input": text,
        "canonical": key,
        "sorted": sorted,
    }));
    Ok(())
}
