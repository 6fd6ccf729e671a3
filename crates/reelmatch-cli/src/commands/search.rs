use crate::commands::build_pipeline;
use crate::output::Output;
use color_eyre::Result;
use serde_json::json;
use std::path::Path;

pub async fn run(
    out: &Output,
    config_path: Option<&Path>,
    file: &Path,
    duration: Option<i64>,
    id_file: Option<&Path>,
) -> Result<()> {
    let pipeline = build_pipeline(config_path)?;
    let outcome = pipeline.search(file, duration).await?;

    out.success(format!(
        "{} confirmed on {} ({})",
        outcome.film.title,
        outcome.film.site.as_deref().unwrap_or("?"),
        outcome.film.site_url.as_deref().unwrap_or("?"),
    ));

    match id_file {
        Some(path) => {
            std::fs::write(path, &outcome.identifier)?;
            out.info(format!("identifier written to {}", path.display()));
        }
        None => out.info(&outcome.identifier),
    }
    out.result(&json!({
        "title": outcome.film.title,
        "site": outcome.film.site,
        "url": outcome.film.site_url,
        "identifier": outcome.identifier,
    }));
    Ok(())
}
