use crate::commands::build_pipeline;
use crate::output::Output;
use color_eyre::Result;
use indicatif::{ProgressBar, ProgressStyle};
use reel_match_core::PipelineError;
use serde_json::json;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

const VIDEO_EXTENSIONS: [&str; 6] = ["mp4", "mkv", "avi", "wmv", "mov", "m4v"];

pub async fn run(out: &Output, config_path: Option<&Path>, dir: &Path, write: bool) -> Result<()> {
    if !dir.is_dir() {
        return Err(color_eyre::eyre::eyre!("{} is not a directory", dir.display()));
    }
    let pipeline = build_pipeline(config_path)?;

    let files = collect_video_files(dir);
    out.info(format!("Scanning {} video files under {}", files.len(), dir.display()));

    let progress = ProgressBar::new(files.len() as u64);
    progress.set_style(
        ProgressStyle::with_template("{bar:40} {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar()),
    );

    let mut matched = 0usize;
    let mut unmatched: Vec<String> = Vec::new();
    let mut skipped: Vec<String> = Vec::new();

    for file in &files {
        let name = file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("<non-utf8>")
            .to_string();
        progress.set_message(name.clone());

        match pipeline.search(file, None).await {
            Ok(outcome) => {
                matched += 1;
                debug!(file = %name, site = ?outcome.film.site, "matched");
                if write {
                    if let Err(error) = write_metadata(&pipeline, file, &outcome.identifier).await {
                        warn!(file = %name, %error, "metadata write failed");
                    }
                }
            }
            Err(PipelineError::Parse(error)) => {
                // malformed names are skipped, never retried
                warn!(file = %name, %error, "unparsable filename");
                skipped.push(name);
            }
            Err(error) => {
                debug!(file = %name, %error, "no match");
                unmatched.push(name);
            }
        }
        progress.inc(1);
    }
    progress.finish_and_clear();

    out.success(format!(
        "{} matched, {} unmatched, {} skipped",
        matched,
        unmatched.len(),
        skipped.len()
    ));
    for name in &unmatched {
        out.warn(format!("unmatched: {}", name));
    }
    out.result(&json!({
        "matched": matched,
        "unmatched": unmatched,
        "skipped": skipped,
    }));
    Ok(())
}

fn collect_video_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkDir::new(dir)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .filter(|entry| {
            entry
                .path()
                .extension()
                .and_then(|e| e.to_str())
                .map(|e| VIDEO_EXTENSIONS.contains(&e.to_lowercase().as_str()))
                .unwrap_or(false)
        })
        .map(|entry| entry.into_path())
        .collect();
    files.sort();
    files
}

async fn write_metadata(
    pipeline: &reel_match_core::Pipeline,
    file: &Path,
    identifier: &str,
) -> Result<()> {
    let bundle = pipeline.update(identifier).await?;
    let dest = file.with_extension("metadata.json");
    std::fs::write(&dest, serde_json::to_string_pretty(&bundle)?)?;
    Ok(())
}
