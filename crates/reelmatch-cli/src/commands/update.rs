use crate::commands::build_pipeline;
use crate::output::Output;
use color_eyre::eyre::Context;
use color_eyre::Result;
use std::path::Path;

pub async fn run(
    out: &Output,
    config_path: Option<&Path>,
    id_file: &Path,
    dest: Option<&Path>,
) -> Result<()> {
    let identifier = std::fs::read_to_string(id_file)
        .wrap_err_with(|| format!("could not read identifier from {}", id_file.display()))?;
    let pipeline = build_pipeline(config_path)?;
    let bundle = pipeline.update(identifier.trim()).await?;

    let rendered = serde_json::to_string_pretty(&bundle)?;
    match dest {
        Some(path) => {
            std::fs::write(path, &rendered)?;
            out.success(format!("metadata written to {}", path.display()));
        }
        None => {
            out.success(format!(
                "{} - {} cast, {} collections",
                bundle.title,
                bundle.cast.len(),
                bundle.collections.len()
            ));
            println!("{}", rendered);
        }
    }
    Ok(())
}
