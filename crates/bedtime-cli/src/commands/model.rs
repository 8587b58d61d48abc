//! Model artifact inspection.

use std::path::PathBuf;

use clap::Subcommand;
use bedtime_core::model::BUNDLED_ARTIFACT;
use bedtime_core::{Config, ModelSource};

#[derive(Subcommand)]
pub enum ModelAction {
    /// Load an artifact and describe it as JSON
    Show {
        /// Model artifact (.toml or .json) [default: config model.path, else bundled]
        #[arg(long)]
        model: Option<PathBuf>,
    },
    /// Print the bundled artifact, as a starting point for a custom model
    Export,
}

pub fn run(action: ModelAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ModelAction::Show { model } => {
            let source = match model {
                Some(path) => ModelSource::File(path),
                None => Config::load()?.model_source(),
            };
            // Unlike `predict`, this reports the full load error.
            let artifact = source.load()?;
            let summary = artifact.summary(&source);
            println!("{}", serde_json::to_string_pretty(&summary)?);
        }
        ModelAction::Export => {
            print!("{BUNDLED_ARTIFACT}");
        }
    }
    Ok(())
}
