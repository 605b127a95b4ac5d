use std::path::{Path, PathBuf};

use clap::Subcommand;
use stayflow_optimizer::rules::weight_document::generate_json_schema;
use tracing::info;

#[derive(Subcommand)]
pub enum GenerateSubcommands {
    /// Write the JSON schema of weight documents, for editor validation of
    /// `spec` rule files
    JsonSchema {
        /// Schema file to create; missing parent folders are created
        #[arg(long, short = 'o')]
        out: PathBuf,
    },
}

fn write_weight_schema(out: &Path) -> Result<(), anyhow::Error> {
    let schema = generate_json_schema()?;

    if let Some(parent) = out.parent().filter(|parent| !parent.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    std::fs::write(out, schema)?;
    info!("Weight document schema written to {:?}", out);

    Ok(())
}

pub fn run(subcommand: GenerateSubcommands) -> Result<(), anyhow::Error> {
    match subcommand {
        GenerateSubcommands::JsonSchema { out } => write_weight_schema(&out),
    }
}
