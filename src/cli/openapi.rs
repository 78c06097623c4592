//! OpenAPI export command.

use clap::Args;
use std::fs;
use std::path::PathBuf;
use utoipa::OpenApi;

use webvirt::ApiDoc;

/// Export OpenAPI specification.
#[derive(Args, Debug)]
pub struct OpenapiCmd {
    /// Output file path (defaults to stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format.
    #[arg(short, long, default_value = "json")]
    format: OutputFormat,
}

#[derive(Debug, Clone, Copy, Default, clap::ValueEnum)]
enum OutputFormat {
    /// JSON format (OpenAPI 3.1)
    #[default]
    Json,
    /// YAML format (OpenAPI 3.1)
    Yaml,
}

impl OpenapiCmd {
    pub fn run(&self) -> webvirt::Result<()> {
        let output = render(self.format)?;

        match &self.output {
            Some(path) => {
                fs::write(path, &output)?;
                eprintln!("OpenAPI spec written to {}", path.display());
            }
            None => {
                println!("{}", output);
            }
        }

        Ok(())
    }
}

fn render(format: OutputFormat) -> webvirt::Result<String> {
    let spec = ApiDoc::openapi();
    match format {
        OutputFormat::Json => spec
            .to_pretty_json()
            .map_err(|e| webvirt::Error::config(format!("serialize openapi to json: {}", e))),
        OutputFormat::Yaml => serde_yaml::to_string(&spec)
            .map_err(|e| webvirt::Error::config(format!("serialize openapi to yaml: {}", e))),
    }
}
