use crate::config::FacadeConfig;
use crate::utils::error::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "model-facade")]
#[command(about = "Drive a remote modeling server from the command line")]
pub struct CliArgs {
    /// Base URL of the modeling server
    #[arg(long)]
    pub server_url: Option<String>,

    /// TOML file with server_url, driver_pattern and [headers]
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub driver_pattern: Option<String>,

    /// Extra request header, NAME=VALUE; may be repeated
    #[arg(long = "header", value_parser = parse_header)]
    pub headers: Vec<(String, String)>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List the object types that can be created
    Types,
    /// Show the structure of an assembly (top level by default)
    Structure { pathname: Option<String> },
    /// Show the workflow of a driver
    Workflow { pathname: String },
    /// List all components
    Components,
    /// Show one component's attributes
    Component { name: String },
    /// Show connections between two components
    Connections {
        pathname: String,
        src_name: String,
        dst_name: String,
    },
    /// Replace the connections between two components
    Connect {
        pathname: String,
        src_name: String,
        dst_name: String,
        /// SOURCE:DESTINATION variable pair; may be repeated
        #[arg(long = "pair", value_parser = parse_pair)]
        pairs: Vec<(String, String)>,
    },
    /// Add a component to the model
    Add {
        typepath: String,
        name: String,
        #[arg(long)]
        parent: Option<String>,
    },
    /// Start over with an empty model
    NewModel,
    /// Save the current project
    Save,
    /// List files in the model working directory
    Files,
    /// Print a file's contents
    Cat { path: String },
    /// Replace a file's contents
    Write { path: String, contents: String },
    /// Create a folder
    Mkdir { path: String },
    /// Delete a file
    Rm { path: String },
    /// Create a file with starter content
    NewFile {
        folder: Option<String>,
        /// Name to use instead of prompting
        #[arg(long)]
        name: Option<String>,
    },
    /// Create a folder, prompting for its name
    NewFolder {
        folder: Option<String>,
        #[arg(long)]
        name: Option<String>,
    },
    /// Import a python file into the model
    Import { path: String },
    /// Run a command in the model interpreter
    Command { command: String },
    /// Print queued model output
    Output,
    /// Run the model
    Run,
    /// Execute a script from the working directory
    Exec { path: String },
    /// Open the upload window
    Upload,
    /// Shut the model down
    Exit,
}

impl CliArgs {
    /// Config file values overridden by command line flags.
    pub fn resolve_config(&self) -> Result<FacadeConfig> {
        let mut config = match &self.config {
            Some(path) => FacadeConfig::from_file(path)?,
            None => FacadeConfig::default(),
        };

        if let Some(server_url) = &self.server_url {
            config.server_url = server_url.clone();
        }
        if let Some(pattern) = &self.driver_pattern {
            config.driver_pattern = pattern.clone();
        }
        for (name, value) in &self.headers {
            config.headers.insert(name.clone(), value.clone());
        }

        Ok(config)
    }
}

fn parse_header(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once('=') {
        Some((name, value)) if !name.trim().is_empty() => {
            Ok((name.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected NAME=VALUE, got '{}'", raw)),
    }
}

fn parse_pair(raw: &str) -> std::result::Result<(String, String), String> {
    match raw.split_once(':') {
        Some((source, destination)) if !source.is_empty() && !destination.is_empty() => {
            Ok((source.to_string(), destination.to_string()))
        }
        _ => Err(format!("expected SOURCE:DESTINATION, got '{}'", raw)),
    }
}
