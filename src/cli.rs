//! Command-line interface implementation for texttemplate.
//! Provides argument parsing and help text formatting using clap.

use clap::{error::ErrorKind, CommandFactory, Parser};
use std::path::PathBuf;

use crate::constants::DEFAULT_SUBTEMPLATE_PATTERN;

/// Command-line arguments structure for texttemplate.
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "texttemplate: render bracket-tag templates against JSON or YAML models",
    long_about = None
)]
pub struct Args {
    /// Path to the template file
    #[arg(value_name = "TEMPLATE")]
    pub template: PathBuf,

    /// JSON or YAML file holding the model
    #[arg(short, long, value_name = "FILE", conflicts_with = "stdin")]
    pub model: Option<PathBuf>,

    /// Read the model from stdin
    #[arg(short, long)]
    pub stdin: bool,

    /// JSON or YAML file overriding tags and keywords
    #[arg(long, value_name = "FILE")]
    pub syntax: Option<PathBuf>,

    /// Directory of subtemplates available to `template(name, path)`
    #[arg(long, value_name = "DIR")]
    pub subtemplates: Option<PathBuf>,

    /// Glob selecting subtemplate files inside the subtemplate directory
    #[arg(long, value_name = "GLOB", default_value = DEFAULT_SUBTEMPLATE_PATTERN)]
    pub pattern: String,

    /// File to write the document to instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Force overwrite of an existing output file
    #[arg(short, long)]
    pub force: bool,

    /// Print the value paths of the model up to DEPTH instead of rendering
    #[arg(long, value_name = "DEPTH")]
    pub discover: Option<usize>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 if required arguments are missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            if e.kind() == ErrorKind::MissingRequiredArgument {
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            } else {
                e.exit();
            }
        }
    }
}
