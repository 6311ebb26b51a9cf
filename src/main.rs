//! texttemplate's command-line entry point.
//! Loads the template, its subtemplates and the model, then writes the
//! rendered document.

use std::io::{self, Read};
use std::path::{Path, PathBuf};

use serde_json::Value;
use texttemplate::{
    cli::{get_args, Args},
    config::{load_model, load_syntax, parse_config},
    error::{default_error_handler, Error, Result},
    loader::{load_subtemplates, load_template},
    logger::init_logger,
    renderer::TemplateEngine,
    settings::SyntaxSettings,
};

/// Main application entry point.
fn main() {
    let args = get_args();
    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Ensures the output file is safe to write to.
///
/// # Errors
/// * Returns `Error::ConfigError` if the file exists and force is false
fn get_output_file<P: AsRef<Path>>(output: P, force: bool) -> Result<PathBuf> {
    let output = output.as_ref();
    if output.exists() && !force {
        return Err(Error::ConfigError(format!(
            "output file '{}' already exists, use --force to overwrite",
            output.display()
        )));
    }
    Ok(output.to_path_buf())
}

fn write_file<P: AsRef<Path>>(content: &str, dest_path: P) -> Result<()> {
    let dest_path = dest_path.as_ref();
    match dest_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent).map_err(Error::IoError)?;
        }
        _ => {}
    }
    std::fs::write(dest_path, content).map_err(Error::IoError)
}

fn read_model(args: &Args) -> Result<Value> {
    if args.stdin {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .map_err(Error::IoError)?;
        return parse_config(&buf);
    }
    match &args.model {
        Some(path) => load_model(path),
        None => Ok(Value::Object(Default::default())),
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. Loads syntax settings and the model
/// 2. With `--discover`, prints the model's value paths and stops
/// 3. Loads subtemplates and the template
/// 4. Renders and writes the document
fn run(args: Args) -> Result<()> {
    let syntax = match &args.syntax {
        Some(path) => load_syntax(path)?,
        None => SyntaxSettings::default(),
    };
    let model = read_model(&args)?;
    let mut engine = TemplateEngine::new().with_syntax(syntax);

    if let Some(depth) = args.discover {
        for path in engine.discover_value_paths(&model, depth)? {
            println!("{path}");
        }
        return Ok(());
    }

    let output = args
        .output
        .as_ref()
        .map(|path| get_output_file(path, args.force))
        .transpose()?;

    if let Some(dir) = &args.subtemplates {
        let subtemplates = load_subtemplates(dir, &args.pattern, engine.syntax())?;
        engine.register_templates(subtemplates)?;
    }

    let template = load_template(&args.template, engine.syntax())?;
    let template = engine.attach_subtemplates(template)?;
    let document = engine.process_template(&template, &model)?;

    match output {
        Some(path) => {
            write_file(&document, &path)?;
            log::info!("Document written to '{}'", path.display());
        }
        None => print!("{document}"),
    }
    Ok(())
}
