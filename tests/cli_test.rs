use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;
use texttemplate::cli::Args;

fn make_args(args: &[&str]) -> Vec<OsString> {
    let mut res = vec![OsString::from("texttemplate")];
    res.extend(args.iter().map(OsString::from));
    res
}

#[test]
fn test_basic_args() {
    let args = make_args(&["./letter.tpl"]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert_eq!(parsed.template, PathBuf::from("./letter.tpl"));
    assert_eq!(parsed.model, None);
    assert_eq!(parsed.pattern, "*.tpl");
    assert_eq!(parsed.discover, None);
    assert!(!parsed.force);
    assert!(!parsed.verbose);
    assert!(!parsed.stdin);
}

#[test]
fn test_all_flags() {
    let args = make_args(&[
        "--model",
        "model.json",
        "--syntax",
        "syntax.yaml",
        "--subtemplates",
        "partials",
        "--pattern",
        "**/*.txt",
        "--output",
        "out.txt",
        "--force",
        "--verbose",
        "--discover",
        "2",
        "./letter.tpl",
    ]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert_eq!(parsed.model, Some(PathBuf::from("model.json")));
    assert_eq!(parsed.syntax, Some(PathBuf::from("syntax.yaml")));
    assert_eq!(parsed.subtemplates, Some(PathBuf::from("partials")));
    assert_eq!(parsed.pattern, "**/*.txt");
    assert_eq!(parsed.output, Some(PathBuf::from("out.txt")));
    assert_eq!(parsed.discover, Some(2));
    assert!(parsed.force);
    assert!(parsed.verbose);
}

#[test]
fn test_short_flags() {
    let args = make_args(&[
        "-m",
        "model.yaml",
        "-o",
        "out.txt",
        "-f",
        "-v",
        "./letter.tpl",
    ]);
    let parsed = Args::try_parse_from(args).unwrap();

    assert_eq!(parsed.model, Some(PathBuf::from("model.yaml")));
    assert_eq!(parsed.output, Some(PathBuf::from("out.txt")));
    assert!(parsed.force);
    assert!(parsed.verbose);
}

#[test]
fn test_model_and_stdin_conflict() {
    let args = make_args(&["--model", "model.json", "--stdin", "./letter.tpl"]);
    assert!(Args::try_parse_from(args).is_err());
}

#[test]
fn test_discover_requires_number() {
    let args = make_args(&["--discover", "deep", "./letter.tpl"]);
    assert!(Args::try_parse_from(args).is_err());
}

#[test]
fn test_missing_args() {
    let args = make_args(&[]);
    assert!(Args::try_parse_from(args).is_err());
}

#[test]
fn test_too_many_args() {
    let args = make_args(&["./letter.tpl", "extra"]);
    assert!(Args::try_parse_from(args).is_err());
}
