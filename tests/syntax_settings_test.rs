use serde_json::json;
use texttemplate::ast::CommandType;
use texttemplate::error::Error;
use texttemplate::{SyntaxSettings, SyntaxSettingsBuilder, TextTemplate};

const PREFIX: &str = "Some document prefix";
const SUFFIX: &str = "Some suffix";
const EXPECTED: &str = "EXPECTED";

fn estonian_syntax() -> SyntaxSettings {
    SyntaxSettings::builder()
        .tags("<b>", "</b>")
        .conditional_keywords("kui", "muidu", "/kui")
        .loop_keywords("tsükkel", "/tsükkel")
        .build()
        .unwrap()
}

#[test]
fn test_changed_syntax() {
    let condition = format!("<b>kui(ABoolean)</b>{EXPECTED}<b>/kui(ABoolean)</b>");
    let rest = "<b>AField</b><b>tsükkel(Items)</b>X<b>/tsükkel(Items)</b>";
    let template = format!("{PREFIX}{condition}{rest}{SUFFIX}");
    let model = json!({ "ABoolean": true, "AField": "F", "Items": [1, 2, 3] });

    let settings = estonian_syntax();
    let parsed = TextTemplate::parse_with(template, &settings).unwrap();
    let actual = parsed.build_document(&model).unwrap();
    assert_eq!(actual, format!("{PREFIX}{EXPECTED}FXXX{SUFFIX}"));
}

#[test]
fn test_changed_syntax_ignores_default_tags() {
    let parsed = TextTemplate::parse_with("[[if(A)]]<b>muidu(A)</b>", &estonian_syntax());
    assert!(matches!(
        parsed,
        Err(texttemplate::SyntaxError::UnexpectedScopeBoundary { .. })
    ));
}

#[test]
fn test_keyword_lookup() {
    let settings = estonian_syntax();
    assert_eq!(settings.command_type("kui"), Some(CommandType::If));
    let loop_end = settings.command_type("/tsükkel");
    assert_eq!(loop_end, Some(CommandType::LoopEnd));
    assert_eq!(settings.command_type("if"), None);
    assert_eq!(settings.keyword(CommandType::IfElse), Some("muidu"));
    assert_eq!(settings.keyword(CommandType::Copy), None);
}

#[test]
fn test_invalid_combinations_are_rejected() {
    let builder = SyntaxSettings::builder;
    let invalid: Vec<SyntaxSettingsBuilder> = vec![
        builder().tags("##", "##"),
        builder().tags("<", "<<"),
        builder().tags("", "]]"),
        builder().loop_keywords("if", "endfor"),
        builder().conditional_keywords("if", "else", "a]]"),
        builder().template_keyword(" "),
        builder().self_keyword("for"),
        builder().end_keyword("endif"),
    ];
    for settings in invalid {
        let description = format!("{settings:?}");
        match settings.build() {
            Err(Error::InvalidSettings(_)) => {}
            other => panic!("expected invalid settings for {description}, got {other:?}"),
        }
    }
}

#[test]
fn test_deserialize_partial_settings() {
    let json = r#"{ "begin_tag": "{{", "end_tag": "}}", "self_keyword": "it" }"#;
    let settings: SyntaxSettings = serde_json::from_str(json).unwrap();
    assert_eq!(settings.begin_tag(), "{{");
    assert_eq!(settings.end_tag(), "}}");
    assert_eq!(settings.self_keyword(), "it");
    assert_eq!(settings.keyword(CommandType::Loop), Some("for"));
}

#[test]
fn test_deserialize_rejects_invalid_settings() {
    let json = r#"{ "begin_tag": "%", "end_tag": "%" }"#;
    let result = serde_json::from_str::<SyntaxSettings>(json);
    let message = result.unwrap_err().to_string();
    assert!(message.contains("Invalid syntax settings"), "{message}");
}

#[test]
fn test_serialized_settings_load_back() {
    let settings = estonian_syntax();
    let yaml = serde_yaml::to_string(&settings).unwrap();
    let loaded: SyntaxSettings = serde_yaml::from_str(&yaml).unwrap();
    assert_eq!(loaded, settings);
}
