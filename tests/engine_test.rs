use std::borrow::Cow;
use std::thread;

use serde_json::{json, Value};
use texttemplate::error::Error;
use texttemplate::extractor::{ExtractError, ValueExtractor};
use texttemplate::{ExecutionConfig, SyntaxSettings, TemplateEngine, TemplateRenderer};

#[test_log::test]
fn test_render_through_trait_object() {
    let engine = TemplateEngine::new();
    let renderer: &dyn TemplateRenderer = &engine;
    let context = json!({ "name": "test", "value": 42 });

    let greeting = renderer.render("Hello [[ name ]]!", &context).unwrap();
    assert_eq!(greeting, "Hello test!");
    let value = renderer.render("Value: [[value]]", &context).unwrap();
    assert_eq!(value, "Value: 42");
}

#[test_log::test]
fn test_shared_subtemplates_reach_every_parsed_template() {
    let mut engine = TemplateEngine::new();
    engine
        .register_subtemplate("Header", "== [[Title:upper]] ==")
        .unwrap();

    let model = json!({ "Title": "report" });
    let document = engine.process("[[template(Header, this)]]\nbody", &model);
    assert_eq!(document.unwrap(), "== REPORT ==\nbody");

    let template = engine.parse_template("[[template(Header, this)]]").unwrap();
    assert!(template.subtemplate("Header").is_some());
    let document = engine.process_template(&template, &model).unwrap();
    assert_eq!(document, "== REPORT ==");
}

#[test_log::test]
fn test_shared_engine_across_threads() {
    let mut engine = TemplateEngine::new();
    engine.register_subtemplate("Item", "<[[this]]>").unwrap();
    let source = "[[for(Items)]][[template(Item, Items)]][[endfor(Items)]]";
    let template = engine.parse_template(source).unwrap();
    let (engine, template) = (&engine, &template);

    thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|n| {
                scope.spawn(move || {
                    let model = json!({ "Items": [n, n] });
                    engine.process_template(template, &model).unwrap()
                })
            })
            .collect();
        for (n, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap(), format!("<{n}><{n}>"));
        }
    });
}

#[test]
fn test_register_rejects_duplicates_and_bad_sources() {
    let mut engine = TemplateEngine::new();
    engine.register_subtemplate("Row", "x").unwrap();
    assert!(matches!(
        engine.register_subtemplate("Row", "y"),
        Err(Error::DuplicateSubtemplate { .. })
    ));
    assert!(matches!(
        engine.register_subtemplate("Bad", "]]"),
        Err(Error::Syntax(_))
    ));
    assert_eq!(engine.subtemplates().len(), 1);
}

#[test]
fn test_discover_value_paths_uses_engine_tags() {
    let model = json!({ "N": "n", "Items": [{ "Sku": "a" }] });

    let engine = TemplateEngine::new();
    let paths = engine.discover_value_paths(&model, 2).unwrap();
    let expected = ["[[Items]]", "[[Items.length]]", "[[Items.Sku]]", "[[N]]"];
    assert_eq!(paths, expected);

    let err = engine.discover_value_paths(&model, 0).unwrap_err();
    assert!(matches!(
        err,
        Error::Extraction(ExtractError::InvalidDepth(0))
    ));

    let syntax = SyntaxSettings::builder().tags("${", "}").build().unwrap();
    let engine = TemplateEngine::new().with_syntax(syntax);
    let paths = engine.discover_value_paths(&model, 1).unwrap();
    assert_eq!(paths, ["${Items}", "${Items.length}", "${N}"]);
}

/// Answers every path with the path itself, upper-cased.
struct EchoExtractor;

impl ValueExtractor for EchoExtractor {
    fn extract_value<'m>(
        &self,
        _model: &'m Value,
        path: &str,
    ) -> Result<Cow<'m, Value>, ExtractError> {
        Ok(Cow::Owned(Value::String(path.to_uppercase())))
    }

    fn discover_valid_paths(
        &self,
        _model: &Value,
        _max_depth: usize,
    ) -> Result<Vec<String>, ExtractError> {
        Ok(vec!["anything".to_string()])
    }
}

#[test]
fn test_custom_extractor() {
    let extractor = Box::new(EchoExtractor);
    let config = ExecutionConfig::default().with_extractor(extractor);
    let engine = TemplateEngine::new().with_config(config);

    let document = engine.process("[[a.b]] [[c]]", &json!(null)).unwrap();
    assert_eq!(document, "A.B C");
    let paths = engine.discover_value_paths(&json!(null), 5).unwrap();
    assert_eq!(paths, ["[[anything]]"]);
}
