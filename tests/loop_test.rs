use std::thread;

use serde_json::{json, Value};
use texttemplate::error::ProcessingError;
use texttemplate::executor::execute;
use texttemplate::{ExecutionConfig, TextTemplate};

const PREFIX: &str = "prefix ";
const SUFFIX: &str = "suffix ";

fn render(template: &str, model: &Value) -> Result<String, ProcessingError> {
    parse(template).build_document(model)
}

fn parse(template: &str) -> TextTemplate {
    TextTemplate::parse(template).unwrap()
}

fn tree_model() -> Value {
    json!({
        "Name": "root",
        "Children": [
            {
                "Name": "Child1",
                "Children": [{ "Name": "Child11" }, { "Name": "Child12" }, { "Name": "Child13" }]
            },
            { "Name": "Child2", "Children": [] },
            { "Name": "Child3", "Children": [{ "Name": "Child31" }, { "Name": "Child32" }] }
        ]
    })
}

#[test]
fn test_loop_over_values() {
    let model = json!({ "Name": "root", "Children": ["1", "2", "3"] });
    let template = format!(
        "{PREFIX}[[ Name ]] [[ Children.length]] {}{SUFFIX}",
        "[[ for(Children) ]]Child[[Children]] [[ endfor(Children) ]]"
    );
    let actual = render(&template, &model).unwrap();
    let expected = format!("{PREFIX}root 3 Child1 Child2 Child3 {SUFFIX}");
    assert_eq!(actual, expected);
}

#[test]
fn test_nested_loops() {
    let template = format!(
        "{PREFIX}{}{SUFFIX}",
        concat!(
            "[[ for(Children) ]][[\tfor(Children.Children) ]]",
            "[[\t\tChildren.Children.Name ]]",
            "[[\tendfor(Children.Children) ]][[ endfor(Children) ]]"
        )
    );
    let actual = render(&template, &tree_model()).unwrap();
    let expected = format!("{PREFIX}Child11Child12Child13Child31Child32{SUFFIX}");
    assert_eq!(actual, expected);
}

#[test]
fn test_mixed_level_fields_in_nested_loops() {
    let template = concat!(
        "[[for(Children) ]][[\tfor(Children.Children) ]]",
        " | [[\t\tName]] -> [[Children.Name]] -> [[Children.Children.Name]]",
        "[[\tendfor(Children.Children) ]][[endfor(Children) ]]"
    );
    let actual = render(template, &tree_model()).unwrap();
    assert_eq!(
        actual,
        concat!(
            " | root -> Child1 -> Child11",
            " | root -> Child1 -> Child12",
            " | root -> Child1 -> Child13",
            " | root -> Child3 -> Child31",
            " | root -> Child3 -> Child32",
        )
    );
}

#[test]
fn test_similar_prefix_is_not_a_loop_path() {
    let model = json!({ "Items": [{ "V": 1 }, { "V": 2 }], "ItemsCount": 2 });
    let template = "[[for(Items)]][[Items.V]]/[[ItemsCount]] [[endfor(Items)]]";
    assert_eq!(render(template, &model).unwrap(), "1/2 2/2 ");
}

#[test]
fn test_condition_on_loop_item() {
    let model = json!({
        "Items": [{ "On": true, "N": "a" }, { "On": false, "N": "b" }, { "On": null, "N": "c" }]
    });
    let template = "[[for(Items)]][[if(Items.On)]][[Items.N]][[endif(Items.On)]][[endfor(Items)]]";
    assert_eq!(render(template, &model).unwrap(), "a");
}

#[test]
fn test_null_or_empty_collection_renders_nothing() {
    let template = "[[for(Items)]]x[[endfor(Items)]]";
    assert_eq!(render(template, &json!({ "Items": null })).unwrap(), "");
    assert_eq!(render(template, &json!({ "Items": [] })).unwrap(), "");
}

#[test]
fn test_loop_over_self() {
    let template = "[[for(this)]][[this]][[endfor(this)]]";
    assert_eq!(render(template, &json!(["1", "2", "3"])).unwrap(), "123");
    assert_eq!(render(template, &json!("123")).unwrap(), "123");
}

#[test]
fn test_loop_over_object_entries() {
    let model = json!({ "Prices": { "apple": 1, "pear": 2 } });
    let template = "[[for(Prices)]][[Prices.key]]=[[Prices.value]];[[endfor(Prices)]]";
    assert_eq!(render(template, &model).unwrap(), "apple=1;pear=2;");
}

#[test]
fn test_non_iterable_fails() {
    let model = json!({ "Total": 12.5 });
    let template = "[[for(Total)]]x[[endfor(Total)]]";
    match render(template, &model).unwrap_err() {
        ProcessingError::NotIterable { path, found } => {
            assert_eq!(path, "Total");
            assert_eq!(found, "number");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_error_inside_loop_aborts_document() {
    let model = json!({ "Items": [{ "Name": "a" }, {}] });
    let template = "[[for(Items)]][[Items.Name]][[endfor(Items)]]";
    match render(template, &model).unwrap_err() {
        ProcessingError::ValueExtraction { path, .. } => assert_eq!(path, "Items.Name"),
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_large_collection_does_not_deepen_recursion() {
    let items: Vec<Value> = (0..20_000).map(|i| json!({ "N": i })).collect();
    let model = json!({ "Items": items });
    let actual = render("[[for(Items)]].[[endfor(Items)]]", &model).unwrap();
    assert_eq!(actual.len(), 20_000);
}

#[test]
fn test_concurrent_execution_of_one_template() {
    let template = parse("[[for(Items)]][[Items]][[endfor(Items)]]");
    thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|n| {
                let template = &template;
                scope.spawn(move || {
                    let model = json!({ "Items": [n, n, n] });
                    template.build_document(&model).unwrap()
                })
            })
            .collect();
        for (n, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap(), format!("{n}{n}{n}"));
        }
    });
}

#[test]
fn test_one_config_shared_by_concurrent_executions() {
    let template = parse("[[for(Items)]][[Items:F1]];[[endfor(Items)]]");
    let config = ExecutionConfig::default();
    let (template, config) = (&template, &config);
    thread::scope(|scope| {
        let handles: Vec<_> = (0..4)
            .map(|n| {
                scope.spawn(move || {
                    let model = json!({ "Items": [n, n] });
                    execute(template, &model, config).unwrap()
                })
            })
            .collect();
        for (n, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap(), format!("{n}.0;{n}.0;"));
        }
    });
}
