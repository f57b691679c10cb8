mod common;

use common::fixtures::{CATALOG, ORDERS};
use common::{TestResult, html, json, kept, run, strings};
use quarry::{Execution, ExecutionConfig, Query, Value};
use serde_json::json;

#[test]
fn test_html_text_is_upper_cased() -> TestResult {
    let root = html("<div>hello</div>")?;
    assert_eq!(run("div/@text?transform=upper", &root)?, Value::from("HELLO"));
    Ok(())
}

#[test]
fn test_json_path_indexes_arrays() -> TestResult {
    let root = json(r#"{"a":{"b":[1,2,3]}}"#)?;
    assert_eq!(run("json:a/b/1", &root)?, Value::from(2i64));
    Ok(())
}

#[test]
fn test_saved_value_feeds_template() -> TestResult {
    let root = json(r#"{"a":"Z"}"#)?;
    assert_eq!(
        kept("json:a?save=x&keep ++ template:value-${x}", &root)?,
        vec![Value::from("Z"), Value::from("value-Z")]
    );
    Ok(())
}

#[test]
fn test_filter_then_index() -> TestResult {
    let root = json(ORDERS)?;
    assert_eq!(
        run("json:items?filter=apple", &root)?,
        strings(&["apple pie", "apple cider"])
    );
    assert_eq!(
        run("json:items?filter=apple&index=-1", &root)?,
        Value::from("apple cider")
    );
    Ok(())
}

#[test]
fn test_append_runs_every_part() -> TestResult {
    let root = html(CATALOG)?;
    assert_eq!(
        run("h1@text ++ title@text ++ h6@text", &root)?,
        strings(&["Spring Catalog", "Catalog"])
    );
    Ok(())
}

#[test]
fn test_fallback_chain() -> TestResult {
    let root = html(CATALOG)?;
    assert_eq!(run("h3@text || h4@text || h1@text", &root)?, Value::from("Spring Catalog"));
    assert_eq!(run("h1@text || title@text", &root)?, Value::from("Spring Catalog"));
    assert_eq!(
        run("h1@text?required=false || title@text", &root)?,
        Value::from("Spring Catalog")
    );
    assert_eq!(
        run("h1@text?required=true || title@text", &root)?,
        strings(&["Spring Catalog", "Catalog"])
    );
    Ok(())
}

#[test]
fn test_fallback_sees_discarded_entries() -> TestResult {
    let root = json(ORDERS)?;
    // The saved name counts as a result, so the fallback does not run.
    assert_eq!(
        kept("json:customer/name?save=n || json:customer/tier", &root)?,
        vec![Value::from("Ada")]
    );
    Ok(())
}

#[test]
fn test_pipe_narrows_previous_output() -> TestResult {
    let root = html(CATALOG)?;
    assert_eq!(
        run("*li.item/a@text >> json:1", &root)?,
        Value::from("Banana Bread")
    );
    assert_eq!(run("json:orders >> json:-1/id", &json(ORDERS)?)?, Value::from("B-2"));
    Ok(())
}

#[test]
fn test_array_pipe_evaluates_each_element() -> TestResult {
    let root = html(CATALOG)?;
    assert_eq!(
        run("*li.item >>> a@text?transform=upper", &root)?,
        strings(&["APPLE PIE", "BANANA BREAD", "APPLE CIDER"])
    );
    assert_eq!(
        run("json:orders >>> json:lines/0/sku", &json(ORDERS)?)?,
        strings(&["x1", "y1"])
    );
    Ok(())
}

#[test]
fn test_pipe_keeps_earlier_contributions() -> TestResult {
    let root = json(ORDERS)?;
    assert_eq!(
        kept("json:customer/name ++ json:orders >>> json:id", &root)?,
        vec![Value::from("Ada"), Value::from("A-1"), Value::from("B-2")]
    );
    Ok(())
}

#[test]
fn test_views_over_one_result() -> TestResult {
    let root = json(ORDERS)?;
    let query = Query::compile("json:customer/tier?save=t ++ json:orders/id")?;
    let result = Execution::new(&query)
        .with_config(ExecutionConfig::default().with_join_separator(" | "))
        .run(&root);
    assert_eq!(result.simplified(), strings(&["A-1", "B-2"]));
    assert_eq!(
        result.kept(),
        vec![Value::from("gold"), Value::from("A-1"), Value::from("B-2")]
    );
    assert_eq!(result.joined(), "A-1 | B-2");
    assert_eq!(result.bindings().get("t"), Some(&Value::from("gold")));
    Ok(())
}

#[test]
fn test_value_and_collection_entry_points() -> TestResult {
    let root = Value::from(json!({"tags": ["a", "b"]}));
    let query = Query::compile("json:tags")?;
    assert_eq!(query.value(&root), "a\nb");
    assert_eq!(query.collection_value(&root), vec![Value::from("a"), Value::from("b")]);
    assert_eq!(Query::compile("json:none")?.execute(&root), Value::Null);
    Ok(())
}

#[test]
fn test_query_parses_from_str() -> TestResult {
    let query: Query = "json:a ++ json:b".parse()?;
    assert_eq!(query.parts().count(), 2);
    assert_eq!(query.to_string(), "json:a ++ json:b");
    Ok(())
}
