mod common;

use common::fixtures::{CATALOG, ORDERS};
use common::{TestResult, html, json, kept, run, strings};
use quarry::{Execution, Query, StaticScriptEngine, Value, load_document};
use serde_json::json;

#[test]
fn test_regexp_extracts_first_match() -> TestResult {
    let root = html(CATALOG)?;
    assert_eq!(run(r"span.price@text?regexp=/\d+/", &root)?, Value::from("4"));
    assert_eq!(run(r"h1@text?regexp=/\d+/", &root)?, Value::Null);
    Ok(())
}

#[test]
fn test_regexp_replacement_runs_per_element() -> TestResult {
    let root = html(CATALOG)?;
    assert_eq!(
        run(r"*span.price@text?transform=regexp:/(\d+)\.(\d+)/$1,$2/", &root)?,
        strings(&["4,50", "3,00", "2,75"])
    );
    Ok(())
}

#[test]
fn test_regexp_expands_page_url() -> TestResult {
    let root = html(CATALOG)?;
    assert_eq!(
        run("a.next@href?transform=regexp:/^/${pageUrl}/", &root)?,
        Value::from("https://shop.example.com/catalog/page-1?page=2")
    );
    Ok(())
}

#[test]
fn test_page_url_with_dollar_sign_is_inserted_verbatim() -> TestResult {
    let root = load_document(r#"<a href="x">link</a>"#, false, "https://ex.com/a$1b")?;
    assert_eq!(
        run("a@href?transform=regexp:/(x)/$1@${pageUrl}/", &root)?,
        Value::from("x@https://ex.com/a$1b")
    );
    Ok(())
}

#[test]
fn test_transform_chain_with_semicolons() -> TestResult {
    let root = html(CATALOG)?;
    assert_eq!(
        run(r"h1@text?transform=regexp:/\s+/;/;upper", &root)?,
        Value::from("SPRING;CATALOG")
    );
    Ok(())
}

#[test]
fn test_json_directive_parses_text() -> TestResult {
    let root = html(CATALOG)?;
    assert_eq!(
        run("script:not([id])@text?transform=json:config >> json:currency", &root)?,
        Value::from("EUR")
    );
    assert_eq!(
        run("script:not([id])@text?transform=json:page*", &root)?,
        Value::from(20i64)
    );
    assert_eq!(
        run("#state@text?transform=json >> json:tags/0", &root)?,
        Value::from("new")
    );
    Ok(())
}

#[test]
fn test_filter_tokens() -> TestResult {
    let root = html(CATALOG)?;
    assert_eq!(run("*li.item/a@text?filter=Apple !Cider", &root)?, Value::from("Apple Pie"));
    assert_eq!(
        run(r"*li.item/a@text?filter=Banana\ Bread", &root)?,
        Value::from("Banana Bread")
    );

    let root = Value::from(json!({"items": ["salt&pepper", "salt"]}));
    assert_eq!(run("json:items?filter=salt&pepper", &root)?, Value::from("salt&pepper"));
    Ok(())
}

#[test]
fn test_update_merges_maps() -> TestResult {
    let root = json(ORDERS)?;
    assert_eq!(
        run(r#"json:customer?update={"tier": "platinum", "since": 2020}"#, &root)?,
        Value::from(json!({"name": "Ada", "tier": "platinum", "since": 2020}))
    );
    assert_eq!(
        run(r#"json:customer/name?update={"x": 1}"#, &root)?,
        Value::from("Ada")
    );
    Ok(())
}

#[test]
fn test_phase_order_is_fixed() -> TestResult {
    let root = json(ORDERS)?;
    // Written index-first, still filtered and upper-cased before indexing.
    assert_eq!(
        run("json:items?index=0&filter=CIDER&transform=upper", &root)?,
        Value::from("APPLE CIDER")
    );
    Ok(())
}

#[test]
fn test_null_skips_phases_but_not_discard() -> TestResult {
    let root = json(ORDERS)?;
    assert_eq!(
        kept("json:missing?transform=upper&save=x&keep ++ template:[${x}]", &root)?,
        vec![Value::from("[]")]
    );
    assert_eq!(run("json:items?index=7", &root)?, Value::Null);
    assert_eq!(run("json:items?index=first", &root)?, Value::Null);
    Ok(())
}

#[test]
fn test_jseval_uses_injected_engine() -> TestResult {
    let root = html(CATALOG)?;
    let mut engine = StaticScriptEngine::new()
        .with_binding("pageSize", json!(20))
        .with_binding("pageCount", json!(3))
        .with_binding("config", json!({"currency": "EUR"}));
    let query = Query::compile("script:not([id])@text?transform=jseval:page*")?;

    let result = Execution::new(&query)
        .with_script_engine(&mut engine)
        .run(&root);
    assert_eq!(
        result.simplified(),
        Value::from(json!({"pageCount": 3, "pageSize": 20}))
    );

    let result = Execution::new(&query)
        .with_script_engine(&mut engine)
        .run(&root);
    assert!(!result.is_empty());
    assert_eq!(engine.resets(), 2);
    Ok(())
}

#[test]
fn test_jseval_without_engine_is_null() -> TestResult {
    let root = html(CATALOG)?;
    assert_eq!(run("script:not([id])@text?transform=jseval", &root)?, Value::Null);
    Ok(())
}
