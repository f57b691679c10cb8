//! Query compile and execution benchmarks
//!
//! Measures:
//! - Compiling queries of increasing chain length
//! - Executing HTML selectors over listings of 10, 100 and 1000 items
//! - Executing JSON paths and pipes over arrays of the same sizes
//!
//! Run benchmarks: `cargo bench --bench query_throughput`

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use quarry::{Query, Value, load_document};
use serde_json::json;
use std::hint::black_box;

const PAGE_URL: &str = "https://shop.example.com/catalog";

/// Generate a product listing with `count` items
fn listing_markup(count: usize) -> String {
    let items: String = (0..count)
        .map(|i| {
            format!(
                r#"<li class="item"><a href="/p/{i}">Product {i}</a><span class="price">{i}.50</span></li>"#
            )
        })
        .collect();
    format!(
        r#"<html><head><title>Catalog</title></head><body><ul id="products">{items}</ul></body></html>"#
    )
}

/// Generate a JSON order feed with `count` orders
fn order_feed(count: usize) -> String {
    let orders: Vec<_> = (0..count)
        .map(|i| json!({"id": format!("O-{}", i), "total": i * 10, "lines": [{"sku": i}]}))
        .collect();
    json!({"customer": {"name": "Ada"}, "orders": orders}).to_string()
}

fn benchmark_compile(c: &mut Criterion) {
    let mut group = c.benchmark_group("compile");

    for links in [1, 4, 16] {
        let query = (0..links)
            .map(|i| format!("*li.item/a@href::^/${{rootUrl}}?transform=regexp:/{}/x/;upper&save=v{}", i, i))
            .collect::<Vec<_>>()
            .join(" ++ ");

        group.bench_with_input(BenchmarkId::new("links", links), &query, |b, query| {
            b.iter(|| Query::compile(black_box(query)).expect("query compiles"));
        });
    }

    group.finish();
}

fn benchmark_html_execution(c: &mut Criterion) {
    let mut group = c.benchmark_group("html_execution");
    let query = Query::compile("*li.item/a@text?filter=Product&transform=upper ++ title@text")
        .expect("query compiles");

    for count in [10, 100, 1000] {
        group.throughput(Throughput::Elements(count as u64));
        let root = load_document(&listing_markup(count), false, PAGE_URL).expect("markup loads");

        group.bench_with_input(BenchmarkId::new("items", count), &root, |b, root| {
            b.iter(|| query.execute(black_box(root)));
        });
    }

    group.finish();
}

fn benchmark_json_execution(c: &mut Criterion) {
    let mut group = c.benchmark_group("json_execution");
    let direct = Query::compile("json:orders/id").expect("query compiles");
    let piped = Query::compile("json:customer/name?save=n ++ json:orders >>> json:lines/0/sku")
        .expect("query compiles");

    for count in [10, 100, 1000] {
        group.throughput(Throughput::Elements(count as u64));
        let root: Value = load_document(&order_feed(count), true, PAGE_URL).expect("feed loads");

        group.bench_with_input(BenchmarkId::new("path", count), &root, |b, root| {
            b.iter(|| direct.execute(black_box(root)));
        });
        group.bench_with_input(BenchmarkId::new("array_pipe", count), &root, |b, root| {
            b.iter(|| piped.execute(black_box(root)));
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    benchmark_compile,
    benchmark_html_execution,
    benchmark_json_execution
);
criterion_main!(benches);
