//! Criterion benchmark for merging font requests and rewriting a page.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gfcombine_core::collection::FontCollection;
use gfcombine_core::config::CombineOptions;
use gfcombine_core::markup::rewrite;

const URLS: [&str; 6] = [
    "//fonts.googleapis.com/css?family=Open+Sans:400italic,700italic,400,700",
    "http://fonts.googleapis.com/css?family=Ubuntu:400,700,400italic,700italic&subset=latin,latin-ext,cyrillic",
    "https://fonts.googleapis.com/css?family=Raleway:400,700&amp;subset=latin,latin-ext",
    "http://fonts.googleapis.com/css?family=Ubuntu:300,700:latin,latin-ext|Roboto:400,700:cyrillic",
    "http://fonts.googleapis.com/css?family=Open+Sans:300|PT+Sans:300,400,700&subset=latin,cyrillic",
    "http://fonts.googleapis.com/css?family=Roboto+Condensed&text=Woot",
];

fn sample_page() -> String {
    let links: String = URLS
        .iter()
        .map(|url| format!("    <link href='{url}' rel='stylesheet' type='text/css'>\n"))
        .collect();
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n{links}</head>\n<body>{}</body>\n</html>",
        "<p>filler</p>".repeat(200)
    )
}

fn bench_combine(c: &mut Criterion) {
    c.bench_function("collection from_urls + combined_url", |b| {
        b.iter(|| {
            let collection = FontCollection::from_urls(black_box(URLS)).unwrap();
            collection.combined_url()
        })
    });

    let page = sample_page();
    let options = CombineOptions::default();
    c.bench_function("markup rewrite", |b| {
        b.iter(|| rewrite(black_box(&page), &options).unwrap())
    });
}

criterion_group!(benches, bench_combine);
criterion_main!(benches);
