use gfcombine_core::collection::FontCollection;
use gfcombine_core::output::{write_json_pretty, write_ndjson, CollectionSummary};

#[test]
fn writes_ndjson_one_object_per_line() {
    let summaries = sample_summaries();
    let mut buf = Vec::new();

    write_ndjson(&summaries, &mut buf).expect("write");
    let text = String::from_utf8(buf).expect("utf8");
    let lines: Vec<&str> = text.trim_end().split('\n').collect();

    assert_eq!(lines.len(), 2);
    for line in lines {
        serde_json::from_str::<serde_json::Value>(line).expect("valid json line");
    }
}

#[test]
fn writes_pretty_json_array() {
    let summaries = sample_summaries();
    let mut buf = Vec::new();

    write_json_pretty(&summaries, &mut buf).expect("write");
    let text = String::from_utf8(buf).expect("utf8");

    let parsed: serde_json::Value = serde_json::from_str(&text).expect("json array");
    assert!(parsed.is_array());
    assert_eq!(parsed.as_array().unwrap().len(), 2);
    assert_eq!(parsed[1]["combined_url"], serde_json::Value::Null);
    assert_eq!(
        parsed[1]["text_urls"][0],
        "https://fonts.googleapis.com/css?family=Inconsolata&text=Hello"
    );
}

fn sample_summaries() -> Vec<CollectionSummary> {
    let page_a = FontCollection::from_urls([
        "//fonts.googleapis.com/css?family=Lato:400,700",
        "//fonts.googleapis.com/css?family=Abel&subset=latin",
    ])
    .unwrap();
    let page_b = FontCollection::from_urls([
        "https://fonts.googleapis.com/css?family=Inconsolata&text=Hello",
    ])
    .unwrap();

    vec![
        CollectionSummary::from(&page_a),
        CollectionSummary::from(&page_b),
    ]
}
