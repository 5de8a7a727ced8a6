use gfcombine_core::config::{CombineOptions, MarkupType};
use gfcombine_core::markup::{find_candidates, rewrite};

const PAGE: &str = r#"<html>
    <head>
    <link href='//fonts.googleapis.com/css?family=Open+Sans:400italic,700italic,400,700' rel='stylesheet' type='text/css'>
    <link href='http://fonts.googleapis.com/css?family=Ubuntu:400,700,400italic,700italic&subset=latin,latin-ext,cyrillic' rel='stylesheet' type='text/css'>
    <link href='https://fonts.googleapis.com/css?family=Raleway:400,700&amp;subset=latin,latin-ext' rel='stylesheet' type='text/css'>
    <link href='http://fonts.googleapis.com/css?family=Roboto+Condensed&text=Woot' rel='stylesheet' type='text/css'>
</head>
<body>
</body>
</html>"#;

#[test]
fn rewrites_page_with_combined_and_text_links() {
    let expected = r#"<html>
    <head><link rel="stylesheet" type="text/css" href="https://fonts.googleapis.com/css?family=Open+Sans%3A400%2C400italic%2C700%2C700italic%7CRaleway%3A400%2C700%7CUbuntu%3A400%2C400italic%2C700%2C700italic&amp;subset=latin%2Clatin-ext%2Ccyrillic"><link rel="stylesheet" type="text/css" href="https://fonts.googleapis.com/css?family=Roboto+Condensed&amp;text=Woot">
    </head>
<body>
</body>
</html>"#;

    let result = rewrite(PAGE, &CombineOptions::default()).expect("rewrite");

    assert!(result.changed);
    assert_eq!(result.markup, expected);

    let summary = result.summary.expect("summary");
    assert_eq!(summary.links.len(), 4);
    assert_eq!(summary.text_urls.len(), 1);
}

#[test]
fn rewrites_html5_page_without_type_attributes() {
    let input = r#"<!doctype html>
<html amp lang="en">
    <head>
    <meta charset="utf-8">
    <script async src="https://cdn.ampproject.org/v0.js"></script>
    <title>Hello, AMPs</title>
    <link href="https://fonts.googleapis.com/css?family=Tangerine" rel="stylesheet">
    <link href="http://fonts.googleapis.com/css?family=Bitstream+Vera+Serif" rel="stylesheet">
    <link rel="canonical" href="http://example.ampproject.org/article-metadata.html">
    <meta name="viewport" content="width=device-width,minimum-scale=1,initial-scale=1">
    </head>
    <body>
    <h1>Welcome to the mobile web</h1>
    </body>
</html>"#;

    let expected = r#"<!doctype html>
<html amp lang="en">
    <head><link rel="stylesheet" type="text/css" href="https://fonts.googleapis.com/css?family=Bitstream+Vera+Serif%7CTangerine">
    <meta charset="utf-8">
    <script async src="https://cdn.ampproject.org/v0.js"></script>
    <title>Hello, AMPs</title>
    <link rel="canonical" href="http://example.ampproject.org/article-metadata.html">
    <meta name="viewport" content="width=device-width,minimum-scale=1,initial-scale=1">
    </head>
    <body>
    <h1>Welcome to the mobile web</h1>
    </body>
</html>"#;

    let result = rewrite(input, &CombineOptions::default()).expect("rewrite");
    assert_eq!(result.markup, expected);
}

#[test]
fn script_mode_injects_loader_config() {
    let options = CombineOptions::default().with_markup_type(MarkupType::Script);
    let result = rewrite(PAGE, &options).expect("rewrite");

    assert!(result.changed);
    assert!(!result.markup.contains("<link"));
    assert!(result
        .markup
        .starts_with("<html>\n    <head><script type=\"text/javascript\">\nWebFontConfig = {\n"));
    assert!(result.markup.contains(
        "google: { families: [ 'Open Sans:400,400italic,700,700italic', 'Raleway:400,700:latin,latin-ext', 'Ubuntu:400,400italic,700,700italic:latin,latin-ext,cyrillic' ] }"
    ));
    assert!(result.markup.contains("families: [ 'Roboto Condensed' ]"));
    assert!(result.markup.ends_with("</script>\n    </head>\n<body>\n</body>\n</html>"));
}

#[test]
fn fragments_and_feeds_are_not_touched() {
    let options = CombineOptions::default();

    let fragment = "<div><link rel='stylesheet' href='//fonts.googleapis.com/css?family=A'><link rel='stylesheet' href='//fonts.googleapis.com/css?family=B'></div>";
    let result = rewrite(fragment, &options).unwrap();
    assert!(!result.changed);
    assert_eq!(result.markup, fragment);

    let xsl = format!("<html><xsl:stylesheet version=\"1.0\">{fragment}</xsl:stylesheet></html>");
    let result = rewrite(&xsl, &options).unwrap();
    assert!(!result.changed);
    assert_eq!(result.markup, xsl);
}

#[test]
fn threshold_controls_single_candidate_pages() {
    let page = r#"<html><head>
<link href="//fonts.googleapis.com/css?family=Lato:700,400" rel="stylesheet">
</head></html>"#;

    assert_eq!(find_candidates(page).len(), 1);
    assert!(!rewrite(page, &CombineOptions::default()).unwrap().changed);

    let eager = CombineOptions::default().with_min_candidates(1);
    let result = rewrite(page, &eager).unwrap();
    assert!(result.changed);
    assert_eq!(
        result.markup,
        "<html><head><link rel=\"stylesheet\" type=\"text/css\" href=\"https://fonts.googleapis.com/css?family=Lato%3A400%2C700\"></head></html>"
    );
}

#[test]
fn commented_out_requests_do_not_count() {
    let page = r#"<html><head>
<!-- <link rel="stylesheet" href="//fonts.googleapis.com/css?family=Comic+Neue"> -->
<link rel="stylesheet" href="//fonts.googleapis.com/css?family=Lato:400">
</head></html>"#;

    assert_eq!(
        find_candidates(page),
        ["//fonts.googleapis.com/css?family=Lato:400"]
    );

    let result = rewrite(page, &CombineOptions::default()).unwrap();
    assert!(!result.changed);
    assert_eq!(result.markup, page);

    let eager = CombineOptions::default().with_min_candidates(1);
    let result = rewrite(page, &eager).unwrap();
    assert!(result.changed);
    assert!(!result.markup.contains("Comic+Neue%7C"));
    assert!(result.markup.contains(
        "<!-- <link rel=\"stylesheet\" href=\"//fonts.googleapis.com/css?family=Comic+Neue\"> -->"
    ));
    assert!(result.markup.contains("family=Lato%3A400"));
}

#[test]
fn preload_sharing_a_candidate_prefix_survives() {
    let page = r#"<html><head>
<link rel="stylesheet" href="//fonts.googleapis.com/css?family=Lato">
<link rel="stylesheet" href="//fonts.googleapis.com/css?family=Abel">
<link rel="preload" as="style" href="//fonts.googleapis.com/css?family=Lato:700italic">
</head></html>"#;

    let result = rewrite(page, &CombineOptions::default()).unwrap();

    assert!(result.changed);
    assert_eq!(
        result.markup,
        "<html><head><link rel=\"stylesheet\" type=\"text/css\" href=\"https://fonts.googleapis.com/css?family=Abel%7CLato\">\n<link rel=\"preload\" as=\"style\" href=\"//fonts.googleapis.com/css?family=Lato:700italic\">\n</head></html>"
    );
}

#[test]
fn hex_entity_ampersands_are_removed_too() {
    let page = r#"<html><head>
<link rel="stylesheet" href="//fonts.googleapis.com/css?family=Lato&#x26;subset=latin-ext">
<link rel="stylesheet" href="//fonts.googleapis.com/css?family=Abel&#x7C;Ubuntu">
</head></html>"#;

    let result = rewrite(page, &CombineOptions::default()).unwrap();

    assert!(result.changed);
    assert_eq!(
        result.markup,
        "<html><head><link rel=\"stylesheet\" type=\"text/css\" href=\"https://fonts.googleapis.com/css?family=Abel%7CLato%7CUbuntu&amp;subset=latin-ext\">\n</head></html>"
    );
}
