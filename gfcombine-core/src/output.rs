//! Rendering of combined requests: link markup, WebFont loader script, JSON.

use std::collections::BTreeMap;
use std::io::Write;

use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::collection::{FontCollection, TextEntry};
use crate::config::MarkupType;
use crate::error::Result;
use crate::urls::encode_bare_ampersands;

const SCRIPT_LOADER: &str = r#"(function() {
    var wf = document.createElement('script');
    wf.src = ('https:' == document.location.protocol ? 'https' : 'http') +
        '://ajax.googleapis.com/ajax/libs/webfont/1/webfont.js';
    wf.type = 'text/javascript';
    wf.async = 'true';
    var s = document.getElementsByTagName('script')[0];
    s.parentNode.insertBefore(wf, s);
})();"#;

/// A single stylesheet `<link>` for `href`, ampersands encoded.
pub fn stylesheet_link(href: &str) -> String {
    format!(
        r#"<link rel="stylesheet" type="text/css" href="{}">"#,
        encode_bare_ampersands(href, "")
    )
}

/// One `<link>` per URL, left as given apart from ampersand encoding.
pub fn render_original_links<S: AsRef<str>>(links: &[S]) -> String {
    links
        .iter()
        .map(|link| stylesheet_link(link.as_ref()))
        .collect()
}

/// The combined link followed by one link per text request.
pub fn render_link_markup(collection: &FontCollection) -> String {
    let mut markup = String::new();
    if let Some(url) = collection.combined_url() {
        markup.push_str(&stylesheet_link(&url));
    }
    for url in collection.text_urls() {
        markup.push_str(&stylesheet_link(url));
    }
    markup
}

/// WebFont loader configuration for the collection.
pub fn render_script(collection: &FontCollection) -> String {
    let (named_sizes, subsets_map) = collection.script_data();
    build_script_config(named_sizes, subsets_map, collection.text_entries())
}

pub fn render_markup(collection: &FontCollection, markup_type: MarkupType) -> String {
    match markup_type {
        MarkupType::Link => render_link_markup(collection),
        MarkupType::Script => render_script(collection),
    }
}

/// Fill the fixed WebFont loader template.
///
/// Families follow `named_sizes` order; text entries are loaded through the
/// `custom` module in encounter order.
pub fn build_script_config(
    named_sizes: &BTreeMap<String, Vec<String>>,
    subsets_map: &BTreeMap<String, IndexSet<String>>,
    text_entries: &[TextEntry],
) -> String {
    let families: Vec<String> = named_sizes
        .iter()
        .map(|(name, sizes)| {
            let subsets: Vec<&str> = subsets_map
                .get(name)
                .map(|set| set.iter().map(String::as_str).collect())
                .unwrap_or_default();
            family_token(name, sizes, &subsets)
        })
        .collect();

    let mut custom = String::new();
    if !text_entries.is_empty() {
        let names: Vec<&str> = text_entries.iter().map(|e| e.name.as_str()).collect();
        let urls: Vec<&str> = text_entries.iter().map(|e| e.url.as_str()).collect();
        custom.push_str(",\n    custom: {\n");
        custom.push_str(&format!("        families: [ {} ],\n", quote_list(&names)));
        custom.push_str(&format!("        urls: [ {} ]\n", quote_list(&urls)));
        custom.push_str("    }");
    }

    let families: Vec<&str> = families.iter().map(String::as_str).collect();
    format!(
        "<script type=\"text/javascript\">\nWebFontConfig = {{\n    google: {{ families: [ {} ] }}{custom}\n}};\n{SCRIPT_LOADER}\n</script>",
        quote_list(&families)
    )
}

fn family_token(name: &str, sizes: &[String], subsets: &[&str]) -> String {
    let mut token = name.to_string();
    if sizes.is_empty() && subsets.is_empty() {
        return token;
    }
    token.push(':');
    token.push_str(&sizes.join(","));
    if !subsets.is_empty() {
        token.push(':');
        token.push_str(&subsets.join(","));
    }
    token
}

fn quote_list(items: &[&str]) -> String {
    items
        .iter()
        .map(|item| format!("'{}'", item.replace('\\', "\\\\").replace('\'', "\\'")))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Serializable overview of a collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionSummary {
    pub combined_url: Option<String>,
    pub text_urls: Vec<String>,
    /// `name[:sizes]` per family, in name order.
    pub families: Vec<String>,
    pub subsets: Vec<String>,
    pub links: Vec<String>,
}

impl From<&FontCollection> for CollectionSummary {
    fn from(collection: &FontCollection) -> Self {
        Self {
            combined_url: collection.combined_url(),
            text_urls: collection
                .text_urls()
                .into_iter()
                .map(str::to_string)
                .collect(),
            families: collection
                .named_sizes()
                .iter()
                .map(|(name, sizes)| family_token(name, sizes, &[]))
                .collect(),
            subsets: collection.subsets(),
            links: collection.links().to_vec(),
        }
    }
}

/// Write summaries as prettified JSON array.
pub fn write_json_pretty(summaries: &[CollectionSummary], mut w: impl Write) -> Result<()> {
    let json = serde_json::to_string_pretty(summaries)?;
    w.write_all(json.as_bytes())?;
    Ok(())
}

/// Write summaries as newline-delimited JSON (NDJSON).
pub fn write_ndjson(summaries: &[CollectionSummary], mut w: impl Write) -> Result<()> {
    for item in summaries {
        let line = serde_json::to_string(item)?;
        w.write_all(line.as_bytes())?;
        w.write_all(b"\n")?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> FontCollection {
        FontCollection::from_urls([
            "//fonts.googleapis.com/css?family=Open+Sans:400italic,700italic,400,700&subset=latin,latin-ext",
            "//fonts.googleapis.com/css?family=Ubuntu:400,700&subset=latin,latin-ext,cyrillic",
            "//fonts.googleapis.com/css?family=Abel",
        ])
        .expect("collection")
    }

    #[test]
    fn script_lists_families_in_name_order_with_subsets() {
        let script = render_script(&sample());

        assert!(script.starts_with("<script type=\"text/javascript\">\nWebFontConfig = {\n"));
        assert!(
            script.contains(
                "    google: { families: [ 'Abel', 'Open Sans:400,400italic,700,700italic:latin,latin-ext', 'Ubuntu:400,700:latin,latin-ext,cyrillic' ] }\n};"
            ),
            "{script}"
        );
        assert!(!script.contains("custom"));
        assert!(script.ends_with("})();\n</script>"));
    }

    #[test]
    fn script_adds_custom_block_for_text_requests() {
        let collection = FontCollection::from_urls([
            "//fonts.googleapis.com/css?family=Lato:400",
            "http://fonts.googleapis.com/css?family=Roboto+Condensed&text=Woot",
        ])
        .unwrap();

        let script = render_script(&collection);
        assert!(
            script.contains(
                "google: { families: [ 'Lato:400' ] },\n    custom: {\n        families: [ 'Roboto Condensed' ],\n        urls: [ 'https://fonts.googleapis.com/css?family=Roboto+Condensed&text=Woot' ]\n    }\n};"
            ),
            "{script}"
        );
    }

    #[test]
    fn original_links_keep_their_urls() {
        assert_eq!(
            render_original_links(&["//fonts.googleapis.com/css?family=Lato:700,400&subset=latin"]),
            r#"<link rel="stylesheet" type="text/css" href="//fonts.googleapis.com/css?family=Lato:700,400&amp;subset=latin">"#
        );
    }

    #[test]
    fn quotes_are_escaped_inside_script() {
        assert_eq!(quote_list(&["It's", "a\\b"]), r"'It\'s', 'a\\b'");
    }

    #[test]
    fn link_markup_encodes_ampersands() {
        let collection = FontCollection::from_urls([
            "//fonts.googleapis.com/css?family=Lato:400&subset=latin",
            "http://fonts.googleapis.com/css?family=Roboto+Condensed&text=Woot",
        ])
        .unwrap();

        assert_eq!(
            render_link_markup(&collection),
            concat!(
                r#"<link rel="stylesheet" type="text/css" href="https://fonts.googleapis.com/css?family=Lato%3A400&amp;subset=latin">"#,
                r#"<link rel="stylesheet" type="text/css" href="https://fonts.googleapis.com/css?family=Roboto+Condensed&amp;text=Woot">"#,
            )
        );
    }

    #[test]
    fn ndjson_writes_one_line_per_summary() {
        let summary = CollectionSummary::from(&sample());
        let mut buf = Vec::new();

        write_ndjson(&[summary.clone(), summary], &mut buf).expect("write ndjson");

        let text = String::from_utf8(buf).expect("utf8");
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let parsed: CollectionSummary = serde_json::from_str(lines[0]).expect("parse");
        assert_eq!(parsed.families[0], "Abel");
        assert_eq!(parsed.subsets, ["latin", "latin-ext", "cyrillic"]);
    }
}
