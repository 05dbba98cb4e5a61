use super::*;
use crate::fetch::{FetchError, FetchResponse};
use std::collections::HashMap;
use std::sync::Mutex;

/// Serves `/favicon.ico` for the listed hosts and records every request;
/// every other URL fails.
#[derive(Default)]
struct WebrootFetcher {
    icons: HashMap<String, Vec<u8>>,
    requests: Mutex<Vec<String>>,
}

impl WebrootFetcher {
    fn with_icon(mut self, host: &str, bytes: &[u8]) -> Self {
        self.icons
            .insert(format!("http://{host}/favicon.ico"), bytes.to_vec());
        self
    }
}

impl Fetcher for WebrootFetcher {
    fn get(&self, url: &str) -> Result<FetchResponse, FetchError> {
        self.requests.lock().unwrap().push(url.to_string());
        let body = self
            .icons
            .get(url)
            .ok_or_else(|| FetchError::Curl(curl::Error::new(7)))?;
        Ok(FetchResponse {
            status: 200,
            headers: [
                ("content-type".to_string(), "image/x-icon".to_string()),
                ("content-length".to_string(), body.len().to_string()),
            ]
            .into_iter()
            .collect(),
            body: body.clone(),
        })
    }
}

fn annotator_with_cache(
    mode: Mode,
    fetcher: WebrootFetcher,
    cache: IconCache,
) -> Annotator<WebrootFetcher> {
    Annotator::new(mode, FaviconResolver::new(fetcher, cache))
        .with_fallback_icon("/img/external.png")
}

fn annotator(
    mode: Mode,
    fetcher: WebrootFetcher,
) -> (tempfile::TempDir, Annotator<WebrootFetcher>) {
    let dir = tempfile::tempdir().unwrap();
    let cache = IconCache::new(dir.path().join("favicons"));
    (dir, annotator_with_cache(mode, fetcher, cache))
}

#[test]
fn text_without_external_links_is_unchanged() {
    let (_dir, a) = annotator(Mode::Favicon, WebrootFetcher::default());
    let markup = r#"<p>Hello <a href="/local">local</a> and <a href="mailto:x@example.com">mail</a></p>"#;
    assert_eq!(a.annotate(markup).markup, markup);
    assert_eq!(a.annotate("").markup, "");
    assert_eq!(a.resolver().fetcher_calls(), 0);
}

#[test]
fn class_only_adds_class_attribute() {
    let (_dir, a) = annotator(Mode::ClassOnly, WebrootFetcher::default());
    let out = a
        .annotate(r#"<a href="https://sub.example.co.uk/x">Text</a>"#)
        .markup;
    assert_eq!(
        out,
        r#"<a href="https://sub.example.co.uk/x" class="urlicon urlicon-co">Text</a>"#
    );
}

#[test]
fn class_only_prefixes_existing_class() {
    let (_dir, a) = annotator(Mode::ClassOnly, WebrootFetcher::default());
    let out = a
        .annotate(r#"<p><a class="ext" href="http://www.example.com/">Example</a></p>"#)
        .markup;
    assert_eq!(
        out,
        r#"<p><a class="urlicon urlicon-example ext" href="http://www.example.com/">Example</a></p>"#
    );
}

#[test]
fn class_only_single_label_host_untouched() {
    let (_dir, a) = annotator(Mode::ClassOnly, WebrootFetcher::default());
    let markup = r#"<a href="http://localhost:8080/">dev</a>"#;
    assert_eq!(a.annotate(markup).markup, markup);
}

#[test]
fn generic_icon_never_fetches() {
    let (_dir, a) = annotator(
        Mode::GenericIcon,
        WebrootFetcher::default().with_icon("www.example.com", b"ico"),
    );
    let out = a
        .annotate(r#"Go <a href="http://www.example.com/page">there</a>!"#)
        .markup;
    assert_eq!(
        out,
        r#"Go <a href="http://www.example.com/page">there</a>&nbsp;<img src="/img/external.png" alt="" title="favicon" class="urlicon urlicon-www_example_com" />!"#
    );
    assert_eq!(a.resolver().fetcher_calls(), 0);
}

#[test]
fn favicon_mode_references_cached_icon() {
    let (dir, a) = annotator(
        Mode::Favicon,
        WebrootFetcher::default().with_icon("example.org", b"\x00\x00\x01\x00"),
    );
    let out = a
        .annotate(r#"<a href="https://example.org/about">About</a>"#)
        .markup;
    let path = dir.path().join("favicons").join("example_org.ico");
    assert_eq!(
        out,
        format!(
            r#"<a href="https://example.org/about">About</a>&nbsp;<img src="{}" alt="" title="favicon" class="urlicon urlicon-example_org" />"#,
            path.display()
        )
    );
    assert_eq!(std::fs::read(&path).unwrap(), b"\x00\x00\x01\x00");
}

#[test]
fn favicon_mode_uses_cache_url_prefix() {
    let (_dir, a) = annotator(
        Mode::Favicon,
        WebrootFetcher::default().with_icon("example.org", b"ico"),
    );
    let a = a.with_cache_url(Some("https://static.example.net/urlicon/".to_string()));
    let out = a
        .annotate(r#"<a href="http://example.org/">x</a>"#)
        .markup;
    assert!(out.contains(r#"<img src="https://static.example.net/urlicon/example_org.ico""#));
}

#[test]
fn favicon_mode_falls_back_to_generic_icon() {
    let (_dir, a) = annotator(Mode::Favicon, WebrootFetcher::default());
    let out = a
        .annotate(r#"<a href="http://nowhere.example/">gone</a>"#)
        .markup;
    assert!(out.contains(r#"<img src="/img/external.png""#));
    assert!(out.contains(r#"class="urlicon urlicon-nowhere_example""#));
}

#[test]
fn favicon_mode_hits_cache_on_repeat_host() {
    let (_dir, a) = annotator(
        Mode::Favicon,
        WebrootFetcher::default().with_icon("example.org", b"ico"),
    );
    let markup = r#"<a href="http://example.org/a">a</a> <a href="http://example.org/b">b</a>"#;
    let out = a.annotate(markup).markup;
    assert_eq!(out.matches("example_org.ico").count(), 2);
    // page fetch + webroot for the first link only
    assert_eq!(a.resolver().fetcher_calls(), 2);
}

#[test]
fn link_text_and_url_are_escaped() {
    let (_dir, a) = annotator(Mode::GenericIcon, WebrootFetcher::default());
    let out = a
        .annotate(r#"<a href="http://example.com/?a=1&b=<2>">Tom & <i>Jerry</i></a>"#)
        .markup;
    assert!(out.starts_with(
        r#"<a href="http://example.com/?a=1&amp;b=&lt;2&gt;">Tom &amp; &lt;i&gt;Jerry&lt;/i&gt;</a>"#
    ));
}

#[test]
fn surrounding_text_is_preserved() {
    let (_dir, a) = annotator(Mode::ClassOnly, WebrootFetcher::default());
    let markup = "<ul>\n<li><a href=\"http://a.example.com/\">A</a></li>\n<li>plain</li>\n<li><a href=\"ftp://ftp.example.org/\">B</a></li>\n</ul>";
    let out = a.annotate(markup).markup;
    assert_eq!(
        out,
        "<ul>\n<li><a href=\"http://a.example.com/\" class=\"urlicon urlicon-example\">A</a></li>\n<li>plain</li>\n<li><a href=\"ftp://ftp.example.org/\" class=\"urlicon urlicon-example\">B</a></li>\n</ul>"
    );
}

#[test]
fn mode_from_str() {
    assert_eq!("favicon".parse::<Mode>().unwrap(), Mode::Favicon);
    assert_eq!("ICON".parse::<Mode>().unwrap(), Mode::GenericIcon);
    assert_eq!(" class ".parse::<Mode>().unwrap(), Mode::ClassOnly);
    assert!("nope".parse::<Mode>().is_err());
    assert_eq!(Mode::GenericIcon.to_string(), "icon");
}

#[test]
fn entities_in_href_and_text_are_not_double_escaped() {
    let (_dir, a) = annotator(
        Mode::Favicon,
        WebrootFetcher::default().with_icon("example.com", b"ico"),
    );
    let out = a
        .annotate(r#"<a href="http://example.com/p?a=1&amp;b=2">Tom &amp; Jerry</a>"#)
        .markup;
    assert!(out.starts_with(
        r#"<a href="http://example.com/p?a=1&amp;b=2">Tom &amp; Jerry</a>&nbsp;<img src=""#
    ));
    assert_eq!(
        a.resolver().fetched_urls(),
        vec![
            "http://example.com/p?a=1&b=2".to_string(),
            "http://example.com/favicon.ico".to_string(),
        ]
    );
}

#[test]
fn data_href_attribute_is_not_a_link() {
    let (_dir, a) = annotator(Mode::GenericIcon, WebrootFetcher::default());
    let markup = r#"<a data-href="http://x.example/" href="/local">t</a>"#;
    assert_eq!(a.annotate(markup).markup, markup);
}

#[test]
fn class_only_prefixes_single_quoted_class() {
    let (_dir, a) = annotator(Mode::ClassOnly, WebrootFetcher::default());
    let out = a
        .annotate(r#"<a class='ext' href="http://www.example.com/">Example</a>"#)
        .markup;
    assert_eq!(
        out,
        r#"<a class='urlicon urlicon-example ext' href="http://www.example.com/">Example</a>"#
    );
}

#[test]
fn unusable_cache_still_annotates_with_fallback() {
    let dir = tempfile::tempdir().unwrap();
    let blocker = dir.path().join("not-a-dir");
    std::fs::write(&blocker, b"x").unwrap();
    let a = annotator_with_cache(
        Mode::Favicon,
        WebrootFetcher::default().with_icon("a.example", b"ico"),
        IconCache::new(blocker.join("favicons")),
    );

    let annotated = a.annotate(r#"<p>Hi <a href="http://a.example/">A</a></p>"#);
    assert_eq!(
        annotated.markup,
        r#"<p>Hi <a href="http://a.example/">A</a>&nbsp;<img src="/img/external.png" alt="" title="favicon" class="urlicon urlicon-a_example" /></p>"#
    );
    assert_eq!(annotated.cache_errors.len(), 1);
    assert!(matches!(
        annotated.cache_errors[0],
        CacheError::CreateDir { .. }
    ));
    assert_eq!(a.resolver().fetcher_calls(), 0);
}

#[test]
fn successful_run_reports_no_cache_errors() {
    let (_dir, a) = annotator(
        Mode::Favicon,
        WebrootFetcher::default().with_icon("example.org", b"ico"),
    );
    assert!(a
        .annotate(r#"<a href="http://example.org/">x</a>"#)
        .cache_errors
        .is_empty());
}

trait FetcherCalls {
    fn fetched_urls(&self) -> Vec<String>;

    fn fetcher_calls(&self) -> usize {
        self.fetched_urls().len()
    }
}

impl FetcherCalls for FaviconResolver<WebrootFetcher> {
    fn fetched_urls(&self) -> Vec<String> {
        self.fetcher().requests.lock().unwrap().clone()
    }
}
