//! Parse HTTP response header lines into a header map.

use std::collections::HashMap;

/// Collects `Name: value` lines into a lowercase-keyed map.
///
/// Curl reports the headers of every hop when following redirects; a status
/// line (`HTTP/...`) starts a new response, so earlier headers are discarded
/// and only the final response's headers remain.
pub(crate) fn parse_header_lines(lines: &[String]) -> HashMap<String, String> {
    let mut headers = HashMap::new();

    for line in lines {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line.starts_with("HTTP/") {
            headers.clear();
            continue;
        }
        if let Some((name, value)) = line.split_once(':') {
            headers.insert(name.trim().to_ascii_lowercase(), value.trim().to_string());
        }
    }

    headers
}
