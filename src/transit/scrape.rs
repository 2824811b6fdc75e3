//! Stop-name extraction from the CTA line pages.
//!
//! Each line page lists its stations in travel order as
//! `<p class="rld-stopname">Name</p>` paragraphs. Only that much of the
//! markup is interpreted here.

const STOP_NAME_CLASS: &str = "rld-stopname";

/// Returns the text of every `rld-stopname` paragraph, in document order.
pub fn scrape_stop_names(html: &str) -> Vec<String> {
    // ASCII lowercasing keeps byte offsets aligned with `html`.
    let lc = html.to_ascii_lowercase();
    let mut names = Vec::new();
    let mut from = 0;

    while let Some(rel) = lc[from..].find("<p") {
        let start = from + rel;
        let after_name = start + 2;

        // `<pre>`, `<param>` and friends are not paragraphs.
        match lc[after_name..].chars().next() {
            Some(c) if c.is_whitespace() || c == '>' || c == '/' => {}
            _ => {
                from = after_name;
                continue;
            }
        }

        let Some(open_end) = lc[start..].find('>').map(|i| start + i + 1) else {
            break;
        };

        let open_tag = &html[start..open_end];
        if !has_class(open_tag, STOP_NAME_CLASS) {
            from = open_end;
            continue;
        }

        let Some(close) = lc[open_end..].find("</p").map(|i| open_end + i) else {
            break;
        };

        let text = normalize_ws(&decode_entities(&strip_tags(&html[open_end..close])));
        if !text.is_empty() {
            names.push(text);
        }
        from = close;
    }

    names
}

/// Whether the `class` attribute of an opening tag contains `class_name`
/// as one of its whitespace-separated tokens. Attribute names are matched
/// case-insensitively, class tokens exactly.
fn has_class(open_tag: &str, class_name: &str) -> bool {
    class_attr(open_tag)
        .map(|v| v.split_whitespace().any(|c| c == class_name))
        .unwrap_or(false)
}

fn class_attr(open_tag: &str) -> Option<&str> {
    let lc = open_tag.to_ascii_lowercase();
    let mut from = 0;

    loop {
        let at = lc[from..].find("class")? + from;
        let preceded_ok = lc[..at]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_whitespace());
        let rest = lc[at + "class".len()..].trim_start();
        if !preceded_ok || !rest.starts_with('=') {
            from = at + "class".len();
            continue;
        }

        let value_start = open_tag.len() - rest.len() + 1;
        let value = open_tag[value_start..].trim_start();
        let offset = open_tag.len() - value.len();

        return match value.chars().next()? {
            q @ ('"' | '\'') => {
                let end = value[1..].find(q)?;
                Some(&open_tag[offset + 1..offset + 1 + end])
            }
            _ => {
                let end = value
                    .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
                    .unwrap_or(value.len());
                Some(&open_tag[offset..offset + end])
            }
        };
    }
}

fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;

    for ch in s.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => out.push(ch),
            _ => {}
        }
    }
    out
}

fn decode_entities(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut rest = s;

    while let Some(amp) = rest.find('&') {
        out.push_str(&rest[..amp]);
        let tail = &rest[amp..];

        let decoded = tail
            .find(';')
            .filter(|&semi| semi <= 10)
            .and_then(|semi| decode_entity(&tail[1..semi]).map(|c| (c, semi)));

        match decoded {
            Some((c, semi)) => {
                out.push(c);
                rest = &tail[semi + 1..];
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }

    out.push_str(rest);
    out
}

fn decode_entity(name: &str) -> Option<char> {
    if let Some(num) = name.strip_prefix('#') {
        let code = match num.strip_prefix(['x', 'X']) {
            Some(hex) => u32::from_str_radix(hex, 16).ok()?,
            None => num.parse().ok()?,
        };
        return char::from_u32(code);
    }

    let c = match name {
        "amp" => '&',
        "lt" => '<',
        "gt" => '>',
        "quot" => '"',
        "apos" => '\'',
        "nbsp" => ' ',
        "rsquo" => '\u{2019}',
        "lsquo" => '\u{2018}',
        "ndash" => '\u{2013}',
        "mdash" => '\u{2014}',
        _ => return None,
    };
    Some(c)
}

fn normalize_ws(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_stop_names_in_order() {
        let html = r#"
            <div class="rld-stop">
              <p class="rld-stopname">Howard</p>
              <p class="rld-lines">Red, Purple, Yellow</p>
            </div>
            <div class="rld-stop"><P CLASS="rld-stopname first">Jarvis</P></div>
            <div><p class='rld-stopname'>
                Morse
            </p></div>
        "#;

        assert_eq!(scrape_stop_names(html), vec!["Howard", "Jarvis", "Morse"]);
    }

    #[test]
    fn test_nested_markup_and_entities() {
        let html = r#"<p class="rld-stopname"><a href="/station/roos/">Roosevelt</a> &amp; State</p>
                      <p class="rld-stopname">Harold Washington Library-State/Van Buren</p>
                      <p class="rld-stopname">O&#39;Hare</p>"#;

        assert_eq!(
            scrape_stop_names(html),
            vec![
                "Roosevelt & State",
                "Harold Washington Library-State/Van Buren",
                "O'Hare"
            ]
        );
    }

    #[test]
    fn test_ignores_similar_classes_and_tags() {
        let html = r#"<pre class="rld-stopname">not a paragraph</pre>
                      <p class="rld-stopname-extra">nope</p>
                      <p data-class="rld-stopname">nope</p>
                      <p class="rld-stopname">   </p>
                      <p class="rld-stopname">Belmont</p>"#;

        assert_eq!(scrape_stop_names(html), vec!["Belmont"]);
    }

    #[test]
    fn test_class_tokens_are_case_sensitive() {
        let html = r#"<P CLASS="RLD-StopName">Loyola</P>
                      <p Class="rld-stopname">Granville</p>"#;

        assert_eq!(scrape_stop_names(html), vec!["Granville"]);
    }

    #[test]
    fn test_unknown_entities_are_left_alone() {
        assert_eq!(decode_entities("A &bogus; B & C"), "A &bogus; B & C");
        assert_eq!(decode_entities("&#x41;&#66;"), "AB");
    }

    #[test]
    fn test_empty_page() {
        assert!(scrape_stop_names("").is_empty());
        assert!(scrape_stop_names("<html><body><p>hi</p></body></html>").is_empty());
    }
}
