//! Best-effort OGP/meta extraction from raw HTML. Tolerates malformed
//! markup and never fails; worst case every field comes back absent.

use super::OgpRecord;

pub fn extract(html: &str, requested_url: &str) -> OgpRecord {
    OgpRecord {
        title: meta_value(html, "og:title").or_else(|| tag_text(html, "title")),
        description: meta_value(html, "og:description").or_else(|| meta_value(html, "description")),
        image: meta_value(html, "og:image"),
        site_name: meta_value(html, "og:site_name"),
        source_url: meta_value(html, "og:url").unwrap_or_else(|| requested_url.to_owned()),
    }
}

/// Content of the first `<meta>` tag whose `property` or `name` attribute
/// equals `key`. Empty values count as absent.
fn meta_value(html: &str, key: &str) -> Option<String> {
    let mut rest = html;
    while let Some(pos) = find_ci(rest, "<meta") {
        let after = &rest[pos + "<meta".len()..];
        // guard against <metadata> and friends
        if !after.starts_with(|c: char| c.is_ascii_whitespace() || c == '/' || c == '>') {
            rest = after;
            continue;
        }
        let Some(end) = after.find('>') else { break };
        let attrs = parse_attrs(&after[..end]);
        rest = &after[end + 1..];

        if attrs
            .iter()
            .any(|(name, value)| (name == "property" || name == "name") && value == key)
        {
            if let Some((_, content)) = attrs.iter().find(|(name, _)| name == "content") {
                let decoded = html_escape::decode_html_entities(content).trim().to_string();
                if !decoded.is_empty() {
                    return Some(decoded);
                }
            }
        }
    }
    None
}

/// Text content of the first `<tag>...</tag>` pair, nested markup stripped.
fn tag_text(html: &str, tag: &str) -> Option<String> {
    let open = format!("<{tag}");
    let pos = find_ci(html, &open)?;
    let after = &html[pos + open.len()..];
    let body_start = after.find('>')?;
    let body = &after[body_start + 1..];
    let close = format!("</{tag}");
    let end = find_ci(body, &close)?;
    let text = strip_tags(&body[..end]);
    let decoded = html_escape::decode_html_entities(text.trim()).trim().to_string();
    (!decoded.is_empty()).then_some(decoded)
}

fn find_ci(haystack: &str, needle: &str) -> Option<usize> {
    let h = haystack.as_bytes();
    let n = needle.as_bytes();
    if n.is_empty() || h.len() < n.len() {
        return None;
    }
    (0..=h.len() - n.len()).find(|&i| h[i..i + n.len()].eq_ignore_ascii_case(n))
}

/// Attribute list of a single tag body. Handles double, single and missing
/// quotes; names are lowercased.
fn parse_attrs(tag: &str) -> Vec<(String, String)> {
    let bytes = tag.as_bytes();
    let mut attrs = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        while i < bytes.len() && (bytes[i].is_ascii_whitespace() || bytes[i] == b'/') {
            i += 1;
        }
        if i >= bytes.len() {
            break;
        }
        let name_start = i;
        while i < bytes.len()
            && !bytes[i].is_ascii_whitespace()
            && bytes[i] != b'='
            && bytes[i] != b'/'
        {
            i += 1;
        }
        if i == name_start {
            i += 1;
            continue;
        }
        let name = tag[name_start..i].to_ascii_lowercase();
        while i < bytes.len() && bytes[i].is_ascii_whitespace() {
            i += 1;
        }
        if i < bytes.len() && bytes[i] == b'=' {
            i += 1;
            while i < bytes.len() && bytes[i].is_ascii_whitespace() {
                i += 1;
            }
            if i < bytes.len() && (bytes[i] == b'"' || bytes[i] == b'\'') {
                let quote = bytes[i];
                i += 1;
                let value_start = i;
                while i < bytes.len() && bytes[i] != quote {
                    i += 1;
                }
                attrs.push((name, tag[value_start..i].to_owned()));
                if i < bytes.len() {
                    i += 1;
                }
            } else {
                let value_start = i;
                while i < bytes.len() && !bytes[i].is_ascii_whitespace() {
                    i += 1;
                }
                attrs.push((name, tag[value_start..i].to_owned()));
            }
        } else {
            attrs.push((name, String::new()));
        }
    }
    attrs
}

fn strip_tags(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            c if !in_tag => out.push(c),
            _ => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn og_title_wins_over_title_tag() {
        let html = r#"<html><head><title>Doc Title</title><meta property="og:title" content="OG Title"></head></html>"#;
        let record = extract(html, "https://a.example");
        assert_eq!(record.title.as_deref(), Some("OG Title"));
    }

    #[test]
    fn title_falls_back_to_the_title_tag() {
        let html = "<html><head><title>Doc <b>Title</b></title></head></html>";
        let record = extract(html, "https://a.example");
        assert_eq!(record.title.as_deref(), Some("Doc Title"));
    }

    #[test]
    fn description_falls_back_to_the_named_meta() {
        let html = r#"<head><meta name="description" content="plain description"></head>"#;
        let record = extract(html, "https://a.example");
        assert_eq!(record.description.as_deref(), Some("plain description"));
    }

    #[test]
    fn og_description_wins_when_both_are_present() {
        let html = concat!(
            r#"<meta name="description" content="plain">"#,
            r#"<meta property="og:description" content="rich">"#,
        );
        let record = extract(html, "https://a.example");
        assert_eq!(record.description.as_deref(), Some("rich"));
    }

    #[test]
    fn bare_html_yields_an_empty_record() {
        let record = extract("<html><body><p>Nothing here</p></body></html>", "https://a.example");
        assert_eq!(record.title, None);
        assert_eq!(record.description, None);
        assert_eq!(record.image, None);
        assert_eq!(record.site_name, None);
        assert_eq!(record.source_url, "https://a.example");
    }

    #[test]
    fn malformed_markup_does_not_panic() {
        let record = extract("<meta property=og:title content", "https://a.example");
        assert_eq!(record.title, None);
        extract("<title>unterminated", "https://a.example");
        extract("<meta", "https://a.example");
    }

    #[test]
    fn og_url_overrides_the_requested_url() {
        let html = r#"<meta property="og:url" content="https://canonical.example/page">"#;
        let record = extract(html, "https://a.example/page?utm=1");
        assert_eq!(record.source_url, "https://canonical.example/page");
    }

    #[test]
    fn attribute_order_and_quoting_do_not_matter() {
        let html = concat!(
            r#"<meta content="Swapped" property="og:title" />"#,
            r#"<meta property='og:site_name' content='Quoted Site'>"#,
        );
        let record = extract(html, "https://a.example");
        assert_eq!(record.title.as_deref(), Some("Swapped"));
        assert_eq!(record.site_name.as_deref(), Some("Quoted Site"));
    }

    #[test]
    fn entities_are_decoded() {
        let html = r#"<meta property="og:title" content="Fish &amp; Chips">"#;
        let record = extract(html, "https://a.example");
        assert_eq!(record.title.as_deref(), Some("Fish & Chips"));
    }

    #[test]
    fn empty_content_counts_as_absent() {
        let html = r#"<meta property="og:image" content="">"#;
        let record = extract(html, "https://a.example");
        assert_eq!(record.image, None);
    }

    #[test]
    fn metadata_tags_are_not_mistaken_for_meta() {
        let html = r#"<metadata property="og:title" content="not me"></metadata>"#;
        let record = extract(html, "https://a.example");
        assert_eq!(record.title, None);
    }
}
