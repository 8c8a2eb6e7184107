//! HTML rendering for one resolved link card. Metadata is escaped; the
//! user's memo renders as markdown.

use crate::include_res;
use crate::ogp::OgpCard;

pub(crate) fn escape(text: &str) -> String {
    html_escape::encode_text(text).into_owned()
}

fn escape_attr(text: &str) -> String {
    html_escape::encode_double_quoted_attribute(text).into_owned()
}

pub(crate) fn render(card: &OgpCard) -> String {
    let (url, title, description, image, site_name, note) = match card {
        OgpCard::Complete { record, note } => (
            record.source_url.as_str(),
            record.title.as_deref(),
            record.description.as_deref(),
            record.image.as_deref(),
            record.site_name.as_deref(),
            note.as_deref(),
        ),
        OgpCard::Degraded { source_url, note } => {
            (source_url.as_str(), None, None, None, None, note.as_deref())
        }
    };

    let image_block = image
        .map(|src| {
            format!(
                r#"<img class="card-image" src="{}" alt="{}">"#,
                escape_attr(src),
                escape_attr(title.unwrap_or("OGP Image")),
            )
        })
        .unwrap_or_default();
    let site_name_block = site_name
        .map(|site| format!(r#"<span class="card-site">{}</span>"#, escape(site)))
        .unwrap_or_default();
    let title_block = title
        .map(|title| format!(r#"<h2 class="card-title">{}</h2>"#, escape(title)))
        .unwrap_or_default();
    let description_block = description
        .map(|description| format!(r#"<p class="card-description">{}</p>"#, escape(description)))
        .unwrap_or_default();
    let note_block = note
        .map(|note| {
            let mut note_html = String::new();
            pulldown_cmark::html::push_html(&mut note_html, pulldown_cmark::Parser::new(note));
            format!(
                r#"<div class="card-note"><strong>Memo:</strong> {note_html}</div>"#
            )
        })
        .unwrap_or_default();

    include_res!(str, "/pages/card.html")
        .replace("{url}", &escape_attr(url))
        .replace("{image_block}", &image_block)
        .replace("{site_name_block}", &site_name_block)
        .replace("{title_block}", &title_block)
        .replace("{description_block}", &description_block)
        .replace("{display_url}", &escape(url))
        .replace("{note_block}", &note_block)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ogp::OgpRecord;

    #[test]
    fn a_degraded_card_still_shows_the_url_and_memo() {
        let html = render(&OgpCard::Degraded {
            source_url: "https://a.example/page".to_owned(),
            note: Some("remember this".to_owned()),
        });
        assert!(html.contains("https://a.example/page"));
        assert!(html.contains("remember this"));
        assert!(!html.contains("card-title"));
    }

    #[test]
    fn metadata_is_escaped() {
        let html = render(&OgpCard::Complete {
            record: OgpRecord {
                title: Some("<script>alert(1)</script>".to_owned()),
                source_url: "https://a.example".to_owned(),
                ..Default::default()
            },
            note: None,
        });
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }
}
