//! RSS 2.0 serialization.
//!
//! # Output
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <rss version="2.0">
//!   <channel>
//!     <title>…</title>
//!     <link>…</link>
//!     <description>…</description>
//!     <language>en</language>
//!     <lastBuildDate>…</lastBuildDate>
//!     <generator>listing_rss</generator>
//!     <item>
//!       <title>…</title>
//!       <link>…</link>
//!       <guid isPermaLink="false">…</guid>
//!       <pubDate>…</pubDate>
//!       <description>…</description>
//!       <category>…</category>
//!     </item>
//!   </channel>
//! </rss>
//! ```

use crate::models::{FeedChannel, FeedEntry};
use crate::utils::ensure_parent_dir;
use chrono::{DateTime, Utc};
use quick_xml::Writer;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use std::error::Error;
use std::io::Write;
use tokio::fs;
use tracing::{info, instrument};

/// Render the feed document. Entries are written in the order given.
pub fn render_rss(
    channel: &FeedChannel,
    entries: &[FeedEntry],
    built_at: DateTime<Utc>,
) -> Result<String, Box<dyn Error>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))?;

    let mut rss = BytesStart::new("rss");
    rss.push_attribute(("version", "2.0"));
    writer.write_event(Event::Start(rss))?;
    writer.write_event(Event::Start(BytesStart::new("channel")))?;

    write_text_element(&mut writer, "title", &channel.title)?;
    write_text_element(&mut writer, "link", &channel.link)?;
    write_text_element(&mut writer, "description", &channel.description)?;
    write_text_element(&mut writer, "language", &channel.language)?;
    write_text_element(&mut writer, "lastBuildDate", &built_at.to_rfc2822())?;
    write_text_element(&mut writer, "generator", env!("CARGO_PKG_NAME"))?;

    for entry in entries {
        writer.write_event(Event::Start(BytesStart::new("item")))?;
        write_text_element(&mut writer, "title", &entry.title)?;
        write_text_element(&mut writer, "link", &entry.link)?;

        let mut guid = BytesStart::new("guid");
        guid.push_attribute(("isPermaLink", "false"));
        writer.write_event(Event::Start(guid))?;
        writer.write_event(Event::Text(BytesText::new(&sanitize_text(&entry.id))))?;
        writer.write_event(Event::End(BytesEnd::new("guid")))?;

        if let Some(published) = entry.published {
            write_text_element(&mut writer, "pubDate", &published.to_rfc2822())?;
        }
        if let Some(description) = &entry.description {
            write_text_element(&mut writer, "description", description)?;
        }
        if let Some(category) = &entry.category {
            write_text_element(&mut writer, "category", category)?;
        }
        writer.write_event(Event::End(BytesEnd::new("item")))?;
    }

    writer.write_event(Event::End(BytesEnd::new("channel")))?;
    writer.write_event(Event::End(BytesEnd::new("rss")))?;

    let mut out = writer.into_inner();
    out.write_all(b"\n")?;
    Ok(String::from_utf8(out)?)
}

/// Render and write the feed to `path`, creating missing directories.
#[instrument(level = "info", skip_all, fields(%path, items = entries.len()))]
pub async fn write_feed(
    channel: &FeedChannel,
    entries: &[FeedEntry],
    path: &str,
) -> Result<(), Box<dyn Error>> {
    let xml = render_rss(channel, entries, Utc::now())?;
    ensure_parent_dir(path).await?;
    fs::write(path, xml).await?;
    info!("Wrote RSS feed");
    Ok(())
}

fn write_text_element<W: Write>(
    w: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), Box<dyn Error>> {
    w.write_event(Event::Start(BytesStart::new(name)))?;
    w.write_event(Event::Text(BytesText::new(&sanitize_text(text))))?;
    w.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Drop control characters that XML 1.0 does not allow.
fn sanitize_text(input: &str) -> String {
    input
        .chars()
        .filter(|&c| matches!(c, '\t' | '\n' | '\r') || c >= ' ')
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn channel() -> FeedChannel {
        FeedChannel {
            title: "Colliers News (unofficial)".to_string(),
            link: "https://www.colliers.com/en/news".to_string(),
            description: "Unofficial RSS feed generated from listing pages.".to_string(),
            language: "en".to_string(),
        }
    }

    fn entry(id: &str, title: &str) -> FeedEntry {
        FeedEntry {
            id: id.to_string(),
            link: id.to_string(),
            title: title.to_string(),
            published: None,
            description: None,
            category: None,
        }
    }

    fn built_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 5, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_render_channel_and_items() {
        let mut first = entry("https://www.colliers.com/en/news/b", "Industrial portfolio");
        first.published = Some(Utc.with_ymd_and_hms(2026, 2, 4, 0, 0, 0).unwrap());
        first.description = Some("Twelve buildings in Ontario.".to_string());
        first.category = Some("Colliers".to_string());
        let second = entry("https://www.colliers.com/en/news/a", "Office tower");

        let xml = render_rss(&channel(), &[first, second], built_at()).unwrap();

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<rss version=\"2.0\">"));
        assert!(xml.contains("<title>Colliers News (unofficial)</title>"));
        assert!(xml.contains("<language>en</language>"));
        assert!(xml.contains("<lastBuildDate>Thu, 5 Feb 2026 12:00:00 +0000</lastBuildDate>"));
        assert!(xml.contains(
            "<guid isPermaLink=\"false\">https://www.colliers.com/en/news/b</guid>"
        ));
        assert!(xml.contains("<pubDate>Wed, 4 Feb 2026 00:00:00 +0000</pubDate>"));
        assert!(xml.contains("<description>Twelve buildings in Ontario.</description>"));
        assert!(xml.contains("<category>Colliers</category>"));
        assert_eq!(xml.matches("<item>").count(), 2);
        assert_eq!(xml.matches("<pubDate>").count(), 1);

        let b = xml.find("news/b</link>").unwrap();
        let a = xml.find("news/a</link>").unwrap();
        assert!(b < a);
    }

    #[test]
    fn test_render_escapes_markup_and_strips_controls() {
        let item = entry("https://x/a?b=1&c=2", "Sale <closed> & \"done\"\u{0007}");
        let xml = render_rss(&channel(), &[item], built_at()).unwrap();
        assert!(xml.contains("Sale &lt;closed"));
        assert!(!xml.contains("<closed>"));
        assert!(xml.contains("&amp; "));
        assert!(xml.contains("https://x/a?b=1&amp;c=2"));
        assert!(!xml.contains('\u{0007}'));
    }

    #[test]
    fn test_render_empty_feed() {
        let xml = render_rss(&channel(), &[], built_at()).unwrap();
        assert!(xml.contains("<channel>"));
        assert!(!xml.contains("<item>"));
    }

    #[tokio::test]
    async fn test_write_feed_creates_directories() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("docs/nested/feed.xml");
        let path = path.to_str().unwrap();
        write_feed(&channel(), &[entry("https://x/a", "A")], path)
            .await
            .unwrap();
        let written = std::fs::read_to_string(path).unwrap();
        assert!(written.contains("<title>A</title>"));
    }
}
