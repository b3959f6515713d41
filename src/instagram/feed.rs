//! Typed view of the private-API timeline feed.
//!
//! The feed endpoint returns loosely-shaped JSON (`media_type` 1=photo,
//! 2=video, 8=carousel; renditions under `image_versions2/candidates` and
//! `video_versions`). This module narrows it into `FeedItem` and classifies
//! each post's media into a tagged `MediaItem` list that serializes to the
//! payload shape the website consumes.

use serde_json::{json, Value};

/// A single media entry of a post, classified by kind.
///
/// Videos always carry a `first_frame` thumbnail next to the playable url.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaItem {
    Image { url: String },
    Video { url: String, first_frame: String },
}

impl MediaItem {
    pub fn is_video(&self) -> bool {
        matches!(self, MediaItem::Video { .. })
    }

    /// Serialize to the legacy payload shape (`url`, `first_frame`,
    /// `isImage`, `isVideo` keys).
    pub fn to_json(&self) -> Value {
        match self {
            MediaItem::Image { url } => json!({
                "url": url,
                "isImage": true,
                "isVideo": false,
            }),
            MediaItem::Video { url, first_frame } => json!({
                "url": url,
                "first_frame": first_frame,
                "isImage": false,
                "isVideo": true,
            }),
        }
    }

    /// Parse a payload media entry back into the tagged form.
    pub fn from_json(value: &Value) -> Option<MediaItem> {
        let url = value.get("url")?.as_str()?.to_string();
        if value.get("isVideo").and_then(|v| v.as_bool()).unwrap_or(false) {
            let first_frame = value
                .get("first_frame")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string();
            Some(MediaItem::Video { url, first_frame })
        } else {
            Some(MediaItem::Image { url })
        }
    }
}

/// One entry of a carousel post.
#[derive(Debug, Clone, Default)]
pub struct CarouselEntry {
    /// First `image_versions2` candidate url (also the video thumbnail)
    pub image_url: Option<String>,
    /// First `video_versions` rendition url, when the entry is a video
    pub video_url: Option<String>,
}

/// A timeline feed item, as much of it as the mirror needs.
#[derive(Debug, Clone, Default)]
pub struct FeedItem {
    /// External post id (the dedup key, e.g. `3141592653589793238_4661`)
    pub id: String,
    /// Shortcode used in the permalink
    pub code: String,
    /// Source-provided timestamp (device_timestamp, falls back to taken_at)
    pub taken_at: i64,
    /// Caption text, when the post has one
    pub caption: Option<String>,
    /// First image candidate of the post itself
    pub image_url: Option<String>,
    /// First video rendition of the post itself
    pub video_url: Option<String>,
    /// Carousel entries, empty for simple posts
    pub carousel: Vec<CarouselEntry>,
}

fn first_image_candidate(node: &Value) -> Option<String> {
    node.pointer("/image_versions2/candidates/0/url")
        .and_then(|v| v.as_str())
        .map(String::from)
}

fn first_video_version(node: &Value) -> Option<String> {
    node.pointer("/video_versions/0/url")
        .and_then(|v| v.as_str())
        .map(String::from)
}

impl FeedItem {
    /// Parse a feed item from the API JSON. Returns `None` when the node
    /// lacks an id or shortcode (ads and suggestion units do).
    pub fn from_json(item: &Value) -> Option<FeedItem> {
        let id = item
            .get("id")
            .or_else(|| item.get("pk"))
            .map(|v| match v {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                _ => String::new(),
            })
            .filter(|s| !s.is_empty())?;
        let code = item.get("code")?.as_str()?.to_string();

        let taken_at = item
            .get("device_timestamp")
            .or_else(|| item.get("taken_at"))
            .and_then(|v| v.as_i64())
            .unwrap_or(0);

        let caption = item
            .pointer("/caption/text")
            .and_then(|v| v.as_str())
            .map(String::from);

        let carousel = item
            .get("carousel_media")
            .and_then(|v| v.as_array())
            .map(|entries| {
                entries
                    .iter()
                    .map(|node| CarouselEntry {
                        image_url: first_image_candidate(node),
                        video_url: first_video_version(node),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Some(FeedItem {
            id,
            code,
            taken_at,
            caption,
            image_url: first_image_candidate(item),
            video_url: first_video_version(item),
            carousel,
        })
    }

    /// Permalink to the post on instagram.com.
    pub fn permalink(&self) -> String {
        format!("https://www.instagram.com/p/{}/", self.code)
    }

    pub fn is_carousel(&self) -> bool {
        !self.carousel.is_empty()
    }
}

/// Classify a post's media into an ordered list of tagged items.
///
/// Carousels yield one entry per sub-item (order preserved), classified by
/// per-item video-rendition presence. A single video yields one `Video`
/// entry; anything else yields one `Image` entry. Missing rendition urls
/// degrade to empty strings rather than dropping the entry, so a carousel
/// of N sub-items always yields N media items.
pub fn classify_media(item: &FeedItem) -> Vec<MediaItem> {
    if item.is_carousel() {
        item.carousel
            .iter()
            .map(|entry| {
                if let Some(video_url) = &entry.video_url {
                    MediaItem::Video {
                        url: video_url.clone(),
                        first_frame: entry.image_url.clone().unwrap_or_default(),
                    }
                } else {
                    MediaItem::Image {
                        url: entry.image_url.clone().unwrap_or_default(),
                    }
                }
            })
            .collect()
    } else if let Some(video_url) = &item.video_url {
        vec![MediaItem::Video {
            url: video_url.clone(),
            first_frame: item.image_url.clone().unwrap_or_default(),
        }]
    } else {
        vec![MediaItem::Image {
            url: item.image_url.clone().unwrap_or_default(),
        }]
    }
}

/// The structured payload stored alongside each post row.
#[derive(Debug, Clone, PartialEq)]
pub struct PostPayload {
    pub media: Vec<MediaItem>,
    /// Caption text; empty string when the post has none, never null
    pub caption: String,
    pub posted_at: i64,
}

impl PostPayload {
    /// Build the payload for a feed item: classified media list, caption
    /// (empty when absent) and the source-provided timestamp.
    pub fn from_item(item: &FeedItem) -> PostPayload {
        PostPayload {
            media: classify_media(item),
            caption: item.caption.clone().unwrap_or_default(),
            posted_at: item.taken_at,
        }
    }

    pub fn to_json(&self) -> Value {
        json!({
            "media": self.media.iter().map(MediaItem::to_json).collect::<Vec<_>>(),
            "caption": self.caption,
            "posted_at": self.posted_at,
        })
    }

    pub fn from_json(value: &Value) -> Option<PostPayload> {
        let media = value
            .get("media")?
            .as_array()?
            .iter()
            .filter_map(MediaItem::from_json)
            .collect();
        Some(PostPayload {
            media,
            caption: value
                .get("caption")
                .and_then(|v| v.as_str())
                .unwrap_or("")
                .to_string(),
            posted_at: value.get("posted_at").and_then(|v| v.as_i64()).unwrap_or(0),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn image_node(url: &str) -> Value {
        json!({ "image_versions2": { "candidates": [{ "url": url }] } })
    }

    fn video_node(video_url: &str, thumb_url: &str) -> Value {
        json!({
            "image_versions2": { "candidates": [{ "url": thumb_url }] },
            "video_versions": [{ "url": video_url }],
        })
    }

    #[test]
    fn parses_simple_image_item() {
        let mut node = image_node("https://cdn.example/a.jpg");
        node["id"] = json!("111_42");
        node["code"] = json!("AbCdEf");
        node["device_timestamp"] = json!(1700000000i64);
        node["caption"] = json!({ "text": "hello" });

        let item = FeedItem::from_json(&node).expect("must parse");
        assert_eq!(item.id, "111_42");
        assert_eq!(item.permalink(), "https://www.instagram.com/p/AbCdEf/");
        assert_eq!(item.taken_at, 1700000000);
        assert_eq!(item.caption.as_deref(), Some("hello"));
        assert!(!item.is_carousel());
    }

    #[test]
    fn item_without_code_is_skipped() {
        let node = json!({ "id": "111_42" });
        assert!(FeedItem::from_json(&node).is_none());
    }

    #[test]
    fn numeric_pk_is_stringified() {
        let mut node = image_node("https://cdn.example/a.jpg");
        node["pk"] = json!(31415926535i64);
        node["code"] = json!("XyZ");
        let item = FeedItem::from_json(&node).expect("must parse");
        assert_eq!(item.id, "31415926535");
    }

    #[test]
    fn classify_single_image() {
        let mut node = image_node("https://cdn.example/a.jpg");
        node["id"] = json!("1");
        node["code"] = json!("a");
        let item = FeedItem::from_json(&node).unwrap();

        let media = classify_media(&item);
        assert_eq!(
            media,
            vec![MediaItem::Image {
                url: "https://cdn.example/a.jpg".to_string()
            }]
        );
    }

    #[test]
    fn classify_single_video_has_url_and_first_frame() {
        let mut node = video_node("https://cdn.example/v.mp4", "https://cdn.example/v.jpg");
        node["id"] = json!("2");
        node["code"] = json!("b");
        let item = FeedItem::from_json(&node).unwrap();

        let media = classify_media(&item);
        assert_eq!(media.len(), 1);
        assert_eq!(
            media[0],
            MediaItem::Video {
                url: "https://cdn.example/v.mp4".to_string(),
                first_frame: "https://cdn.example/v.jpg".to_string(),
            }
        );
    }

    #[test]
    fn classify_carousel_preserves_count_and_order() {
        let mut node = json!({
            "id": "3",
            "code": "c",
            "carousel_media": [
                image_node("https://cdn.example/1.jpg"),
                video_node("https://cdn.example/2.mp4", "https://cdn.example/2.jpg"),
                image_node("https://cdn.example/3.jpg"),
            ],
        });
        // Carousel posts also carry top-level renditions of the cover item;
        // classification must ignore them in favor of the per-entry ones.
        node["image_versions2"] = json!({ "candidates": [{ "url": "https://cdn.example/cover.jpg" }] });

        let item = FeedItem::from_json(&node).unwrap();
        let media = classify_media(&item);
        assert_eq!(media.len(), 3);
        assert!(!media[0].is_video());
        assert!(media[1].is_video());
        assert!(!media[2].is_video());
        assert_eq!(
            media[1],
            MediaItem::Video {
                url: "https://cdn.example/2.mp4".to_string(),
                first_frame: "https://cdn.example/2.jpg".to_string(),
            }
        );
    }

    #[test]
    fn payload_caption_defaults_to_empty_string() {
        let mut node = image_node("https://cdn.example/a.jpg");
        node["id"] = json!("4");
        node["code"] = json!("d");
        let item = FeedItem::from_json(&node).unwrap();

        let payload = PostPayload::from_item(&item);
        assert_eq!(payload.caption, "");
        assert_eq!(payload.to_json()["caption"], json!(""));
    }

    #[test]
    fn payload_json_keeps_legacy_media_keys() {
        let payload = PostPayload {
            media: vec![
                MediaItem::Image {
                    url: "https://cdn.example/a.jpg".to_string(),
                },
                MediaItem::Video {
                    url: "https://cdn.example/v.mp4".to_string(),
                    first_frame: "https://cdn.example/v.jpg".to_string(),
                },
            ],
            caption: "caption".to_string(),
            posted_at: 1700000000,
        };

        let value = payload.to_json();
        assert_eq!(value["media"][0]["isImage"], json!(true));
        assert_eq!(value["media"][0]["isVideo"], json!(false));
        assert_eq!(value["media"][1]["isVideo"], json!(true));
        assert_eq!(value["media"][1]["first_frame"], json!("https://cdn.example/v.jpg"));
        assert_eq!(value["posted_at"], json!(1700000000));

        // Round-trips back into the tagged form
        assert_eq!(PostPayload::from_json(&value), Some(payload));
    }
}
