//! Serialization of store records into view documents
//!
//! These functions only read what the query attached. A missing relation or
//! annotation is a fault of the calling query, reported as a
//! `ReadModelError`, never filled in with a follow-up lookup.

use crate::config::MediaConfig;
use crate::models::{
    CommentView, CommentWithAuthor, PostDetail, PostRecord, PostSummary, TagSummary,
    TagWithCount,
};

use super::read_model::ReadModelError;

/// Number of characters kept in a post teaser
pub const TEASER_CHARS: usize = 200;

/// First `TEASER_CHARS` characters of `text`, cut without regard to words
pub fn teaser(text: &str) -> String {
    match text.char_indices().nth(TEASER_CHARS) {
        Some((idx, _)) => text[..idx].to_string(),
        None => text.to_string(),
    }
}

/// Tag title plus the post count the store annotated
pub fn serialize_tag(tag: &TagWithCount) -> TagSummary {
    TagSummary {
        title: tag.tag.title.clone(),
        posts_with_tag: tag.posts_count,
    }
}

/// Post card. Needs author, tags and comment count attached, and at least
/// one tag for `first_tag_title`.
pub fn serialize_post(
    record: &PostRecord,
    media: &MediaConfig,
) -> Result<PostSummary, ReadModelError> {
    let author = record
        .author
        .as_ref()
        .ok_or(ReadModelError::MissingRelation("author"))?;
    let tags = record
        .tags
        .as_ref()
        .ok_or(ReadModelError::MissingRelation("tags"))?;
    let comments_amount = record
        .comments_count
        .ok_or(ReadModelError::MissingAnnotation("comments_count"))?;
    let first_tag = tags
        .first()
        .ok_or(ReadModelError::MissingRelation("first tag"))?;

    Ok(PostSummary {
        title: record.post.title.clone(),
        teaser_text: teaser(&record.post.text),
        author: author.username.clone(),
        comments_amount,
        image_url: image_url(record, media),
        published_at: record.post.published_at,
        slug: record.post.slug.clone(),
        tags: tags.iter().map(serialize_tag).collect(),
        first_tag_title: first_tag.tag.title.clone(),
    })
}

pub fn serialize_comment(comment: &CommentWithAuthor) -> CommentView {
    CommentView {
        text: comment.comment.text.clone(),
        published_at: comment.comment.published_at,
        author: comment.author.username.clone(),
    }
}

/// Full post. Needs author, tags and like count attached; an untagged post
/// is fine here.
pub fn serialize_post_detail(
    record: &PostRecord,
    comments: &[CommentWithAuthor],
    media: &MediaConfig,
) -> Result<PostDetail, ReadModelError> {
    let author = record
        .author
        .as_ref()
        .ok_or(ReadModelError::MissingRelation("author"))?;
    let tags = record
        .tags
        .as_ref()
        .ok_or(ReadModelError::MissingRelation("tags"))?;
    let likes_amount = record
        .likes_count
        .ok_or(ReadModelError::MissingAnnotation("likes_count"))?;

    Ok(PostDetail {
        title: record.post.title.clone(),
        text: record.post.text.clone(),
        author: author.username.clone(),
        comments: comments.iter().map(serialize_comment).collect(),
        likes_amount,
        image_url: image_url(record, media),
        published_at: record.post.published_at,
        slug: record.post.slug.clone(),
        tags: tags.iter().map(serialize_tag).collect(),
    })
}

fn image_url(record: &PostRecord, media: &MediaConfig) -> Option<String> {
    record
        .post
        .image
        .as_deref()
        .filter(|image| !image.is_empty())
        .map(|image| media.image_url(image))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Author, Comment, Post, Tag};
    use chrono::{TimeZone, Utc};
    use proptest::prelude::*;

    fn post(text: &str) -> Post {
        Post {
            id: 1,
            title: "Hello".to_string(),
            text: text.to_string(),
            slug: "hello".to_string(),
            author_id: 10,
            image: None,
            published_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    fn tags(titles: &[&str]) -> Vec<TagWithCount> {
        titles
            .iter()
            .enumerate()
            .map(|(i, title)| TagWithCount::new(Tag::new(i as i64 + 1, *title), i as i64 + 1))
            .collect()
    }

    fn record(text: &str, tag_titles: &[&str]) -> PostRecord {
        PostRecord {
            post: post(text),
            author: Some(Author::new(10, "alice")),
            tags: Some(tags(tag_titles)),
            comments_count: Some(0),
            likes_count: Some(4),
        }
    }

    #[test]
    fn test_teaser_truncates_long_text() {
        let text = "a".repeat(250);
        let summary = serialize_post(&record(&text, &["python"]), &MediaConfig::default()).unwrap();

        assert_eq!(summary.teaser_text, "a".repeat(200));
        assert_eq!(summary.comments_amount, 0);
    }

    #[test]
    fn test_teaser_counts_characters_not_bytes() {
        let text = "ж".repeat(201);
        let cut = teaser(&text);
        assert_eq!(cut.chars().count(), 200);
        assert!(text.starts_with(&cut));
    }

    #[test]
    fn test_teaser_may_split_words() {
        let text = format!("{}word", "x".repeat(198));
        assert_eq!(teaser(&text), format!("{}wo", "x".repeat(198)));
    }

    #[test]
    fn test_serialize_tag() {
        let tag = TagWithCount::new(Tag::new(1, "python"), 3);
        assert_eq!(
            serialize_tag(&tag),
            TagSummary {
                title: "python".to_string(),
                posts_with_tag: 3,
            }
        );
    }

    #[test]
    fn test_first_tag_title_and_order() {
        let summary = serialize_post(
            &record("text", &["web", "async", "python"]),
            &MediaConfig::default(),
        )
        .unwrap();

        assert_eq!(summary.first_tag_title, "web");
        let titles: Vec<&str> = summary.tags.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["web", "async", "python"]);
    }

    #[test]
    fn test_post_without_tags_is_a_fault() {
        let err = serialize_post(&record("text", &[]), &MediaConfig::default()).unwrap_err();
        assert!(matches!(err, ReadModelError::MissingRelation("first tag")));
    }

    #[test]
    fn test_missing_comment_count_is_a_fault() {
        let mut record = record("text", &["python"]);
        record.comments_count = None;

        let err = serialize_post(&record, &MediaConfig::default()).unwrap_err();
        assert!(matches!(err, ReadModelError::MissingAnnotation("comments_count")));
    }

    #[test]
    fn test_image_url_present_only_with_image() {
        let media = MediaConfig::default();
        let mut with_image = record("text", &["python"]);
        with_image.post.image = Some("covers/cat.png".to_string());

        let summary = serialize_post(&with_image, &media).unwrap();
        assert_eq!(summary.image_url.as_deref(), Some("/media/covers/cat.png"));

        let mut empty_image = record("text", &["python"]);
        empty_image.post.image = Some(String::new());
        assert_eq!(serialize_post(&empty_image, &media).unwrap().image_url, None);
        assert_eq!(serialize_post(&record("text", &["python"]), &media).unwrap().image_url, None);
    }

    #[test]
    fn test_serialize_post_detail() {
        let record = record(&"b".repeat(300), &["python", "web"]);
        let comments = vec![CommentWithAuthor {
            comment: Comment {
                id: 1,
                post_id: 1,
                author_id: 11,
                text: "nice".to_string(),
                published_at: Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap(),
            },
            author: Author::new(11, "bob"),
        }];
        let detail = serialize_post_detail(&record, &comments, &MediaConfig::default()).unwrap();

        assert_eq!(detail.text.chars().count(), 300);
        assert_eq!(detail.likes_amount, 4);
        assert_eq!(detail.comments.len(), 1);
        assert_eq!(detail.comments[0].author, "bob");
        let titles: Vec<&str> = detail.tags.iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, vec!["python", "web"]);
    }

    #[test]
    fn test_post_detail_requires_tags_but_not_a_first_tag() {
        let untagged = record("text", &[]);
        let detail = serialize_post_detail(&untagged, &[], &MediaConfig::default()).unwrap();
        assert!(detail.tags.is_empty());

        let mut missing = record("text", &["python"]);
        missing.tags = None;
        let err = serialize_post_detail(&missing, &[], &MediaConfig::default()).unwrap_err();
        assert!(matches!(err, ReadModelError::MissingRelation("tags")));
    }

    #[test]
    fn test_post_detail_requires_like_count() {
        let mut record = record("text", &["python"]);
        record.likes_count = None;

        let err = serialize_post_detail(&record, &[], &MediaConfig::default()).unwrap_err();
        assert!(matches!(err, ReadModelError::MissingAnnotation("likes_count")));
    }

    proptest! {
        #[test]
        fn teaser_is_bounded_prefix(text in "\\PC{0,400}") {
            let cut = teaser(&text);
            prop_assert!(cut.chars().count() <= TEASER_CHARS);
            prop_assert!(text.starts_with(&cut));
            if text.chars().count() <= TEASER_CHARS {
                prop_assert_eq!(cut, text);
            }
        }

        #[test]
        fn tag_list_keeps_length_and_order(
            titles in proptest::collection::vec("[a-z]{1,12}", 1..10)
        ) {
            let titles: Vec<&str> = titles.iter().map(String::as_str).collect();
            let record = record("text", &titles);
            let summary = serialize_post(&record, &MediaConfig::default()).unwrap();

            prop_assert_eq!(summary.tags.len(), titles.len());
            let serialized: Vec<&str> = summary.tags.iter().map(|t| t.title.as_str()).collect();
            prop_assert_eq!(serialized, titles.clone());
            prop_assert_eq!(summary.first_tag_title.as_str(), titles[0]);
        }
    }
}
