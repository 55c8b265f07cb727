//! Community forum: posts, comments, likes and tags.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AuthError, CoreError, Result, ValidationError};
use crate::schedule::new_id;
use crate::storage::database::{self, collections, DocumentStore};
use crate::storage::{User, DEFAULT_AVATAR_BASE};

const SEEDED_KEY: &str = "forum_seeded";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumComment {
    pub id: String,
    pub author: String,
    #[serde(default)]
    pub author_avatar: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForumPost {
    pub id: String,
    pub author: String,
    #[serde(default)]
    pub author_avatar: String,
    pub title: String,
    pub content: String,
    /// Usernames that liked the post.
    #[serde(default)]
    pub likes: Vec<String>,
    #[serde(default)]
    pub comments: Vec<ForumComment>,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub tags: Vec<String>,
}

/// A tag and how many posts carry it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagCount {
    pub tag: String,
    pub count: usize,
}

/// Split a comma-separated tag list, trimming and dropping empties.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

/// Tag usage, most used first. Ties keep first-seen order.
pub fn tag_counts(posts: &[ForumPost]) -> Vec<TagCount> {
    let mut counts: Vec<TagCount> = Vec::new();
    for tag in posts.iter().flat_map(|p| &p.tags) {
        match counts.iter_mut().find(|c| &c.tag == tag) {
            Some(c) => c.count += 1,
            None => counts.push(TagCount {
                tag: tag.clone(),
                count: 1,
            }),
        }
    }
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

pub fn filter_by_tag<'p>(posts: &'p [ForumPost], tag: &str) -> Vec<&'p ForumPost> {
    posts.iter().filter(|p| p.tags.iter().any(|t| t == tag)).collect()
}

fn seed_posts(now: DateTime<Utc>) -> Vec<ForumPost> {
    vec![
        ForumPost {
            id: "post-2".into(),
            author: "hacker_lor".into(),
            author_avatar: format!("{DEFAULT_AVATAR_BASE}hacker"),
            title: "Làm sao để tập trung khi học Coding?".into(),
            content: "Mình thường xuyên bị xao nhãng bởi Facebook khi đang code. Có ai dùng phương pháp Pomodoro kết hợp với chặn web không? Cho mình xin review với.".into(),
            likes: vec![],
            comments: vec![ForumComment {
                id: "c-1".into(),
                author: "study_mate".into(),
                author_avatar: format!("{DEFAULT_AVATAR_BASE}study"),
                content: "Mình đang dùng extension Forest, khá hiệu quả đó bạn.".into(),
                created_at: now,
            }],
            created_at: now - Duration::hours(1),
            tags: vec!["Hỏi đáp".into(), "Kỹ năng mềm".into()],
        },
        ForumPost {
            id: "post-3".into(),
            author: "design_pro".into(),
            author_avatar: format!("{DEFAULT_AVATAR_BASE}design"),
            title: "Chia sẻ tài liệu học UX/UI cơ bản".into(),
            content: "Chào mọi người, mình mới tìm được bộ tài liệu Google UX Design Certificate miễn phí. Ai cần thì comment email mình gửi nhé!".into(),
            likes: vec!["user1".into(), "hacker_lor".into()],
            comments: vec![],
            created_at: now - Duration::hours(2),
            tags: vec!["Chia sẻ".into(), "Tài liệu".into()],
        },
    ]
}

/// Forum operations over a [`DocumentStore`].
pub struct Forum<'a> {
    store: &'a dyn DocumentStore,
}

impl<'a> Forum<'a> {
    pub fn new(store: &'a dyn DocumentStore) -> Self {
        Self { store }
    }

    /// All posts, newest first. Seeds the sample posts on first use.
    pub fn posts(&self) -> Result<Vec<ForumPost>> {
        self.seed_once()?;
        let mut posts: Vec<ForumPost> = database::load_all(self.store, collections::FORUM_POSTS)?;
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(posts)
    }

    pub fn post(&self, id: &str) -> Result<ForumPost> {
        self.seed_once()?;
        database::load(self.store, collections::FORUM_POSTS, id)?
            .ok_or_else(|| CoreError::not_found("post", id))
    }

    pub fn create_post(&self, author: &User, title: &str, content: &str, tags: &str) -> Result<ForumPost> {
        if title.trim().is_empty() {
            return Err(ValidationError::MissingField("title".into()).into());
        }
        if content.trim().is_empty() {
            return Err(ValidationError::MissingField("content".into()).into());
        }
        self.seed_once()?;

        let post = ForumPost {
            id: new_id(),
            author: author.username.clone(),
            author_avatar: author.avatar.clone(),
            title: title.to_string(),
            content: content.to_string(),
            likes: Vec::new(),
            comments: Vec::new(),
            created_at: Utc::now(),
            tags: parse_tags(tags),
        };
        self.save(&post)?;
        tracing::info!(post = %post.id, author = %post.author, "post created");
        Ok(post)
    }

    pub fn add_comment(&self, post_id: &str, author: &User, content: &str) -> Result<ForumPost> {
        if content.trim().is_empty() {
            return Err(ValidationError::MissingField("content".into()).into());
        }
        let mut post = self.post(post_id)?;
        post.comments.push(ForumComment {
            id: new_id(),
            author: author.username.clone(),
            author_avatar: author.avatar.clone(),
            content: content.to_string(),
            created_at: Utc::now(),
        });
        self.save(&post)?;
        Ok(post)
    }

    /// Like or unlike on behalf of `username`.
    pub fn toggle_like(&self, post_id: &str, username: &str) -> Result<ForumPost> {
        let mut post = self.post(post_id)?;
        if let Some(pos) = post.likes.iter().position(|u| u == username) {
            post.likes.remove(pos);
        } else {
            post.likes.push(username.to_string());
        }
        self.save(&post)?;
        Ok(post)
    }

    /// Only the author may delete a post.
    pub fn delete_post(&self, post_id: &str, username: &str) -> Result<()> {
        let post = self.post(post_id)?;
        if post.author != username {
            return Err(AuthError::NotOwner("post").into());
        }
        self.store.delete(collections::FORUM_POSTS, post_id)?;
        Ok(())
    }

    fn seed_once(&self) -> Result<()> {
        if self.store.kv_get(SEEDED_KEY)?.is_some() {
            return Ok(());
        }
        for post in seed_posts(Utc::now()) {
            self.save(&post)?;
        }
        self.store.kv_set(SEEDED_KEY, "1")?;
        tracing::debug!("seeded forum posts");
        Ok(())
    }

    fn save(&self, post: &ForumPost) -> Result<()> {
        database::save(self.store, collections::FORUM_POSTS, &post.id, post)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{AuthService, SqliteStore};

    fn user(db: &SqliteStore, name: &str) -> User {
        AuthService::new(db).register(name, "pw").unwrap()
    }

    #[test]
    fn first_read_seeds_two_posts_once() {
        let db = SqliteStore::open_memory().unwrap();
        let forum = Forum::new(&db);
        let posts = forum.posts().unwrap();
        let ids: Vec<_> = posts.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, ["post-2", "post-3"]);

        // Deleting seeds does not bring them back.
        db.delete(collections::FORUM_POSTS, "post-2").unwrap();
        assert_eq!(forum.posts().unwrap().len(), 1);
    }

    #[test]
    fn new_post_is_listed_first_with_parsed_tags() {
        let db = SqliteStore::open_memory().unwrap();
        let lan = user(&db, "lan");
        let forum = Forum::new(&db);
        let post = forum
            .create_post(&lan, "Mẹo ôn thi", "Dùng flashcard", " Chia sẻ, ,Tài liệu ,")
            .unwrap();
        assert_eq!(post.tags, ["Chia sẻ", "Tài liệu"]);
        assert_eq!(post.author_avatar, lan.avatar);
        assert_eq!(forum.posts().unwrap()[0].id, post.id);
    }

    #[test]
    fn title_and_content_required() {
        let db = SqliteStore::open_memory().unwrap();
        let lan = user(&db, "lan");
        let forum = Forum::new(&db);
        assert!(forum.create_post(&lan, "", "body", "").is_err());
        assert!(forum.create_post(&lan, "title", "  ", "").is_err());
    }

    #[test]
    fn comments_require_text() {
        let db = SqliteStore::open_memory().unwrap();
        let lan = user(&db, "lan");
        let forum = Forum::new(&db);
        assert!(forum.add_comment("post-3", &lan, "   ").is_err());
        let post = forum.add_comment("post-3", &lan, "Cho mình xin với!").unwrap();
        assert_eq!(post.comments.len(), 1);
        assert_eq!(post.comments[0].author, "lan");
    }

    #[test]
    fn like_toggles_per_user() {
        let db = SqliteStore::open_memory().unwrap();
        let forum = Forum::new(&db);
        let post = forum.toggle_like("post-3", "hacker_lor").unwrap();
        assert_eq!(post.likes, ["user1"]);
        let post = forum.toggle_like("post-3", "hacker_lor").unwrap();
        assert_eq!(post.likes, ["user1", "hacker_lor"]);
        assert!(forum.toggle_like("missing", "x").is_err());
    }

    #[test]
    fn only_author_deletes() {
        let db = SqliteStore::open_memory().unwrap();
        let lan = user(&db, "lan");
        let forum = Forum::new(&db);
        let post = forum.create_post(&lan, "t", "c", "").unwrap();
        assert!(matches!(
            forum.delete_post(&post.id, "someone_else"),
            Err(CoreError::Auth(AuthError::NotOwner(_)))
        ));
        forum.delete_post(&post.id, "lan").unwrap();
        assert!(forum.post(&post.id).is_err());
    }

    #[test]
    fn tags_counted_and_filtered() {
        let db = SqliteStore::open_memory().unwrap();
        let lan = user(&db, "lan");
        let forum = Forum::new(&db);
        forum.create_post(&lan, "a", "a", "Tài liệu, Toán").unwrap();
        let posts = forum.posts().unwrap();

        let counts = tag_counts(&posts);
        assert_eq!(counts[0], TagCount { tag: "Tài liệu".into(), count: 2 });
        assert_eq!(counts.len(), 5);

        assert_eq!(filter_by_tag(&posts, "Toán").len(), 1);
        assert_eq!(filter_by_tag(&posts, "Tài liệu").len(), 2);
        assert!(filter_by_tag(&posts, "none").is_empty());
    }
}
