use clap::Subcommand;
use smartstudy_core::forum::{self, Forum};
use smartstudy_core::SqliteStore;

use super::{current_user, print_json, CliResult};

#[derive(Subcommand)]
pub enum ForumAction {
    /// List posts, newest first
    List {
        /// Only posts carrying this tag
        #[arg(long)]
        tag: Option<String>,
    },
    /// Print one post with its comments
    Show {
        id: String,
    },
    /// Publish a post
    Post {
        title: String,
        content: String,
        /// Comma-separated tags
        #[arg(long, default_value = "")]
        tags: String,
    },
    /// Comment on a post
    Comment {
        id: String,
        content: String,
    },
    /// Like or unlike a post
    Like {
        id: String,
    },
    /// Delete one of your own posts
    Delete {
        id: String,
    },
    /// Tags by how many posts use them
    Tags,
}

pub fn run(action: ForumAction) -> CliResult {
    let db = SqliteStore::open()?;
    let board = Forum::new(&db);

    match action {
        ForumAction::List { tag } => {
            let posts = board.posts()?;
            match tag {
                Some(tag) => print_json(&forum::filter_by_tag(&posts, &tag)),
                None => print_json(&posts),
            }
        }
        ForumAction::Show { id } => print_json(&board.post(&id)?),
        ForumAction::Post { title, content, tags } => {
            let user = current_user(&db)?;
            print_json(&board.create_post(&user, &title, &content, &tags)?)
        }
        ForumAction::Comment { id, content } => {
            let user = current_user(&db)?;
            print_json(&board.add_comment(&id, &user, &content)?)
        }
        ForumAction::Like { id } => {
            let user = current_user(&db)?;
            let post = board.toggle_like(&id, &user.username)?;
            println!("{} likes", post.likes.len());
            Ok(())
        }
        ForumAction::Delete { id } => {
            let user = current_user(&db)?;
            board.delete_post(&id, &user.username)?;
            println!("Post deleted: {id}");
            Ok(())
        }
        ForumAction::Tags => print_json(&forum::tag_counts(&board.posts()?)),
    }
}
