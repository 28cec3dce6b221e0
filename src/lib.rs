pub mod codec;
pub mod error;
pub mod graph;
pub mod storage;
pub mod user;

use std::fmt::Write;

use serde::{Deserialize, Serialize};

pub use codec::{CodecError, Format};
pub use error::{Error, Result};
pub use graph::SocialGraph;
pub use storage::DataFiles;
pub use user::User;

#[derive(Eq, PartialEq, Clone, Debug, Serialize, Deserialize, Default)]
pub struct Comment {
    pub author: String,
    pub content: String,
}
impl Comment {
    pub fn new(author: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            content: content.into(),
        }
    }
    pub fn render(&self) -> String {
        format!("     - {}: {}", self.author, self.content)
    }
}

#[derive(Eq, PartialEq, Clone, Debug, Serialize, Deserialize, Default)]
pub struct Post {
    pub author: String,
    pub content: String,
    #[serde(default)]
    pub comments: Vec<Comment>,
}
impl Post {
    pub fn new(author: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            author: author.into(),
            content: content.into(),
            comments: Vec::new(),
        }
    }
    pub fn add_comment(&mut self, author: impl Into<String>, content: impl Into<String>) {
        self.comments.push(Comment::new(author, content));
    }
    /// Formats the post for display. `display_index` is 1-based and only used
    /// for numbering; posts carry no stored identifier.
    pub fn render(&self, display_index: usize) -> String {
        let mut out = format!("{}. {}: {}\n", display_index, self.author, self.content);
        if !self.comments.is_empty() {
            out.push_str("   Comments:\n");
            for comment in &self.comments {
                let _ = writeln!(out, "{}", comment.render());
            }
        }
        out
    }
}

/// Proof of a successful login. Dashboard operations take one of these and
/// resolve it to the user record on every call.
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct Session {
    username: String,
}
impl Session {
    pub(crate) fn new(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
        }
    }
    pub fn username(&self) -> &str {
        &self.username
    }
}
impl AsRef<str> for Session {
    fn as_ref(&self) -> &str {
        &self.username
    }
}
