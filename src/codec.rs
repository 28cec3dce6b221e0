//! Record formats for `users.txt` and `posts.txt`.
//!
//! `Format::Lines` is the original flat layout: one field per line, with
//! decimal counts in front of each nested list. It cannot hold line breaks,
//! so encoding refuses them rather than writing a file that reads back
//! differently. `Format::Json` stores one JSON object per line and has no
//! such restriction.

use std::collections::HashMap;
use std::fmt::{self, Display, Write};
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use crate::user::User;
use crate::{Comment, Post};

#[derive(Debug, Error)]
pub enum CodecError {
    #[error("line {line}: {reason}")]
    Corrupt { line: usize, reason: String },

    #[error("{field} {value:?} contains a line break, which the line format cannot store")]
    Unencodable { field: &'static str, value: String },

    #[error("failed to serialize record: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(Eq, PartialEq, Copy, Clone, Debug, Default)]
pub enum Format {
    Lines,
    #[default]
    Json,
}

impl Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Format::Lines => "lines",
            Format::Json => "json",
        })
    }
}

impl FromStr for Format {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lines" => Ok(Format::Lines),
            "json" => Ok(Format::Json),
            other => Err(format!("unknown format '{other}' (expected 'lines' or 'json')")),
        }
    }
}

impl Format {
    /// Whether a free-text field survives a round trip through this format.
    pub fn can_store(self, value: &str) -> bool {
        match self {
            Format::Lines => !value.contains(['\n', '\r']),
            Format::Json => true,
        }
    }

    pub fn encode_users(self, users: &[User]) -> Result<String, CodecError> {
        match self {
            Format::Lines => {
                let mut out = String::new();
                for user in users {
                    push_field(&mut out, "username", &user.username)?;
                    push_field(&mut out, "password", &user.password)?;
                    push_count(&mut out, user.friends.len());
                    for friend in &user.friends {
                        push_field(&mut out, "friend", friend)?;
                    }
                    push_count(&mut out, user.friend_requests.len());
                    for from in &user.friend_requests {
                        push_field(&mut out, "friend request", from)?;
                    }
                }
                Ok(out)
            }
            Format::Json => encode_json(users),
        }
    }

    pub fn decode_users(self, text: &str) -> Result<Vec<User>, CodecError> {
        let records = match self {
            Format::Lines => {
                let mut fields = Fields::new(text);
                let mut records = Vec::new();
                while !fields.at_end() {
                    let username = fields.field("username")?;
                    let start = fields.line;
                    let mut user = User::new(username, fields.field("password")?);
                    for _ in 0..fields.count("friend count")? {
                        user.add_friend(fields.field("friend")?);
                    }
                    for _ in 0..fields.count("friend request count")? {
                        user.friend_requests.push(fields.field("friend request")?.to_string());
                    }
                    records.push((start, user));
                }
                records
            }
            Format::Json => decode_json(text)?,
        };
        check_usernames(records)
    }

    pub fn encode_posts(self, posts: &[Post]) -> Result<String, CodecError> {
        match self {
            Format::Lines => {
                let mut out = String::new();
                for post in posts {
                    push_field(&mut out, "author", &post.author)?;
                    push_field(&mut out, "post content", &post.content)?;
                    push_count(&mut out, post.comments.len());
                    for comment in &post.comments {
                        push_field(&mut out, "comment author", &comment.author)?;
                        push_field(&mut out, "comment content", &comment.content)?;
                    }
                }
                Ok(out)
            }
            Format::Json => encode_json(posts),
        }
    }

    pub fn decode_posts(self, text: &str) -> Result<Vec<Post>, CodecError> {
        match self {
            Format::Lines => {
                let mut fields = Fields::new(text);
                let mut posts = Vec::new();
                while !fields.at_end() {
                    let mut post = Post::new(fields.field("author")?, fields.field("post content")?);
                    for _ in 0..fields.count("comment count")? {
                        let author = fields.field("comment author")?;
                        post.comments.push(Comment::new(author, fields.field("comment content")?));
                    }
                    posts.push(post);
                }
                Ok(posts)
            }
            Format::Json => Ok(decode_json::<Post>(text)?.into_iter().map(|(_, p)| p).collect()),
        }
    }
}

fn push_field(out: &mut String, field: &'static str, value: &str) -> Result<(), CodecError> {
    if !Format::Lines.can_store(value) {
        return Err(CodecError::Unencodable {
            field,
            value: value.to_string(),
        });
    }
    out.push_str(value);
    out.push('\n');
    Ok(())
}

fn push_count(out: &mut String, count: usize) {
    let _ = writeln!(out, "{count}");
}

fn encode_json<T: Serialize>(records: &[T]) -> Result<String, CodecError> {
    let mut out = String::new();
    for record in records {
        out.push_str(&serde_json::to_string(record)?);
        out.push('\n');
    }
    Ok(out)
}

/// Decodes every non-blank line, keeping its 1-based line number.
fn decode_json<T: DeserializeOwned>(text: &str) -> Result<Vec<(usize, T)>, CodecError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(i, line)| {
            serde_json::from_str(line)
                .map(|record| (i + 1, record))
                .map_err(|e| CodecError::Corrupt {
                    line: i + 1,
                    reason: e.to_string(),
                })
        })
        .collect()
}

fn check_usernames(records: Vec<(usize, User)>) -> Result<Vec<User>, CodecError> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut users = Vec::with_capacity(records.len());
    for (line, user) in records {
        if !User::is_valid_username(&user.username) {
            return Err(CodecError::Corrupt {
                line,
                reason: format!("invalid username {:?}", user.username),
            });
        }
        if let Some(first) = seen.insert(user.username.clone(), line) {
            return Err(CodecError::Corrupt {
                line,
                reason: format!("duplicate username '{}' (first defined on line {first})", user.username),
            });
        }
        users.push(user);
    }
    Ok(users)
}

/// Sequential reader over the lines of a `Format::Lines` file. `line` is the
/// 1-based number of the last line handed out.
struct Fields<'a> {
    lines: std::iter::Enumerate<std::str::Lines<'a>>,
    line: usize,
}

impl<'a> Fields<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines().enumerate(),
            line: 0,
        }
    }

    /// True once only blank lines remain.
    fn at_end(&self) -> bool {
        self.lines.clone().all(|(_, line)| line.is_empty())
    }

    fn field(&mut self, what: &str) -> Result<&'a str, CodecError> {
        match self.lines.next() {
            Some((i, line)) => {
                self.line = i + 1;
                Ok(line)
            }
            None => Err(CodecError::Corrupt {
                line: self.line + 1,
                reason: format!("unexpected end of file, expected {what}"),
            }),
        }
    }

    fn count(&mut self, what: &str) -> Result<usize, CodecError> {
        let raw = self.field(what)?;
        raw.trim().parse().map_err(|_| CodecError::Corrupt {
            line: self.line,
            reason: format!("expected {what}, found {raw:?}"),
        })
    }
}
