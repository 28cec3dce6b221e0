use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// An account plus its side of the social graph.
///
/// `friends` is a set that remembers insertion order, so a friendship can
/// never be recorded twice. `friend_requests` holds inbound requests only,
/// oldest first.
#[derive(Clone, Debug, Serialize, Deserialize, Default, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub friends: IndexSet<String>,
    #[serde(default)]
    pub friend_requests: Vec<String>,
}

impl User {
    /// Usernames are single tokens: non-empty, no whitespace.
    pub fn is_valid_username(username: &str) -> bool {
        !username.is_empty() && !username.chars().any(char::is_whitespace)
    }

    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            ..Default::default()
        }
    }

    pub fn authenticate(&self, password: impl AsRef<str>) -> bool {
        self.password == password.as_ref()
    }

    pub fn is_friend_with(&self, username: impl AsRef<str>) -> bool {
        self.friends.contains(username.as_ref())
    }

    /// Returns `false` if they were already friends.
    pub fn add_friend(&mut self, username: impl Into<String>) -> bool {
        self.friends.insert(username.into())
    }

    pub fn friends(&self) -> impl Iterator<Item = &str> {
        self.friends.iter().map(String::as_str)
    }

    pub fn has_request_from(&self, username: impl AsRef<str>) -> bool {
        self.friend_requests.iter().any(|r| r == username.as_ref())
    }

    /// Queues a request from `from` unless one is already pending.
    pub fn receive_request(&mut self, from: impl Into<String>) {
        let from = from.into();
        if !self.has_request_from(&from) {
            self.friend_requests.push(from);
        }
    }

    pub fn friend_requests(&self) -> &[String] {
        &self.friend_requests
    }

    /// Validates a 1-based request number without touching the queue.
    pub fn request_at(&self, index: usize) -> Result<&str> {
        index
            .checked_sub(1)
            .and_then(|i| self.friend_requests.get(i))
            .map(String::as_str)
            .ok_or(Error::InvalidSelection {
                index,
                len: self.friend_requests.len(),
            })
    }

    /// Removes and returns the requester at 1-based `index`.
    pub fn take_request(&mut self, index: usize) -> Result<String> {
        self.request_at(index)?;
        Ok(self.friend_requests.remove(index - 1))
    }

    pub(crate) fn withdraw_request(&mut self, from: impl AsRef<str>) {
        self.friend_requests.retain(|r| r != from.as_ref());
    }
}
