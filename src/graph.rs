use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::user::User;
use crate::{Post, Session};

pub const NO_POSTS: &str = "No posts available.";

/// All users and posts held in memory for the lifetime of the process.
///
/// Users are keyed by username; posts are addressed by their 1-based
/// position, which is stable because nothing is ever deleted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SocialGraph {
    users: Vec<User>,
    posts: Vec<Post>,
}

impl SocialGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a graph from already-decoded records. Username uniqueness is
    /// checked by the decoder.
    pub fn from_parts(users: Vec<User>, posts: Vec<Post>) -> Self {
        Self { users, posts }
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn posts(&self) -> &[Post] {
        &self.posts
    }

    pub fn user(&self, username: impl AsRef<str>) -> Option<&User> {
        let username = username.as_ref();
        self.users.iter().find(|u| u.username == username)
    }

    fn position(&self, username: &str) -> Result<usize> {
        self.users
            .iter()
            .position(|u| u.username == username)
            .ok_or_else(|| Error::UserNotFound(username.to_string()))
    }

    fn session_user(&self, session: &Session) -> Result<&User> {
        self.user(session).ok_or_else(|| Error::UserNotFound(session.username().to_string()))
    }

    fn user_mut(&mut self, username: impl AsRef<str>, func: impl FnOnce(&mut User)) -> Result<()> {
        let idx = self.position(username.as_ref())?;
        func(&mut self.users[idx]);
        Ok(())
    }

    fn try_user_mut<T>(&mut self, username: impl AsRef<str>, func: impl FnOnce(&mut User) -> Result<T>) -> Result<T> {
        let idx = self.position(username.as_ref())?;
        func(&mut self.users[idx])
    }

    pub fn signup(&mut self, username: impl Into<String>, password: impl Into<String>) -> Result<()> {
        let username = username.into();
        if !User::is_valid_username(&username) {
            return Err(Error::InvalidUsername(username));
        }
        if self.user(&username).is_some() {
            warn!(%username, "signup rejected: username taken");
            return Err(Error::DuplicateUsername(username));
        }
        debug!(%username, "user signed up");
        self.users.push(User::new(username, password));
        Ok(())
    }

    pub fn login(&self, username: impl AsRef<str>, password: impl AsRef<str>) -> Result<Session> {
        let username = username.as_ref();
        match self.user(username) {
            Some(user) if user.authenticate(password.as_ref()) => {
                debug!(%username, "login");
                Ok(Session::new(username))
            }
            _ => {
                warn!(%username, "login rejected");
                Err(Error::InvalidCredentials)
            }
        }
    }

    pub fn create_post(&mut self, session: &Session, content: impl Into<String>) -> Result<&Post> {
        let author = self.session_user(session)?.username.clone();
        self.posts.push(Post::new(author, content));
        debug!(author = session.username(), index = self.posts.len(), "post created");
        Ok(&self.posts[self.posts.len() - 1])
    }

    /// Appends a comment by the session's user to the post at 1-based `post_index`.
    pub fn add_comment(&mut self, session: &Session, post_index: usize, content: impl Into<String>) -> Result<()> {
        let author = self.session_user(session)?.username.clone();
        let len = self.posts.len();
        let post = post_index
            .checked_sub(1)
            .and_then(|i| self.posts.get_mut(i))
            .ok_or(Error::InvalidSelection { index: post_index, len })?;
        post.add_comment(author, content);
        debug!(author = session.username(), post_index, "comment added");
        Ok(())
    }

    pub fn send_friend_request(&mut self, session: &Session, target: impl AsRef<str>) -> Result<()> {
        let target = target.as_ref();
        let from = self.session_user(session)?;
        if from.username == target {
            return Err(Error::SelfRequest);
        }
        let caller_has_target = from.is_friend_with(target);
        let from = from.username.clone();
        self.try_user_mut(target, |user| {
            if caller_has_target || user.is_friend_with(&from) {
                return Err(Error::AlreadyFriends(target.to_string()));
            }
            user.receive_request(from.as_str());
            Ok(())
        })?;
        debug!(%from, to = target, "friend request sent");
        Ok(())
    }

    pub fn friend_requests(&self, session: &Session) -> Result<&[String]> {
        Ok(self.session_user(session)?.friend_requests())
    }

    /// Accepts the pending request at 1-based `index` and records the
    /// friendship on both users. Returns the new friend's username.
    pub fn accept_friend_request(&mut self, session: &Session, index: usize) -> Result<String> {
        let me = self.session_user(session)?;
        let requester = me.request_at(index)?.to_string();
        let me = me.username.clone();
        self.position(&requester)?;

        self.try_user_mut(&me, |user| {
            user.take_request(index)?;
            user.add_friend(requester.as_str());
            Ok(())
        })?;
        self.user_mut(&requester, |user| {
            user.add_friend(me.as_str());
            user.withdraw_request(&me);
        })?;
        debug!(user = %me, friend = %requester, "friend request accepted");
        Ok(requester)
    }

    pub fn friends(&self, session: &Session) -> Result<Vec<&str>> {
        Ok(self.session_user(session)?.friends().collect())
    }

    /// Every post rendered in order, or the "no posts" line when there are none.
    pub fn render_posts(&self) -> String {
        if self.posts.is_empty() {
            return format!("{NO_POSTS}\n");
        }
        self.posts
            .iter()
            .enumerate()
            .map(|(i, post)| post.render(i + 1))
            .collect()
    }
}
