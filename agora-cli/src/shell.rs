use std::io::{BufRead, Write};

use agora_core::{DataFiles, Error, Session, SocialGraph};
use anyhow::Result;
use tracing::{error, info};

use crate::menu::{Dashboard, MainMenu};

/// Printed when the configured data format could not save the text.
const UNSTORABLE: &str = "Posts and comments cannot contain line breaks.";

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
enum Flow {
    Continue,
    Quit,
}

/// Reads a prompt answer, or ends the current flow when input runs out.
macro_rules! answer {
    ($e:expr) => {
        match $e? {
            Some(answer) => answer,
            None => return Ok(Flow::Quit),
        }
    };
}

/// The interactive menu loop. Owns the graph for the whole process and
/// saves it through `files` every time a user logs out, and once more on exit.
pub struct Shell<R, W> {
    graph: SocialGraph,
    files: DataFiles,
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(graph: SocialGraph, files: DataFiles, input: R, output: W) -> Self {
        Self {
            graph,
            files,
            input,
            output,
        }
    }

    pub fn graph(&self) -> &SocialGraph {
        &self.graph
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Runs until the user picks Exit or input ends.
    pub fn run(&mut self) -> Result<()> {
        loop {
            let prompt = format!("{}Your choice: ", MainMenu::TEXT);
            let flow = match self.prompt(&prompt)? {
                None => Flow::Quit,
                Some(choice) => match MainMenu::from(&choice) {
                    Some(MainMenu::Signup) => self.signup()?,
                    Some(MainMenu::Login) => self.login()?,
                    Some(MainMenu::Exit) => Flow::Quit,
                    None => {
                        writeln!(self.output, "Invalid choice!")?;
                        Flow::Continue
                    }
                },
            };
            if flow == Flow::Quit {
                self.save()?;
                writeln!(self.output, "Goodbye!")?;
                return Ok(());
            }
        }
    }

    fn signup(&mut self) -> Result<Flow> {
        let username = answer!(self.prompt_token("Signup - Enter username: "));
        let password = answer!(self.prompt_token("Enter password: "));
        match self.graph.signup(username, password) {
            Ok(()) => writeln!(self.output, "Signup successful!")?,
            Err(e) => writeln!(self.output, "{}", message(&e))?,
        }
        Ok(Flow::Continue)
    }

    fn login(&mut self) -> Result<Flow> {
        let username = answer!(self.prompt_token("Login - Enter username: "));
        let password = answer!(self.prompt_token("Enter password: "));
        let session = match self.graph.login(&username, &password) {
            Ok(session) => session,
            Err(e) => {
                writeln!(self.output, "{}", message(&e))?;
                return Ok(Flow::Continue);
            }
        };
        writeln!(self.output, "Welcome, {}!", session.username())?;
        let flow = self.dashboard(&session)?;
        self.save()?;
        Ok(flow)
    }

    fn dashboard(&mut self, session: &Session) -> Result<Flow> {
        loop {
            let prompt = format!("{}Your choice: ", Dashboard::TEXT);
            let flow = match self.prompt(&prompt)? {
                None => Flow::Quit,
                Some(choice) => match Dashboard::from(&choice) {
                    Some(Dashboard::CreatePost) => self.create_post(session)?,
                    Some(Dashboard::ViewPosts) => self.view_posts()?,
                    Some(Dashboard::AddComment) => self.add_comment(session)?,
                    Some(Dashboard::SendFriendRequest) => self.send_friend_request(session)?,
                    Some(Dashboard::HandleFriendRequests) => self.handle_friend_requests(session)?,
                    Some(Dashboard::ViewFriends) => self.view_friends(session)?,
                    Some(Dashboard::Logout) => {
                        writeln!(self.output, "Logging out...")?;
                        return Ok(Flow::Continue);
                    }
                    None => {
                        writeln!(self.output, "Invalid choice!")?;
                        Flow::Continue
                    }
                },
            };
            if flow == Flow::Quit {
                writeln!(self.output, "\nLogging out...")?;
                return Ok(Flow::Quit);
            }
        }
    }

    fn create_post(&mut self, session: &Session) -> Result<Flow> {
        let content = answer!(self.prompt("Enter your post content: "));
        if !self.files.format().can_store(&content) {
            writeln!(self.output, "{UNSTORABLE}")?;
            return Ok(Flow::Continue);
        }
        match self.graph.create_post(session, content) {
            Ok(_) => writeln!(self.output, "Post created.")?,
            Err(e) => writeln!(self.output, "{}", message(&e))?,
        }
        Ok(Flow::Continue)
    }

    fn view_posts(&mut self) -> Result<Flow> {
        write!(self.output, "{}", self.graph.render_posts())?;
        Ok(Flow::Continue)
    }

    fn add_comment(&mut self, session: &Session) -> Result<Flow> {
        if self.graph.posts().is_empty() {
            writeln!(self.output, "{}", agora_core::graph::NO_POSTS)?;
            return Ok(Flow::Continue);
        }
        let number = answer!(self.prompt("Enter post number to comment on: "));
        let index = match number.trim().parse::<usize>() {
            Ok(n) if (1..=self.graph.posts().len()).contains(&n) => n,
            _ => {
                writeln!(self.output, "Invalid post number!")?;
                return Ok(Flow::Continue);
            }
        };
        let content = answer!(self.prompt("Enter your comment: "));
        if !self.files.format().can_store(&content) {
            writeln!(self.output, "{UNSTORABLE}")?;
            return Ok(Flow::Continue);
        }
        match self.graph.add_comment(session, index, content) {
            Ok(()) => writeln!(self.output, "Comment added.")?,
            Err(e) => writeln!(self.output, "{}", message(&e))?,
        }
        Ok(Flow::Continue)
    }

    fn send_friend_request(&mut self, session: &Session) -> Result<Flow> {
        let target = answer!(self.prompt_token("Enter username to send request: "));
        match self.graph.send_friend_request(session, &target) {
            Ok(()) => writeln!(self.output, "Request sent.")?,
            Err(e) => writeln!(self.output, "{}", message(&e))?,
        }
        Ok(Flow::Continue)
    }

    fn handle_friend_requests(&mut self, session: &Session) -> Result<Flow> {
        let requests = match self.graph.friend_requests(session) {
            Ok(requests) => requests.to_vec(),
            Err(e) => {
                writeln!(self.output, "{}", message(&e))?;
                return Ok(Flow::Continue);
            }
        };
        if requests.is_empty() {
            writeln!(self.output, "No friend requests.")?;
            return Ok(Flow::Continue);
        }

        writeln!(self.output, "Friend Requests:")?;
        for (i, from) in requests.iter().enumerate() {
            writeln!(self.output, "{}. {}", i + 1, from)?;
        }
        let choice = answer!(self.prompt("Enter request number to accept (0 to cancel): "));
        let index = choice.trim().parse::<usize>().unwrap_or(0);
        match self.graph.accept_friend_request(session, index) {
            Ok(friend) => writeln!(self.output, "You are now friends with {friend}!")?,
            Err(e) => writeln!(self.output, "{}", message(&e))?,
        }
        Ok(Flow::Continue)
    }

    fn view_friends(&mut self, session: &Session) -> Result<Flow> {
        let friends = match self.graph.friends(session) {
            Ok(friends) => friends,
            Err(e) => {
                writeln!(self.output, "{}", message(&e))?;
                return Ok(Flow::Continue);
            }
        };
        if friends.is_empty() {
            writeln!(self.output, "You have no friends yet.")?;
            return Ok(Flow::Continue);
        }
        writeln!(self.output, "Your Friends:")?;
        for friend in friends {
            writeln!(self.output, "- {friend}")?;
        }
        Ok(Flow::Continue)
    }

    /// Save failures are reported but do not end the session; the graph is
    /// still in memory and the next logout tries again.
    fn save(&mut self) -> Result<()> {
        match self.files.save(&self.graph) {
            Ok(()) => info!(dir = %self.files.dir().display(), "session saved"),
            Err(e) => {
                error!(error = %e, "failed to save session");
                writeln!(self.output, "Could not save your changes: {e}")?;
            }
        }
        Ok(())
    }

    fn prompt(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.output, "{message}")?;
        self.output.flush()?;
        self.read_line()
    }

    /// Reads the first whitespace-delimited word, skipping blank lines.
    fn prompt_token(&mut self, message: &str) -> Result<Option<String>> {
        write!(self.output, "{message}")?;
        self.output.flush()?;
        while let Some(line) = self.read_line()? {
            if let Some(token) = line.split_whitespace().next() {
                return Ok(Some(token.to_string()));
            }
        }
        Ok(None)
    }

    fn read_line(&mut self) -> Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(len);
        Ok(Some(line))
    }
}

/// The console wording for each operation error.
fn message(err: &Error) -> String {
    match err {
        Error::DuplicateUsername(_) => "Username already taken!".to_string(),
        Error::InvalidUsername(_) => "Usernames must be a single word.".to_string(),
        Error::InvalidCredentials => "Invalid credentials!".to_string(),
        Error::InvalidSelection { .. } => "Cancelled or invalid choice.".to_string(),
        Error::UserNotFound(_) => "User not found.".to_string(),
        Error::SelfRequest => "Cannot send request to yourself.".to_string(),
        Error::AlreadyFriends(_) => "Already friends.".to_string(),
        other => other.to_string(),
    }
}
