//! Line-oriented interactive shell over a [`BlogEngine`].
//!
//! Owns input shape validation (menu choices, integer ids) and turns
//! engine outcomes into user-facing text. It never calls the engine with
//! an argument it has not validated. End of input ends the loop.

use std::io::{self, BufRead, Write};

use blog_engine::engine::BlogEngine;
use blog_engine::error::{DeleteError, EditError};
use blog_engine::{FieldEdit, PostId};
use tracing::debug;

use crate::config::RuntimeConfig;

const LOGGED_OUT_MENU: &str = "1. Sign Up\n2. Log In\n5. Quit";
const LOGGED_IN_MENU: &str =
    "1. Log Out\n2. Create New Post\n3. View Posts\n4. Edit A Post\n5. Delete A Post\n6. Quit";

const UNAUTHENTICATED: &str = "You must be logged in to perform this action."; // 401

/// What the loop should do after handling one menu choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

pub struct Shell<R, W> {
    blog: BlogEngine,
    input: R,
    output: W,
    skip_word: String,
    welcome: String,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(blog: BlogEngine, input: R, output: W, config: &RuntimeConfig) -> Self {
        Self {
            blog,
            input,
            output,
            skip_word: config.skip_word.clone(),
            welcome: config.welcome.clone(),
        }
    }

    pub fn into_parts(self) -> (BlogEngine, W) {
        (self.blog, self.output)
    }

    /// Drive menus until the user quits or input runs out.
    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.output, "{}", self.welcome)?;
        loop {
            let flow = if self.blog.current_actor().is_none() {
                self.logged_out_turn()?
            } else {
                self.logged_in_turn()?
            };
            if flow == Flow::Quit {
                writeln!(self.output, "Thanks for checking out the blog")?;
                break;
            }
        }
        self.output.flush()
    }

    fn logged_out_turn(&mut self) -> io::Result<Flow> {
        writeln!(self.output, "{LOGGED_OUT_MENU}")?;
        let Some(choice) = self.choose(&["1", "2", "5"], "Invalid Option. Please choose 1, 2, or 5 ")?
        else {
            return Ok(Flow::Quit);
        };
        match choice.as_str() {
            "1" => self.sign_up(),
            "2" => self.log_in(),
            _ => Ok(Flow::Quit),
        }
    }

    fn logged_in_turn(&mut self) -> io::Result<Flow> {
        writeln!(self.output, "{LOGGED_IN_MENU}")?;
        let Some(choice) = self.choose(
            &["1", "2", "3", "4", "5", "6"],
            "Invalid Option. Please choose 1, 2, 3, 4, 5, or 6 ",
        )?
        else {
            return Ok(Flow::Quit);
        };
        match choice.as_str() {
            "1" => {
                self.blog.logout();
                writeln!(self.output, "You have successfully logged out.")?;
                Ok(Flow::Continue)
            }
            "2" => self.create_post(),
            "3" => self.view_posts(),
            "4" => self.edit_post(),
            "5" => self.delete_post(),
            _ => Ok(Flow::Quit),
        }
    }

    // ── Actions ────────────────────────────────────────────────────

    fn sign_up(&mut self) -> io::Result<Flow> {
        let Some(username) = self.prompt("Please enter a username: ")? else {
            return Ok(Flow::Quit);
        };
        if self.blog.registry().find_by_username(&username).is_some() {
            writeln!(self.output, "User with username {username} already exists.")?;
            return Ok(Flow::Continue);
        }
        let Some(password) = self.prompt("Please enter a password: ")? else {
            return Ok(Flow::Quit);
        };
        match self.blog.register(&username, &password) {
            Ok(user) => writeln!(self.output, "{user} has been created!")?,
            Err(err) => writeln!(self.output, "{}.", capitalize(&err.to_string()))?,
        }
        Ok(Flow::Continue)
    }

    fn log_in(&mut self) -> io::Result<Flow> {
        let Some(username) = self.prompt("What is your username? ")? else {
            return Ok(Flow::Quit);
        };
        let Some(password) = self.prompt("What is your password? ")? else {
            return Ok(Flow::Quit);
        };
        match self.blog.authenticate(&username, &password) {
            Ok(user) => writeln!(self.output, "{user} has logged in")?,
            Err(_) => writeln!(self.output, "Username and/or password is incorrect.")?,
        }
        Ok(Flow::Continue)
    }

    fn create_post(&mut self) -> io::Result<Flow> {
        let Some(title) = self.prompt("Enter the title of your post: ")? else {
            return Ok(Flow::Quit);
        };
        let Some(body) = self.prompt("Enter the body of your post: ")? else {
            return Ok(Flow::Quit);
        };
        match self.blog.create_post(&title, &body) {
            Ok(post) => writeln!(self.output, "{} has been created!", post.title)?,
            Err(_) => writeln!(self.output, "{UNAUTHENTICATED}")?,
        }
        Ok(Flow::Continue)
    }

    fn view_posts(&mut self) -> io::Result<Flow> {
        if self.blog.list_posts().is_empty() {
            writeln!(self.output, "There are no posts.")?;
            return Ok(Flow::Continue);
        }
        for view in self.blog.views() {
            writeln!(self.output, "{view}\n")?;
        }
        Ok(Flow::Continue)
    }

    fn edit_post(&mut self) -> io::Result<Flow> {
        let Some(id) = self.prompt_post_id("What is the ID of the post you would like to edit? ")? else {
            return Ok(Flow::Quit);
        };
        let access = self.blog.check_access(id).map(|_| ());
        if let Err(err) = access {
            return self.report_edit_error(err);
        }
        let skip_hint = format!("(enter '{}' to keep the current value) ", self.skip_word);
        let Some(title) = self.prompt(&format!("Enter the new title {skip_hint}"))? else {
            return Ok(Flow::Quit);
        };
        let Some(body) = self.prompt(&format!("Enter the new body {skip_hint}"))? else {
            return Ok(Flow::Quit);
        };
        let title = FieldEdit::from_input_with(&title, &self.skip_word);
        let body = FieldEdit::from_input_with(&body, &self.skip_word);

        match self.blog.edit_post(id, title, body) {
            Ok(post) => writeln!(self.output, "{} has been updated!", post.title)?,
            Err(err) => return self.report_edit_error(err),
        }
        Ok(Flow::Continue)
    }

    fn report_edit_error(&mut self, err: EditError) -> io::Result<Flow> {
        match err {
            EditError::NotFound(id) => writeln!(self.output, "{}", not_found(id))?,
            EditError::Unauthenticated => writeln!(self.output, "{UNAUTHENTICATED}")?,
            EditError::Forbidden(_) => {
                writeln!(self.output, "You do not have permission to edit this post.")?
            }
        }
        Ok(Flow::Continue)
    }

    fn delete_post(&mut self) -> io::Result<Flow> {
        let Some(id) = self.prompt_post_id("What is the ID of the post you would like to delete? ")?
        else {
            return Ok(Flow::Quit);
        };
        // Ownership problems are reported before asking for a
        // confirmation the user could never act on.
        let access = self.blog.check_access(id).map(|_| ());
        if let Err(err) = access {
            return self.report_delete_error(err.into());
        }
        let Some(answer) = self.prompt("Are you sure you want to delete this post? (y/n) ")? else {
            return Ok(Flow::Quit);
        };

        match self.blog.delete_post(id, is_affirmative(&answer)) {
            Ok(post) => writeln!(self.output, "{} has been deleted.", post.title)?,
            Err(err) => return self.report_delete_error(err),
        }
        Ok(Flow::Continue)
    }

    fn report_delete_error(&mut self, err: DeleteError) -> io::Result<Flow> {
        match err {
            DeleteError::NotFound(id) => writeln!(self.output, "{}", not_found(id))?,
            DeleteError::Unauthenticated => writeln!(self.output, "{UNAUTHENTICATED}")?,
            DeleteError::Forbidden(_) => {
                writeln!(self.output, "You do not have permission to delete this post.")?
            }
            DeleteError::NotConfirmed(id) => writeln!(self.output, "Post {id} was not deleted.")?,
        }
        Ok(Flow::Continue)
    }

    // ── Input ──────────────────────────────────────────────────────

    /// Print `message` and read one line without its line ending.
    /// `None` at end of input.
    fn prompt(&mut self, message: &str) -> io::Result<Option<String>> {
        write!(self.output, "{message}")?;
        self.output.flush()?;
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            debug!("input closed");
            return Ok(None);
        }
        let trimmed = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed);
        Ok(Some(line))
    }

    /// Re-prompt with `retry` until the answer is one of `allowed`.
    fn choose(&mut self, allowed: &[&str], retry: &str) -> io::Result<Option<String>> {
        let mut answer = self.prompt("Which option would you like to do? ")?;
        while let Some(choice) = &answer {
            if allowed.contains(&choice.trim()) {
                return Ok(Some(choice.trim().to_string()));
            }
            answer = self.prompt(retry)?;
        }
        Ok(None)
    }

    fn prompt_post_id(&mut self, message: &str) -> io::Result<Option<PostId>> {
        let mut answer = self.prompt(message)?;
        while let Some(raw) = &answer {
            if let Ok(id) = raw.trim().parse::<u64>() {
                return Ok(Some(PostId(id)));
            }
            answer = self.prompt("That is not a valid post ID. Please enter a number: ")?;
        }
        Ok(None)
    }
}

fn not_found(id: PostId) -> String {
    format!("Post with an ID of {id} does not exist.") // 404
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

fn capitalize(message: &str) -> String {
    let mut chars = message.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
