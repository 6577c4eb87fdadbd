//! Menu-driven console shell over the entity services.
//!
//! # Responsibility
//! - Render menus, collect field input, and print results or one-line errors.
//! - Hold the logged-in `Session` for the posts/comments menus.
//!
//! # Invariants
//! - Menu navigation is an explicit loop; submenus return to their caller.
//! - End of input ends the shell from any prompt.

use blogdesk_core::{
    Comment, CommentDraft, CommentService, Post, PostDraft, PostService, RepoError, ServiceError,
    ServiceResult, Session, SignupRequest, SqliteCommentRepository, SqlitePostRepository,
    SqliteUserRepository, User, UserId, UserService, UserUpdate,
};
use log::{info, warn};
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::{self, BufRead, Write};

const RULE: &str =
    "===========================================================================";
const THIN_RULE: &str =
    "---------------------------------------------------------------------------";

const TOP_MENU: &[&str] = &["A. Users", "B. Posts", "C. Comments", "D. Exit"];
const USER_MENU: &[&str] = &[
    "A. See all users",
    "B. Find a user by email",
    "C. Add a new user",
    "D. Update a user",
    "E. Delete a user",
    "F. Back",
];
const POST_MENU: &[&str] = &[
    "A. See all posts",
    "B. See your posts",
    "C. Search a post by title",
    "D. Add a new post",
    "E. Update a post",
    "F. Delete a post",
    "G. Back",
];
const COMMENT_MENU: &[&str] = &[
    "A. See all comments",
    "B. See your comments",
    "C. See comments on a post",
    "D. Add a new comment",
    "E. Update a comment",
    "F. Delete a comment",
    "G. Back",
];

/// Failure that ends the shell.
#[derive(Debug)]
pub enum ShellError {
    /// Repositories could not be bound to the connection.
    Repo(RepoError),
    /// Console read/write failed.
    Io(io::Error),
}

impl Display for ShellError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Io(err) => write!(f, "console i/o failed: {err}"),
        }
    }
}

impl Error for ShellError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Io(err) => Some(err),
        }
    }
}

impl From<RepoError> for ShellError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

/// Why a menu loop stopped early.
enum Interrupt {
    Eof,
    Io(io::Error),
}

impl From<io::Error> for Interrupt {
    fn from(value: io::Error) -> Self {
        Self::Io(value)
    }
}

type Step<T> = Result<T, Interrupt>;

/// Interactive shell bound to one connection and one console.
pub struct Shell<'conn, R: BufRead, W: Write> {
    users: UserService<SqliteUserRepository<'conn>>,
    posts: PostService<SqlitePostRepository<'conn>>,
    comments: CommentService<SqliteCommentRepository<'conn>, SqlitePostRepository<'conn>>,
    input: R,
    output: W,
}

impl<'conn, R: BufRead, W: Write> Shell<'conn, R, W> {
    /// Binds services to a migrated connection.
    pub fn new(conn: &'conn Connection, input: R, output: W) -> Result<Self, ShellError> {
        Ok(Self {
            users: UserService::new(SqliteUserRepository::try_new(conn)?),
            posts: PostService::new(SqlitePostRepository::try_new(conn)?),
            comments: CommentService::new(
                SqliteCommentRepository::try_new(conn)?,
                SqlitePostRepository::try_new(conn)?,
            ),
            input,
            output,
        })
    }

    /// Runs the top menu until the user exits or input ends.
    pub fn run(&mut self) -> Result<(), ShellError> {
        info!("event=shell_start module=cli status=ok");
        match self.top_menu() {
            Ok(()) => Ok(()),
            Err(Interrupt::Eof) => {
                info!("event=shell_stop module=cli status=ok reason=eof");
                Ok(())
            }
            Err(Interrupt::Io(err)) => {
                warn!("event=shell_stop module=cli status=error error={err}");
                Err(ShellError::Io(err))
            }
        }
    }

    fn top_menu(&mut self) -> Step<()> {
        loop {
            self.say("")?;
            self.render_menu("Hello! Please choose one of the options below:", TOP_MENU)?;
            match self.choose()? {
                Some('A') => self.users_menu()?,
                Some('B') => {
                    if let Some(session) = self.login()? {
                        self.posts_menu(&session)?;
                    }
                }
                Some('C') => {
                    if let Some(session) = self.login()? {
                        self.comments_menu(&session)?;
                    }
                }
                Some('D') => {
                    self.say("Exited!")?;
                    info!("event=shell_stop module=cli status=ok reason=exit");
                    return Ok(());
                }
                _ => self.invalid_choice()?,
            }
        }
    }

    fn users_menu(&mut self) -> Step<()> {
        loop {
            self.render_menu("Showing options for users", USER_MENU)?;
            match self.choose()? {
                Some('A') => {
                    let users = self.users.list_users();
                    if let Some(users) = self.report(users)? {
                        self.print_all(&users, render_user)?;
                    }
                }
                Some('B') => {
                    let email = self.prompt("Email")?;
                    let user = self.users.get_user_by_email(&email);
                    if let Some(user) = self.report(user)? {
                        self.say(render_user(&user))?;
                    }
                }
                Some('C') => self.add_user()?,
                Some('D') => self.update_user()?,
                Some('E') => self.delete_user()?,
                Some('F') => return Ok(()),
                _ => self.invalid_choice()?,
            }
        }
    }

    fn add_user(&mut self) -> Step<()> {
        let request = SignupRequest {
            name: self.prompt("Name")?,
            email: self.prompt("Email")?,
            username: self.prompt("Username")?,
            password: self.prompt("Password")?,
        };
        let created = self.users.signup(&request);
        if let Some(user) = self.report(created)? {
            self.say(format!("Created user {}.", user.id))?;
        }
        Ok(())
    }

    fn update_user(&mut self) -> Step<()> {
        let Some(id) = self.prompt_id("User id")? else {
            return Ok(());
        };
        let current = self.users.get_user(id);
        let Some(current) = self.report(current)? else {
            return Ok(());
        };
        self.say(render_user(&current))?;

        let update = UserUpdate {
            name: self.prompt_or("Name", &current.name)?,
            email: self.prompt_or("Email", &current.email)?,
            username: self.prompt_or("Username", &current.username)?,
            password: Some(self.prompt("Password (blank keeps current)")?)
                .filter(|value| !value.is_empty()),
        };
        let updated = self.users.update_user(id, &update);
        if self.report(updated)?.is_some() {
            self.say(format!("Updated user {id}."))?;
        }
        Ok(())
    }

    fn delete_user(&mut self) -> Step<()> {
        let Some(id) = self.prompt_id("User id")? else {
            return Ok(());
        };
        let current = self.users.get_user(id);
        let Some(current) = self.report(current)? else {
            return Ok(());
        };
        self.say(render_user(&current))?;
        if !self.confirm("Delete this user and all of their posts and comments?")? {
            return self.say("Cancelled.");
        }

        let deleted = self.users.delete_user(id);
        if self.report(deleted)?.is_some() {
            self.say(format!("Deleted user {id}."))?;
        }
        Ok(())
    }

    /// Prompts until credentials match; a blank username gives up.
    fn login(&mut self) -> Step<Option<Session>> {
        loop {
            self.say(THIN_RULE)?;
            self.say("Please log in (leave username blank to go back).")?;
            let username = self.prompt("Username")?;
            if username.is_empty() {
                return Ok(None);
            }
            let password = self.prompt("Password")?;
            match self.users.authenticate(&username, &password) {
                Ok(session) => {
                    self.say(format!("Logged in as {}.", session.username()))?;
                    return Ok(Some(session));
                }
                Err(ServiceError::InvalidCredentials) => {
                    self.say("Username or password not found. Please try again!")?;
                }
                Err(err) => {
                    self.error_line(&err)?;
                    return Ok(None);
                }
            }
        }
    }

    fn posts_menu(&mut self, session: &Session) -> Step<()> {
        loop {
            self.render_menu("Showing options for posts", POST_MENU)?;
            match self.choose()? {
                Some('A') => {
                    let posts = self.posts.list_posts();
                    if let Some(posts) = self.report(posts)? {
                        self.print_all(&posts, render_post)?;
                    }
                }
                Some('B') => {
                    let posts = self.posts.list_posts_by_user(session.user_id());
                    if let Some(posts) = self.report(posts)? {
                        self.print_all(&posts, render_post)?;
                    }
                }
                Some('C') => {
                    let title = self.prompt("Title")?;
                    let post = self.posts.get_post_by_title(&title);
                    if let Some(post) = self.report(post)? {
                        self.say(render_post(&post))?;
                    }
                }
                Some('D') => self.add_post(session)?,
                Some('E') => self.update_post(session)?,
                Some('F') => self.delete_post(session)?,
                Some('G') => return Ok(()),
                _ => self.invalid_choice()?,
            }
        }
    }

    fn add_post(&mut self, session: &Session) -> Step<()> {
        let title = self.prompt("Title")?;
        let content = self.prompt("Content")?;
        let thumbnail = self.prompt("Thumbnail (optional)")?;
        let publish = self.confirm("Publish now?")?;

        let draft = PostDraft::new(title, content)
            .with_thumbnail(Some(thumbnail))
            .published(publish);
        let created = self.posts.create_post(session, &draft);
        if let Some(post) = self.report(created)? {
            self.say(format!("Created post {}.", post.id))?;
        }
        Ok(())
    }

    fn update_post(&mut self, session: &Session) -> Step<()> {
        let Some(id) = self.prompt_id("Post id")? else {
            return Ok(());
        };
        let current = self.posts.get_post(id);
        let Some(current) = self.report(current)? else {
            return Ok(());
        };
        self.say(render_post(&current))?;
        if !self.ensure_owner(session, "post", id, current.user_id)? {
            return Ok(());
        }

        let defaults = PostDraft::from(&current);
        let title = self.prompt_or("Title", &defaults.title)?;
        let content = self.prompt_or("Content", &defaults.content)?;
        let thumbnail = self.prompt_thumbnail(defaults.thumbnail)?;
        let publish = self.confirm_or("Published?", defaults.is_published)?;
        let draft = PostDraft::new(title, content)
            .with_thumbnail(thumbnail)
            .published(publish);

        let updated = self.posts.update_post(session, id, &draft);
        if self.report(updated)?.is_some() {
            self.say(format!("Updated post {id}."))?;
        }
        Ok(())
    }

    fn delete_post(&mut self, session: &Session) -> Step<()> {
        let Some(id) = self.prompt_id("Post id")? else {
            return Ok(());
        };
        let current = self.posts.get_post(id);
        let Some(current) = self.report(current)? else {
            return Ok(());
        };
        self.say(render_post(&current))?;
        if !self.ensure_owner(session, "post", id, current.user_id)? {
            return Ok(());
        }
        if !self.confirm("Delete this post and its comments?")? {
            return self.say("Cancelled.");
        }

        let deleted = self.posts.delete_post(session, id);
        if self.report(deleted)?.is_some() {
            self.say(format!("Deleted post {id}."))?;
        }
        Ok(())
    }

    fn comments_menu(&mut self, session: &Session) -> Step<()> {
        loop {
            self.render_menu("Showing options for comments", COMMENT_MENU)?;
            match self.choose()? {
                Some('A') => {
                    let comments = self.comments.list_comments();
                    if let Some(comments) = self.report(comments)? {
                        self.print_all(&comments, render_comment)?;
                    }
                }
                Some('B') => {
                    let comments = self.comments.list_comments_by_user(session.user_id());
                    if let Some(comments) = self.report(comments)? {
                        self.print_all(&comments, render_comment)?;
                    }
                }
                Some('C') => {
                    let Some(post_id) = self.prompt_id("Post id")? else {
                        continue;
                    };
                    let comments = self.comments.list_comments_by_post(post_id);
                    if let Some(comments) = self.report(comments)? {
                        self.print_all(&comments, render_comment)?;
                    }
                }
                Some('D') => self.add_comment(session)?,
                Some('E') => self.update_comment(session)?,
                Some('F') => self.delete_comment(session)?,
                Some('G') => return Ok(()),
                _ => self.invalid_choice()?,
            }
        }
    }

    fn add_comment(&mut self, session: &Session) -> Step<()> {
        let Some(post_id) = self.prompt_id("Post id")? else {
            return Ok(());
        };
        let content = self.prompt("Comment")?;
        let publish = self.confirm("Publish now?")?;

        let draft = CommentDraft::new(content).published(publish);
        let created = self.comments.create_comment(session, post_id, &draft);
        if let Some(comment) = self.report(created)? {
            self.say(format!("Created comment {}.", comment.id))?;
        }
        Ok(())
    }

    fn update_comment(&mut self, session: &Session) -> Step<()> {
        let Some(id) = self.prompt_id("Comment id")? else {
            return Ok(());
        };
        let current = self.comments.get_comment(id);
        let Some(current) = self.report(current)? else {
            return Ok(());
        };
        self.say(render_comment(&current))?;
        if !self.ensure_owner(session, "comment", id, current.user_id)? {
            return Ok(());
        }

        let draft = CommentDraft::new(self.prompt_or("Comment", &current.content)?)
            .published(self.confirm_or("Published?", current.is_published)?);
        let updated = self.comments.update_comment(session, id, &draft);
        if self.report(updated)?.is_some() {
            self.say(format!("Updated comment {id}."))?;
        }
        Ok(())
    }

    fn delete_comment(&mut self, session: &Session) -> Step<()> {
        let Some(id) = self.prompt_id("Comment id")? else {
            return Ok(());
        };
        let current = self.comments.get_comment(id);
        let Some(current) = self.report(current)? else {
            return Ok(());
        };
        self.say(render_comment(&current))?;
        if !self.ensure_owner(session, "comment", id, current.user_id)? {
            return Ok(());
        }
        if !self.confirm("Delete this comment?")? {
            return self.say("Cancelled.");
        }

        let deleted = self.comments.delete_comment(session, id);
        if self.report(deleted)?.is_some() {
            self.say(format!("Deleted comment {id}."))?;
        }
        Ok(())
    }

    /// Stops an edit before any prompt when the session is not the author.
    fn ensure_owner(
        &mut self,
        session: &Session,
        entity: &'static str,
        id: i64,
        owner: UserId,
    ) -> Step<bool> {
        if owner == session.user_id() {
            return Ok(true);
        }
        self.error_line(&ServiceError::NotOwner { entity, id })?;
        Ok(false)
    }

    fn render_menu(&mut self, title: &str, options: &[&str]) -> Step<()> {
        self.say(title)?;
        self.say(RULE)?;
        for option in options {
            self.say(option)?;
        }
        self.say(RULE)?;
        let letters: Vec<&str> = options
            .iter()
            .filter_map(|option| option.get(..1))
            .collect();
        self.say(format!(
            "Please choose one of the options above by typing the letter ({}):",
            letters.join("/")
        ))
    }

    /// Reads a menu choice as an uppercase letter.
    fn choose(&mut self) -> Step<Option<char>> {
        let line = self.read_line()?;
        Ok(line.chars().next().map(|c| c.to_ascii_uppercase()))
    }

    fn invalid_choice(&mut self) -> Step<()> {
        self.say("Invalid input. Please try once more!")?;
        self.say(RULE)
    }

    fn prompt(&mut self, label: &str) -> Step<String> {
        write!(self.output, "{label}: ")?;
        self.output.flush()?;
        self.read_line()
    }

    /// Prompts with a default; blank input keeps `current`.
    fn prompt_or(&mut self, label: &str, current: &str) -> Step<String> {
        let value = self.prompt(&format!("{label} [{current}]"))?;
        if value.is_empty() {
            return Ok(current.to_string());
        }
        Ok(value)
    }

    /// Blank keeps `current`; `-` clears it.
    fn prompt_thumbnail(&mut self, current: Option<String>) -> Step<Option<String>> {
        let shown = current.as_deref().unwrap_or("none");
        let value = self.prompt(&format!("Thumbnail, - to clear [{shown}]"))?;
        match value.as_str() {
            "" => Ok(current),
            "-" => Ok(None),
            _ => Ok(Some(value)),
        }
    }

    fn prompt_id(&mut self, label: &str) -> Step<Option<i64>> {
        let raw = self.prompt(label)?;
        match raw.parse::<i64>() {
            Ok(id) if id > 0 => Ok(Some(id)),
            _ => {
                self.say(format!("Invalid id `{raw}`: expected a positive number."))?;
                Ok(None)
            }
        }
    }

    fn confirm(&mut self, question: &str) -> Step<bool> {
        let answer = self.prompt(&format!("{question} (Y/N)"))?;
        Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
    }

    fn confirm_or(&mut self, question: &str, current: bool) -> Step<bool> {
        let shown = if current { "Y" } else { "N" };
        let answer = self.prompt(&format!("{question} (Y/N) [{shown}]"))?;
        if answer.is_empty() {
            return Ok(current);
        }
        Ok(answer.eq_ignore_ascii_case("y") || answer.eq_ignore_ascii_case("yes"))
    }

    /// Reads one trimmed line; end of input becomes `Interrupt::Eof`.
    fn read_line(&mut self) -> Step<String> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Err(Interrupt::Eof);
        }
        Ok(line.trim().to_string())
    }

    fn say(&mut self, line: impl Display) -> Step<()> {
        writeln!(self.output, "{line}")?;
        Ok(())
    }

    fn print_all<T>(&mut self, items: &[T], render: fn(&T) -> String) -> Step<()> {
        self.say(THIN_RULE)?;
        if items.is_empty() {
            self.say("Nothing to show.")?;
        }
        for item in items {
            self.say(render(item))?;
        }
        self.say(THIN_RULE)
    }

    /// Prints a service failure as one line; the caller keeps its menu.
    fn report<T>(&mut self, result: ServiceResult<T>) -> Step<Option<T>> {
        match result {
            Ok(value) => Ok(Some(value)),
            Err(err) => {
                self.error_line(&err)?;
                Ok(None)
            }
        }
    }

    fn error_line(&mut self, err: &ServiceError) -> Step<()> {
        if let ServiceError::Repo(inner) = err {
            warn!("event=shell_action module=cli status=error error={inner}");
        }
        self.say(format!("Error: {err}"))
    }
}

fn render_user(user: &User) -> String {
    format!(
        "#{} {} <{}> username={}",
        user.id, user.name, user.email, user.username
    )
}

fn render_post(post: &Post) -> String {
    let state = if post.is_published { "published" } else { "draft" };
    let mut line = format!(
        "#{} \"{}\" by user {} [{}]\n    {}",
        post.id, post.title, post.user_id, state, post.content
    );
    if let Some(thumbnail) = &post.thumbnail {
        line.push_str(&format!("\n    thumbnail: {thumbnail}"));
    }
    line
}

fn render_comment(comment: &Comment) -> String {
    let state = if comment.is_published {
        "published"
    } else {
        "draft"
    };
    format!(
        "#{} on post {} by user {} [{}]\n    {}",
        comment.id, comment.post_id, comment.user_id, state, comment.content
    )
}

#[cfg(test)]
mod tests {
    use super::Shell;
    use blogdesk_core::db::open_db_in_memory;
    use blogdesk_core::{
        PostDraft, PostService, SignupRequest, SqlitePostRepository, SqliteUserRepository,
        UserService,
    };
    use rusqlite::Connection;
    use std::io::Cursor;

    fn run_script(conn: &Connection, script: &str) -> String {
        let mut output = Vec::new();
        let mut shell = Shell::new(conn, Cursor::new(script.as_bytes()), &mut output).unwrap();
        shell.run().unwrap();
        drop(shell);
        String::from_utf8(output).unwrap()
    }

    fn seed_user(conn: &Connection, username: &str) -> i64 {
        let users = UserService::new(SqliteUserRepository::try_new(conn).unwrap());
        users
            .signup(&SignupRequest {
                name: username.to_string(),
                email: format!("{username}@x.com"),
                username: username.to_string(),
                password: "pw".to_string(),
            })
            .unwrap()
            .id
    }

    fn count(conn: &Connection, table: &str) -> i64 {
        conn.query_row(&format!("SELECT COUNT(*) FROM {table};"), [], |row| {
            row.get(0)
        })
        .unwrap()
    }

    #[test]
    fn exit_option_stops_the_shell() {
        let conn = open_db_in_memory().unwrap();
        let output = run_script(&conn, "d\n");
        assert!(output.contains("A. Users"));
        assert!(output.contains("Exited!"));
    }

    #[test]
    fn end_of_input_stops_without_error() {
        let conn = open_db_in_memory().unwrap();
        let output = run_script(&conn, "");
        assert!(output.contains("Hello!"));
        assert!(!output.contains("Exited!"));
    }

    #[test]
    fn unknown_choice_redisplays_menu() {
        let conn = open_db_in_memory().unwrap();
        let output = run_script(&conn, "z\n\nD\n");
        assert_eq!(output.matches("Invalid input").count(), 2);
        assert_eq!(output.matches("Hello!").count(), 3);
    }

    #[test]
    fn signup_and_listing_through_user_menu() {
        let conn = open_db_in_memory().unwrap();
        let output = run_script(
            &conn,
            "A\nC\nAlice\na@x.com\nalice\npw\nC\nAlias\na@x.com\nalias\npw\nA\nF\nD\n",
        );

        assert!(output.contains("Created user 1."));
        assert!(output.contains("Error: user with email `a@x.com` already exists"));
        assert!(output.contains("#1 Alice <a@x.com> username=alice"));
        assert_eq!(count(&conn, "users"), 1);
    }

    #[test]
    fn blank_update_input_keeps_current_values() {
        let conn = open_db_in_memory().unwrap();
        let id = seed_user(&conn, "alice");

        let output = run_script(&conn, &format!("A\nD\n{id}\nAlicia\n\n\n\nF\nD\n"));
        assert!(output.contains(&format!("Updated user {id}.")));

        let (name, email): (String, String) = conn
            .query_row(
                "SELECT name, email FROM users WHERE id = ?1;",
                [id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(name, "Alicia");
        assert_eq!(email, "alice@x.com");
    }

    #[test]
    fn delete_requires_confirmation() {
        let conn = open_db_in_memory().unwrap();
        let id = seed_user(&conn, "alice");

        let output = run_script(&conn, &format!("A\nE\n{id}\nn\nF\nD\n"));
        assert!(output.contains("Cancelled."));
        assert_eq!(count(&conn, "users"), 1);

        run_script(&conn, &format!("A\nE\n{id}\ny\nF\nD\n"));
        assert_eq!(count(&conn, "users"), 0);
    }

    #[test]
    fn login_retries_and_blank_username_returns_to_top() {
        let conn = open_db_in_memory().unwrap();
        seed_user(&conn, "alice");

        let output = run_script(&conn, "B\nalice\nwrong\n\nD\n");
        assert!(output.contains("Username or password not found"));
        assert!(!output.contains("Showing options for posts"));
        assert!(output.contains("Exited!"));
    }

    #[test]
    fn logged_in_user_creates_and_finds_post() {
        let conn = open_db_in_memory().unwrap();
        seed_user(&conn, "alice");

        let output = run_script(
            &conn,
            "B\nalice\npw\nD\nHello\nFirst post\n\ny\nC\nHello\nB\nG\nD\n",
        );
        assert!(output.contains("Logged in as alice."));
        assert!(output.contains("Created post 1."));
        assert!(output.contains("#1 \"Hello\" by user 1 [published]"));
    }

    fn seed_post(conn: &Connection, username: &str, draft: &PostDraft) -> i64 {
        let users = UserService::new(SqliteUserRepository::try_new(conn).unwrap());
        let posts = PostService::new(SqlitePostRepository::try_new(conn).unwrap());
        let session = users.authenticate(username, "pw").unwrap();
        posts.create_post(&session, draft).unwrap().id
    }

    #[test]
    fn non_author_is_stopped_before_any_prompt() {
        let conn = open_db_in_memory().unwrap();
        seed_user(&conn, "alice");
        seed_user(&conn, "bob");
        let id = seed_post(&conn, "alice", &PostDraft::new("Hello", "world"));

        let output = run_script(&conn, &format!("B\nbob\npw\nE\n{id}\nF\n{id}\nG\nD\n"));
        assert_eq!(output.matches("belongs to another user").count(), 2);
        assert!(!output.contains("Title ["));
        assert!(!output.contains("(Y/N)"));
        assert!(output.contains("Exited!"));
        assert_eq!(count(&conn, "posts"), 1);
    }

    #[test]
    fn post_update_keeps_blank_fields_and_clears_thumbnail_on_dash() {
        let conn = open_db_in_memory().unwrap();
        seed_user(&conn, "alice");
        let draft = PostDraft::new("Hello", "world").with_thumbnail(Some("one.png".to_string()));
        let id = seed_post(&conn, "alice", &draft);

        let output = run_script(&conn, &format!("B\nalice\npw\nE\n{id}\n\n\n-\n\nG\nD\n"));
        assert!(output.contains("[one.png]"));
        assert!(output.contains(&format!("Updated post {id}.")));

        let (title, thumbnail): (String, Option<String>) = conn
            .query_row(
                "SELECT title, thumbnail FROM posts WHERE id = ?1;",
                [id],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(title, "Hello");
        assert_eq!(thumbnail, None);
    }

    #[test]
    fn comment_errors_are_reported_and_menu_continues() {
        let conn = open_db_in_memory().unwrap();
        let alice = seed_user(&conn, "alice");
        seed_user(&conn, "bob");
        let posts = PostService::new(SqlitePostRepository::try_new(&conn).unwrap());
        let users = UserService::new(SqliteUserRepository::try_new(&conn).unwrap());
        let session = users.authenticate("alice", "pw").unwrap();
        assert_eq!(session.user_id(), alice);
        let post = posts
            .create_post(&session, &PostDraft::new("Hello", "world"))
            .unwrap();

        let output = run_script(
            &conn,
            &format!(
                "C\nbob\npw\nD\n99\nhi\nn\nD\n{id}\nnice\ny\nD\n{id}\nagain\nn\nC\n{id}\nG\nD\n",
                id = post.id
            ),
        );
        assert!(output.contains("Error: post not found: id=99"));
        assert!(output.contains("Created comment 1."));
        assert!(output.contains("already commented on post"));
        assert!(output.contains("#1 on post 1 by user 2 [published]"));
        assert_eq!(count(&conn, "comments"), 1);
    }
}
