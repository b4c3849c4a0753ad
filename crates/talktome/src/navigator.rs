//! Authenticated navigation: the main menu, the inbox, and followers.

use std::io::Write;

use console_prompt::{Choice, PromptProvider};
use platform_client::{Identity, PlatformClient, Thread};
use tracing::debug;

use crate::commands::{parse_command, Command};
use crate::error::{recoverable, Result};

/// Where to go after a menu action finishes.
enum Flow {
    Menu,
    Quit,
}

/// Where to go after leaving an open conversation.
enum ThreadFlow {
    BackToList,
    Quit,
}

/// Drives the post-login loop against an injected client and prompter.
///
/// Platform failures never end the loop: they are printed where they happen
/// and navigation falls back to the enclosing level. Only prompt and capture
/// failures propagate out.
pub struct Navigator<'a> {
    client: &'a mut dyn PlatformClient,
    prompter: &'a mut dyn PromptProvider,
    screen: &'a mut dyn Write,
    identity: Identity,
}

impl<'a> Navigator<'a> {
    pub fn new(
        client: &'a mut dyn PlatformClient,
        prompter: &'a mut dyn PromptProvider,
        screen: &'a mut dyn Write,
        identity: Identity,
    ) -> Self {
        Self {
            client,
            prompter,
            screen,
            identity,
        }
    }

    /// Runs the main menu until the user quits or logs out.
    pub fn run(&mut self) -> Result<()> {
        loop {
            let choices = [
                Choice::new("inbox", "inbox"),
                Choice::new("followers", "followers"),
                Choice::new("quit", "quit"),
                Choice::new("logout", "logout"),
            ];
            let answer = self
                .prompter
                .ask_choice("What do you want to do?", &choices)?;

            let flow = match answer.as_str() {
                "inbox" => self.browse_inbox()?,
                "followers" => {
                    self.show_followers()?;
                    Flow::Menu
                }
                "logout" => self.logout()?,
                "quit" => Flow::Quit,
                _ => Flow::Menu,
            };

            if let Flow::Quit = flow {
                return Ok(());
            }
        }
    }

    fn browse_inbox(&mut self) -> Result<Flow> {
        loop {
            let threads = match self.client.list_inbox_threads() {
                Ok(threads) => threads,
                Err(error) => {
                    let error = recoverable(error)?;
                    writeln!(self.screen, "{error}")?;
                    return Ok(Flow::Menu);
                }
            };

            if threads.is_empty() {
                writeln!(self.screen, "No conversations yet.")?;
                return Ok(Flow::Menu);
            }

            let choices: Vec<Choice> = threads
                .iter()
                .map(|thread| Choice::new(thread.id.clone(), thread_line(thread)))
                .collect();
            let thread_id = self
                .prompter
                .ask_choice("Select a conversation:", &choices)?;

            match self.open_thread(&thread_id)? {
                ThreadFlow::Quit => return Ok(Flow::Quit),
                ThreadFlow::BackToList => {}
            }
        }
    }

    fn open_thread(&mut self, thread_id: &str) -> Result<ThreadFlow> {
        // The list the user picked from may be stale; fetch fresh and look
        // the conversation up again.
        let threads = match self.client.list_inbox_threads() {
            Ok(threads) => threads,
            Err(error) => {
                let error = recoverable(error)?;
                writeln!(self.screen, "{error}")?;
                return Ok(ThreadFlow::BackToList);
            }
        };
        let Some(thread) = threads.into_iter().find(|thread| thread.id == thread_id) else {
            writeln!(self.screen, "Couldn't find the thread.")?;
            return Ok(ThreadFlow::BackToList);
        };

        debug!(thread_id, "opened conversation");
        // The feed carries messages newest-first; show the conversation
        // top-down instead.
        for message in thread.messages.iter().rev() {
            writeln!(self.screen, "{}", message.text)?;
        }

        loop {
            let input = self.prompter.ask_text("Enter a command:")?;
            match parse_command(&input) {
                Some(Command::Inbox) => return Ok(ThreadFlow::BackToList),
                Some(Command::Refresh) => {
                    writeln!(self.screen, "/refresh is not implemented yet.")?;
                }
                Some(Command::Quit) => return Ok(ThreadFlow::Quit),
                None => {
                    writeln!(self.screen, "Invalid input.")?;
                }
            }
        }
    }

    fn show_followers(&mut self) -> Result<()> {
        match self.client.list_followers(&self.identity.user_id) {
            Ok(followers) => {
                for follower in &followers {
                    writeln!(self.screen, "{} (@{})", follower.full_name, follower.username)?;
                }
            }
            Err(error) => {
                let error = recoverable(error)?;
                writeln!(self.screen, "{error}")?;
            }
        }
        Ok(())
    }

    fn logout(&mut self) -> Result<Flow> {
        match self.client.logout() {
            Ok(()) => {
                // The session file stays; the next start decides whether the
                // persisted state is still usable.
                writeln!(self.screen, "Goodbye!")?;
                Ok(Flow::Quit)
            }
            Err(error) => {
                let error = recoverable(error)?;
                writeln!(self.screen, "{error}")?;
                Ok(Flow::Menu)
            }
        }
    }
}

fn thread_line(thread: &Thread) -> String {
    let preview = thread
        .last_preview
        .as_deref()
        .unwrap_or("No preview available.");
    format!("{}: {preview}", thread.title)
}
