//! Input and output collaborators.
//!
//! The engine talks to the person at the keyboard through three small
//! traits. `Console` bundles them for the session.
//!
//! - [`ScriptedConsole`] replays canned keys and answers, for tests.
//! - [`LineConsole`] reads one key per line from any `BufRead` and writes
//!   to any `Write`, for the terminal front end.

use std::collections::VecDeque;
use std::io::{BufRead, Write};

use tracing::warn;

/// Where text for the player goes.
pub trait DisplaySink {
    fn show(&mut self, text: &str);

    /// Wipe the screen before a board redraw. No-op by default.
    fn clear(&mut self) {}
}

/// Where key presses come from.
pub trait InputSource {
    /// Next key as a lower-cased character code, or `None` when no input is
    /// available (end of input, or a script that ran out).
    fn read(&mut self) -> Option<i32>;
}

/// The yes/no question asked before quitting.
pub trait ExitPrompt {
    fn confirm_exit(&mut self) -> bool;
}

/// Everything the session needs from the terminal.
pub trait Console: DisplaySink + InputSource + ExitPrompt {}

impl<T: DisplaySink + InputSource + ExitPrompt> Console for T {}

/// Character code of a key, as returned by [`InputSource::read`].
#[must_use]
pub const fn key(c: char) -> i32 {
    c as i32
}

/// A console driven by a script. Records everything shown.
///
/// ```
/// use rust_wumpus::rules::{key, DisplaySink, ExitPrompt, InputSource, ScriptedConsole};
///
/// let mut console = ScriptedConsole::with_keys("wd").with_confirmations([true]);
/// assert_eq!(console.read(), Some(key('w')));
/// assert_eq!(console.read(), Some(key('d')));
/// assert_eq!(console.read(), None);
/// assert!(console.confirm_exit());
///
/// console.show("hello");
/// assert!(console.transcript().contains("hello"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct ScriptedConsole {
    keys: VecDeque<i32>,
    confirmations: VecDeque<bool>,
    shown: Vec<String>,
    exit_prompts: usize,
}

impl ScriptedConsole {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script one key per character.
    #[must_use]
    pub fn with_keys(keys: &str) -> Self {
        Self {
            keys: keys.chars().map(key).collect(),
            ..Self::default()
        }
    }

    /// Answers for successive exit prompts. Once they run out, the answer is no.
    #[must_use]
    pub fn with_confirmations(mut self, answers: impl IntoIterator<Item = bool>) -> Self {
        self.confirmations.extend(answers);
        self
    }

    /// Queue more keys.
    pub fn push_keys(&mut self, keys: &str) {
        self.keys.extend(keys.chars().map(key));
    }

    /// Everything shown so far, in order.
    #[must_use]
    pub fn shown(&self) -> &[String] {
        &self.shown
    }

    /// Everything shown so far, concatenated.
    #[must_use]
    pub fn transcript(&self) -> String {
        self.shown.concat()
    }

    /// How many times the exit prompt was asked.
    #[must_use]
    pub fn exit_prompts(&self) -> usize {
        self.exit_prompts
    }

    /// Keys not yet consumed.
    #[must_use]
    pub fn remaining_keys(&self) -> usize {
        self.keys.len()
    }
}

impl DisplaySink for ScriptedConsole {
    fn show(&mut self, text: &str) {
        self.shown.push(text.to_string());
    }
}

impl InputSource for ScriptedConsole {
    fn read(&mut self) -> Option<i32> {
        self.keys.pop_front()
    }
}

impl ExitPrompt for ScriptedConsole {
    fn confirm_exit(&mut self) -> bool {
        self.exit_prompts += 1;
        self.confirmations.pop_front().unwrap_or(false)
    }
}

/// A console over line-oriented streams.
///
/// Each line of input is one key: its first character, lower-cased. A line
/// holding only spaces counts as the space key; blank lines are skipped.
#[derive(Debug)]
pub struct LineConsole<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> LineConsole<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    /// Hand back the underlying streams.
    pub fn into_parts(self) -> (R, W) {
        (self.input, self.output)
    }
}

impl<R: BufRead, W: Write> DisplaySink for LineConsole<R, W> {
    fn show(&mut self, text: &str) {
        if let Err(err) = self.output.write_all(text.as_bytes()).and_then(|()| self.output.flush()) {
            warn!(error = %err, "failed to write to console");
        }
    }

    fn clear(&mut self) {
        self.show("\x1B[2J\x1B[H");
    }
}

impl<R: BufRead, W: Write> InputSource for LineConsole<R, W> {
    fn read(&mut self) -> Option<i32> {
        let mut line = String::new();
        loop {
            line.clear();
            match self.input.read_line(&mut line) {
                Ok(0) => return None,
                Ok(_) => {}
                Err(err) => {
                    warn!(error = %err, "failed to read from console");
                    return None;
                }
            }
            let trimmed = line.trim_end_matches(&['\n', '\r'][..]);
            if trimmed.is_empty() {
                continue;
            }
            let first = trimmed.trim_start().chars().next().unwrap_or(' ');
            return Some(key(first.to_ascii_lowercase()));
        }
    }
}

impl<R: BufRead, W: Write> ExitPrompt for LineConsole<R, W> {
    fn confirm_exit(&mut self) -> bool {
        self.show("Are you sure you want to exit the game? (y/n): ");
        let yes = self.read() == Some(key('y'));
        self.show("\n");
        yes
    }
}
