//! Line sources for the terminal and for piped input.

use conch::completion::CompletionIndex;
use conch::error::{Result, ShellError};
use conch::session::{LineEvent, LineSource};
use rustyline::completion::Completer;
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::Validator;
use rustyline::{Editor, Helper};
use std::io::{self, BufRead, ErrorKind, StdinLock};

struct ShellHelper {
    completions: CompletionIndex,
}

impl Completer for ShellHelper {
    type Candidate = String;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &rustyline::Context<'_>,
    ) -> rustyline::Result<(usize, Vec<String>)> {
        Ok(self.completions.complete(line, pos))
    }
}

impl Hinter for ShellHelper {
    type Hint = String;
}

impl Highlighter for ShellHelper {}

impl Validator for ShellHelper {}

impl Helper for ShellHelper {}

/// Interactive terminal input with in-memory history and tab completion.
pub struct EditorInput {
    editor: Editor<ShellHelper, DefaultHistory>,
}

impl EditorInput {
    pub fn new(completions: CompletionIndex) -> Result<Self> {
        let mut editor = Editor::new().map_err(|e| ShellError::Input(e.to_string()))?;
        editor.set_helper(Some(ShellHelper { completions }));
        Ok(Self { editor })
    }
}

impl LineSource for EditorInput {
    fn read_line(&mut self, prompt: &str) -> Result<LineEvent> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = self.editor.add_history_entry(line.as_str());
                }
                Ok(LineEvent::Line(line))
            }
            Err(ReadlineError::Interrupted) => Ok(LineEvent::Interrupted),
            Err(ReadlineError::Eof) => Ok(LineEvent::EndOfInput),
            Err(e) => Err(ShellError::Input(e.to_string())),
        }
    }
}

/// Reads lines from any buffered reader without prompting.
pub struct ReaderInput<R: BufRead> {
    reader: R,
}

impl ReaderInput<StdinLock<'static>> {
    pub fn stdin() -> Self {
        Self::new(io::stdin().lock())
    }
}

impl<R: BufRead> ReaderInput<R> {
    pub fn new(reader: R) -> Self {
        Self { reader }
    }
}

impl<R: BufRead> LineSource for ReaderInput<R> {
    fn read_line(&mut self, _prompt: &str) -> Result<LineEvent> {
        let mut line = String::new();
        match self.reader.read_line(&mut line) {
            Ok(0) => Ok(LineEvent::EndOfInput),
            Ok(_) => Ok(LineEvent::Line(
                line.trim_end_matches(['\n', '\r']).to_string(),
            )),
            Err(e) if e.kind() == ErrorKind::Interrupted => Ok(LineEvent::Interrupted),
            Err(e) => Err(ShellError::Io(e)),
        }
    }
}
