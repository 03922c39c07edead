//! Read-eval-print loop.

use std::io::{BufRead, Write};

use hbnb_storage::FileStorage;

use crate::error::ConsoleError;
use crate::handlers;
use crate::parser::{Request, Verb, parse_line};

const HELP_HEADER: &str = "Documented commands (type help <topic>):";

/// Whether the loop keeps reading after a command.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// Command interpreter bound to one store and one output sink.
pub struct Console<W: Write> {
    storage: FileStorage,
    out: W,
    prompt: Option<String>,
}

impl<W: Write> Console<W> {
    pub fn new(storage: FileStorage, out: W) -> Self {
        Self {
            storage,
            out,
            prompt: None,
        }
    }

    /// Write `prompt` before reading each line.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = Some(prompt.into());
        self
    }

    pub fn storage(&self) -> &FileStorage {
        &self.storage
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn into_output(self) -> W {
        self.out
    }

    /// Read and execute lines until `quit`, `EOF` or end of input.
    pub fn run<R: BufRead>(&mut self, mut input: R) -> Result<(), ConsoleError> {
        let mut raw = Vec::new();
        loop {
            if let Some(prompt) = &self.prompt {
                write!(self.out, "{prompt}")?;
                self.out.flush()?;
            }

            raw.clear();
            if input.read_until(b'\n', &mut raw)? == 0 {
                self.execute(Request::Eof)?;
                return Ok(());
            }

            // Invalid UTF-8 becomes U+FFFD; the command then fails like any other bad input.
            let line = String::from_utf8_lossy(&raw);
            if self.onecmd(line.trim_end_matches(['\n', '\r']))? == Flow::Exit {
                return Ok(());
            }
        }
    }

    /// Execute one line.
    ///
    /// Diagnostics are printed and yield `Ok`; only storage and output failures are errors.
    pub fn onecmd(&mut self, line: &str) -> Result<Flow, ConsoleError> {
        let request = parse_line(line);
        tracing::debug!(?request, "dispatching command");
        self.execute(request)
    }

    fn execute(&mut self, request: Request) -> Result<Flow, ConsoleError> {
        let result = match &request {
            Request::Empty => Ok(None),
            Request::Quit => return Ok(Flow::Exit),
            Request::Eof => {
                writeln!(self.out)?;
                return Ok(Flow::Exit);
            }
            Request::Help { topic } => {
                self.help(topic.as_deref())?;
                return Ok(Flow::Continue);
            }
            Request::Unknown(line) => Ok(Some(format!("*** Unknown syntax: {line}"))),
            Request::Create { class_name } => handlers::create(&mut self.storage, class_name.as_deref()),
            Request::Show(target) => handlers::show(&self.storage, target),
            Request::Destroy(target) => handlers::destroy(&mut self.storage, target),
            Request::All { class_name } => handlers::all(&self.storage, class_name.as_deref()),
            Request::Count { class_name } => handlers::count(&self.storage, class_name.as_deref()),
            Request::Update { target, change } => handlers::update(&mut self.storage, target, change),
        };

        match result {
            Ok(Some(output)) => writeln!(self.out, "{output}")?,
            Ok(None) => {}
            Err(ConsoleError::Command(diagnostic)) => writeln!(self.out, "{diagnostic}")?,
            Err(fatal) => return Err(fatal),
        }
        Ok(Flow::Continue)
    }

    fn help(&mut self, topic: Option<&str>) -> Result<(), ConsoleError> {
        match topic {
            Some(topic) => match Verb::from_word(topic) {
                Some(verb) => writeln!(self.out, "{}", verb.summary())?,
                None => writeln!(self.out, "*** No help on {topic}")?,
            },
            None => {
                let names: Vec<&str> = Verb::DOCUMENTED.iter().map(|v| v.name()).collect();
                writeln!(self.out)?;
                writeln!(self.out, "{HELP_HEADER}")?;
                writeln!(self.out, "{}", "=".repeat(HELP_HEADER.len()))?;
                writeln!(self.out, "{}", names.join("  "))?;
                writeln!(self.out)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn console() -> (tempfile::TempDir, Console<Vec<u8>>) {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path().join("file.json"));
        (dir, Console::new(storage, Vec::new()))
    }

    fn output(console: &Console<Vec<u8>>) -> String {
        String::from_utf8(console.output().clone()).unwrap()
    }

    #[test]
    fn quit_prints_nothing_and_exits() {
        let (_dir, mut console) = console();
        assert_eq!(console.onecmd("quit").unwrap(), Flow::Exit);
        assert_eq!(console.onecmd("quit garbage").unwrap(), Flow::Exit);
        assert_eq!(output(&console), "");
    }

    #[test]
    fn eof_prints_a_newline_and_exits() {
        let (_dir, mut console) = console();
        assert_eq!(console.onecmd("EOF").unwrap(), Flow::Exit);
        assert_eq!(output(&console), "\n");
    }

    #[test]
    fn empty_line_does_nothing() {
        let (_dir, mut console) = console();
        assert_eq!(console.onecmd("").unwrap(), Flow::Continue);
        assert_eq!(console.onecmd("   ").unwrap(), Flow::Continue);
        assert_eq!(output(&console), "");
    }

    #[test]
    fn help_lists_documented_commands() {
        let (_dir, mut console) = console();
        console.onecmd("help").unwrap();
        assert_eq!(
            output(&console),
            "\nDocumented commands (type help <topic>):\n\
             ========================================\n\
             EOF  all  count  create  destroy  help  quit  show  update\n\n"
        );
    }

    #[test]
    fn help_on_a_topic() {
        let (_dir, mut console) = console();
        console.onecmd("help quit").unwrap();
        console.onecmd("help dance").unwrap();
        assert_eq!(output(&console), "Exit the program.\n*** No help on dance\n");
    }

    #[test]
    fn unknown_syntax_is_reported() {
        let (_dir, mut console) = console();
        console.onecmd("dance User").unwrap();
        assert_eq!(output(&console), "*** Unknown syntax: dance User\n");
    }

    #[test]
    fn run_stops_at_end_of_input() {
        let (_dir, mut console) = console();
        console.run("count User\n".as_bytes()).unwrap();
        assert_eq!(output(&console), "0\n\n");
    }

    #[test]
    fn run_survives_a_line_that_is_not_utf8() {
        let (_dir, mut console) = console();
        console.run(&b"show \xff\ncount User\n"[..]).unwrap();
        assert_eq!(output(&console), "** class doesn't exist **\n0\n\n");
    }

    #[test]
    fn run_stops_at_quit_without_reading_further() {
        let (_dir, mut console) = console();
        console.run("quit\ncount User\n".as_bytes()).unwrap();
        assert_eq!(output(&console), "");
    }

    #[test]
    fn prompt_is_written_before_each_read() {
        let (_dir, console) = console();
        let mut console = console.with_prompt("(hbnb) ");
        console.run("quit\n".as_bytes()).unwrap();
        assert_eq!(output(&console), "(hbnb) ");
    }
}
