//! Interactive session: a line-oriented front end over [`Controller`].
//!
//! The session owns the terminal. Questions such as "create the output
//! folder?" are asked through the session's own reader before a run starts,
//! so nothing else ever competes for input while a worker is running.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use tokio::runtime::Runtime;
use tracing::debug;

use crate::controller::{AddOutcome, Controller};
use crate::display;
use crate::prompt::{self, AssumeNo, AssumeYes, Confirm};

const HELP: &str = "\
Commands:
  add <file>...        queue documents for conversion
  remove <index>...    remove queued documents by index
  clear                empty the queue
  list                 show the queue
  output [dir]         show or change the output folder
  convert              convert every queued document to PDF
  help                 show this help
  quit                 leave the session";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Add(Vec<PathBuf>),
    Remove(Vec<usize>),
    Clear,
    List,
    Output(Option<PathBuf>),
    Convert,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let line = line.trim();
        let (word, rest) = match line.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (line, ""),
        };

        match word.to_ascii_lowercase().as_str() {
            "" => Command::Empty,
            "add" | "a" => Command::Add(split_paths(rest)),
            "remove" | "rm" => match rest
                .split_whitespace()
                .map(str::parse)
                .collect::<Result<Vec<usize>, _>>()
            {
                Ok(indices) => Command::Remove(indices),
                Err(_) => Command::Unknown(line.to_string()),
            },
            "clear" => Command::Clear,
            "list" | "ls" => Command::List,
            "output" | "out" if rest.is_empty() => Command::Output(None),
            "output" | "out" => Command::Output(Some(PathBuf::from(rest))),
            "convert" | "start" => Command::Convert,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            _ => Command::Unknown(line.to_string()),
        }
    }
}

/// A path containing spaces is taken whole when it names an existing file.
fn split_paths(rest: &str) -> Vec<PathBuf> {
    if rest.is_empty() {
        return Vec::new();
    }
    if Path::new(rest).exists() {
        return vec![PathBuf::from(rest)];
    }
    rest.split_whitespace().map(PathBuf::from).collect()
}

pub struct Session<'a, R, W> {
    controller: &'a mut Controller,
    runtime: &'a Runtime,
    input: R,
    output: W,
    all_files: bool,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(controller: &'a mut Controller, runtime: &'a Runtime, input: R, output: W) -> Self {
        Self {
            controller,
            runtime,
            input,
            output,
            all_files: false,
        }
    }

    /// Accept files regardless of extension.
    pub fn all_files(mut self, all_files: bool) -> Self {
        self.all_files = all_files;
        self
    }

    /// Read and execute commands until `quit` or end of input.
    pub fn run(&mut self) -> io::Result<()> {
        writeln!(self.output, "{}", self.controller.status())?;
        writeln!(self.output, "Output folder: {}", self.controller.output_dir().display())?;
        if !self.controller.converter_available() {
            writeln!(self.output, "{}", officepdf_core::error::INSTALL_GUIDANCE)?;
        }
        writeln!(self.output, "Type 'help' for commands.")?;

        loop {
            write!(self.output, "> ")?;
            self.output.flush()?;

            let mut line = String::new();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(());
            }

            let command = Command::parse(&line);
            debug!(?command, "Session command");
            if command == Command::Quit {
                return Ok(());
            }
            self.execute(command)?;
        }
    }

    fn execute(&mut self, command: Command) -> io::Result<()> {
        match command {
            Command::Add(paths) if paths.is_empty() => {
                writeln!(self.output, "Usage: add <file>...")?;
            }
            Command::Add(paths) => {
                for path in paths {
                    self.add(&path)?;
                }
            }
            Command::Remove(indices) if indices.is_empty() => {
                writeln!(self.output, "Usage: remove <index>...")?;
            }
            Command::Remove(indices) => match self.controller.remove(&indices) {
                Ok(n) => writeln!(self.output, "Removed {n} files")?,
                Err(e) => writeln!(self.output, "{e}")?,
            },
            Command::Clear => match self.controller.clear() {
                Ok(()) => writeln!(self.output, "Queue cleared")?,
                Err(e) => writeln!(self.output, "{e}")?,
            },
            Command::List => self.list()?,
            Command::Output(None) => {
                writeln!(self.output, "Output folder: {}", self.controller.output_dir().display())?;
            }
            Command::Output(Some(dir)) => {
                let dir = crate::config::expand(&dir);
                match self.controller.set_output_dir(dir) {
                    Ok(()) => writeln!(
                        self.output,
                        "Output folder: {}",
                        self.controller.output_dir().display()
                    )?,
                    Err(e) => writeln!(self.output, "{e}")?,
                }
            }
            Command::Convert => self.convert()?,
            Command::Help => writeln!(self.output, "{HELP}")?,
            Command::Quit | Command::Empty => {}
            Command::Unknown(line) => {
                writeln!(self.output, "Unknown command: {line} (type 'help')")?;
            }
        }
        Ok(())
    }

    fn add(&mut self, path: &Path) -> io::Result<()> {
        let path = crate::config::expand(path);
        match self.controller.add_file(&path, self.all_files) {
            Ok(AddOutcome::Added) => writeln!(self.output, "Added {}", path.display()),
            Ok(AddOutcome::Duplicate) => {
                writeln!(self.output, "Already queued: {}", path.display())
            }
            Ok(AddOutcome::Unsupported) => {
                writeln!(self.output, "Not an office document: {}", path.display())
            }
            Ok(AddOutcome::Missing) => writeln!(self.output, "No such file: {}", path.display()),
            Err(e) => writeln!(self.output, "{e}"),
        }
    }

    fn list(&mut self) -> io::Result<()> {
        let queue = self.controller.queue();
        if queue.is_empty() {
            return writeln!(self.output, "Queue is empty");
        }
        for (index, entry) in queue.entries().iter().enumerate() {
            writeln!(self.output, "{}", display::entry_line(index, entry))?;
        }
        Ok(())
    }

    fn convert(&mut self) -> io::Result<()> {
        if let Err(e) = self.controller.can_start() {
            return writeln!(self.output, "{e}");
        }

        let consent: &dyn Confirm = if self.controller.needs_confirmation() {
            let question = format!(
                "Output folder doesn't exist:\n{}\n\nCreate it?",
                self.controller.output_dir().display()
            );
            if prompt::ask(&mut self.input, &mut self.output, &question)? {
                &AssumeYes
            } else {
                &AssumeNo
            }
        } else {
            &AssumeNo
        };

        let handle = {
            let _guard = self.runtime.enter();
            self.controller.start_run(consent)
        };

        let handle = match handle {
            Ok(handle) => handle,
            Err(e) => return writeln!(self.output, "{e}"),
        };

        let output = &mut self.output;
        let summary = self
            .runtime
            .block_on(self.controller.drive(handle, |_, event| {
                if let Some(line) = display::event_line(event) {
                    if let Err(e) = writeln!(output, "{line}") {
                        debug!("Failed to write event line: {}", e);
                    }
                }
            }));

        match summary {
            Some(summary) => {
                writeln!(self.output, "{}", display::headline(&summary))?;
                writeln!(self.output, "{}", display::details(&summary))?;
            }
            None => writeln!(self.output, "{}", self.controller.status())?,
        }
        Ok(())
    }
}
