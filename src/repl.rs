//! The read-execute-print loop.
//!
//! Input and output are plain `BufRead`/`Write` values, so the same loop
//! serves the terminal and scripted sessions.

use std::io::{self, BufRead, Write};

use tracing::debug;

use crate::config::ReplConfig;
use crate::error::{ExecuteError, MetaCommandError, PrepareError, ReplError};
use crate::statement::{ExecuteResult, Statement};
use crate::table::Table;
use crate::{PAGE_SIZE, ROW_SIZE, ROWS_PER_PAGE, TABLE_MAX_PAGES, TABLE_MAX_ROWS};

pub struct InputBuffer<R> {
    reader: R,
    raw: Vec<u8>,
    buffer: Option<String>,
}

impl<R: BufRead> InputBuffer<R> {
    pub fn new(reader: R) -> Self {
        Self {
            reader,
            raw: Vec::new(),
            buffer: None,
        }
    }

    /// Reads the next line, trimmed. Returns `false` once input is exhausted.
    pub fn read_input(&mut self) -> io::Result<bool> {
        self.raw.clear();
        let read = self.reader.read_until(b'\n', &mut self.raw)?;
        self.buffer = std::str::from_utf8(&self.raw)
            .ok()
            .map(|line| line.trim().to_string());
        Ok(read > 0)
    }

    /// The last line read, or `None` if it was not valid UTF-8.
    pub fn as_str(&self) -> Option<&str> {
        self.buffer.as_deref()
    }
}

// Non-SQL statements like .exit are called “meta-commands”.
#[derive(Debug, PartialEq, Eq)]
enum MetaCommands {
    Exit,
    Constants,
    Help,
    Unrecognized(String),
}

impl MetaCommands {
    fn parse(input: &str) -> Option<MetaCommands> {
        match input {
            ".exit" => Some(MetaCommands::Exit),
            ".constants" => Some(MetaCommands::Constants),
            ".help" => Some(MetaCommands::Help),
            _ => {
                if input.starts_with('.') {
                    Some(MetaCommands::Unrecognized(input.to_string()))
                } else {
                    None
                }
            }
        }
    }
}

#[derive(Debug, PartialEq, Eq)]
enum InputType {
    Empty,
    Meta(MetaCommands),
    Statement(Result<Statement, PrepareError>),
}

impl InputType {
    fn parse(input: &str) -> InputType {
        if input.is_empty() {
            InputType::Empty
        } else if let Some(meta) = MetaCommands::parse(input) {
            InputType::Meta(meta)
        } else {
            InputType::Statement(Statement::prepare(input))
        }
    }
}

/// Drives one session against a table. The table is flushed and closed when
/// the loop ends, whether through `.exit` or end of input.
pub struct Repl<R, W> {
    table: Table,
    input: InputBuffer<R>,
    output: W,
    config: ReplConfig,
}

impl<R: BufRead, W: Write> Repl<R, W> {
    pub fn new(table: Table, input: R, output: W, config: ReplConfig) -> Self {
        Self {
            table,
            input: InputBuffer::new(input),
            output,
            config,
        }
    }

    /// Runs until `.exit` or end of input. The table is closed on every path
    /// out of the loop; the first error encountered is returned.
    pub fn run(mut self) -> Result<(), ReplError> {
        let session = self.session();
        let flushed = self.output.flush();
        let closed = self.table.close();

        session?;
        flushed?;
        closed?;
        Ok(())
    }

    fn session(&mut self) -> Result<(), ReplError> {
        if self.config.banner {
            self.print_banner()?;
        }

        loop {
            self.print_prompt()?;
            if !self.input.read_input()? {
                debug!("end of input");
                return Ok(());
            }

            let input = match self.input.as_str() {
                Some(line) => InputType::parse(line),
                None => InputType::Statement(Err(PrepareError::Syntax)),
            };
            match input {
                InputType::Empty => {}
                InputType::Meta(MetaCommands::Exit) => return Ok(()),
                InputType::Meta(command) => self.do_meta_command(command)?,
                InputType::Statement(Ok(statement)) => self.execute(&statement)?,
                InputType::Statement(Err(e)) => writeln!(self.output, "{e}")?,
            }
        }
    }

    fn execute(&mut self, statement: &Statement) -> Result<(), ReplError> {
        match statement.execute(&mut self.table) {
            Ok(ExecuteResult::Inserted) => writeln!(self.output, "Executed.")?,
            Ok(ExecuteResult::Rows(rows)) => {
                for row in rows {
                    writeln!(self.output, "{row}")?;
                }
                writeln!(self.output, "Executed.")?;
            }
            Err(e @ ExecuteError::TableFull) => writeln!(self.output, "{e}")?,
            Err(ExecuteError::Storage(e)) => return Err(e.into()),
        }
        Ok(())
    }

    fn do_meta_command(&mut self, command: MetaCommands) -> Result<(), ReplError> {
        match command {
            MetaCommands::Exit => {}
            MetaCommands::Constants => self.print_constants()?,
            MetaCommands::Help => self.print_help()?,
            MetaCommands::Unrecognized(input) => {
                writeln!(self.output, "{}", MetaCommandError::Unrecognized(input))?
            }
        }
        Ok(())
    }

    fn print_prompt(&mut self) -> io::Result<()> {
        write!(self.output, "{}", self.config.prompt)?;
        self.output.flush()
    }

    fn print_banner(&mut self) -> io::Result<()> {
        writeln!(self.output, "rowdb {}", env!("CARGO_PKG_VERSION"))?;
        writeln!(self.output, "Type '.help' for options.")?;
        writeln!(self.output, "Type '.exit' to save and quit.")
    }

    fn print_constants(&mut self) -> io::Result<()> {
        writeln!(self.output, "Constants:")?;
        writeln!(self.output, "ROW_SIZE: {ROW_SIZE}")?;
        writeln!(self.output, "PAGE_SIZE: {PAGE_SIZE}")?;
        writeln!(self.output, "ROWS_PER_PAGE: {ROWS_PER_PAGE}")?;
        writeln!(self.output, "TABLE_MAX_PAGES: {TABLE_MAX_PAGES}")?;
        writeln!(self.output, "TABLE_MAX_ROWS: {TABLE_MAX_ROWS}")
    }

    fn print_help(&mut self) -> io::Result<()> {
        writeln!(self.output, "Statements:")?;
        writeln!(self.output, "  insert <id> <username> <email>")?;
        writeln!(self.output, "  select")?;
        writeln!(self.output, "Meta-commands:")?;
        writeln!(self.output, "  .constants  print storage layout constants")?;
        writeln!(self.output, "  .help       show this message")?;
        writeln!(self.output, "  .exit       save and quit")
    }
}
