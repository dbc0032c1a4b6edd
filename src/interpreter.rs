//! Brainfuck execution engine
//!
//! ## Commands
//! - `>` : Move pointer right
//! - `<` : Move pointer left
//! - `+` : Increment current cell (wraps at 256)
//! - `-` : Decrement current cell (wraps at 0)
//! - `.` : Output current cell as a raw byte
//! - `,` : Read one byte into current cell (0 on end of input)
//! - `[` : Repeat the enclosed block while the current cell is not 0
//! - `]` : Closes a loop; a stray one is an error
//!
//! Space, tab, CR, LF, vertical tab and form feed are ignored. Every other
//! byte is rejected with [`InterpreterError::IllegalCharacter`].
//!
//! The pointer is bounds checked: stepping off either end of the tape fails
//! with [`InterpreterError::PointerOutOfBounds`] instead of wrapping.

use std::io::{self, Read, Write};
use std::ops::Range;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{debug, trace};

/// Memory tape size (30KB as per original Brainfuck spec)
pub const TAPE_SIZE: usize = 30_000;

/// Exit status used when the command line is malformed.
pub const USAGE_EXIT_CODE: i32 = -1;

#[derive(Error, Debug)]
pub enum InterpreterError {
    #[error("Unmatched '[' at position {0}")]
    UnmatchedLoopStart(usize),

    #[error("Unmatched ']' at position {0}")]
    UnmatchedLoopEnd(usize),

    #[error("Illegal character {ch:?} at position {position}")]
    IllegalCharacter { ch: char, position: usize },

    #[error("Pointer out of bounds at position {position} (ptr={pointer}, op='{op}')")]
    PointerOutOfBounds {
        position: usize,
        pointer: usize,
        op: char,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Failed to open file {}: {source}", .path.display())]
    FileOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl InterpreterError {
    /// Process exit status for this failure. Each category gets its own
    /// negative value; `0` is reserved for success.
    pub fn exit_code(&self) -> i32 {
        match self {
            InterpreterError::UnmatchedLoopStart(_) => -2,
            InterpreterError::UnmatchedLoopEnd(_) => -3,
            InterpreterError::IllegalCharacter { .. } => -4,
            InterpreterError::PointerOutOfBounds { .. } => -5,
            InterpreterError::Io(_) => -6,
            InterpreterError::FileOpen { .. } => -7,
        }
    }
}

pub type Result<T> = std::result::Result<T, InterpreterError>;

/// Fixed-size byte tape plus the data pointer into it.
pub struct Tape {
    cells: Vec<u8>,
    pointer: usize,
}

impl Tape {
    pub fn new() -> Self {
        Tape {
            cells: vec![0u8; TAPE_SIZE],
            pointer: 0,
        }
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    /// Value of the cell under the pointer.
    pub fn current(&self) -> u8 {
        self.cells[self.pointer]
    }

    pub fn cell(&self, index: usize) -> Option<u8> {
        self.cells.get(index).copied()
    }

    fn set_current(&mut self, value: u8) {
        self.cells[self.pointer] = value;
    }

    /// `position` is the source offset of the `>` and is only used for the error.
    pub fn move_right(&mut self, position: usize) -> Result<()> {
        if self.pointer + 1 >= self.cells.len() {
            return Err(InterpreterError::PointerOutOfBounds {
                position,
                pointer: self.pointer,
                op: '>',
            });
        }
        self.pointer += 1;
        Ok(())
    }

    pub fn move_left(&mut self, position: usize) -> Result<()> {
        if self.pointer == 0 {
            return Err(InterpreterError::PointerOutOfBounds {
                position,
                pointer: self.pointer,
                op: '<',
            });
        }
        self.pointer -= 1;
        Ok(())
    }

    pub fn increment_cell(&mut self) {
        self.cells[self.pointer] = self.cells[self.pointer].wrapping_add(1);
    }

    pub fn decrement_cell(&mut self) {
        self.cells[self.pointer] = self.cells[self.pointer].wrapping_sub(1);
    }
}

impl Default for Tape {
    fn default() -> Self {
        Self::new()
    }
}

/// State shared by every (recursive) block execution of one run: the tape
/// with its pointer, and the byte input and output streams.
pub struct Context<R, W> {
    tape: Tape,
    input: R,
    output: W,
}

impl<R: Read, W: Write> Context<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Context {
            tape: Tape::new(),
            input,
            output,
        }
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Read one byte, returning 0 once input is exhausted.
    ///
    /// Pending output is flushed first so interactive prompts show up
    /// before the program blocks on stdin.
    pub fn read_byte(&mut self) -> Result<u8> {
        self.output.flush()?;
        let mut buf = [0u8; 1];
        match self.input.read_exact(&mut buf) {
            Ok(()) => Ok(buf[0]),
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => Ok(0),
            Err(e) => Err(InterpreterError::Io(e)),
        }
    }

    pub fn write_byte(&mut self, byte: u8) -> Result<()> {
        self.output.write_all(&[byte])?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.output.flush()?;
        Ok(())
    }

    /// Execute `source[span]` left to right.
    ///
    /// Error positions are absolute offsets into `source`, so a fault inside
    /// a nested loop body still points at the right byte of the program.
    pub fn execute_block(&mut self, source: &[u8], span: Range<usize>) -> Result<()> {
        let end = span.end.min(source.len());
        let mut i = span.start;

        while i < end {
            match source[i] {
                b'>' => self.tape.move_right(i)?,
                b'<' => self.tape.move_left(i)?,
                b'+' => self.tape.increment_cell(),
                b'-' => self.tape.decrement_cell(),
                b'.' => {
                    let byte = self.tape.current();
                    self.write_byte(byte)?;
                }
                b',' => {
                    let byte = self.read_byte()?;
                    self.tape.set_current(byte);
                }
                b'[' => {
                    let close = find_loop_end(source, i, end)?;
                    trace!(open = i, close, "entering loop");
                    while self.tape.current() != 0 {
                        self.execute_block(source, i + 1..close)?;
                    }
                    i = close + 1;
                    continue;
                }
                b']' => return Err(InterpreterError::UnmatchedLoopEnd(i)),
                b' ' | b'\t' | b'\r' | b'\n' | 0x0B | 0x0C => {}
                other => {
                    return Err(InterpreterError::IllegalCharacter {
                        ch: char::from(other),
                        position: i,
                    });
                }
            }
            i += 1;
        }

        Ok(())
    }
}

/// Find the `]` matching the `[` at `open`, looking no further than `end`.
pub fn find_loop_end(source: &[u8], open: usize, end: usize) -> Result<usize> {
    let mut depth = 1usize;
    let mut i = open + 1;

    while i < end {
        match source[i] {
            b'[' => depth += 1,
            b']' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(i);
                }
            }
            _ => {}
        }
        i += 1;
    }

    Err(InterpreterError::UnmatchedLoopStart(open))
}

/// Run `source` on a fresh tape with the given input and output streams.
///
/// Output written before a failure is still flushed.
pub fn run_with<R: Read, W: Write>(source: &[u8], input: R, output: W) -> Result<()> {
    let mut ctx = Context::new(input, output);
    debug!(bytes = source.len(), "starting run");

    let result = ctx.execute_block(source, 0..source.len());
    let flushed = ctx.flush();
    result?;
    flushed?;

    debug!(pointer = ctx.tape().pointer(), "run finished");
    Ok(())
}

/// Run `source` against the process's stdin and stdout.
pub fn run(source: &[u8]) -> Result<()> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    run_with(source, stdin.lock(), io::BufWriter::new(stdout.lock()))
}
