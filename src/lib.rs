//! A Brainfuck interpreter.
//!
//! Programs run on a zeroed tape of [`TAPE_SIZE`] byte cells. Loops are
//! executed by re-entering the block dispatcher on the loop body, so
//! recursion depth follows loop nesting, not iteration count.
//!
//! ```no_run
//! let source = b"++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.";
//! bfrun::run(source).expect("program should run");
//! ```

pub mod interpreter;
pub mod logging;

pub use interpreter::{
    find_loop_end, run, run_with, Context, InterpreterError, Result, Tape, TAPE_SIZE,
};
