//! Command scripts driving a `RingBuffer<String>`.
//!
//! A script is a capacity followed by whitespace-separated commands:
//!
//! ```text
//! 3
//! A 2
//! x y
//! L
//! R 1
//! L
//! Q
//! ```
//!
//! `A n` appends the next `n` tokens, `R n` removes `n` elements, `L` writes
//! the stored elements one per line, oldest first, and `Q` ends the script.
//! Commands run as soon as their tokens have been read, and nothing after `Q`
//! is read. The first fault stops the run.

use std::collections::VecDeque;
use std::fmt;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

use log::{debug, info};

use crate::error::{Error, Result, Status};
use crate::RingBuffer;

/// A decoded script command.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Command {
    /// `A n`: append the next `n` tokens.
    Append(usize),
    /// `R n`: remove `n` elements.
    Remove(usize),
    /// `L`: list the stored elements.
    List,
    /// `Q`: stop the script.
    Quit,
}

impl Command {
    /// Decodes the next command, and its count if it takes one.
    ///
    /// Unknown command tokens, missing or malformed counts and end of input
    /// are all `InputFileFault`s.
    ///
    /// # Examples
    ///
    /// ```
    /// use circbuf::script::{Command, Tokens};
    ///
    /// let mut tokens = Tokens::new("A 2 x y L".as_bytes());
    /// assert_eq!(Command::parse(&mut tokens).unwrap(), Command::Append(2));
    /// assert_eq!(tokens.next_token("a value").unwrap(), "x");
    /// ```
    pub fn parse<R: BufRead>(tokens: &mut Tokens<R>) -> Result<Command> {
        let token = tokens.next_token("a command")?;
        match token.as_str() {
            "A" => Ok(Command::Append(tokens.next_count("the append count")?)),
            "R" => Ok(Command::Remove(tokens.next_count("the remove count")?)),
            "L" => Ok(Command::List),
            "Q" => Ok(Command::Quit),
            other => Err(Error::input(format!(
                "Cannot find a right command in input file: unknown command `{}`",
                other
            ))),
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            Command::Append(n) => write!(f, "A {}", n),
            Command::Remove(n) => write!(f, "R {}", n),
            Command::List => f.write_str("L"),
            Command::Quit => f.write_str("Q"),
        }
    }
}

/// Whitespace-separated tokens of a script, read one line at a time.
///
/// A line is only read once every token of the previous one has been taken,
/// and a token is only decoded as UTF-8 when it is taken.
#[derive(Debug)]
pub struct Tokens<R> {
    reader: R,
    pending: VecDeque<Vec<u8>>,
    line: Vec<u8>,
}

impl<R: BufRead> Tokens<R> {
    /// Reads tokens from `reader`.
    pub fn new(reader: R) -> Self {
        Tokens {
            reader,
            pending: VecDeque::new(),
            line: Vec::new(),
        }
    }

    fn fill(&mut self) -> Result {
        while self.pending.is_empty() {
            self.line.clear();
            let read = self
                .reader
                .read_until(b'\n', &mut self.line)
                .map_err(|err| Error::input(format!("cannot read script: {}", err)))?;
            if read == 0 {
                break;
            }
            self.pending.extend(
                self.line
                    .split(|b| b.is_ascii_whitespace())
                    .filter(|token| !token.is_empty())
                    .map(|token| token.to_vec()),
            );
        }
        Ok(())
    }

    /// Returns the next token, or an `InputFileFault` naming `what` was
    /// expected if the input has run out, cannot be read, or the token is
    /// not UTF-8.
    pub fn next_token(&mut self, what: &str) -> Result<String> {
        self.fill()?;
        let token = self
            .pending
            .pop_front()
            .ok_or_else(|| Error::input(format!("unexpected end of input, expected {}", what)))?;
        String::from_utf8(token)
            .map_err(|err| Error::input(format!("expected {}, found invalid UTF-8: {}", what, err)))
    }

    /// Reads the next token as a non-negative integer.
    pub fn next_count(&mut self, what: &str) -> Result<usize> {
        let token = self.next_token(what)?;
        token.parse().map_err(|err| {
            Error::input(format!(
                "expected {} as a non-negative integer, found `{}`: {}",
                what, token, err
            ))
        })
    }
}

enum Step {
    Continue,
    Quit,
}

/// Runs scripts against a `RingBuffer<String>`, writing listings to `out`.
pub struct Interpreter<W> {
    buf: RingBuffer<String>,
    out: W,
}

impl<W: Write> Interpreter<W> {
    /// Creates an interpreter writing listings to `out`.
    ///
    /// The buffer has no slots until a script sets its capacity.
    pub fn new(out: W) -> Self {
        Interpreter {
            buf: RingBuffer::default(),
            out,
        }
    }

    /// The buffer as the last run left it.
    pub fn buffer(&self) -> &RingBuffer<String> {
        &self.buf
    }

    /// Consumes the interpreter, returning the output sink.
    pub fn into_inner(self) -> W {
        self.out
    }

    /// Opens `path` and runs it as a script.
    ///
    /// A file that cannot be opened is an `InputFileFault`.
    pub fn run_file<P: AsRef<Path>>(&mut self, path: P) -> Status {
        let path = path.as_ref();
        match File::open(path) {
            Ok(file) => {
                info!("running script {}", path.display());
                self.run(BufReader::new(file))
            }
            Err(err) => Status::Fault(Error::input(format!(
                "Cannot open file {}: {}",
                path.display(),
                err
            ))),
        }
    }

    /// Runs the script read from `input`, command by command.
    ///
    /// Returns `Status::Quit` once a `Q` command is reached, without reading
    /// any further, or the first fault. Input that ends before `Q` is an
    /// `InputFileFault`.
    ///
    /// # Examples
    ///
    /// ```
    /// use circbuf::ErrorKind;
    /// use circbuf::script::Interpreter;
    ///
    /// let mut out = Vec::new();
    /// let status = Interpreter::new(&mut out).run("1\nA 2\nx y\nQ\n".as_bytes());
    /// assert_eq!(status.error().map(|e| e.kind()), Some(ErrorKind::BufferFull));
    /// ```
    pub fn run<R: BufRead>(&mut self, input: R) -> Status {
        match self.run_script(Tokens::new(input)) {
            Ok(()) => Status::Quit,
            Err(err) => {
                debug!("script stopped: {}", err);
                Status::Fault(err)
            }
        }
    }

    fn run_script<R: BufRead>(&mut self, mut tokens: Tokens<R>) -> Result {
        let capacity = tokens.next_count("the buffer capacity")?;
        info!("buffer capacity {}", capacity);
        self.buf.init(capacity)?;

        loop {
            let cmd = Command::parse(&mut tokens)?;
            debug!("command {}", cmd);
            match self.execute(cmd, &mut tokens)? {
                Step::Continue => {}
                Step::Quit => return Ok(()),
            }
        }
    }

    fn execute<R: BufRead>(&mut self, cmd: Command, tokens: &mut Tokens<R>) -> Result<Step> {
        match cmd {
            Command::Append(n) => {
                let mut values = Vec::with_capacity(n.min(self.buf.capacity()));
                for _ in 0..n {
                    values.push(tokens.next_token("a value to append")?);
                }
                self.buf.append_many(values)?;
            }
            Command::Remove(n) => self.buf.remove_many(n)?,
            Command::List => self.list()?,
            Command::Quit => return Ok(Step::Quit),
        }
        Ok(Step::Continue)
    }

    fn list(&mut self) -> Result {
        let out = &mut self.out;
        self.buf.try_for_each_in_order(|element| {
            writeln!(out, "{}", element)
                .map_err(|err| Error::output(format!("cannot write element: {}", err)))
        })?;
        self.out
            .flush()
            .map_err(|err| Error::output(format!("cannot flush output: {}", err)))
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::io;

    fn run(script: &str) -> (Status, String, Vec<String>) {
        let mut interp = Interpreter::new(Vec::new());
        let status = interp.run(script.as_bytes());
        let left = interp.buffer().iter().cloned().collect();
        let out = String::from_utf8(interp.into_inner()).unwrap();
        (status, out, left)
    }

    fn fault_kind(status: &Status) -> Option<ErrorKind> {
        status.error().map(Error::kind)
    }

    #[test]
    fn parse_commands() {
        let mut tokens = Tokens::new("A 3 R 0 L Q".as_bytes());
        assert_eq!(Command::parse(&mut tokens).unwrap(), Command::Append(3));
        assert_eq!(Command::parse(&mut tokens).unwrap(), Command::Remove(0));
        assert_eq!(Command::parse(&mut tokens).unwrap(), Command::List);
        assert_eq!(Command::parse(&mut tokens).unwrap(), Command::Quit);
        assert_eq!(Command::parse(&mut tokens).unwrap_err().kind(), ErrorKind::InputFileFault);
    }

    #[test]
    fn parse_rejects_bad_counts() {
        for script in &["A", "A -1", "R x", "A 1.5", "X 2", "a 1"] {
            let err = Command::parse(&mut Tokens::new(script.as_bytes())).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InputFileFault, "script {:?}", script);
        }
    }

    #[test]
    fn command_display() {
        assert_eq!(Command::Append(2).to_string(), "A 2");
        assert_eq!(Command::Remove(1).to_string(), "R 1");
        assert_eq!(Command::List.to_string(), "L");
        assert_eq!(Command::Quit.to_string(), "Q");
    }

    #[test]
    fn scenario() {
        let (status, out, left) = run("3\nA 2\nx y\nL\nR 1\nL\nQ\n");
        assert!(status.is_quit());
        assert_eq!(status.exit_code(), 0);
        assert_eq!(out, "x\ny\ny\n");
        assert_eq!(left, ["y"]);
    }

    #[test]
    fn list_wraps_around() {
        let (status, out, _) = run("3 A 3 a b c R 1 A 1 d L Q");
        assert!(status.is_quit());
        assert_eq!(out, "b\nc\nd\n");
    }

    #[test]
    fn list_empty_prints_nothing() {
        let (status, out, _) = run("2 L A 1 x R 1 L Q");
        assert!(status.is_quit());
        assert_eq!(out, "");
    }

    #[test]
    fn quit_stops_reading() {
        let (status, out, _) = run("2 Q L garbage");
        assert!(status.is_quit());
        assert_eq!(out, "");
    }

    #[test]
    fn append_overflow_is_fatal() {
        let (status, out, left) = run("2 A 3 a b c L Q");
        assert_eq!(fault_kind(&status), Some(ErrorKind::BufferFull));
        assert_eq!(status.exit_code(), 1);
        assert_eq!(out, "");
        assert_eq!(left, ["a", "b"]);
    }

    #[test]
    fn remove_underflow_is_fatal() {
        let (status, _, left) = run("2 A 1 a R 2 Q");
        assert_eq!(fault_kind(&status), Some(ErrorKind::BufferEmpty));
        assert!(left.is_empty());
    }

    #[test]
    fn zero_capacity_rejects_appends() {
        let (status, _, _) = run("0 L A 1 x Q");
        assert_eq!(fault_kind(&status), Some(ErrorKind::BufferFull));

        let (status, _, _) = run("0 A 0 L Q");
        assert!(status.is_quit());
    }

    #[test]
    fn input_faults() {
        for script in &["", "three A 1 x Q", "-3 Q", "2 A 1 x", "2 A 2 x", "2 Z Q"] {
            let (status, _, _) = run(script);
            assert_eq!(fault_kind(&status), Some(ErrorKind::InputFileFault),
                       "script {:?}", script);
        }
    }

    #[test]
    fn output_fault() {
        struct Broken;

        impl Write for Broken {
            fn write(&mut self, _: &[u8]) -> io::Result<usize> {
                Err(io::Error::new(io::ErrorKind::BrokenPipe, "closed"))
            }

            fn flush(&mut self) -> io::Result<()> {
                Ok(())
            }
        }

        let status = Interpreter::new(Broken).run("1 A 1 x L Q".as_bytes());
        assert_eq!(fault_kind(&status), Some(ErrorKind::OutputFault));
    }

    #[test]
    fn run_file_reads_script() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("script.txt");
        std::fs::write(&path, "3\nA 2\nx y\nL\nQ\n").unwrap();

        let mut interp = Interpreter::new(Vec::new());
        assert!(interp.run_file(&path).is_quit());
        assert_eq!(interp.into_inner(), b"x\ny\n");
    }

    #[test]
    fn run_file_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.txt");

        let status = Interpreter::new(Vec::new()).run_file(&path);
        assert_eq!(fault_kind(&status), Some(ErrorKind::InputFileFault));
        assert!(status.to_string().contains("Cannot open file"));
    }

    struct BreaksAfter {
        chunk: Option<&'static [u8]>,
    }

    impl io::Read for BreaksAfter {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            match self.chunk.take() {
                Some(chunk) => {
                    buf[..chunk.len()].copy_from_slice(chunk);
                    Ok(chunk.len())
                }
                None => Err(io::Error::new(io::ErrorKind::Other, "stream broke")),
            }
        }
    }

    #[test]
    fn quit_before_broken_stream() {
        let input = io::BufReader::new(BreaksAfter { chunk: Some(&b"2 A 1 x L Q\n"[..]) });
        let mut interp = Interpreter::new(Vec::new());
        assert!(interp.run(input).is_quit());
        assert_eq!(interp.into_inner(), b"x\n");
    }

    #[test]
    fn broken_stream_keeps_earlier_output() {
        let input = io::BufReader::new(BreaksAfter { chunk: Some(&b"2 A 1 x L\n"[..]) });
        let mut interp = Interpreter::new(Vec::new());
        let status = interp.run(input);
        assert_eq!(fault_kind(&status), Some(ErrorKind::InputFileFault));
        assert!(status.to_string().contains("stream broke"));
        assert_eq!(interp.into_inner(), b"x\n");
    }

    #[test]
    fn invalid_utf8_after_quit_is_never_decoded() {
        let mut interp = Interpreter::new(Vec::new());
        let status = interp.run(&b"2 A 1 x L Q \xff\xfe"[..]);
        assert!(status.is_quit());
        assert_eq!(interp.into_inner(), b"x\n");
    }

    #[test]
    fn invalid_utf8_value_is_input_fault() {
        let mut interp = Interpreter::new(Vec::new());
        let status = interp.run(&b"2 A 1 x L A 1 \xff Q"[..]);
        assert_eq!(fault_kind(&status), Some(ErrorKind::InputFileFault));
        assert_eq!(interp.into_inner(), b"x\n");
    }

    #[test]
    fn tokens_read_line_by_line() {
        let mut tokens = Tokens::new("A 1\n  \n\nx\tQ\n".as_bytes());
        assert_eq!(tokens.next_token("a command").unwrap(), "A");
        assert_eq!(tokens.next_count("a count").unwrap(), 1);
        assert_eq!(tokens.next_token("a value").unwrap(), "x");
        assert_eq!(tokens.next_token("a command").unwrap(), "Q");
        assert_eq!(tokens.next_token("a command").unwrap_err().kind(),
                   ErrorKind::InputFileFault);
    }
}
