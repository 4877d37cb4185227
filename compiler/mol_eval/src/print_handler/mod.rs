//! Output channels.
//!
//! A run writes to two independent channels: program output (`show`,
//! domain statement notices, `display`) and the trace channel (pipe trace
//! reports). Each channel is an [`OutputSink`]; the CLI points them at
//! stdout and stderr, tests and embedders capture them in buffers.

use std::io::{IsTerminal, Write};
use std::sync::Arc;

use parking_lot::Mutex;

/// Sink that accumulates everything written to it.
#[derive(Default)]
pub struct BufferSink {
    buffer: Mutex<String>,
}

impl BufferSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn write_line(&self, line: &str) {
        let mut buf = self.buffer.lock();
        buf.push_str(line);
        buf.push('\n');
    }

    pub fn write_block(&self, block: &str) {
        self.buffer.lock().push_str(block);
    }

    pub fn contents(&self) -> String {
        self.buffer.lock().clone()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

/// Where one channel's text goes.
pub enum OutputSink {
    Stdout,
    Stderr,
    Buffer(BufferSink),
    /// Discards everything.
    Silent,
}

impl OutputSink {
    /// Write one line, adding the newline.
    pub fn write_line(&self, line: &str) {
        match self {
            Self::Stdout => println!("{line}"),
            Self::Stderr => eprintln!("{line}"),
            Self::Buffer(b) => b.write_line(line),
            Self::Silent => {}
        }
    }

    /// Write a pre-formatted multi-line block in one piece.
    pub fn write_block(&self, block: &str) {
        match self {
            Self::Stdout => {
                let mut out = std::io::stdout().lock();
                let _ = out.write_all(block.as_bytes());
                let _ = out.flush();
            }
            Self::Stderr => {
                let mut err = std::io::stderr().lock();
                let _ = err.write_all(block.as_bytes());
            }
            Self::Buffer(b) => b.write_block(block),
            Self::Silent => {}
        }
    }

    /// Captured text; empty for sinks that do not capture.
    pub fn contents(&self) -> String {
        match self {
            Self::Buffer(b) => b.contents(),
            Self::Stdout | Self::Stderr | Self::Silent => String::new(),
        }
    }

    /// Whether the sink is an interactive terminal.
    pub fn is_terminal(&self) -> bool {
        match self {
            Self::Stdout => std::io::stdout().is_terminal(),
            Self::Stderr => std::io::stderr().is_terminal(),
            Self::Buffer(_) | Self::Silent => false,
        }
    }

    pub fn clear(&self) {
        if let Self::Buffer(b) = self {
            b.clear();
        }
    }
}

/// A sink shared between the interpreter and whoever reads it afterwards.
pub type SharedSink = Arc<OutputSink>;

pub fn stdout_sink() -> SharedSink {
    Arc::new(OutputSink::Stdout)
}

pub fn stderr_sink() -> SharedSink {
    Arc::new(OutputSink::Stderr)
}

pub fn buffer_sink() -> SharedSink {
    Arc::new(OutputSink::Buffer(BufferSink::new()))
}

pub fn silent_sink() -> SharedSink {
    Arc::new(OutputSink::Silent)
}

/// The two channels of a run.
#[derive(Clone)]
pub struct Channels {
    pub program: SharedSink,
    pub trace: SharedSink,
}

impl Channels {
    /// Program output on stdout, traces on stderr.
    pub fn stdio() -> Self {
        Channels {
            program: stdout_sink(),
            trace: stderr_sink(),
        }
    }

    /// Both channels captured in separate buffers.
    pub fn buffered() -> Self {
        Channels {
            program: buffer_sink(),
            trace: buffer_sink(),
        }
    }
}
