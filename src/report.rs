//! Progress output for remove-glob
//!
//! The remover never writes to stdout directly. It hands each line to a
//! `Reporter`, so the binary prints while tests and embedders can capture.

/// Sink for human-readable progress and summary lines
pub trait Reporter {
    fn line(&mut self, line: &str);
}

/// Prints every line to stdout
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn line(&mut self, line: &str) {
        println!("{}", line);
    }
}

/// Keeps lines in memory
#[derive(Debug, Default, Clone)]
pub struct MemoryReporter {
    lines: Vec<String>,
}

impl MemoryReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// True if any captured line contains `needle`
    pub fn contains(&self, needle: &str) -> bool {
        self.lines.iter().any(|l| l.contains(needle))
    }
}

impl Reporter for MemoryReporter {
    fn line(&mut self, line: &str) {
        self.lines.push(line.to_string());
    }
}

/// Discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentReporter;

impl Reporter for SilentReporter {
    fn line(&mut self, _line: &str) {}
}
