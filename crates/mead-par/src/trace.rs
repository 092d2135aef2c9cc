//! Deferred derivation tracing.
//!
//! Every `take_*` production opens a frame that records Start / Success /
//! Failure breadcrumbs. When a frame closes, its lines are folded into the
//! parent frame with one extra level of indentation, so the finished buffer
//! reads as the full derivation attempt in call order. The buffer is kept
//! until the caller asks for it; nothing is printed while parsing runs.

/// One open production in the derivation.
#[derive(Debug)]
struct Frame {
    lines: Vec<String>,
}

/// Collects the nested derivation trace of one parse.
#[derive(Debug, Default)]
pub struct Trace {
    /// Completed top-level lines, in call order.
    finished: Vec<String>,
    /// Stack of open frames, innermost last.
    open: Vec<Frame>,
}

impl Trace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a frame for a production, logging its start.
    pub fn start(&mut self, production: &str, at: impl std::fmt::Display) {
        let mut frame = Frame { lines: Vec::new() };
        frame.lines.push(format!("Start {} @ {}", production, at));
        self.open.push(frame);
    }

    /// Record a free-form line in the innermost frame.
    pub fn note(&mut self, line: impl Into<String>) {
        if let Some(frame) = self.open.last_mut() {
            frame.lines.push(line.into());
        } else {
            self.finished.push(line.into());
        }
    }

    /// Close the innermost frame as succeeded.
    pub fn success(&mut self, production: &str) {
        self.close(format!("Success {}", production));
    }

    /// Close the innermost frame as failed.
    pub fn failure(&mut self, production: &str, why: &str) {
        self.close(format!("Failure {}: {}", production, why));
    }

    fn close(&mut self, last_line: String) {
        let mut frame = match self.open.pop() {
            Some(frame) => frame,
            None => {
                self.finished.push(last_line);
                return;
            }
        };
        frame.lines.push(last_line);

        let target = match self.open.last_mut() {
            Some(parent) => &mut parent.lines,
            None => &mut self.finished,
        };
        for line in frame.lines {
            target.push(format!("  {}", line));
        }
    }

    /// The finished trace, one line per entry.
    ///
    /// Open frames are not included; call after parsing completes.
    pub fn lines(&self) -> &[String] {
        &self.finished
    }

    /// Render the finished trace as one string.
    pub fn render(&self) -> String {
        self.finished.join("\n")
    }
}
