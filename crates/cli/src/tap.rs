//! Test Anything Protocol writer.

use std::fmt::Write as _;

/// Accumulates TAP lines and emits them on [`Tap::finish`].
///
/// The plan line `1..N` goes first, so output is buffered until the run
/// ends.
#[derive(Debug, Default)]
pub struct Tap {
    lines: Vec<String>,
    count: usize,
    failures: usize,
}

impl Tap {
    pub fn new() -> Self {
        Tap::default()
    }

    pub fn ok(&mut self, name: &str) {
        self.count += 1;
        self.lines.push(format!("ok {} - {}", self.count, name));
    }

    /// A failing point, with `diagnostic` printed as `# ` comment lines.
    pub fn not_ok(&mut self, name: &str, diagnostic: impl AsRef<str>) {
        self.count += 1;
        self.failures += 1;
        self.lines.push(format!("not ok {} - {}", self.count, name));
        for line in diagnostic.as_ref().lines() {
            self.lines.push(format!("  # {}", line));
        }
    }

    pub fn failure_count(&self) -> usize {
        self.failures
    }

    pub fn render(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "TAP version 13");
        let _ = writeln!(out, "1..{}", self.count);
        for line in &self.lines {
            let _ = writeln!(out, "{}", line);
        }
        let _ = writeln!(
            out,
            "# {} passed, {} failed",
            self.count - self.failures,
            self.failures
        );
        out
    }

    pub fn finish(self) {
        print!("{}", self.render());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plan_and_diagnostics() {
        let mut tap = Tap::new();
        tap.ok("first");
        tap.not_ok("second", "line one\nline two");
        assert_eq!(tap.failure_count(), 1);
        assert_eq!(
            tap.render(),
            "TAP version 13\n1..2\nok 1 - first\nnot ok 2 - second\n  # line one\n  # line two\n# 1 passed, 1 failed\n"
        );
    }

    #[test]
    fn empty_run() {
        assert!(Tap::new().render().contains("1..0"));
    }
}
