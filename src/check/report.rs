//! Console rendering of check progress.

use std::io::{self, Write};

use console::style;

/// Sink for check progress; the pipeline only ever talks to this.
pub trait Reporter {
    /// Free-standing heading line (e.g. before the index block).
    fn section(&mut self, title: &str);
    /// A check is about to run.
    fn begin(&mut self, label: &str);
    fn pass(&mut self);
    /// The current check failed; `hint` may span several lines.
    fn fail(&mut self, hint: &str);
}

/// Writes `Checking ... OK` lines to stdout with green/red status tokens.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl ConsoleReporter {
    pub fn new(color: bool) -> Self {
        if !color {
            console::set_colors_enabled(false);
        }
        Self
    }
}

fn flush() {
    let _ = io::stdout().flush();
}

impl Reporter for ConsoleReporter {
    fn section(&mut self, title: &str) {
        println!("{title}");
    }

    fn begin(&mut self, label: &str) {
        print!("Checking {label} ... ");
        flush();
    }

    fn pass(&mut self) {
        println!("{}", style("OK").green());
    }

    fn fail(&mut self, hint: &str) {
        println!("{}", style("Failed").red());
        for line in hint.lines() {
            println!("    {line}");
        }
        flush();
    }
}

#[cfg(test)]
pub(crate) use recording::{Event, RecordingReporter};

#[cfg(test)]
mod recording {
    use super::Reporter;

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Event {
        Section(String),
        Begin(String),
        Pass,
        Fail(String),
    }

    #[derive(Debug, Default)]
    pub struct RecordingReporter {
        pub events: Vec<Event>,
    }

    impl RecordingReporter {
        pub fn labels(&self) -> Vec<&str> {
            self.events
                .iter()
                .filter_map(|e| match e {
                    Event::Begin(l) => Some(l.as_str()),
                    _ => None,
                })
                .collect()
        }

        pub fn passes(&self) -> usize {
            self.events.iter().filter(|e| **e == Event::Pass).count()
        }
    }

    impl Reporter for RecordingReporter {
        fn section(&mut self, title: &str) {
            self.events.push(Event::Section(title.to_string()));
        }

        fn begin(&mut self, label: &str) {
            self.events.push(Event::Begin(label.to_string()));
        }

        fn pass(&mut self) {
            self.events.push(Event::Pass);
        }

        fn fail(&mut self, hint: &str) {
            self.events.push(Event::Fail(hint.to_string()));
        }
    }
}
