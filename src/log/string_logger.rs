// SPDX-FileCopyrightText: 2024 Softbear, Inc.
// SPDX-License-Identifier: AGPL-3.0-or-later

use crate::common::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct LoggerInner {
    lines: Vec<String>,
    warn: bool,
}

/// Thread-safe string logger. One is created per request; lines are echoed
/// to stdout as they arrive when `debug` is set.
#[derive(Clone, Default)]
pub struct StringLogger {
    debug: bool,
    inner: Arc<Mutex<LoggerInner>>,
    label: Option<&'static str>,
}

impl StringLogger {
    /// Create a new string logger.
    pub fn new(debug: bool) -> Self {
        Self {
            debug,
            inner: Arc::new(Mutex::new(Default::default())),
            label: None,
        }
    }

    /// Create a new string logger whose echoed lines are prefixed with `[label]`.
    pub fn labeled(debug: bool, label: &'static str) -> Self {
        Self {
            label: Some(label),
            ..Self::new(debug)
        }
    }

    /// Trace the outcome of a fallible step and pass the result through.
    pub fn call<T>(&self, line: String, result: Result<T, Error>) -> Result<T, Error> {
        match &result {
            Ok(_) => self.trace(format!("{line} succeeded")),
            Err(e) => self.warn(format!("{line} failed: {e}")),
        }
        result
    }

    /// Whether the log contains any warnings.
    pub fn contains_warnings(&self) -> bool {
        self.inner
            .lock()
            .map(|inner| inner.warn)
            .unwrap_or(false)
    }

    /// A copy of the recorded lines.
    pub fn lines(&self) -> Vec<String> {
        self.inner
            .lock()
            .map(|inner| inner.lines.clone())
            .unwrap_or_default()
    }

    /// Add a trace line to this logger.
    pub fn trace(&self, line: String) {
        self.push(line, false);
    }

    /// Add a warning or error line to this logger.
    pub fn warn(&self, line: String) {
        self.push(line, true);
    }

    fn push(&self, line: String, warn: bool) {
        if line.is_empty() {
            return;
        }
        if self.debug || warn {
            match self.label {
                Some(label) => println!("[{label}] {line}"),
                None => println!("{line}"),
            }
        }
        if let Ok(mut inner) = self.inner.lock() {
            inner.lines.push(line);
            if warn {
                inner.warn = true;
            }
        }
    }
}

impl Display for StringLogger {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self.inner.lock() {
            Ok(inner) => f.write_str(&inner.lines.join("\n")),
            Err(_) => Ok(()),
        }
    }
}
