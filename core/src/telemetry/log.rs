use std::fmt;

use log::{debug, error, info, warn};

/// Scoped logger shared by the pipeline stages.
pub struct LogManager {
    target: &'static str,
}

impl LogManager {
    pub fn new(target: &'static str) -> Self {
        Self { target }
    }

    pub fn record(&self, args: fmt::Arguments<'_>) {
        info!(target: self.target, "{}", args);
    }

    pub fn detail(&self, args: fmt::Arguments<'_>) {
        debug!(target: self.target, "{}", args);
    }

    pub fn warning(&self, args: fmt::Arguments<'_>) {
        warn!(target: self.target, "{}", args);
    }

    pub fn failure(&self, args: fmt::Arguments<'_>) {
        error!(target: self.target, "{}", args);
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new("sweepcore")
    }
}
