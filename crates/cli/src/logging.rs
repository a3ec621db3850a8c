use crate::config::LoggingConfig;
use regex::Regex;
use std::io;
use tracing_subscriber::{fmt, prelude::*, EnvFilter, Layer};

struct RedactingWriter<W> {
    inner: W,
    patterns: Vec<(Regex, String)>,
}

impl<W: io::Write> io::Write for RedactingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let s = String::from_utf8_lossy(buf);
        self.inner.write_all(redact(&s, &self.patterns).as_bytes())?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

struct RedactingMakeWriter {
    patterns: Vec<(Regex, String)>,
}

impl<'a> fmt::MakeWriter<'a> for RedactingMakeWriter {
    type Writer = RedactingWriter<io::Stderr>;

    fn make_writer(&self) -> Self::Writer {
        RedactingWriter {
            inner: io::stderr(),
            patterns: self.patterns.clone(),
        }
    }
}

fn redact(line: &str, patterns: &[(Regex, String)]) -> String {
    let mut redacted = line.to_string();
    for (re, replacement) in patterns {
        redacted = re.replace_all(&redacted, replacement.as_str()).to_string();
    }
    redacted
}

/// Compile the configured patterns; returns the names of the ones that failed.
fn compile_patterns(config: &LoggingConfig) -> (Vec<(Regex, String)>, Vec<String>) {
    let mut patterns = Vec::new();
    let mut invalid = Vec::new();
    if config.redaction.enabled {
        for p in &config.redaction.patterns {
            match Regex::new(&p.regex) {
                Ok(re) => patterns.push((re, p.placeholder.clone())),
                Err(_) => invalid.push(p.name.clone()),
            }
        }
    }
    (patterns, invalid)
}

pub fn init_logging(config: &LoggingConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.level));

    let (patterns, invalid) = compile_patterns(config);
    let make_writer = RedactingMakeWriter { patterns };

    // Use Layer::boxed() to unify the types of the branches
    let fmt_layer = match (config.json, config.show_time) {
        (true, _) => fmt::layer()
            .json()
            .with_writer(make_writer)
            .with_target(config.show_target)
            .boxed(),
        (false, true) => fmt::layer()
            .with_writer(make_writer)
            .with_target(config.show_target)
            .boxed(),
        (false, false) => fmt::layer()
            .with_writer(make_writer)
            .with_target(config.show_target)
            .without_time()
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();

    for name in invalid {
        tracing::warn!(pattern = %name, "ignoring invalid redaction pattern");
    }
}
