use std::io::{self, Write};

use compose_gate_core::VariableSink;

/// How published variables are written to stdout.
#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// One `name=value` line per mapping.
    Plain,
    /// TeamCity `##teamcity[setParameter ...]` service messages.
    Teamcity,
}

pub fn sink_for(format: OutputFormat) -> Box<dyn VariableSink> {
    match format {
        OutputFormat::Plain => Box::new(PlainSink::new(io::stdout())),
        OutputFormat::Teamcity => Box::new(TeamCitySink::new(io::stdout())),
    }
}

pub struct PlainSink<W> {
    out: W,
}

impl<W: Write> PlainSink<W> {
    pub const fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> VariableSink for PlainSink<W> {
    fn publish(&mut self, name: &str, value: &str) {
        // Stdout failures at publish time are not worth aborting a stack
        // that is already up and healthy.
        let _ = writeln!(self.out, "{name}={value}");
    }
}

pub struct TeamCitySink<W> {
    out: W,
}

impl<W: Write> TeamCitySink<W> {
    pub const fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> VariableSink for TeamCitySink<W> {
    fn publish(&mut self, name: &str, value: &str) {
        let _ = writeln!(
            self.out,
            "##teamcity[setParameter name='{}' value='{}']",
            escape(name),
            escape(value)
        );
    }
}

// TeamCity service-message escaping.
fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '|' => escaped.push_str("||"),
            '\'' => escaped.push_str("|'"),
            '[' => escaped.push_str("|["),
            ']' => escaped.push_str("|]"),
            '\n' => escaped.push_str("|n"),
            '\r' => escaped.push_str("|r"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_sink_writes_name_value_lines() {
        let mut sink = PlainSink::new(Vec::new());
        sink.publish("project.demo.service.db.port.5432", "32769");

        assert_eq!(
            String::from_utf8(sink.out).expect("utf8"),
            "project.demo.service.db.port.5432=32769\n"
        );
    }

    #[test]
    fn teamcity_sink_writes_set_parameter_messages() {
        let mut sink = TeamCitySink::new(Vec::new());
        sink.publish("project.demo.service.db.port.5432", "32769");

        assert_eq!(
            String::from_utf8(sink.out).expect("utf8"),
            "##teamcity[setParameter name='project.demo.service.db.port.5432' value='32769']\n"
        );
    }

    #[test]
    fn teamcity_escaping_covers_the_special_characters() {
        assert_eq!(escape("a|b'c[d]e\nf\rg"), "a||b|'c|[d|]e|nf|rg");
    }
}
