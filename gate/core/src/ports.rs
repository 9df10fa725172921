use std::sync::LazyLock;

use regex::Regex;

/// One `container-port -> host-port` association parsed from the runtime's
/// raw port text.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PortMapping {
    pub container_port: u16,
    pub host_port: u16,
}

/// A raw port line that does not match the expected shape. Fatal: a missing
/// port publication is a correctness defect, not a warning.
#[derive(Debug, thiserror::Error)]
pub enum MalformedMapping {
    #[error("port mapping line '{line}' does not match '<port>/<proto> -> <addr>:<port>'")]
    Shape { line: String },
    #[error("port mapping line '{line}' contains an out-of-range port")]
    PortRange { line: String },
}

// Grammar for one mapping line, e.g. "5432/tcp -> 0.0.0.0:32769".
// Bracketed IPv6 host addresses and multiple protocol suffixes are
// deliberately unsupported.
static MAPPING_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)/([A-Za-z]+)\s*->\s*([^\s:\[\]]+):(\d+)$").expect("port mapping regex")
});

/// Parse one raw mapping line into a typed `PortMapping`.
pub fn parse_port_mapping(line: &str) -> Result<PortMapping, MalformedMapping> {
    let trimmed = line.trim();
    let captures = MAPPING_LINE
        .captures(trimmed)
        .ok_or_else(|| MalformedMapping::Shape {
            line: trimmed.to_owned(),
        })?;

    Ok(PortMapping {
        container_port: parse_port(&captures[1], trimmed)?,
        host_port: parse_port(&captures[4], trimmed)?,
    })
}

fn parse_port(raw: &str, line: &str) -> Result<u16, MalformedMapping> {
    match raw.parse::<u16>() {
        Ok(port) if port > 0 => Ok(port),
        _ => Err(MalformedMapping::PortRange {
            line: line.to_owned(),
        }),
    }
}

/// Compose the published variable name for one mapping. Deterministic so
/// repeated runs against the same topology produce stable names.
#[must_use]
pub fn variable_name(project: &str, service: &str, container_port: u16) -> String {
    format!("project.{project}.service.{service}.port.{container_port}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_well_formed_lines() {
        let mapping = parse_port_mapping("5432/tcp -> 0.0.0.0:32769").expect("mapping");
        assert_eq!(
            mapping,
            PortMapping {
                container_port: 5432,
                host_port: 32769
            }
        );

        let mapping = parse_port_mapping("  53/udp -> 127.0.0.1:30053\n").expect("mapping");
        assert_eq!(
            mapping,
            PortMapping {
                container_port: 53,
                host_port: 30053
            }
        );
    }

    #[test]
    fn line_without_arrow_is_malformed() {
        let err = parse_port_mapping("5432/tcp 0.0.0.0:32769").expect_err("no arrow");
        assert!(matches!(err, MalformedMapping::Shape { .. }));
    }

    #[test]
    fn non_numeric_ports_are_malformed() {
        for line in [
            "abc/tcp -> 0.0.0.0:32769",
            "5432/tcp -> 0.0.0.0:many",
            "5432/tcp -> 0.0.0.0:",
            "garbage",
            "",
        ] {
            let err = parse_port_mapping(line).expect_err("malformed line");
            assert!(matches!(err, MalformedMapping::Shape { .. }), "line: {line}");
        }
    }

    #[test]
    fn out_of_range_ports_are_malformed() {
        for line in ["0/tcp -> 0.0.0.0:32769", "5432/tcp -> 0.0.0.0:65536"] {
            let err = parse_port_mapping(line).expect_err("out-of-range port");
            assert!(
                matches!(err, MalformedMapping::PortRange { .. }),
                "line: {line}"
            );
        }
    }

    #[test]
    fn bracketed_ipv6_hosts_are_unsupported() {
        let err = parse_port_mapping("5432/tcp -> [::]:32769").expect_err("ipv6 host");
        assert!(matches!(err, MalformedMapping::Shape { .. }));
    }

    #[test]
    fn variable_names_are_stable() {
        assert_eq!(
            variable_name("demo", "db", 5432),
            "project.demo.service.db.port.5432"
        );
    }
}
