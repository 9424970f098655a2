// src/parser.rs

use crate::asc_models::*;
use crate::error::{Error, Result};
use log::debug;
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

// Keeps the attribute value verbatim, interior spacing included.
static SYMATTR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^SYMATTR\s+(\S+)(?:\s+(.*))?$").expect("SYMATTR pattern is valid")
});

/// Reads and parses an ASC file from disk.
pub fn parse_asc_file(path: &Path) -> Result<Schematic> {
    let text = std::fs::read_to_string(path)?;
    parse_asc(&text)
}

/// Parses the text of an LTspice ASC schematic.
///
/// Unknown keywords are skipped. A malformed `Version`, `SHEET`, `SYMBOL`,
/// `SYMATTR`, `WIRE` or `FLAG` line aborts the whole parse. Duplicate
/// components, wires and flags are collapsed to their first occurrence.
pub fn parse_asc(text: &str) -> Result<Schematic> {
    let mut schematic = Schematic::new();
    let mut component_counter = 0usize;
    let mut seen_recognized = false;

    let mut lines = text
        .lines()
        .enumerate()
        .map(|(idx, raw)| (idx + 1, raw.trim()))
        .filter(|(_, line)| !line.is_empty())
        .peekable();

    while let Some((line_no, line)) = lines.next() {
        let tokens: Vec<&str> = line.split_whitespace().collect();

        match tokens[0] {
            "Version" => {
                if seen_recognized {
                    return Err(Error::malformed(
                        line_no,
                        line,
                        "Version must precede all other lines",
                    ));
                }
                require_tokens(&tokens, 2, line_no, line)?;
                schematic.version = Some(tokens[1].to_string());
            }
            "SHEET" => {
                require_tokens(&tokens, 4, line_no, line)?;
                schematic.sheet = Some(Sheet {
                    number: parse_int(tokens[1], line_no, line)?,
                    width: parse_int(tokens[2], line_no, line)?,
                    height: parse_int(tokens[3], line_no, line)?,
                });
            }
            "SYMBOL" => {
                require_tokens(&tokens, 5, line_no, line)?;
                component_counter += 1;
                let mut component = Component {
                    id: format!("comp_{}", component_counter),
                    component_type: tokens[1].to_string(),
                    x: parse_int(tokens[2], line_no, line)?,
                    y: parse_int(tokens[3], line_no, line)?,
                    rotation: tokens[4]
                        .parse()
                        .map_err(|reason: String| Error::malformed(line_no, line, reason))?,
                    attributes: Attributes::new(),
                };

                // Attribute lines bind to the symbol directly above them.
                while let Some((_, next)) = lines.peek() {
                    if next.split_whitespace().next() != Some("SYMATTR") {
                        break;
                    }
                    if let Some((attr_no, attr_line)) = lines.next() {
                        apply_symattr(&mut component, attr_no, attr_line)?;
                    }
                }

                schematic.components.push(component);
            }
            "WIRE" => {
                require_tokens(&tokens, 5, line_no, line)?;
                schematic.wires.push(Wire::new(
                    parse_int(tokens[1], line_no, line)?,
                    parse_int(tokens[2], line_no, line)?,
                    parse_int(tokens[3], line_no, line)?,
                    parse_int(tokens[4], line_no, line)?,
                ));
            }
            "FLAG" => {
                require_tokens(&tokens, 4, line_no, line)?;
                schematic.flags.push(Flag {
                    x: parse_int(tokens[1], line_no, line)?,
                    y: parse_int(tokens[2], line_no, line)?,
                    net_name: tokens[3].to_string(),
                });
            }
            "SYMATTR" => {
                debug!("Line {}: attribute without a preceding symbol, skipping", line_no);
                continue;
            }
            _ => continue,
        }
        seen_recognized = true;
    }

    schematic.dedup();
    debug!(
        "Parsed ASC: {} components, {} wires, {} flags",
        schematic.components.len(),
        schematic.wires.len(),
        schematic.flags.len()
    );
    Ok(schematic)
}

fn apply_symattr(component: &mut Component, line_no: usize, line: &str) -> Result<()> {
    let caps = SYMATTR_RE
        .captures(line)
        .ok_or_else(|| Error::malformed(line_no, line, "expected SYMATTR <name> [value]"))?;
    let key = &caps[1];
    let value = caps.get(2).map(|m| m.as_str()).unwrap_or("");

    if key == "InstName" {
        component.attributes.insert(NAME_KEY, value);
    } else {
        component.attributes.insert(key, value);
    }
    Ok(())
}

fn require_tokens(tokens: &[&str], count: usize, line_no: usize, line: &str) -> Result<()> {
    if tokens.len() < count {
        return Err(Error::malformed(
            line_no,
            line,
            format!("expected {} fields, found {}", count, tokens.len()),
        ));
    }
    Ok(())
}

fn parse_int(token: &str, line_no: usize, line: &str) -> Result<i32> {
    token
        .parse::<i32>()
        .map_err(|_| Error::malformed(line_no, line, format!("`{}` is not an integer", token)))
}
