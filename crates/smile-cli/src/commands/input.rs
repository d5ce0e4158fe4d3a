//! JSONL event input shared by `run` and `replay`.
//!
//! One [`SessionEvent`] per line. Blank lines and lines starting with `#` are
//! skipped.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

use anyhow::{Context, Result};
use smile_core::SessionEvent;

/// Parses one input line; `Ok(None)` for lines that carry no event.
pub fn parse_event(line: &str, line_no: usize) -> Result<Option<SessionEvent>> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return Ok(None);
    }
    serde_json::from_str(trimmed)
        .map(Some)
        .with_context(|| format!("invalid event on line {line_no}"))
}

/// Reads every event from `reader`, failing on the first malformed line.
pub fn read_events<R: BufRead>(reader: R) -> Result<Vec<SessionEvent>> {
    let mut events = Vec::new();
    for (index, line) in reader.lines().enumerate() {
        let line = line.context("failed to read input")?;
        if let Some(event) = parse_event(&line, index + 1)? {
            events.push(event);
        }
    }
    Ok(events)
}

/// Opens `path`, or stdin when no path is given.
pub fn open(path: Option<&Path>) -> Result<Box<dyn BufRead>> {
    match path {
        Some(path) => {
            let file =
                File::open(path).with_context(|| format!("failed to open {}", path.display()))?;
            Ok(Box::new(BufReader::new(file)))
        }
        None => Ok(Box::new(io::stdin().lock())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn skips_blank_and_comment_lines() {
        let input = "\n# recorded on a phone\n{\"type\":\"background\"}\n   \n";
        let events = read_events(input.as_bytes()).unwrap();
        assert_eq!(events, vec![SessionEvent::Background { at: None }]);
    }

    #[test]
    fn reports_line_number_of_bad_event() {
        let input = "{\"type\":\"foreground\"}\n{\"type\":\"wink\"}\n";
        let err = read_events(input.as_bytes()).unwrap_err();
        assert_eq!(err.to_string(), "invalid event on line 2");
    }
}
