//! Format command for rendering a number of seconds as `MM:SS.CC`.

use std::io::Write;

use anyhow::Result;
use smile_core::format_seconds;

pub fn run<W: Write>(writer: &mut W, seconds: f64) -> Result<()> {
    writeln!(writer, "{}", format_seconds(seconds))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format_command_prints_one_line() {
        let mut output = Vec::new();
        run(&mut output, 61.23).unwrap();
        assert_eq!(String::from_utf8(output).unwrap(), "01:01.23\n");
    }
}
