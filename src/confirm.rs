//! Cost confirmation before committing to a billable job.

use crate::video::{Quote, VideoJobConfig};
use std::io::{BufRead, Write};

/// Capability to approve a billable job after seeing its quote.
///
/// The orchestrator calls this between quoting and queueing; a `false`
/// answer aborts before any billable state exists.
pub trait Confirm {
    /// Returns whether the user accepts the quoted cost.
    fn confirm(&self, quote: &Quote, config: &VideoJobConfig) -> std::io::Result<bool>;
}

/// Interactive confirmation on the controlling terminal.
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleConfirm;

impl Confirm for ConsoleConfirm {
    fn confirm(&self, quote: &Quote, config: &VideoJobConfig) -> std::io::Result<bool> {
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        prompt_loop(stdin.lock(), stdout.lock(), quote, config)
    }
}

/// Non-interactive confirmation that accepts every quote (`--yes`).
#[derive(Debug, Clone, Copy, Default)]
pub struct AlwaysConfirm;

impl Confirm for AlwaysConfirm {
    fn confirm(&self, _quote: &Quote, _config: &VideoJobConfig) -> std::io::Result<bool> {
        Ok(true)
    }
}

fn prompt_loop<R: BufRead, W: Write>(
    mut reader: R,
    mut writer: W,
    quote: &Quote,
    config: &VideoJobConfig,
) -> std::io::Result<bool> {
    writeln!(writer)?;
    writeln!(writer, "Estimated cost: ${quote} USD")?;
    writeln!(writer)?;
    writeln!(writer, "Configuration:")?;
    writeln!(writer, "  Model: {}", config.model)?;
    writeln!(writer, "  Duration: {}", config.duration)?;
    writeln!(writer, "  Resolution: {}", config.resolution)?;
    if let Some(ref ratio) = config.aspect_ratio {
        writeln!(writer, "  Aspect ratio: {ratio}")?;
    }
    writeln!(writer, "  Audio: {}", if config.audio { "yes" } else { "no" })?;
    writeln!(writer)?;
    writeln!(writer, "Video generation will be charged to your account.")?;

    loop {
        write!(writer, "\nDo you want to proceed? (yes/no): ")?;
        writer.flush()?;

        let mut line = String::new();
        if reader.read_line(&mut line)? == 0 {
            // EOF: treat as a decline rather than proceeding with a charge
            return Ok(false);
        }

        match parse_answer(&line) {
            Some(answer) => return Ok(answer),
            None => writeln!(writer, "Please enter 'yes' or 'no'")?,
        }
    }
}

fn parse_answer(line: &str) -> Option<bool> {
    match line.trim().to_lowercase().as_str() {
        "yes" | "y" => Some(true),
        "no" | "n" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn quote() -> Quote {
        Quote { amount: 0.42 }
    }

    #[test]
    fn test_parse_answer() {
        assert_eq!(parse_answer("yes\n"), Some(true));
        assert_eq!(parse_answer("  Y  \n"), Some(true));
        assert_eq!(parse_answer("no\n"), Some(false));
        assert_eq!(parse_answer("N\n"), Some(false));
        assert_eq!(parse_answer("maybe\n"), None);
        assert_eq!(parse_answer("\n"), None);
    }

    #[test]
    fn test_prompt_loop_accept() {
        let mut out = Vec::new();
        let answer = prompt_loop(
            Cursor::new(b"yes\n".to_vec()),
            &mut out,
            &quote(),
            &VideoJobConfig::new(),
        )
        .unwrap();
        assert!(answer);

        let shown = String::from_utf8(out).unwrap();
        assert!(shown.contains("$0.4200 USD"));
        assert!(shown.contains("wan-2.5-preview-image-to-video"));
    }

    #[test]
    fn test_prompt_loop_decline() {
        let mut out = Vec::new();
        let answer = prompt_loop(
            Cursor::new(b"n\n".to_vec()),
            &mut out,
            &quote(),
            &VideoJobConfig::new(),
        )
        .unwrap();
        assert!(!answer);
    }

    #[test]
    fn test_prompt_loop_reprompts_until_recognized() {
        let mut out = Vec::new();
        let answer = prompt_loop(
            Cursor::new(b"what\nsure\nyes\n".to_vec()),
            &mut out,
            &quote(),
            &VideoJobConfig::new(),
        )
        .unwrap();
        assert!(answer);

        let shown = String::from_utf8(out).unwrap();
        assert_eq!(shown.matches("Please enter 'yes' or 'no'").count(), 2);
    }

    #[test]
    fn test_prompt_loop_eof_declines() {
        let mut out = Vec::new();
        let answer = prompt_loop(
            Cursor::new(Vec::new()),
            &mut out,
            &quote(),
            &VideoJobConfig::new(),
        )
        .unwrap();
        assert!(!answer);
    }

    #[test]
    fn test_always_confirm() {
        let answer = AlwaysConfirm
            .confirm(&quote(), &VideoJobConfig::new())
            .unwrap();
        assert!(answer);
    }
}
