//! Line-based interactive questions

use std::io::{self, BufRead, Stdin, StdinLock, Stdout, Write};

use crate::{Result, ScaffoldError};

/// Source of answers for interactive questions
pub trait Prompt {
    /// Pick one of `choices`, returning its index
    fn select(&mut self, message: &str, choices: &[&str], default: usize) -> Result<usize>;

    /// Free-form text, `default` on empty input
    fn input(&mut self, message: &str, default: &str) -> Result<String>;

    /// Yes or no
    fn confirm(&mut self, message: &str, default: bool) -> Result<bool>;
}

/// Prompt reading answers line by line from `reader` and printing questions to `writer`
pub struct TerminalPrompt<R, W> {
    reader: R,
    writer: W,
}

impl TerminalPrompt<StdinLock<'static>, Stdout> {
    pub fn stdio() -> Self {
        let stdin: Stdin = io::stdin();
        Self::new(stdin.lock(), io::stdout())
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self { reader, writer }
    }

    fn ask(&mut self, question: &str) -> Result<String> {
        write!(self.writer, "{question}")?;
        self.writer.flush()?;

        let mut line = String::new();
        if self.reader.read_line(&mut line)? == 0 {
            return Err(ScaffoldError::PromptClosed);
        }
        Ok(line.trim().to_string())
    }
}

impl<R: BufRead, W: Write> Prompt for TerminalPrompt<R, W> {
    fn select(&mut self, message: &str, choices: &[&str], default: usize) -> Result<usize> {
        let default = default.min(choices.len().saturating_sub(1));
        writeln!(self.writer, "? {message}")?;
        for (i, choice) in choices.iter().enumerate() {
            let marker = if i == default { " (default)" } else { "" };
            writeln!(self.writer, "  {}) {choice}{marker}", i + 1)?;
        }

        loop {
            let answer = self.ask("> ")?;
            if answer.is_empty() {
                return Ok(default);
            }
            if let Ok(n) = answer.parse::<usize>() {
                if (1..=choices.len()).contains(&n) {
                    return Ok(n - 1);
                }
            }
            if let Some(i) = choices.iter().position(|c| c.eq_ignore_ascii_case(&answer)) {
                return Ok(i);
            }
            writeln!(
                self.writer,
                "Please enter a number between 1 and {}.",
                choices.len()
            )?;
        }
    }

    fn input(&mut self, message: &str, default: &str) -> Result<String> {
        let answer = self.ask(&format!("? {message} ({default}) "))?;
        if answer.is_empty() {
            Ok(default.to_string())
        } else {
            Ok(answer)
        }
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool> {
        let hint = if default { "(Y/n)" } else { "(y/N)" };
        loop {
            let answer = self.ask(&format!("? {message} {hint} "))?;
            match answer.to_lowercase().as_str() {
                "" => return Ok(default),
                "y" | "yes" => return Ok(true),
                "n" | "no" => return Ok(false),
                _ => writeln!(self.writer, "Please answer y or n.")?,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn prompt(input: &str) -> TerminalPrompt<Cursor<String>, Vec<u8>> {
        TerminalPrompt::new(Cursor::new(input.to_string()), Vec::new())
    }

    #[test]
    fn test_select_by_number_name_and_default() {
        let choices = ["TypeScript", "JavaScript"];

        assert_eq!(prompt("2\n").select("Lang?", &choices, 0).unwrap(), 1);
        assert_eq!(prompt("javascript\n").select("Lang?", &choices, 0).unwrap(), 1);
        assert_eq!(prompt("\n").select("Lang?", &choices, 1).unwrap(), 1);
    }

    #[test]
    fn test_select_reasks_on_invalid_answer() {
        let mut p = prompt("7\nrust\n1\n");
        assert_eq!(p.select("Lang?", &["TypeScript", "JavaScript"], 1).unwrap(), 0);

        let output = String::from_utf8(p.writer).unwrap();
        assert!(output.contains("  1) TypeScript"));
        assert!(output.contains("  2) JavaScript (default)"));
        assert_eq!(output.matches("Please enter a number between 1 and 2.").count(), 2);
    }

    #[test]
    fn test_input_trims_and_defaults() {
        assert_eq!(prompt("  e2e  \n").input("Dir?", "tests").unwrap(), "e2e");
        assert_eq!(prompt("\n").input("Dir?", "tests").unwrap(), "tests");
    }

    #[test]
    fn test_confirm() {
        assert!(prompt("y\n").confirm("Ok?", false).unwrap());
        assert!(prompt("YES\n").confirm("Ok?", false).unwrap());
        assert!(!prompt("n\n").confirm("Ok?", true).unwrap());
        assert!(prompt("\n").confirm("Ok?", true).unwrap());
        assert!(!prompt("maybe\n\n").confirm("Ok?", false).unwrap());
    }

    #[test]
    fn test_confirm_hint_reflects_default() {
        let mut p = prompt("\n");
        p.confirm("Add a GitHub Actions workflow?", false).unwrap();
        let output = String::from_utf8(p.writer).unwrap();
        assert_eq!(output, "? Add a GitHub Actions workflow? (y/N) ");
    }

    #[test]
    fn test_closed_input_is_an_error() {
        let err = prompt("").confirm("Ok?", true).unwrap_err();
        assert!(matches!(err, ScaffoldError::PromptClosed));
    }
}
