//! Interactive prompts on a terminal

use std::io::{self, BufRead, StdinLock, Stdout, Write};

use super::SelectionProvider;
use crate::backup::retention::parse_min_age;
use crate::error::{MailBackupError, MailBackupResult};

/// Asks questions on `output` and reads answers line by line from `input`
pub struct TerminalPrompt<R, W> {
    input: R,
    output: W,
    /// Answer every confirmation with yes without asking
    assume_yes: bool,
}

impl TerminalPrompt<StdinLock<'static>, Stdout> {
    /// Prompt on the process's stdin and stdout
    pub fn stdio(assume_yes: bool) -> Self {
        Self::new(io::stdin().lock(), io::stdout(), assume_yes)
    }
}

impl<R: BufRead, W: Write> TerminalPrompt<R, W> {
    pub fn new(input: R, output: W, assume_yes: bool) -> Self {
        Self {
            input,
            output,
            assume_yes,
        }
    }

    /// Print a prompt and read one trimmed line; `None` on end of input
    fn prompt_string(&mut self, prompt: &str) -> MailBackupResult<Option<String>> {
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut input = String::new();
        if self.input.read_line(&mut input)? == 0 {
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(input.trim().to_string()))
    }
}

impl<R: BufRead, W: Write> SelectionProvider for TerminalPrompt<R, W> {
    fn select_domains(&mut self, available: &[String]) -> MailBackupResult<Vec<String>> {
        if available.is_empty() {
            return Ok(Vec::new());
        }

        writeln!(self.output)?;
        writeln!(self.output, "Which domains should be backed up?")?;
        for (i, domain) in available.iter().enumerate() {
            writeln!(self.output, "  {:>3}. {}", i + 1, domain)?;
        }
        writeln!(self.output)?;

        let answer = match self.prompt_string("Select domains (numbers or names, 'all') []: ")? {
            Some(answer) => answer,
            None => return Ok(Vec::new()),
        };
        parse_domain_selection(&answer, available)
    }

    fn prompt_min_age(&mut self, default: u32) -> MailBackupResult<u32> {
        let prompt = format!(
            "How old must a mailbox be before it is deleted? (days) [{}]: ",
            default
        );
        match self.prompt_string(&prompt)? {
            Some(answer) => parse_min_age(&answer, default),
            None => Ok(default),
        }
    }

    fn confirm(&mut self, message: &str) -> MailBackupResult<bool> {
        if self.assume_yes {
            writeln!(self.output, "{} (yes/no) [no]: yes", message)?;
            return Ok(true);
        }

        let answer = self.prompt_string(&format!("{} (yes/no) [no]: ", message))?;
        Ok(matches!(
            answer.map(|a| a.to_lowercase()).as_deref(),
            Some("y") | Some("yes")
        ))
    }
}

/// Turn "1 3", "1,3", "example.com other.org" or "all" into domain names
pub fn parse_domain_selection(answer: &str, available: &[String]) -> MailBackupResult<Vec<String>> {
    let answer = answer.trim();
    if answer.eq_ignore_ascii_case("all") || answer == "*" {
        return Ok(available.to_vec());
    }

    let mut selected: Vec<String> = Vec::new();
    for token in answer.split(|c: char| c == ',' || c.is_whitespace()) {
        if token.is_empty() {
            continue;
        }

        let domain = if let Ok(index) = token.parse::<usize>() {
            available
                .get(index.wrapping_sub(1))
                .ok_or_else(|| {
                    MailBackupError::InvalidArgument(format!(
                        "no domain numbered {} (choose 1-{})",
                        index,
                        available.len()
                    ))
                })?
                .clone()
        } else if available.iter().any(|d| d == token) {
            token.to_string()
        } else {
            return Err(MailBackupError::InvalidArgument(format!(
                "unknown domain '{}'",
                token
            )));
        };

        if !selected.contains(&domain) {
            selected.push(domain);
        }
    }

    Ok(selected)
}
