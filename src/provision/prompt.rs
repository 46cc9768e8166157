//! Interactive yes/no prompts.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

/// Asks yes/no questions. A trait so orchestration tests can script the
/// answers.
pub trait Prompter {
    fn confirm(&mut self, question: &str, default_yes: bool) -> Result<bool>;
}

/// Prompts on stdout and reads answers from stdin.
///
/// Empty input and end of input both select the default, so piped and
/// scripted invocations terminate instead of hanging.
pub struct Console;

impl Prompter for Console {
    #[cfg(not(tarpaulin_include))]
    fn confirm(&mut self, question: &str, default_yes: bool) -> Result<bool> {
        let hint = if default_yes { "[Y/n]" } else { "[y/N]" };
        print!("{question} {hint} ");
        io::stdout().flush().context("flush stdout")?;

        let mut input = String::new();
        let read = io::stdin()
            .lock()
            .read_line(&mut input)
            .context("read answer")?;
        println!();
        if read == 0 {
            return Ok(default_yes);
        }

        let answer = input.trim().to_ascii_lowercase();
        Ok(match answer.as_str() {
            "" => default_yes,
            "y" | "yes" => true,
            _ => false,
        })
    }
}
