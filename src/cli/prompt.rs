use std::{future::Future, io::Write};

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};

/// Source of interactive answers. Questions block until a whole line is provided.
pub trait Prompt {
    fn ask(&mut self, question: &str) -> impl Future<Output = Result<String>>;
}

pub struct StdinPrompt {
    lines: Lines<BufReader<Stdin>>,
}

impl StdinPrompt {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(tokio::io::stdin()).lines(),
        }
    }
}

impl Default for StdinPrompt {
    fn default() -> Self {
        Self::new()
    }
}

impl Prompt for StdinPrompt {
    async fn ask(&mut self, question: &str) -> Result<String> {
        let mut stdout = std::io::stdout();
        write!(stdout, "{question}")?;
        stdout.flush()?;
        // A closed stdin answers everything with an empty line.
        Ok(self.lines.next_line().await?.unwrap_or_default())
    }
}

/// Yes/no answers. Only an explicit `y` or `yes` counts as yes.
pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
}
