use anyhow::Result;
use crossterm::{
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use std::io::{self, IsTerminal, Write};

use newswatch_core::NewsItem;
use newswatch_rules::{FailedItem, TriggerSet};

/// Color scheme for terminal output.
struct Colors;

impl Colors {
    const TITLE: Color = Color::Cyan;
    const LINK: Color = Color::DarkGrey;
    const HEADER: Color = Color::Magenta;
    const ERROR: Color = Color::Red;
}

/// Writes command output, colored when the target is a TTY.
pub struct Terminal<W: Write> {
    out: W,
    color: bool,
}

impl Terminal<io::Stdout> {
    pub fn stdout() -> Self {
        let out = io::stdout();
        let color = out.is_terminal();
        Self { out, color }
    }
}

impl<W: Write> Terminal<W> {
    /// Plain (uncolored) output to `out`.
    pub fn plain(out: W) -> Self {
        Self { out, color: false }
    }

    fn colored(&mut self, color: Color, text: &str) -> Result<()> {
        if self.color {
            queue!(self.out, SetForegroundColor(color), Print(text), ResetColor)?;
        } else {
            queue!(self.out, Print(text))?;
        }
        Ok(())
    }

    /// Summary of a compiled trigger file: one line per active trigger.
    pub fn print_check(&mut self, set: &TriggerSet) -> Result<()> {
        self.colored(
            Colors::HEADER,
            &format!(
                "{} active trigger(s), {} definition(s)\n",
                set.len(),
                set.definitions()
            ),
        )?;
        for (n, id) in set.active_ids().iter().enumerate() {
            queue!(self.out, Print(format!("{:>3}. {}\n", n + 1, set.describe(*id))))?;
        }
        self.out.flush()?;
        Ok(())
    }

    /// Matching items as title + link blocks.
    pub fn print_items(&mut self, items: &[&NewsItem]) -> Result<()> {
        for item in items {
            self.colored(Colors::TITLE, &format!("{}\n", item.title()))?;
            if !item.link().is_empty() {
                self.colored(Colors::LINK, &format!("  {}\n", item.link()))?;
            }
        }
        self.out.flush()?;
        Ok(())
    }

    /// Matching items as JSON lines.
    pub fn print_json(&mut self, items: &[&NewsItem]) -> Result<()> {
        for item in items {
            let line = serde_json::to_string(item)?;
            queue!(self.out, Print(line), Print("\n"))?;
        }
        self.out.flush()?;
        Ok(())
    }

    /// Items whose evaluation failed.
    pub fn print_failed(&mut self, failed: &[FailedItem]) -> Result<()> {
        for f in failed {
            self.colored(Colors::ERROR, &format!("item #{}: {}\n", f.index, f.error))?;
        }
        self.out.flush()?;
        Ok(())
    }
}
