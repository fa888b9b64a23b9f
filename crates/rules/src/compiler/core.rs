//! [`TriggerCompiler`]: single-pass rule-file compilation.

use chrono::{FixedOffset, NaiveDateTime};
use indexmap::IndexMap;
use newswatch_core::time::default_reference_zone;
use tracing::{debug, info, warn};

use crate::fuzzy::fuzzy_match;
use crate::trigger::{Trigger, TriggerId, TriggerKind, TriggerSet, TIME_FORMAT};

use super::error::{CompileError, Result};

/// Lines starting with this marker (after leading whitespace) are ignored.
pub const COMMENT_MARKER: &str = "//";

/// First field of an activation line.
pub const ACTIVATE_KEYWORD: &str = "ADD";

/// Compile rule-file lines with the default reference zone.
pub fn compile_config<I, S>(lines: I) -> Result<TriggerSet>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    TriggerCompiler::new().compile(lines)
}

/// Compile a whole rule file held in memory with the default reference zone.
pub fn compile_str(text: &str) -> Result<TriggerSet> {
    TriggerCompiler::new().compile_str(text)
}

/// Compiles trigger rule files into a [`TriggerSet`].
///
/// The compiler itself holds only settings; each call builds its own
/// transient symbol table and is independent of previous calls.
#[derive(Debug, Clone, Copy)]
pub struct TriggerCompiler {
    reference_zone: FixedOffset,
}

impl Default for TriggerCompiler {
    fn default() -> Self {
        Self {
            reference_zone: default_reference_zone(),
        }
    }
}

impl TriggerCompiler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interpret BEFORE/AFTER literals in `zone` instead of the default.
    pub fn with_reference_zone(mut self, zone: FixedOffset) -> Self {
        self.reference_zone = zone;
        self
    }

    pub fn reference_zone(&self) -> FixedOffset {
        self.reference_zone
    }

    /// Compile `lines` top to bottom. Fails on the first bad line.
    pub fn compile<I, S>(&self, lines: I) -> Result<TriggerSet>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut session = Session {
            zone: self.reference_zone,
            set: TriggerSet::new(),
            symbols: IndexMap::new(),
        };

        for (index, raw) in lines.into_iter().enumerate() {
            let content = raw.as_ref().trim_end();
            if content.is_empty() || content.trim_start().starts_with(COMMENT_MARKER) {
                continue;
            }
            session.apply(&Line {
                number: index + 1,
                content,
            })?;
        }

        info!(
            names = session.symbols.len(),
            definitions = session.set.definitions(),
            active = session.set.len(),
            "compiled trigger configuration"
        );
        Ok(session.set)
    }

    pub fn compile_str(&self, text: &str) -> Result<TriggerSet> {
        self.compile(text.lines())
    }
}

// ── Per-compilation state ───────────────────────────────────────────

/// A retained line and its 1-based position in the input.
struct Line<'a> {
    number: usize,
    content: &'a str,
}

impl Line<'_> {
    fn malformed(&self, reason: impl Into<String>) -> CompileError {
        CompileError::MalformedDefinition {
            line: self.number,
            content: self.content.to_string(),
            reason: reason.into(),
        }
    }
}

struct Session {
    zone: FixedOffset,
    set: TriggerSet,
    symbols: IndexMap<String, TriggerId>,
}

impl Session {
    fn apply(&mut self, line: &Line<'_>) -> Result<()> {
        let fields: Vec<&str> = line.content.split(',').map(str::trim).collect();

        if fields[0] == ACTIVATE_KEYWORD {
            return self.activate(line, &fields[1..]);
        }

        let name = fields[0];
        if name.is_empty() {
            return Err(line.malformed("missing trigger name"));
        }
        let token = match fields.get(1) {
            Some(token) if !token.is_empty() => *token,
            _ => return Err(line.malformed("missing trigger type")),
        };
        let kind = TriggerKind::from_token(token).ok_or_else(|| CompileError::UnknownTriggerType {
            line: line.number,
            content: line.content.to_string(),
            kind: token.to_string(),
            suggestion: fuzzy_match(token, TriggerKind::TOKENS).map(str::to_string),
        })?;

        let args = &fields[2..];
        if args.len() != kind.arity() {
            return Err(line.malformed(format!(
                "{} takes {} argument(s), got {}",
                kind,
                kind.arity(),
                args.len()
            )));
        }

        let trigger = match kind {
            TriggerKind::Title => Trigger::title(self.phrase(line, name, args[0])),
            TriggerKind::Description => Trigger::description(self.phrase(line, name, args[0])),
            TriggerKind::Before => Trigger::Before(self.time(line, args[0])?),
            TriggerKind::After => Trigger::After(self.time(line, args[0])?),
            TriggerKind::Not => Trigger::Not(self.resolve(line, args[0])?),
            TriggerKind::And => {
                Trigger::And(self.resolve(line, args[0])?, self.resolve(line, args[1])?)
            }
            TriggerKind::Or => {
                Trigger::Or(self.resolve(line, args[0])?, self.resolve(line, args[1])?)
            }
        };

        let id = self.set.push(trigger);
        if let Some(previous) = self.symbols.insert(name.to_string(), id) {
            debug!(
                line = line.number,
                name = %name,
                previous = previous.index(),
                "trigger name rebound"
            );
        }
        debug!(line = line.number, name = %name, kind = %kind, id = id.index(), "defined trigger");
        Ok(())
    }

    fn activate(&mut self, line: &Line<'_>, names: &[&str]) -> Result<()> {
        if names.is_empty() {
            warn!(line = line.number, "activation line names no triggers");
        }
        for name in names {
            let id = self.resolve(line, name)?;
            self.set.activate(id);
            debug!(line = line.number, name = %name, id = id.index(), "activated trigger");
        }
        Ok(())
    }

    fn resolve(&self, line: &Line<'_>, name: &str) -> Result<TriggerId> {
        self.symbols.get(name).copied().ok_or_else(|| {
            let known: Vec<&str> = self.symbols.keys().map(String::as_str).collect();
            CompileError::UndefinedTriggerReference {
                line: line.number,
                content: line.content.to_string(),
                name: name.to_string(),
                suggestion: fuzzy_match(name, &known).map(str::to_string),
            }
        })
    }

    fn phrase<'a>(&self, line: &Line<'_>, name: &str, phrase: &'a str) -> &'a str {
        if phrase.is_empty() {
            warn!(line = line.number, name = %name, "empty phrase never matches");
        }
        phrase
    }

    /// Parse a `DD Mon YYYY HH:MM:SS` literal in the reference zone.
    fn time(&self, line: &Line<'_>, value: &str) -> Result<chrono::DateTime<FixedOffset>> {
        let naive = NaiveDateTime::parse_from_str(value, TIME_FORMAT).map_err(|source| {
            CompileError::TimeParse {
                line: line.number,
                content: line.content.to_string(),
                value: value.to_string(),
                source,
            }
        })?;
        naive
            .and_local_timezone(self.zone)
            .single()
            .ok_or_else(|| line.malformed(format!("time '{}' is out of range", value)))
    }
}
