//! Trigger predicates and the arena that owns them.
//!
//! A [`Trigger`] is either a leaf (phrase or time predicate) or a NOT/AND/OR
//! combinator over other triggers. Combinators refer to their children by
//! [`TriggerId`], an index into the [`TriggerSet`] arena. Ids are handed out
//! in construction order and a combinator can only name ids that already
//! exist, so the graph is acyclic by construction.
//!
//! [`TriggerSet::evaluate`] and [`TriggerSet::describe`] recurse once per
//! combinator level, so stack use grows with the nesting depth of a rule file.

use std::fmt;

use chrono::{DateTime, FixedOffset};
use newswatch_core::NewsItem;

use crate::phrase::{contains_words, normalize_words};

/// Display format for time literals, matching the rule-file syntax.
pub const TIME_FORMAT: &str = "%d %b %Y %H:%M:%S";

// ── Ids and kinds ───────────────────────────────────────────────────

/// Index of a trigger inside its [`TriggerSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TriggerId(usize);

impl TriggerId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// The seven trigger kinds accepted in rule files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerKind {
    Title,
    Description,
    Before,
    After,
    Not,
    And,
    Or,
}

impl TriggerKind {
    /// Rule-file tokens for every kind, in declaration order.
    pub const TOKENS: &'static [&'static str] =
        &["TITLE", "DESCRIPTION", "BEFORE", "AFTER", "NOT", "AND", "OR"];

    /// Parse a rule-file type token. Tokens are case-sensitive.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "TITLE" => Some(Self::Title),
            "DESCRIPTION" => Some(Self::Description),
            "BEFORE" => Some(Self::Before),
            "AFTER" => Some(Self::After),
            "NOT" => Some(Self::Not),
            "AND" => Some(Self::And),
            "OR" => Some(Self::Or),
            _ => None,
        }
    }

    pub fn token(self) -> &'static str {
        match self {
            Self::Title => "TITLE",
            Self::Description => "DESCRIPTION",
            Self::Before => "BEFORE",
            Self::After => "AFTER",
            Self::Not => "NOT",
            Self::And => "AND",
            Self::Or => "OR",
        }
    }

    /// Number of arguments that follow the type token.
    pub fn arity(self) -> usize {
        match self {
            Self::And | Self::Or => 2,
            _ => 1,
        }
    }
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

// ── Phrase ──────────────────────────────────────────────────────────

/// A phrase normalized once at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Phrase {
    text: String,
    words: Vec<String>,
}

impl Phrase {
    pub fn new(raw: &str) -> Self {
        Self {
            text: raw.to_lowercase(),
            words: normalize_words(raw),
        }
    }

    /// Lower-cased phrase text.
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    /// True if this phrase occurs in `text` as a contiguous word run.
    pub fn is_in(&self, text: &str) -> bool {
        contains_words(text, &self.words)
    }
}

// ── Trigger ─────────────────────────────────────────────────────────

/// A predicate over a [`NewsItem`].
#[derive(Debug, Clone, PartialEq)]
pub enum Trigger {
    Title(Phrase),
    Description(Phrase),
    /// Fires for items published strictly before the instant.
    Before(DateTime<FixedOffset>),
    /// Fires for items published strictly after the instant.
    After(DateTime<FixedOffset>),
    Not(TriggerId),
    And(TriggerId, TriggerId),
    Or(TriggerId, TriggerId),
}

impl Trigger {
    pub fn title(phrase: &str) -> Self {
        Self::Title(Phrase::new(phrase))
    }

    pub fn description(phrase: &str) -> Self {
        Self::Description(Phrase::new(phrase))
    }

    /// Before-trigger with its instant converted into `zone`.
    pub fn before(instant: DateTime<FixedOffset>, zone: FixedOffset) -> Self {
        Self::Before(instant.with_timezone(&zone))
    }

    /// After-trigger with its instant converted into `zone`.
    pub fn after(instant: DateTime<FixedOffset>, zone: FixedOffset) -> Self {
        Self::After(instant.with_timezone(&zone))
    }

    pub fn kind(&self) -> TriggerKind {
        match self {
            Self::Title(_) => TriggerKind::Title,
            Self::Description(_) => TriggerKind::Description,
            Self::Before(_) => TriggerKind::Before,
            Self::After(_) => TriggerKind::After,
            Self::Not(_) => TriggerKind::Not,
            Self::And(..) => TriggerKind::And,
            Self::Or(..) => TriggerKind::Or,
        }
    }

    /// Child ids of a combinator; empty for leaves.
    pub fn children(&self) -> Vec<TriggerId> {
        match self {
            Self::Not(child) => vec![*child],
            Self::And(left, right) | Self::Or(left, right) => vec![*left, *right],
            _ => Vec::new(),
        }
    }
}

/// Evaluation failure for a single item.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EvalError {
    /// A time trigger met an item whose publication time could not be resolved.
    #[error("item '{}' has no resolvable publication time", .guid.as_deref().unwrap_or("<no guid>"))]
    InvalidStoryTimestamp { guid: Option<String> },
    /// The id does not belong to this set, e.g. it came from a larger one.
    #[error("no trigger #{index} in this set")]
    UnknownTrigger { index: usize },
}

fn published_in(
    item: &NewsItem,
    zone: &FixedOffset,
) -> Result<DateTime<FixedOffset>, EvalError> {
    item.published()
        .map(|at| at.with_timezone(zone))
        .ok_or_else(|| EvalError::InvalidStoryTimestamp {
            guid: item.guid().map(str::to_owned),
        })
}

// ── TriggerSet ──────────────────────────────────────────────────────

/// Compiled triggers: the arena plus the ordered active list.
///
/// Immutable once built by the compiler, so it can be shared across threads
/// and evaluated concurrently without locking.
#[derive(Debug, Clone, Default)]
pub struct TriggerSet {
    arena: Vec<Trigger>,
    active: Vec<TriggerId>,
}

impl TriggerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a trigger to the arena. Combinator children must already be in it.
    pub(crate) fn push(&mut self, trigger: Trigger) -> TriggerId {
        debug_assert!(trigger.children().iter().all(|c| c.0 < self.arena.len()));
        self.arena.push(trigger);
        TriggerId(self.arena.len() - 1)
    }

    /// Append `id` to the active list. Duplicates are kept.
    pub(crate) fn activate(&mut self, id: TriggerId) {
        debug_assert!(id.0 < self.arena.len());
        self.active.push(id);
    }

    pub fn get(&self, id: TriggerId) -> Option<&Trigger> {
        self.arena.get(id.0)
    }

    /// Active triggers in activation order.
    pub fn active(&self) -> impl Iterator<Item = &Trigger> + '_ {
        self.active.iter().map(|id| &self.arena[id.0])
    }

    pub fn active_ids(&self) -> &[TriggerId] {
        &self.active
    }

    /// Number of active triggers.
    pub fn len(&self) -> usize {
        self.active.len()
    }

    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Number of triggers in the arena, active or not.
    pub fn definitions(&self) -> usize {
        self.arena.len()
    }

    /// Evaluate the trigger `id` against `item`.
    ///
    /// AND and OR short-circuit on their left child.
    pub fn evaluate(&self, id: TriggerId, item: &NewsItem) -> Result<bool, EvalError> {
        let trigger = self
            .arena
            .get(id.0)
            .ok_or(EvalError::UnknownTrigger { index: id.0 })?;
        match trigger {
            Trigger::Title(phrase) => Ok(phrase.is_in(item.title())),
            Trigger::Description(phrase) => Ok(phrase.is_in(item.description())),
            Trigger::Before(at) => Ok(published_in(item, at.offset())? < *at),
            Trigger::After(at) => Ok(published_in(item, at.offset())? > *at),
            Trigger::Not(child) => Ok(!self.evaluate(*child, item)?),
            Trigger::And(left, right) => {
                Ok(self.evaluate(*left, item)? && self.evaluate(*right, item)?)
            }
            Trigger::Or(left, right) => {
                Ok(self.evaluate(*left, item)? || self.evaluate(*right, item)?)
            }
        }
    }

    /// True if any active trigger fires for `item`.
    ///
    /// Stops at the first active trigger that fires.
    pub fn matches(&self, item: &NewsItem) -> Result<bool, EvalError> {
        for id in &self.active {
            if self.evaluate(*id, item)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    /// Human-readable rendering of the trigger tree rooted at `id`.
    pub fn describe(&self, id: TriggerId) -> String {
        let Some(trigger) = self.arena.get(id.0) else {
            return format!("<unknown trigger #{}>", id.0);
        };
        match trigger {
            Trigger::Title(p) => format!("TITLE \"{}\"", p.as_str()),
            Trigger::Description(p) => format!("DESCRIPTION \"{}\"", p.as_str()),
            Trigger::Before(at) => format!("BEFORE {} {}", at.format(TIME_FORMAT), at.offset()),
            Trigger::After(at) => format!("AFTER {} {}", at.format(TIME_FORMAT), at.offset()),
            Trigger::Not(child) => format!("NOT {}", self.describe(*child)),
            Trigger::And(l, r) => format!("({} AND {})", self.describe(*l), self.describe(*r)),
            Trigger::Or(l, r) => format!("({} OR {})", self.describe(*l), self.describe(*r)),
        }
    }
}

// ── Tests ───────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use newswatch_core::time::default_reference_zone;

    fn at(rfc3339: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(rfc3339).unwrap()
    }

    fn item_at(rfc3339: &str) -> NewsItem {
        NewsItem::new("", "").with_published(at(rfc3339))
    }

    /// Set with two constant leaves: `yes` always fires, `no` never does.
    fn constants(set: &mut TriggerSet) -> (TriggerId, TriggerId) {
        let yes = set.push(Trigger::title("always"));
        let no = set.push(Trigger::title("never"));
        (yes, no)
    }

    fn always_item() -> NewsItem {
        NewsItem::new("always", "")
    }

    #[test]
    fn title_and_description_look_at_their_field() {
        let mut set = TriggerSet::new();
        let title = set.push(Trigger::title("Election"));
        let desc = set.push(Trigger::description("vote"));

        let item = NewsItem::new("Election results in", "Please vote");
        assert!(set.evaluate(title, &item).unwrap());
        assert!(set.evaluate(desc, &item).unwrap());

        let swapped = NewsItem::new("Please vote", "Election results in");
        assert!(!set.evaluate(title, &swapped).unwrap());
        assert!(!set.evaluate(desc, &swapped).unwrap());
    }

    #[test]
    fn phrase_is_stored_lower_cased() {
        let Trigger::Title(phrase) = Trigger::title("New YORK") else {
            panic!("expected title trigger");
        };
        assert_eq!(phrase.as_str(), "new york");
        assert_eq!(phrase.words(), ["new", "york"]);
    }

    #[test]
    fn time_instant_is_stored_in_reference_zone() {
        let zone = default_reference_zone();
        let Trigger::Before(stored) = Trigger::before(at("2016-10-03T22:00:10+00:00"), zone) else {
            panic!("expected before trigger");
        };
        assert_eq!(stored.offset(), &zone);
        assert_eq!(stored.to_rfc3339(), "2016-10-03T17:00:10-05:00");
    }

    #[test]
    fn time_boundary_is_exclusive() {
        let zone = default_reference_zone();
        let mut set = TriggerSet::new();
        let boundary = at("2016-10-03T17:00:10-05:00");
        let before = set.push(Trigger::before(boundary, zone));
        let after = set.push(Trigger::after(boundary, zone));

        // Same instant expressed in another offset.
        let same = item_at("2016-10-03T22:00:10+00:00");
        assert!(!set.evaluate(before, &same).unwrap());
        assert!(!set.evaluate(after, &same).unwrap());

        let earlier = item_at("2016-10-03T17:00:09-05:00");
        assert!(set.evaluate(before, &earlier).unwrap());
        assert!(!set.evaluate(after, &earlier).unwrap());

        let later = item_at("2016-10-03T23:00:00+01:00");
        assert!(!set.evaluate(before, &later).unwrap());
        assert!(set.evaluate(after, &later).unwrap());
    }

    #[test]
    fn missing_timestamp_is_an_error() {
        let mut set = TriggerSet::new();
        let after = set.push(Trigger::after(
            at("2016-10-03T17:00:10-05:00"),
            default_reference_zone(),
        ));

        let item = NewsItem::new("t", "d").with_guid("g-1");
        let err = set.evaluate(after, &item).unwrap_err();
        assert_eq!(
            err,
            EvalError::InvalidStoryTimestamp {
                guid: Some("g-1".to_string())
            }
        );
        assert!(err.to_string().contains("g-1"));
    }

    #[test]
    fn not_inverts() {
        let mut set = TriggerSet::new();
        let (yes, no) = constants(&mut set);
        let not_yes = set.push(Trigger::Not(yes));
        let not_no = set.push(Trigger::Not(no));

        assert!(!set.evaluate(not_yes, &always_item()).unwrap());
        assert!(set.evaluate(not_no, &always_item()).unwrap());
    }

    #[test]
    fn and_or_truth_tables() {
        let mut set = TriggerSet::new();
        let (yes, no) = constants(&mut set);
        let item = always_item();

        for (left, l) in [(yes, true), (no, false)] {
            for (right, r) in [(yes, true), (no, false)] {
                let and = set.push(Trigger::And(left, right));
                let or = set.push(Trigger::Or(left, right));
                assert_eq!(set.evaluate(and, &item).unwrap(), l && r, "AND({l}, {r})");
                assert_eq!(set.evaluate(or, &item).unwrap(), l || r, "OR({l}, {r})");
            }
        }
    }

    #[test]
    fn short_circuit_skips_failing_right_child() {
        let mut set = TriggerSet::new();
        let (yes, no) = constants(&mut set);
        let timed = set.push(Trigger::after(
            at("2016-10-03T17:00:10-05:00"),
            default_reference_zone(),
        ));
        let and = set.push(Trigger::And(no, timed));
        let or = set.push(Trigger::Or(yes, timed));
        let and_fails = set.push(Trigger::And(yes, timed));

        // The item has no timestamp; only an evaluated time trigger can fail.
        let item = always_item();
        assert_eq!(set.evaluate(and, &item), Ok(false));
        assert_eq!(set.evaluate(or, &item), Ok(true));
        assert!(set.evaluate(and_fails, &item).is_err());
    }

    #[test]
    fn matches_is_a_disjunction_over_active() {
        let mut set = TriggerSet::new();
        let (yes, no) = constants(&mut set);
        let item = always_item();

        assert!(!set.matches(&item).unwrap());
        set.activate(no);
        assert!(!set.matches(&item).unwrap());
        set.activate(yes);
        assert!(set.matches(&item).unwrap());
        assert_eq!(set.len(), 2);
        assert_eq!(set.definitions(), 2);
    }

    #[test]
    fn describes_tree() {
        let mut set = TriggerSet::new();
        let t = set.push(Trigger::title("Election"));
        let d = set.push(Trigger::description("vote"));
        let not_d = set.push(Trigger::Not(d));
        let or = set.push(Trigger::Or(t, not_d));
        assert_eq!(
            set.describe(or),
            "(TITLE \"election\" OR NOT DESCRIPTION \"vote\")"
        );
    }

    #[test]
    fn foreign_id_is_an_error_not_a_panic() {
        let mut big = TriggerSet::new();
        constants(&mut big);
        let third = big.push(Trigger::title("third"));
        let mut small = TriggerSet::new();
        small.push(Trigger::title("only"));

        assert_eq!(
            small.evaluate(third, &always_item()),
            Err(EvalError::UnknownTrigger { index: 2 })
        );
        assert_eq!(small.describe(third), "<unknown trigger #2>");
    }

    #[test]
    fn kind_tokens_round_trip() {
        for token in TriggerKind::TOKENS {
            let kind = TriggerKind::from_token(token).unwrap();
            assert_eq!(kind.token(), *token);
        }
        assert!(TriggerKind::from_token("title").is_none());
    }

    #[test]
    fn trigger_set_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TriggerSet>();
        assert_send_sync::<NewsItem>();
    }
}
