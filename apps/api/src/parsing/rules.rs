//! Ordered classification ladders for entry parsing.
//!
//! A ladder is a list of named rules evaluated top to bottom; the first rule
//! whose predicate accepts a line assigns it and stops evaluation. Keeping the
//! ladder as data lets callers inspect the priority order and lets tests
//! exercise one rule at a time.

use crate::parsing::diagnostics::EntryError;

/// One line of an entry together with its successor, for rules that look ahead.
#[derive(Debug, Clone, Copy)]
pub struct LineContext<'a> {
    pub line: &'a str,
    pub next: Option<&'a str>,
}

/// What a rule did with the line beyond assigning it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    Line,
    /// The rule also consumed the following line; the ladder skips it.
    LineAndNext,
}

pub type Predicate<E> = fn(&E, &LineContext<'_>) -> bool;
pub type Assignment<E> = fn(&mut E, &LineContext<'_>) -> Result<Applied, EntryError>;

pub struct Rule<E> {
    pub name: &'static str,
    pub applies: Predicate<E>,
    pub assign: Assignment<E>,
}

impl<E> Clone for Rule<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for Rule<E> {}

impl<E> std::fmt::Debug for Rule<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule").field("name", &self.name).finish()
    }
}

#[derive(Debug, Clone)]
pub struct RuleLadder<E> {
    rules: Vec<Rule<E>>,
}

impl<E> RuleLadder<E> {
    pub fn new(rules: Vec<Rule<E>>) -> Self {
        Self { rules }
    }

    pub fn rule_names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name).collect()
    }

    /// Returns a ladder with `rule` evaluated before every existing rule.
    pub fn with_first(mut self, rule: Rule<E>) -> Self {
        self.rules.insert(0, rule);
        self
    }

    /// Applies the first matching rule. `Ok(None)` when no rule matched.
    pub fn classify(
        &self,
        entry: &mut E,
        ctx: &LineContext<'_>,
    ) -> Result<Option<(&'static str, Applied)>, EntryError> {
        for rule in &self.rules {
            if (rule.applies)(entry, ctx) {
                let applied = (rule.assign)(entry, ctx)?;
                return Ok(Some((rule.name, applied)));
            }
        }
        Ok(None)
    }

    /// Runs every line through the ladder, honouring look-ahead consumption.
    pub fn classify_lines(&self, entry: &mut E, lines: &[String]) -> Result<(), EntryError> {
        let mut skip_next = false;
        for (index, line) in lines.iter().enumerate() {
            if skip_next {
                skip_next = false;
                continue;
            }
            let ctx = LineContext {
                line: line.as_str(),
                next: lines.get(index + 1).map(String::as_str),
            };
            if let Some((_, Applied::LineAndNext)) = self.classify(entry, &ctx)? {
                skip_next = true;
            }
        }
        Ok(())
    }
}

/// Result of parsing one entry: retained, or dropped with the reason.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryOutcome<E> {
    Kept(E),
    Dropped(DropReason),
}

impl<E> EntryOutcome<E> {
    pub fn kept(self) -> Option<E> {
        match self {
            EntryOutcome::Kept(e) => Some(e),
            EntryOutcome::Dropped(_) => None,
        }
    }

    pub fn is_kept(&self) -> bool {
        matches!(self, EntryOutcome::Kept(_))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropReason {
    /// Retention invariant failed.
    MissingFields { missing: Vec<&'static str> },
    /// A rule raised while classifying the entry.
    ParseFailure { message: String },
}

/// Appends `text` to a space-joined accumulator.
pub fn append_spaced(target: &mut String, text: &str) {
    if text.is_empty() {
        return;
    }
    if !target.is_empty() {
        target.push(' ');
    }
    target.push_str(text);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Tally {
        seen: Vec<String>,
    }

    fn always(_: &Tally, _: &LineContext<'_>) -> bool {
        true
    }

    fn starts_with_x(_: &Tally, ctx: &LineContext<'_>) -> bool {
        ctx.line.starts_with('x')
    }

    fn record(t: &mut Tally, ctx: &LineContext<'_>) -> Result<Applied, EntryError> {
        t.seen.push(ctx.line.to_string());
        Ok(Applied::Line)
    }

    fn record_pair(t: &mut Tally, ctx: &LineContext<'_>) -> Result<Applied, EntryError> {
        t.seen.push(format!("{}+{}", ctx.line, ctx.next.unwrap_or("")));
        Ok(Applied::LineAndNext)
    }

    fn fail(_: &mut Tally, ctx: &LineContext<'_>) -> Result<Applied, EntryError> {
        Err(EntryError::Rejected {
            rule: "fail",
            line: ctx.line.to_string(),
            reason: "test".to_string(),
        })
    }

    #[test]
    fn test_first_matching_rule_wins() {
        let ladder = RuleLadder::new(vec![
            Rule { name: "pair", applies: starts_with_x, assign: record_pair },
            Rule { name: "any", applies: always, assign: record },
        ]);
        let mut t = Tally::default();
        let ctx = LineContext { line: "xa", next: Some("b") };
        let hit = ladder.classify(&mut t, &ctx).unwrap();
        assert_eq!(hit, Some(("pair", Applied::LineAndNext)));
    }

    #[test]
    fn test_look_ahead_skips_consumed_line() {
        let ladder = RuleLadder::new(vec![
            Rule { name: "pair", applies: starts_with_x, assign: record_pair },
            Rule { name: "any", applies: always, assign: record },
        ]);
        let lines: Vec<String> = ["xa", "b", "c"].iter().map(|s| s.to_string()).collect();
        let mut t = Tally::default();
        ladder.classify_lines(&mut t, &lines).unwrap();
        assert_eq!(t.seen, vec!["xa+b".to_string(), "c".to_string()]);
    }

    #[test]
    fn test_no_rule_matches() {
        let ladder = RuleLadder::new(vec![Rule { name: "x", applies: starts_with_x, assign: record }]);
        let mut t = Tally::default();
        let ctx = LineContext { line: "a", next: None };
        assert_eq!(ladder.classify(&mut t, &ctx).unwrap(), None);
        assert!(t.seen.is_empty());
    }

    #[test]
    fn test_failing_rule_propagates() {
        let ladder = RuleLadder::new(vec![Rule { name: "any", applies: always, assign: record }])
            .with_first(Rule { name: "fail", applies: starts_with_x, assign: fail });
        assert_eq!(ladder.rule_names(), vec!["fail", "any"]);
        let lines: Vec<String> = vec!["a".into(), "xb".into()];
        let mut t = Tally::default();
        assert!(ladder.classify_lines(&mut t, &lines).is_err());
    }

    #[test]
    fn test_append_spaced() {
        let mut s = String::new();
        append_spaced(&mut s, "one");
        append_spaced(&mut s, "");
        append_spaced(&mut s, "two");
        assert_eq!(s, "one two");
    }
}
