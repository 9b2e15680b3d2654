//! Term admissibility.
//!
//! A term is admissible when at least one of its senses survives the
//! template rules and, for form-of senses, when the lemma it points at is
//! admissible in turn. Lemma chains are followed on an explicit stack with a
//! time-to-live budget; a chain that runs out of budget is accepted.
//!
//! Every answer is memoized per resolver, budget exhaustion included, so an
//! answer reached through a long chain sticks for later queries.

use crate::resolve::rules::{SenseVerdict, SkipReason, TemplateRules};
use crate::senses::{Sense, SenseProvider};
use serde::Serialize;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ResolverStats {
    /// Top-level queries.
    pub queries: u64,
    /// Terms whose senses were actually inspected.
    pub evaluated: u64,
    pub cache_hits: u64,
    pub budget_exhausted: u64,
    pub unknown_terms: u64,
    pub skipped_excluded_template: u64,
    pub skipped_excluded_label: u64,
    pub skipped_missing_lemma: u64,
    pub skipped_rejected_lemma: u64,
}

impl ResolverStats {
    pub fn merge(&mut self, other: &ResolverStats) {
        self.queries += other.queries;
        self.evaluated += other.evaluated;
        self.cache_hits += other.cache_hits;
        self.budget_exhausted += other.budget_exhausted;
        self.unknown_terms += other.unknown_terms;
        self.skipped_excluded_template += other.skipped_excluded_template;
        self.skipped_excluded_label += other.skipped_excluded_label;
        self.skipped_missing_lemma += other.skipped_missing_lemma;
        self.skipped_rejected_lemma += other.skipped_rejected_lemma;
    }

    fn count_skip(&mut self, reason: SkipReason) {
        match reason {
            SkipReason::ExcludedTemplate => self.skipped_excluded_template += 1,
            SkipReason::ExcludedLabel => self.skipped_excluded_label += 1,
            SkipReason::MissingLemma => self.skipped_missing_lemma += 1,
        }
    }
}

/// A term whose senses are being walked.
struct Frame<'a> {
    term: String,
    ttl: i32,
    senses: &'a [Sense],
    next: usize,
}

enum Opened<'a> {
    Known(bool),
    Pending(Frame<'a>),
}

enum Step<'a> {
    Accept,
    Reject,
    Lemma(&'a str, i32),
}

pub struct AdmissibilityResolver<'a, P: SenseProvider + ?Sized> {
    senses: &'a P,
    rules: &'a TemplateRules,
    time_to_live: i32,
    cache: HashMap<String, bool>,
    stats: ResolverStats,
}

impl<'a, P: SenseProvider + ?Sized> AdmissibilityResolver<'a, P> {
    pub fn new(senses: &'a P, rules: &'a TemplateRules) -> Self {
        Self {
            senses,
            rules,
            time_to_live: crate::domain::config::DEFAULT_TIME_TO_LIVE,
            cache: HashMap::new(),
            stats: ResolverStats::default(),
        }
    }

    pub fn with_time_to_live(mut self, time_to_live: i32) -> Self {
        self.time_to_live = time_to_live;
        self
    }

    /// A resolver over the same data starting from this one's cache, with
    /// fresh statistics.
    pub fn fork(&self) -> Self {
        Self {
            senses: self.senses,
            rules: self.rules,
            time_to_live: self.time_to_live,
            cache: self.cache.clone(),
            stats: ResolverStats::default(),
        }
    }

    /// Cache `false` for terms known to be unwanted, skipping their senses.
    pub fn preseed_rejected<I, S>(&mut self, terms: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let before = self.cache.len();
        for term in terms {
            self.cache.entry(term.into()).or_insert(false);
        }
        self.cache.len() - before
    }

    pub fn admissible(&mut self, term: &str) -> bool {
        self.admissible_with(term, self.time_to_live)
    }

    pub fn admissible_with(&mut self, term: &str, time_to_live: i32) -> bool {
        self.stats.queries += 1;
        let mut stack = match self.open(term, time_to_live) {
            Opened::Known(value) => return value,
            Opened::Pending(frame) => vec![frame],
        };

        // Answer of the frame popped last, handed to the frame below it.
        let mut answer: Option<bool> = None;
        while let Some(frame) = stack.last_mut() {
            if let Some(lemma_ok) = answer.take() {
                if lemma_ok {
                    answer = Some(self.close(&mut stack, true));
                    continue;
                }
                self.stats.skipped_rejected_lemma += 1;
                frame.next += 1;
            }

            match self.scan(frame) {
                Step::Accept => answer = Some(self.close(&mut stack, true)),
                Step::Reject => answer = Some(self.close(&mut stack, false)),
                Step::Lemma(lemma, ttl) => match self.open(lemma, ttl) {
                    Opened::Known(value) => answer = Some(value),
                    Opened::Pending(child) => stack.push(child),
                },
            }
        }
        answer.unwrap_or(false)
    }

    pub fn cached(&self, term: &str) -> Option<bool> {
        self.cache.get(term).copied()
    }

    pub fn stats(&self) -> &ResolverStats {
        &self.stats
    }

    pub fn into_stats(self) -> ResolverStats {
        self.stats
    }

    fn open(&mut self, term: &str, ttl: i32) -> Opened<'a> {
        if let Some(&value) = self.cache.get(term) {
            self.stats.cache_hits += 1;
            return Opened::Known(value);
        }
        if ttl <= 0 {
            self.stats.budget_exhausted += 1;
            tracing::debug!(term, "form-of budget exhausted, accepting");
            self.cache.insert(term.to_string(), true);
            return Opened::Known(true);
        }
        // Copy the reference out so the borrow is tied to 'a, not to self.
        let provider: &'a P = self.senses;
        match provider.senses(term) {
            None => {
                self.stats.unknown_terms += 1;
                self.cache.insert(term.to_string(), false);
                Opened::Known(false)
            }
            Some(senses) => {
                self.stats.evaluated += 1;
                Opened::Pending(Frame { term: term.to_string(), ttl, senses, next: 0 })
            }
        }
    }

    /// Advance `frame` to its next deciding sense.
    fn scan(&mut self, frame: &mut Frame<'a>) -> Step<'a> {
        let rules: &'a TemplateRules = self.rules;
        while let Some(sense) = frame.senses.get(frame.next) {
            match rules.judge(sense) {
                SenseVerdict::Accept => return Step::Accept,
                SenseVerdict::Lemma(lemma) => return Step::Lemma(lemma, frame.ttl - 1),
                SenseVerdict::Skip(reason) => {
                    self.stats.count_skip(reason);
                    frame.next += 1;
                }
            }
        }
        Step::Reject
    }

    fn close(&mut self, stack: &mut Vec<Frame<'a>>, value: bool) -> bool {
        if let Some(frame) = stack.pop() {
            self.cache.insert(frame.term, value);
        }
        value
    }
}
