//! Guarded transitions and the per-source transition table.

use super::ANY_STATE;
use crate::core::{Guard, MachineContext};
use std::collections::HashMap;
use std::fmt;

/// Side effect run when a transition fires, before the destination's
/// `on_enter`.
pub type TransitionCallback<C> = Box<dyn FnMut(&mut MachineContext<C>)>;

/// A guarded edge from one state (or [`ANY_STATE`]) to another.
///
/// Transitions are immutable once registered.
pub struct Transition<C> {
    pub from: String,
    pub to: String,
    pub guard: Guard<C>,
    pub on_transition: Option<TransitionCallback<C>>,
}

impl<C: 'static> Transition<C> {
    pub fn new(from: impl Into<String>, to: impl Into<String>, guard: Guard<C>) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            guard,
            on_transition: None,
        }
    }

    pub fn with_callback<F>(mut self, callback: F) -> Self
    where
        F: FnMut(&mut MachineContext<C>) + 'static,
    {
        self.on_transition = Some(Box::new(callback));
        self
    }

    pub fn is_wildcard(&self) -> bool {
        self.from == ANY_STATE
    }

    /// Evaluate the guard.
    pub fn can_execute(&self, ctx: &mut MachineContext<C>) -> bool {
        self.guard.check(ctx)
    }

    /// Run the side-effect callback, if any.
    pub(crate) fn notify(&mut self, ctx: &mut MachineContext<C>) {
        if let Some(callback) = self.on_transition.as_mut() {
            callback(ctx);
        }
    }
}

impl<C> fmt::Debug for Transition<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Transition")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("has_callback", &self.on_transition.is_some())
            .finish()
    }
}

/// Transitions grouped by source, plus the wildcard list.
pub struct TransitionTable<C> {
    wildcard: Vec<Transition<C>>,
    by_source: HashMap<String, Vec<Transition<C>>>,
}

impl<C> Default for TransitionTable<C> {
    fn default() -> Self {
        Self {
            wildcard: Vec::new(),
            by_source: HashMap::new(),
        }
    }
}

impl<C: 'static> TransitionTable<C> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the source's list, or to the wildcard list for
    /// [`ANY_STATE`].
    pub fn register(&mut self, transition: Transition<C>) {
        if transition.is_wildcard() {
            self.wildcard.push(transition);
        } else {
            self.by_source
                .entry(transition.from.clone())
                .or_default()
                .push(transition);
        }
    }

    pub fn wildcard(&self) -> &[Transition<C>] {
        &self.wildcard
    }

    pub(crate) fn wildcard_mut(&mut self) -> &mut [Transition<C>] {
        &mut self.wildcard
    }

    /// Transitions leaving `source`, in registration order.
    pub fn outgoing(&self, source: &str) -> &[Transition<C>] {
        self.by_source
            .get(source)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub(crate) fn outgoing_mut(&mut self, source: &str) -> &mut [Transition<C>] {
        self.by_source
            .get_mut(source)
            .map(Vec::as_mut_slice)
            .unwrap_or(&mut [])
    }

    /// Every `(from, to)` pair: wildcard edges first, then local edges
    /// grouped by source in name order.
    pub fn edges(&self) -> Vec<(&str, &str)> {
        let mut sources: Vec<&String> = self.by_source.keys().collect();
        sources.sort();

        self.wildcard
            .iter()
            .chain(sources.into_iter().flat_map(|source| self.by_source[source].iter()))
            .map(|t| (t.from.as_str(), t.to.as_str()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.wildcard.len() + self.by_source.values().map(Vec::len).sum::<usize>()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::PoseHandle;

    fn context() -> MachineContext<()> {
        MachineContext::new(PoseHandle::default(), ())
    }

    #[test]
    fn wildcard_transitions_go_to_wildcard_list() {
        let mut table = TransitionTable::<()>::new();
        table.register(Transition::new(ANY_STATE, "Stunned", Guard::always()));
        table.register(Transition::new("Idle", "Chasing", Guard::always()));

        assert_eq!(table.wildcard().len(), 1);
        assert_eq!(table.outgoing("Idle").len(), 1);
        assert!(table.outgoing(ANY_STATE).is_empty());
        assert_eq!(table.len(), 2);
    }

    #[test]
    fn outgoing_preserves_registration_order() {
        let mut table = TransitionTable::<()>::new();
        table.register(Transition::new("Idle", "Chasing", Guard::always()));
        table.register(Transition::new("Idle", "Patrol", Guard::always()));
        table.register(Transition::new("Idle", "Sleep", Guard::always()));

        let destinations: Vec<&str> = table.outgoing("Idle").iter().map(|t| t.to.as_str()).collect();
        assert_eq!(destinations, vec!["Chasing", "Patrol", "Sleep"]);
    }

    #[test]
    fn unknown_source_has_no_transitions() {
        let table = TransitionTable::<()>::new();
        assert!(table.outgoing("Nowhere").is_empty());
        assert!(table.is_empty());
    }

    #[test]
    fn edges_list_wildcards_first() {
        let mut table = TransitionTable::<()>::new();
        table.register(Transition::new("Idle", "Chasing", Guard::always()));
        table.register(Transition::new(ANY_STATE, "Idle", Guard::always()));

        assert_eq!(
            table.edges(),
            vec![(ANY_STATE, "Idle"), ("Idle", "Chasing")]
        );
    }

    #[test]
    fn can_execute_respects_guard() {
        let mut ctx = context();
        let transition: Transition<()> = Transition::new("Idle", "Alert", Guard::trigger("noise"));

        assert!(!transition.can_execute(&mut ctx));
        ctx.triggers.set_trigger("noise", true);
        assert!(transition.can_execute(&mut ctx));
    }

    #[test]
    fn notify_runs_callback() {
        let mut ctx = context();
        let mut transition: Transition<()> = Transition::new("Idle", "Alert", Guard::<()>::always())
            .with_callback(|ctx| {
                ctx.properties.get_add_set("alerts", 1);
            });

        transition.notify(&mut ctx);
        transition.notify(&mut ctx);

        assert_eq!(ctx.properties.get::<i32>("alerts"), 2);
    }
}
