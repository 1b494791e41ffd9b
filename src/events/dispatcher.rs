use std::fmt;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use crate::cards::CardId;
use crate::choice::ChoiceProvider;
use crate::core::GameState;
use crate::events::EventContext;

/// Callback invoked when a hook's topic is published. Handlers receive full
/// mutable access to the game, the dispatcher itself (so they may register
/// or unregister hooks), the event context, and the choice provider.
pub type Handler =
    Rc<dyn Fn(&mut GameState, &mut EventDispatcher, &mut EventContext, &mut dyn ChoiceProvider)>;

/// Identifier handed back by [`EventDispatcher::register`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct HookId(pub u32);

/// A subscription tying a handler to a single topic, optionally on behalf of
/// a card. Hooks registered for a source card are bulk-removed when that
/// card leaves play.
#[derive(Clone)]
pub struct Hook {
    pub topic: String,
    pub source: Option<CardId>,
    pub handler: Handler,
}

impl Hook {
    pub fn new(
        topic: impl Into<String>,
        handler: impl Fn(&mut GameState, &mut EventDispatcher, &mut EventContext, &mut dyn ChoiceProvider)
            + 'static,
    ) -> Self {
        Hook {
            topic: topic.into(),
            source: None,
            handler: Rc::new(handler),
        }
    }

    #[must_use]
    pub fn with_source(mut self, source: CardId) -> Self {
        self.source = Some(source);
        self
    }
}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hook")
            .field("topic", &self.topic)
            .field("source", &self.source)
            .finish_non_exhaustive()
    }
}

/// Topic-keyed hook registry with reentrant publish.
///
/// Publishing snapshots the handler list for the topic before invoking any
/// of them, so handlers may freely register or unregister hooks (including
/// themselves) and publish further events. Hooks added during a publish are
/// not invoked for that same publish.
#[derive(Debug, Default)]
pub struct EventDispatcher {
    hooks: FxHashMap<HookId, Hook>,
    by_topic: FxHashMap<String, Vec<HookId>>,
    next_id: u32,
}

impl EventDispatcher {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a hook and returns its id. Hooks for the same topic fire in
    /// registration order.
    pub fn register(&mut self, hook: Hook) -> HookId {
        let id = HookId(self.next_id);
        self.next_id += 1;
        self.by_topic.entry(hook.topic.clone()).or_default().push(id);
        self.hooks.insert(id, hook);
        id
    }

    /// Removes a hook. Unknown ids are ignored.
    pub fn unregister(&mut self, id: HookId) {
        if let Some(hook) = self.hooks.remove(&id) {
            if let Some(ids) = self.by_topic.get_mut(&hook.topic) {
                ids.retain(|h| *h != id);
            }
        }
    }

    /// Removes every hook registered on behalf of `source`.
    pub fn remove_for_source(&mut self, source: CardId) {
        let ids: Vec<HookId> = self
            .hooks
            .iter()
            .filter(|(_, hook)| hook.source == Some(source))
            .map(|(id, _)| *id)
            .collect();
        for id in ids {
            self.unregister(id);
        }
    }

    #[must_use]
    pub fn hooks_for_topic(&self, topic: &str) -> Vec<HookId> {
        self.by_topic.get(topic).cloned().unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.hooks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hooks.is_empty()
    }

    /// Publishes an event, invoking every hook currently registered for
    /// `topic` in registration order. A topic with no hooks is a no-op.
    ///
    /// A hook unregistered mid-publish by an earlier handler is skipped.
    pub fn publish(
        &mut self,
        topic: &str,
        ctx: &mut EventContext,
        state: &mut GameState,
        choices: &mut dyn ChoiceProvider,
    ) {
        let snapshot = self.hooks_for_topic(topic);
        if snapshot.is_empty() {
            return;
        }
        tracing::trace!(topic, hooks = snapshot.len(), "publish");
        for id in snapshot {
            let handler = match self.hooks.get(&id) {
                Some(hook) => Rc::clone(&hook.handler),
                None => continue,
            };
            handler(state, self, ctx, choices);
        }
    }
}
