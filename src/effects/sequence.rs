//! Arena-backed effect sequences.
//!
//! An `EffectSequence` is an ordered chain of nodes stored in a flat
//! `Vec<Node>` and linked by `NodeId` indices. A node either holds an effect
//! cell or is an empty placeholder that interpretation skips over.
//!
//! ## Design
//!
//! - **Cells, not effects.** Each node holds an `Rc<RefCell<Effect>>`.
//!   [`EffectSequence::share`] builds a second handle over the same cells,
//!   so both handles observe and mutate the same effects while keeping
//!   independent chains. Splicing one handle never relinks the other.
//! - **Splices move.** [`append`](EffectSequence::append) and
//!   [`insert_after_head`](EffectSequence::insert_after_head) consume the
//!   other sequence and move its cells into this arena. Nothing is copied
//!   and no handle is left pointing into a chain it does not own.
//! - **Release exactly once.** [`advance`](EffectSequence::advance) and
//!   [`truncate`](EffectSequence::truncate) unlink nodes and drop their
//!   cells. An owned world object is dropped when its last cell goes.
//! - **Deep copies are iterative.** `Clone` walks the chain in a loop and
//!   clones each effect (and its owned object), so very long sequences
//!   cannot overflow the stack.
//!
//! ```
//! use rust_wumpus::effects::{Effect, EffectKind, EffectSequence};
//!
//! let mut turn: EffectSequence = [
//!     Effect::marker(EffectKind::RefreshBoardDisplay),
//!     Effect::marker(EffectKind::PromptPlayerAction),
//! ]
//! .into_iter()
//! .collect();
//!
//! turn.insert_after_head(Effect::display("You feel a breeze.").into());
//! assert_eq!(
//!     turn.kinds(),
//!     vec![
//!         EffectKind::RefreshBoardDisplay,
//!         EffectKind::DisplayText,
//!         EffectKind::PromptPlayerAction,
//!     ]
//! );
//! ```

use std::cell::{Ref, RefCell, RefMut};
use std::fmt;
use std::rc::Rc;

use super::effect::{Effect, EffectKind};

/// A shared, mutable effect slot.
pub type EffectCell = Rc<RefCell<Effect>>;

/// Index of a node inside one sequence's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct NodeId(u32);

impl NodeId {
    #[inline]
    const fn index(self) -> usize {
        self.0 as usize
    }
}

#[derive(Debug, Default)]
struct Node {
    /// `None` marks a placeholder (or a released node on the free list).
    slot: Option<EffectCell>,
    next: Option<NodeId>,
}

/// An ordered, splice-able chain of effects.
#[derive(Default)]
pub struct EffectSequence {
    nodes: Vec<Node>,
    free: Vec<NodeId>,
    head: Option<NodeId>,
    tail: Option<NodeId>,
}

impl EffectSequence {
    /// Create an empty sequence.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True iff there is no head node at all. A sequence holding only
    /// placeholders is not empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.head.is_none()
    }

    /// Number of effects, placeholders excluded. Walks the chain.
    #[must_use]
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    // === Arena ===

    fn alloc(&mut self, slot: Option<EffectCell>) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id.index()] = Node { slot, next: None };
                id
            }
            None => {
                let id = NodeId(self.nodes.len() as u32);
                self.nodes.push(Node { slot, next: None });
                id
            }
        }
    }

    fn release(&mut self, id: NodeId) {
        let node = &mut self.nodes[id.index()];
        node.slot = None;
        node.next = None;
        self.free.push(id);
    }

    /// Drop the arena's storage once nothing is linked any more.
    fn compact_if_drained(&mut self) {
        if self.head.is_none() {
            self.nodes.clear();
            self.free.clear();
            self.tail = None;
        }
    }

    fn push_slot(&mut self, slot: Option<EffectCell>) {
        let id = self.alloc(slot);
        match self.tail {
            Some(tail) => self.nodes[tail.index()].next = Some(id),
            None => self.head = Some(id),
        }
        self.tail = Some(id);
    }

    /// Unlink every node in chain order, handing back their slots.
    fn into_slots(mut self) -> Vec<Option<EffectCell>> {
        let mut slots = Vec::with_capacity(self.nodes.len());
        let mut cursor = self.head.take();
        while let Some(id) = cursor {
            let node = &mut self.nodes[id.index()];
            slots.push(node.slot.take());
            cursor = node.next.take();
        }
        slots
    }

    // === Growth ===

    /// Add an effect at the end.
    pub fn push(&mut self, effect: Effect) {
        self.push_slot(Some(Rc::new(RefCell::new(effect))));
    }

    /// Add an existing cell at the end, sharing it with whoever else holds it.
    pub fn push_cell(&mut self, cell: EffectCell) {
        self.push_slot(Some(cell));
    }

    /// Add an empty node that interpretation skips.
    pub fn push_placeholder(&mut self) {
        self.push_slot(None);
    }

    /// Move every node of `other` after the end of this sequence.
    ///
    /// When this sequence is empty it simply becomes `other`.
    pub fn append(&mut self, other: EffectSequence) {
        if self.head.is_none() {
            *self = other;
            return;
        }
        for slot in other.into_slots() {
            self.push_slot(slot);
        }
    }

    /// Move every node of `other` in right after the current head, ahead of
    /// whatever already followed it.
    pub fn insert_after_head(&mut self, other: EffectSequence) {
        let Some(head) = self.head else {
            self.append(other);
            return;
        };

        let rest = self.nodes[head.index()].next;
        let mut cursor = head;
        for slot in other.into_slots() {
            let id = self.alloc(slot);
            self.nodes[cursor.index()].next = Some(id);
            cursor = id;
        }
        self.nodes[cursor.index()].next = rest;
        if rest.is_none() {
            self.tail = Some(cursor);
        }
    }

    // === Draining ===

    /// Discard the head node and promote the next one.
    pub fn advance(&mut self) {
        if let Some(head) = self.head {
            self.head = self.nodes[head.index()].next;
            if self.head.is_none() {
                self.tail = None;
            }
            self.release(head);
            self.compact_if_drained();
        }
    }

    /// Discard every node after the head.
    pub fn truncate(&mut self) {
        let Some(head) = self.head else {
            return;
        };
        let mut cursor = self.nodes[head.index()].next.take();
        while let Some(id) = cursor {
            cursor = self.nodes[id.index()].next;
            self.release(id);
        }
        self.tail = Some(head);
    }

    /// Remove and return the first effect, dropping any placeholders before it.
    pub fn pop_front(&mut self) -> Option<EffectCell> {
        while let Some(head) = self.head {
            let slot = self.nodes[head.index()].slot.take();
            self.advance();
            if slot.is_some() {
                return slot;
            }
        }
        None
    }

    /// Advance past leading placeholders.
    pub fn skip_placeholders(&mut self) {
        while self.head_is_placeholder() {
            self.advance();
        }
    }

    /// Detach the effects from the head up to, but not including, the first
    /// effect of `kind`, which becomes the new head.
    ///
    /// Returns `None` and leaves the sequence untouched when no effect of
    /// `kind` is reachable.
    pub fn split_until(&mut self, kind: EffectKind) -> Option<EffectSequence> {
        let mut cursor = self.head;
        let stop = loop {
            let id = cursor?;
            let node = &self.nodes[id.index()];
            if node.slot.as_ref().is_some_and(|cell| cell.borrow().is(kind)) {
                break id;
            }
            cursor = node.next;
        };

        let mut taken = EffectSequence::new();
        let mut cursor = self.head;
        while let Some(id) = cursor {
            if id == stop {
                break;
            }
            let node = &mut self.nodes[id.index()];
            let slot = node.slot.take();
            cursor = node.next;
            self.release(id);
            taken.push_slot(slot);
        }
        self.head = Some(stop);
        Some(taken)
    }

    /// Drop everything before the first effect of `kind`. Returns whether
    /// one was found; if not, nothing is dropped.
    pub fn skip_until(&mut self, kind: EffectKind) -> bool {
        self.split_until(kind).is_some()
    }

    // === Inspection ===

    /// The head effect, or `None` when empty or when the head is a placeholder.
    #[must_use]
    pub fn head(&self) -> Option<Ref<'_, Effect>> {
        self.head_slot().map(|cell| cell.borrow())
    }

    /// Mutable access to the head effect.
    ///
    /// Panics if the same cell is already borrowed through another handle.
    pub fn head_mut(&self) -> Option<RefMut<'_, Effect>> {
        self.head_slot().map(|cell| cell.borrow_mut())
    }

    /// A new reference to the head cell.
    #[must_use]
    pub fn head_cell(&self) -> Option<EffectCell> {
        self.head_slot().cloned()
    }

    fn head_slot(&self) -> Option<&EffectCell> {
        self.head
            .and_then(|id| self.nodes[id.index()].slot.as_ref())
    }

    #[must_use]
    pub fn head_kind(&self) -> Option<EffectKind> {
        self.head().map(|effect| effect.kind())
    }

    /// Whether the head effect is of `kind`.
    #[must_use]
    pub fn is(&self, kind: EffectKind) -> bool {
        self.head_kind() == Some(kind)
    }

    #[must_use]
    pub fn head_is_placeholder(&self) -> bool {
        self.head
            .is_some_and(|id| self.nodes[id.index()].slot.is_none())
    }

    /// Iterate over the effect cells in order, skipping placeholders.
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            sequence: self,
            cursor: self.head,
        }
    }

    /// Kinds of every effect in order.
    #[must_use]
    pub fn kinds(&self) -> Vec<EffectKind> {
        self.iter().map(|cell| cell.borrow().kind()).collect()
    }

    /// A second handle over the same effect cells with its own chain.
    #[must_use]
    pub fn share(&self) -> EffectSequence {
        let mut shared = EffectSequence::new();
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let node = &self.nodes[id.index()];
            shared.push_slot(node.slot.clone());
            cursor = node.next;
        }
        shared
    }
}

/// Unwrap a cell into its effect, cloning when another handle still shares it.
fn into_effect(cell: EffectCell) -> Effect {
    Rc::try_unwrap(cell)
        .map(RefCell::into_inner)
        .unwrap_or_else(|shared| shared.borrow().clone())
}

impl Clone for EffectSequence {
    /// Deep copy: every effect, and any object it owns, is cloned.
    fn clone(&self) -> Self {
        let mut copy = EffectSequence::new();
        let mut cursor = self.head;
        while let Some(id) = cursor {
            let node = &self.nodes[id.index()];
            let slot = node
                .slot
                .as_ref()
                .map(|cell| Rc::new(RefCell::new(cell.borrow().clone())));
            copy.push_slot(slot);
            cursor = node.next;
        }
        copy
    }
}

impl fmt::Debug for EffectSequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.iter().map(|cell| cell.try_borrow().map(|e| e.kind()).ok()))
            .finish()
    }
}

impl From<Effect> for EffectSequence {
    fn from(effect: Effect) -> Self {
        let mut sequence = EffectSequence::new();
        sequence.push(effect);
        sequence
    }
}

impl FromIterator<Effect> for EffectSequence {
    fn from_iter<I: IntoIterator<Item = Effect>>(iter: I) -> Self {
        let mut sequence = EffectSequence::new();
        sequence.extend(iter);
        sequence
    }
}

impl Extend<Effect> for EffectSequence {
    fn extend<I: IntoIterator<Item = Effect>>(&mut self, iter: I) {
        for effect in iter {
            self.push(effect);
        }
    }
}

/// Borrowing iterator over effect cells.
pub struct Iter<'a> {
    sequence: &'a EffectSequence,
    cursor: Option<NodeId>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a EffectCell;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.cursor {
            let node = &self.sequence.nodes[id.index()];
            self.cursor = node.next;
            if let Some(cell) = node.slot.as_ref() {
                return Some(cell);
            }
        }
        None
    }
}

impl<'a> IntoIterator for &'a EffectSequence {
    type Item = &'a EffectCell;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Draining iterator yielding owned effects.
pub struct IntoIter {
    sequence: EffectSequence,
}

impl Iterator for IntoIter {
    type Item = Effect;

    fn next(&mut self) -> Option<Effect> {
        self.sequence.pop_front().map(into_effect)
    }
}

impl IntoIterator for EffectSequence {
    type Item = Effect;
    type IntoIter = IntoIter;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { sequence: self }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(sequence: &EffectSequence) -> Vec<String> {
        sequence
            .iter()
            .map(|cell| cell.borrow().message().to_string())
            .collect()
    }

    fn seq(items: &[&str]) -> EffectSequence {
        items.iter().map(|t| Effect::display(*t)).collect()
    }

    #[test]
    fn test_new_is_empty() {
        let sequence = EffectSequence::new();
        assert!(sequence.is_empty());
        assert_eq!(sequence.len(), 0);
        assert!(sequence.head().is_none());
    }

    #[test]
    fn test_placeholder_only_is_not_empty() {
        let mut sequence = EffectSequence::new();
        sequence.push_placeholder();
        assert!(!sequence.is_empty());
        assert_eq!(sequence.len(), 0);
        assert!(sequence.head_is_placeholder());
        assert!(sequence.head().is_none());

        sequence.advance();
        assert!(sequence.is_empty());
    }

    #[test]
    fn test_append_to_empty_takes_other() {
        let mut a = EffectSequence::new();
        a.append(seq(&["x", "y"]));
        assert_eq!(texts(&a), vec!["x", "y"]);
    }

    #[test]
    fn test_append_keeps_order() {
        let mut a = seq(&["a1", "a2"]);
        a.append(seq(&["b1", "b2"]));
        assert_eq!(texts(&a), vec!["a1", "a2", "b1", "b2"]);

        a.push(Effect::display("c"));
        assert_eq!(texts(&a), vec!["a1", "a2", "b1", "b2", "c"]);
    }

    #[test]
    fn test_insert_after_head() {
        let mut a = seq(&["head", "rest1", "rest2"]);
        a.insert_after_head(seq(&["new1", "new2"]));
        assert_eq!(texts(&a), vec!["head", "new1", "new2", "rest1", "rest2"]);
    }

    #[test]
    fn test_insert_after_lone_head_updates_tail() {
        let mut a = seq(&["head"]);
        a.insert_after_head(seq(&["new"]));
        a.push(Effect::display("end"));
        assert_eq!(texts(&a), vec!["head", "new", "end"]);
    }

    #[test]
    fn test_insert_empty_is_noop() {
        let mut a = seq(&["head", "rest"]);
        a.insert_after_head(EffectSequence::new());
        a.push(Effect::display("end"));
        assert_eq!(texts(&a), vec!["head", "rest", "end"]);
    }

    #[test]
    fn test_advance_and_truncate() {
        let mut a = seq(&["1", "2", "3"]);
        a.advance();
        assert_eq!(a.head().unwrap().message(), "2");

        a.truncate();
        assert_eq!(texts(&a), vec!["2"]);
        a.push(Effect::display("4"));
        assert_eq!(texts(&a), vec!["2", "4"]);

        a.advance();
        a.advance();
        assert!(a.is_empty());
        a.advance();
        assert!(a.is_empty());
    }

    #[test]
    fn test_pop_front_skips_placeholders() {
        let mut a = EffectSequence::new();
        a.push_placeholder();
        a.push(Effect::display("x"));
        a.push_placeholder();

        let first = a.pop_front().unwrap();
        assert_eq!(first.borrow().message(), "x");
        assert!(!a.is_empty());
        assert!(a.pop_front().is_none());
        assert!(a.is_empty());
    }

    #[test]
    fn test_split_until() {
        let mut a: EffectSequence = [
            Effect::display("w1"),
            Effect::display("w2"),
            Effect::marker(EffectKind::EndWait),
            Effect::display("after"),
        ]
        .into_iter()
        .collect();

        let block = a.split_until(EffectKind::EndWait).unwrap();
        assert_eq!(texts(&block), vec!["w1", "w2"]);
        assert!(a.is(EffectKind::EndWait));
        a.advance();
        assert_eq!(texts(&a), vec!["after"]);
    }

    #[test]
    fn test_split_until_missing_leaves_sequence() {
        let mut a = seq(&["1", "2"]);
        assert!(a.split_until(EffectKind::EndWait).is_none());
        assert_eq!(texts(&a), vec!["1", "2"]);
    }

    #[test]
    fn test_split_until_at_head_is_empty_block() {
        let mut a: EffectSequence = [Effect::marker(EffectKind::EndConditional)]
            .into_iter()
            .collect();
        let block = a.split_until(EffectKind::EndConditional).unwrap();
        assert!(block.is_empty());
        assert!(a.is(EffectKind::EndConditional));
    }

    #[test]
    fn test_share_sees_mutations() {
        let a = seq(&["before"]);
        let b = a.share();

        a.head_mut().unwrap().message = Some("after".into());
        assert_eq!(b.head().unwrap().message(), "after");
    }

    #[test]
    fn test_share_has_independent_chain() {
        let mut a = seq(&["1", "2"]);
        let b = a.share();

        a.insert_after_head(seq(&["x"]));
        a.truncate();
        assert_eq!(texts(&a), vec!["1"]);
        assert_eq!(texts(&b), vec!["1", "2"]);
    }

    #[test]
    fn test_clone_is_deep() {
        let a = seq(&["orig"]);
        let b = a.clone();

        a.head_mut().unwrap().message = Some("changed".into());
        assert_eq!(b.head().unwrap().message(), "orig");
    }

    #[test]
    fn test_into_iter_drains() {
        let a = seq(&["1", "2", "3"]);
        let shared = a.share();
        let drained: Vec<_> = a.into_iter().map(|e| e.message().to_string()).collect();
        assert_eq!(drained, vec!["1", "2", "3"]);
        assert_eq!(shared.len(), 3);
    }

    #[test]
    fn test_free_list_reuse() {
        let mut a = seq(&["1", "2", "3"]);
        a.truncate();
        a.append(seq(&["4", "5"]));
        assert_eq!(texts(&a), vec!["1", "4", "5"]);
        assert!(a.nodes.len() <= 3);
    }

    #[test]
    fn test_long_clone_is_iterative() {
        let a: EffectSequence = (0..50_000).map(|i| Effect::display(i.to_string())).collect();
        let b = a.clone();
        assert_eq!(b.len(), 50_000);
    }
}
