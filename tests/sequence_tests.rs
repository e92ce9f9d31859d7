//! Effect sequence integration tests.
//!
//! These tests check splicing order, draining, shared handles and the
//! ownership rules for objects carried by effects.

use std::cell::Cell;
use std::rc::Rc;

use proptest::prelude::*;

use rust_wumpus::core::{EntityId, PlayerId, RoomPos};
use rust_wumpus::effects::{Effect, EffectKind, EffectSequence, Owned};
use rust_wumpus::world::{Entity, Visitor, WorldContext};

/// Sequence of `DisplayText` effects tagged with their `info`.
fn tagged(tags: &[i32]) -> EffectSequence {
    tags.iter()
        .map(|&tag| Effect::display("tag").with_info(tag))
        .collect()
}

fn tags(sequence: &EffectSequence) -> Vec<i32> {
    sequence
        .iter()
        .map(|cell| cell.borrow().info.unwrap_or(-1))
        .collect()
}

/// An event that counts how many copies of it have been dropped.
#[derive(Debug, Clone)]
struct Counted {
    id: EntityId,
    location: RoomPos,
    drops: Rc<Cell<usize>>,
}

impl Drop for Counted {
    fn drop(&mut self) {
        self.drops.set(self.drops.get() + 1);
    }
}

impl Entity for Counted {
    fn id(&self) -> EntityId {
        self.id
    }

    fn name(&self) -> &str {
        "Counted"
    }

    fn location(&self) -> RoomPos {
        self.location
    }

    fn set_location(&mut self, room: RoomPos) {
        self.location = room;
    }

    fn symbol(&self) -> char {
        'C'
    }

    fn triggered_by(&self, _visitor: &Visitor<'_>, _ctx: &mut WorldContext<'_>) -> EffectSequence {
        EffectSequence::new()
    }

    fn clone_entity(&self) -> Box<dyn Entity> {
        Box::new(self.clone())
    }
}

fn counted(drops: &Rc<Cell<usize>>) -> Owned {
    Owned::Entity(Box::new(Counted {
        id: EntityId::new(7),
        location: RoomPos::new(1, 1),
        drops: Rc::clone(drops),
    }))
}

fn owned_location(effect: &Effect) -> Option<RoomPos> {
    match effect.owned() {
        Some(Owned::Entity(entity)) => Some(entity.location()),
        _ => None,
    }
}

// =============================================================================
// Splicing
// =============================================================================

proptest! {
    /// Appending keeps both halves in order, one after the other.
    #[test]
    fn test_append_concatenates(
        left in prop::collection::vec(0i32..100, 0..12),
        right in prop::collection::vec(0i32..100, 0..12),
    ) {
        let mut sequence = tagged(&left);
        sequence.append(tagged(&right));

        let expected: Vec<i32> = left.iter().chain(right.iter()).copied().collect();
        prop_assert_eq!(tags(&sequence), expected);
    }

    /// Inserting after the head puts the new effects between the head and
    /// everything that followed it.
    #[test]
    fn test_insert_after_head_runs_before_siblings(
        base in prop::collection::vec(0i32..100, 1..12),
        inserted in prop::collection::vec(100i32..200, 0..12),
    ) {
        let mut sequence = tagged(&base);
        sequence.insert_after_head(tagged(&inserted));

        let mut expected = vec![base[0]];
        expected.extend(&inserted);
        expected.extend(&base[1..]);
        prop_assert_eq!(tags(&sequence), expected);
    }

    /// Advancing `n` times drops exactly the first `n` effects.
    #[test]
    fn test_advance_drops_from_front(
        base in prop::collection::vec(0i32..100, 0..12),
        steps in 0usize..16,
    ) {
        let mut sequence = tagged(&base);
        for _ in 0..steps {
            sequence.advance();
        }
        let kept: Vec<i32> = base.iter().skip(steps).copied().collect();
        prop_assert_eq!(sequence.is_empty(), kept.is_empty());
        prop_assert_eq!(tags(&sequence), kept);
    }
}

/// Inserting into an empty sequence behaves like appending.
#[test]
fn test_insert_into_empty() {
    let mut sequence = EffectSequence::new();
    sequence.insert_after_head(tagged(&[1, 2]));
    assert_eq!(tags(&sequence), vec![1, 2]);

    sequence.push(Effect::display("tail").with_info(3));
    assert_eq!(tags(&sequence), vec![1, 2, 3]);
}

/// Repeated splices after the same head stack up newest first.
#[test]
fn test_repeated_inserts_after_head() {
    let mut sequence = tagged(&[0, 9]);
    sequence.insert_after_head(tagged(&[2]));
    sequence.insert_after_head(tagged(&[1]));
    assert_eq!(tags(&sequence), vec![0, 1, 2, 9]);
}

/// Truncating keeps the head alone, and the tail follows the head again.
#[test]
fn test_truncate_keeps_head() {
    let mut sequence = tagged(&[1, 2, 3]);
    sequence.truncate();
    assert_eq!(tags(&sequence), vec![1]);

    sequence.push(Effect::display("again").with_info(4));
    assert_eq!(tags(&sequence), vec![1, 4]);
}

// =============================================================================
// Region Extraction
// =============================================================================

/// `split_until` hands back the block and leaves the marker at the head.
#[test]
fn test_split_until_extracts_block() {
    let mut sequence: EffectSequence = [
        Effect::display("a"),
        Effect::display("b"),
        Effect::marker(EffectKind::EndWait),
        Effect::display("c"),
    ]
    .into_iter()
    .collect();

    let block = sequence.split_until(EffectKind::EndWait).unwrap();
    assert_eq!(block.len(), 2);
    assert_eq!(
        sequence.kinds(),
        vec![EffectKind::EndWait, EffectKind::DisplayText]
    );
}

/// Without the marker nothing is taken.
#[test]
fn test_split_until_missing_marker() {
    let mut sequence = tagged(&[1, 2]);
    assert!(sequence.split_until(EffectKind::EndConditional).is_none());
    assert!(!sequence.skip_until(EffectKind::EndConditional));
    assert_eq!(tags(&sequence), vec![1, 2]);
}

/// Placeholders are invisible to iteration but keep a sequence non-empty.
#[test]
fn test_placeholders_are_skipped() {
    let mut sequence = EffectSequence::new();
    sequence.push_placeholder();
    sequence.push(Effect::display("x").with_info(5));

    assert!(!sequence.is_empty());
    assert!(sequence.head_is_placeholder());
    assert_eq!(sequence.len(), 1);

    sequence.skip_placeholders();
    assert_eq!(sequence.head_kind(), Some(EffectKind::DisplayText));
}

// =============================================================================
// Shared Handles and Copies
// =============================================================================

/// Two handles over the same cells see each other's payload edits but
/// splice independently.
#[test]
fn test_share_observes_same_cells() {
    let original = tagged(&[1, 2]);
    let mut shared = original.share();

    if let Some(mut head) = shared.head_mut() {
        head.player = Some(PlayerId::new(3));
    }
    assert_eq!(original.head().unwrap().player, Some(PlayerId::new(3)));

    shared.advance();
    assert_eq!(tags(&original), vec![1, 2]);
    assert_eq!(tags(&shared), vec![2]);
}

/// A deep copy does not see later edits to the original.
#[test]
fn test_clone_is_deep() {
    let original = tagged(&[1]);
    let copy = original.clone();

    original.head_mut().unwrap().info = Some(42);
    assert_eq!(tags(&copy), vec![1]);
    assert_eq!(tags(&original), vec![42]);
}

/// Cloning a long sequence does not recurse.
#[test]
fn test_clone_long_sequence() {
    let sequence: EffectSequence = (0..100_000).map(|i| Effect::display("x").with_info(i)).collect();
    let copy = sequence.clone();
    assert_eq!(copy.len(), 100_000);
}

// =============================================================================
// Ownership
// =============================================================================

/// Copies of an owning effect own separate objects.
#[test]
fn test_owned_object_is_deep_cloned() {
    let drops = Rc::new(Cell::new(0));
    let original: EffectSequence = Effect::create(counted(&drops)).into();
    let copy = original.clone();

    // Move the original's object; the copy keeps its own.
    if let Some(Owned::Entity(mut entity)) = original.head_mut().unwrap().take_owned() {
        entity.set_location(RoomPos::new(4, 4));
    }
    assert_eq!(owned_location(&copy.head().unwrap()), Some(RoomPos::new(1, 1)));
    assert_eq!(original.head().unwrap().entity, Some(EntityId::new(7)));
}

/// Each owned object is released exactly once.
#[test]
fn test_owned_object_released_once() {
    let drops = Rc::new(Cell::new(0));
    {
        let original: EffectSequence = Effect::create(counted(&drops)).into();
        let copy = original.clone();
        let shared = original.share();
        drop(original);
        assert_eq!(drops.get(), 0);
        drop(shared);
        assert_eq!(drops.get(), 1);
        drop(copy);
    }
    assert_eq!(drops.get(), 2);
}

/// Advancing past an owning effect releases the object it still owns.
#[test]
fn test_advance_releases_owned() {
    let drops = Rc::new(Cell::new(0));
    let mut sequence: EffectSequence = [Effect::create(counted(&drops)), Effect::display("next")]
        .into_iter()
        .collect();

    sequence.advance();
    assert_eq!(drops.get(), 1);
    assert_eq!(sequence.head_kind(), Some(EffectKind::DisplayText));
}

/// An object taken out of its effect outlives the sequence.
#[test]
fn test_taken_object_survives() {
    let drops = Rc::new(Cell::new(0));
    let sequence: EffectSequence = Effect::create(counted(&drops)).into();
    let taken = sequence.head_mut().unwrap().take_owned();
    drop(sequence);

    assert_eq!(drops.get(), 0);
    assert!(taken.is_some());
    drop(taken);
    assert_eq!(drops.get(), 1);
}

/// Draining into owned effects keeps the payload.
#[test]
fn test_into_iter_yields_effects() {
    let sequence = tagged(&[3, 4]);
    let effects: Vec<Effect> = sequence.into_iter().collect();
    assert_eq!(effects.len(), 2);
    assert_eq!(effects[1].info, Some(4));
}
