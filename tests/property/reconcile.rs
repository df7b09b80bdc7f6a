//! Event sequences applied through the dispatcher.

use super::strategies::{entry, identity, listing};
use dirmirror::events::{ChangeEvent, Op};
use dirmirror::reconcile::Reconciler;
use dirmirror::tree::order::is_sorted;
use dirmirror::tree::path::join_key;
use dirmirror::tree::{DirectoryCache, Entry, EntryKind};
use proptest::prelude::*;
use proptest::sample::Index;
use std::collections::HashSet;

/// Loaded subdirectory. Generated names never contain a dot, so no step can
/// create, rename or remove it.
const SUB: &str = "sub.d";

fn create(e: &Entry) -> ChangeEvent {
    ChangeEvent::create(".", e.file_name(), e.kind)
}

fn remove(e: &Entry) -> ChangeEvent {
    ChangeEvent::remove(".", e.file_name(), e.kind)
}

fn op() -> impl Strategy<Value = Op> {
    prop_oneof![Just(Op::Create), Just(Op::Remove), Just(Op::Rename), Just(Op::Move)]
}

/// `name + extension` of `e` renamed after `new`, keeping the kind of `e`.
fn renamed_file(e: &Entry, new: &Entry) -> String {
    match e.kind {
        EntryKind::Dir => new.name.clone(),
        EntryKind::File => format!("{}{}", new.name, new.extension),
    }
}

/// Event for one generated step, or `None` when the chosen listing has
/// nothing to act on.
fn step_event(r: &Reconciler, op: Op, in_sub: bool, pick: &Index, new: &Entry) -> Option<ChangeEvent> {
    let (dir, other) = if in_sub { (SUB, ".") } else { (".", SUB) };
    if op == Op::Create {
        return Some(ChangeEvent::create(dir, new.file_name(), new.kind));
    }

    let candidates: Vec<&Entry> = r
        .cache()
        .get_directory(dir)?
        .iter()
        .filter(|e| e.name != SUB)
        .collect();
    if candidates.is_empty() {
        return None;
    }
    let old = candidates[pick.index(candidates.len())];
    let old_path = join_key(dir, &old.file_name());
    Some(match op {
        Op::Remove => ChangeEvent::remove(dir, old.file_name(), old.kind),
        Op::Rename => ChangeEvent::rename(old_path, dir, renamed_file(old, new), old.kind),
        _ => ChangeEvent::moved(old_path, other, renamed_file(old, new), old.kind),
    })
}

fn assert_listing(entries: &[Entry]) -> Result<(), TestCaseError> {
    prop_assert!(is_sorted(entries));
    let mut seen = HashSet::new();
    prop_assert!(entries.iter().all(|e| seen.insert(identity(e))));
    Ok(())
}

proptest! {
    #[test]
    fn listing_stays_sorted_through_any_event_sequence(
        initial in listing(20),
        nested in listing(10),
        steps in prop::collection::vec((op(), any::<bool>(), any::<Index>(), entry()), 0..40),
    ) {
        let mut root = initial;
        root.push(Entry::dir(SUB));
        let mut r = Reconciler::new(DirectoryCache::with_root(root));
        r.cache_mut().add_dir(SUB, nested);

        for (op, in_sub, pick, new) in &steps {
            if let Some(event) = step_event(&r, *op, *in_sub, pick, new) {
                r.dispatch(&event);
            }
            assert_listing(r.cache().root())?;
            assert_listing(r.cache().get_directory(SUB).unwrap_or(&[]))?;
            prop_assert!(r.cache().root().iter().any(|e| e.name == SUB));
        }
    }

    #[test]
    fn create_then_remove_restores_listing(initial in listing(30), new in entry()) {
        prop_assume!(!initial.iter().any(|e| identity(e) == identity(&new)));

        let mut r = Reconciler::new(DirectoryCache::with_root(initial.clone()));
        r.dispatch(&create(&new));
        prop_assert_eq!(r.cache().root().len(), initial.len() + 1);
        r.dispatch(&remove(&new));
        prop_assert_eq!(r.cache().root(), initial.as_slice());
    }

    #[test]
    fn rename_preserves_entry_count(initial in listing(30), pick in any::<prop::sample::Index>(), new in entry()) {
        prop_assume!(!initial.is_empty());
        let old = &initial[pick.index(initial.len())];
        prop_assume!(old.kind == new.kind);
        prop_assume!(!initial.iter().any(|e| identity(e) == identity(&new)));

        let mut r = Reconciler::new(DirectoryCache::with_root(initial.clone()));
        r.dispatch(&ChangeEvent::rename(old.file_name(), ".", new.file_name(), new.kind));

        let root = r.cache().root();
        prop_assert_eq!(root.len(), initial.len());
        prop_assert!(is_sorted(root));
        prop_assert!(root.iter().any(|e| identity(e) == identity(&new)));
        prop_assert!(!root.iter().any(|e| identity(e) == identity(old)));
    }
}
