//! Shared machinery for the integration and property tests: a reference
//! model over `Vec<i32>`, a random-action vocabulary applied to both the
//! model and the container under test, and proptest strategies for it.

#![allow(dead_code)]

use bramble::{Evolver, PSequence, Slice};
use proptest::prelude::*;

/// Draws one action with plain `rand`, for the non-proptest smoke rounds.
pub fn random_action(rng: &mut impl rand::Rng) -> SequenceAction {
    use SequenceAction::*;
    let index = rng.gen_range(-25..25);
    let value = rng.gen_range(-100..100);
    match rng.gen_range(0..10) {
        0 => PushFront(value),
        1 => PushBack(value),
        2 => Insert { index, value },
        3 => Set { index, value },
        4 => Delete { index },
        5 => {
            if rng.gen() {
                PopFront
            } else {
                PopBack
            }
        }
        6 => Reverse,
        7 => Sort,
        8 => SplitConcat { index },
        _ => DeleteSlice {
            start: rng.gen_range(-25..25),
            stop: rng.gen_range(-25..25),
            step: [-2, -1, 1, 2, 3][rng.gen_range(0..5)],
        },
    }
}

/// One randomly chosen operation in a consistency round.
#[derive(Clone, Debug, PartialEq)]
pub enum SequenceAction {
    PushFront(i32),
    PushBack(i32),
    Insert { index: isize, value: i32 },
    Set { index: isize, value: i32 },
    Delete { index: isize },
    PopFront,
    PopBack,
    Reverse,
    Sort,
    SplitConcat { index: isize },
    DeleteSlice { start: isize, stop: isize, step: isize },
}

pub fn action_strategy() -> impl Strategy<Value = SequenceAction> {
    use SequenceAction::*;
    let value = -100..100i32;
    let index = -25..25isize;
    let step = prop_oneof![Just(-2isize), Just(-1), Just(1), Just(2), Just(3)];
    prop_oneof![
        value.clone().prop_map(PushFront),
        value.clone().prop_map(PushBack),
        (index.clone(), value.clone()).prop_map(|(index, value)| Insert { index, value }),
        (index.clone(), value).prop_map(|(index, value)| Set { index, value }),
        index.clone().prop_map(|index| Delete { index }),
        proptest::bool::ANY.prop_map(|front| if front { PopFront } else { PopBack }),
        Just(Reverse),
        Just(Sort),
        index.clone().prop_map(|index| SplitConcat { index }),
        (index.clone(), index, step)
            .prop_map(|(start, stop, step)| DeleteSlice { start, stop, step }),
    ]
}

pub fn actions_strategy() -> impl Strategy<Value = Vec<SequenceAction>> {
    proptest::collection::vec(action_strategy(), 0..120)
}

pub fn initial_strategy() -> impl Strategy<Value = Vec<i32>> {
    proptest::collection::vec(-100..100i32, 0..60)
}

/// Scalar index normalization, restated independently of the library.
pub fn norm_index(len: usize, index: isize) -> Option<usize> {
    let index = if index < 0 { index + len as isize } else { index };
    if 0 <= index && (index as usize) < len {
        Some(index as usize)
    } else {
        None
    }
}

/// The positions a slice selects, in walk order, restated as a plain walk
/// rather than the count formula the library uses.
pub fn selected_positions(
    len: usize,
    start: Option<isize>,
    stop: Option<isize>,
    step: isize,
) -> Vec<usize> {
    assert_ne!(step, 0);
    let len = len as isize;
    let (lower, upper) = if step < 0 { (-1, len - 1) } else { (0, len) };
    let start = match start {
        None => {
            if step < 0 {
                upper
            } else {
                lower
            }
        }
        Some(bound) if bound < 0 => (bound + len).max(lower),
        Some(bound) => bound.min(upper),
    };
    let stop = match stop {
        None => {
            if step < 0 {
                lower
            } else {
                upper
            }
        }
        Some(bound) if bound < 0 => (bound + len).max(lower),
        Some(bound) => bound.min(upper),
    };
    let mut positions = Vec::new();
    let mut at = start;
    while (step > 0 && at < stop) || (step < 0 && at > stop) {
        positions.push(at as usize);
        at += step;
    }
    positions
}

/// Applies an action to the pure sequence, returning the next value.
/// Failing operations leave the value unchanged, which is exactly the
/// library's contract.
pub fn apply_pure(seq: &PSequence<i32>, action: &SequenceAction) -> PSequence<i32> {
    use SequenceAction::*;
    match action {
        PushFront(value) => seq.push_front(*value),
        PushBack(value) => seq.push_back(*value),
        Insert { index, value } => seq.insert(*index, *value),
        Set { index, value } => seq.set(*index, *value).unwrap_or_else(|_| seq.clone()),
        Delete { index } => seq.delete(*index).unwrap_or_else(|_| seq.clone()),
        PopFront => match seq.view_front() {
            Ok((_, rest)) => rest,
            Err(_) => seq.clone(),
        },
        PopBack => match seq.view_back() {
            Ok((rest, _)) => rest,
            Err(_) => seq.clone(),
        },
        Reverse => seq.reverse(),
        Sort => seq.sort(),
        SplitConcat { index } => {
            let (front, back) = seq.split_at(*index);
            front.concat(&back)
        }
        DeleteSlice { start, stop, step } => seq
            .delete_slice(Slice::new(*start, *stop, *step))
            .unwrap_or_else(|_| seq.clone()),
    }
}

/// The same action against the `Vec` model.
pub fn apply_model(model: &mut Vec<i32>, action: &SequenceAction) {
    use SequenceAction::*;
    match action {
        PushFront(value) => model.insert(0, *value),
        PushBack(value) => model.push(*value),
        Insert { index, value } => {
            let clamped = {
                let shifted = if *index < 0 {
                    index + model.len() as isize
                } else {
                    *index
                };
                shifted.max(0).min(model.len() as isize) as usize
            };
            model.insert(clamped, *value);
        }
        Set { index, value } => {
            if let Some(position) = norm_index(model.len(), *index) {
                model[position] = *value;
            }
        }
        Delete { index } => {
            if let Some(position) = norm_index(model.len(), *index) {
                model.remove(position);
            }
        }
        PopFront => {
            if !model.is_empty() {
                model.remove(0);
            }
        }
        PopBack => {
            model.pop();
        }
        Reverse => model.reverse(),
        Sort => model.sort(),
        SplitConcat { .. } => {}
        DeleteSlice { start, stop, step } => {
            let doomed = selected_positions(model.len(), Some(*start), Some(*stop), *step);
            let mut keep = Vec::with_capacity(model.len());
            for (position, value) in model.iter().enumerate() {
                if !doomed.contains(&position) {
                    keep.push(*value);
                }
            }
            *model = keep;
        }
    }
}

/// The same action through an evolver.
pub fn apply_evolver(evolver: &mut Evolver<i32>, action: &SequenceAction) {
    use SequenceAction::*;
    match action {
        PushFront(value) => {
            evolver.push_front(*value);
        }
        PushBack(value) => {
            evolver.push_back(*value);
        }
        Insert { index, value } => {
            evolver.insert(*index, *value);
        }
        Set { index, value } => {
            let _ = evolver.set(*index, *value);
        }
        Delete { index } => {
            let _ = evolver.delete(*index);
        }
        PopFront => {
            let _ = evolver.pop_front();
        }
        PopBack => {
            let _ = evolver.pop_back();
        }
        Reverse => {
            evolver.reverse();
        }
        Sort => {
            evolver.sort();
        }
        SplitConcat { .. } => {}
        DeleteSlice { start, stop, step } => {
            let _ = evolver.delete_slice(Slice::new(*start, *stop, *step));
        }
    }
}

/// Runs a whole round of actions against the sequence and the model,
/// checking contents and invariants after every step.
pub fn check_consistency(initial: &[i32], actions: &[SequenceAction]) {
    let mut seq: PSequence<i32> = initial.iter().copied().collect();
    let mut model: Vec<i32> = initial.to_vec();
    seq.assert_correctness();
    assert_eq!(seq.to_vec(), model);
    for action in actions {
        seq = apply_pure(&seq, action);
        apply_model(&mut model, action);
        seq.assert_correctness();
        assert_eq!(seq.len(), model.len(), "diverged after {:?}", action);
        assert_eq!(seq.to_vec(), model, "diverged after {:?}", action);
    }
}
