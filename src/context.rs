//! Phase-to-context mapping and pick-slot counting.
//!
//! Both input cores need the same two questions answered: "which input
//! context does the current phase put us in" and "how many pick choices are
//! on offer". The answers live here so the gamepad poller and the key gate
//! cannot drift apart.

use crate::gateway::{actions, ActionMask, Phase};
use crate::protocol::InputContext;

/// Map a game phase to the input context it activates.
///
/// Combat, carousel, portal select, game over, and anything unrecognized all
/// disable input routing entirely.
pub fn context_for_phase(phase: Phase) -> InputContext {
    match phase {
        Phase::Shop => InputContext::Shop,
        Phase::PickPokemon | Phase::PickItem => InputContext::Pick,
        _ => InputContext::Disabled,
    }
}

/// Count how many pick choices are currently offered.
///
/// There is no separate choice-count signal; the count is derived from the
/// reserved pick window of the legality mask. Choices are contiguous from the
/// window start, so counting stops at the first 0 — a later 1 past a gap is
/// not a valid choice. Returns 0 when the mask is unavailable or too short.
pub fn pick_slot_count(mask: Option<&ActionMask>) -> usize {
    let Some(mask) = mask else {
        return 0;
    };
    mask.iter()
        .skip(actions::PICK_BASE)
        .take(actions::PICK_WINDOW)
        .take_while(|&&entry| entry == 1)
        .count()
}
