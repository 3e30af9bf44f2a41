//! Linear amplification ramp between two block heights

use crate::arithmetic::{abs_diff, Balance};

/// Amplification in effect at `current_block`
///
/// Moves linearly from `initial` at `initial_block` to `final_amp` at
/// `final_block`, flooring the distance travelled. Before the ramp starts, or
/// for a degenerate ramp where `final_block <= initial_block`, the initial
/// value holds; at or after `final_block` the final value holds.
pub fn calculate_amplification(
    initial: &Balance,
    final_amp: &Balance,
    initial_block: u64,
    final_block: u64,
    current_block: u64,
) -> Balance {
    if current_block < initial_block || final_block <= initial_block {
        return initial.clone();
    }
    if current_block >= final_block {
        return final_amp.clone();
    }

    let elapsed = Balance::from(current_block - initial_block);
    let duration = Balance::from(final_block - initial_block);
    let step = abs_diff(final_amp, initial) * elapsed / duration;

    if final_amp > initial {
        initial + step
    } else {
        initial - step
    }
}
