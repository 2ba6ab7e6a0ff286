//! Slot and epoch arithmetic, including the Byron/Shelley offset correction.
//!
//! Clusters bootstrapped in the Byron era and later switched to Shelley have
//! epochs of two different lengths in their history. Slot numbers queried
//! from the node are absolute, so translating them into epochs needs a
//! constant offset between "where Shelley thinks slots should be" and where
//! they actually are.

/// Epoch number together with its first and last absolute slot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct EpochInfo {
    /// The epoch number.
    pub epoch: i64,
    /// First absolute slot of the epoch.
    pub first_slot: i64,
    /// Last absolute slot of the epoch.
    pub last_slot: i64,
}

/// Offset implied by the current tip: difference between the slot count a
/// pure-Shelley history would have produced and the actual slot count.
pub fn offset_from_tip(epoch_length: i64, epoch: i64, slot: i64, slots_to_epoch_end: i64) -> i64 {
    let slots_total = slot + slots_to_epoch_end;
    let slots_shelley = epoch_length * (epoch + 1);
    slots_shelley - slots_total
}

/// Offset of a network that spent `byron_epochs` epochs of `byron_epoch_length`
/// slots in the earlier era before switching to epochs of
/// `shelley_epoch_length` slots.
pub fn era_switch_offset(
    byron_epochs: i64,
    byron_epoch_length: i64,
    shelley_epoch_length: i64,
) -> i64 {
    byron_epochs * (shelley_epoch_length - byron_epoch_length)
}

/// Epoch and epoch boundary slots for an absolute slot number.
///
/// `byron_k` is the Byron security parameter; a Byron epoch spans `10 * k`
/// slots. Slots before the era switch map onto Byron epochs directly, later
/// slots are translated through the offset into Shelley terms.
pub fn epoch_for_slot(slot_no: i64, epoch_length: i64, slots_offset: i64, byron_k: i64) -> EpochInfo {
    let slots_in_byron_epoch = byron_k * 10;
    let slots_per_epoch_diff = epoch_length - slots_in_byron_epoch;
    let num_byron_epochs = if slots_per_epoch_diff == 0 {
        0
    } else {
        slots_offset / slots_per_epoch_diff
    };
    let slots_in_byron = num_byron_epochs * slots_in_byron_epoch;

    if slot_no < slots_in_byron {
        let epoch = slot_no / slots_in_byron_epoch;
        let first_slot = epoch * slots_in_byron_epoch;
        EpochInfo {
            epoch,
            first_slot,
            last_slot: first_slot + slots_in_byron_epoch - 1,
        }
    } else {
        let slot_no_shelley = slot_no + slots_offset;
        let epoch = slot_no_shelley / epoch_length;
        let first_slot = epoch * epoch_length - slots_offset;
        EpochInfo {
            epoch,
            first_slot,
            last_slot: first_slot + epoch_length - 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // A testnet with 10 Byron epochs of 2160 * 10 slots that switched to
    // Shelley epochs of 43200 slots.
    const BYRON_K: i64 = 2160;
    const BYRON_EPOCH_LENGTH: i64 = BYRON_K * 10;
    const EPOCH_LENGTH: i64 = 43_200;
    const BYRON_EPOCHS: i64 = 10;

    #[test]
    fn offset_formula_matches_documented_property() {
        // offset = E * (S - B)
        let offset = era_switch_offset(BYRON_EPOCHS, BYRON_EPOCH_LENGTH, EPOCH_LENGTH);
        assert_eq!(offset, 216_000);
    }

    #[test]
    fn offset_from_tip_agrees_with_era_switch_offset() {
        let offset = era_switch_offset(BYRON_EPOCHS, BYRON_EPOCH_LENGTH, EPOCH_LENGTH);
        // Tip some slots into epoch 12 (two Shelley epochs after the switch).
        let epoch = 12;
        let first_slot = epoch * EPOCH_LENGTH - offset;
        let slot = first_slot + 100;
        let slots_to_epoch_end = EPOCH_LENGTH - 101;
        assert_eq!(
            offset_from_tip(EPOCH_LENGTH, epoch, slot, slots_to_epoch_end),
            offset
        );
    }

    #[test]
    fn zero_offset_for_shelley_only_cluster() {
        // Epoch 3, slot 500 into the epoch.
        let slot = 3 * EPOCH_LENGTH + 500;
        assert_eq!(
            offset_from_tip(EPOCH_LENGTH, 3, slot, EPOCH_LENGTH - 501),
            0
        );
    }

    #[test]
    fn byron_era_slot_maps_onto_byron_epoch() {
        let offset = era_switch_offset(BYRON_EPOCHS, BYRON_EPOCH_LENGTH, EPOCH_LENGTH);
        let info = epoch_for_slot(BYRON_EPOCH_LENGTH + 5, EPOCH_LENGTH, offset, BYRON_K);
        assert_eq!(
            info,
            EpochInfo {
                epoch: 1,
                first_slot: BYRON_EPOCH_LENGTH,
                last_slot: 2 * BYRON_EPOCH_LENGTH - 1,
            }
        );
    }

    #[test]
    fn shelley_era_slot_maps_through_offset() {
        let offset = era_switch_offset(BYRON_EPOCHS, BYRON_EPOCH_LENGTH, EPOCH_LENGTH);
        let slots_in_byron = BYRON_EPOCHS * BYRON_EPOCH_LENGTH;
        let info = epoch_for_slot(slots_in_byron + 10, EPOCH_LENGTH, offset, BYRON_K);
        // First Shelley epoch right after the switch.
        assert_eq!(info.epoch, BYRON_EPOCHS);
        assert_eq!(info.first_slot, slots_in_byron);
        assert_eq!(info.last_slot, slots_in_byron + EPOCH_LENGTH - 1);
    }

    #[test]
    fn epoch_boundaries_are_continuous() {
        let offset = era_switch_offset(BYRON_EPOCHS, BYRON_EPOCH_LENGTH, EPOCH_LENGTH);
        let slots_in_byron = BYRON_EPOCHS * BYRON_EPOCH_LENGTH;
        let before = epoch_for_slot(slots_in_byron - 1, EPOCH_LENGTH, offset, BYRON_K);
        let after = epoch_for_slot(slots_in_byron, EPOCH_LENGTH, offset, BYRON_K);
        assert_eq!(before.last_slot + 1, after.first_slot);
        assert_eq!(before.epoch + 1, after.epoch);
    }
}
