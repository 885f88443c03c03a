use super::CappedVecErr;
use super::CappedVecResult;
use super::ErrorKind;

/// Picks the capacity a container should grow to so it can hold `required`
/// elements.
///
/// Starting from `current` (or 1 when nothing is allocated) the capacity
/// doubles until it covers `required`, and is then clamped to `limit`.
/// A `required` that is already covered returns `current` unchanged.
///
/// Fails with `CapacityExceeded` when `required` is above `limit`.
///
/// ```
/// use capped_vec::types::calculate_enough_capacity;
///
/// assert_eq!(calculate_enough_capacity(0, 3, 1024), Ok(4));
/// assert_eq!(calculate_enough_capacity(10, 11, 1024), Ok(20));
/// assert_eq!(calculate_enough_capacity(600, 700, 1024), Ok(1024));
/// assert!(calculate_enough_capacity(0, 1025, 1024).is_err());
/// ```
pub fn calculate_enough_capacity(current: usize, required: usize, limit: usize) -> CappedVecResult<usize> {
    if required > limit {
        log::warn!("{} elements requested, the limit is {}", required, limit);
        return Err(CappedVecErr::new(ErrorKind::CapacityExceeded));
    }
    if required <= current {
        return Ok(current);
    }

    let mut capacity = current.max(1);
    while capacity < required {
        capacity = capacity.saturating_mul(2);
    }
    let capacity = capacity.min(limit);
    log::debug!("growing capacity from {} to {} for {} elements", current, capacity, required);
    return Ok(capacity);
}
