//! Seat rotation helpers. `order` is always the room's stable join order.

use super::entities::PlayerId;

/// Rotation for a round: the seat after the dealer first, the dealer last.
/// An unseated dealer leaves the stable order as is.
#[must_use]
pub fn rotation(order: &[PlayerId], dealer: Option<&PlayerId>) -> Vec<PlayerId> {
    match dealer.and_then(|d| order.iter().position(|id| id == d)) {
        Some(idx) => order[idx + 1..]
            .iter()
            .chain(order[..=idx].iter())
            .cloned()
            .collect(),
        None => order.to_vec(),
    }
}

/// Cyclic successor of `current`. Falls back to the first seat when
/// `current` isn't seated.
#[must_use]
pub fn next_seat(order: &[PlayerId], current: &PlayerId) -> Option<PlayerId> {
    match order.iter().position(|id| id == current) {
        Some(idx) => order.get((idx + 1) % order.len()).cloned(),
        None => order.first().cloned(),
    }
}

/// Dealer for the next round.
#[must_use]
pub fn next_dealer(order: &[PlayerId], dealer: Option<&PlayerId>) -> Option<PlayerId> {
    match dealer {
        Some(d) => next_seat(order, d),
        None => order.first().cloned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<PlayerId> {
        names.iter().map(|n| PlayerId::new(n)).collect()
    }

    #[test]
    fn test_rotation_starts_after_dealer() {
        let order = ids(&["a", "b", "c", "d"]);
        assert_eq!(rotation(&order, Some(&order[0])), ids(&["b", "c", "d", "a"]));
        assert_eq!(rotation(&order, Some(&order[2])), ids(&["d", "a", "b", "c"]));
        assert_eq!(rotation(&order, Some(&order[3])), order);
    }

    #[test]
    fn test_rotation_without_seated_dealer() {
        let order = ids(&["a", "b", "c", "d"]);
        assert_eq!(rotation(&order, Some(&PlayerId::new("zz"))), order);
        assert_eq!(rotation(&order, None), order);
    }

    #[test]
    fn test_next_dealer_wraps() {
        let order = ids(&["a", "b", "c", "d"]);
        assert_eq!(next_dealer(&order, Some(&order[3])), Some(order[0].clone()));
        assert_eq!(next_dealer(&order, Some(&order[1])), Some(order[2].clone()));
        assert_eq!(next_dealer(&[], None), None);
    }

    #[test]
    fn test_next_seat_unknown_player() {
        let order = ids(&["a", "b"]);
        assert_eq!(next_seat(&order, &PlayerId::new("x")), Some(order[0].clone()));
    }
}
