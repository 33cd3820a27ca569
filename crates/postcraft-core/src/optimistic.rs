//! Local patch, pending confirmation, rollback on failure.
//!
//! `Optimistic<T>` keeps the last server-confirmed value next to the value
//! currently shown. A patch is applied to the shown value immediately and
//! returns a `PatchTicket`; the caller later confirms it with the server's
//! authoritative value or rolls it back. Only the most recent ticket may settle
//! the shown value, so a slow failure cannot undo a newer edit.

/// Handle for one optimistic patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PatchTicket(u64);

#[derive(Debug, Clone)]
pub struct Optimistic<T> {
    confirmed: T,
    current: T,
    pending: Option<PatchTicket>,
    next_ticket: u64,
}

impl<T: Clone> Optimistic<T> {
    pub fn new(value: T) -> Self {
        Self {
            confirmed: value.clone(),
            current: value,
            pending: None,
            next_ticket: 0,
        }
    }

    /// The value to display, including any pending patch.
    pub fn value(&self) -> &T {
        &self.current
    }

    pub fn confirmed(&self) -> &T {
        &self.confirmed
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Applies `patch` to the shown value and returns its ticket.
    pub fn apply(&mut self, patch: impl FnOnce(&mut T)) -> PatchTicket {
        self.next_ticket += 1;
        let ticket = PatchTicket(self.next_ticket);
        patch(&mut self.current);
        self.pending = Some(ticket);
        ticket
    }

    /// Settles `ticket` with the server's value.
    ///
    /// Returns `false` when a newer patch is pending; the confirmed value is
    /// still updated but the shown value keeps the newer patch.
    pub fn confirm(&mut self, ticket: PatchTicket, authoritative: T) -> bool {
        self.confirmed = authoritative;
        if self.pending != Some(ticket) {
            return false;
        }
        self.current = self.confirmed.clone();
        self.pending = None;
        true
    }

    /// Discards the patch behind `ticket`. No-op if it was superseded.
    pub fn rollback(&mut self, ticket: PatchTicket) -> bool {
        if self.pending != Some(ticket) {
            return false;
        }
        self.current = self.confirmed.clone();
        self.pending = None;
        true
    }

    /// Replaces both values wholesale and drops any pending patch.
    pub fn replace(&mut self, value: T) {
        self.confirmed = value.clone();
        self.current = value;
        self.pending = None;
    }
}

impl<T: Clone + Default> Default for Optimistic<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patch_is_visible_before_confirmation() {
        let mut list = Optimistic::new(vec![1, 2, 3]);
        let ticket = list.apply(|values| values[0] = 10);

        assert_eq!(list.value(), &vec![10, 2, 3]);
        assert_eq!(list.confirmed(), &vec![1, 2, 3]);
        assert!(list.is_pending());

        assert!(list.confirm(ticket, vec![10, 2, 3, 4]));
        assert_eq!(list.value(), &vec![10, 2, 3, 4]);
        assert!(!list.is_pending());
    }

    #[test]
    fn test_rollback_restores_confirmed_value() {
        let mut list = Optimistic::new(vec!["a".to_string()]);
        let ticket = list.apply(|values| values.push("b".to_string()));
        assert!(list.rollback(ticket));
        assert_eq!(list.value(), &vec!["a".to_string()]);
    }

    #[test]
    fn test_superseded_patch_cannot_roll_back_newer_one() {
        let mut value = Optimistic::new(0);
        let first = value.apply(|v| *v = 1);
        let second = value.apply(|v| *v = 2);

        assert!(!value.rollback(first));
        assert_eq!(*value.value(), 2);

        assert!(!value.confirm(first, 1));
        assert_eq!(*value.value(), 2);
        assert_eq!(*value.confirmed(), 1);

        assert!(value.rollback(second));
        assert_eq!(*value.value(), 1);
    }

    #[test]
    fn test_replace_drops_pending_patch() {
        let mut value = Optimistic::new(0);
        let ticket = value.apply(|v| *v = 5);
        value.replace(7);
        assert!(!value.rollback(ticket));
        assert_eq!(*value.value(), 7);
    }
}
