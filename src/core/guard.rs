//! Guard predicates for controlling state transitions.
//!
//! Guards are pure boolean functions over the subject object that
//! determine whether a transition can execute. They enable declarative
//! transition rules without side effects.

use std::sync::Arc;

/// Pure predicate that determines if a transition can execute.
///
/// Guards are evaluated before attempting a transition, and again by
/// the introspection queries (`allowed_transitions`,
/// `can_transition_to`). They must be idempotent: a guard may run
/// several times for a single logical question.
///
/// # Example
///
/// ```rust
/// use machina::core::Guard;
///
/// struct Order {
///     in_stock: bool,
/// }
///
/// let stocked = Guard::new(|order: &Order| order.in_stock);
///
/// assert!(stocked.check(&Order { in_stock: true }));
/// assert!(!stocked.check(&Order { in_stock: false }));
/// ```
pub struct Guard<Subj> {
    predicate: Arc<dyn Fn(&Subj) -> bool + Send + Sync>,
}

impl<Subj> Guard<Subj> {
    /// Create a guard from a pure predicate function.
    ///
    /// The predicate must be pure (deterministic, no externally
    /// visible side effects) and thread-safe (Send + Sync).
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&Subj) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
        }
    }

    /// Check if the guard allows a transition for this subject.
    ///
    /// This is a pure function that evaluates the predicate without
    /// any side effects.
    pub fn check(&self, subject: &Subj) -> bool {
        (self.predicate)(subject)
    }
}

impl<Subj> Clone for Guard<Subj> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Order {
        in_stock: bool,
        total: f64,
    }

    #[test]
    fn guard_allows_matching_subjects() {
        let guard = Guard::new(|order: &Order| order.in_stock);

        assert!(guard.check(&Order {
            in_stock: true,
            total: 10.0
        }));
        assert!(!guard.check(&Order {
            in_stock: false,
            total: 10.0
        }));
    }

    #[test]
    fn guard_is_deterministic() {
        let order = Order {
            in_stock: true,
            total: 25.0,
        };
        let guard = Guard::new(|o: &Order| o.total > 0.0);

        let result1 = guard.check(&order);
        let result2 = guard.check(&order);

        assert_eq!(result1, result2);
    }

    #[test]
    fn guard_can_use_complex_predicates() {
        let guard = Guard::new(|o: &Order| o.in_stock && o.total > 0.0);

        assert!(guard.check(&Order {
            in_stock: true,
            total: 1.0
        }));
        assert!(!guard.check(&Order {
            in_stock: true,
            total: 0.0
        }));
        assert!(!guard.check(&Order {
            in_stock: false,
            total: 1.0
        }));
    }

    #[test]
    fn guard_clones_share_the_predicate() {
        let guard = Guard::new(|o: &Order| o.in_stock);
        let cloned = guard.clone();

        let order = Order {
            in_stock: true,
            total: 5.0,
        };
        assert_eq!(guard.check(&order), cloned.check(&order));
    }
}
