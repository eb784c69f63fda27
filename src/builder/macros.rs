//! Macros for ergonomic state declarations.

/// Generate a State trait implementation for simple enums.
///
/// # Example
///
/// ```
/// use machina::state_enum;
///
/// state_enum! {
///     pub enum OrderState {
///         Pending,
///         CheckingOut,
///         Cancelled,
///     }
/// }
/// ```
#[macro_export]
macro_rules! state_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, PartialEq, Eq, Hash, Debug, serde::Serialize, serde::Deserialize)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant
            ),*
        }

        impl $crate::core::State for $name {
            fn name(&self) -> &str {
                match self {
                    $(Self::$variant => stringify!($variant)),*
                }
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use crate::core::State;

    state_enum! {
        enum TestState {
            Pending,
            CheckingOut,
            Cancelled,
        }
    }

    #[test]
    fn state_enum_macro_generates_trait() {
        assert_eq!(TestState::Pending.name(), "Pending");
        assert_eq!(TestState::CheckingOut.name(), "CheckingOut");
        assert_eq!(TestState::Cancelled.name(), "Cancelled");
    }

    #[test]
    fn state_enum_supports_visibility() {
        // The macro should work with pub visibility
        state_enum! {
            pub enum PublicState {
                A,
                B,
            }
        }

        let state = PublicState::A;
        assert_eq!(state.name(), "A");
    }

    #[test]
    fn state_enum_derives_serde() {
        let state = TestState::Cancelled;
        let json = serde_json::to_string(&state).unwrap();
        let deserialized: TestState = serde_json::from_str(&json).unwrap();
        assert_eq!(state, deserialized);
    }
}
