//! Macros for ergonomic event declaration.

/// Declare a typed namespace of event ids.
///
/// Generates a `#[repr(u16)]` enum with explicit discriminants, a `const fn
/// id()`, and a `From` impl into [`EventId`](crate::core::EventId), so the
/// enum variants can be passed straight to
/// [`Machine::enqueue`](crate::Machine::enqueue) and
/// [`MachineBuilder::transition`](crate::MachineBuilder::transition).
///
/// # Example
///
/// ```
/// use smengine::event_enum;
///
/// event_enum! {
///     pub enum RemoteEvent {
///         Move = 0,
///         KeyDown = 1,
///         KeyUp = 2,
///         BlinkDone = 3,
///     }
/// }
///
/// assert_eq!(RemoteEvent::KeyDown.id(), 1);
/// let id: smengine::EventId = RemoteEvent::Move.into();
/// assert_eq!(id, 0);
/// ```
#[macro_export]
macro_rules! event_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident = $value:expr
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[repr(u16)]
        #[derive(Clone, Copy, PartialEq, Eq, Debug)]
        $vis enum $name {
            $(
                $(#[$variant_meta])*
                $variant = $value
            ),*
        }

        impl $name {
            /// The raw event id for this variant.
            $vis const fn id(self) -> $crate::core::EventId {
                self as $crate::core::EventId
            }
        }

        impl From<$name> for $crate::core::EventId {
            fn from(value: $name) -> Self {
                value as $crate::core::EventId
            }
        }
    };
}

#[cfg(test)]
mod tests {
    event_enum! {
        enum TestEvent {
            Move = 0,
            KeyDown = 1,
            Timer = 7,
        }
    }

    #[test]
    fn event_enum_maps_to_ids() {
        assert_eq!(TestEvent::Move.id(), 0);
        assert_eq!(TestEvent::KeyDown.id(), 1);
        assert_eq!(TestEvent::Timer.id(), 7);
    }

    #[test]
    fn event_enum_converts_into_event_id() {
        let id: crate::core::EventId = TestEvent::Timer.into();
        assert_eq!(id, 7);
    }

    #[test]
    fn event_enum_supports_visibility() {
        event_enum! {
            pub enum PublicEvent {
                A = 0,
                B = 1,
            }
        }

        assert_eq!(PublicEvent::B.id(), 1);
    }
}
