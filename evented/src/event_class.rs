use std::{any::TypeId, fmt};

/// Runtime descriptor of the Rust type an [`EventType`](crate::EventType)
/// dispatches.
///
/// Statically, an event can only be bound to an `EventType` of its own type.
/// `EventClass` exposes the same relation at runtime for code that handles
/// event types through erased or generic paths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventClass {
    id: TypeId,
    name: &'static str,
}

impl EventClass {
    pub fn of<T: 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: std::any::type_name::<T>(),
        }
    }

    /// Returns true when instances of `T` may be bound to this class.
    pub fn accepts<T: 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    #[inline]
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Full type name, including the module path.
    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for EventClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}
