//! Registry of custom boundary handlers.

use crate::error::BoundaryError;
use crate::handler::BoundaryHandler;
use indexmap::IndexMap;
use rankhop_grid::NeighborCode;

/// Ordered, name-unique collection of boundary handlers.
///
/// Handler `h` is the `h`-th registered and is reached through neighbor
/// code `-(h + 3)`. The table is read-only during an exchange.
#[derive(Default)]
pub struct HandlerTable {
    handlers: IndexMap<String, Box<dyn BoundaryHandler>>,
}

impl HandlerTable {
    /// Empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a handler and return the neighbor code that routes to it.
    pub fn register<H: BoundaryHandler>(&mut self, handler: H) -> Result<i64, BoundaryError> {
        let name = handler.name().to_string();
        if self.handlers.contains_key(&name) {
            return Err(BoundaryError::DuplicateName { name });
        }
        let index = self.handlers.len();
        let code = NeighborCode::Custom(index).encode();
        tracing::debug!(handler = %name, index, code, "registered boundary handler");
        self.handlers.insert(name, Box::new(handler));
        Ok(code)
    }

    /// Handler at `index`.
    pub fn get(&self, index: usize) -> Option<&dyn BoundaryHandler> {
        self.handlers.get_index(index).map(|(_, h)| h.as_ref())
    }

    /// Neighbor code of the handler named `name`.
    pub fn code_of(&self, name: &str) -> Option<i64> {
        self.handlers
            .get_index_of(name)
            .map(|i| NeighborCode::Custom(i).encode())
    }

    /// Number of registered handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// `true` if no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Handler names in index order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handlers.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for HandlerTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Absorber, SpecularReflector};

    #[test]
    fn codes_follow_registration_order() {
        let mut t = HandlerTable::new();
        assert_eq!(t.register(Absorber::new()).unwrap(), -3);
        assert_eq!(t.register(SpecularReflector).unwrap(), -4);
        assert_eq!(t.len(), 2);
        assert_eq!(t.get(1).unwrap().name(), "specular_reflector");
        assert_eq!(t.code_of("absorber"), Some(-3));
        assert_eq!(t.code_of("missing"), None);
        assert!(t.get(2).is_none());
    }

    #[test]
    fn duplicate_names_are_rejected() {
        let mut t = HandlerTable::new();
        t.register(Absorber::new()).unwrap();
        match t.register(Absorber::tallying(0)) {
            Err(BoundaryError::DuplicateName { name }) => assert_eq!(name, "absorber"),
            other => panic!("expected DuplicateName, got {other:?}"),
        }
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn registered_code_decodes_to_index() {
        let mut t = HandlerTable::new();
        t.register(Absorber::new()).unwrap();
        let code = t.register(SpecularReflector).unwrap();
        assert_eq!(NeighborCode::decode(code), NeighborCode::Custom(1));
    }
}
