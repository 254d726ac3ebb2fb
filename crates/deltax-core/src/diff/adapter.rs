//! Capability contract for diffable entity types.

/// The four operations a caller supplies to make an entity type diffable.
///
/// `T` is the entity type, `P` its property type, and `ID` the key type
/// identifying entities (and, scoped to one entity, properties). Adapters
/// are stateless projections; the engine never mutates entities or
/// properties through them.
pub trait DiffAdapter<T, P, ID> {
    /// Extract an entity's key.
    fn entity_id(&self, entity: &T) -> ID;

    /// Extract a property's key.
    fn property_id(&self, property: &P) -> ID;

    /// List an entity's properties.
    fn properties(&self, entity: &T) -> Vec<P>;

    /// Fetch a named property from an entity.
    ///
    /// The default implementation scans [`DiffAdapter::properties`]; adapters
    /// with keyed storage should override it.
    fn property(&self, entity: &T, id: &ID) -> Option<P>
    where
        ID: PartialEq,
    {
        self.properties(entity)
            .into_iter()
            .find(|p| &self.property_id(p) == id)
    }
}
