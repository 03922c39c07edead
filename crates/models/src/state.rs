//! States: top-level geographic grouping of cities.

entity_kind! {
    /// A state.
    State {
        name: String,
    }
}
