//! Cities, each belonging to a state.

entity_kind! {
    /// A city.
    City {
        state_id: String,
        name: String,
    }
}
