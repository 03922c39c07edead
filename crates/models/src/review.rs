//! Reviews left by users on places.

entity_kind! {
    /// A review.
    Review {
        place_id: String,
        user_id: String,
        text: String,
    }
}
