//! Amenities offered by places.

entity_kind! {
    /// An amenity (e.g. "Wifi").
    Amenity {
        name: String,
    }
}
