//! Places: the rentable listings, with numeric and list-valued attributes.

entity_kind! {
    /// A place to stay.
    Place {
        city_id: String,
        user_id: String,
        name: String,
        description: String,
        number_rooms: i64,
        number_bathrooms: i64,
        max_guest: i64,
        price_by_night: i64,
        latitude: f64,
        longitude: f64,
        amenity_ids: Vec<String>,
    }
}
