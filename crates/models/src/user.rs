//! Users: account holders who own places and write reviews.

entity_kind! {
    /// A registered user.
    User {
        email: String,
        password: String,
        first_name: String,
        last_name: String,
    }
}
