use uuid::Uuid;

/// Mint a new object id. Ids are random v4 UUIDs so pasted objects never collide
/// with the ids of the objects they were copied from.
pub fn generate_id() -> String {
    Uuid::new_v4().to_string()
}
