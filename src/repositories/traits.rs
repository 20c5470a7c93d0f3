//! CRUD di base condiviso dai repository
//!
//! Le query specifiche (per username, per chat, filtri) restano metodi inerenti
//! di ciascun repository.

/// Insert; the returned row carries the id chosen by the repository.
pub trait Create<Entity, CreateDTO> {
    async fn create(&self, data: &CreateDTO) -> Result<Entity, sqlx::Error>;
}

/// Lookup by primary key, `Ok(None)` when the row is missing.
pub trait Read<Entity, Id> {
    async fn read(&self, id: &Id) -> Result<Option<Entity>, sqlx::Error>;
}

/// Partial update: solo i campi `Some(_)` del DTO vengono scritti.
/// Un id inesistente dà `sqlx::Error::RowNotFound`.
pub trait Update<Entity, UpdateDTO, Id> {
    async fn update(&self, id: &Id, data: &UpdateDTO) -> Result<Entity, sqlx::Error>;
}

/// Hard delete. `Ok(false)` if no row matched.
pub trait Delete<Id> {
    async fn delete(&self, id: &Id) -> Result<bool, sqlx::Error>;
}
