//! Repositories module - Coordinatore per tutti i repository del progetto
//!
//! Questo modulo organizza i repository in sotto-moduli separati per una migliore manutenibilità.
//! Ogni repository gestisce le operazioni di database per una specifica entità.

// ************************* NOTA SU SQLX ************************* //

/*
   Le query usano sqlx::query_as::<_, T>() con #[derive(FromRow)] sulle entità,
   quindi la build non richiede un database raggiungibile (niente query! a compile time).
   Regole:
   - .execute()        -> INSERT/UPDATE/DELETE, restituisce rows_affected / last_insert_rowid
   - .fetch_optional() -> zero o una riga
   - .fetch_one()      -> esattamente una riga (aggregati come COUNT)
   - .fetch_all()      -> tutte le righe
   Le operazioni a più passi passano da pool.begin() e usano &mut *tx come executor:
   se il future viene droppato prima di commit() la transazione fa rollback.
*/

pub mod chat;
pub mod membership;
pub mod message;
pub mod traits;
pub mod user;

use sqlx::SqlitePool;

// alias di tipo per il pool, per semplificare lo switch in caso in cui vogliamo usare un altro db
pub type PoolType = SqlitePool;

// Re-esportazione dei trait per facilitare l'import
pub use traits::{Create, Delete, Read, Update};

// Re-esportazione delle struct dei repository per facilitare l'import
pub use chat::{ChatRepository, CreateChatOutcome};
pub use membership::MembershipRepository;
pub use message::MessageRepository;
pub use user::UserRepository;
