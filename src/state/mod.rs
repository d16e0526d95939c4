mod persistence;

pub use persistence::{
    KeyValueStore,
    MemoryStore,
    PersistenceError,
    PersistenceResult,
};
