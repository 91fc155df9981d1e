pub mod collection;
pub mod record;

pub use collection::{CollectionAck, CollectionRef};
pub use record::{Document, Record};
