pub mod deserialiser;
pub mod error;
pub mod messages;
pub mod result;
