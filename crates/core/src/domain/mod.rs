pub mod entities;
pub mod intent;
pub mod request;
