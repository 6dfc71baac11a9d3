pub mod identifier;
pub mod slug;
