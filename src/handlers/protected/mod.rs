// Protected handlers (auth middleware resolves the owner before these run)
pub mod todos;
pub mod users;
