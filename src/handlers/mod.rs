// Two-tier handler layout: public endpoints acquire tokens, protected
// endpoints require the auth middleware to have resolved an owner first.
pub mod protected;
pub mod public;
