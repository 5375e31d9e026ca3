// Two security tiers: public token acquisition, then guarded session
// management.
pub mod protected;
pub mod public;
