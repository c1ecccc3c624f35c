// handlers/mod.rs - two-tier handler layout
//
// Public (no session required) → Protected (session or admin gate applied by the router)
pub mod public;
pub mod protected;
