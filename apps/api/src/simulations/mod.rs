// Wizard persistence: one current simulation per user, upserted on every save.

pub mod handlers;
