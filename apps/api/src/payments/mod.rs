// Plan lookup. Checkout and webhooks belong to the payment provider.

pub mod handlers;
