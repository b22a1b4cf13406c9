// Resume-grounded chat: request normalization, the upstream gateway, and
// its HTTP handlers. All upstream calls go through llm_client.

pub mod conversation;
pub mod gateway;
pub mod handlers;
pub mod prompts;

#[cfg(test)]
pub(crate) mod testing;
