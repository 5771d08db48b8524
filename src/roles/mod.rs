pub(crate) mod command;
pub(crate) mod discord;
pub(crate) mod error;
pub(crate) mod record;
pub(crate) mod restore;
pub(crate) mod snapshot;
pub(crate) mod store;

#[cfg(test)]
pub(crate) mod testing;
