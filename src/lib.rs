pub mod record;
pub mod document;
pub mod sink;
pub mod handler;
pub mod mongo;
pub mod layer;

pub mod init;
pub mod noop_sink;

#[cfg(test)]
pub(crate) mod testutil;
