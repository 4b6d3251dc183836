pub mod error;
pub mod fetcher;

#[cfg(test)]
pub(crate) mod test_server;
