pub mod datetime;
pub mod env;
pub mod jsonrpc;
pub mod params;

#[cfg(test)]
pub mod test_utils;
