pub mod spool;
pub mod types;
pub mod validation;

#[cfg(test)]
pub mod test_helpers;
