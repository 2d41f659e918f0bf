pub mod advisor;
pub mod care;
pub mod doctors;
pub mod intake;
pub mod journey;
pub mod pathways;
pub mod response;
pub mod timeline;

#[cfg(test)]
pub(crate) mod test_support;
