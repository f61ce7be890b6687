pub mod finalizer;
pub mod monitor;
pub mod naming;
pub mod recorder;
pub mod recording;

#[cfg(test)]
pub(crate) mod test_support;
