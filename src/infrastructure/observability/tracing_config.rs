#[derive(Debug, Clone)]
pub struct TracingConfig {
    /// Default filter directive when RUST_LOG is unset.
    pub level: String,
    pub json_format: bool,
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}
