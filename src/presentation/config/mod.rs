mod environment;
mod settings;

pub use environment::Environment;
pub use settings::{
    AuthSettings, DatabaseSettings, ImageProviderSettings, LoggingSettings, QueueSettings,
    ServerSettings, Settings,
};
