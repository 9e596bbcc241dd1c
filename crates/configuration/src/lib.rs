use crate::settings::LayeredSettings;
use std::path::PathBuf;

// Declare the modules that make up this crate.
pub mod binding;
pub mod error;
pub mod logging;
pub mod settings;

// Re-export the core types to provide a clean public API.
pub use error::ConfigError;
pub use logging::init_tracing;
pub use settings::{GatewaySettings, HanaBinding, LogSettings, ServerSettings, Settings};

/// Prefix for environment overrides, e.g. `BOOKSTORE__SERVER__PORT=8080`.
pub const ENV_PREFIX: &str = "BOOKSTORE";

/// Command-line overrides applied on top of file and environment settings.
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "clap", derive(clap::Args))]
pub struct Overrides {
    /// Path to a configuration file (defaults to `config.toml` when present).
    #[cfg_attr(feature = "clap", arg(long))]
    pub config: Option<PathBuf>,
    /// Address the HTTP server binds to.
    #[cfg_attr(feature = "clap", arg(long))]
    pub host: Option<String>,
    /// Port the HTTP server listens on.
    #[cfg_attr(feature = "clap", arg(long, short))]
    pub port: Option<u16>,
}

/// Loads the application configuration and resolves the `hana` binding.
///
/// This is called once at startup. Sources, lowest precedence first: the
/// configuration file, `BOOKSTORE__*` environment variables, then `overrides`.
/// The binding itself comes from [`binding::resolve`].
pub fn load_config(overrides: &Overrides) -> Result<Settings, ConfigError> {
    dotenvy::dotenv().ok();

    let file = match &overrides.config {
        Some(path) => config::File::from(path.as_path()).required(true),
        None => config::File::with_name("config").required(false),
    };

    let builder = config::Config::builder()
        .add_source(file)
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("__")
                .separator("__"),
        )
        .set_override_option("server.host", overrides.host.clone())?
        .set_override_option("server.port", overrides.port.map(i64::from))?
        .build()?;

    let layered = builder.try_deserialize::<LayeredSettings>()?;
    let hana = binding::resolve(
        std::env::var(binding::VCAP_SERVICES_ENV).ok(),
        std::env::var_os(binding::SERVICE_BINDING_ROOT_ENV).map(PathBuf::from),
        layered.hana,
    )?;
    hana.validate()?;

    Ok(Settings {
        server: layered.server,
        gateway: layered.gateway,
        log: layered.log,
        hana,
    })
}
