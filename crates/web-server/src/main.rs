use configuration::{init_tracing, load_config, Overrides};

// This main function is the entry point when running `cargo run -p web-server`.
// It loads the settings once, installs tracing, and hands off to `run_server`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = load_config(&Overrides::default())?;
    let _guard = init_tracing(&settings.log)?;
    web_server::run_server(settings).await
}
