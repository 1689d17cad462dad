mod app;
mod commands;
mod effects;
mod logging;
mod persistence;
mod render;

fn main() -> anyhow::Result<()> {
    app::run_app(app::AppConfig::default())
}
