use anyhow::Result;
use soe_survey::{logger, App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    logger::init(config.verbose_logging);

    let app = App::initialize(config)?;

    match std::env::args().nth(1).as_deref() {
        Some("review") => app.review()?,
        _ => {
            app.run().await?;
        }
    }

    Ok(())
}
