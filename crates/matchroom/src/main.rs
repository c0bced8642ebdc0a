use matchroom::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), MatchroomError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = ServerConfig::from_env()?;
    let builder = MatchroomServerBuilder::new().config(&config);

    match &config.session_url {
        Some(url) => {
            tracing::info!(%url, "using session backend");
            let sessions = WsSessionCreator::new(url.as_str(), config.session_timeout);
            serve(builder.session_creator(sessions)).await
        }
        None => {
            tracing::warn!("no session backend configured, joins will not create sessions");
            serve(builder).await
        }
    }
}

async fn serve<S: SessionCreator>(
    builder: MatchroomServerBuilder<S>,
) -> Result<(), MatchroomError> {
    builder.build().await?.run().await
}
