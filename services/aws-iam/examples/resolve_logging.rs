//! Example showing which IAM source gets selected for the current environment

use iamcred_aws::{Config, IamCredentialProvider};
use iamcred_core::{Context, CredentialCache, OsEnv};
use iamcred_file_read_tokio::TokioFileRead;
use iamcred_http_send_reqwest::ReqwestHttpSend;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .init();

    let ctx = Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv);

    let config = Config::default().from_env(&ctx);
    println!("Selected source: {}\n", config.source());

    let cache = CredentialCache::new(ctx, IamCredentialProvider::default().with_config(config));
    match cache.get().await {
        Ok(cred) => println!("\nFound credential: {cred:?}"),
        Err(err) => println!("\nNo credential resolved: {err}"),
    }

    Ok(())
}
