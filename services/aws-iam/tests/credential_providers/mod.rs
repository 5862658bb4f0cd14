mod ecs;
mod imds;
mod web_identity;

use iamcred_core::{Context, OsEnv};
use iamcred_file_read_tokio::TokioFileRead;
use iamcred_http_send_reqwest::ReqwestHttpSend;

pub fn create_test_context() -> Context {
    let _ = env_logger::builder().is_test(true).try_init();
    let _ = dotenv::dotenv();

    Context::new()
        .with_file_read(TokioFileRead)
        .with_http_send(ReqwestHttpSend::default())
        .with_env(OsEnv)
}

pub fn is_enabled(key: &str) -> bool {
    std::env::var(key).unwrap_or_default() == "on"
}
