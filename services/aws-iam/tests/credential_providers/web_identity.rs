use super::{create_test_context, is_enabled};
use iamcred_aws::{Config, CredentialSource, IamCredentialProvider};
use log::info;

#[tokio::test]
async fn test_web_identity_credential_provider() {
    if !is_enabled("IAMCRED_TEST_WEB_IDENTITY") {
        info!("IAMCRED_TEST_WEB_IDENTITY not set, skipping");
        return;
    }

    let ctx = create_test_context();
    let source = Config::default().from_env(&ctx).source();
    assert!(
        matches!(source, CredentialSource::WebIdentity { .. }),
        "AWS_WEB_IDENTITY_TOKEN_FILE should select web identity, got {source}"
    );

    let (cred, expiry) = IamCredentialProvider::default()
        .resolve(&ctx)
        .await
        .expect("web identity exchange should succeed");

    assert!(!cred.access_key_id.is_empty());
    assert!(!cred.secret_access_key.is_empty());
    assert!(cred.session_token.is_some());
    assert!(expiry.expires_at().is_some());
}

#[tokio::test]
async fn test_web_identity_with_custom_sts_endpoint() {
    if !is_enabled("IAMCRED_TEST_WEB_IDENTITY") {
        info!("IAMCRED_TEST_WEB_IDENTITY not set, skipping");
        return;
    }
    let Ok(endpoint) = std::env::var("IAMCRED_TEST_STS_ENDPOINT") else {
        info!("IAMCRED_TEST_STS_ENDPOINT not set, skipping");
        return;
    };

    let ctx = create_test_context();
    let (cred, _) = IamCredentialProvider::new(endpoint)
        .resolve(&ctx)
        .await
        .expect("web identity exchange against custom endpoint should succeed");
    assert!(!cred.access_key_id.is_empty());
}
