use super::{create_test_context, is_enabled};
use iamcred_aws::{fetch_imds_token, IamCredentialProvider, SignerType};
use iamcred_aws::constants::DEFAULT_IAM_ROLE_ENDPOINT;
use iamcred_core::CredentialCache;
use log::info;

#[tokio::test]
async fn test_instance_profile_credential_provider() {
    if !is_enabled("IAMCRED_TEST_IMDS") {
        info!("IAMCRED_TEST_IMDS not set, skipping");
        return;
    }

    let ctx = create_test_context();
    let (cred, expiry) = IamCredentialProvider::default()
        .resolve(&ctx)
        .await
        .expect("IamCredentialProvider should succeed on EC2");

    assert!(!cred.access_key_id.is_empty());
    assert!(!cred.secret_access_key.is_empty());
    assert!(
        cred.session_token.is_some(),
        "IMDS should return session token"
    );
    assert_eq!(cred.signer_type, SignerType::V4);
    assert!(!expiry.is_expired());
}

#[tokio::test]
async fn test_imds_token() {
    if !is_enabled("IAMCRED_TEST_IMDS") {
        info!("IAMCRED_TEST_IMDS not set, skipping");
        return;
    }

    let ctx = create_test_context();
    let token = fetch_imds_token(&ctx, DEFAULT_IAM_ROLE_ENDPOINT)
        .await
        .expect("IMDSv2 token should be available on EC2");
    assert!(!token.is_empty());
}

#[tokio::test]
async fn test_instance_profile_with_cache() {
    if !is_enabled("IAMCRED_TEST_IMDS") {
        info!("IAMCRED_TEST_IMDS not set, skipping");
        return;
    }

    let cache = CredentialCache::new(create_test_context(), IamCredentialProvider::default());
    let first = cache.get().await.expect("first fetch should succeed");
    let second = cache.get().await.expect("cached fetch should succeed");
    assert_eq!(first.access_key_id, second.access_key_id);
    assert!(!cache.is_expired());
}
