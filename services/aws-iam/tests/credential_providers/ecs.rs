use super::{create_test_context, is_enabled};
use iamcred_aws::{CredentialSource, IamCredentialProvider, Config};
use log::info;

#[tokio::test]
async fn test_container_credential_provider() {
    if !is_enabled("IAMCRED_TEST_ECS") {
        info!("IAMCRED_TEST_ECS not set, skipping");
        return;
    }

    let ctx = create_test_context();
    let source = Config::default().from_env(&ctx).source();
    assert!(
        matches!(
            source,
            CredentialSource::ContainerRelativeUri { .. }
                | CredentialSource::PodIdentity { .. }
                | CredentialSource::ContainerFullUri { .. }
        ),
        "container environment should select a container source, got {source}"
    );

    let (cred, _) = IamCredentialProvider::default()
        .resolve(&ctx)
        .await
        .expect("IamCredentialProvider should succeed in a container");

    assert!(!cred.access_key_id.is_empty());
    assert!(!cred.secret_access_key.is_empty());
    assert!(cred.expires_in.is_some());
}
