mod assume_role_with_web_identity;
pub use assume_role_with_web_identity::assume_role_with_web_identity;

mod ecs;
pub use ecs::fetch_container_credentials;
pub use ecs::fetch_pod_identity_credentials;

mod iam;
pub use iam::IamCredentialProvider;

mod imds;
pub use imds::fetch_imds_token;
pub use imds::fetch_instance_profile_credentials;
pub use imds::parse_role_names;

mod utils;
pub use utils::sts_endpoint;
