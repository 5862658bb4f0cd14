// Licensed to the Apache Software Foundation (ASF) under one
// or more contributor license agreements.  See the NOTICE file
// distributed with this work for additional information
// regarding copyright ownership.  The ASF licenses this file
// to you under the Apache License, Version 2.0 (the
// "License"); you may not use this file except in compliance
// with the License.  You may obtain a copy of the License at
//
//   http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing,
// software distributed under the License is distributed on an
// "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY
// KIND, either express or implied.  See the License for the
// specific language governing permissions and limitations
// under the License.

use std::time::Duration;

// Env values that take part in source selection.
pub const AWS_CONTAINER_AUTHORIZATION_TOKEN: &str = "AWS_CONTAINER_AUTHORIZATION_TOKEN";
pub const AWS_CONTAINER_AUTHORIZATION_TOKEN_FILE: &str = "AWS_CONTAINER_AUTHORIZATION_TOKEN_FILE";
pub const AWS_CONTAINER_CREDENTIALS_RELATIVE_URI: &str = "AWS_CONTAINER_CREDENTIALS_RELATIVE_URI";
pub const AWS_CONTAINER_CREDENTIALS_FULL_URI: &str = "AWS_CONTAINER_CREDENTIALS_FULL_URI";
pub const AWS_WEB_IDENTITY_TOKEN_FILE: &str = "AWS_WEB_IDENTITY_TOKEN_FILE";
pub const AWS_ROLE_ARN: &str = "AWS_ROLE_ARN";
pub const AWS_ROLE_SESSION_NAME: &str = "AWS_ROLE_SESSION_NAME";
pub const AWS_REGION: &str = "AWS_REGION";

// Default endpoints.
pub const DEFAULT_IAM_ROLE_ENDPOINT: &str = "http://169.254.169.254";
pub const DEFAULT_ECS_ROLE_ENDPOINT: &str = "http://169.254.170.2";
pub const DEFAULT_STS_ROLE_ENDPOINT: &str = "https://sts.amazonaws.com";

// Instance metadata service.
pub const IMDS_TOKEN_PATH: &str = "/latest/api/token";
pub const IMDS_SECURITY_CREDENTIALS_PATH: &str = "/latest/meta-data/iam/security-credentials/";
pub const X_AWS_EC2_METADATA_TOKEN: &str = "x-aws-ec2-metadata-token";
pub const X_AWS_EC2_METADATA_TOKEN_TTL_SECONDS: &str = "x-aws-ec2-metadata-token-ttl-seconds";
/// 21600s (6h) is recommended by AWS.
pub const IMDS_TOKEN_TTL: &str = "21600";
/// Hosts without IMDSv2 never answer the token request, so keep this short.
pub const IMDS_TOKEN_TIMEOUT: Duration = Duration::from_secs(1);
pub const IMDS_CODE_SUCCESS: &str = "Success";

// STS.
pub const STS_API_VERSION: &str = "2011-06-15";
pub const DEFAULT_ROLE_SESSION_NAME: &str = "iamcred";
