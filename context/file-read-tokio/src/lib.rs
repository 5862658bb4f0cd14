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

//! Tokio-based file reading for iamcred.
//!
//! Credential sources such as pod identity and web identity hand out bearer
//! tokens as files mounted into the workload. `TokioFileRead` lets a
//! [`Context`](iamcred_core::Context) read them without blocking the runtime.
//!
//! ```no_run
//! use iamcred_core::{Context, OsEnv};
//! use iamcred_file_read_tokio::TokioFileRead;
//!
//! # async fn example() -> iamcred_core::Result<()> {
//! let ctx = Context::new()
//!     .with_file_read(TokioFileRead)
//!     .with_env(OsEnv);
//!
//! let token = ctx
//!     .file_read_as_string("/var/run/secrets/pods.eks.amazonaws.com/serviceaccount/eks-pod-identity-token")
//!     .await?;
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use iamcred_core::{Error, FileRead, Result};

/// Tokio-based implementation of the `FileRead` trait.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioFileRead;

#[async_trait]
impl FileRead for TokioFileRead {
    async fn file_read(&self, path: &str) -> Result<Vec<u8>> {
        tokio::fs::read(path).await.map_err(|e| {
            Error::unexpected("failed to read file")
                .with_source(e)
                .with_context(format!("file: {path}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use iamcred_core::Context;
    use std::io::Write;

    #[tokio::test]
    async fn test_read_token_file() -> Result<()> {
        let mut f = tempfile::NamedTempFile::new()?;
        f.write_all(b"pod-identity-token")?;

        let ctx = Context::new().with_file_read(TokioFileRead);
        let path = f.path().to_string_lossy().to_string();
        assert_eq!(ctx.file_read_as_string(&path).await?, "pod-identity-token");
        Ok(())
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let ctx = Context::new().with_file_read(TokioFileRead);

        let err = ctx
            .file_read("/definitely/not/a/token")
            .await
            .expect_err("missing file must fail");
        assert!(err.to_string().contains("/definitely/not/a/token"));
    }
}
