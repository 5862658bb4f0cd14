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

use crate::time::{now, DateTime};
use chrono::TimeDelta;
use std::time::Duration;

/// How long before the real expiration a credential should be refreshed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExpiryWindow {
    /// Refresh this long before the credential expires.
    ///
    /// `Fixed(Duration::ZERO)` refreshes only once the expiration has passed.
    Fixed(Duration),
    /// Refresh once 80% of the lifetime remaining at the time the expiration
    /// was recorded has elapsed.
    Dynamic,
}

/// The window used when no other window is configured.
///
/// Refreshing ahead of time keeps requests from failing with expired token
/// errors when a credential runs out while a request is in flight.
pub const DEFAULT_EXPIRY_WINDOW: ExpiryWindow = ExpiryWindow::Dynamic;

impl Default for ExpiryWindow {
    fn default() -> Self {
        DEFAULT_EXPIRY_WINDOW
    }
}

/// Expiry tracks when a resolved credential has to be fetched again.
///
/// A fresh `Expiry` has no expiration recorded and always reports expired.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Expiry {
    expires_at: Option<DateTime>,
    refresh_at: Option<DateTime>,
}

impl Expiry {
    /// Create an expiry for a credential expiring at `expires_at`.
    pub fn new(expires_at: DateTime, window: ExpiryWindow) -> Self {
        let mut expiry = Self::default();
        expiry.set_expiration(expires_at, window);
        expiry
    }

    /// Record a new expiration with the given refresh window.
    pub fn set_expiration(&mut self, expires_at: DateTime, window: ExpiryWindow) {
        self.set_expiration_at(expires_at, window, now())
    }

    /// Record a new expiration, computing a dynamic window relative to `now`.
    pub fn set_expiration_at(&mut self, expires_at: DateTime, window: ExpiryWindow, now: DateTime) {
        let cut = match window {
            ExpiryWindow::Fixed(d) => TimeDelta::from_std(d).unwrap_or(TimeDelta::MAX),
            ExpiryWindow::Dynamic => ((expires_at - now) / 5).max(TimeDelta::zero()),
        };

        self.expires_at = Some(expires_at);
        self.refresh_at = Some(
            expires_at
                .checked_sub_signed(cut)
                .unwrap_or(DateTime::MIN_UTC),
        );
    }

    /// The expiration reported by the credential source.
    pub fn expires_at(&self) -> Option<DateTime> {
        self.expires_at
    }

    /// The instant after which [`Expiry::is_expired`] starts reporting true.
    pub fn refresh_at(&self) -> Option<DateTime> {
        self.refresh_at
    }

    /// Whether the credential should be refreshed now.
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(now())
    }

    /// Whether the credential should be refreshed at `now`.
    pub fn is_expired_at(&self, now: DateTime) -> bool {
        match self.refresh_at {
            Some(refresh_at) => refresh_at < now,
            None => true,
        }
    }
}
