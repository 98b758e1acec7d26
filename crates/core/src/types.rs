// Copyright 2025 VDisplay Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Core types for VDisplay

use crate::descriptor::DisplayDescriptor;
use crate::settings::DisplaySettings;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Device identifier
///
/// Process-unique handle for a virtual display. Allocated from a monotonic
/// counter starting at 1: never zero, never reused, strictly increasing
/// across the life of the registry, including across terminated devices.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct DeviceId(pub u64);

impl fmt::Display for DeviceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "display-{}", self.0)
    }
}

/// Device lifecycle state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LifecycleState {
    /// Created, no settings applied yet
    Pending,
    /// At least one settings bundle committed
    Active,
    /// Removal requested, termination handler not yet finished
    Terminating,
    /// Terminal state, id retired
    Terminated,
}

impl LifecycleState {
    /// Whether the device still accepts settings and catalog changes
    pub fn is_live(&self) -> bool {
        matches!(self, LifecycleState::Pending | LifecycleState::Active)
    }
}

/// Execution context a termination handler is delivered on
///
/// The portable stand-in for a host-specific callback queue. `Inline` runs
/// the handler on the terminating caller's task before `terminate` returns.
/// `Task` hands it to the async runtime: delivery is still exactly-once, but
/// completion is only guaranteed once the registry's shutdown has been
/// awaited — a host that drops its runtime without shutting the registry
/// down can drop a still-queued handler with it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DeliveryContext {
    #[default]
    Inline,
    Task,
}

/// Caller-supplied callback invoked exactly once when a device is destroyed
///
/// Receives the device's final snapshot. The registry holds no internal lock
/// while the handler runs, so a handler that captured the registry may
/// re-enter it (for example to create a replacement device).
pub type TerminationHandler = Arc<dyn Fn(DeviceSnapshot) + Send + Sync>;

/// Point-in-time copy of a device's observable state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeviceSnapshot {
    pub id: DeviceId,
    pub state: LifecycleState,
    pub descriptor: DisplayDescriptor,
    pub current_settings: Option<DisplaySettings>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn device_id_display() {
        assert_eq!(DeviceId(7).to_string(), "display-7");
    }

    #[test]
    fn lifecycle_liveness() {
        assert!(LifecycleState::Pending.is_live());
        assert!(LifecycleState::Active.is_live());
        assert!(!LifecycleState::Terminating.is_live());
        assert!(!LifecycleState::Terminated.is_live());
    }
}
