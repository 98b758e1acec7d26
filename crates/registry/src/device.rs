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

//! Virtual device state

use std::sync::Arc;
use tracing::debug;
use vdisplay_core::{
    DeviceId, DeviceSnapshot, DisplayDescriptor, DisplayError, DisplayMode, DisplayResult,
    DisplaySettings, LifecycleState, ModeCatalog, TerminationHandler,
};

/// One active virtual display
///
/// Owned exclusively by the registry behind a per-device lock; callers only
/// ever observe it through [`DeviceSnapshot`] copies. The registry's record
/// is the single source of truth for the device's existence.
pub struct VirtualDevice {
    id: DeviceId,
    descriptor: Arc<DisplayDescriptor>,
    catalog: ModeCatalog,
    current_settings: Option<DisplaySettings>,
    state: LifecycleState,
    created_at: chrono::DateTime<chrono::Utc>,
    // Taken exactly once, under the device lock, when termination begins.
    termination_handler: Option<TerminationHandler>,
}

impl std::fmt::Debug for VirtualDevice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VirtualDevice")
            .field("id", &self.id)
            .field("descriptor", &self.descriptor)
            .field("catalog", &self.catalog)
            .field("current_settings", &self.current_settings)
            .field("state", &self.state)
            .field("created_at", &self.created_at)
            .field(
                "termination_handler",
                &self.termination_handler.as_ref().map(|_| "<handler>"),
            )
            .finish()
    }
}

impl VirtualDevice {
    /// Create a device in `Pending` with an empty catalog
    pub(crate) fn new(id: DeviceId, descriptor: DisplayDescriptor) -> Self {
        let catalog = ModeCatalog::new(descriptor.max_width(), descriptor.max_height());
        let termination_handler = descriptor.termination_handler().cloned();
        VirtualDevice {
            id,
            descriptor: Arc::new(descriptor),
            catalog,
            current_settings: None,
            state: LifecycleState::Pending,
            created_at: chrono::Utc::now(),
            termination_handler,
        }
    }

    pub fn id(&self) -> DeviceId {
        self.id
    }

    pub fn state(&self) -> LifecycleState {
        self.state
    }

    pub fn descriptor(&self) -> &DisplayDescriptor {
        &self.descriptor
    }

    pub fn catalog(&self) -> &ModeCatalog {
        &self.catalog
    }

    pub fn current_settings(&self) -> Option<&DisplaySettings> {
        self.current_settings.as_ref()
    }

    /// Append a mode to the device's catalog
    ///
    /// Rejected once the device is terminating or terminated.
    pub(crate) fn register_mode(&mut self, mode: DisplayMode) -> DisplayResult<()> {
        if !self.state.is_live() {
            return Err(DisplayError::UnknownDevice(self.id));
        }
        self.catalog.add(mode)?;
        debug!("{}: registered mode {}", self.id, mode);
        Ok(())
    }

    /// Commit negotiated settings; `Pending` devices become `Active`
    ///
    /// Only called by the negotiator after every check has passed.
    pub(crate) fn install_settings(&mut self, settings: DisplaySettings) {
        self.current_settings = Some(settings);
        if self.state == LifecycleState::Pending {
            self.state = LifecycleState::Active;
            debug!("{}: activated", self.id);
        }
    }

    /// Move a live device to `Terminating`, surrendering its handler
    ///
    /// Returns `None` if the device is already terminating or terminated,
    /// which is how a concurrent terminate race resolves to exactly one
    /// handler invocation.
    pub(crate) fn begin_termination(&mut self) -> Option<Option<TerminationHandler>> {
        if !self.state.is_live() {
            return None;
        }
        self.state = LifecycleState::Terminating;
        Some(self.termination_handler.take())
    }

    /// Final transition; nothing is reachable past this state
    pub(crate) fn finish_termination(&mut self) {
        self.state = LifecycleState::Terminated;
    }

    /// Point-in-time copy of the device's observable state
    pub fn snapshot(&self) -> DeviceSnapshot {
        DeviceSnapshot {
            id: self.id,
            state: self.state,
            descriptor: (*self.descriptor).clone(),
            current_settings: self.current_settings.clone(),
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn descriptor() -> DisplayDescriptor {
        DisplayDescriptor::builder()
            .name("Test Display")
            .max_pixels(3840, 2160)
            .build()
            .unwrap()
    }

    fn fhd() -> DisplayMode {
        DisplayMode::new(1920, 1080, 60.0).unwrap()
    }

    #[test]
    fn new_device_is_pending_and_empty() {
        let device = VirtualDevice::new(DeviceId(1), descriptor());
        assert_eq!(device.state(), LifecycleState::Pending);
        assert!(device.catalog().is_empty());
        assert!(device.current_settings().is_none());
    }

    #[test]
    fn install_settings_activates_pending_device() {
        let mut device = VirtualDevice::new(DeviceId(1), descriptor());
        device.register_mode(fhd()).unwrap();
        let settings = DisplaySettings::new(vec![fhd()], 1).unwrap();

        device.install_settings(settings.clone());
        assert_eq!(device.state(), LifecycleState::Active);
        assert_eq!(device.current_settings(), Some(&settings));

        // A second install keeps the device Active.
        device.install_settings(settings);
        assert_eq!(device.state(), LifecycleState::Active);
    }

    #[test]
    fn begin_termination_yields_handler_once() {
        let descriptor = DisplayDescriptor::builder()
            .name("Test Display")
            .max_pixels(1920, 1080)
            .on_termination(|_| {})
            .build()
            .unwrap();
        let mut device = VirtualDevice::new(DeviceId(1), descriptor);

        let first = device.begin_termination();
        assert!(matches!(first, Some(Some(_))));
        assert_eq!(device.state(), LifecycleState::Terminating);

        // The loser of a terminate race sees no transition at all.
        assert!(device.begin_termination().is_none());

        device.finish_termination();
        assert_eq!(device.state(), LifecycleState::Terminated);
        assert!(device.begin_termination().is_none());
    }

    #[test]
    fn register_mode_rejected_after_termination_begins() {
        let mut device = VirtualDevice::new(DeviceId(3), descriptor());
        device.begin_termination();
        assert!(matches!(
            device.register_mode(fhd()),
            Err(DisplayError::UnknownDevice(DeviceId(3)))
        ));
    }

    #[test]
    fn snapshot_reflects_current_state() {
        let mut device = VirtualDevice::new(DeviceId(9), descriptor());
        device.register_mode(fhd()).unwrap();
        let settings = DisplaySettings::new(vec![fhd()], 2).unwrap();
        device.install_settings(settings.clone());

        let snapshot = device.snapshot();
        assert_eq!(snapshot.id, DeviceId(9));
        assert_eq!(snapshot.state, LifecycleState::Active);
        assert_eq!(snapshot.current_settings, Some(settings));
        assert_eq!(snapshot.descriptor.name(), "Test Display");
    }
}
