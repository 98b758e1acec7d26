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

//! Settings negotiation

use crate::device::VirtualDevice;
use tracing::debug;
use vdisplay_core::{DisplayError, DisplayResult, DisplaySettings};

/// Validates a proposed settings change before committing it
///
/// Every check runs before any write, so a rejected proposal leaves the
/// device bit-identical: partial application is never observable.
#[derive(Debug, Clone)]
pub struct SettingsNegotiator {
    /// Accepted HiDPI scales for devices whose descriptor declares none
    default_scales: Vec<u32>,
}

impl SettingsNegotiator {
    pub fn new(default_scales: Vec<u32>) -> Self {
        SettingsNegotiator { default_scales }
    }

    /// Validate `settings` against the device and commit on success
    ///
    /// Checks, in order: the device must still be live (`DeviceGone`
    /// otherwise); every proposed mode must be in the device's catalog
    /// (first miss reported in `ModeNotSupported`); the scale must be in the
    /// device's accepted set (`UnsupportedScale`). Catalog membership is
    /// checked against the catalog as it is now, not as it was when the
    /// settings were built.
    pub fn negotiate(
        &self,
        device: &mut VirtualDevice,
        settings: &DisplaySettings,
    ) -> DisplayResult<()> {
        if !device.state().is_live() {
            return Err(DisplayError::DeviceGone(device.id()));
        }

        for mode in settings.modes() {
            if !device.catalog().contains(mode) {
                return Err(DisplayError::ModeNotSupported(*mode));
            }
        }

        let accepted = device
            .descriptor()
            .accepted_scales()
            .unwrap_or(&self.default_scales);
        if !accepted.contains(&settings.hidpi()) {
            return Err(DisplayError::UnsupportedScale(settings.hidpi()));
        }

        device.install_settings(settings.clone());
        debug!(
            "{}: committed settings ({} modes, {}x scale)",
            device.id(),
            settings.modes().len(),
            settings.hidpi()
        );
        Ok(())
    }
}

impl Default for SettingsNegotiator {
    fn default() -> Self {
        SettingsNegotiator::new(vec![1, 2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vdisplay_core::{DeviceId, DisplayDescriptor, DisplayMode, LifecycleState};

    fn device_with_modes(modes: &[DisplayMode]) -> VirtualDevice {
        let descriptor = DisplayDescriptor::builder()
            .name("Negotiation Target")
            .max_pixels(3840, 2160)
            .build()
            .unwrap();
        let mut device = VirtualDevice::new(DeviceId(1), descriptor);
        for mode in modes {
            device.register_mode(*mode).unwrap();
        }
        device
    }

    fn fhd() -> DisplayMode {
        DisplayMode::new(1920, 1080, 60.0).unwrap()
    }

    fn uhd() -> DisplayMode {
        DisplayMode::new(3840, 2160, 60.0).unwrap()
    }

    #[test]
    fn commit_activates_and_installs() {
        let mut device = device_with_modes(&[fhd(), uhd()]);
        let negotiator = SettingsNegotiator::default();
        let settings = DisplaySettings::new(vec![fhd()], 1).unwrap();

        negotiator.negotiate(&mut device, &settings).unwrap();
        assert_eq!(device.state(), LifecycleState::Active);
        assert_eq!(device.current_settings(), Some(&settings));
    }

    #[test]
    fn uncataloged_mode_rejected_by_value() {
        let mut device = device_with_modes(&[fhd()]);
        let negotiator = SettingsNegotiator::default();
        let hd = DisplayMode::new(1280, 720, 60.0).unwrap();
        let settings = DisplaySettings::new(vec![fhd(), hd], 1).unwrap();

        match negotiator.negotiate(&mut device, &settings) {
            Err(DisplayError::ModeNotSupported(mode)) => assert_eq!(mode, hd),
            other => panic!("expected ModeNotSupported, got {:?}", other),
        }
        // Rejection leaves the device untouched.
        assert_eq!(device.state(), LifecycleState::Pending);
        assert!(device.current_settings().is_none());
    }

    #[test]
    fn scale_outside_default_policy_rejected() {
        let mut device = device_with_modes(&[fhd()]);
        let negotiator = SettingsNegotiator::default();
        let settings = DisplaySettings::new(vec![fhd()], 3).unwrap();

        assert!(matches!(
            negotiator.negotiate(&mut device, &settings),
            Err(DisplayError::UnsupportedScale(3))
        ));
        assert!(device.current_settings().is_none());
    }

    #[test]
    fn descriptor_scale_override_wins() {
        let descriptor = DisplayDescriptor::builder()
            .name("Triple Density")
            .max_pixels(3840, 2160)
            .accepted_scales(vec![1, 3])
            .build()
            .unwrap();
        let mut device = VirtualDevice::new(DeviceId(2), descriptor);
        device.register_mode(fhd()).unwrap();
        let negotiator = SettingsNegotiator::default();

        let triple = DisplaySettings::new(vec![fhd()], 3).unwrap();
        negotiator.negotiate(&mut device, &triple).unwrap();

        // 2x is in the registry default but not in this descriptor's set.
        let double = DisplaySettings::new(vec![fhd()], 2).unwrap();
        assert!(matches!(
            negotiator.negotiate(&mut device, &double),
            Err(DisplayError::UnsupportedScale(2))
        ));
        assert_eq!(device.current_settings(), Some(&triple));
    }

    #[test]
    fn terminating_device_rejects_settings() {
        let mut device = device_with_modes(&[fhd()]);
        device.begin_termination();
        let negotiator = SettingsNegotiator::default();
        let settings = DisplaySettings::new(vec![fhd()], 1).unwrap();

        assert!(matches!(
            negotiator.negotiate(&mut device, &settings),
            Err(DisplayError::DeviceGone(DeviceId(1)))
        ));
    }
}
