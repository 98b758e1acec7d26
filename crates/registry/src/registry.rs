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

//! Device registry

use crate::compositor::{CompositorLink, NullCompositor};
use crate::config::RegistryConfig;
use crate::device::VirtualDevice;
use crate::negotiator::SettingsNegotiator;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{info, warn};
use vdisplay_core::{
    DeliveryContext, DeviceId, DeviceSnapshot, DisplayDescriptor, DisplayError, DisplayMode,
    DisplayResult, DisplaySettings,
};

/// Creates, tracks, and tears down virtual display devices
///
/// The registry is the single source of truth for device existence. Each
/// device sits behind its own async lock, so operations against distinct
/// devices never contend; only id allocation shares an atomic counter. The
/// termination handler and the compositor link always run with no internal
/// lock held, so either may re-enter the registry.
pub struct DeviceRegistry {
    devices: DashMap<DeviceId, Arc<Mutex<VirtualDevice>>>,
    next_id: AtomicU64,
    negotiator: SettingsNegotiator,
    compositor: Arc<dyn CompositorLink>,
    config: RegistryConfig,
    // Serializes the device-limit check with the insert; removals only make
    // room, so they need no guard.
    creation_lock: std::sync::Mutex<()>,
    // Task-delivered termination handlers, awaited during shutdown.
    handler_tasks: std::sync::Mutex<Vec<tokio::task::JoinHandle<()>>>,
}

impl DeviceRegistry {
    /// Registry with default policy and a logging-only compositor link
    pub fn new() -> Self {
        Self::with_compositor(RegistryConfig::default(), Arc::new(NullCompositor))
    }

    pub fn with_config(config: RegistryConfig) -> Self {
        Self::with_compositor(config, Arc::new(NullCompositor))
    }

    pub fn with_compositor(config: RegistryConfig, compositor: Arc<dyn CompositorLink>) -> Self {
        DeviceRegistry {
            devices: DashMap::new(),
            next_id: AtomicU64::new(1),
            negotiator: SettingsNegotiator::new(config.default_scales.clone()),
            compositor,
            config,
            creation_lock: std::sync::Mutex::new(()),
            handler_tasks: std::sync::Mutex::new(Vec::new()),
        }
    }

    /// Register a new virtual display
    ///
    /// The descriptor is validated before the id counter moves, so a
    /// rejected create leaves no trace. Ids start at 1 and are never reused,
    /// even after the device terminates.
    pub fn create_device(&self, descriptor: DisplayDescriptor) -> DisplayResult<DeviceId> {
        descriptor.validate()?;

        // The limit check and the insert must not interleave with another
        // create, or N callers at len == max - 1 would all be admitted.
        let _creating = self.creation_lock.lock().unwrap();

        if self.devices.len() >= self.config.max_devices {
            return Err(DisplayError::RegistryFull {
                limit: self.config.max_devices,
            });
        }

        let raw = self.next_id.fetch_add(1, Ordering::SeqCst);
        // Exhausting 64-bit ids means a broken assumption, not bad input.
        assert!(raw != u64::MAX, "device id counter overflow");
        let id = DeviceId(raw);

        let name = descriptor.name().to_string();
        let device = VirtualDevice::new(id, descriptor);
        self.devices.insert(id, Arc::new(Mutex::new(device)));

        info!("{}: created (\"{}\")", id, name);
        Ok(id)
    }

    /// Append a mode to a device's catalog
    pub async fn add_mode(&self, id: DeviceId, mode: DisplayMode) -> DisplayResult<()> {
        let device = self.device(id)?;
        let mut guard = device.lock().await;
        guard.register_mode(mode)
    }

    /// Point-in-time view of a device, or `None` if the id is not live
    pub async fn lookup(&self, id: DeviceId) -> Option<DeviceSnapshot> {
        let device = self.device(id).ok()?;
        let guard = device.lock().await;
        Some(guard.snapshot())
    }

    /// Snapshots of every live device
    pub async fn list(&self) -> Vec<DeviceSnapshot> {
        let devices: Vec<_> = self.devices.iter().map(|e| e.value().clone()).collect();
        let mut snapshots = Vec::with_capacity(devices.len());
        for device in devices {
            let guard = device.lock().await;
            snapshots.push(guard.snapshot());
        }
        snapshots
    }

    /// Number of live devices
    pub fn device_count(&self) -> usize {
        self.devices.len()
    }

    /// The device's preferred (first-registered) mode
    pub async fn preferred_mode(&self, id: DeviceId) -> DisplayResult<DisplayMode> {
        let device = self.device(id)?;
        let guard = device.lock().await;
        guard.catalog().preferred()
    }

    /// Negotiate and apply a settings bundle
    ///
    /// On commit the compositor link is notified; a failing link is logged
    /// and does not undo the already-committed settings.
    pub async fn apply(&self, id: DeviceId, settings: DisplaySettings) -> DisplayResult<()> {
        let device = self.device(id)?;

        let snapshot = {
            let mut guard = device.lock().await;
            self.negotiator.negotiate(&mut guard, &settings)?;
            guard.snapshot()
        };

        if let Err(e) = self.compositor.settings_applied(&snapshot) {
            warn!("{}: compositor rejected settings notification: {}", id, e);
        }
        Ok(())
    }

    /// Tear down a device, firing its termination handler exactly once
    ///
    /// Fails with `UnknownDevice` if the id is absent or termination has
    /// already begun; under concurrent terminate attempts exactly one caller
    /// wins and the handler fires once. The handler runs on the descriptor's
    /// delivery context, after the device lock has been released.
    pub async fn terminate(&self, id: DeviceId) -> DisplayResult<()> {
        let device = self.device(id)?;

        let (handler, delivery, snapshot) = {
            let mut guard = device.lock().await;
            match guard.begin_termination() {
                Some(handler) => (handler, guard.descriptor().delivery(), guard.snapshot()),
                None => return Err(DisplayError::UnknownDevice(id)),
            }
        };

        if let Err(e) = self.compositor.device_terminated(id) {
            warn!("{}: compositor rejected termination notification: {}", id, e);
        }

        if let Some(handler) = handler {
            match delivery {
                DeliveryContext::Inline => handler(snapshot),
                DeliveryContext::Task => {
                    let task = tokio::spawn(async move { handler(snapshot) });
                    self.handler_tasks.lock().unwrap().push(task);
                }
            }
        }

        {
            let mut guard = device.lock().await;
            guard.finish_termination();
        }
        self.devices.remove(&id);

        info!("{}: terminated", id);
        Ok(())
    }

    /// Terminate every live device
    ///
    /// Teardown path for hosts shutting down while devices are still active;
    /// each device's handler fires once, losers of concurrent races are
    /// ignored. Handlers delivered on [`DeliveryContext::Task`] are awaited
    /// before this returns, so a host may exit its runtime immediately
    /// afterwards without dropping one.
    pub async fn shutdown(&self) {
        let ids: Vec<DeviceId> = self.devices.iter().map(|e| *e.key()).collect();
        let mut terminated = 0usize;
        for id in ids {
            if self.terminate(id).await.is_ok() {
                terminated += 1;
            }
        }

        let tasks: Vec<_> = {
            let mut pending = self.handler_tasks.lock().unwrap();
            pending.drain(..).collect()
        };
        for task in tasks {
            let _ = task.await;
        }

        info!("registry shutdown: terminated {} devices", terminated);
    }

    fn device(&self, id: DeviceId) -> DisplayResult<Arc<Mutex<VirtualDevice>>> {
        self.devices
            .get(&id)
            .map(|entry| entry.value().clone())
            .ok_or(DisplayError::UnknownDevice(id))
    }
}

impl Default for DeviceRegistry {
    fn default() -> Self {
        Self::new()
    }
}
