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

//! Display registration descriptors

use crate::error::{DisplayError, DisplayResult};
use crate::types::{DeliveryContext, TerminationHandler};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Immutable registration record for a virtual display
///
/// Built once through [`DisplayDescriptorBuilder`], validated at build time,
/// and shared read-only between the registry and the device afterwards.
#[derive(Clone, Serialize, Deserialize)]
pub struct DisplayDescriptor {
    name: String,
    max_width: u32,
    max_height: u32,
    physical_size_mm: (f64, f64),
    serial_num: u32,
    product_id: u32,
    vendor_id: u32,
    /// HiDPI scales this device accepts; `None` defers to registry policy
    accepted_scales: Option<Vec<u32>>,
    delivery: DeliveryContext,
    #[serde(skip)]
    termination_handler: Option<TerminationHandler>,
}

impl DisplayDescriptor {
    pub fn builder() -> DisplayDescriptorBuilder {
        DisplayDescriptorBuilder::new()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn max_width(&self) -> u32 {
        self.max_width
    }

    pub fn max_height(&self) -> u32 {
        self.max_height
    }

    /// Physical panel size in millimeters (width, height)
    pub fn physical_size_mm(&self) -> (f64, f64) {
        self.physical_size_mm
    }

    pub fn serial_num(&self) -> u32 {
        self.serial_num
    }

    pub fn product_id(&self) -> u32 {
        self.product_id
    }

    pub fn vendor_id(&self) -> u32 {
        self.vendor_id
    }

    pub fn accepted_scales(&self) -> Option<&[u32]> {
        self.accepted_scales.as_deref()
    }

    pub fn delivery(&self) -> DeliveryContext {
        self.delivery
    }

    pub fn termination_handler(&self) -> Option<&TerminationHandler> {
        self.termination_handler.as_ref()
    }

    /// Re-check the construction invariants
    ///
    /// Descriptors built through the builder always pass; the registry
    /// revalidates before allocating an id so a deserialized descriptor
    /// cannot smuggle in bad values.
    pub fn validate(&self) -> DisplayResult<()> {
        if self.name.trim().is_empty() {
            return Err(DisplayError::InvalidDescriptor(
                "name must be non-empty".to_string(),
            ));
        }
        if self.max_width == 0 || self.max_height == 0 {
            return Err(DisplayError::InvalidDescriptor(format!(
                "max pixel bounds must be positive, got {}x{}",
                self.max_width, self.max_height
            )));
        }
        let (w_mm, h_mm) = self.physical_size_mm;
        if !(w_mm >= 0.0) || !(h_mm >= 0.0) {
            return Err(DisplayError::InvalidDescriptor(format!(
                "physical size must be non-negative, got {}x{} mm",
                w_mm, h_mm
            )));
        }
        if let Some(scales) = &self.accepted_scales {
            if scales.is_empty() {
                return Err(DisplayError::InvalidDescriptor(
                    "accepted scale set must be non-empty".to_string(),
                ));
            }
            if let Some(zero) = scales.iter().find(|s| **s == 0) {
                return Err(DisplayError::InvalidDescriptor(format!(
                    "accepted scales must be positive, got {}",
                    zero
                )));
            }
        }
        Ok(())
    }
}

impl fmt::Debug for DisplayDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DisplayDescriptor")
            .field("name", &self.name)
            .field("max_width", &self.max_width)
            .field("max_height", &self.max_height)
            .field("physical_size_mm", &self.physical_size_mm)
            .field("serial_num", &self.serial_num)
            .field("product_id", &self.product_id)
            .field("vendor_id", &self.vendor_id)
            .field("accepted_scales", &self.accepted_scales)
            .field("delivery", &self.delivery)
            .field(
                "termination_handler",
                &self.termination_handler.as_ref().map(|_| "<handler>"),
            )
            .finish()
    }
}

/// Builder for [`DisplayDescriptor`]
pub struct DisplayDescriptorBuilder {
    name: String,
    max_width: u32,
    max_height: u32,
    physical_size_mm: (f64, f64),
    serial_num: u32,
    product_id: u32,
    vendor_id: u32,
    accepted_scales: Option<Vec<u32>>,
    delivery: DeliveryContext,
    termination_handler: Option<TerminationHandler>,
}

impl DisplayDescriptorBuilder {
    pub fn new() -> Self {
        DisplayDescriptorBuilder {
            name: String::new(),
            max_width: 0,
            max_height: 0,
            physical_size_mm: (0.0, 0.0),
            serial_num: 0,
            product_id: 0,
            vendor_id: 0,
            accepted_scales: None,
            delivery: DeliveryContext::Inline,
            termination_handler: None,
        }
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Upper bound on any mode's pixel dimensions
    pub fn max_pixels(mut self, width: u32, height: u32) -> Self {
        self.max_width = width;
        self.max_height = height;
        self
    }

    pub fn physical_size_mm(mut self, width_mm: f64, height_mm: f64) -> Self {
        self.physical_size_mm = (width_mm, height_mm);
        self
    }

    pub fn serial_num(mut self, serial: u32) -> Self {
        self.serial_num = serial;
        self
    }

    pub fn product_id(mut self, product: u32) -> Self {
        self.product_id = product;
        self
    }

    pub fn vendor_id(mut self, vendor: u32) -> Self {
        self.vendor_id = vendor;
        self
    }

    /// Override the registry's default accepted HiDPI scale set
    pub fn accepted_scales(mut self, scales: Vec<u32>) -> Self {
        self.accepted_scales = Some(scales);
        self
    }

    pub fn delivery(mut self, context: DeliveryContext) -> Self {
        self.delivery = context;
        self
    }

    /// Callback invoked exactly once when the device is destroyed
    pub fn on_termination<F>(mut self, handler: F) -> Self
    where
        F: Fn(crate::types::DeviceSnapshot) + Send + Sync + 'static,
    {
        self.termination_handler = Some(std::sync::Arc::new(handler));
        self
    }

    /// Validate the collected fields and produce the immutable descriptor
    pub fn build(self) -> DisplayResult<DisplayDescriptor> {
        let descriptor = DisplayDescriptor {
            name: self.name,
            max_width: self.max_width,
            max_height: self.max_height,
            physical_size_mm: self.physical_size_mm,
            serial_num: self.serial_num,
            product_id: self.product_id,
            vendor_id: self.vendor_id,
            accepted_scales: self.accepted_scales,
            delivery: self.delivery,
            termination_handler: self.termination_handler,
        };
        descriptor.validate()?;
        Ok(descriptor)
    }
}

impl Default for DisplayDescriptorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> DisplayDescriptorBuilder {
        DisplayDescriptor::builder()
            .name("Test Display")
            .max_pixels(3840, 2160)
            .physical_size_mm(600.0, 340.0)
            .serial_num(0x0001)
            .product_id(0x1234)
            .vendor_id(0x3456)
    }

    #[test]
    fn builder_produces_valid_descriptor() {
        let descriptor = base().build().unwrap();
        assert_eq!(descriptor.name(), "Test Display");
        assert_eq!(descriptor.max_width(), 3840);
        assert_eq!(descriptor.max_height(), 2160);
        assert_eq!(descriptor.vendor_id(), 0x3456);
        assert!(descriptor.accepted_scales().is_none());
        assert!(descriptor.termination_handler().is_none());
    }

    #[test]
    fn empty_name_is_rejected() {
        let result = DisplayDescriptor::builder().max_pixels(1920, 1080).build();
        assert!(matches!(result, Err(DisplayError::InvalidDescriptor(_))));
    }

    #[test]
    fn zero_bounds_are_rejected() {
        let result = DisplayDescriptor::builder()
            .name("Test")
            .max_pixels(0, 1080)
            .build();
        assert!(matches!(result, Err(DisplayError::InvalidDescriptor(_))));
    }

    #[test]
    fn zero_scale_in_override_is_rejected() {
        let result = base().accepted_scales(vec![1, 0]).build();
        assert!(matches!(result, Err(DisplayError::InvalidDescriptor(_))));
    }

    #[test]
    fn empty_scale_override_is_rejected() {
        let result = base().accepted_scales(vec![]).build();
        assert!(matches!(result, Err(DisplayError::InvalidDescriptor(_))));
    }

    #[test]
    fn handler_survives_build() {
        let descriptor = base().on_termination(|_| {}).build().unwrap();
        assert!(descriptor.termination_handler().is_some());
        let debugged = format!("{:?}", descriptor);
        assert!(debugged.contains("<handler>"));
    }
}
