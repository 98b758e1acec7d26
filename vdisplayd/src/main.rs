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

//! # vdisplayd
//!
//! Demo daemon: brings up one virtual display, applies its preferred mode,
//! and tears it down on ctrl-c.

use clap::{Arg, Command};
use std::sync::Arc;
use tokio::signal;
use tracing::{error, info};
use vdisplay_core::{DisplayDescriptor, DisplayMode, DisplaySettings};
use vdisplay_registry::{DeviceRegistry, RegistryConfig, RegistryConfigFile};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let matches = Command::new("vdisplayd")
        .version(env!("CARGO_PKG_VERSION"))
        .author("VDisplay Team")
        .about("Virtual display demo daemon")
        .arg(
            Arg::new("name")
                .short('n')
                .long("name")
                .value_name("NAME")
                .help("Display name")
                .default_value("Virtual Display"),
        )
        .arg(
            Arg::new("width")
                .short('w')
                .long("width")
                .value_name("PIXELS")
                .help("Mode width")
                .default_value("1920"),
        )
        .arg(
            Arg::new("height")
                .short('H')
                .long("height")
                .value_name("PIXELS")
                .help("Mode height")
                .default_value("1080"),
        )
        .arg(
            Arg::new("refresh")
                .short('r')
                .long("refresh")
                .value_name("HZ")
                .help("Refresh rate")
                .default_value("60"),
        )
        .arg(
            Arg::new("hidpi")
                .long("hidpi")
                .value_name("SCALE")
                .help("HiDPI scale factor")
                .default_value("1"),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Registry configuration file (JSON)"),
        )
        .get_matches();

    let name = matches.get_one::<String>("name").unwrap().clone();
    let width: u32 = matches.get_one::<String>("width").unwrap().parse()?;
    let height: u32 = matches.get_one::<String>("height").unwrap().parse()?;
    let refresh: f64 = matches.get_one::<String>("refresh").unwrap().parse()?;
    let hidpi: u32 = matches.get_one::<String>("hidpi").unwrap().parse()?;

    let config = match matches.get_one::<String>("config") {
        Some(path) => RegistryConfigFile::load(path)?.registry,
        None => RegistryConfig::default(),
    };

    info!("Starting vdisplayd v{}", env!("CARGO_PKG_VERSION"));

    let registry = Arc::new(DeviceRegistry::with_config(config));

    let descriptor = DisplayDescriptor::builder()
        .name(name.as_str())
        .max_pixels(width, height)
        .physical_size_mm(600.0, 340.0)
        .serial_num(0x0001)
        .product_id(0x1234)
        .vendor_id(0x3456)
        .on_termination(|snapshot| {
            info!("{}: termination handler fired", snapshot.id);
        })
        .build()?;

    let id = registry.create_device(descriptor)?;
    let mode = DisplayMode::new(width, height, refresh)?;
    registry.add_mode(id, mode).await?;

    let settings = DisplaySettings::new(vec![mode], hidpi)?;
    registry.apply(id, settings).await?;

    info!("{}: \"{}\" driving {} at {}x scale", id, name, mode, hidpi);

    match signal::ctrl_c().await {
        Ok(()) => {
            info!("Shutdown signal received, terminating displays...");
        }
        Err(err) => {
            error!("Unable to listen for shutdown signal: {}", err);
        }
    }

    registry.shutdown().await;
    info!("vdisplayd stopped");
    Ok(())
}
