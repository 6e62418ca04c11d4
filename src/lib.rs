#![no_std]

pub mod mlx90615;

#[cfg(feature = "esp32s3")]
pub mod hardware;

pub use mlx90615::{BUS_FREQUENCY_KHZ, DEFAULT_ADDRESS, Mlx90615, Register, raw_to_celsius};
