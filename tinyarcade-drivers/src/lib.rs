//! Hardware driver implementations
//!
//! This crate provides the concrete hardware side of the traits defined
//! in tinyarcade-core:
//!
//! - ST7789 color panel over SPI, full-frame or line-streamed
//! - GPIO joystick and button lines

#![cfg_attr(not(test), no_std)]
#![deny(unsafe_code)]

pub mod display;
pub mod input;
