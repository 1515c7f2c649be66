//! QR family encoding modules
//!
//! This module contains the encoding pipeline shared by all three families:
//! - Segment packing and automatic mode selection
//! - Reed-Solomon and BCH error correction
//! - Capacity tables and block interleaving
//! - Function pattern bases, data placement and masking
//!
//! plus one orchestrator per family ([`qr`], [`micro`], [`rmqr`]).

/// Function pattern bases and shared mask bitmaps
pub mod base;
/// BCH codes for format and version information
pub mod bch;
/// Encoding options and environment defaults
pub mod config;
/// Error type for every encoding operation
pub mod error;
/// Format and version information writers
pub mod format;
/// RS block split and codeword interleaving
pub mod interleave;
/// Penalty scoring and mask selection
pub mod mask;
/// Micro QR (M1-M4)
pub mod micro;
/// Zigzag data placement
pub mod placement;
/// Standard QR (versions 1-40)
pub mod qr;
/// Reed-Solomon parity over GF(256)
pub mod reed_solomon;
/// Rectangular Micro QR
pub mod rmqr;
/// Segment headers and payload packing
pub mod segment;
/// Optimal segmentation and version search
pub mod segmenter;
/// Standard QR capacity tables
pub mod tables;
