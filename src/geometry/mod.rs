//! Geometry utilities for fort.14 meshes.
//!
//! This module provides helpers for evaluating triangle quality metrics
//! from node coordinates.

pub mod quality;
