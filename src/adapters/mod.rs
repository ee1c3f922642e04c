//! Concrete adapter implementations for ports.

pub mod chart_render;
pub mod csv_adapter;
pub mod yahoo_adapter;
pub mod yaml_config_adapter;
