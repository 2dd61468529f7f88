//! theme-echo: color post -> Material theme screenshot -> quote post, with Hexagonal Architecture.

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod shared;
pub mod usecases;
