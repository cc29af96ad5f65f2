//! Core module - host seam types and utilities

pub mod config;
pub mod install;
pub mod object;
pub mod property;
pub mod units;

pub use config::Config;
pub use install::{InstallError, InstallStatus, Installer, Manifest};
pub use object::{DocumentObject, ObjectError, ScriptedFeature, ScriptedObject};
pub use property::{Assignment, Property, PropertyBag, PropertyError, PropertyType, PropertyValue};
pub use units::{Length, UnitError};
