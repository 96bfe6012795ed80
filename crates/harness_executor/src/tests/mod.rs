//! Tests that load harness documents into a real V8 surface

pub(crate) use serial_test::serial;

mod surface_execution;
