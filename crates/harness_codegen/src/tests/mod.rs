//! Unit tests for escaping and template rendering
