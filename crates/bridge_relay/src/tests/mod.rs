//! Tests for the relay: ordering, session scoping and teardown behavior
