//! Property-based tests for listing order and reconcile round trips

mod reconcile;
mod strategies;
