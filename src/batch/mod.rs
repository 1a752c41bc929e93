//! 批量执行模块：以有界并发执行一组相互独立的操作并收集每个结果。
//!
//! # Batch Execution Module
//!
//! Runs a set of independent fallible operations (the per-day cache writes
//! after a provider fetch) and reports each outcome by index. The caller
//! awaits the whole batch; individual failures never short-circuit the rest.
//!
//! ## Strategies
//!
//! - **Sequential**: Process items one at a time, preserving order
//! - **Concurrent**: Process up to N items concurrently

mod executor;

pub use executor::{BatchExecutor, BatchResult, BatchStrategy};
