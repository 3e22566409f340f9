//! A headless, infinitely looping pager engine.
//!
//! This crate implements the paging core of an auto-scrolling carousel: a [`ViewPager`] that keeps
//! a small window of materialized pages around the current position, and a [`LoopAdapter`] that
//! presents a bounded adapter as an effectively unbounded index space so the pager can page left
//! or right forever.
//!
//! It is UI-agnostic. A UI layer is expected to provide:
//! - a [`PagerAdapter`] that creates and releases page views in a [`Container`]
//! - viewport width/padding and attach/detach events
//! - drag gestures and frame ticks (for settle animations)
//!
//! Callers always see logical (real-adapter) indexes; virtual positions stay internal.
#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

extern crate alloc;

#[cfg(test)]
extern crate std;

#[macro_use]
mod macros;

mod adapter;
mod container;
mod loop_adapter;
mod options;
mod pager;
mod settle;
mod slot;
mod state;
mod types;

#[cfg(test)]
mod tests;

pub use adapter::PagerAdapter;
pub use container::{Child, Container};
pub use loop_adapter::{LoopAdapter, VIRTUAL_COUNT};
pub use options::{
    DEFAULT_OFFSCREEN_PAGES, MAX_SETTLE_DURATION_MS, OnPageSelectedCallback,
    OnScrollStateChangedCallback, PagerOptions,
};
pub use pager::ViewPager;
pub use settle::{Easing, Settle};
pub use state::PagerState;
pub use types::{DrawingOrder, FocusDirection, ItemInfo, LayoutParams, PageLayout, ScrollState};
