//! Rendering and animation engine for an amber pixel departure board.
//!
//! A [`Board`] owns the frame compositor, the scene manager and the
//! brightness policy. A host feeds it [`BoardState`] snapshots (usually from a
//! [`BackgroundRefresher`](refresher::BackgroundRefresher)) and drives it once
//! per frame from a render loop paced by a [`RateRegulator`].

pub mod board;
pub mod compositor;
pub mod config;
pub mod data;
pub mod errors;
pub mod power;
pub mod refresher;
pub mod region;
pub mod regulator;
pub mod render;
pub mod scene;
pub mod tick;
pub mod widgets;

pub use board::{Board, SnapshotHandle};
pub use config::BoardConfig;
pub use data::{BoardState, Departure, Stop};
pub use errors::BoardError;
pub use regulator::RateRegulator;
pub use tick::{FrameTime, TickResult};
