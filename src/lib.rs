//! Analytics over a dataset of sentiment-labelled airline tweets.
//!
//! A [`RecordSet`] is loaded once (see [`io::DatasetLoader`] and
//! [`io::DatasetCache`]) and shared read-only. The [`operators`] turn it into
//! filtered selections, grouped counts, random samples and word-cloud term
//! frequencies; [`Dashboard`] bundles them into the views a rendering layer
//! asks for.

pub mod config;
pub mod error;
pub mod io;
pub mod model;
pub mod operators;
pub mod runtime;

pub use config::DashboardConfig;
pub use error::{DashboardError, Result};
pub use model::{Record, RecordSet, Sentiment};
pub use runtime::{Dashboard, DashboardReport, ViewRequest};
