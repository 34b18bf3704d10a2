mod component;
mod config;
mod layout;
mod model;
mod render;
mod scene;
mod state;
mod transition;
mod types;

pub use component::ForceGraphSvg;
pub use config::ChartConfig;
pub use types::{ChartData, Group, GroupRef, Member};
