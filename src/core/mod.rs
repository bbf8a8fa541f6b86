pub mod callbacks;
pub mod facade;
pub mod handlers;
pub mod listeners;

pub use crate::domain::model::{Connection, Dispatch, NotifySummary, RequestSpec, ResponseBody};
pub use crate::domain::ports::{ConfigProvider, Interaction, ModelListener};
pub use crate::utils::error::Result;
