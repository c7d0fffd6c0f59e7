/*!
State for the three dashboard tabs. Each tab owns a [`Slot`](struct.Slot.html) that moves from idle to loading to success or failure every time the tab is triggered, and the [`Dashboard`](struct.Dashboard.html) ties the tabs to one [`rice_client::Client`].

Tabs are driven through `&self`, so a host can trigger a tab again while a previous request is in flight. Only the most recently started request is allowed to store its result.
*/

mod dashboard;
mod error;
mod metrics;
mod predict;
mod projection;
mod slot;
#[cfg(test)]
mod test;

pub use self::dashboard::{Dashboard, Tab};
pub use self::error::Error;
pub use self::metrics::{MetricsReport, MetricsTab};
pub use self::predict::{PredictTab, Prediction};
pub use self::projection::{class_distribution, ClassShare, Projection, ProjectionTab};
pub use self::slot::{error_message, Slot, TabState, Ticket};
