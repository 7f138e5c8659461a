//! Notification Badge Core
//!
//! Badge state, push message decoding and the controller that ties them
//! together. No Bevy or network dependencies, so this can be used
//! standalone with any [`BadgeView`].

mod controller;
mod error;
mod event;
mod message;
mod state;
mod toast;
mod view;

pub use controller::BadgeController;
pub use error::BadgeError;
pub use event::{BadgeEvent, StreamState};
pub use message::{NotificationKind, PushMessage};
pub use state::{BadgeRender, BadgeState};
pub use toast::{Toast, ToastQueue};
pub use view::{BadgeView, MemoryBadgeView};
