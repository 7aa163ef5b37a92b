mod analytics_view;
mod input_bar;
mod message_list;
mod notice;

pub use analytics_view::AnalyticsView;
pub use input_bar::{InputAction, InputBar};
pub use message_list::MessageList;
pub use notice::NoticeWindow;
